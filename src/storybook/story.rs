use crate::error::RenderError;
use crate::readme::slugify;
use crate::render::Node;

/// A story renders one preview entry in the catalog
///
/// Stories are stateless: rendering the same story twice yields the same
/// tree.
pub trait Story: Send + Sync {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    /// Group the story is listed under (the component name)
    fn category(&self) -> &str;
    fn render(&self) -> Result<Node, RenderError>;
    /// Markdown shown next to the preview
    fn notes(&self) -> Option<&str> {
        None
    }
}

/// Stable story id: `slug(group)--slug(name)`
pub fn story_id(group: &str, name: &str) -> String {
    format!("{}--{}", slugify(group), slugify(name))
}
