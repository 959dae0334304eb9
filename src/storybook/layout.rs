use std::collections::BTreeMap;

use crate::error::RenderError;
use crate::render::{Component, Node, Props, Value};

/// Minimum height of each example in the aggregate story, in pixels
pub const DEFAULT_EXAMPLE_MIN_HEIGHT_PX: u32 = 720;

/// Container with a fixed minimum height, so one example changing height
/// never shifts the examples below it in screenshots
pub fn example_frame(example: Node, min_height_px: u32) -> Node {
    let mut style = BTreeMap::new();
    style.insert(
        "minHeight".to_string(),
        Value::String(format!("{}px", min_height_px)),
    );
    let mut props = Props::new();
    props.insert("style".to_string(), Value::Object(style));
    Node::element("div", props, vec![example])
}

/// Horizontal divider
pub fn story_divider() -> Node {
    Node::element("hr", Props::new(), Vec::new())
}

/// All examples stacked vertically, each framed and followed by a divider
pub fn all_examples_layout(examples: Vec<Node>, min_height_px: u32) -> Node {
    let mut children = Vec::with_capacity(examples.len() * 2);
    for example in examples {
        children.push(example_frame(example, min_height_px));
        children.push(story_divider());
    }
    Node::Fragment(children)
}

/// Wrap a rendered story in decorators; the first decorator is innermost
pub fn decorate(node: Node, decorators: &[Component]) -> Result<Node, RenderError> {
    decorators
        .iter()
        .try_fold(node, |inner, decorator| decorator.render(&Props::new(), vec![inner]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_examples_layout_markup() {
        let layout = all_examples_layout(vec![Node::text("A"), Node::text("B")], 720);
        assert_eq!(
            layout.to_string(),
            r#"<><div style={{minHeight: "720px"}}>A</div><hr /><div style={{minHeight: "720px"}}>B</div><hr /></>"#
        );
    }

    #[test]
    fn test_empty_layout_is_empty_fragment() {
        assert_eq!(all_examples_layout(Vec::new(), 720), Node::Fragment(Vec::new()));
    }

    #[test]
    fn test_decorators_wrap_in_order() {
        let decorators = vec![Component::host("Inner"), Component::host("AppProvider")];
        let node = decorate(Node::text("x"), &decorators).unwrap();
        assert_eq!(node.to_string(), "<AppProvider><Inner>x</Inner></AppProvider>");
    }
}
