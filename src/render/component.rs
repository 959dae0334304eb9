use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::{Node, Props, Value};
use crate::error::RenderError;

/// Render function backing a [`Component`]
pub type RenderFn = dyn Fn(&Props, Vec<Node>) -> Result<Node, RenderError> + Send + Sync;

/// A renderable library export (`Button`, `Card`, `React.Fragment`, ...).
///
/// Static members hang off the component the way `Card.Section` hangs off
/// `Card` in the library.
#[derive(Clone)]
pub struct Component {
    name: String,
    render: Arc<RenderFn>,
    statics: BTreeMap<String, Value>,
}

impl Component {
    pub fn new<F>(name: impl Into<String>, render: F) -> Self
    where
        F: Fn(&Props, Vec<Node>) -> Result<Node, RenderError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            render: Arc::new(render),
            statics: BTreeMap::new(),
        }
    }

    /// Component that renders an element tagged with its own name.
    ///
    /// Used as a stand-in for library components when only their names are
    /// known.
    pub fn host(name: impl Into<String>) -> Self {
        let name = name.into();
        let tag = name.clone();
        Self::new(name, move |props, children| {
            Ok(Node::Element {
                tag: tag.clone(),
                props: props.clone(),
                children,
            })
        })
    }

    /// `React.Fragment`
    pub fn fragment() -> Self {
        Self::new("Fragment", |_props, children| Ok(Node::Fragment(children)))
    }

    pub fn with_static(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.statics.insert(name.into(), value.into());
        self
    }

    pub fn insert_static(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.statics.insert(name.into(), value.into());
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get_static(&self, name: &str) -> Option<&Value> {
        self.statics.get(name)
    }

    pub fn get_static_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.statics.get_mut(name)
    }

    pub fn render(&self, props: &Props, children: Vec<Node>) -> Result<Node, RenderError> {
        (self.render)(props, children)
    }
}

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && std::ptr::addr_eq(Arc::as_ptr(&self.render), Arc::as_ptr(&other.render))
            && self.statics == other.statics
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("name", &self.name)
            .field("statics", &self.statics.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_component_renders_element_with_own_name() {
        let badge = Component::host("Badge");
        let node = badge.render(&Props::new(), vec![Node::text("Hi")]).unwrap();
        assert_eq!(
            node,
            Node::Element {
                tag: "Badge".into(),
                props: Props::new(),
                children: vec![Node::text("Hi")],
            }
        );
    }

    #[test]
    fn test_fragment_component_returns_children() {
        let node = Component::fragment()
            .render(&Props::new(), vec![Node::text("a"), Node::text("b")])
            .unwrap();
        assert_eq!(node, Node::Fragment(vec![Node::text("a"), Node::text("b")]));
    }

    #[test]
    fn test_clones_compare_equal_but_distinct_components_do_not() {
        let a = Component::host("Card");
        assert_eq!(a, a.clone());
        assert_ne!(a, Component::host("Card"));
    }

    #[test]
    fn test_statics_are_reachable() {
        let card = Component::host("Card").with_static("Section", Component::host("Card.Section"));
        assert!(matches!(card.get_static("Section"), Some(Value::Component(_))));
        assert!(card.get_static("Header").is_none());
    }
}
