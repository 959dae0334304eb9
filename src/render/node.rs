use std::collections::BTreeMap;
use std::fmt::{self, Write};

use super::value::format_number;
use super::Value;

/// Props passed to a component or host element
pub type Props = BTreeMap<String, Value>;

/// Render tree produced by an example.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Host element or the output of a host component
    Element {
        tag: String,
        props: Props,
        children: Vec<Node>,
    },
    Text(String),
    Fragment(Vec<Node>),
    /// A class component definition; the preview host instantiates it from
    /// source.
    Mount { class: String, source: String },
}

impl Node {
    pub fn element(tag: impl Into<String>, props: Props, children: Vec<Node>) -> Self {
        Node::Element {
            tag: tag.into(),
            props,
            children,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            Node::Element { tag, .. } => Some(tag),
            Node::Mount { class, .. } => Some(class),
            _ => None,
        }
    }

    pub fn props(&self) -> Option<&Props> {
        match self {
            Node::Element { props, .. } => Some(props),
            _ => None,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Element { children, .. } | Node::Fragment(children) => children,
            _ => &[],
        }
    }

    /// Concatenated text content of this subtree
    pub fn text_content(&self) -> String {
        match self {
            Node::Text(text) => text.clone(),
            Node::Mount { .. } => String::new(),
            _ => self.children().iter().map(Node::text_content).collect(),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Text(text) => f.write_str(&escape_text(text)),
            Node::Fragment(children) => {
                f.write_str("<>")?;
                for child in children {
                    write!(f, "{}", child)?;
                }
                f.write_str("</>")
            }
            Node::Mount { class, .. } => write!(f, "<{} />", class),
            Node::Element {
                tag,
                props,
                children,
            } => {
                write!(f, "<{}", tag)?;
                for (name, value) in props {
                    match value {
                        Value::Bool(true) => write!(f, " {}", name)?,
                        Value::String(s) => write!(f, " {}=\"{}\"", name, s.replace('"', "&quot;"))?,
                        other => write!(f, " {}={{{}}}", name, value_literal(other))?,
                    }
                }
                if children.is_empty() {
                    return f.write_str(" />");
                }
                f.write_char('>')?;
                for child in children {
                    write!(f, "{}", child)?;
                }
                write!(f, "</{}>", tag)
            }
        }
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Source-like rendering of a prop value
fn value_literal(value: &Value) -> String {
    match value {
        Value::Undefined => "undefined".to_string(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(*n),
        Value::String(s) => format!("{:?}", s),
        Value::Array(items) => format!(
            "[{}]",
            items.iter().map(value_literal).collect::<Vec<_>>().join(", ")
        ),
        Value::Object(fields) => {
            if fields.is_empty() {
                return "{}".to_string();
            }
            let body = fields
                .iter()
                .map(|(k, v)| format!("{}: {}", k, value_literal(v)))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{{{}}}", body)
        }
        Value::Node(node) => node.to_string(),
        Value::Component(component) => component.name().to_string(),
        Value::Function(source) => source.clone(),
    }
}
