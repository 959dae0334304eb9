use std::collections::BTreeMap;

use super::{Component, Node};
use crate::error::RenderError;

/// A runtime value produced while evaluating an example fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
    Node(Node),
    Component(Component),
    /// Function expression carried as source text; never executed.
    Function(String),
}

impl Value {
    /// JavaScript truthiness
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            _ => true,
        }
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Node(_) => "element",
            Value::Component(_) => "component",
            Value::Function(_) => "function",
        }
    }

    /// Result of the `typeof` operator
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Component(_) | Value::Function(_) => "function",
            Value::Null | Value::Array(_) | Value::Object(_) | Value::Node(_) => "object",
        }
    }

    /// Numeric conversion following `Number(value)`
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Number(n) => *n,
            Value::String(s) => {
                let s = s.trim();
                if s.is_empty() {
                    0.0
                } else {
                    s.parse().unwrap_or(f64::NAN)
                }
            }
            Value::Array(items) => match items.as_slice() {
                [] => 0.0,
                [single] => Value::String(single.to_js_string()).to_number(),
                _ => f64::NAN,
            },
            _ => f64::NAN,
        }
    }

    /// String conversion following `String(value)`
    pub fn to_js_string(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::String(s) => s.clone(),
            Value::Array(items) => items
                .iter()
                .map(|v| if v.is_nullish() { String::new() } else { v.to_js_string() })
                .collect::<Vec<_>>()
                .join(","),
            Value::Object(_) | Value::Node(_) => "[object Object]".to_string(),
            Value::Component(c) => format!("function {}", c.name()),
            Value::Function(source) => source.clone(),
        }
    }

    /// Property lookup (`value.property`)
    pub fn get_property(&self, property: &str) -> Result<Value, RenderError> {
        match self {
            Value::Undefined | Value::Null => Err(RenderError::PropertyOfUndefined {
                property: property.to_string(),
                base: self.type_name().to_string(),
            }),
            Value::Object(fields) => Ok(fields.get(property).cloned().unwrap_or(Value::Undefined)),
            Value::Component(component) => Ok(component
                .get_static(property)
                .cloned()
                .unwrap_or(Value::Undefined)),
            Value::Array(items) => Ok(match property {
                "length" => Value::Number(items.len() as f64),
                _ => property
                    .parse::<usize>()
                    .ok()
                    .and_then(|i| items.get(i).cloned())
                    .unwrap_or(Value::Undefined),
            }),
            Value::String(s) => Ok(match property {
                "length" => Value::Number(s.chars().count() as f64),
                _ => Value::Undefined,
            }),
            _ => Ok(Value::Undefined),
        }
    }

    /// Flatten this value into renderable children.
    ///
    /// Booleans, null and undefined render nothing; arrays flatten.
    pub fn append_nodes(self, out: &mut Vec<Node>) -> Result<(), RenderError> {
        match self {
            Value::Undefined | Value::Null | Value::Bool(_) => Ok(()),
            Value::String(s) => {
                out.push(Node::Text(s));
                Ok(())
            }
            Value::Number(n) => {
                out.push(Node::Text(format_number(n)));
                Ok(())
            }
            Value::Node(node) => {
                out.push(node);
                Ok(())
            }
            Value::Array(items) => {
                for item in items {
                    item.append_nodes(out)?;
                }
                Ok(())
            }
            other => Err(RenderError::InvalidChild(format!(
                "{} values are not valid children",
                other.type_name()
            ))),
        }
    }
}

/// Number formatting following `Number.prototype.toString` for common values
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        Value::Node(node)
    }
}

impl From<Component> for Value {
    fn from(component: Component) -> Self {
        Value::Component(component)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness_matches_js() {
        assert!(!Value::Undefined.is_truthy());
        assert!(!Value::Number(0.0).is_truthy());
        assert!(!Value::String(String::new()).is_truthy());
        assert!(Value::String("0".into()).is_truthy());
        assert!(Value::Object(BTreeMap::new()).is_truthy());
    }

    #[test]
    fn test_to_number_and_type_of() {
        assert_eq!(Value::from("  42 ").to_number(), 42.0);
        assert_eq!(Value::Null.to_number(), 0.0);
        assert!(Value::from("abc").to_number().is_nan());
        assert_eq!(Value::Null.type_of(), "object");
        assert_eq!(Value::Function("() => {}".into()).type_of(), "function");
    }

    #[test]
    fn test_format_number_drops_integer_fraction() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_number(-2.0), "-2");
    }

    #[test]
    fn test_property_of_undefined_is_error() {
        let err = Value::Undefined.get_property("x").unwrap_err();
        assert_eq!(
            err,
            RenderError::PropertyOfUndefined {
                property: "x".into(),
                base: "undefined".into()
            }
        );
    }

    #[test]
    fn test_append_nodes_skips_booleans_and_flattens_arrays() {
        let mut out = Vec::new();
        Value::Array(vec![
            Value::Bool(false),
            Value::String("a".into()),
            Value::Array(vec![Value::Number(2.0)]),
            Value::Null,
        ])
        .append_nodes(&mut out)
        .unwrap();
        assert_eq!(out, vec![Node::text("a"), Node::text("2")]);
    }

    #[test]
    fn test_object_child_is_rejected() {
        let mut out = Vec::new();
        let err = Value::Object(BTreeMap::new()).append_nodes(&mut out).unwrap_err();
        assert!(matches!(err, RenderError::InvalidChild(_)));
    }
}
