//! Evaluation of render fragments against a bound scope.

use std::collections::BTreeMap;

use super::{Node, Props, Scope, Value};
use crate::error::RenderError;
use crate::fragment::ast::{
    ArrayItem, BinaryOp, Expr, JsxAttr, JsxChild, JsxElement, ObjectProp, TemplatePart, UnaryOp,
};

/// Props React consumes itself and never passes to components
const RESERVED_PROPS: &[&str] = &["key", "ref"];

/// Walks an expression tree, resolving identifiers through a [`Scope`].
pub struct Evaluator<'a> {
    scope: &'a Scope,
}

impl<'a> Evaluator<'a> {
    pub fn new(scope: &'a Scope) -> Self {
        Self { scope }
    }

    pub fn eval(&self, expr: &Expr) -> Result<Value, RenderError> {
        match expr {
            Expr::String(s) => Ok(Value::String(s.clone())),
            Expr::Number(n) => Ok(Value::Number(*n)),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Null => Ok(Value::Null),
            Expr::Undefined | Expr::This => Ok(Value::Undefined),
            Expr::Template(parts) => {
                let mut out = String::new();
                for part in parts {
                    match part {
                        TemplatePart::Str(s) => out.push_str(s),
                        TemplatePart::Expr(e) => out.push_str(&self.eval(e)?.to_js_string()),
                    }
                }
                Ok(Value::String(out))
            }
            Expr::Ident(name) => self
                .scope
                .get(name)
                .cloned()
                .ok_or_else(|| RenderError::Unbound(name.clone())),
            Expr::Member {
                object,
                property,
                optional,
            } => {
                let object = self.eval(object)?;
                if *optional && object.is_nullish() {
                    return Ok(Value::Undefined);
                }
                object.get_property(property)
            }
            Expr::Index { object, index } => {
                let object = self.eval(object)?;
                let key = self.eval(index)?.to_js_string();
                object.get_property(&key)
            }
            Expr::Call {
                callee, construct, ..
            } => {
                let what = if *construct { "new " } else { "" };
                Err(RenderError::Unsupported(format!(
                    "call to {}{}",
                    what,
                    describe(callee)
                )))
            }
            Expr::Array(items) => self.eval_items(items).map(Value::Array),
            Expr::Object(props) => self.eval_object(props).map(Value::Object),
            Expr::Unary { op, operand } => {
                let value = self.eval(operand)?;
                Ok(match op {
                    UnaryOp::Not => Value::Bool(!value.is_truthy()),
                    UnaryOp::Neg => Value::Number(-value.to_number()),
                    UnaryOp::Plus => Value::Number(value.to_number()),
                    UnaryOp::TypeOf => Value::String(value.type_of().to_string()),
                })
            }
            Expr::Binary { op, left, right } => self.eval_binary(*op, left, right),
            Expr::Conditional {
                test,
                consequent,
                alternate,
            } => {
                if self.eval(test)?.is_truthy() {
                    self.eval(consequent)
                } else {
                    self.eval(alternate)
                }
            }
            Expr::Function(source) => Ok(Value::Function(source.clone())),
            Expr::Element(element) => self.render_element(element).map(Value::Node),
        }
    }

    fn eval_items(&self, items: &[ArrayItem]) -> Result<Vec<Value>, RenderError> {
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            match item {
                ArrayItem::Item(e) => out.push(self.eval(e)?),
                ArrayItem::Spread(e) => match self.eval(e)? {
                    Value::Array(values) => out.extend(values),
                    Value::String(s) => out.extend(s.chars().map(|c| Value::String(c.to_string()))),
                    other => {
                        return Err(RenderError::Type(format!(
                            "{} is not iterable",
                            other.type_name()
                        )))
                    }
                },
            }
        }
        Ok(out)
    }

    fn eval_object(&self, props: &[ObjectProp]) -> Result<BTreeMap<String, Value>, RenderError> {
        let mut out = BTreeMap::new();
        for prop in props {
            match prop {
                ObjectProp::KeyValue(key, value) => {
                    out.insert(key.clone(), self.eval(value)?);
                }
                ObjectProp::Shorthand(name) => {
                    out.insert(name.clone(), self.eval(&Expr::Ident(name.clone()))?);
                }
                ObjectProp::Spread(value) => spread_into(&mut out, self.eval(value)?),
            }
        }
        Ok(out)
    }

    fn eval_binary(&self, op: BinaryOp, left: &Expr, right: &Expr) -> Result<Value, RenderError> {
        // short-circuiting operators evaluate the right side lazily
        match op {
            BinaryOp::And => {
                let l = self.eval(left)?;
                return if l.is_truthy() { self.eval(right) } else { Ok(l) };
            }
            BinaryOp::Or => {
                let l = self.eval(left)?;
                return if l.is_truthy() { Ok(l) } else { self.eval(right) };
            }
            BinaryOp::Nullish => {
                let l = self.eval(left)?;
                return if l.is_nullish() { self.eval(right) } else { Ok(l) };
            }
            _ => {}
        }

        let l = self.eval(left)?;
        let r = self.eval(right)?;
        Ok(match op {
            BinaryOp::StrictEq => Value::Bool(strict_equals(&l, &r)),
            BinaryOp::StrictNotEq => Value::Bool(!strict_equals(&l, &r)),
            BinaryOp::Eq => Value::Bool(loose_equals(&l, &r)),
            BinaryOp::NotEq => Value::Bool(!loose_equals(&l, &r)),
            BinaryOp::Lt | BinaryOp::Gt | BinaryOp::LtEq | BinaryOp::GtEq => {
                Value::Bool(compare(op, &l, &r))
            }
            BinaryOp::Add => {
                if is_string_like(&l) || is_string_like(&r) {
                    Value::String(l.to_js_string() + &r.to_js_string())
                } else {
                    Value::Number(l.to_number() + r.to_number())
                }
            }
            BinaryOp::Sub => Value::Number(l.to_number() - r.to_number()),
            BinaryOp::Mul => Value::Number(l.to_number() * r.to_number()),
            BinaryOp::Div => Value::Number(l.to_number() / r.to_number()),
            BinaryOp::Rem => Value::Number(l.to_number() % r.to_number()),
            BinaryOp::And => if l.is_truthy() { r } else { l },
            BinaryOp::Or => if l.is_truthy() { l } else { r },
            BinaryOp::Nullish => if l.is_nullish() { r } else { l },
        })
    }

    /// Render a JSX element to a node
    pub fn render_element(&self, element: &JsxElement) -> Result<Node, RenderError> {
        let children = self.render_children(&element.children)?;
        let Some(name) = &element.name else {
            return Ok(Node::Fragment(children));
        };

        let mut props = Props::new();
        for attr in &element.attributes {
            match attr {
                JsxAttr::Named { name, value } => {
                    let value = match value {
                        Some(expr) => self.eval(expr)?,
                        None => Value::Bool(true),
                    };
                    props.insert(name.clone(), value);
                }
                JsxAttr::Spread(expr) => spread_into(&mut props, self.eval(expr)?),
            }
        }
        props.retain(|key, _| !RESERVED_PROPS.contains(&key.as_str()));

        if name.is_intrinsic() {
            return Ok(Node::Element {
                tag: name.to_string(),
                props,
                children,
            });
        }

        let mut target = self
            .scope
            .get(name.root())
            .cloned()
            .ok_or_else(|| RenderError::Unbound(name.root().to_string()))?;
        for segment in name.segments.iter().skip(1) {
            target = target.get_property(segment)?;
        }

        match target {
            Value::Component(component) => component.render(&props, children),
            _ => Err(RenderError::NotAComponent(name.to_string())),
        }
    }

    fn render_children(&self, children: &[JsxChild]) -> Result<Vec<Node>, RenderError> {
        let mut out = Vec::with_capacity(children.len());
        for child in children {
            match child {
                JsxChild::Text(text) => out.push(Node::Text(text.clone())),
                JsxChild::Expr(expr) => self.eval(expr)?.append_nodes(&mut out)?,
                JsxChild::Element(element) => out.push(self.render_element(element)?),
            }
        }
        Ok(out)
    }
}

/// Convert the result of a render expression into a single node
pub fn value_to_node(value: Value) -> Result<Node, RenderError> {
    if let Value::Node(node) = value {
        return Ok(node);
    }
    let mut nodes = Vec::new();
    value.append_nodes(&mut nodes)?;
    if nodes.len() == 1 {
        if let Some(node) = nodes.pop() {
            return Ok(node);
        }
    }
    Ok(Node::Fragment(nodes))
}

fn spread_into(out: &mut BTreeMap<String, Value>, value: Value) {
    match value {
        Value::Object(fields) => out.extend(fields),
        Value::Array(items) => {
            for (i, item) in items.into_iter().enumerate() {
                out.insert(i.to_string(), item);
            }
        }
        Value::String(s) => {
            for (i, c) in s.chars().enumerate() {
                out.insert(i.to_string(), Value::String(c.to_string()));
            }
        }
        // spreading primitives, null or undefined copies nothing
        _ => {}
    }
}

fn describe(expr: &Expr) -> String {
    match expr {
        Expr::Ident(name) => name.clone(),
        Expr::This => "this".to_string(),
        Expr::Member {
            object, property, ..
        } => format!("{}.{}", describe(object), property),
        Expr::Index { object, .. } => format!("{}[...]", describe(object)),
        Expr::Call { callee, .. } => format!("{}(...)", describe(callee)),
        _ => "expression".to_string(),
    }
}

fn is_string_like(value: &Value) -> bool {
    matches!(
        value,
        Value::String(_) | Value::Array(_) | Value::Object(_) | Value::Node(_) | Value::Function(_)
    )
}

fn strict_equals(l: &Value, r: &Value) -> bool {
    match (l, r) {
        (Value::Number(a), Value::Number(b)) => a == b,
        _ => l == r,
    }
}

fn loose_equals(l: &Value, r: &Value) -> bool {
    match (l, r) {
        _ if l.is_nullish() && r.is_nullish() => true,
        _ if l.is_nullish() || r.is_nullish() => false,
        (Value::Number(_) | Value::String(_) | Value::Bool(_), Value::Number(_) | Value::String(_) | Value::Bool(_))
            if std::mem::discriminant(l) != std::mem::discriminant(r) =>
        {
            l.to_number() == r.to_number()
        }
        _ => strict_equals(l, r),
    }
}

fn compare(op: BinaryOp, l: &Value, r: &Value) -> bool {
    if let (Value::String(a), Value::String(b)) = (l, r) {
        return match op {
            BinaryOp::Lt => a < b,
            BinaryOp::Gt => a > b,
            BinaryOp::LtEq => a <= b,
            _ => a >= b,
        };
    }
    let (a, b) = (l.to_number(), r.to_number());
    match op {
        BinaryOp::Lt => a < b,
        BinaryOp::Gt => a > b,
        BinaryOp::LtEq => a <= b,
        _ => a >= b,
    }
}
