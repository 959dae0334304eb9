//! Free identifier collection.
//!
//! A fragment's free identifiers are exactly the names it expects the scope to
//! supply. Function expressions and class bodies are kept as source by the
//! parser, so their references come from a token scan of that source.

use super::ast::{
    ArrayItem, ClassDecl, Expr, Fragment, JsxAttr, JsxChild, JsxElement, ObjectProp, TemplatePart,
};
use super::references::opaque_references;

/// Ordered, de-duplicated identifier list
#[derive(Debug, Default)]
struct Collector {
    names: Vec<String>,
}

impl Collector {
    fn add(&mut self, name: &str) {
        if !self.names.iter().any(|n| n == name) {
            self.names.push(name.to_string());
        }
    }

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Ident(name) => self.add(name),
            Expr::Member { object, .. } => self.expr(object),
            Expr::Index { object, index } => {
                self.expr(object);
                self.expr(index);
            }
            Expr::Call { callee, args, .. } => {
                self.expr(callee);
                self.items(args);
            }
            Expr::Array(items) => self.items(items),
            Expr::Object(props) => {
                for prop in props {
                    match prop {
                        ObjectProp::KeyValue(_, value) => self.expr(value),
                        ObjectProp::Shorthand(name) => self.add(name),
                        ObjectProp::Spread(value) => self.expr(value),
                    }
                }
            }
            Expr::Template(parts) => {
                for part in parts {
                    if let TemplatePart::Expr(e) = part {
                        self.expr(e);
                    }
                }
            }
            Expr::Unary { operand, .. } => self.expr(operand),
            Expr::Binary { left, right, .. } => {
                self.expr(left);
                self.expr(right);
            }
            Expr::Conditional {
                test,
                consequent,
                alternate,
            } => {
                self.expr(test);
                self.expr(consequent);
                self.expr(alternate);
            }
            Expr::Element(element) => self.element(element),
            Expr::Function(source) => {
                for name in opaque_references(source) {
                    self.add(&name);
                }
            }
            Expr::String(_)
            | Expr::Number(_)
            | Expr::Bool(_)
            | Expr::Null
            | Expr::Undefined
            | Expr::This => {}
        }
    }

    fn items(&mut self, items: &[ArrayItem]) {
        for item in items {
            match item {
                ArrayItem::Item(e) | ArrayItem::Spread(e) => self.expr(e),
            }
        }
    }

    fn element(&mut self, element: &JsxElement) {
        if let Some(name) = &element.name {
            if !name.is_intrinsic() {
                self.add(name.root());
            }
        }
        for attr in &element.attributes {
            match attr {
                JsxAttr::Named { value: Some(v), .. } => self.expr(v),
                JsxAttr::Named { value: None, .. } => {}
                JsxAttr::Spread(v) => self.expr(v),
            }
        }
        for child in &element.children {
            match child {
                JsxChild::Text(_) => {}
                JsxChild::Expr(e) => self.expr(e),
                JsxChild::Element(el) => self.element(el),
            }
        }
    }
}

fn class_identifiers(class: &ClassDecl) -> Vec<String> {
    let mut collector = Collector::default();
    if let Some(root) = class.base.first() {
        collector.add(root);
    }
    for name in opaque_references(&class.body) {
        if name != class.name {
            collector.add(&name);
        }
    }
    collector.names
}

/// Free identifiers of a JSX element found inside opaque source
pub(crate) fn element_identifiers(element: &JsxElement) -> Vec<String> {
    let mut collector = Collector::default();
    collector.element(element);
    collector.names
}

/// Free identifiers of a fragment in first-appearance order
pub fn free_identifiers(fragment: &Fragment) -> Vec<String> {
    match fragment {
        Fragment::Expression(expr) => {
            let mut collector = Collector::default();
            collector.expr(expr);
            collector.names
        }
        Fragment::Class(class) => class_identifiers(class),
    }
}
