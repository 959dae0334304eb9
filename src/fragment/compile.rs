use std::sync::Arc;

use tracing::debug;

use super::analysis::free_identifiers;
use super::ast::{ClassDecl, Expr, Fragment};
use super::parser::parse_fragment_with_end;
use crate::error::{BindError, CompileError, RenderError};
use crate::render::{value_to_node, Component, Evaluator, LibrarySurface, Node, Scope, Value};

/// What a fragment evaluates to once bound
#[derive(Debug, Clone, PartialEq)]
pub enum FragmentKind {
    /// Standalone render expression; binding yields a deferred thunk
    Render(Arc<Expr>),
    /// Class component definition; binding yields the class itself
    Class(ClassDecl),
}

/// An example fragment that parsed and passed the identifier check.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledExample {
    source: String,
    /// Source up to the fragment's last token
    body: String,
    kind: FragmentKind,
    free_identifiers: Vec<String>,
}

/// Compile an example fragment.
///
/// When a `surface` is given, every free identifier must be declared by it;
/// otherwise the example is rejected here instead of failing at render time.
pub fn compile_fragment(
    code: &str,
    surface: Option<&LibrarySurface>,
) -> Result<CompiledExample, CompileError> {
    let (fragment, end) = parse_fragment_with_end(code)?;
    let identifiers = free_identifiers(&fragment);

    if let Some(surface) = surface {
        let unknown = surface.unknown(&identifiers);
        if !unknown.is_empty() {
            return Err(CompileError::UnknownIdentifiers(unknown));
        }
    }

    let kind = match fragment {
        Fragment::Expression(expr) => FragmentKind::Render(Arc::new(expr)),
        Fragment::Class(class) => FragmentKind::Class(class),
    };

    debug!(
        class = matches!(kind, FragmentKind::Class(_)),
        identifiers = ?identifiers,
        "Compiled example fragment"
    );

    Ok(CompiledExample {
        source: code.trim().to_string(),
        body: code[..end].trim().to_string(),
        kind,
        free_identifiers: identifiers,
    })
}

impl CompiledExample {
    /// Fragment source as written in the README
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn kind(&self) -> &FragmentKind {
        &self.kind
    }

    pub fn is_class(&self) -> bool {
        matches!(self.kind, FragmentKind::Class(_))
    }

    pub fn class_name(&self) -> Option<&str> {
        match &self.kind {
            FragmentKind::Class(class) => Some(&class.name),
            FragmentKind::Render(_) => None,
        }
    }

    /// Names the scope must provide, in first-appearance order
    pub fn free_identifiers(&self) -> &[String] {
        &self.free_identifiers
    }

    /// JavaScript for the example's `code` export.
    ///
    /// The wrapper takes the scope as its only argument and destructures the
    /// free identifiers from it.
    pub fn wrapper_source(&self) -> String {
        let mut out = String::from("function (scope) {\n");
        if !self.free_identifiers.is_empty() {
            out.push_str(&format!(
                "  const {{{}}} = scope;\n",
                self.free_identifiers.join(", ")
            ));
        }

        match &self.kind {
            FragmentKind::Render(_) => {
                out.push_str("  return function () {\n    return (\n");
                out.push_str(&indent(&self.body, 6));
                out.push_str("\n    );\n  };\n");
            }
            FragmentKind::Class(class) => {
                out.push_str(&indent(&class.source, 2));
                out.push_str(&format!("\n  return {};\n", class.name));
            }
        }

        out.push('}');
        out
    }

    /// Bind the example to `scope`.
    ///
    /// Fails with every free identifier the scope does not provide. Render
    /// fragments come back deferred; class fragments come back as the class.
    pub fn invoke(&self, scope: &Scope) -> Result<BoundExample, BindError> {
        let missing = scope.missing(&self.free_identifiers);
        if !missing.is_empty() {
            return Err(BindError::Unresolved(missing));
        }
        let bindings = scope.subset(&self.free_identifiers);

        match &self.kind {
            FragmentKind::Render(expr) => Ok(BoundExample::Render(RenderThunk {
                expr: Arc::clone(expr),
                scope: bindings,
            })),
            FragmentKind::Class(class) => {
                let base = resolve_base(class, &bindings)?;
                Ok(BoundExample::Class(ClassRef {
                    name: class.name.clone(),
                    base,
                    source: class.source.clone(),
                    scope: bindings,
                }))
            }
        }
    }
}

fn resolve_base(class: &ClassDecl, scope: &Scope) -> Result<Component, BindError> {
    let invalid = || BindError::InvalidBase(class.base_path());
    let (root, members) = class.base.split_first().ok_or_else(invalid)?;
    let mut value = scope.get(root).cloned().ok_or_else(invalid)?;
    for member in members {
        value = value.get_property(member).map_err(|_| invalid())?;
    }
    match value {
        Value::Component(component) => Ok(component),
        _ => Err(invalid()),
    }
}

fn indent(text: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    text.lines()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("{}{}", pad, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// A compiled example bound to a scope
#[derive(Debug, Clone, PartialEq)]
pub enum BoundExample {
    Render(RenderThunk),
    Class(ClassRef),
}

impl BoundExample {
    /// Render the example; class components become a mount point
    pub fn render(&self) -> Result<Node, RenderError> {
        match self {
            BoundExample::Render(thunk) => thunk.render(),
            BoundExample::Class(class) => Ok(class.mount()),
        }
    }
}

/// Deferred render expression with its bindings
#[derive(Debug, Clone, PartialEq)]
pub struct RenderThunk {
    expr: Arc<Expr>,
    scope: Scope,
}

impl RenderThunk {
    pub fn render(&self) -> Result<Node, RenderError> {
        let value = Evaluator::new(&self.scope).eval(&self.expr)?;
        value_to_node(value)
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }
}

/// A class component defined by an example
#[derive(Debug, Clone, PartialEq)]
pub struct ClassRef {
    name: String,
    base: Component,
    source: String,
    scope: Scope,
}

impl ClassRef {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base(&self) -> &Component {
        &self.base
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn mount(&self) -> Node {
        Node::Mount {
            class: self.name.clone(),
            source: self.source.clone(),
        }
    }
}
