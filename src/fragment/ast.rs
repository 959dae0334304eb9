//! Syntax tree for example fragments.
//!
//! Covers the JSX and expression subset that component documentation uses.
//! Function bodies are not modelled: they are kept as source text.

use std::fmt;

/// A parsed example fragment
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// A standalone render expression, e.g. `<Badge>Hi</Badge>`
    Expression(Expr),
    /// `class Name extends Base { ... }`
    Class(ClassDecl),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: String,
    /// Base class path, e.g. `["React", "Component"]`
    pub base: Vec<String>,
    /// Class body including its braces
    pub body: String,
    /// Full declaration source
    pub source: String,
}

impl ClassDecl {
    pub fn base_path(&self) -> String {
        self.base.join(".")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    String(String),
    Number(f64),
    Bool(bool),
    Null,
    Undefined,
    This,
    Template(Vec<TemplatePart>),
    Ident(String),
    Member {
        object: Box<Expr>,
        property: String,
        optional: bool,
    },
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<ArrayItem>,
        construct: bool,
    },
    Array(Vec<ArrayItem>),
    Object(Vec<ObjectProp>),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },
    /// Arrow or `function` expression, kept as source text
    Function(String),
    Element(JsxElement),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TemplatePart {
    Str(String),
    Expr(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArrayItem {
    Item(Expr),
    Spread(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectProp {
    KeyValue(String, Expr),
    Shorthand(String),
    Spread(Expr),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
    Plus,
    TypeOf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Nullish,
    Or,
    And,
    Eq,
    NotEq,
    StrictEq,
    StrictNotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinaryOp {
    /// Binding power; higher binds tighter
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Nullish | BinaryOp::Or => 1,
            BinaryOp::And => 2,
            BinaryOp::Eq | BinaryOp::NotEq | BinaryOp::StrictEq | BinaryOp::StrictNotEq => 3,
            BinaryOp::Lt | BinaryOp::Gt | BinaryOp::LtEq | BinaryOp::GtEq => 4,
            BinaryOp::Add | BinaryOp::Sub => 5,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => 6,
        }
    }

    /// Operator tokens, longest first so that prefixes don't shadow them
    pub const TOKENS: &'static [(&'static str, BinaryOp)] = &[
        ("===", BinaryOp::StrictEq),
        ("!==", BinaryOp::StrictNotEq),
        ("??", BinaryOp::Nullish),
        ("||", BinaryOp::Or),
        ("&&", BinaryOp::And),
        ("==", BinaryOp::Eq),
        ("!=", BinaryOp::NotEq),
        ("<=", BinaryOp::LtEq),
        (">=", BinaryOp::GtEq),
        ("<", BinaryOp::Lt),
        (">", BinaryOp::Gt),
        ("+", BinaryOp::Add),
        ("-", BinaryOp::Sub),
        ("*", BinaryOp::Mul),
        ("/", BinaryOp::Div),
        ("%", BinaryOp::Rem),
    ];
}

/// `<Name attr={...}>children</Name>`; `name` is `None` for `<>...</>`
#[derive(Debug, Clone, PartialEq)]
pub struct JsxElement {
    pub name: Option<TagName>,
    pub attributes: Vec<JsxAttr>,
    pub children: Vec<JsxChild>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagName {
    pub segments: Vec<String>,
}

impl TagName {
    pub fn root(&self) -> &str {
        self.segments.first().map(String::as_str).unwrap_or("")
    }

    /// Lowercase single-segment names (`div`, `my-element`) are host elements
    pub fn is_intrinsic(&self) -> bool {
        self.segments.len() == 1
            && (self.root().starts_with(|c: char| c.is_ascii_lowercase()) || self.root().contains('-'))
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum JsxAttr {
    /// `name`, `name="text"`, `name={expr}` or `name=<El />`
    Named { name: String, value: Option<Expr> },
    /// `{...expr}`
    Spread(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub enum JsxChild {
    Text(String),
    Expr(Expr),
    Element(JsxElement),
}
