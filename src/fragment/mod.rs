//! Example compiler.
//!
//! Turns a JSX code fragment from a README into a [`CompiledExample`]:
//! the fragment is parsed, its free identifiers are collected, and binding
//! it to a [`Scope`](crate::render::Scope) supplies exactly those names.
//!
//! ```ignore
//! use polaris_stories::fragment::compile_fragment;
//! use polaris_stories::render::Scope;
//!
//! let example = compile_fragment("<Badge>Hi</Badge>", None)?;
//! let bound = example.invoke(&Scope::from_library(["Badge"]))?;
//! println!("{}", bound.render()?); // <Badge>Hi</Badge>
//! ```

mod analysis;
pub mod ast;
mod compile;
mod parser;
mod references;


pub use analysis::free_identifiers;
pub use compile::{
    compile_fragment, BoundExample, ClassRef, CompiledExample, FragmentKind, RenderThunk,
};
pub use parser::parse_fragment;
