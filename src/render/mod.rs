//! Runtime side of example previews.
//!
//! A compiled example is bound to a [`Scope`] of library values and rendered
//! into a [`Node`] tree, which prints as markup.

mod component;
pub mod eval;
mod node;
mod scope;
mod value;

pub use component::{Component, RenderFn};
pub use eval::{value_to_node, Evaluator};
pub use node::{Node, Props};
pub use scope::{LibrarySurface, Scope};
pub use value::{format_number, Value};
