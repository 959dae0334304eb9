//! Polaris Stories - Storybook stories generated from component READMEs
//!
//! Component READMEs carry their examples as `jsx` code fences under an
//! `## Examples` section. This library parses those READMEs, compiles each
//! example into a scope-bound function and registers one story per example
//! plus an aggregate story per component.

pub mod config;
pub mod error;
pub mod logging;

// README parsing and example extraction
pub mod readme;

// Example fragment compiler
pub mod fragment;

// Runtime values, scope and render tree
pub mod render;

// Story registry and catalog
pub mod storybook;

// File discovery and module output
pub mod loader;
pub mod module;
