//! Configuration module - storybook build settings
//!
//! This module provides functionality for:
//! - Loading configuration from a JSON file
//! - Default values for all settings
//! - Deriving parser, registry and scope settings from the config
//!
//! # Module Structure
//!
//! - `defaults` - All default constant values
//! - `types` - The `Config` struct
//! - `loader` - File system loading and parsing

mod defaults;
mod loader;
mod types;

pub use defaults::DEFAULT_README_GLOB;

pub use types::Config;

pub use loader::{default_config_path, load_config};

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
