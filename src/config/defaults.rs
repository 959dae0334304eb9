//! Default configuration values
//!
//! All constants used throughout the config module are defined here.

use crate::readme::{DEFAULT_LANGUAGE, DEFAULT_PLATFORM};
use crate::storybook::{DEFAULT_AGGREGATE_STORY_NAME, DEFAULT_EXAMPLE_MIN_HEIGHT_PX};

/// Platform id examples are filtered for
pub const DEFAULT_CONFIG_PLATFORM: &str = DEFAULT_PLATFORM;

/// Code fence language holding examples
pub const DEFAULT_CONFIG_LANGUAGE: &str = DEFAULT_LANGUAGE;

/// Glob (relative to the component root) for README files
pub const DEFAULT_README_GLOB: &str = "**/README.md";

/// Minimum height of each example in the aggregate story
pub const DEFAULT_MIN_HEIGHT_PX: u32 = DEFAULT_EXAMPLE_MIN_HEIGHT_PX;

/// Name of the aggregate story
pub const DEFAULT_AGGREGATE_NAME: &str = DEFAULT_AGGREGATE_STORY_NAME;

/// Config file name under the user config directory
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Application directory name used for config and logs
pub const APP_DIR_NAME: &str = "polaris-stories";
