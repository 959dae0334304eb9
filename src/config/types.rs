//! Configuration type definitions

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::defaults::*;
use crate::readme::ReadmeOptions;
use crate::render::{Component, LibrarySurface, Scope, Value};
use crate::storybook::RegistryOptions;

// ============================================
// MAIN CONFIG
// ============================================

/// Storybook build settings, read from a camelCase JSON file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Platform id examples are filtered for (default: "web")
    #[serde(default = "default_platform")]
    pub platform: String,
    /// Code fence language holding examples (default: "jsx")
    #[serde(default = "default_language")]
    pub language: String,
    /// README glob relative to the component root (default: "**/README.md")
    #[serde(default = "default_readme_glob")]
    pub readme_glob: String,
    /// Minimum height of each example in the aggregate story (default: 720)
    #[serde(default = "default_example_min_height_px")]
    pub example_min_height_px: u32,
    /// Name of the aggregate story (default: "All Examples")
    #[serde(default = "default_aggregate_story_name")]
    pub aggregate_story_name: String,
    /// Exported identifiers of the component library, dotted for statics (`Card.Section`)
    #[serde(default)]
    pub library: Vec<String>,
    /// Components wrapping every story, outermost last
    #[serde(default)]
    pub decorators: Vec<String>,
    /// Reject examples referencing anything outside `library` at compile time
    #[serde(default)]
    pub strict_surface: bool,
}

fn default_platform() -> String {
    DEFAULT_CONFIG_PLATFORM.to_string()
}
fn default_language() -> String {
    DEFAULT_CONFIG_LANGUAGE.to_string()
}
fn default_readme_glob() -> String {
    DEFAULT_README_GLOB.to_string()
}
fn default_example_min_height_px() -> u32 {
    DEFAULT_MIN_HEIGHT_PX
}
fn default_aggregate_story_name() -> String {
    DEFAULT_AGGREGATE_NAME.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            platform: default_platform(),
            language: default_language(),
            readme_glob: default_readme_glob(),
            example_min_height_px: DEFAULT_MIN_HEIGHT_PX,
            aggregate_story_name: default_aggregate_story_name(),
            library: Vec::new(),
            decorators: Vec::new(),
            strict_surface: false,
        }
    }
}

impl Config {
    /// Scope examples are bound against: library stubs, decorators and `React`
    pub fn scope(&self) -> Scope {
        Scope::from_library(self.library.iter().chain(&self.decorators)).with_react()
    }

    /// Identifiers examples may reference
    pub fn surface(&self) -> LibrarySurface {
        self.scope().surface()
    }

    pub fn readme_options(&self) -> ReadmeOptions {
        ReadmeOptions {
            platform: self.platform.clone(),
            language: self.language.clone(),
            surface: self.strict_surface.then(|| self.surface()),
        }
    }

    pub fn registry_options(&self) -> RegistryOptions {
        RegistryOptions {
            aggregate_story_name: self.aggregate_story_name.clone(),
            example_min_height_px: self.example_min_height_px,
        }
    }

    /// Resolve `decorators` against `scope`, skipping names that are not components
    pub fn decorator_components(&self, scope: &Scope) -> Vec<Component> {
        self.decorators
            .iter()
            .filter_map(|name| match resolve_path(scope, name) {
                Some(Value::Component(component)) => Some(component),
                _ => {
                    warn!(decorator = %name, "Decorator is not a component in scope, skipping");
                    None
                }
            })
            .collect()
    }
}

fn resolve_path(scope: &Scope, path: &str) -> Option<Value> {
    let mut segments = path.split('.');
    let mut value = scope.get(segments.next()?)?.clone();
    for segment in segments {
        value = value.get_property(segment).ok()?;
    }
    Some(value)
}
