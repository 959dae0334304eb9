//! Storybook - preview entries generated from component READMEs
//!
//! # Components
//!
//! - [`Story`] - Trait for a previewable entry
//! - [`hydrate`] - Binds a parsed README's examples to the library scope
//! - [`StoryRegistry`] - Builder that registers stories per component
//! - [`StoryCatalog`] - Immutable result for listing and rendering
//!
//! # Usage
//!
//! ```ignore
//! use polaris_stories::readme::{parse_readme, ReadmeOptions};
//! use polaris_stories::render::{Component, Scope};
//! use polaris_stories::storybook::{hydrate, StoryRegistry};
//!
//! let scope = Scope::from_library(["Badge", "AppProvider"]).with_react();
//! let readme = parse_readme(&source, &ReadmeOptions::default())?;
//!
//! let mut registry = StoryRegistry::new();
//! registry.add_decorator(Component::host("AppProvider"));
//! registry.register_component(&hydrate(&readme, &scope)?);
//!
//! let catalog = registry.finish();
//! println!("{}", catalog.render("badge--all-examples")?);
//! ```

mod generator;
mod layout;
mod registry;
mod story;

#[cfg(test)]
#[path = "storybook_tests.rs"]
mod storybook_tests;

pub use generator::{hydrate, AllExamplesStory, ExampleStory, HydratedComponent, HydratedExample};
pub use layout::{
    all_examples_layout, decorate, example_frame, story_divider, DEFAULT_EXAMPLE_MIN_HEIGHT_PX,
};
pub use registry::{
    RegistryOptions, StoryCatalog, StoryEntry, StoryRegistry, DEFAULT_AGGREGATE_STORY_NAME,
};
pub use story::{story_id, Story};
