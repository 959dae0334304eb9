//! Story registry
//!
//! Stories are collected into a [`StoryRegistry`] builder and frozen into an
//! immutable [`StoryCatalog`] for the tooling layer to list and render.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{info, warn};

use super::generator::{AllExamplesStory, ExampleStory, HydratedComponent};
use super::layout::DEFAULT_EXAMPLE_MIN_HEIGHT_PX;
use super::Story;
use crate::error::{Result, StorybookError};
use crate::render::{Component, Node};

/// Name of the aggregate story registered for every component
pub const DEFAULT_AGGREGATE_STORY_NAME: &str = "All Examples";

/// Entry for a registered story
pub struct StoryEntry {
    pub story: Box<dyn Story>,
}

impl StoryEntry {
    pub fn new(story: Box<dyn Story>) -> Self {
        Self { story }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegistryOptions {
    pub aggregate_story_name: String,
    pub example_min_height_px: u32,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            aggregate_story_name: DEFAULT_AGGREGATE_STORY_NAME.to_string(),
            example_min_height_px: DEFAULT_EXAMPLE_MIN_HEIGHT_PX,
        }
    }
}

/// Builder accumulating stories
#[derive(Default)]
pub struct StoryRegistry {
    options: RegistryOptions,
    decorators: Vec<Component>,
    entries: Vec<StoryEntry>,
    ids: HashSet<String>,
}

impl StoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: RegistryOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Wrap every story registered after this call in `decorator`
    pub fn add_decorator(&mut self, decorator: Component) -> &mut Self {
        self.decorators.push(decorator);
        self
    }

    /// Register one story
    pub fn add(&mut self, story: Box<dyn Story>) -> &mut Self {
        if !self.ids.insert(story.id().to_string()) {
            warn!(story_id = %story.id(), "Duplicate story id, lookups return the first");
        }
        self.entries.push(StoryEntry::new(story));
        self
    }

    /// Register the aggregate story and one story per example.
    ///
    /// Components without examples register nothing. Returns the number of
    /// stories added.
    pub fn register_component(&mut self, component: &HydratedComponent) -> usize {
        if component.examples.is_empty() {
            return 0;
        }

        let decorators = Arc::new(self.decorators.clone());
        self.add(Box::new(AllExamplesStory::new(
            component,
            &self.options.aggregate_story_name,
            self.options.example_min_height_px,
            Arc::clone(&decorators),
        )));
        for example in &component.examples {
            self.add(Box::new(ExampleStory::new(
                &component.name,
                example,
                Arc::clone(&decorators),
            )));
        }

        let added = component.examples.len() + 1;
        info!(component = %component.name, stories = added, "Registered component stories");
        added
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn finish(self) -> StoryCatalog {
        StoryCatalog {
            entries: self.entries,
        }
    }
}

/// Immutable collection of registered stories, in registration order
pub struct StoryCatalog {
    entries: Vec<StoryEntry>,
}

impl StoryCatalog {
    pub fn all_stories(&self) -> impl Iterator<Item = &StoryEntry> {
        self.entries.iter()
    }

    pub fn find(&self, id: &str) -> Option<&StoryEntry> {
        self.entries.iter().find(|e| e.story.id() == id)
    }

    /// Find stories by category
    pub fn stories_by_category(&self, category: &str) -> Vec<&StoryEntry> {
        self.all_stories()
            .filter(|e| e.story.category() == category)
            .collect()
    }

    /// Get unique categories
    pub fn all_categories(&self) -> Vec<&str> {
        let mut categories: Vec<_> = self.all_stories().map(|e| e.story.category()).collect();
        categories.sort();
        categories.dedup();
        categories
    }

    /// Case-insensitive match on story name or category
    pub fn search(&self, filter: &str) -> Vec<&StoryEntry> {
        if filter.is_empty() {
            return self.all_stories().collect();
        }
        let filter_lower = filter.to_lowercase();
        self.all_stories()
            .filter(|s| {
                s.story.name().to_lowercase().contains(&filter_lower)
                    || s.story.category().to_lowercase().contains(&filter_lower)
            })
            .collect()
    }

    pub fn render(&self, id: &str) -> Result<Node> {
        let entry = self
            .find(id)
            .ok_or_else(|| StorybookError::StoryNotFound(id.to_string()))?;
        Ok(entry.story.render()?)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
