//! Stories generated from parsed component READMEs.

use std::sync::Arc;

use tracing::{debug, warn};

use super::layout::{all_examples_layout, decorate};
use super::story::{story_id, Story};
use crate::error::{BindError, RenderError};
use crate::fragment::BoundExample;
use crate::readme::ComponentReadme;
use crate::render::{Component, Node, Scope};

/// An example bound to the library scope
#[derive(Debug, Clone, PartialEq)]
pub struct HydratedExample {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub bound: BoundExample,
}

/// A component whose examples are ready to render
#[derive(Debug, Clone, PartialEq)]
pub struct HydratedComponent {
    pub name: String,
    pub slug: String,
    pub examples: Vec<HydratedExample>,
}

/// Bind every example of `readme` that has code.
///
/// Binding failures are not recovered: the first one is returned.
pub fn hydrate(readme: &ComponentReadme, scope: &Scope) -> Result<HydratedComponent, BindError> {
    let mut examples = Vec::with_capacity(readme.examples.len());
    for example in &readme.examples {
        let Some(code) = &example.code else {
            warn!(
                component = %readme.name,
                example = %example.name,
                "Skipping example without code"
            );
            continue;
        };
        let bound = code.invoke(scope)?;
        examples.push(HydratedExample {
            name: example.name.clone(),
            slug: example.slug.clone(),
            description: example.description.clone(),
            bound,
        });
    }

    debug!(
        component = %readme.name,
        examples = examples.len(),
        "Hydrated component examples"
    );

    Ok(HydratedComponent {
        name: readme.name.clone(),
        slug: readme.slug.clone(),
        examples,
    })
}

/// A single example
pub struct ExampleStory {
    id: String,
    name: String,
    category: String,
    notes: String,
    example: BoundExample,
    decorators: Arc<Vec<Component>>,
}

impl ExampleStory {
    pub fn new(
        component: &str,
        example: &HydratedExample,
        decorators: Arc<Vec<Component>>,
    ) -> Self {
        Self {
            id: story_id(component, &example.name),
            name: example.name.clone(),
            category: component.to_string(),
            notes: example.description.clone(),
            example: example.bound.clone(),
            decorators,
        }
    }
}

impl Story for ExampleStory {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn render(&self) -> Result<Node, RenderError> {
        decorate(self.example.render()?, &self.decorators)
    }

    fn notes(&self) -> Option<&str> {
        if self.notes.is_empty() {
            None
        } else {
            Some(&self.notes)
        }
    }
}

/// Every example of a component stacked in one preview
pub struct AllExamplesStory {
    id: String,
    name: String,
    category: String,
    examples: Vec<BoundExample>,
    min_height_px: u32,
    decorators: Arc<Vec<Component>>,
}

impl AllExamplesStory {
    pub fn new(
        component: &HydratedComponent,
        name: &str,
        min_height_px: u32,
        decorators: Arc<Vec<Component>>,
    ) -> Self {
        Self {
            id: story_id(&component.name, name),
            name: name.to_string(),
            category: component.name.clone(),
            examples: component.examples.iter().map(|e| e.bound.clone()).collect(),
            min_height_px,
            decorators,
        }
    }
}

impl Story for AllExamplesStory {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn render(&self) -> Result<Node, RenderError> {
        let rendered = self
            .examples
            .iter()
            .map(BoundExample::render)
            .collect::<Result<Vec<_>, _>>()?;
        decorate(
            all_examples_layout(rendered, self.min_height_px),
            &self.decorators,
        )
    }
}
