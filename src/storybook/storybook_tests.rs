use super::*;
use crate::error::{BindError, RenderError, StorybookError};
use crate::readme::{parse_readme, ComponentReadme, ReadmeOptions};
use crate::render::{Component, Node, Scope};

const CARD_README: &str = "---\nname: Callout card\n---\n\nIntro\n\n---\n\n## Examples\n\n### Basic card\n\nUse to call out a feature.\n\n```jsx\n<CalloutCard title=\"Setup\">Ready</CalloutCard>\n```\n\n### Dismissible card\n\n```jsx\n<CalloutCard onDismiss={() => {}}>Later</CalloutCard>\n```\n";

fn card_readme() -> ComponentReadme {
    parse_readme(CARD_README, &ReadmeOptions::default()).unwrap()
}

fn scope() -> Scope {
    Scope::from_library(["CalloutCard", "AppProvider"]).with_react()
}

fn catalog() -> StoryCatalog {
    let component = hydrate(&card_readme(), &scope()).unwrap();
    let mut registry = StoryRegistry::new();
    registry.register_component(&component);
    registry.finish()
}

#[test]
fn test_hydrate_binds_every_example() {
    let component = hydrate(&card_readme(), &scope()).unwrap();
    assert_eq!(component.name, "Callout card");
    assert_eq!(component.examples.len(), 2);
    assert_eq!(component.examples[0].description, "Use to call out a feature.");
}

#[test]
fn test_hydrate_propagates_binding_failures() {
    let err = hydrate(&card_readme(), &Scope::new()).unwrap_err();
    assert_eq!(err, BindError::Unresolved(vec!["CalloutCard".into()]));
}

#[test]
fn test_hydrate_skips_examples_without_code() {
    let source = "---\nname: Card\n---\nIntro\n---\n## Examples\n### Prose\ntext\n### Code\n```jsx\n<Card />\n```\n";
    let readme = parse_readme(source, &ReadmeOptions::default()).unwrap();
    let component = hydrate(&readme, &Scope::from_library(["Card"])).unwrap();
    let names: Vec<&str> = component.examples.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Code"]);
}

#[test]
fn test_register_component_adds_aggregate_first() {
    let catalog = catalog();
    let ids: Vec<&str> = catalog.all_stories().map(|e| e.story.id()).collect();
    assert_eq!(
        ids,
        vec![
            "callout-card--all-examples",
            "callout-card--basic-card",
            "callout-card--dismissible-card",
        ]
    );
    assert!(catalog.all_stories().all(|e| e.story.category() == "Callout card"));
}

#[test]
fn test_example_story_notes_are_descriptions() {
    let catalog = catalog();
    let basic = catalog.find("callout-card--basic-card").unwrap();
    assert_eq!(basic.story.notes(), Some("Use to call out a feature."));
    let dismissible = catalog.find("callout-card--dismissible-card").unwrap();
    assert_eq!(dismissible.story.notes(), None);
}

#[test]
fn test_component_without_examples_registers_nothing() {
    let source = "---\nname: Modal\nhidePlayground: true\n---\n";
    let readme = parse_readme(source, &ReadmeOptions::default()).unwrap();
    let component = hydrate(&readme, &scope()).unwrap();
    let mut registry = StoryRegistry::new();
    assert_eq!(registry.register_component(&component), 0);
    assert!(registry.is_empty());
}

#[test]
fn test_render_single_example() {
    let node = catalog().render("callout-card--basic-card").unwrap();
    assert_eq!(node.to_string(), r#"<CalloutCard title="Setup">Ready</CalloutCard>"#);
}

#[test]
fn test_render_all_examples_layout() {
    let node = catalog().render("callout-card--all-examples").unwrap();
    assert_eq!(
        node.to_string(),
        concat!(
            r#"<><div style={{minHeight: "720px"}}><CalloutCard title="Setup">Ready</CalloutCard></div><hr />"#,
            r#"<div style={{minHeight: "720px"}}><CalloutCard onDismiss={() => {}}>Later</CalloutCard></div><hr /></>"#
        )
    );
}

#[test]
fn test_options_change_aggregate_name_and_height() {
    let component = hydrate(&card_readme(), &scope()).unwrap();
    let mut registry = StoryRegistry::with_options(RegistryOptions {
        aggregate_story_name: "Overview".to_string(),
        example_min_height_px: 400,
    });
    registry.register_component(&component);
    let catalog = registry.finish();
    let node = catalog.render("callout-card--overview").unwrap();
    assert!(node.to_string().contains(r#"minHeight: "400px""#));
}

#[test]
fn test_decorators_wrap_every_story() {
    let component = hydrate(&card_readme(), &scope()).unwrap();
    let mut registry = StoryRegistry::new();
    registry.add_decorator(Component::host("AppProvider"));
    registry.register_component(&component);
    let catalog = registry.finish();

    for entry in catalog.all_stories() {
        let node = entry.story.render().unwrap();
        assert_eq!(node.tag(), Some("AppProvider"), "story {}", entry.story.id());
    }
}

#[test]
fn test_render_failures_propagate() {
    let source = "---\nname: Card\n---\nIntro\n---\n## Examples\n### Broken\n```jsx\n<Card.Header />\n```\n";
    let readme = parse_readme(source, &ReadmeOptions::default()).unwrap();
    let component = hydrate(&readme, &Scope::from_library(["Card"])).unwrap();
    let mut registry = StoryRegistry::new();
    registry.register_component(&component);
    let catalog = registry.finish();

    let err = catalog.render("card--broken").unwrap_err();
    assert!(matches!(
        err,
        StorybookError::Render(RenderError::NotAComponent(ref name)) if name == "Card.Header"
    ));
}

#[test]
fn test_unknown_story_id() {
    let err = catalog().render("nope--nothing").unwrap_err();
    assert!(matches!(err, StorybookError::StoryNotFound(_)));
}

#[test]
fn test_categories_and_search() {
    let card = hydrate(&card_readme(), &scope()).unwrap();
    let badge_readme = parse_readme(
        "---\nname: Badge\n---\n## Examples\n### Default\n```jsx\n<Badge>New</Badge>\n```\n",
        &ReadmeOptions::default(),
    )
    .unwrap();
    let badge = hydrate(&badge_readme, &Scope::from_library(["Badge"])).unwrap();

    let mut registry = StoryRegistry::new();
    registry.register_component(&card);
    registry.register_component(&badge);
    let catalog = registry.finish();

    assert_eq!(catalog.len(), 5);
    assert_eq!(catalog.all_categories(), vec!["Badge", "Callout card"]);
    assert_eq!(catalog.stories_by_category("Badge").len(), 2);
    assert_eq!(catalog.search("dismiss").len(), 1);
    assert_eq!(catalog.search("BADGE").len(), 2);
    assert_eq!(catalog.search("").len(), 5);
}

#[test]
fn test_class_examples_render_as_mount_points() {
    let source = "---\nname: Modal\n---\n## Examples\n### Basic modal\n```jsx\nclass ModalExample extends React.Component {\n  render() {\n    return <Modal open />;\n  }\n}\n```\n";
    let readme = parse_readme(source, &ReadmeOptions::default()).unwrap();
    let component = hydrate(&readme, &Scope::from_library(["Modal"]).with_react()).unwrap();
    let mut registry = StoryRegistry::new();
    registry.register_component(&component);
    let node = registry.finish().render("modal--basic-modal").unwrap();
    assert!(matches!(node, Node::Mount { ref class, .. } if class == "ModalExample"));
}
