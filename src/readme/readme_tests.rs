use super::*;
use crate::render::{Node, Props, Scope};

fn parse(source: &str) -> ComponentReadme {
    parse_readme(source, &ReadmeOptions::default()).unwrap()
}

const BADGE_README: &str = r#"---
name: Badge
category: Feedback indicators
keywords:
  - status
---

# Badge

Badges indicate the status of an object.

---

## Best practices

Keep labels short.

---

## Examples

Badges come in several tones.

### Default badge

Use to give a non-critical status update.

```jsx
<Badge>Fulfilled</Badge>
```

### Success badge

```jsx
<Badge status="success">Paid</Badge>
```

<!-- example-for: web -->

### Native badge

<!-- example-for: ios, android -->

```swift
Badge(status: .success)
```

---

## Related components

- Use [tags](/components/forms/tag) for removable labels.
"#;

#[test]
fn test_parses_name_slug_and_web_examples() {
    let readme = parse(BADGE_README);
    assert_eq!(readme.name, "Badge");
    assert_eq!(readme.slug, "badge");

    let names: Vec<&str> = readme.examples.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Default badge", "Success badge"]);
    assert!(readme.examples.iter().all(|e| e.code.is_some()));
    assert!(readme.warnings().next().is_none());

    let first = &readme.examples[0];
    assert_eq!(first.slug, "default-badge");
    assert_eq!(first.description, "Use to give a non-critical status update.");
    assert_eq!(
        first.code.as_ref().map(|c| c.source()),
        Some("<Badge>Fulfilled</Badge>")
    );
}

#[test]
fn test_description_drops_platform_marker() {
    let readme = parse(BADGE_README);
    assert_eq!(readme.examples[1].description, "");
}

#[test]
fn test_n_headings_with_code_give_n_examples() {
    for n in 1..=4 {
        let mut source = String::from("---\nname: Card\n---\n\nIntro\n\n---\n\n## Examples\n");
        for i in 0..n {
            source.push_str(&format!("\n### Example {}\n\n```jsx\n<Card>{}</Card>\n```\n", i, i));
        }
        let readme = parse(&source);
        assert_eq!(readme.examples.len(), n);
        assert!(readme.examples.iter().all(|e| e.code.is_some()));
    }
}

#[test]
fn test_platforms_without_web_yield_no_examples() {
    let source = BADGE_README.replace("name: Badge", "name: Badge\nplatforms: [ios, android]");
    let readme = parse(&source);
    assert!(readme.examples.is_empty());
    assert_eq!(readme.diagnostics.len(), 1);
    assert_eq!(readme.diagnostics[0].severity, ErrorSeverity::Info);
    assert_eq!(
        readme.diagnostics[0].message,
        "Component examples are ignored (platforms: ios,android)"
    );
}

#[test]
fn test_platforms_including_web_keep_examples() {
    let source = BADGE_README.replace("name: Badge", "name: Badge\nplatforms: [web, ios]");
    assert_eq!(parse(&source).examples.len(), 2);
}

#[test]
fn test_hide_playground_yields_no_examples() {
    let source = BADGE_README.replace("name: Badge", "name: Badge\nhidePlayground: true");
    let readme = parse(&source);
    assert!(readme.examples.is_empty());
    assert_eq!(
        readme.diagnostics[0].message,
        "Component examples are ignored (hidePlayground: true)"
    );
}

#[test]
fn test_example_for_web_and_ios_is_included() {
    let source = "---\nname: Button\n---\nIntro\n---\n## Examples\n### Shared\n<!-- example-for: web, ios -->\n```jsx\n<Button />\n```\n### Mobile\n<!-- example-for: ios, android -->\n```jsx\n<Button />\n```\n";
    let readme = parse(source);
    let names: Vec<&str> = readme.examples.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Shared"]);
}

#[test]
fn test_other_platform_option() {
    let options = ReadmeOptions {
        platform: "ios".to_string(),
        language: "swift".to_string(),
        surface: None,
    };
    let readme = parse_readme(BADGE_README, &options).unwrap();
    let names: Vec<&str> = readme.examples.iter().map(|e| e.name.as_str()).collect();
    // the two web examples have no swift fence, the native one fails to parse as JSX
    assert_eq!(names, vec!["Default badge", "Native badge"]);
    assert!(readme.examples.iter().all(|e| e.code.is_none()));
}

#[test]
fn test_examples_heading_without_intro() {
    let source = "---\nname: Badge\n---\n## Examples\n### Basic\n```jsx\n<Badge>Hi</Badge>\n```\n";
    let readme = parse(source);
    assert_eq!(readme.examples.len(), 1);
    assert_eq!(readme.examples[0].name, "Basic");

    let bound = readme.examples[0]
        .code
        .as_ref()
        .unwrap()
        .invoke(&Scope::from_library(["Badge"]))
        .unwrap();
    assert_eq!(
        bound.render().unwrap(),
        Node::element("Badge", Props::new(), vec![Node::text("Hi")])
    );
}

#[test]
fn test_no_examples_section_warns() {
    let readme = parse("---\nname: Layout\n---\nIntro\n---\n## Best practices\n");
    assert!(readme.examples.is_empty());
    let messages: Vec<&str> = readme.warnings().map(|d| d.message.as_str()).collect();
    assert_eq!(
        messages,
        vec!["No examples found.", "At least one react example expected"]
    );
}

#[test]
fn test_example_without_code_is_kept_and_reported() {
    let source = "---\nname: Card\n---\nIntro\n---\n## Examples\n### With code\n```jsx\n<Card />\n```\n### Prose only\nJust words.\n";
    let readme = parse(source);
    assert_eq!(readme.examples.len(), 2);
    assert!(readme.examples[1].code.is_none());
    assert_eq!(readme.examples[1].description, "Just words.");
    let messages: Vec<&str> = readme.warnings().map(|d| d.message.as_str()).collect();
    assert_eq!(messages, vec!["Example “Prose only” is missing a React example"]);
}

#[test]
fn test_no_code_anywhere_warns_once_plus_per_example() {
    let source = "---\nname: Card\n---\nIntro\n---\n## Examples\n### One\ntext\n### Two\ntext\n";
    let readme = parse(source);
    let messages: Vec<&str> = readme.warnings().map(|d| d.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "At least one react example expected",
            "Example “One” is missing a React example",
            "Example “Two” is missing a React example",
        ]
    );
}

#[test]
fn test_compile_failure_is_a_warning_not_an_error() {
    let source = "---\nname: Card\n---\nIntro\n---\n## Examples\n### Broken\n```jsx\n<Card>\n```\n";
    let readme = parse(source);
    assert_eq!(readme.examples.len(), 1);
    assert!(readme.examples[0].code.is_none());
    assert!(readme
        .warnings()
        .any(|d| d.message.starts_with("Example “Broken” does not compile")));
}

#[test]
fn test_surface_check_applies_during_parse() {
    let options = ReadmeOptions {
        surface: Some(LibrarySurface::from_names(["Card"])),
        ..ReadmeOptions::default()
    };
    let source = "---\nname: Card\n---\nIntro\n---\n## Examples\n### Ok\n```jsx\n<Card />\n```\n### Unknown\n```jsx\n<Spinner />\n```\n";
    let readme = parse_readme(source, &options).unwrap();
    assert!(readme.examples[0].code.is_some());
    assert!(readme.examples[1].code.is_none());
}

#[test]
fn test_missing_name_is_an_error() {
    let result = parse_readme("---\ncategory: x\n---\nBody", &ReadmeOptions::default());
    assert!(matches!(result, Err(ReadmeError::MissingName)));
}

#[test]
fn test_malformed_frontmatter_is_an_error() {
    let result = parse_readme("---\nname: [oops\n---\n", &ReadmeOptions::default());
    assert!(matches!(result, Err(ReadmeError::Frontmatter(_))));
}

#[test]
fn test_slugify() {
    assert_eq!(slugify("Account connection"), "account-connection");
    assert_eq!(slugify("Don’t   panic\tnow"), "dont-panic-now");
    assert_eq!(slugify("CalloutCard"), "calloutcard");
}
