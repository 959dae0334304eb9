//! ES module output for a parsed README.
//!
//! The readme is serialized as JSON with each example's `code` replaced by a
//! placeholder string; the placeholders are then swapped for the example's
//! wrapper function, which JSON cannot represent.

use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::Serialize;

use crate::readme::ComponentReadme;

const PLACEHOLDER_PREFIX: &str = "___CODEPLACEHOLDER__";

#[derive(Serialize)]
struct ModuleReadme<'a> {
    name: &'a str,
    slug: &'a str,
    examples: Vec<ModuleExample<'a>>,
}

#[derive(Serialize)]
struct ModuleExample<'a> {
    name: &'a str,
    slug: &'a str,
    code: Option<String>,
    description: &'a str,
}

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#""___CODEPLACEHOLDER__(\d+)___""#).expect("Invalid regex"))
}

/// Render `readme` as `export const component = {...};`
pub fn emit_module(readme: &ComponentReadme) -> Result<String, serde_json::Error> {
    let data = ModuleReadme {
        name: &readme.name,
        slug: &readme.slug,
        examples: readme
            .examples
            .iter()
            .enumerate()
            .map(|(index, example)| ModuleExample {
                name: &example.name,
                slug: &example.slug,
                code: example
                    .code
                    .as_ref()
                    .map(|_| format!("{}{}___", PLACEHOLDER_PREFIX, index)),
                description: &example.description,
            })
            .collect(),
    };

    let json = serde_json::to_string_pretty(&data)?;
    let with_code = placeholder_regex().replace_all(&json, |captures: &Captures| {
        captures[1]
            .parse::<usize>()
            .ok()
            .and_then(|index| readme.examples.get(index))
            .and_then(|example| example.code.as_ref())
            .map(|code| code.wrapper_source())
            .unwrap_or_else(|| "null".to_string())
    });

    Ok(format!("export const component = {};\n", with_code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readme::{parse_readme, ReadmeOptions};

    #[test]
    fn test_emit_module_inlines_wrappers() {
        let source = "---\nname: Badge\n---\n## Examples\n### Basic\nShort.\n```jsx\n<Badge>Hi</Badge>\n```\n### Prose\nNo code.\n";
        let readme = parse_readme(source, &ReadmeOptions::default()).unwrap();
        let module = emit_module(&readme).unwrap();

        assert!(module.starts_with("export const component = {\n  \"name\": \"Badge\",\n  \"slug\": \"badge\","));
        assert!(module.ends_with("};\n"));
        assert!(module.contains("\"code\": function (scope) {\n  const {Badge} = scope;"));
        assert!(module.contains("\"code\": null"));
        assert!(module.contains("\"description\": \"Short.\""));
        assert!(!module.contains(PLACEHOLDER_PREFIX));
    }

    #[test]
    fn test_emit_module_without_examples() {
        let readme = parse_readme("---\nname: Modal\nhidePlayground: true\n---\n", &ReadmeOptions::default()).unwrap();
        assert_eq!(
            emit_module(&readme).unwrap(),
            "export const component = {\n  \"name\": \"Modal\",\n  \"slug\": \"modal\",\n  \"examples\": []\n};\n"
        );
    }
}
