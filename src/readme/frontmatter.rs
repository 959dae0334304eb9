//! README frontmatter
//!
//! A README starts with a YAML block delimited by `---` lines:
//!
//! ```yaml
//! ---
//! name: Badge
//! platforms: [web, ios]
//! hidePlayground: false
//! ---
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ReadmeError;

/// Frontmatter fields the story pipeline reads; everything else lands in `extra`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadmeFrontmatter {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub platforms: Option<Vec<String>>,
    #[serde(default)]
    pub hide_playground: bool,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl ReadmeFrontmatter {
    /// Component name, if present and non-blank
    pub fn component_name(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }

    /// Whether the README's examples apply to `platform`
    pub fn supports_platform(&self, platform: &str) -> bool {
        self.platforms
            .as_ref()
            .map_or(true, |platforms| platforms.iter().any(|p| p == platform))
    }
}

/// Split `source` into parsed frontmatter and the remaining body.
///
/// A document without a frontmatter block yields default (nameless)
/// frontmatter and the whole source as body.
pub fn split_frontmatter(source: &str) -> Result<(ReadmeFrontmatter, &str), ReadmeError> {
    let trimmed = source.trim_start();
    let Some(first_line_end) = trimmed.find('\n') else {
        return Ok((ReadmeFrontmatter::default(), source));
    };
    if trimmed[..first_line_end].trim() != "---" {
        return Ok((ReadmeFrontmatter::default(), source));
    }

    let after_open = &trimmed[first_line_end + 1..];
    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        if line.trim() == "---" {
            let yaml = after_open[..offset].trim();
            let body = &after_open[offset + line.len()..];
            let frontmatter = if yaml.is_empty() {
                ReadmeFrontmatter::default()
            } else {
                serde_yaml::from_str(yaml)?
            };
            return Ok((frontmatter, body));
        }
        offset += line.len();
    }

    Err(ReadmeError::UnterminatedFrontmatter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_frontmatter_basic() {
        let source = "---\nname: Badge\ncategory: Feedback\n---\n\n# Badge\n";
        let (fm, body) = split_frontmatter(source).unwrap();
        assert_eq!(fm.component_name(), Some("Badge"));
        assert_eq!(fm.platforms, None);
        assert!(!fm.hide_playground);
        assert_eq!(
            fm.extra.get("category").and_then(|v| v.as_str()),
            Some("Feedback")
        );
        assert_eq!(body, "\n# Badge\n");
    }

    #[test]
    fn test_camel_case_keys() {
        let source = "---\nname: Modal\nhidePlayground: true\nplatforms:\n  - web\n  - android\n---\n";
        let (fm, _) = split_frontmatter(source).unwrap();
        assert!(fm.hide_playground);
        assert!(fm.supports_platform("web"));
        assert!(!fm.supports_platform("ios"));
    }

    #[test]
    fn test_no_frontmatter_returns_whole_source() {
        let source = "# Title\n\nBody";
        let (fm, body) = split_frontmatter(source).unwrap();
        assert_eq!(fm.component_name(), None);
        assert_eq!(body, source);
    }

    #[test]
    fn test_malformed_yaml_is_error() {
        let source = "---\nname: [unclosed\n---\n";
        assert!(matches!(
            split_frontmatter(source),
            Err(ReadmeError::Frontmatter(_))
        ));
    }

    #[test]
    fn test_unterminated_block_is_error() {
        assert!(matches!(
            split_frontmatter("---\nname: Badge\n"),
            Err(ReadmeError::UnterminatedFrontmatter)
        ));
    }

    #[test]
    fn test_blank_name_is_not_a_name() {
        let (fm, _) = split_frontmatter("---\nname: '  '\n---\n").unwrap();
        assert_eq!(fm.component_name(), None);
    }
}
