//! Markdown structure of a component README body.
//!
//! All splitting is line based and ignores lines inside code fences, so a
//! `---` or `###` inside an example never splits it.

use std::sync::OnceLock;

use regex::Regex;

/// State for parsing code fences
#[derive(Clone, Copy, PartialEq, Debug)]
enum FenceType {
    Backticks, // ```
    Tildes,    // ~~~
}

/// How a line relates to the fences around it
#[derive(Debug, PartialEq)]
enum LineKind {
    Text,
    FenceOpen(String),
    FenceBody,
    FenceClose,
}

/// Tracks fence state across consecutive lines
#[derive(Default)]
struct FenceTracker {
    open: Option<(FenceType, usize)>,
}

impl FenceTracker {
    fn classify(&mut self, line: &str) -> LineKind {
        let trimmed = line.trim_start();
        match self.open {
            None => match detect_fence_start(trimmed) {
                Some((fence_type, count, lang)) => {
                    self.open = Some((fence_type, count));
                    LineKind::FenceOpen(lang)
                }
                None => LineKind::Text,
            },
            Some((fence_type, count)) => {
                if is_matching_fence_end(trimmed, fence_type, count) {
                    self.open = None;
                    LineKind::FenceClose
                } else {
                    LineKind::FenceBody
                }
            }
        }
    }
}

/// Detect if a line starts a code fence, returns (fence_type, count, language)
fn detect_fence_start(line: &str) -> Option<(FenceType, usize, String)> {
    let backtick_count = line.chars().take_while(|&c| c == '`').count();
    if backtick_count >= 3 {
        let rest = &line[backtick_count..];
        let lang = rest.split_whitespace().next().unwrap_or("").to_string();
        return Some((FenceType::Backticks, backtick_count, lang));
    }

    let tilde_count = line.chars().take_while(|&c| c == '~').count();
    if tilde_count >= 3 {
        let rest = &line[tilde_count..];
        let lang = rest.split_whitespace().next().unwrap_or("").to_string();
        return Some((FenceType::Tildes, tilde_count, lang));
    }

    None
}

/// Check if a line is a closing fence matching the opening
fn is_matching_fence_end(line: &str, fence_type: FenceType, min_count: usize) -> bool {
    let count = match fence_type {
        FenceType::Backticks => line.chars().take_while(|&c| c == '`').count(),
        FenceType::Tildes => line.chars().take_while(|&c| c == '~').count(),
    };

    if count < min_count {
        return false;
    }

    line[count..].chars().all(|c| c.is_whitespace())
}

/// Split `text` before every line (outside fences) matching `is_boundary`.
///
/// Returns the text before the first boundary followed by one slice per
/// boundary; boundary lines stay at the start of their slice.
fn split_at_lines<'a>(text: &'a str, mut is_boundary: impl FnMut(&str) -> bool) -> Vec<&'a str> {
    let mut pieces = Vec::new();
    let mut tracker = FenceTracker::default();
    let mut start = 0;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        let content = line.trim_end_matches(['\n', '\r']);
        if tracker.classify(content) == LineKind::Text && is_boundary(content) {
            pieces.push(&text[start..offset]);
            start = offset;
        }
        offset += line.len();
    }
    pieces.push(&text[start..]);
    pieces
}

/// Horizontal-rule separated sections, without the rule lines, trimmed and
/// with empty sections dropped
pub fn split_sections(body: &str) -> Vec<&str> {
    split_at_lines(body, |line| line.trim() == "---")
        .into_iter()
        .map(|section| {
            let section = section.trim_start();
            section.strip_prefix("---").unwrap_or(section).trim()
        })
        .filter(|section| !section.is_empty())
        .collect()
}

fn is_examples_heading(section: &str) -> bool {
    section.starts_with("## Examples")
}

/// Concatenated `## Examples` sections of a README body.
///
/// The first section is the introduction and is skipped, unless the body
/// opens directly with the examples heading.
pub fn examples_section(body: &str) -> String {
    let sections = split_sections(body);
    let skip = match sections.first() {
        Some(first) if is_examples_heading(first) => 0,
        _ => 1,
    };
    sections
        .into_iter()
        .skip(skip)
        .filter(|section| is_examples_heading(section))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn heading_level_three(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix("###")?;
    if rest.starts_with('#') {
        return None;
    }
    Some(rest)
}

/// One chunk per `###` sub-heading; the heading marker is removed so the
/// chunk starts with the example name. Text before the first sub-heading is
/// discarded.
pub fn split_example_chunks(section: &str) -> Vec<&str> {
    split_at_lines(section, |line| heading_level_three(line).is_some())
        .into_iter()
        .skip(1)
        .map(|chunk| {
            let chunk = chunk.trim_start();
            chunk.strip_prefix("###").unwrap_or(chunk)
        })
        .collect()
}

/// A fenced code block within a chunk
#[derive(Debug, Clone, PartialEq)]
pub struct FencedBlock {
    pub lang: String,
    pub code: String,
    /// Line range covered by the block, fences included
    pub first_line: usize,
    pub last_line: usize,
}

/// Fenced code blocks in `text`; an unclosed fence runs to the end
pub fn fenced_blocks(text: &str) -> Vec<FencedBlock> {
    let mut blocks = Vec::new();
    let mut tracker = FenceTracker::default();
    let mut current: Option<(String, usize, Vec<&str>)> = None;
    let mut line_count = 0;

    for (index, line) in text.lines().enumerate() {
        line_count = index + 1;
        match tracker.classify(line) {
            LineKind::FenceOpen(lang) => current = Some((lang, index, Vec::new())),
            LineKind::FenceBody => {
                if let Some((_, _, lines)) = current.as_mut() {
                    lines.push(line);
                }
            }
            LineKind::FenceClose => {
                if let Some((lang, first_line, lines)) = current.take() {
                    blocks.push(FencedBlock {
                        lang,
                        code: lines.join("\n").trim().to_string(),
                        first_line,
                        last_line: index,
                    });
                }
            }
            LineKind::Text => {}
        }
    }

    if let Some((lang, first_line, lines)) = current {
        if !lines.is_empty() {
            blocks.push(FencedBlock {
                lang,
                code: lines.join("\n").trim().to_string(),
                first_line,
                last_line: line_count.saturating_sub(1),
            });
        }
    }

    blocks
}

fn example_for_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"<!--\s*example-for:\s*([^>]*?)\s*-->").expect("Invalid regex")
    })
}

/// Platform ids from an `<!-- example-for: a, b -->` marker, if present
pub fn example_for_platforms(chunk: &str) -> Option<Vec<String>> {
    let captures = example_for_regex().captures(chunk)?;
    Some(
        captures[1]
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

/// Whether an example chunk applies to `platform`; unmarked chunks apply
/// everywhere
pub fn is_example_for_platform(chunk: &str, platform: &str) -> bool {
    example_for_platforms(chunk).map_or(true, |platforms| platforms.iter().any(|p| p == platform))
}

/// Prose of an example chunk: everything but the name line, the `language`
/// fences and the platform marker
pub fn chunk_description(chunk: &str, language: &str) -> String {
    let skipped: Vec<(usize, usize)> = fenced_blocks(chunk)
        .into_iter()
        .filter(|block| block.lang == language)
        .map(|block| (block.first_line, block.last_line))
        .collect();

    let kept = chunk
        .lines()
        .enumerate()
        .skip(1)
        .filter(|(index, _)| !skipped.iter().any(|&(a, b)| (a..=b).contains(index)))
        .map(|(_, line)| line)
        .collect::<Vec<_>>()
        .join("\n");

    example_for_regex().replace_all(&kept, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sections_ignores_rules_in_fences() {
        let body = "Intro\n\n---\n\n## Examples\n\n```md\n---\n```\n\n---\n\n## Properties\n";
        let sections = split_sections(body);
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0], "Intro");
        assert!(sections[1].starts_with("## Examples"));
        assert!(sections[1].contains("```md\n---\n```"));
        assert_eq!(sections[2], "## Properties");
    }

    #[test]
    fn test_examples_section_skips_intro() {
        let body = "Intro text\n---\n## Examples\n### A\n";
        assert_eq!(examples_section(body), "## Examples\n### A");
    }

    #[test]
    fn test_examples_section_when_body_starts_with_examples() {
        let body = "## Examples\n### Basic\n";
        assert_eq!(examples_section(body), "## Examples\n### Basic");
    }

    #[test]
    fn test_examples_section_empty_without_examples_heading() {
        assert_eq!(examples_section("Intro\n---\n## Best practices\n"), "");
    }

    #[test]
    fn test_split_example_chunks_drops_preamble_and_ignores_deeper_headings() {
        let section = "## Examples\nPreamble\n### First\nText\n#### Detail\n### Second\n";
        let chunks = split_example_chunks(section);
        assert_eq!(chunks, vec![" First\nText\n#### Detail\n", " Second\n"]);
    }

    #[test]
    fn test_split_example_chunks_ignores_headings_in_fences() {
        let section = "## Examples\n### One\n```md\n### not a heading\n```\n";
        assert_eq!(split_example_chunks(section).len(), 1);
    }

    #[test]
    fn test_fenced_blocks_with_tildes_and_unclosed() {
        let blocks = fenced_blocks("~~~jsx\n<A />\n~~~\ntext\n```jsx\n<B />\n");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].code, "<A />");
        assert_eq!((blocks[0].first_line, blocks[0].last_line), (0, 2));
        assert_eq!(blocks[1].code, "<B />");
    }

    #[test]
    fn test_example_for_marker() {
        let chunk = "Mobile\n<!-- example-for: ios, android -->\n";
        assert_eq!(
            example_for_platforms(chunk),
            Some(vec!["ios".to_string(), "android".to_string()])
        );
        assert!(!is_example_for_platform(chunk, "web"));
        assert!(is_example_for_platform("<!-- example-for: web, ios -->", "web"));
        assert!(is_example_for_platform("no marker", "web"));
    }

    #[test]
    fn test_example_for_requires_exact_platform_id() {
        assert!(!is_example_for_platform("<!-- example-for: webview -->", "web"));
    }

    #[test]
    fn test_chunk_description_strips_name_code_and_marker() {
        let chunk = " Basic\n\n<!-- example-for: web -->\n\nUse for status.\n\n```jsx\n<Badge />\n```\n\n```swift\nBadge()\n```\n";
        assert_eq!(
            chunk_description(chunk, "jsx"),
            "Use for status.\n\n\n```swift\nBadge()\n```"
        );
    }
}
