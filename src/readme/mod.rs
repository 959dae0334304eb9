//! Component README parsing.
//!
//! A README carries YAML frontmatter (`name`, optional `platforms` and
//! `hidePlayground`) and a markdown body. Examples live in the `## Examples`
//! section, one per `###` sub-heading, each with a `jsx` code fence:
//!
//! ````markdown
//! ---
//! name: Badge
//! ---
//!
//! # Badge
//!
//! ---
//!
//! ## Examples
//!
//! ### Default badge
//!
//! Use to give a non-critical status update.
//!
//! ```jsx
//! <Badge>Fulfilled</Badge>
//! ```
//! ````
//!
//! Policy skips and missing code are reported as [`Diagnostic`]s rather than
//! errors; only unreadable frontmatter fails the parse.

mod frontmatter;
mod sections;

#[cfg(test)]
#[path = "readme_tests.rs"]
mod readme_tests;

use tracing::{info, warn};

use crate::error::{ErrorSeverity, ReadmeError};
use crate::fragment::{compile_fragment, CompiledExample};
use crate::render::LibrarySurface;

pub use frontmatter::{split_frontmatter, ReadmeFrontmatter};
pub use sections::{
    chunk_description, example_for_platforms, examples_section, fenced_blocks,
    is_example_for_platform, split_example_chunks, split_sections, FencedBlock,
};

/// Platform id examples are rendered for
pub const DEFAULT_PLATFORM: &str = "web";
/// Code fence language holding renderable examples
pub const DEFAULT_LANGUAGE: &str = "jsx";

/// Options for [`parse_readme`]
#[derive(Debug, Clone, PartialEq)]
pub struct ReadmeOptions {
    pub platform: String,
    pub language: String,
    /// When set, examples referencing anything outside it fail to compile
    pub surface: Option<LibrarySurface>,
}

impl Default for ReadmeOptions {
    fn default() -> Self {
        Self {
            platform: DEFAULT_PLATFORM.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            surface: None,
        }
    }
}

/// Non-fatal finding while parsing a README
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: ErrorSeverity,
    pub message: String,
}

/// A parsed component README
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentReadme {
    pub name: String,
    pub slug: String,
    pub examples: Vec<ExtractedExample>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ComponentReadme {
    fn info(&mut self, message: String) {
        info!(component = %self.name, "{}", message);
        self.diagnostics.push(Diagnostic {
            severity: ErrorSeverity::Info,
            message,
        });
    }

    fn warn(&mut self, message: String) {
        warn!(component = %self.name, "{}", message);
        self.diagnostics.push(Diagnostic {
            severity: ErrorSeverity::Warning,
            message,
        });
    }

    /// Warning-level diagnostics, in the order they were raised
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == ErrorSeverity::Warning)
    }
}

/// One example from the `## Examples` section
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedExample {
    pub name: String,
    pub slug: String,
    /// `None` when the chunk has no code fence or the fence failed to compile
    pub code: Option<CompiledExample>,
    pub description: String,
}

/// URL slug for a component or example name.
///
/// Curly apostrophes are dropped, whitespace runs become `-`, and the
/// result is lowercased.
pub fn slugify(name: &str) -> String {
    name.replace('’', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

/// Parse a component README into its name, slug and examples
pub fn parse_readme(source: &str, options: &ReadmeOptions) -> Result<ComponentReadme, ReadmeError> {
    let (frontmatter, body) = split_frontmatter(source)?;
    let name = frontmatter
        .component_name()
        .ok_or(ReadmeError::MissingName)?
        .to_string();

    let mut readme = ComponentReadme {
        slug: slugify(&name),
        name,
        examples: Vec::new(),
        diagnostics: Vec::new(),
    };

    if !frontmatter.supports_platform(&options.platform) {
        let platforms = frontmatter.platforms.unwrap_or_default().join(",");
        readme.info(format!(
            "Component examples are ignored (platforms: {})",
            platforms
        ));
        return Ok(readme);
    }

    if frontmatter.hide_playground {
        readme.info("Component examples are ignored (hidePlayground: true)".to_string());
        return Ok(readme);
    }

    let section = examples_section(body);
    let chunks = split_example_chunks(&section);
    if chunks.is_empty() {
        readme.warn("No examples found.".to_string());
        readme.warn("At least one react example expected".to_string());
        return Ok(readme);
    }

    let mut compile_failures = Vec::new();
    for chunk in chunks
        .into_iter()
        .filter(|chunk| is_example_for_platform(chunk, &options.platform))
    {
        let example_name = chunk.lines().next().unwrap_or("").trim().to_string();
        let code = fenced_blocks(chunk)
            .into_iter()
            .find(|block| block.lang == options.language)
            .map(|block| block.code)
            .filter(|code| !code.is_empty());

        let compiled = match code {
            Some(code) => match compile_fragment(&code, options.surface.as_ref()) {
                Ok(compiled) => Some(compiled),
                Err(e) => {
                    compile_failures.push(format!("Example “{}” does not compile: {}", example_name, e));
                    None
                }
            },
            None => None,
        };

        readme.examples.push(ExtractedExample {
            slug: slugify(&example_name),
            description: chunk_description(chunk, &options.language),
            name: example_name,
            code: compiled,
        });
    }

    for failure in compile_failures {
        readme.warn(failure);
    }

    if readme.examples.iter().all(|e| e.code.is_none()) {
        readme.warn("At least one react example expected".to_string());
    }

    let missing: Vec<String> = readme
        .examples
        .iter()
        .filter(|e| e.code.is_none())
        .map(|e| e.name.clone())
        .collect();
    for example_name in missing {
        readme.warn(format!("Example “{}” is missing a React example", example_name));
    }

    Ok(readme)
}
