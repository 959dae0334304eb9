//! README discovery
//!
//! Globs a component tree for README files and parses each one. Unreadable
//! or invalid READMEs are logged and skipped so one bad file never stops a
//! build. Examples that cannot be bound to the configured scope do stop it.

use std::path::{Path, PathBuf};

use glob::glob;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Result, ResultExt, StorybookError};
use crate::module::emit_module;
use crate::readme::{parse_readme, ComponentReadme, ReadmeOptions};
use crate::storybook::{hydrate, StoryCatalog, StoryRegistry};

/// A parsed README and where it came from
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedReadme {
    pub path: PathBuf,
    pub readme: ComponentReadme,
}

/// Paths under `root` matching `pattern`, sorted
pub fn find_readmes(root: &Path, pattern: &str) -> Vec<PathBuf> {
    let pattern_str = root.join(pattern).to_string_lossy().to_string();
    debug!(pattern = %pattern_str, "Globbing for README files");

    let mut paths = Vec::new();
    if let Some(entries) = glob(&pattern_str).log_err() {
        paths.extend(entries.filter_map(|entry| entry.warn_on_err()));
    }

    paths.sort();
    paths
}

/// Read and parse one README
pub fn load_readme(path: &Path, options: &ReadmeOptions) -> Result<ComponentReadme> {
    let source = std::fs::read_to_string(path).map_err(|source| StorybookError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_readme(&source, options).map_err(|source| StorybookError::Readme {
        path: path.display().to_string(),
        source,
    })
}

/// Load every README under `root`, skipping the ones that fail
pub fn load_readmes(root: &Path, pattern: &str, options: &ReadmeOptions) -> Vec<LoadedReadme> {
    let mut readmes = Vec::new();
    for path in find_readmes(root, pattern) {
        debug!(path = %path.display(), "Parsing README");
        match load_readme(&path, options) {
            Ok(readme) => readmes.push(LoadedReadme { path, readme }),
            Err(e) => {
                warn!(
                    error = %e,
                    path = %path.display(),
                    severity = ?e.severity(),
                    "Skipping README"
                );
            }
        }
    }

    debug!(count = readmes.len(), "Loaded READMEs");
    readmes
}

/// Build the story catalog for every README under `root`.
///
/// Fails on the first component whose examples cannot be bound to the
/// configured scope.
pub fn build_catalog(config: &Config, root: &Path) -> Result<StoryCatalog> {
    let scope = config.scope();
    let mut registry = StoryRegistry::with_options(config.registry_options());
    for decorator in config.decorator_components(&scope) {
        registry.add_decorator(decorator);
    }

    for loaded in load_readmes(root, &config.readme_glob, &config.readme_options()) {
        let component = hydrate(&loaded.readme, &scope).map_err(|source| StorybookError::Hydrate {
            path: loaded.path.display().to_string(),
            source,
        })?;
        registry.register_component(&component);
    }

    info!(stories = registry.len(), "Story catalog built");
    Ok(registry.finish())
}

/// Generated ES module for one README
pub fn emit_readme(path: &Path, options: &ReadmeOptions) -> Result<String> {
    let readme = load_readme(path, options)?;
    Ok(emit_module(&readme)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BindError;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, relative: &str, content: &str) {
        let path = dir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_load_readmes_sorted_and_skips_invalid() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "components/Card/README.md",
            "---\nname: Card\n---\n## Examples\n### Basic\n```jsx\n<Card />\n```\n",
        );
        write(
            temp.path(),
            "components/Badge/README.md",
            "---\nname: Badge\n---\n## Examples\n### Basic\n```jsx\n<Badge />\n```\n",
        );
        write(temp.path(), "components/Broken/README.md", "---\nname: [x\n---\n");
        write(temp.path(), "components/Card/notes.md", "not a readme");

        let loaded = load_readmes(temp.path(), "**/README.md", &ReadmeOptions::default());
        let names: Vec<&str> = loaded.iter().map(|l| l.readme.name.as_str()).collect();
        assert_eq!(names, vec!["Badge", "Card"]);
        assert!(loaded[0].path.ends_with("components/Badge/README.md"));
    }

    #[test]
    fn test_find_readmes_in_missing_root_is_empty() {
        let temp = TempDir::new().unwrap();
        assert!(find_readmes(&temp.path().join("missing"), "**/README.md").is_empty());
    }

    #[test]
    fn test_build_catalog_registers_bound_components() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "components/Card/README.md",
            "---\nname: Card\n---\n## Examples\n### Basic card\n```jsx\n<Card>Orders</Card>\n```\n",
        );
        let config = Config {
            library: vec!["Card".into()],
            ..Config::default()
        };

        let catalog = build_catalog(&config, temp.path()).unwrap();
        assert!(catalog.find("card--basic-card").is_some());
        assert_eq!(catalog.render("card--basic-card").unwrap().to_string(), "<Card>Orders</Card>");
    }

    #[test]
    fn test_build_catalog_fails_on_unbound_example() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "components/Card/README.md",
            "---\nname: Card\n---\n## Examples\n### With badge\n```jsx\n<Card><Badge /></Card>\n```\n",
        );
        let config = Config {
            library: vec!["Card".into()],
            ..Config::default()
        };

        let err = build_catalog(&config, temp.path()).err().unwrap();
        assert!(matches!(
            err,
            StorybookError::Hydrate { ref path, source: BindError::Unresolved(ref names) }
                if path.ends_with("README.md") && names == &vec!["Badge".to_string()]
        ));
    }

    #[test]
    fn test_emit_readme_substitutes_wrapper_source() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "README.md",
            "---\nname: Badge\n---\n## Examples\n### Basic\n```jsx\n<Badge>New</Badge>\n```\n",
        );
        let module = emit_readme(&temp.path().join("README.md"), &ReadmeOptions::default()).unwrap();
        assert!(module.contains("function (scope) {"));
        assert!(module.contains("const {Badge} = scope;"));
    }

    #[test]
    fn test_load_readme_reports_io_error() {
        let temp = TempDir::new().unwrap();
        let err = load_readme(&temp.path().join("README.md"), &ReadmeOptions::default()).unwrap_err();
        assert!(matches!(err, StorybookError::Io { .. }));
    }
}
