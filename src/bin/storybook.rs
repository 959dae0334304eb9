//! Storybook - stories generated from component READMEs
//!
//! # Usage
//!
//! ```bash
//! storybook --root src/components list
//! storybook --config storybook.json render badge--all-examples
//! storybook emit src/components/Badge/README.md
//! storybook check
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use polaris_stories::config::{load_config, Config};
use polaris_stories::error::ErrorSeverity;
use polaris_stories::loader::{build_catalog, emit_readme, load_readmes};
use polaris_stories::logging;
use polaris_stories::storybook::hydrate;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Options {
    /// JSON config file (defaults to the user config directory)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Component tree to search for READMEs
    #[arg(long, global = true, value_name = "DIR", default_value = ".")]
    root: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List every story id, grouped by component
    List,
    /// Print the markup of one story
    Render {
        /// Story id (`component-slug--story-slug`)
        story_id: String,
    },
    /// Print the ES module generated for one README
    Emit {
        readme: PathBuf,
    },
    /// Report README diagnostics and binding failures
    Check,
}

fn main() -> Result<()> {
    let _guard = logging::init();
    let options = Options::parse();
    let config = load_config(options.config.as_deref());

    match options.command {
        Command::List => {
            let catalog = build_catalog(&config, &options.root)
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            for category in catalog.all_categories() {
                println!("{}", category);
                for entry in catalog.stories_by_category(category) {
                    println!("  {}", entry.story.id());
                }
            }
        }
        Command::Render { story_id } => {
            let catalog = build_catalog(&config, &options.root)
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            let node = catalog
                .render(&story_id)
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            println!("{}", node);
        }
        Command::Emit { readme } => {
            let module = emit_readme(&readme, &config.readme_options())
                .with_context(|| format!("Failed to emit {}", readme.display()))?;
            print!("{}", module);
        }
        Command::Check => {
            let problems = check(&config, &options.root);
            if problems > 0 {
                anyhow::bail!("{} problem(s) found", problems);
            }
            println!("No problems found");
        }
    }

    Ok(())
}

/// Print warnings and binding failures, returning how many were found
fn check(config: &Config, root: &Path) -> usize {
    let scope = config.scope();
    let mut problems = 0;

    for loaded in load_readmes(root, &config.readme_glob, &config.readme_options()) {
        for diagnostic in loaded.readme.warnings() {
            println!("{}: {}", loaded.path.display(), diagnostic.message);
            problems += 1;
        }
        if let Err(e) = hydrate(&loaded.readme, &scope) {
            println!("{}: {}", loaded.path.display(), e);
            problems += 1;
        }
        for diagnostic in &loaded.readme.diagnostics {
            if diagnostic.severity == ErrorSeverity::Info {
                info!(path = %loaded.path.display(), message = %diagnostic.message, "README skipped");
            }
        }
    }

    problems
}
