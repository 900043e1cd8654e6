//! Stub management commands

use anyhow::{Context, Result};
use clap::Subcommand;
use console::style;
use pattern_forge::config::CONFIG_FILE;
use pattern_forge::prelude::*;
use pattern_forge::stubs;
use std::path::Path;

use crate::output;

/// Stub directory used when none is configured
pub const DEFAULT_STUB_DIR: &str = "stubs/pattern-forge";

/// Stub management subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum StubsCommand {
    /// Copy the default stubs into the project for customisation
    Publish {
        /// Overwrite stubs that were already published
        #[arg(long)]
        force: bool,
    },
}

impl StubsCommand {
    /// Execute the stubs command
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or a stub cannot
    /// be written.
    pub fn execute(self, root: &Path) -> Result<()> {
        match self {
            Self::Publish { force } => publish(root, force),
        }
    }
}

fn publish(root: &Path, force: bool) -> Result<()> {
    let project = Project::load(root).context("Failed to load project configuration")?;
    let configured = project.stubs_dir();
    let dir = configured
        .clone()
        .unwrap_or_else(|| project.resolve(Path::new(DEFAULT_STUB_DIR)));

    let published = stubs::publish(&dir, force)
        .with_context(|| format!("Failed to publish stubs to {}", dir.display()))?;

    for stub in &published {
        let shown = stub.path.strip_prefix(root).unwrap_or(&stub.path);
        if stub.written {
            println!("  {}{}", output::CHECK, shown.display());
        } else {
            println!(
                "  {} {}",
                style("kept").dim(),
                style(shown.display()).dim()
            );
        }
    }

    if configured.is_none() {
        println!();
        println!(
            "Add this to {} to use them:",
            style(CONFIG_FILE).cyan()
        );
        println!();
        println!("  [stubs]");
        println!("  dir = \"{DEFAULT_STUB_DIR}\"");
    }
    Ok(())
}
