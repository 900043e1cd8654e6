//! Configuration file bootstrap

use anyhow::{bail, Context, Result};
use clap::Args;
use console::style;
use pattern_forge::config::{PatternConfig, CONFIG_FILE};
use std::fs;
use std::path::Path;

use crate::output;

/// Write a default `pattern-forge.toml`
#[derive(Debug, Clone, Default, Args)]
pub struct InitCommand {
    /// Replace an existing configuration file
    #[arg(long)]
    pub force: bool,
}

impl InitCommand {
    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists (without `--force`) or cannot be
    /// written.
    pub fn execute(&self, root: &Path) -> Result<()> {
        let path = root.join(CONFIG_FILE);
        if path.exists() && !self.force {
            bail!(
                "{} already exists. Pass --force to replace it.",
                path.display()
            );
        }

        let content = PatternConfig::default_toml().context("Failed to serialize configuration")?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        println!("{}{}", output::CHECK, style(format!("Wrote {}", path.display())).green());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_loadable_config() {
        let dir = TempDir::new().unwrap();
        InitCommand::default().execute(dir.path()).unwrap();

        let written = fs::read_to_string(dir.path().join(CONFIG_FILE)).unwrap();
        assert!(written.contains("[paths]"));
        assert!(written.contains("dump-autoload"));
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "# mine\n").unwrap();

        assert!(InitCommand::default().execute(dir.path()).is_err());
        assert_eq!(fs::read_to_string(dir.path().join(CONFIG_FILE)).unwrap(), "# mine\n");

        InitCommand { force: true }.execute(dir.path()).unwrap();
        assert_ne!(fs::read_to_string(dir.path().join(CONFIG_FILE)).unwrap(), "# mine\n");
    }
}
