//! Composer autoload refresh
//!
//! New classes are invisible to a PHP app until its class map is rebuilt.
//! Failing to rebuild is never fatal: the files are already written and the
//! user can run the command by hand.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use crate::config::AutoloadSettings;

/// Result of running the autoload command
#[derive(Debug)]
pub enum AutoloadOutcome {
    /// Command exited successfully
    Succeeded,
    /// Command ran and exited with a failure status
    Failed(ExitStatus),
    /// Command could not be started
    Unavailable(std::io::Error),
    /// Disabled in configuration or empty command
    Disabled,
}

impl AutoloadOutcome {
    /// Whether the class map is known to be fresh
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

impl fmt::Display for AutoloadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Succeeded => f.write_str("autoload refreshed"),
            Self::Failed(status) => write!(f, "autoload command failed ({status})"),
            Self::Unavailable(err) => write!(f, "autoload command unavailable: {err}"),
            Self::Disabled => f.write_str("autoload refresh disabled"),
        }
    }
}

/// Runs the configured autoload command in the project root
#[derive(Debug, Clone)]
pub struct Autoloader {
    root: PathBuf,
    enabled: bool,
    command: Vec<String>,
}

impl Autoloader {
    /// Build from settings
    #[must_use]
    pub fn new(root: &Path, settings: &AutoloadSettings) -> Self {
        Self {
            root: root.to_path_buf(),
            enabled: settings.enabled,
            command: settings.command.clone(),
        }
    }

    /// Command line as typed, for messages
    #[must_use]
    pub fn command_line(&self) -> String {
        self.command.join(" ")
    }

    /// Run the command, discarding its output
    pub fn run(&self) -> AutoloadOutcome {
        let Some((program, args)) = self.command.split_first().filter(|_| self.enabled) else {
            tracing::debug!("autoload refresh skipped");
            return AutoloadOutcome::Disabled;
        };

        let status = Command::new(program)
            .args(args)
            .current_dir(&self.root)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        let outcome = match status {
            Ok(status) if status.success() => AutoloadOutcome::Succeeded,
            Ok(status) => AutoloadOutcome::Failed(status),
            Err(err) => AutoloadOutcome::Unavailable(err),
        };

        if outcome.is_success() {
            tracing::info!(command = %self.command_line(), "autoload refreshed");
        } else {
            tracing::warn!(command = %self.command_line(), %outcome, "autoload refresh failed");
        }
        outcome
    }
}
