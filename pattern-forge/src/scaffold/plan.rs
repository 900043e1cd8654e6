//! Planned writes and their application
//!
//! Generation happens in two phases. Planning reads the project and renders
//! every file in memory; applying writes them in order. Nothing touches the
//! disk until the whole plan exists, so a conflict found while planning
//! leaves the project exactly as it was.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::{PatternError, Result};

/// How a planned file reaches the disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteMode {
    /// New file; fails if something appeared at the path since planning
    Create,
    /// Rewrite an existing file whose current content is `original`
    Patch {
        /// Content read while planning
        original: String,
    },
    /// Already present, left untouched
    Skip,
}

/// One file the plan will produce
#[derive(Debug, Clone)]
pub struct PlannedWrite {
    /// Path relative to the project root
    pub path: PathBuf,
    /// Final content
    pub content: String,
    /// Write strategy
    pub mode: WriteMode,
    /// Human readable description
    pub description: String,
}

impl PlannedWrite {
    /// A file to create
    pub fn create(path: PathBuf, content: String, description: impl Into<String>) -> Self {
        Self {
            path,
            content,
            mode: WriteMode::Create,
            description: description.into(),
        }
    }

    /// An existing file to leave alone
    pub fn skip(path: PathBuf, description: impl Into<String>) -> Self {
        Self {
            path,
            content: String::new(),
            mode: WriteMode::Skip,
            description: description.into(),
        }
    }

    /// What applying this write will do
    #[must_use]
    pub fn action(&self) -> FileAction {
        match &self.mode {
            WriteMode::Create => FileAction::Created,
            WriteMode::Patch { original } if *original == self.content => FileAction::Unchanged,
            WriteMode::Patch { .. } => FileAction::Updated,
            WriteMode::Skip => FileAction::Skipped,
        }
    }
}

/// Ordered writes for one command
#[derive(Debug, Clone)]
pub struct GenerationPlan {
    root: PathBuf,
    writes: Vec<PlannedWrite>,
}

impl GenerationPlan {
    /// Empty plan for the project at `root`
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            writes: Vec::new(),
        }
    }

    /// Append a write
    pub fn push(&mut self, write: PlannedWrite) {
        self.writes.push(write);
    }

    /// Planned writes in application order
    #[must_use]
    pub fn writes(&self) -> &[PlannedWrite] {
        &self.writes
    }

    /// Project root the paths are relative to
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write everything to disk, in order
    ///
    /// Stops at the first failure; files already written stay written.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::TargetExists`] if a file to create appeared
    /// after planning, or an I/O error.
    pub fn apply(self) -> Result<GenerationReport> {
        let mut entries = Vec::with_capacity(self.writes.len());

        for write in self.writes {
            let action = write.action();
            let target = self.root.join(&write.path);

            match (&write.mode, action) {
                (WriteMode::Create, _) => write_new(&target, &write.content)
                    .map_err(|e| relative_target(e, &target, &write.path))?,
                (WriteMode::Patch { .. }, FileAction::Updated) => {
                    fs::write(&target, &write.content).map_err(|e| PatternError::io(&target, e))?;
                }
                _ => {}
            }
            tracing::debug!(path = %write.path.display(), %action, "applied");

            entries.push(ReportEntry {
                path: write.path,
                action,
                description: write.description,
            });
        }

        let report = GenerationReport { entries };
        tracing::info!(
            root = %self.root.display(),
            created = report.count(FileAction::Created),
            updated = report.count(FileAction::Updated),
            "generation applied"
        );
        Ok(report)
    }
}

/// Create `path` with `content`, never replacing an existing file
///
/// Parent directories are created as needed.
///
/// # Errors
///
/// Returns [`PatternError::TargetExists`] if the file exists, otherwise an
/// I/O error.
pub fn write_new(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| PatternError::io(parent, e))?;
    }

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => PatternError::TargetExists(path.to_path_buf()),
            _ => PatternError::io(path, e),
        })?;
    file.write_all(content.as_bytes())
        .map_err(|e| PatternError::io(path, e))
}

// Report conflicts by project-relative path, like the planner does
fn relative_target(err: PatternError, absolute: &Path, relative: &Path) -> PatternError {
    match err {
        PatternError::TargetExists(path) if path == absolute => {
            PatternError::TargetExists(relative.to_path_buf())
        }
        other => other,
    }
}

/// What happened to a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    /// Newly written
    Created,
    /// Existing file rewritten
    Updated,
    /// Existing file already had everything
    Unchanged,
    /// Existing file left alone
    Skipped,
}

impl fmt::Display for FileAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Unchanged => "unchanged",
            Self::Skipped => "skipped",
        })
    }
}

/// One line of a generation report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    /// Path relative to the project root
    pub path: PathBuf,
    /// What happened
    pub action: FileAction,
    /// Human readable description
    pub description: String,
}

/// Result of applying a plan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    entries: Vec<ReportEntry>,
}

impl GenerationReport {
    /// Entries in application order
    #[must_use]
    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    /// Number of files that were created or updated
    #[must_use]
    pub fn changed(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.action, FileAction::Created | FileAction::Updated))
            .count()
    }

    /// Number of entries with `action`
    #[must_use]
    pub fn count(&self, action: FileAction) -> usize {
        self.entries.iter().filter(|e| e.action == action).count()
    }

    /// Merge another report after this one
    pub fn extend(&mut self, other: Self) {
        self.entries.extend(other.entries);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::capture;
    use tempfile::TempDir;

    #[test]
    fn test_apply_logs_counts() {
        let dir = TempDir::new().unwrap();
        let mut plan = GenerationPlan::new(dir.path());
        plan.push(PlannedWrite::create(
            PathBuf::from("app/User.php"),
            "<?php".to_string(),
            "model User".to_string(),
        ));

        let (report, logs) = capture::info_logs(|| plan.apply());
        let report = report.unwrap();
        assert_eq!(report.count(FileAction::Created), 1);
        assert!(logs.contains("generation applied"), "{logs}");
        assert!(logs.contains("created=1"), "{logs}");
        assert!(logs.contains("updated=0"), "{logs}");
    }

    #[test]
    fn test_write_new_creates_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app/Services/Internals/User/UserService.php");

        write_new(&path, "<?php\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "<?php\n");
    }

    #[test]
    fn test_write_new_refuses_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("User.php");
        fs::write(&path, "original").unwrap();

        let err = write_new(&path, "replacement").unwrap_err();
        assert!(matches!(err, PatternError::TargetExists(p) if p == path));
        assert_eq!(fs::read_to_string(&path).unwrap(), "original");
    }

    #[test]
    fn test_apply_reports_actions() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("same.php"), "same").unwrap();
        fs::write(dir.path().join("patched.php"), "before").unwrap();
        fs::write(dir.path().join("kept.php"), "kept").unwrap();

        let mut plan = GenerationPlan::new(dir.path());
        plan.push(PlannedWrite::create("new/file.php".into(), "new".into(), "new file"));
        plan.push(PlannedWrite {
            path: "patched.php".into(),
            content: "after".into(),
            mode: WriteMode::Patch {
                original: "before".into(),
            },
            description: "patched".into(),
        });
        plan.push(PlannedWrite {
            path: "same.php".into(),
            content: "same".into(),
            mode: WriteMode::Patch {
                original: "same".into(),
            },
            description: "same".into(),
        });
        plan.push(PlannedWrite::skip("kept.php".into(), "kept"));

        let report = plan.apply().unwrap();
        let actions: Vec<_> = report.entries().iter().map(|e| e.action).collect();
        assert_eq!(
            actions,
            vec![
                FileAction::Created,
                FileAction::Updated,
                FileAction::Unchanged,
                FileAction::Skipped
            ]
        );
        assert_eq!(report.changed(), 2);
        assert_eq!(fs::read_to_string(dir.path().join("new/file.php")).unwrap(), "new");
        assert_eq!(fs::read_to_string(dir.path().join("patched.php")).unwrap(), "after");
        assert_eq!(fs::read_to_string(dir.path().join("kept.php")).unwrap(), "kept");
    }

    #[test]
    fn test_apply_reports_relative_conflict() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("late.php"), "appeared").unwrap();

        let mut plan = GenerationPlan::new(dir.path());
        plan.push(PlannedWrite::create("late.php".into(), "ours".into(), "late"));

        let err = plan.apply().unwrap_err();
        assert!(matches!(err, PatternError::TargetExists(p) if p == Path::new("late.php")));
        assert_eq!(fs::read_to_string(dir.path().join("late.php")).unwrap(), "appeared");
    }

    #[test]
    fn test_file_action_display() {
        assert_eq!(FileAction::Created.to_string(), "created");
        assert_eq!(FileAction::Unchanged.to_string(), "unchanged");
    }
}
