//! Service provider patching
//!
//! Provider files carry marker comments. Each generated class pair adds one
//! line above each marker; the markers stay so the next run can add more.
//! A line that is already present is never added twice.

use std::path::Path;

use crate::error::{PatternError, Result};
use crate::naming::ClassPair;

/// Marker for interface imports
pub const INTERFACE_USE: &str = "#pattern:interface-use";

/// Marker for implementation imports
pub const CLASS_USE: &str = "#pattern:class-use";

/// Marker for container bindings inside `register()`
pub const BINDINGS: &str = "#pattern:bindings";

/// Marker for the `provides()` list
pub const PROVIDES: &str = "#pattern:provides";

/// Every marker a provider must contain
pub const MARKERS: [&str; 4] = [INTERFACE_USE, CLASS_USE, BINDINGS, PROVIDES];

/// Lines to insert for one interface/class pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEntries {
    /// `use <interface>;`
    pub interface_use: String,
    /// `use <class>;`
    pub class_use: String,
    /// `$this->app->singleton(...)`
    pub binding: String,
    /// `<Interface>::class,`
    pub provides: String,
}

impl ProviderEntries {
    /// Entries binding `pair.interface_name` to `pair.class_name`
    #[must_use]
    pub fn for_pair(pair: &ClassPair) -> Self {
        Self {
            interface_use: format!("use {};", pair.interface_fqcn()),
            class_use: format!("use {};", pair.class_fqcn()),
            binding: format!(
                "$this->app->singleton({}::class, {}::class);",
                pair.interface_name, pair.class_name
            ),
            provides: format!("{}::class,", pair.interface_name),
        }
    }

    fn by_marker(&self) -> [(&'static str, &str); 4] {
        [
            (INTERFACE_USE, self.interface_use.as_str()),
            (CLASS_USE, self.class_use.as_str()),
            (BINDINGS, self.binding.as_str()),
            (PROVIDES, self.provides.as_str()),
        ]
    }
}

/// Insert `entries` into provider `content`
///
/// `path` only labels errors.
///
/// # Errors
///
/// Returns [`PatternError::MarkerMissing`] if any marker line is absent.
pub fn patch(content: &str, entries: &ProviderEntries, path: &Path) -> Result<String> {
    entries
        .by_marker()
        .into_iter()
        .try_fold(content.to_string(), |acc, (marker, entry)| {
            insert_above_marker(&acc, marker, entry, path)
        })
}

fn insert_above_marker(
    content: &str,
    marker: &'static str,
    entry: &str,
    path: &Path,
) -> Result<String> {
    let lines: Vec<&str> = content.split_inclusive('\n').collect();

    let index = lines
        .iter()
        .position(|line| line.trim() == marker)
        .ok_or_else(|| PatternError::MarkerMissing {
            path: path.to_path_buf(),
            marker,
        })?;

    if lines.iter().any(|line| line.trim() == entry) {
        return Ok(content.to_string());
    }

    let marker_line = lines[index];
    let indent = &marker_line[..marker_line.len() - marker_line.trim_start().len()];
    let newline = if marker_line.ends_with("\r\n") { "\r\n" } else { "\n" };

    let mut patched = String::with_capacity(content.len() + indent.len() + entry.len() + 2);
    for (i, line) in lines.iter().enumerate() {
        if i == index {
            patched.push_str(indent);
            patched.push_str(entry);
            patched.push_str(newline);
        }
        patched.push_str(line);
    }
    Ok(patched)
}
