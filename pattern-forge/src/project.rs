//! The PHP project being scaffolded
//!
//! A [`Project`] ties the project root to its configuration and resolved
//! [`Layout`]. The root namespace is taken from configuration when set,
//! otherwise from the `autoload.psr-4` entry in `composer.json` that maps to
//! the app directory, otherwise `App`.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::PatternConfig;
use crate::error::{PatternError, Result};
use crate::naming::Layout;
use crate::schema::DatabaseTarget;

/// Root namespace used when neither config nor `composer.json` provide one
pub const DEFAULT_ROOT_NAMESPACE: &str = "App";

/// A project on disk plus its configuration
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    config: PatternConfig,
    layout: Layout,
}

impl Project {
    /// Load configuration for the project rooted at `root`
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded.
    pub fn load(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let config = PatternConfig::load(&root)?;
        Ok(Self::with_config(root, config))
    }

    /// Build a project from an already loaded configuration
    #[must_use]
    pub fn with_config(root: PathBuf, config: PatternConfig) -> Self {
        let root_namespace = config
            .root_namespace
            .clone()
            .or_else(|| detect_root_namespace(&root, &config.paths.app))
            .unwrap_or_else(|| DEFAULT_ROOT_NAMESPACE.to_string());
        tracing::debug!(%root_namespace, "resolved root namespace");

        let layout = Layout::new(&config.paths, &root_namespace);
        Self {
            root,
            config,
            layout,
        }
    }

    /// Project root directory
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Loaded configuration
    #[must_use]
    pub const fn config(&self) -> &PatternConfig {
        &self.config
    }

    /// Resolved layout
    #[must_use]
    pub const fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Absolute (root-joined) form of a project-relative path
    #[must_use]
    pub fn resolve(&self, relative: &Path) -> PathBuf {
        self.root.join(relative)
    }

    /// Configured stub override directory, root-joined
    #[must_use]
    pub fn stubs_dir(&self) -> Option<PathBuf> {
        self.config.stubs.dir.as_deref().map(|dir| self.resolve(dir))
    }

    /// Column names never listed as fillable
    #[must_use]
    pub fn excluded_fields(&self) -> &[String] {
        &self.config.model.excluded_fields
    }

    /// Work out which database to inspect
    ///
    /// Order: `database.url` config, `DATABASE_URL` environment variable,
    /// then the `DB_*` keys of the project's `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::Database`] when no source yields a usable
    /// connection target.
    pub fn database_target(&self) -> Result<DatabaseTarget> {
        if let Some(url) = &self.config.database.url {
            return DatabaseTarget::from_url(url);
        }
        if let Ok(url) = std::env::var("DATABASE_URL") {
            return DatabaseTarget::from_url(&url);
        }

        let env_file = self.root.join(".env");
        if env_file.is_file() {
            let vars = read_env_file(&env_file)?;
            return DatabaseTarget::from_env_map(&vars, &self.root);
        }

        Err(PatternError::Database(format!(
            "no database configured: set database.url in {}, DATABASE_URL, or DB_* keys in {}",
            crate::config::CONFIG_FILE,
            env_file.display()
        )))
    }
}

/// Find the namespace `composer.json` maps to the app directory
#[must_use]
pub fn detect_root_namespace(root: &Path, app_dir: &Path) -> Option<String> {
    let manifest = fs::read_to_string(root.join("composer.json")).ok()?;
    let manifest: serde_json::Value = serde_json::from_str(&manifest).ok()?;
    let psr4 = manifest.get("autoload")?.get("psr-4")?.as_object()?;

    let wanted = normalize_dir(&app_dir.to_string_lossy());
    psr4.iter().find_map(|(namespace, dir)| {
        let matches = match dir {
            serde_json::Value::String(dir) => normalize_dir(dir) == wanted,
            serde_json::Value::Array(dirs) => dirs
                .iter()
                .filter_map(serde_json::Value::as_str)
                .any(|dir| normalize_dir(dir) == wanted),
            _ => false,
        };
        matches.then(|| namespace.trim_end_matches('\\').to_string())
    })
}

fn normalize_dir(dir: &str) -> String {
    dir.trim_start_matches("./").trim_end_matches('/').to_string()
}

fn read_env_file(path: &Path) -> Result<HashMap<String, String>> {
    let iter = dotenvy::from_path_iter(path).map_err(|e| env_error(path, &e))?;
    iter.map(|item| item.map_err(|e| env_error(path, &e)))
        .collect()
}

fn env_error(path: &Path, err: &dotenvy::Error) -> PatternError {
    PatternError::Database(format!("failed to read {}: {err}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) {
        fs::write(dir.path().join(name), content).unwrap();
    }

    #[test]
    fn test_detect_root_namespace_from_composer() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "composer.json",
            r#"{"autoload": {"psr-4": {"Database\\Seeders\\": "database/seeders/", "Acme\\": "app/"}}}"#,
        );

        assert_eq!(
            detect_root_namespace(dir.path(), Path::new("app")).as_deref(),
            Some("Acme")
        );
        assert_eq!(detect_root_namespace(dir.path(), Path::new("src")), None);
    }

    #[test]
    fn test_detect_root_namespace_array_form() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "composer.json",
            r#"{"autoload": {"psr-4": {"Shop\\": ["./app", "lib/"]}}}"#,
        );
        assert_eq!(
            detect_root_namespace(dir.path(), Path::new("app")).as_deref(),
            Some("Shop")
        );
    }

    #[test]
    fn test_project_falls_back_to_default_namespace() {
        let dir = TempDir::new().unwrap();
        let project = Project::with_config(dir.path().to_path_buf(), PatternConfig::default());
        assert_eq!(project.layout().root_namespace, DEFAULT_ROOT_NAMESPACE);
    }

    #[test]
    fn test_configured_namespace_wins() {
        let dir = TempDir::new().unwrap();
        write(&dir, "composer.json", r#"{"autoload": {"psr-4": {"Acme\\": "app/"}}}"#);
        let config = PatternConfig {
            root_namespace: Some("Override".to_string()),
            ..PatternConfig::default()
        };
        let project = Project::with_config(dir.path().to_path_buf(), config);
        assert_eq!(project.layout().root_namespace, "Override");
    }

    #[test]
    fn test_database_target_from_config_url() {
        let dir = TempDir::new().unwrap();
        let mut config = PatternConfig::default();
        config.database.url = Some("sqlite://shop.db".to_string());
        let project = Project::with_config(dir.path().to_path_buf(), config);

        assert!(matches!(
            project.database_target().unwrap(),
            DatabaseTarget::Url(url) if url == "sqlite://shop.db"
        ));
    }

    #[test]
    fn test_read_env_file() {
        let dir = TempDir::new().unwrap();
        write(&dir, ".env", "DB_CONNECTION=mysql\nDB_DATABASE=\"shop\"\n# comment\n");
        let vars = read_env_file(&dir.path().join(".env")).unwrap();
        assert_eq!(vars.get("DB_CONNECTION").map(String::as_str), Some("mysql"));
        assert_eq!(vars.get("DB_DATABASE").map(String::as_str), Some("shop"));
    }
}
