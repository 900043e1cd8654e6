//! Name, path and namespace derivation
//!
//! Everything the generator writes is located and named from two inputs: the
//! name the user typed and the project [`Layout`]. Paths are relative to the
//! project root.

use inflector::Inflector;
use std::path::{Path, PathBuf};

use crate::config::PathSettings;
use crate::error::{PatternError, Result};

/// Suffix of generated PHP files
pub const PHP_EXTENSION: &str = "php";

/// Class name of the shared repository base class
pub const BASE_REPOSITORY: &str = "BaseRepository";

/// Class name of the shared internal service base class
pub const BASE_INTERNAL_SERVICE: &str = "BaseInternalService";

/// Class name of the provider binding repositories
pub const REPOSITORY_PROVIDER: &str = "RepositoryServiceProvider";

/// Class name of the provider binding internal services
pub const INTERNAL_PROVIDER: &str = "InternalServiceProvider";

/// Validate a PHP class identifier
///
/// # Errors
///
/// Returns [`PatternError::InvalidName`] when `name` is empty, starts with a
/// digit, or contains anything but ASCII letters, digits and `_`.
pub fn validate_class_name(name: &str) -> Result<()> {
    let invalid = |reason| PatternError::InvalidName {
        name: name.to_string(),
        reason,
    };

    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(invalid("name is empty"));
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return Err(invalid("must start with a letter or underscore"));
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(invalid("only letters, digits and underscores are allowed"));
    }
    Ok(())
}

/// Lower-case the first character only
///
/// ```
/// # use pattern_forge::naming::lcfirst;
/// assert_eq!(lcfirst("UserProfile"), "userProfile");
/// assert_eq!(lcfirst("HTTPClient"), "hTTPClient");
/// ```
#[must_use]
pub fn lcfirst(input: &str) -> String {
    let mut chars = input.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_lowercase().chain(chars).collect()
    })
}

/// Turn a folder path into a namespace fragment (`Services/Internals` → `Services\Internals`)
#[must_use]
pub fn namespace_from_folder(folder: &str) -> String {
    segments(folder).collect::<Vec<_>>().join("\\")
}

/// Default table name offered for a model (`UserProfile` → `user_profiles`)
#[must_use]
pub fn suggest_table_name(model: &str) -> String {
    let class = model.rsplit(['/', '\\']).next().unwrap_or(model);
    class.to_snake_case().to_plural()
}

fn segments(folder: &str) -> impl Iterator<Item = &str> {
    folder.split(['/', '\\']).map(str::trim).filter(|s| !s.is_empty())
}

fn join_namespace(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| p.trim_matches('\\'))
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\\")
}

/// Project directory layout and root namespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// App directory relative to the project root
    pub app_dir: PathBuf,
    /// Namespace mapped to the app directory, without trailing separator
    pub root_namespace: String,
    /// Internal services folder inside the app directory
    pub internal: String,
    /// Repositories folder inside the app directory
    pub repository: String,
    /// Providers folder inside the app directory
    pub providers: String,
    /// Models folder inside the app directory
    pub models: String,
}

impl Layout {
    /// Build a layout from path settings and a resolved root namespace
    #[must_use]
    pub fn new(paths: &PathSettings, root_namespace: &str) -> Self {
        Self {
            app_dir: paths.app.clone(),
            root_namespace: root_namespace.trim_matches('\\').to_string(),
            internal: paths.internal.clone(),
            repository: paths.repository.clone(),
            providers: paths.providers.clone(),
            models: paths.models.clone(),
        }
    }

    /// Namespace of a folder inside the app directory
    #[must_use]
    pub fn namespace_for(&self, folder: &str) -> String {
        join_namespace(&[&self.root_namespace, &namespace_from_folder(folder)])
    }

    /// Directory of a folder inside the app directory
    #[must_use]
    pub fn dir_for(&self, folder: &str) -> PathBuf {
        segments(folder).fold(self.app_dir.clone(), |dir, seg| dir.join(seg))
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::new(&PathSettings::default(), "App")
    }
}

/// An interface and its implementing class living in one folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassPair {
    /// Folder holding both files
    pub dir: PathBuf,
    /// Namespace of both classes
    pub namespace: String,
    /// Interface short name
    pub interface_name: String,
    /// Class short name
    pub class_name: String,
}

impl ClassPair {
    /// Path of the interface file
    #[must_use]
    pub fn interface_path(&self) -> PathBuf {
        php_file(&self.dir, &self.interface_name)
    }

    /// Path of the class file
    #[must_use]
    pub fn class_path(&self) -> PathBuf {
        php_file(&self.dir, &self.class_name)
    }

    /// Fully qualified interface name
    #[must_use]
    pub fn interface_fqcn(&self) -> String {
        join_namespace(&[&self.namespace, &self.interface_name])
    }

    /// Fully qualified class name
    #[must_use]
    pub fn class_fqcn(&self) -> String {
        join_namespace(&[&self.namespace, &self.class_name])
    }
}

/// A single class file: base classes and providers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassFile {
    /// File path
    pub path: PathBuf,
    /// Namespace
    pub namespace: String,
    /// Short class name
    pub class_name: String,
}

impl ClassFile {
    fn in_folder(layout: &Layout, folder: &str, class_name: &str) -> Self {
        Self {
            path: php_file(&layout.dir_for(folder), class_name),
            namespace: layout.namespace_for(folder),
            class_name: class_name.to_string(),
        }
    }

    /// Fully qualified class name
    #[must_use]
    pub fn fqcn(&self) -> String {
        join_namespace(&[&self.namespace, &self.class_name])
    }
}

fn php_file(dir: &Path, class_name: &str) -> PathBuf {
    dir.join(format!("{class_name}.{PHP_EXTENSION}"))
}

/// Every name derived from a pattern name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternNames {
    /// Pattern name as typed (trimmed)
    pub name: String,
    /// Pattern name with a lower-cased first letter
    pub camel_name: String,
    /// `<Name>RepositoryInterface` / `<Name>EloquentRepository`
    pub repository: ClassPair,
    /// `<Name>ServiceInterface` / `<Name>Service`
    pub service: ClassPair,
    /// Shared repository base class
    pub base_repository: ClassFile,
    /// Shared internal service base class
    pub base_service: ClassFile,
    /// Provider binding repositories
    pub repository_provider: ClassFile,
    /// Provider binding internal services
    pub internal_provider: ClassFile,
}

impl PatternNames {
    /// Derive all names for `name`
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::InvalidName`] if the trimmed name is not a
    /// PHP class identifier.
    pub fn new(name: &str, layout: &Layout) -> Result<Self> {
        let name = name.trim();
        validate_class_name(name)?;

        let pair = |folder: &str, interface_suffix: &str, class_suffix: &str| {
            let folder = format!("{folder}/{name}");
            ClassPair {
                dir: layout.dir_for(&folder),
                namespace: layout.namespace_for(&folder),
                interface_name: format!("{name}{interface_suffix}"),
                class_name: format!("{name}{class_suffix}"),
            }
        };

        Ok(Self {
            name: name.to_string(),
            camel_name: lcfirst(name),
            repository: pair(&layout.repository, "RepositoryInterface", "EloquentRepository"),
            service: pair(&layout.internal, "ServiceInterface", "Service"),
            base_repository: ClassFile::in_folder(layout, &layout.repository, BASE_REPOSITORY),
            base_service: ClassFile::in_folder(layout, &layout.internal, BASE_INTERNAL_SERVICE),
            repository_provider: ClassFile::in_folder(layout, &layout.providers, REPOSITORY_PROVIDER),
            internal_provider: ClassFile::in_folder(layout, &layout.providers, INTERNAL_PROVIDER),
        })
    }
}

/// Names derived from a model name such as `User` or `Models/User`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelNames {
    /// Class file location and namespace
    pub file: ClassFile,
}

impl ModelNames {
    /// Derive the model class, namespace and path
    ///
    /// `/` and `\` both separate segments. A leading root namespace, however
    /// many segments it has, is dropped so `App\Models\User` and
    /// `Models/User` are equivalent.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::InvalidName`] if any segment is not a PHP
    /// class identifier.
    pub fn new(name: &str, layout: &Layout) -> Result<Self> {
        let trimmed = name.trim();
        let mut parts: Vec<&str> = segments(trimmed).collect();
        let root: Vec<&str> = segments(&layout.root_namespace).collect();
        if !root.is_empty() && parts.len() > root.len() && parts.starts_with(&root) {
            parts.drain(..root.len());
        }

        let Some((class_name, nested)) = parts.split_last() else {
            return Err(PatternError::InvalidName {
                name: name.to_string(),
                reason: "name is empty",
            });
        };
        for part in &parts {
            validate_class_name(part)?;
        }

        // An explicit folder in the name replaces the configured models folder
        let folder = if nested.is_empty() {
            layout.models.clone()
        } else {
            nested.join("/")
        };

        Ok(Self {
            file: ClassFile::in_folder(layout, &folder, class_name),
        })
    }

    /// Short class name
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.file.class_name
    }
}
