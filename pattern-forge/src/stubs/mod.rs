//! Stub templates
//!
//! Every generated file starts from a stub. The defaults are compiled in;
//! a project can override any of them by dropping a file with the stub's
//! name into its stub directory (see `stubs publish`).
//!
//! Stubs render in strict mode: a placeholder with no value is an error
//! rather than an empty string, so no unresolved token reaches disk.

use handlebars::Handlebars;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PatternError, Result};

pub mod files;

/// The stubs a pattern run can render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StubKind {
    /// Repository contract
    RepositoryInterface,
    /// Eloquent repository
    RepositoryClass,
    /// Internal service contract
    ServiceInterface,
    /// Internal service
    ServiceClass,
    /// `RepositoryServiceProvider`
    RepositoryProvider,
    /// `InternalServiceProvider`
    InternalProvider,
    /// `BaseRepository`
    BaseRepository,
    /// `BaseInternalService`
    BaseInternalService,
    /// Eloquent model
    Model,
}

impl StubKind {
    /// Every stub kind
    pub const ALL: [Self; 9] = [
        Self::RepositoryInterface,
        Self::RepositoryClass,
        Self::ServiceInterface,
        Self::ServiceClass,
        Self::RepositoryProvider,
        Self::InternalProvider,
        Self::BaseRepository,
        Self::BaseInternalService,
        Self::Model,
    ];

    /// File name inside a stub directory
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::RepositoryInterface => "repository.interface.stub",
            Self::RepositoryClass => "repository.class.stub",
            Self::ServiceInterface => "service.interface.stub",
            Self::ServiceClass => "service.class.stub",
            Self::RepositoryProvider => "provider.repository.stub",
            Self::InternalProvider => "provider.internal.stub",
            Self::BaseRepository => "base.repository.stub",
            Self::BaseInternalService => "base.internal.stub",
            Self::Model => "model.stub",
        }
    }

    /// Compiled-in stub text
    #[must_use]
    pub const fn default_content(self) -> &'static str {
        match self {
            Self::RepositoryInterface => files::REPOSITORY_INTERFACE,
            Self::RepositoryClass => files::REPOSITORY_CLASS,
            Self::ServiceInterface => files::SERVICE_INTERFACE,
            Self::ServiceClass => files::SERVICE_CLASS,
            Self::RepositoryProvider => files::REPOSITORY_PROVIDER,
            Self::InternalProvider => files::INTERNAL_PROVIDER,
            Self::BaseRepository => files::BASE_REPOSITORY,
            Self::BaseInternalService => files::BASE_INTERNAL_SERVICE,
            Self::Model => files::MODEL,
        }
    }
}

impl fmt::Display for StubKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Where a loaded stub came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StubSource {
    /// Compiled-in default
    Embedded,
    /// Project override file
    File(PathBuf),
}

/// Registered stubs, ready to render
pub struct StubSet {
    handlebars: Handlebars<'static>,
    sources: Vec<(StubKind, StubSource)>,
}

impl StubSet {
    /// Register every stub, preferring files in `dir` over the defaults
    ///
    /// # Errors
    ///
    /// Returns an error if an override file cannot be read or any stub fails
    /// to parse.
    pub fn load(dir: Option<&Path>) -> Result<Self> {
        let mut handlebars = Handlebars::new();

        // Generated code, not HTML
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.set_strict_mode(true);

        let mut sources = Vec::with_capacity(StubKind::ALL.len());
        for kind in StubKind::ALL {
            let override_path = dir.map(|d| d.join(kind.file_name())).filter(|p| p.is_file());

            let (content, source) = match override_path {
                Some(path) => {
                    let content = fs::read_to_string(&path).map_err(|e| PatternError::io(&path, e))?;
                    tracing::debug!(stub = %kind, path = %path.display(), "using stub override");
                    (content, StubSource::File(path))
                }
                None => (kind.default_content().to_string(), StubSource::Embedded),
            };

            handlebars
                .register_template_string(kind.file_name(), content)
                .map_err(|source| PatternError::StubParse {
                    name: kind.file_name(),
                    source: Box::new(source),
                })?;
            sources.push((kind, source));
        }

        Ok(Self {
            handlebars,
            sources,
        })
    }

    /// Compiled-in stubs only
    ///
    /// # Errors
    ///
    /// Returns an error only if a compiled-in stub is malformed.
    pub fn embedded() -> Result<Self> {
        Self::load(None)
    }

    /// Render a stub
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::StubRender`] if the stub references a
    /// placeholder missing from `data`.
    pub fn render<T: Serialize>(&self, kind: StubKind, data: &T) -> Result<String> {
        self.handlebars
            .render(kind.file_name(), data)
            .map_err(|source| PatternError::StubRender {
                name: kind.file_name(),
                source: Box::new(source),
            })
    }

    /// Where `kind` was loaded from
    #[must_use]
    pub fn source(&self, kind: StubKind) -> Option<&StubSource> {
        self.sources
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, source)| source)
    }
}

impl fmt::Debug for StubSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StubSet")
            .field("sources", &self.sources)
            .finish_non_exhaustive()
    }
}

/// Outcome of publishing one stub
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedStub {
    /// Destination file
    pub path: PathBuf,
    /// `false` when an existing file was left alone
    pub written: bool,
}

/// Copy the compiled-in stubs into `dir` for customisation
///
/// Existing files are kept unless `force` is set.
///
/// # Errors
///
/// Returns an error if the directory or a file cannot be written.
pub fn publish(dir: &Path, force: bool) -> Result<Vec<PublishedStub>> {
    fs::create_dir_all(dir).map_err(|e| PatternError::io(dir, e))?;

    StubKind::ALL
        .iter()
        .map(|kind| {
            let path = dir.join(kind.file_name());
            if path.exists() && !force {
                return Ok(PublishedStub { path, written: false });
            }
            fs::write(&path, kind.default_content()).map_err(|e| PatternError::io(&path, e))?;
            Ok(PublishedStub { path, written: true })
        })
        .collect()
}
