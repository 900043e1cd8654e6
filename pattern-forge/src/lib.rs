//! pattern-forge: repository/service scaffolding for Laravel-style PHP projects
//!
//! Given a pattern name, pattern-forge renders a repository interface and
//! class, a service interface and class, the shared base classes and two
//! service providers from stub templates, then wires the new classes into
//! the providers' container bindings. An optional Eloquent model is
//! generated from a table's column list.
//!
//! # Example
//!
//! ```rust,no_run
//! use pattern_forge::prelude::*;
//!
//! # fn main() -> Result<(), PatternError> {
//! let project = Project::load(".")?;
//! let stubs = StubSet::load(project.stubs_dir().as_deref())?;
//!
//! let generator = PatternGenerator::new(&project, &stubs, "User", None)?;
//! let plan = generator.plan()?;
//! let report = plan.apply()?;
//! for entry in report.entries() {
//!     println!("{} {}", entry.action, entry.path.display());
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod autoload;
pub mod config;
pub mod error;
pub mod naming;
pub mod observability;
pub mod project;
pub mod scaffold;
pub mod schema;
pub mod stubs;

pub use error::{PatternError, Result};

/// Commonly used types
pub mod prelude {
    pub use crate::autoload::{AutoloadOutcome, Autoloader};
    pub use crate::config::PatternConfig;
    pub use crate::error::{PatternError, Result};
    pub use crate::naming::{ModelNames, PatternNames};
    pub use crate::project::Project;
    pub use crate::scaffold::{
        FileAction, GenerationPlan, GenerationReport, ModelGenerator, ModelRef, PatternGenerator,
    };
    pub use crate::schema::{Column, DatabaseTarget, SchemaInspector, SqlxInspector};
    pub use crate::stubs::{StubKind, StubSet};
}
