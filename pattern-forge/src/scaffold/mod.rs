//! File generation
//!
//! Generators build a [`GenerationPlan`] first and only touch the disk when
//! the plan is applied.

mod generator;
mod model;
pub mod plan;
pub mod provider;

pub use generator::{ModelRef, PatternGenerator};
pub use model::ModelGenerator;
pub use plan::{FileAction, GenerationPlan, GenerationReport, PlannedWrite, ReportEntry, WriteMode};
