//! Eloquent model generation from a table's columns

use serde_json::json;

use super::generator::ModelRef;
use super::plan::{GenerationPlan, PlannedWrite};
use crate::error::{PatternError, Result};
use crate::naming::ModelNames;
use crate::project::Project;
use crate::schema::{self, Column, SchemaInspector};
use crate::stubs::{StubKind, StubSet};

/// Generates one model class
#[derive(Debug)]
pub struct ModelGenerator<'a> {
    project: &'a Project,
    stubs: &'a StubSet,
    names: ModelNames,
    table: String,
}

impl<'a> ModelGenerator<'a> {
    /// Create a generator for model `name` backed by `table`
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::InvalidName`] or [`PatternError::InvalidTable`]
    /// for malformed input.
    pub fn new(project: &'a Project, stubs: &'a StubSet, name: &str, table: &str) -> Result<Self> {
        let names = ModelNames::new(name, project.layout())?;
        let table = table.trim();
        schema::validate_table_name(table)?;

        Ok(Self {
            project,
            stubs,
            names,
            table: table.to_string(),
        })
    }

    /// Derived names
    #[must_use]
    pub const fn names(&self) -> &ModelNames {
        &self.names
    }

    /// Table the model maps to
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Reference for binding a repository to this model
    #[must_use]
    pub fn model_ref(&self) -> ModelRef {
        ModelRef::from(&self.names)
    }

    /// Whether the model file is already on disk
    #[must_use]
    pub fn exists(&self) -> bool {
        self.project.resolve(&self.names.file.path).exists()
    }

    /// Render the model from a known column list
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::TargetExists`] if the model file exists.
    pub fn plan(&self, columns: &[Column]) -> Result<GenerationPlan> {
        self.check_target()?;

        let fillable = schema::fillable_fields(columns, self.project.excluded_fields());
        tracing::debug!(
            model = %self.names.file.fqcn(),
            table = %self.table,
            columns = columns.len(),
            fillable = fillable.len(),
            "rendering model"
        );

        let file = &self.names.file;
        let content = self.stubs.render(
            StubKind::Model,
            &json!({
                "namespace": file.namespace,
                "class_name": file.class_name,
                "table": self.table,
                "fillable": fillable,
            }),
        )?;
        tracing::info!(model = %file.fqcn(), table = %self.table, "model rendered");

        let mut plan = GenerationPlan::new(self.project.root());
        plan.push(PlannedWrite::create(
            file.path.clone(),
            content,
            format!("model {} for table {}", file.class_name, self.table),
        ));
        Ok(plan)
    }

    /// Look the table up with `inspector`, then render the model
    ///
    /// The target is checked before any query runs.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::TargetExists`] or any lookup error from the
    /// inspector.
    pub async fn plan_from(&self, inspector: &dyn SchemaInspector) -> Result<GenerationPlan> {
        self.check_target()?;
        let columns = inspector.columns(&self.table).await?;
        self.plan(&columns)
    }

    fn check_target(&self) -> Result<()> {
        if self.exists() {
            return Err(PatternError::TargetExists(self.names.file.path.clone()));
        }
        Ok(())
    }
}
