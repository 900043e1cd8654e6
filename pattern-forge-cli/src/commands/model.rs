//! Model generation command

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use pattern_forge::naming::{suggest_table_name, ModelNames};
use pattern_forge::prelude::*;
use std::path::Path;
use std::time::Duration;

use crate::output;
use crate::prompt::{self, Prompter};

/// Generate an Eloquent model from a database table
#[derive(Debug, Clone, Default, Args)]
pub struct ModelCommand {
    /// Model name (e.g. `User`, `Models/User`)
    pub name: Option<String>,

    /// Table to read columns from (default: plural snake case of the name)
    #[arg(long)]
    pub table: Option<String>,
}

impl ModelCommand {
    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error if the model already exists, input is missing, or
    /// the table cannot be read.
    pub async fn execute(self, root: &Path, prompter: &dyn Prompter) -> Result<()> {
        let project = Project::load(root).context("Failed to load project configuration")?;
        let stubs = StubSet::load(project.stubs_dir().as_deref()).context("Failed to load stubs")?;

        let name = prompt::value_or_ask(prompter, self.name, "Model name", None, "NAME")?;
        let names = ModelNames::new(&name, project.layout())?;
        if project.resolve(&names.file.path).exists() {
            return Err(PatternError::TargetExists(names.file.path).into());
        }

        let table = ask_table(prompter, self.table, names.class_name())?;

        println!(
            "{} {} {}",
            style("Generating").green().bold(),
            style("model:").bold(),
            style(names.file.fqcn()).cyan().bold()
        );
        println!();

        let report = plan_model(&project, &stubs, &name, &table)
            .await?
            .apply()
            .context("Failed to write model")?;
        output::print_report(&report);

        println!();
        println!("{}", style(format!("{}Model created.", output::CHECK)).green().bold());
        Ok(())
    }
}

/// Table name from the flag or a prompt defaulting to the model's plural
pub(crate) fn ask_table(prompter: &dyn Prompter, table: Option<String>, model: &str) -> Result<String> {
    let suggested = suggest_table_name(model);
    prompt::value_or_ask(prompter, table, "Table name", Some(&suggested), "--table")
}

/// Read the table's columns and render the model
pub(crate) async fn plan_model(
    project: &Project,
    stubs: &StubSet,
    name: &str,
    table: &str,
) -> Result<GenerationPlan> {
    let generator = ModelGenerator::new(project, stubs, name, table)?;
    if generator.exists() {
        return Err(PatternError::TargetExists(generator.names().file.path.clone()).into());
    }

    let target = project.database_target()?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .context("Failed to set progress style")?,
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!("Reading columns of {table}..."));

    let result = async {
        let inspector = SqlxInspector::connect(&target).await?;
        generator.plan_from(&inspector).await
    }
    .await;
    spinner.finish_and_clear();

    result.with_context(|| format!("Failed to build model from table '{table}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::scripted::Scripted;
    use crate::prompt::NonInteractive;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_ask_table_suggests_plural() {
        let prompter = Scripted::new(&[""]);
        assert_eq!(ask_table(&prompter, None, "OrderItem").unwrap(), "order_items");
        assert_eq!(
            ask_table(&prompter, Some("legacy_items".into()), "OrderItem").unwrap(),
            "legacy_items"
        );
    }

    #[tokio::test]
    async fn test_existing_model_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("app")).unwrap();
        fs::write(dir.path().join("app/User.php"), "<?php").unwrap();

        let command = ModelCommand {
            name: Some("User".into()),
            table: Some("users".into()),
        };
        let err = command.execute(dir.path(), &NonInteractive).await.unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(fs::read_to_string(dir.path().join("app/User.php")).unwrap(), "<?php");
    }

    #[tokio::test]
    async fn test_missing_name_without_terminal() {
        let dir = TempDir::new().unwrap();
        let err = ModelCommand::default()
            .execute(dir.path(), &NonInteractive)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("pass NAME"));
    }
}
