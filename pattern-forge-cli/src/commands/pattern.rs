//! Repository/service pattern command

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use pattern_forge::naming::ModelNames;
use pattern_forge::prelude::*;
use std::path::Path;
use std::time::Duration;

use super::model::{ask_table, plan_model};
use crate::output;
use crate::prompt::{self, Prompter};

/// Generate a repository/service pattern
#[derive(Debug, Clone, Default, Args)]
pub struct PatternCommand {
    /// Pattern name (`PascalCase`, e.g. `User`, `OrderItem`)
    pub name: Option<String>,

    /// Model to bind the repository to; generated from `--table` if missing
    #[arg(long, conflicts_with = "no_model")]
    pub model: Option<String>,

    /// Table for a generated model (implies a model named after the pattern)
    #[arg(long, conflicts_with = "no_model")]
    pub table: Option<String>,

    /// Do not generate or bind a model
    #[arg(long)]
    pub no_model: bool,

    /// Show what would be written without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Skip refreshing the composer autoloader
    #[arg(long)]
    pub no_dump: bool,
}

impl PatternCommand {
    /// Execute the command
    ///
    /// All files are planned before any is written, so a conflict leaves the
    /// project untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if input is missing or invalid, a target file
    /// exists, the model table cannot be read, or a write fails.
    pub async fn execute(self, root: &Path, prompter: &dyn Prompter) -> Result<()> {
        let project = Project::load(root).context("Failed to load project configuration")?;
        let stubs = StubSet::load(project.stubs_dir().as_deref()).context("Failed to load stubs")?;

        let name = prompt::value_or_ask(prompter, self.name.clone(), "Pattern name", None, "NAME")?;
        let generator = PatternGenerator::new(&project, &stubs, &name, None)?;
        let model = self.model_name(generator.names(), prompter)?;

        println!(
            "{} {} {}",
            style("Generating").green().bold(),
            style("pattern:").bold(),
            style(&generator.names().name).cyan().bold()
        );
        println!();

        let mut plans = Vec::with_capacity(2);
        let model_ref = match model {
            None => None,
            Some(model) => {
                let names = ModelNames::new(&model, project.layout())?;
                let model_ref = ModelRef::from(&names);
                if project.resolve(&names.file.path).exists() {
                    println!(
                        "  {} {}",
                        style("Using existing model").dim(),
                        style(&model_ref.fqcn).cyan()
                    );
                } else {
                    // Conflicts in the pattern itself are reported before any database work
                    generator.plan()?;

                    let table = ask_table(prompter, self.table.clone(), names.class_name())?;
                    plans.push(plan_model(&project, &stubs, &model, &table).await?);
                }
                Some(model_ref)
            }
        };

        let generator = PatternGenerator::new(&project, &stubs, &name, model_ref)?;
        plans.push(generator.plan()?);

        if self.dry_run {
            for plan in &plans {
                output::print_plan(plan);
            }
            println!();
            println!("{}", style("Dry run: nothing was written.").yellow());
            return Ok(());
        }

        let mut report = GenerationReport::default();
        for plan in plans {
            report.extend(plan.apply().context("Failed to write generated files")?);
        }
        output::print_report(&report);

        if !self.no_dump {
            refresh_autoload(&project)?;
        }

        let names = generator.names();
        output::print_next_steps(&[
            names.repository_provider.fqcn(),
            names.internal_provider.fqcn(),
        ]);
        Ok(())
    }

    /// Model to bind, if any, from flags or prompts
    fn model_name(&self, names: &PatternNames, prompter: &dyn Prompter) -> Result<Option<String>> {
        if self.no_model {
            return Ok(None);
        }
        if let Some(model) = &self.model {
            return Ok(Some(model.clone()));
        }
        if self.table.is_some() {
            return Ok(Some(names.name.clone()));
        }

        let wanted = prompter.confirm(
            "Do you want to create a model?",
            false,
            "--model, --table or --no-model",
        )?;
        if !wanted {
            return Ok(None);
        }
        prompter
            .input("Model name", Some(&names.name), "--model")
            .map(Some)
    }
}

fn refresh_autoload(project: &Project) -> Result<()> {
    let autoloader = Autoloader::new(project.root(), &project.config().autoload);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .context("Failed to set progress style")?,
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!("Running {}...", autoloader.command_line()));
    let outcome = autoloader.run();
    spinner.finish_and_clear();

    match outcome {
        AutoloadOutcome::Succeeded => {
            println!();
            println!("  {}{}", output::CHECK, style("Autoload refreshed").green());
        }
        AutoloadOutcome::Disabled => {}
        other => {
            println!();
            println!(
                "  {}{} (run `{}` yourself)",
                output::WARN,
                style(other).yellow(),
                autoloader.command_line()
            );
        }
    }
    Ok(())
}
