//! pattern-forge CLI tool

#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use pattern_forge::observability;
use pattern_forge_cli_lib::prompt;
use pattern_forge_cli_lib::{InitCommand, ModelCommand, PatternCommand, StubsCommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pattern-forge")]
#[command(version)]
#[command(about = "Repository/service scaffolding for Laravel-style PHP projects", long_about = None)]
struct Cli {
    /// Project root
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Never prompt; fail when input is missing
    #[arg(short = 'n', long, global = true)]
    no_interaction: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate repository, service and provider bindings
    Pattern(PatternCommand),
    /// Generate an Eloquent model from a table
    Model(ModelCommand),
    /// Manage stub templates
    Stubs {
        #[command(subcommand)]
        command: StubsCommand,
    },
    /// Write a default pattern-forge.toml
    Init(InitCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    observability::init(cli.verbose).context("Failed to initialize logging")?;

    let prompter = prompt::detect(cli.no_interaction);

    match cli.command {
        Commands::Pattern(cmd) => cmd.execute(&cli.root, prompter.as_ref()).await?,
        Commands::Model(cmd) => cmd.execute(&cli.root, prompter.as_ref()).await?,
        Commands::Stubs { command } => command.execute(&cli.root)?,
        Commands::Init(cmd) => cmd.execute(&cli.root)?,
    }

    Ok(())
}
