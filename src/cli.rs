//! CLI interface for omni-ci.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod workflows;

/// omni-ci: GitHub Actions trigger analysis.
#[derive(Parser)]
#[command(name = "omni-ci")]
#[command(
    about = "Finds the GitHub Actions workflows a merge into the default branch would run",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// The main command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Main command categories.
#[derive(Subcommand)]
pub enum Commands {
    /// Workflow trigger operations.
    Workflows(workflows::WorkflowsCommand),
}

impl Cli {
    /// Executes the CLI command.
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Workflows(workflows_cmd) => workflows_cmd.execute().await,
        }
    }
}
