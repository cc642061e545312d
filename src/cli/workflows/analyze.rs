//! Analyze command: lists the workflows a merge would run.

use anyhow::Result;
use clap::Parser;
use tracing::info;

use super::{print_report, SourceArgs};
use crate::workflow::retain_default_branch_triggered;

/// Analyze command options.
#[derive(Parser)]
pub struct AnalyzeCommand {
    /// Workflow source options.
    #[command(flatten)]
    pub source: SourceArgs,

    /// Includes workflows that do not run on merge, and unparseable ones.
    #[arg(long)]
    pub all: bool,
}

impl AnalyzeCommand {
    /// Executes the analyze command.
    pub async fn execute(self) -> Result<()> {
        let format = self.source.output_format()?;
        let workspace = self.source.open_workspace()?;

        let mut workflows = self.source.analyze(&workspace).await?;
        if !self.all {
            workflows = retain_default_branch_triggered(workflows);
        }
        info!(count = workflows.len(), "Workflows to report");

        print_report(&workspace, None, workflows, format)
    }
}
