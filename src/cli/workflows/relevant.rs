//! Relevant command: narrows merge-triggered workflows to a change set.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use super::{print_report, SourceArgs, Workspace};
use crate::workflow::{changed_paths, filter_by_changed_files, source};

/// Relevant command options.
#[derive(Parser)]
pub struct RelevantCommand {
    /// Workflow source options.
    #[command(flatten)]
    pub source: SourceArgs,

    /// Revision whose changes are inspected when no file list is given.
    #[arg(long, default_value = "HEAD")]
    pub head: String,

    /// Pull request file list saved from GitHub's pulls/{number}/files API.
    #[arg(long, value_name = "FILE")]
    pub pr_files: Option<PathBuf>,

    /// Changed file path; may be repeated.
    #[arg(long = "changed-file", value_name = "PATH")]
    pub changed_files: Vec<String>,
}

impl RelevantCommand {
    /// Executes the relevant command.
    pub async fn execute(self) -> Result<()> {
        let format = self.source.output_format()?;
        let workspace = self.source.open_workspace()?;

        let changed = self.collect_changed_paths(&workspace)?;
        info!(count = changed.len(), "Changed files");

        let workflows = self.source.analyze(&workspace).await?;
        let workflows = filter_by_changed_files(workflows, &changed);

        print_report(&workspace, Some(changed), workflows, format)
    }

    /// Combines the explicit file lists, or asks git when none was given.
    fn collect_changed_paths(&self, workspace: &Workspace) -> Result<Vec<String>> {
        let mut changed = Vec::new();
        if let Some(pr_files) = &self.pr_files {
            changed.extend(changed_paths(&source::load_pull_request_files(pr_files)?));
        }
        changed.extend(self.changed_files.iter().cloned());

        if self.pr_files.is_some() || !self.changed_files.is_empty() {
            return Ok(changed);
        }

        let git = workspace.git.as_ref().context(
            "No changed files given and not in a git repository. \
             Use --pr-files or --changed-file.",
        )?;
        let files = git.changed_files(&workspace.default_branch, &self.head)?;

        Ok(changed_paths(&files))
    }
}
