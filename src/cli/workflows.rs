//! Workflow-related CLI commands.

mod analyze;
mod relevant;

pub use analyze::AnalyzeCommand;
pub use relevant::RelevantCommand;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use termcolor::{ColorChoice, StandardStream};
use tracing::debug;

use crate::data::{
    AnalyzedWorkflow, OutputFormat, RepositoryInfo, VersionInfo, WorkflowDescriptor,
    WorkflowReport,
};
use crate::git::{resolve_default_branch, DefaultBranchSource, GitRepository};
use crate::workflow::{analyze_all, source};

/// Workflow operations.
#[derive(Parser)]
pub struct WorkflowsCommand {
    /// Workflows subcommand to execute.
    #[command(subcommand)]
    pub command: WorkflowsSubcommands,
}

/// Workflows subcommands.
#[derive(Subcommand)]
pub enum WorkflowsSubcommands {
    /// Lists the workflows that run when a change is merged into the default branch.
    Analyze(AnalyzeCommand),
    /// Lists the merge-triggered workflows whose path filters match the changed files.
    Relevant(RelevantCommand),
}

impl WorkflowsCommand {
    /// Executes the workflows command.
    pub async fn execute(self) -> Result<()> {
        match self.command {
            WorkflowsSubcommands::Analyze(analyze_cmd) => analyze_cmd.execute().await,
            WorkflowsSubcommands::Relevant(relevant_cmd) => relevant_cmd.execute().await,
        }
    }
}

/// Options shared by every workflows subcommand.
#[derive(Args)]
pub struct SourceArgs {
    /// Repository directory (defaults to the current directory).
    #[arg(long, value_name = "DIR")]
    pub repo: Option<PathBuf>,

    /// Default branch to classify against (defaults to OMNI_CI_DEFAULT_BRANCH,
    /// then the repository's origin/HEAD).
    #[arg(long, value_name = "NAME")]
    pub default_branch: Option<String>,

    /// Workflow listing saved from GitHub's actions/workflows API.
    /// Without it, workflow files are discovered in .github/workflows.
    #[arg(long, value_name = "FILE")]
    pub listing: Option<PathBuf>,

    /// Maximum number of workflow files read at the same time.
    #[arg(long, default_value_t = source::DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Output format: text (default), json, yaml.
    #[arg(long, default_value = "text")]
    pub format: String,
}

/// Repository the workflows are read from, with its resolved default branch.
pub(crate) struct Workspace {
    pub(crate) root: PathBuf,
    pub(crate) git: Option<GitRepository>,
    pub(crate) default_branch: String,
    pub(crate) default_branch_source: DefaultBranchSource,
}

impl Workspace {
    pub(crate) fn repository_info(&self) -> RepositoryInfo {
        RepositoryInfo {
            root: self.root.display().to_string(),
            default_branch: self.default_branch.clone(),
            default_branch_source: self.default_branch_source.to_string(),
        }
    }
}

impl SourceArgs {
    /// Parses the requested output format.
    pub(crate) fn output_format(&self) -> Result<OutputFormat> {
        self.format
            .parse::<OutputFormat>()
            .map_err(anyhow::Error::msg)
    }

    /// Locates the repository and resolves its default branch.
    pub(crate) fn open_workspace(&self) -> Result<Workspace> {
        let dir = match &self.repo {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().context("Failed to determine current directory")?,
        };

        let git = match GitRepository::open_at(&dir) {
            Ok(git) => Some(git),
            Err(e) => {
                debug!(dir = %dir.display(), error = %e, "Not a git repository");
                None
            }
        };

        let root = git
            .as_ref()
            .and_then(|g| g.workdir())
            .map(Path::to_path_buf)
            .unwrap_or(dir);

        let (default_branch, default_branch_source) = resolve_default_branch(
            self.default_branch.as_deref(),
            git.as_ref().map(GitRepository::repository),
        );
        debug!(
            branch = %default_branch,
            source = %default_branch_source,
            "Resolved default branch"
        );

        Ok(Workspace {
            root,
            git,
            default_branch,
            default_branch_source,
        })
    }

    /// Loads and classifies every workflow of the workspace.
    pub(crate) async fn analyze(&self, workspace: &Workspace) -> Result<Vec<AnalyzedWorkflow>> {
        let descriptors = self.descriptors(&workspace.root)?;
        let documents =
            source::load_documents(&workspace.root, descriptors, self.concurrency).await;

        Ok(analyze_all(documents, &workspace.default_branch))
    }

    fn descriptors(&self, root: &Path) -> Result<Vec<WorkflowDescriptor>> {
        match &self.listing {
            Some(listing) => {
                let listing = source::load_listing(listing)?;
                Ok(source::filter_github_workflows(listing).workflows)
            }
            None => source::discover_workflows(root),
        }
    }
}

/// Writes a report to stdout, coloured when stdout is a terminal.
pub(crate) fn print_report(
    workspace: &Workspace,
    changed_files: Option<Vec<String>>,
    workflows: Vec<AnalyzedWorkflow>,
    format: OutputFormat,
) -> Result<()> {
    let report = WorkflowReport {
        versions: Some(VersionInfo::current()),
        repository: workspace.repository_info(),
        changed_files,
        workflows,
    };

    let color = if format == OutputFormat::Text {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(color);
    crate::data::report::write_report(&mut stdout, &report, format)
}
