//! Locating and reading workflow definitions from a repository checkout.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::data::workflow::{
    PullRequestFile, WorkflowDescriptor, WorkflowDocument, WorkflowsResponse,
};

/// Repository-relative directory holding workflow definitions.
pub const WORKFLOWS_DIR: &str = ".github/workflows/";

/// Default number of workflow files read at the same time.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Keeps only listed workflows defined under `.github/workflows/`.
///
/// GitHub also lists dynamic workflows (code scanning, Pages, ...) whose
/// paths point elsewhere; those have no definition file to analyze.
pub fn filter_github_workflows(listing: WorkflowsResponse) -> WorkflowsResponse {
    let workflows: Vec<WorkflowDescriptor> = listing
        .workflows
        .into_iter()
        .filter(|w| w.path.starts_with(WORKFLOWS_DIR))
        .collect();

    WorkflowsResponse {
        total_count: workflows.len(),
        workflows,
    }
}

/// Loads a workflow listing saved from GitHub's `actions/workflows` API.
pub fn load_listing<P: AsRef<Path>>(path: P) -> Result<WorkflowsResponse> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read workflow listing: {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse workflow listing: {}", path.display()))
}

/// Loads a pull request file list saved from GitHub's `pulls/{n}/files` API.
pub fn load_pull_request_files<P: AsRef<Path>>(path: P) -> Result<Vec<PullRequestFile>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read pull request files: {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse pull request files: {}", path.display()))
}

/// Finds `*.yml` and `*.yaml` files in the repository's workflow directory.
///
/// Descriptors are named after their path and sorted by it. A repository
/// without a workflow directory has no workflows.
pub fn discover_workflows<P: AsRef<Path>>(repo_root: P) -> Result<Vec<WorkflowDescriptor>> {
    let dir = repo_root.as_ref().join(WORKFLOWS_DIR);
    if !dir.is_dir() {
        debug!(dir = %dir.display(), "No workflow directory found");
        return Ok(Vec::new());
    }

    let mut descriptors = Vec::new();
    let entries = std::fs::read_dir(&dir)
        .with_context(|| format!("Failed to read workflow directory: {}", dir.display()))?;

    for entry in entries {
        let entry = entry.context("Failed to read workflow directory entry")?;
        let file_path = entry.path();
        if !file_path.is_file() || !is_workflow_file(&file_path) {
            continue;
        }

        let Some(file_name) = file_path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let relative = format!("{WORKFLOWS_DIR}{file_name}");

        let mut descriptor = WorkflowDescriptor::new(relative.clone(), relative);
        if let Ok(metadata) = entry.metadata() {
            descriptor.created_at = metadata.created().ok().map(DateTime::<Utc>::from);
            descriptor.updated_at = metadata.modified().ok().map(DateTime::<Utc>::from);
        }
        descriptors.push(descriptor);
    }

    descriptors.sort_by(|a, b| a.path.cmp(&b.path));
    info!(count = descriptors.len(), "Discovered workflows");
    Ok(descriptors)
}

fn is_workflow_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e == "yml" || e == "yaml")
}

/// Reads the definition text of every workflow concurrently.
///
/// Each document carries its position in `workflows` as its index. A file
/// that cannot be read becomes an error-flagged placeholder document rather
/// than failing the whole load.
pub async fn load_documents(
    repo_root: &Path,
    workflows: Vec<WorkflowDescriptor>,
    concurrency: usize,
) -> Vec<WorkflowDocument> {
    let semaphore = Arc::new(tokio::sync::Semaphore::new(concurrency.max(1)));

    let futs: Vec<_> = workflows
        .into_iter()
        .enumerate()
        .map(|(index, workflow)| {
            let sem = semaphore.clone();
            let file_path: PathBuf = repo_root.join(&workflow.path);

            async move {
                let _permit = match sem.acquire().await {
                    Ok(permit) => permit,
                    Err(e) => {
                        return WorkflowDocument::unavailable(workflow, &e.to_string(), index)
                    }
                };

                match tokio::fs::read_to_string(&file_path).await {
                    Ok(content) => WorkflowDocument::new(workflow, content, index),
                    Err(e) => {
                        debug!(path = %file_path.display(), error = %e, "Failed to read workflow file");
                        WorkflowDocument::unavailable(workflow, &e.to_string(), index)
                    }
                }
            }
        })
        .collect();

    futures::future::join_all(futs).await
}
