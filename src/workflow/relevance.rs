//! Narrowing merge-triggered workflows to those a pull request touches.

use tracing::debug;

use crate::data::workflow::{AnalyzedWorkflow, PullRequestFile, TriggerAnalysis};
use crate::workflow::analyzer::EXCLUDE_PREFIX;
use crate::workflow::glob;

/// Extracts the changed paths from a pull request file listing.
pub fn changed_paths(files: &[PullRequestFile]) -> Vec<String> {
    files.iter().map(|f| f.filename.clone()).collect()
}

/// Returns true if a workflow with this analysis runs when the changed files
/// are merged.
///
/// Exclude patterns (`!`-prefixed) are ignored: a file under an excluded path
/// still makes the workflow relevant when a positive pattern matches it.
pub fn is_relevant(analysis: &TriggerAnalysis, changed_paths: &[String]) -> bool {
    if !analysis.is_triggered_on_default_branch {
        return false;
    }

    if analysis.trigger_paths.is_empty() {
        return true;
    }

    let include_patterns: Vec<&str> = analysis
        .trigger_paths
        .iter()
        .map(String::as_str)
        .filter(|p| !p.starts_with(EXCLUDE_PREFIX))
        .collect();

    changed_paths.iter().any(|path| {
        include_patterns
            .iter()
            .any(|pattern| glob::matches_path(path, pattern))
    })
}

/// Keeps the workflows that run on merge and whose path filters match at
/// least one changed file. Input order is preserved.
pub fn filter_by_changed_files(
    workflows: Vec<AnalyzedWorkflow>,
    changed_paths: &[String],
) -> Vec<AnalyzedWorkflow> {
    debug!(changed = changed_paths.len(), "Filtering workflows by changed files");

    workflows
        .into_iter()
        .filter(|workflow| {
            let relevant = workflow
                .trigger_analysis
                .as_ref()
                .is_some_and(|analysis| is_relevant(analysis, changed_paths));
            debug!(workflow = %workflow.workflow.path, relevant, "Checked workflow relevance");
            relevant
        })
        .collect()
}
