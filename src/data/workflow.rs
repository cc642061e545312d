//! Workflow, document, and pull request data structures.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a workflow as reported by GitHub.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    /// Workflow is enabled.
    #[default]
    Active,
    /// Workflow was disabled by a user.
    DisabledManually,
    /// Workflow was disabled because the repository was inactive.
    DisabledInactivity,
    /// Workflow was disabled because its repository is a fork.
    DisabledFork,
    /// Workflow was deleted.
    Deleted,
    /// Any state this version does not know about.
    #[serde(untagged)]
    Other(String),
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::DisabledManually => write!(f, "disabled_manually"),
            Self::DisabledInactivity => write!(f, "disabled_inactivity"),
            Self::DisabledFork => write!(f, "disabled_fork"),
            Self::Deleted => write!(f, "deleted"),
            Self::Other(state) => write!(f, "{state}"),
        }
    }
}

/// Identity of one CI workflow file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowDescriptor {
    /// Display name of the workflow.
    pub name: String,
    /// Repository-relative path of the workflow file.
    pub path: String,
    /// Lifecycle state.
    #[serde(default)]
    pub state: WorkflowState,
    /// Creation timestamp, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Canonical web URL, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,
}

impl WorkflowDescriptor {
    /// Creates an active workflow descriptor with no timestamps or URL.
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            state: WorkflowState::Active,
            created_at: None,
            updated_at: None,
            html_url: None,
        }
    }
}

/// Workflow listing envelope returned by GitHub's `actions/workflows` API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowsResponse {
    /// Number of workflows in the listing.
    pub total_count: usize,
    /// Listed workflows.
    #[serde(default)]
    pub workflows: Vec<WorkflowDescriptor>,
}

/// A workflow descriptor paired with its definition text.
#[derive(Debug, Clone)]
pub struct WorkflowDocument {
    /// Workflow identity.
    pub workflow: WorkflowDescriptor,
    /// Raw definition text, or a placeholder message when `error` is set.
    pub content: String,
    /// Position among the repository's workflows.
    pub index: usize,
    /// Set when the definition text could not be obtained.
    pub error: bool,
}

impl WorkflowDocument {
    /// Creates a document from successfully obtained text.
    pub fn new(workflow: WorkflowDescriptor, content: impl Into<String>, index: usize) -> Self {
        Self {
            workflow,
            content: content.into(),
            index,
            error: false,
        }
    }

    /// Creates a placeholder document for text that could not be obtained.
    pub fn unavailable(workflow: WorkflowDescriptor, reason: &str, index: usize) -> Self {
        Self {
            workflow,
            content: format!("Failed to read workflow content: {reason}"),
            index,
            error: true,
        }
    }
}

/// How a workflow is triggered with respect to the default branch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerAnalysis {
    /// Whether some declared event can fire against the default branch.
    pub is_triggered_on_default_branch: bool,
    /// Every declared event name, in declaration order.
    pub trigger_events: Vec<String>,
    /// Branch patterns collected from branch-filtering events.
    pub trigger_branches: Vec<String>,
    /// Path patterns gating execution; excludes are prefixed with `!`.
    pub trigger_paths: Vec<String>,
}

/// A workflow together with its trigger analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzedWorkflow {
    /// Workflow identity.
    pub workflow: WorkflowDescriptor,
    /// Position among the repository's workflows.
    pub index: usize,
    /// Trigger analysis, if one was attached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_analysis: Option<TriggerAnalysis>,
    /// Why the workflow could not be analyzed, if it could not.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}

impl AnalyzedWorkflow {
    /// Returns true if the attached analysis says the workflow runs on merge.
    pub fn is_triggered_on_default_branch(&self) -> bool {
        self.trigger_analysis
            .as_ref()
            .is_some_and(|a| a.is_triggered_on_default_branch)
    }
}

/// One file changed by a pull request, as listed by GitHub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestFile {
    /// Repository-relative path of the changed file.
    pub filename: String,
    /// Change status (`added`, `modified`, `removed`, `renamed`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Number of added lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additions: Option<u64>,
    /// Number of deleted lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deletions: Option<u64>,
    /// Total changed lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes: Option<u64>,
    /// Path before a rename.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_filename: Option<String>,
}

impl PullRequestFile {
    /// Creates a changed-file record with only a path.
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            status: None,
            additions: None,
            deletions: None,
            changes: None,
            previous_filename: None,
        }
    }
}
