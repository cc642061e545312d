//! Data structures and serialization.

use serde::{Deserialize, Serialize};

pub mod report;
pub mod workflow;
pub mod yaml;

pub use report::OutputFormat;
pub use workflow::*;
pub use yaml::*;

/// Output of the `workflows` commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowReport {
    /// Version information for the omni-ci tool.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub versions: Option<VersionInfo>,
    /// Repository the workflows were read from.
    pub repository: RepositoryInfo,
    /// Files the pull request changes (only present for relevance reports).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changed_files: Option<Vec<String>>,
    /// Analyzed workflows in declaration order.
    pub workflows: Vec<AnalyzedWorkflow>,
}

/// Version information for tools and environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionInfo {
    /// Version of the omni-ci tool.
    pub omni_ci: String,
}

impl VersionInfo {
    /// Returns the version of this build.
    pub fn current() -> Self {
        Self {
            omni_ci: crate::VERSION.to_string(),
        }
    }
}

/// Repository information for the report header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryInfo {
    /// Repository root directory.
    pub root: String,
    /// Default branch the workflows were classified against.
    pub default_branch: String,
    /// Where the default branch name came from.
    pub default_branch_source: String,
}
