//! Default branch detection

use std::fmt;

use git2::{BranchType, Repository};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::utils::settings;

/// Environment variable overriding the default branch.
pub const DEFAULT_BRANCH_ENV: &str = "OMNI_CI_DEFAULT_BRANCH";

/// Branch assumed when nothing else names one.
pub const FALLBACK_DEFAULT_BRANCH: &str = "main";

/// Branch names checked when the remote HEAD is unknown.
const COMMON_BRANCHES: [&str; 3] = ["main", "master", "develop"];

/// Where the default branch name came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultBranchSource {
    /// Given on the command line
    Flag,
    /// Read from `OMNI_CI_DEFAULT_BRANCH` or the settings file
    Environment,
    /// Symbolic target of `refs/remotes/origin/HEAD`
    RemoteHead,
    /// First common branch name present in the repository
    CommonBranch,
    /// Nothing found; assumed `main`
    Fallback,
}

impl fmt::Display for DefaultBranchSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag => write!(f, "flag"),
            Self::Environment => write!(f, "environment"),
            Self::RemoteHead => write!(f, "origin/HEAD"),
            Self::CommonBranch => write!(f, "common branch"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

/// Resolve the default branch name
///
/// Priority:
/// 1. `flag` (from `--default-branch`)
/// 2. `OMNI_CI_DEFAULT_BRANCH`, falling back to the settings file
/// 3. the repository's `origin/HEAD` or a common branch name
/// 4. `main`
pub fn resolve_default_branch(
    flag: Option<&str>,
    repo: Option<&Repository>,
) -> (String, DefaultBranchSource) {
    if let Some(branch) = flag.filter(|b| !b.is_empty()) {
        return (branch.to_string(), DefaultBranchSource::Flag);
    }

    if let Ok(branch) = settings::get_env_var(DEFAULT_BRANCH_ENV) {
        if !branch.is_empty() {
            return (branch, DefaultBranchSource::Environment);
        }
    }

    if let Some(repo) = repo {
        if let Some(detected) = detect_default_branch(repo) {
            return detected;
        }
    }

    (
        FALLBACK_DEFAULT_BRANCH.to_string(),
        DefaultBranchSource::Fallback,
    )
}

/// Detect the default branch from the repository's references
pub fn detect_default_branch(repo: &Repository) -> Option<(String, DefaultBranchSource)> {
    // The remote HEAD records the branch GitHub considers the default
    if let Ok(head_ref) = repo.find_reference("refs/remotes/origin/HEAD") {
        if let Some(branch_name) = head_ref
            .symbolic_target()
            .and_then(|target| target.strip_prefix("refs/remotes/origin/"))
        {
            debug!(branch = branch_name, "Default branch from origin/HEAD");
            return Some((branch_name.to_string(), DefaultBranchSource::RemoteHead));
        }
    }

    for branch_type in [BranchType::Remote, BranchType::Local] {
        for branch_name in COMMON_BRANCHES {
            let name = match branch_type {
                BranchType::Remote => format!("origin/{branch_name}"),
                BranchType::Local => branch_name.to_string(),
            };
            if repo.find_branch(&name, branch_type).is_ok() {
                debug!(branch = branch_name, "Default branch from common branch names");
                return Some((branch_name.to_string(), DefaultBranchSource::CommonBranch));
            }
        }
    }

    None
}
