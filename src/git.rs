//! Git operations: default branch detection and changed files.

pub mod remote;
pub mod repository;

pub use remote::{detect_default_branch, resolve_default_branch, DefaultBranchSource};
pub use repository::GitRepository;
