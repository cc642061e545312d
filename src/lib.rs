//! # omni-ci
//!
//! Determines which GitHub Actions workflows of a repository run when a
//! change is merged into its default branch, and which of those a given
//! pull request actually touches.
//!
//! ## Quick Start
//!
//! ```rust
//! use omni_ci::data::{WorkflowDescriptor, WorkflowDocument};
//! use omni_ci::workflow::analyze_all;
//!
//! let ci = WorkflowDescriptor::new("CI", ".github/workflows/ci.yml");
//! let document = WorkflowDocument::new(ci, "on:\n  push:\n    branches: [main]\n", 0);
//!
//! let analyzed = analyze_all(vec![document], "main");
//! assert!(analyzed[0].is_triggered_on_default_branch());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod cli;
pub mod data;
pub mod git;
pub mod utils;
pub mod workflow;

pub use crate::cli::Cli;

/// The current version of omni-ci.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
