//! Workflow trigger classification.
//!
//! The classification engine is pure: trigger declarations are normalized
//! ([`trigger`]), classified against the default branch ([`analyzer`]), and
//! optionally narrowed to the files a pull request changes ([`relevance`]).
//! [`source`] supplies the raw documents from a repository checkout.

pub mod analyzer;
pub mod glob;
pub mod relevance;
pub mod source;
pub mod trigger;

pub use analyzer::{
    analyze_all, analyze_document, classify, retain_default_branch_triggered, ParseOutcome,
    UnparseableReason,
};
pub use relevance::{changed_paths, filter_by_changed_files, is_relevant};
pub use trigger::{DeclaredEvent, EventConfig, EventKind, TriggerDeclaration};
