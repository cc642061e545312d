//! Trigger classification of workflow documents.
//!
//! Decides whether a workflow runs once a change lands on the default branch
//! and collects the branch and path patterns that gate it.

use serde_yaml::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::data::workflow::{AnalyzedWorkflow, TriggerAnalysis, WorkflowDocument};
use crate::workflow::glob;
use crate::workflow::trigger::{DeclaredEvent, EventConfig, EventKind, TriggerDeclaration};

/// Sentinel meaning "every branch" or "every path".
pub const ALL: &str = "*";

/// Prefix marking an exclude path pattern in [`TriggerAnalysis::trigger_paths`].
pub const EXCLUDE_PREFIX: char = '!';

/// Why a workflow document yielded no trigger information.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnparseableReason {
    /// The definition text could not be obtained upstream.
    #[error("workflow content is unavailable")]
    ContentUnavailable,

    /// The definition text is not valid YAML.
    #[error("invalid workflow YAML: {0}")]
    InvalidYaml(String),

    /// The document has no `on` trigger.
    #[error("workflow declares no `on` trigger")]
    MissingTrigger,

    /// The `on` trigger is neither a string, a list, nor a mapping.
    #[error("unsupported `on` trigger shape")]
    UnsupportedTriggerShape,
}

/// Result of analyzing one workflow document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// The trigger declaration was read and classified.
    Parsed(TriggerAnalysis),
    /// No trigger information could be extracted.
    Unparseable(UnparseableReason),
}

impl ParseOutcome {
    /// Returns the analysis, or the never-triggers analysis if unparseable.
    pub fn into_analysis(self) -> TriggerAnalysis {
        match self {
            Self::Parsed(analysis) => analysis,
            Self::Unparseable(_) => TriggerAnalysis::default(),
        }
    }

    /// Returns the reason the document was unparseable, if it was.
    pub fn reason(&self) -> Option<&UnparseableReason> {
        match self {
            Self::Parsed(_) => None,
            Self::Unparseable(reason) => Some(reason),
        }
    }
}

/// Classifies a trigger declaration against the default branch.
pub fn classify(declaration: &TriggerDeclaration, default_branch: &str) -> TriggerAnalysis {
    let mut analysis = TriggerAnalysis::default();

    for event in declaration.events() {
        analysis.trigger_events.push(event.name.clone());

        match event.kind() {
            EventKind::Push if event.config.is_none() => {
                analysis.is_triggered_on_default_branch = true;
                analysis.trigger_branches.push(ALL.to_string());
                analysis.trigger_paths.push(ALL.to_string());
            }
            EventKind::Push | EventKind::PullRequest => {
                classify_filtered_event(&event, default_branch, &mut analysis);
            }
            EventKind::Other => {}
        }
    }

    analysis
}

/// Handles a branch-filtering event whose configuration may restrict it.
fn classify_filtered_event(
    event: &DeclaredEvent,
    default_branch: &str,
    analysis: &mut TriggerAnalysis,
) {
    let Some(config) = &event.config else {
        debug!(event = %event.name, "Event has no configuration, skipping branch check");
        return;
    };

    if !collect_branches(config, default_branch, &mut analysis.trigger_branches) {
        return;
    }

    debug!(event = %event.name, default_branch = %default_branch, "Event targets default branch");
    analysis.is_triggered_on_default_branch = true;
    collect_paths(config, &mut analysis.trigger_paths);
}

/// Appends the declared branch patterns and reports whether any reaches the
/// default branch.
fn collect_branches(
    config: &EventConfig,
    default_branch: &str,
    trigger_branches: &mut Vec<String>,
) -> bool {
    let Some(branches) = &config.branches else {
        return false;
    };

    trigger_branches.extend(branches.iter().cloned());

    branches
        .iter()
        .any(|pattern| pattern == default_branch || glob::matches(default_branch, pattern))
}

fn collect_paths(config: &EventConfig, trigger_paths: &mut Vec<String>) {
    if config.has_no_path_filter() {
        trigger_paths.push(ALL.to_string());
        return;
    }

    if let Some(paths) = &config.paths {
        trigger_paths.extend(paths.iter().cloned());
    }

    if let Some(ignored) = &config.paths_ignore {
        trigger_paths.extend(ignored.iter().map(|p| format!("{EXCLUDE_PREFIX}{p}")));
    }
}

/// Parses a workflow document and classifies its trigger declaration.
pub fn analyze_document(document: &WorkflowDocument, default_branch: &str) -> ParseOutcome {
    if document.error {
        return ParseOutcome::Unparseable(UnparseableReason::ContentUnavailable);
    }

    let root: Value = match serde_yaml::from_str(&document.content) {
        Ok(root) => root,
        Err(e) => return ParseOutcome::Unparseable(UnparseableReason::InvalidYaml(e.to_string())),
    };

    let on = match root.get("on") {
        None | Some(Value::Null) => {
            return ParseOutcome::Unparseable(UnparseableReason::MissingTrigger)
        }
        Some(Value::String(s)) if s.is_empty() => {
            return ParseOutcome::Unparseable(UnparseableReason::MissingTrigger)
        }
        Some(on) => on,
    };

    match TriggerDeclaration::from_value(on) {
        Some(declaration) => ParseOutcome::Parsed(classify(&declaration, default_branch)),
        None => ParseOutcome::Unparseable(UnparseableReason::UnsupportedTriggerShape),
    }
}

/// Analyzes every document, returning results ordered by document index.
///
/// Unparseable documents are logged and carry the never-triggers analysis;
/// they do not affect their siblings.
pub fn analyze_all(documents: Vec<WorkflowDocument>, default_branch: &str) -> Vec<AnalyzedWorkflow> {
    let mut analyzed: Vec<AnalyzedWorkflow> = documents
        .into_iter()
        .map(|document| {
            let outcome = analyze_document(&document, default_branch);
            let diagnostic = outcome.reason().map(|reason| {
                warn!(
                    workflow = %document.workflow.name,
                    path = %document.workflow.path,
                    "Failed to analyze workflow: {reason}"
                );
                reason.to_string()
            });

            AnalyzedWorkflow {
                workflow: document.workflow,
                index: document.index,
                trigger_analysis: Some(outcome.into_analysis()),
                diagnostic,
            }
        })
        .collect();

    analyzed.sort_by_key(|w| w.index);
    analyzed
}

/// Keeps only workflows whose analysis says they run on merge.
pub fn retain_default_branch_triggered(workflows: Vec<AnalyzedWorkflow>) -> Vec<AnalyzedWorkflow> {
    workflows
        .into_iter()
        .filter(AnalyzedWorkflow::is_triggered_on_default_branch)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::data::workflow::WorkflowDescriptor;

    fn document(content: &str, index: usize) -> WorkflowDocument {
        WorkflowDocument::new(
            WorkflowDescriptor::new(
                format!("wf-{index}"),
                format!(".github/workflows/wf-{index}.yml"),
            ),
            content,
            index,
        )
    }

    fn analyze(content: &str, default_branch: &str) -> TriggerAnalysis {
        match analyze_document(&document(content, 0), default_branch) {
            ParseOutcome::Parsed(analysis) => analysis,
            ParseOutcome::Unparseable(reason) => panic!("unexpected unparseable: {reason}"),
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    // ── string and list shapes ───────────────────────────────────────

    #[test]
    fn bare_push_triggers_everything() {
        let analysis = analyze("on: push\njobs: {}\n", "main");
        assert!(analysis.is_triggered_on_default_branch);
        assert_eq!(analysis.trigger_events, strings(&["push"]));
        assert_eq!(analysis.trigger_branches, strings(&["*"]));
        assert_eq!(analysis.trigger_paths, strings(&["*"]));
    }

    #[test]
    fn bare_non_push_event() {
        let analysis = analyze("on: workflow_dispatch", "main");
        assert!(!analysis.is_triggered_on_default_branch);
        assert_eq!(analysis.trigger_events, strings(&["workflow_dispatch"]));
        assert!(analysis.trigger_branches.is_empty());
        assert!(analysis.trigger_paths.is_empty());
    }

    #[test]
    fn list_with_push() {
        let analysis = analyze("on: [pull_request, push]", "main");
        assert!(analysis.is_triggered_on_default_branch);
        assert_eq!(analysis.trigger_events, strings(&["pull_request", "push"]));
        assert_eq!(analysis.trigger_branches, strings(&["*"]));
        assert_eq!(analysis.trigger_paths, strings(&["*"]));
    }

    #[test]
    fn list_with_bare_pull_request_only() {
        let analysis = analyze("on: [pull_request]", "main");
        assert!(!analysis.is_triggered_on_default_branch);
        assert_eq!(analysis.trigger_events, strings(&["pull_request"]));
    }

    // ── mapping shape ────────────────────────────────────────────────

    #[test]
    fn pull_request_on_default_branch() {
        let analysis = analyze("on:\n  pull_request:\n    branches: [main]\n", "main");
        assert!(analysis.is_triggered_on_default_branch);
        assert_eq!(analysis.trigger_branches, strings(&["main"]));
        assert_eq!(analysis.trigger_paths, strings(&["*"]));
    }

    #[test]
    fn pull_request_target_branch_as_string() {
        let analysis = analyze("on:\n  pull_request_target:\n    branches: main\n", "main");
        assert!(analysis.is_triggered_on_default_branch);
        assert_eq!(analysis.trigger_events, strings(&["pull_request_target"]));
        assert_eq!(analysis.trigger_branches, strings(&["main"]));
    }

    #[test]
    fn push_to_release_branches_on_develop() {
        let analysis = analyze("on:\n  push:\n    branches: ['release/*']\n", "develop");
        assert!(!analysis.is_triggered_on_default_branch);
        assert_eq!(analysis.trigger_branches, strings(&["release/*"]));
        assert!(analysis.trigger_paths.is_empty());
    }

    #[test]
    fn push_without_config_in_mapping() {
        let analysis = analyze("on:\n  push:\n  workflow_dispatch:\n", "main");
        assert!(analysis.is_triggered_on_default_branch);
        assert_eq!(
            analysis.trigger_events,
            strings(&["push", "workflow_dispatch"])
        );
        assert_eq!(analysis.trigger_branches, strings(&["*"]));
        assert_eq!(analysis.trigger_paths, strings(&["*"]));
    }

    #[test]
    fn push_with_config_but_no_branches() {
        let analysis = analyze("on:\n  push:\n    tags: ['v*']\n", "main");
        assert!(!analysis.is_triggered_on_default_branch);
        assert_eq!(analysis.trigger_events, strings(&["push"]));
        assert!(analysis.trigger_branches.is_empty());
    }

    #[test]
    fn empty_string_push_is_bare_push() {
        let analysis = analyze("on:\n  push: ''\n", "main");
        assert!(analysis.is_triggered_on_default_branch);
        assert_eq!(analysis.trigger_branches, strings(&["*"]));
        assert_eq!(analysis.trigger_paths, strings(&["*"]));
    }

    #[test]
    fn empty_string_branches_record_nothing() {
        let analysis = analyze("on:\n  pull_request:\n    branches: ''\n", "main");
        assert!(!analysis.is_triggered_on_default_branch);
        assert!(analysis.trigger_branches.is_empty());
    }

    #[test]
    fn empty_string_paths_leave_workflow_unrestricted() {
        let analysis = analyze("on:\n  push:\n    branches: [main]\n    paths: ''\n", "main");
        assert!(analysis.is_triggered_on_default_branch);
        assert_eq!(analysis.trigger_paths, strings(&["*"]));
    }

    #[test]
    fn pull_request_without_config_does_not_trigger() {
        let analysis = analyze("on:\n  pull_request:\n", "main");
        assert!(!analysis.is_triggered_on_default_branch);
        assert!(analysis.trigger_branches.is_empty());
        assert!(analysis.trigger_paths.is_empty());
    }

    #[test]
    fn wildcard_branch_matches_default() {
        let analysis = analyze("on:\n  push:\n    branches: ['ma*']\n", "main");
        assert!(analysis.is_triggered_on_default_branch);
    }

    #[test]
    fn double_star_prefix_branch_does_not_match_plain_default() {
        let analysis = analyze("on:\n  push:\n    branches: ['feature/**']\n", "main");
        assert!(!analysis.is_triggered_on_default_branch);
        assert_eq!(analysis.trigger_branches, strings(&["feature/**"]));
    }

    #[test]
    fn paths_and_paths_ignore_collected() {
        let analysis = analyze(
            "on:\n  push:\n    branches: [main]\n    paths: ['src/**', 'Cargo.toml']\n    paths-ignore: ['src/generated/**']\n",
            "main",
        );
        assert!(analysis.is_triggered_on_default_branch);
        assert_eq!(
            analysis.trigger_paths,
            strings(&["src/**", "Cargo.toml", "!src/generated/**"])
        );
    }

    #[test]
    fn paths_ignore_only() {
        let analysis = analyze(
            "on:\n  pull_request:\n    branches: [main]\n    paths-ignore: docs/**\n",
            "main",
        );
        assert_eq!(analysis.trigger_paths, strings(&["!docs/**"]));
    }

    #[test]
    fn paths_not_collected_when_branch_misses() {
        let analysis = analyze(
            "on:\n  push:\n    branches: [develop]\n    paths: ['src/**']\n",
            "main",
        );
        assert!(!analysis.is_triggered_on_default_branch);
        assert_eq!(analysis.trigger_branches, strings(&["develop"]));
        assert!(analysis.trigger_paths.is_empty());
    }

    #[test]
    fn branches_ignore_is_not_consulted() {
        let analysis = analyze(
            "on:\n  push:\n    branches-ignore: [main]\n",
            "main",
        );
        assert!(!analysis.is_triggered_on_default_branch);
        assert!(analysis.trigger_branches.is_empty());
    }

    #[test]
    fn multiple_events_accumulate_in_order() {
        let analysis = analyze(
            "on:\n  pull_request:\n    branches: [main, develop]\n    paths: ['src/**']\n  push:\n    branches: [main]\n  schedule:\n    - cron: '0 0 * * *'\n",
            "main",
        );
        assert!(analysis.is_triggered_on_default_branch);
        assert_eq!(
            analysis.trigger_events,
            strings(&["pull_request", "push", "schedule"])
        );
        assert_eq!(
            analysis.trigger_branches,
            strings(&["main", "develop", "main"])
        );
        assert_eq!(analysis.trigger_paths, strings(&["src/**", "*"]));
    }

    #[test]
    fn default_branch_invariant_holds() {
        let analysis = analyze("on:\n  push:\n    branches: ['v*', main]\n", "main");
        assert!(analysis.is_triggered_on_default_branch);
        assert!(analysis
            .trigger_branches
            .iter()
            .any(|b| b == "main" || glob::matches("main", b)));
    }

    // ── unparseable documents ────────────────────────────────────────

    #[test]
    fn error_flagged_document_ignores_content() {
        let mut doc = document("on: push", 0);
        doc.error = true;
        let outcome = analyze_document(&doc, "main");
        assert_eq!(
            outcome,
            ParseOutcome::Unparseable(UnparseableReason::ContentUnavailable)
        );
        assert_eq!(outcome.into_analysis(), TriggerAnalysis::default());
    }

    #[test]
    fn invalid_yaml_is_unparseable() {
        let outcome = analyze_document(&document("on: [push\n  bad: {", 0), "main");
        assert!(matches!(
            outcome,
            ParseOutcome::Unparseable(UnparseableReason::InvalidYaml(_))
        ));
    }

    #[test]
    fn missing_trigger_is_unparseable() {
        for content in ["name: CI\njobs: {}\n", "- just\n- a list\n", "on:\n", "on: ''"] {
            let outcome = analyze_document(&document(content, 0), "main");
            assert_eq!(
                outcome,
                ParseOutcome::Unparseable(UnparseableReason::MissingTrigger),
                "content: {content:?}"
            );
        }
    }

    #[test]
    fn unsupported_trigger_shape() {
        let outcome = analyze_document(&document("on: 42", 0), "main");
        assert_eq!(
            outcome,
            ParseOutcome::Unparseable(UnparseableReason::UnsupportedTriggerShape)
        );
    }

    // ── analyze_all ──────────────────────────────────────────────────

    #[test]
    fn analyze_all_orders_by_index() {
        let docs = vec![
            document("on: push", 2),
            document("on: workflow_dispatch", 0),
            document("not: [valid", 1),
        ];
        let analyzed = analyze_all(docs, "main");
        let indices: Vec<_> = analyzed.iter().map(|w| w.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert!(analyzed.iter().all(|w| w.trigger_analysis.is_some()));
        assert!(analyzed[1].diagnostic.is_some());
        assert!(analyzed[2].is_triggered_on_default_branch());
    }

    #[test]
    fn unparseable_sibling_does_not_block_others() {
        let mut broken = document("on: push", 0);
        broken.error = true;
        let analyzed = analyze_all(vec![broken, document("on: push", 1)], "main");
        assert_eq!(analyzed.len(), 2);
        assert!(!analyzed[0].is_triggered_on_default_branch());
        assert_eq!(
            analyzed[0].diagnostic.as_deref(),
            Some("workflow content is unavailable")
        );
        assert!(analyzed[1].is_triggered_on_default_branch());
    }

    #[test]
    fn retain_triggered_drops_others() {
        let analyzed = analyze_all(
            vec![
                document("on: push", 0),
                document("on: release", 1),
                document("on:\n  pull_request:\n    branches: [main]\n", 2),
            ],
            "main",
        );
        let kept = retain_default_branch_triggered(analyzed);
        let indices: Vec<_> = kept.iter().map(|w| w.index).collect();
        assert_eq!(indices, vec![0, 2]);
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        fn event_name() -> impl Strategy<Value = String> {
            prop_oneof![
                Just("push".to_string()),
                Just("pull_request".to_string()),
                Just("pull_request_target".to_string()),
                Just("workflow_dispatch".to_string()),
                "[a-z_]{1,12}",
            ]
        }

        fn declaration() -> impl Strategy<Value = TriggerDeclaration> {
            let config = (
                proptest::option::of(proptest::collection::vec("[a-z*/]{1,10}", 0..4)),
                proptest::option::of(proptest::collection::vec("[a-z*/]{1,10}", 0..4)),
                proptest::option::of(proptest::collection::vec("[a-z*/]{1,10}", 0..4)),
            )
                .prop_map(|(branches, paths, paths_ignore)| EventConfig {
                    branches,
                    branches_ignore: None,
                    paths,
                    paths_ignore,
                });
            let event = (event_name(), proptest::option::of(config))
                .prop_map(|(name, config)| DeclaredEvent { name, config });

            prop_oneof![
                event_name().prop_map(TriggerDeclaration::Single),
                proptest::collection::vec(event_name(), 0..5).prop_map(TriggerDeclaration::List),
                proptest::collection::vec(event, 0..5).prop_map(TriggerDeclaration::Mapping),
            ]
        }

        proptest! {
            #[test]
            fn classification_is_idempotent(decl in declaration(), branch in "[a-z/]{1,10}") {
                prop_assert_eq!(classify(&decl, &branch), classify(&decl, &branch));
            }

            #[test]
            fn every_event_is_recorded(decl in declaration(), branch in "[a-z/]{1,10}") {
                let analysis = classify(&decl, &branch);
                prop_assert_eq!(analysis.trigger_events.len(), decl.events().len());
            }

            #[test]
            fn triggered_implies_matching_branch(decl in declaration(), branch in "[a-z/]{1,10}") {
                let analysis = classify(&decl, &branch);
                if analysis.is_triggered_on_default_branch {
                    prop_assert!(analysis
                        .trigger_branches
                        .iter()
                        .any(|b| *b == branch || glob::matches(&branch, b)));
                }
            }
        }
    }
}
