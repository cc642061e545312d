//! Normalization of the `on:` trigger declaration.
//!
//! A workflow may declare its triggers as a bare event name, a list of event
//! names, or a mapping of event name to event configuration. Each shape is
//! resolved once into [`TriggerDeclaration`] so the classifier only ever sees
//! a uniform list of [`DeclaredEvent`]s.

use serde_yaml::Value;

/// Event that runs on pushes to matching branches.
pub const PUSH: &str = "push";
/// Event that runs for pull requests targeting matching branches.
pub const PULL_REQUEST: &str = "pull_request";
/// Pull request event evaluated in the context of the base branch.
pub const PULL_REQUEST_TARGET: &str = "pull_request_target";

/// The three legal shapes of a trigger declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerDeclaration {
    /// `on: push`
    Single(String),
    /// `on: [push, pull_request]`
    List(Vec<String>),
    /// `on: { push: { branches: [main] } }`
    Mapping(Vec<DeclaredEvent>),
}

/// One event of a trigger declaration with its optional configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredEvent {
    /// Event name as written in the workflow.
    pub name: String,
    /// Event configuration; `None` when the event was declared without one.
    pub config: Option<EventConfig>,
}

/// Branch and path filters of a single event.
///
/// Each field is `None` when the key is absent. A key whose value is neither
/// a string nor a list normalizes to an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventConfig {
    /// `branches` filter.
    pub branches: Option<Vec<String>>,
    /// `branches-ignore` filter. Parsed but not consulted by the classifier.
    pub branches_ignore: Option<Vec<String>>,
    /// `paths` filter.
    pub paths: Option<Vec<String>>,
    /// `paths-ignore` filter.
    pub paths_ignore: Option<Vec<String>>,
}

/// Event families the classifier distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// `push`
    Push,
    /// `pull_request` or `pull_request_target`
    PullRequest,
    /// Any event not reachable by merging into the default branch.
    Other,
}

impl EventKind {
    /// Classifies an event name.
    pub fn from_name(name: &str) -> Self {
        match name {
            PUSH => Self::Push,
            PULL_REQUEST | PULL_REQUEST_TARGET => Self::PullRequest,
            _ => Self::Other,
        }
    }
}

impl TriggerDeclaration {
    /// Resolves the parsed `on:` value into a declaration.
    ///
    /// Returns `None` for null, empty, or otherwise unsupported shapes.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(name) if !name.is_empty() => Some(Self::Single(name.clone())),
            Value::Sequence(items) => Some(Self::List(
                items.iter().filter_map(scalar_to_string).collect(),
            )),
            Value::Mapping(map) => Some(Self::Mapping(
                map.iter()
                    .filter_map(|(key, config)| {
                        let name = scalar_to_string(key)?;
                        Some(DeclaredEvent {
                            name,
                            config: EventConfig::from_value(config),
                        })
                    })
                    .collect(),
            )),
            Value::Tagged(tagged) => Self::from_value(&tagged.value),
            _ => None,
        }
    }

    /// Returns every declared event in declaration order.
    pub fn events(&self) -> Vec<DeclaredEvent> {
        match self {
            Self::Single(name) => vec![DeclaredEvent::bare(name)],
            Self::List(names) => names.iter().map(|n| DeclaredEvent::bare(n)).collect(),
            Self::Mapping(events) => events.clone(),
        }
    }
}

impl DeclaredEvent {
    /// Creates an event declared without configuration.
    pub fn bare(name: &str) -> Self {
        Self {
            name: name.to_string(),
            config: None,
        }
    }

    /// Returns the event family of this event.
    pub fn kind(&self) -> EventKind {
        EventKind::from_name(&self.name)
    }
}

impl EventConfig {
    /// Reads an event configuration value.
    ///
    /// `null` or an empty string means the event has no configuration.
    /// Other values that are not mappings count as a configuration that
    /// declares no filters.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            v if is_unset(v) => None,
            Value::Mapping(_) => Some(Self {
                branches: pattern_list(value.get("branches")),
                branches_ignore: pattern_list(value.get("branches-ignore")),
                paths: pattern_list(value.get("paths")),
                paths_ignore: pattern_list(value.get("paths-ignore")),
            }),
            Value::Tagged(tagged) => Self::from_value(&tagged.value),
            _ => Some(Self::default()),
        }
    }

    /// Returns true if neither `paths` nor `paths-ignore` is declared.
    pub fn has_no_path_filter(&self) -> bool {
        self.paths.is_none() && self.paths_ignore.is_none()
    }
}

/// Normalizes a string-or-list filter value.
fn pattern_list(value: Option<&Value>) -> Option<Vec<String>> {
    match value? {
        v if is_unset(v) => None,
        Value::String(s) => Some(vec![s.clone()]),
        Value::Sequence(items) => Some(items.iter().filter_map(scalar_to_string).collect()),
        _ => Some(Vec::new()),
    }
}

/// Null and empty-string values count as not declared.
fn is_unset(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
