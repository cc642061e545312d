//! Glob matching for workflow branch and path filters.
//!
//! GitHub Actions filters use a small wildcard grammar. Only the subset
//! needed to decide whether a filter reaches the default branch, or whether
//! a changed file falls under a path filter, is implemented here.

use regex::Regex;
use tracing::debug;

/// Returns true if `candidate` matches the branch `pattern`.
///
/// - `*` and `**` match everything.
/// - `prefix/**` matches anything under `prefix/` when the prefix itself
///   carries no wildcard.
/// - Any other pattern containing `*` is matched as an anchored regex with
///   `*` as "any run of characters" and `?` as "exactly one character".
///
/// Patterns without `*` never match here; exact comparison is left to the
/// caller. Matching is case-sensitive and an empty pattern matches nothing.
pub fn matches(candidate: &str, pattern: &str) -> bool {
    if pattern.is_empty() {
        return false;
    }

    if pattern == "*" || pattern == "**" {
        return true;
    }

    if let Some(prefix) = pattern.strip_suffix("/**") {
        if !has_wildcard(prefix) {
            return candidate
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('/'));
        }
    }

    if !pattern.contains('*') {
        return false;
    }

    wildcard_regex(pattern, true).is_some_and(|re| re.is_match(candidate))
}

/// Returns true if the changed file `path` satisfies the path `pattern`.
///
/// Patterns containing `*` become anchored regexes where `*` matches any run
/// of characters and every other character is literal. Plain patterns match
/// the exact path or any path beneath it as a directory.
pub fn matches_path(path: &str, pattern: &str) -> bool {
    if pattern.is_empty() {
        return false;
    }

    if pattern.contains('*') {
        return wildcard_regex(pattern, false).is_some_and(|re| re.is_match(path));
    }

    path == pattern
        || path
            .strip_prefix(pattern)
            .is_some_and(|rest| rest.starts_with('/'))
}

fn has_wildcard(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Translates a wildcard pattern into an anchored regex.
///
/// Runs of `*` collapse into a single `.*`.
fn wildcard_regex(pattern: &str, single_char_wildcard: bool) -> Option<Regex> {
    let mut source = String::with_capacity(pattern.len() + 8);
    source.push('^');

    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => {
                while chars.peek() == Some(&'*') {
                    chars.next();
                }
                source.push_str(".*");
            }
            '?' if single_char_wildcard => source.push('.'),
            _ => source.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
    }

    source.push('$');

    match Regex::new(&source) {
        Ok(re) => Some(re),
        Err(e) => {
            debug!(pattern = %pattern, error = %e, "Failed to compile wildcard pattern");
            None
        }
    }
}
