//! Failure-threshold decision.

use crate::store::DiagnosticStore;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub failed: bool,
    /// Explanation, present only when `failed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Verdict {
    /// Fail when an enabled threshold has at least one filtered diagnostic.
    pub fn decide(store: &DiagnosticStore, fail_on_error: bool, fail_on_warning: bool) -> Self {
        let failed = (fail_on_error && store.filtered_error_count() > 0)
            || (fail_on_warning && store.filtered_warning_count() > 0);
        if !failed {
            return Verdict {
                failed,
                message: None,
            };
        }
        let message = format!(
            "Failed with {} filtered {} ({} total). {} & {}.",
            store.filtered_count(),
            plural(store.filtered_count(), "issue"),
            store.count(),
            describe("failOnError", fail_on_error, store.filtered_error_count()),
            describe("failOnWarning", fail_on_warning, store.filtered_warning_count()),
        );
        Verdict {
            failed,
            message: Some(message),
        }
    }
}

fn describe(key: &str, enabled: bool, count: usize) -> String {
    format!(
        "`{}` is {} ({} {})",
        key,
        if enabled { "enabled" } else { "disabled" },
        count,
        plural(count, "issue")
    )
}

pub(crate) fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::PathMatcher;
    use crate::models::policy::FilterPolicy;
    use crate::models::{Diagnostic, Position, Severity};
    use crate::paths::RepoPaths;

    fn store_with(fail_filter: &[&str], items: &[(&str, Severity)]) -> DiagnosticStore {
        let policy = FilterPolicy {
            fail_filter: PathMatcher::new(fail_filter).unwrap(),
            ..FilterPolicy::default()
        };
        let paths = RepoPaths::new("/repo");
        let mut store = DiagnosticStore::new(policy, None, paths.clone());
        for (rel, severity) in items {
            store.add(Diagnostic {
                severity: *severity,
                path: paths.absolute(rel),
                start: Position { line: 1, character: 0 },
                end: Position { line: 1, character: 1 },
                message: "m".into(),
                code: None,
                source: None,
            });
        }
        store
    }

    #[test]
    fn test_passes_when_thresholds_disabled() {
        let store = store_with(&["**"], &[("src/a.svelte", Severity::Error)]);
        let v = Verdict::decide(&store, false, false);
        assert!(!v.failed);
        assert!(v.message.is_none());
    }

    #[test]
    fn test_fails_on_filtered_error() {
        let store = store_with(
            &["**"],
            &[("src/a.svelte", Severity::Error), ("src/b.svelte", Severity::Warning)],
        );
        let v = Verdict::decide(&store, true, false);
        assert!(v.failed);
        assert_eq!(
            v.message.as_deref(),
            Some(
                "Failed with 2 filtered issues (2 total). `failOnError` is enabled (1 issue) \
                 & `failOnWarning` is disabled (1 issue)."
            )
        );
    }

    #[test]
    fn test_fail_filter_gates_threshold() {
        let store = store_with(
            &["lib/**"],
            &[("src/a.svelte", Severity::Error), ("lib/b.svelte", Severity::Warning)],
        );
        assert!(!Verdict::decide(&store, true, false).failed);
        assert!(Verdict::decide(&store, false, true).failed);
    }
}
