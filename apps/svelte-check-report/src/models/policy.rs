//! Filter policy applied by the diagnostic store.
//!
//! Two independent policies are involved:
//! - `scope`: decides whether a diagnostic is kept at all, based on the set
//!   of files changed by the pull request.
//! - `fail_filter`: decides whether a kept diagnostic counts toward the
//!   failure thresholds. It never removes anything from the store.

use crate::matcher::PathMatcher;

#[derive(Debug, Clone)]
/// Change-scope filtering mode (`filterChanges`).
pub enum ScopeFilter {
    /// Never skip.
    Disabled,
    /// Skip anything outside the changed-file set.
    Unconditional,
    /// Skip paths matching the globs that are outside the changed-file set.
    /// Non-matching paths are always kept.
    Glob(PathMatcher),
}

impl ScopeFilter {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, ScopeFilter::Disabled)
    }
}

#[derive(Debug, Clone)]
/// Immutable filter configuration for one run.
pub struct FilterPolicy {
    pub scope: ScopeFilter,
    pub fail_filter: PathMatcher,
}

impl Default for FilterPolicy {
    fn default() -> Self {
        FilterPolicy {
            scope: ScopeFilter::Disabled,
            fail_filter: PathMatcher::any(),
        }
    }
}
