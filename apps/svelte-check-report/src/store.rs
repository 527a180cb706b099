//! Diagnostic store: groups kept diagnostics by file and keeps running counts.
//!
//! `add` first applies the change-scope skip policy. A skipped diagnostic is
//! dropped entirely. A kept one is appended to its file's group, counted by
//! severity, and counted again in the filtered tallies when its display path
//! matches the fail filter. The store only grows; there is no removal.

use crate::models::policy::{FilterPolicy, ScopeFilter};
use crate::models::{Diagnostic, Severity, Summary};
use crate::paths::RepoPaths;
use indexmap::{IndexMap, IndexSet};
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
/// Error and warning counters for one tally.
pub struct Tally {
    pub errors: usize,
    pub warnings: usize,
}

impl Tally {
    fn bump(&mut self, severity: Severity) {
        match severity {
            Severity::Error => self.errors += 1,
            Severity::Warning => self.warnings += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.errors + self.warnings
    }
}

#[derive(Debug)]
pub struct DiagnosticStore {
    policy: FilterPolicy,
    changed_files: Option<IndexSet<PathBuf>>,
    paths: RepoPaths,
    groups: IndexMap<PathBuf, Vec<Diagnostic>>,
    totals: Tally,
    filtered: Tally,
}

impl DiagnosticStore {
    /// `changed_files` is `None` when no change information is available, in
    /// which case scope filtering never removes anything.
    pub fn new(
        policy: FilterPolicy,
        changed_files: Option<IndexSet<PathBuf>>,
        paths: RepoPaths,
    ) -> Self {
        DiagnosticStore {
            policy,
            changed_files,
            paths,
            groups: IndexMap::new(),
            totals: Tally::default(),
            filtered: Tally::default(),
        }
    }

    /// Add a diagnostic. Returns whether it was kept.
    pub fn add(&mut self, diagnostic: Diagnostic) -> bool {
        if self.should_skip(&diagnostic) {
            return false;
        }

        let severity = diagnostic.severity;
        let counts_toward_failure = self
            .policy
            .fail_filter
            .is_match(&self.paths.display(&diagnostic.path));

        self.groups
            .entry(diagnostic.path.clone())
            .or_default()
            .push(diagnostic);
        self.totals.bump(severity);
        if counts_toward_failure {
            self.filtered.bump(severity);
        }
        true
    }

    fn should_skip(&self, diagnostic: &Diagnostic) -> bool {
        let changed = match (&self.policy.scope, &self.changed_files) {
            (ScopeFilter::Disabled, _) | (_, None) => return false,
            (_, Some(changed)) => changed,
        };
        if let ScopeFilter::Glob(matcher) = &self.policy.scope {
            if !matcher.is_match(&self.paths.display(&diagnostic.path)) {
                return false;
            }
        }
        // Membership uses the raw absolute path, globs use the display path.
        !changed.contains(&diagnostic.path)
    }

    /// Per-file groups in first-seen order.
    pub fn entries(&self) -> impl Iterator<Item = (&Path, &[Diagnostic])> + '_ {
        self.groups
            .iter()
            .map(|(path, diags)| (path.as_path(), diags.as_slice()))
    }

    /// All kept diagnostics, concatenated in `entries()` order.
    pub fn list(&self) -> impl Iterator<Item = &Diagnostic> + '_ {
        self.groups.values().flatten()
    }

    pub fn error_count(&self) -> usize {
        self.totals.errors
    }

    pub fn warning_count(&self) -> usize {
        self.totals.warnings
    }

    pub fn count(&self) -> usize {
        self.totals.total()
    }

    pub fn filtered_error_count(&self) -> usize {
        self.filtered.errors
    }

    pub fn filtered_warning_count(&self) -> usize {
        self.filtered.warnings
    }

    pub fn filtered_count(&self) -> usize {
        self.filtered.total()
    }

    pub fn file_count(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn policy(&self) -> &FilterPolicy {
        &self.policy
    }

    pub fn changed_files(&self) -> Option<&IndexSet<PathBuf>> {
        self.changed_files.as_ref()
    }

    pub fn paths(&self) -> &RepoPaths {
        &self.paths
    }

    pub fn summary(&self) -> Summary {
        Summary {
            errors: self.error_count(),
            warnings: self.warning_count(),
            total: self.count(),
            filtered_errors: self.filtered_error_count(),
            filtered_warnings: self.filtered_warning_count(),
            filtered_total: self.filtered_count(),
            files: self.file_count(),
        }
    }
}
