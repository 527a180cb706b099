//! Check runner: resolves change data, runs svelte-check per root and feeds
//! the results into a `DiagnosticStore`.
//!
//! Roots run in parallel; their results are added to the store serially and
//! in configured order, so the store is only ever mutated from one thread.

use crate::changes;
use crate::config::Effective;
use crate::error::Result;
use crate::ingest;
use crate::models::policy::ScopeFilter;
use crate::models::Diagnostic;
use crate::paths::{is_subdir, RepoPaths};
use crate::store::DiagnosticStore;
use crate::verdict::Verdict;
use indexmap::IndexSet;
use log::{debug, info};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Outcome of one check run.
pub struct Report {
    pub store: DiagnosticStore,
    pub verdict: Verdict,
    /// Roots that were checked, in configured order.
    pub checked: Vec<PathBuf>,
}

/// Whether `root` needs checking given the scope filter and change set.
///
/// Only unconditional filtering can skip a root: with glob scoping,
/// diagnostics outside the globs are kept even for unchanged files.
pub fn should_check_root(
    root: &Path,
    scope: &ScopeFilter,
    changed: Option<&IndexSet<PathBuf>>,
) -> bool {
    match (scope, changed) {
        (ScopeFilter::Unconditional, Some(changed)) => {
            changed.iter().any(|file| is_subdir(root, file))
        }
        _ => true,
    }
}

/// Run the full check described by `eff`.
pub fn run_check(eff: &Effective) -> Result<Report> {
    let paths = RepoPaths::new(&eff.repo_root);
    let policy = eff.policy()?;
    let changed = changes::changed_files(&paths, &policy.scope, &eff.change_source)?;
    debug!("changed files: {:?}", changed);

    let checked: Vec<PathBuf> = eff
        .roots
        .iter()
        .filter(|root| {
            let check = should_check_root(root, &policy.scope, changed.as_ref());
            info!(
                "{} \"{}\"",
                if check { "checking" } else { "skipped" },
                root.display()
            );
            check
        })
        .cloned()
        .collect();

    let results: Vec<Result<Vec<Diagnostic>>> = checked
        .par_iter()
        .map(|root| ingest::get_diagnostics(root, &eff.command))
        .collect();

    let mut store = DiagnosticStore::new(policy, changed, paths);
    for diagnostics in results {
        for d in diagnostics? {
            store.add(d);
        }
    }
    debug!(
        "kept {} diagnostics ({} filtered) across {} files",
        store.count(),
        store.filtered_count(),
        store.file_count()
    );

    let verdict = Verdict::decide(&store, eff.fail_on_error, eff.fail_on_warning);
    Ok(Report {
        store,
        verdict,
        checked,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{resolve_effective, Overrides};
    use crate::paths::normalize;
    use std::fs;
    use tempfile::tempdir;

    fn line(file: &str, kind: &str, line: u32) -> String {
        format!(
            r#"1 {{"type":"{}","filename":"{}","start":{{"line":{},"character":0}},"end":{{"line":{},"character":4}},"message":"{} here"}}"#,
            kind, file, line, line, kind
        )
    }

    /// Two roots, each with a canned svelte-check output file.
    fn fixture(root: &Path) {
        fs::create_dir(root.join(".git")).unwrap();
        for (app, body) in [
            (
                "apps/web",
                vec![
                    line("src/a.svelte", "error", 0),
                    line("src/b.svelte", "warning", 2),
                ],
            ),
            ("apps/docs", vec![line("src/c.svelte", "error", 1)]),
        ] {
            fs::create_dir_all(root.join(app)).unwrap();
            fs::write(root.join(app).join("out.txt"), body.join("\n")).unwrap();
        }
    }

    fn overrides(root: &Path) -> Overrides {
        Overrides {
            repo_root: root.to_str().map(str::to_string),
            paths: vec!["apps/web".into(), "apps/docs".into()],
            command: Some("cat out.txt; exit 1".into()),
            fail_on_error: Some(true),
            ..Overrides::default()
        }
    }

    #[test]
    fn test_run_without_change_data_keeps_everything() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fixture(root);

        let eff = resolve_effective(&overrides(root)).unwrap();
        let report = run_check(&eff).unwrap();
        assert_eq!(report.checked.len(), 2);
        assert_eq!(report.store.count(), 3);
        assert_eq!(report.store.error_count(), 2);
        let first: Vec<PathBuf> = report.store.entries().map(|(p, _)| p.to_path_buf()).collect();
        let root = normalize(root);
        assert_eq!(
            first,
            vec![
                root.join("apps/web/src/a.svelte"),
                root.join("apps/web/src/b.svelte"),
                root.join("apps/docs/src/c.svelte"),
            ]
        );
        assert!(report.verdict.failed);
    }

    #[test]
    fn test_run_skips_unchanged_roots_and_files() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fixture(root);
        fs::write(root.join("changed.txt"), "apps/web/src/b.svelte\n").unwrap();

        let ov = Overrides {
            changed_files: Some("changed.txt".into()),
            ..overrides(root)
        };
        let eff = resolve_effective(&ov).unwrap();
        let report = run_check(&eff).unwrap();
        assert_eq!(report.checked, vec![normalize(root).join("apps/web")]);
        assert_eq!(report.store.count(), 1);
        assert_eq!(report.store.warning_count(), 1);
        assert!(!report.verdict.failed);
    }

    #[test]
    fn test_run_glob_scope_checks_every_root() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fixture(root);
        fs::write(root.join("changed.txt"), "").unwrap();

        let ov = Overrides {
            changed_files: Some("changed.txt".into()),
            filter_changes: Some("apps/web/**".into()),
            fail_filter: vec!["apps/docs/**".into()],
            ..overrides(root)
        };
        let eff = resolve_effective(&ov).unwrap();
        let report = run_check(&eff).unwrap();
        assert_eq!(report.checked.len(), 2);
        // apps/web matches the scope glob and nothing changed there
        assert_eq!(report.store.count(), 1);
        assert_eq!(report.store.filtered_error_count(), 1);
        assert!(report.verdict.failed);
    }

    #[test]
    fn test_tool_failure_propagates() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fixture(root);
        let ov = Overrides {
            command: Some("exit 2".into()),
            ..overrides(root)
        };
        let eff = resolve_effective(&ov).unwrap();
        assert!(run_check(&eff).is_err());
    }

    #[test]
    fn test_should_check_root() {
        let changed: IndexSet<PathBuf> = [PathBuf::from("/repo/apps/web/a.svelte")].into_iter().collect();
        let web = Path::new("/repo/apps/web");
        let docs = Path::new("/repo/apps/docs");
        assert!(should_check_root(web, &ScopeFilter::Unconditional, Some(&changed)));
        assert!(!should_check_root(docs, &ScopeFilter::Unconditional, Some(&changed)));
        assert!(should_check_root(docs, &ScopeFilter::Unconditional, None));
        assert!(should_check_root(docs, &ScopeFilter::Disabled, Some(&changed)));
    }
}
