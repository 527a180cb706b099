//! Changed-file provider.
//!
//! Produces the absolute paths touched by the current pull request, or
//! `None` when scope filtering is off or no change data can be obtained.
//! `None` and an empty set mean different things to the store: the first
//! disables skipping, the second allows every eligible diagnostic to be
//! skipped.

use crate::error::{Error, Result};
use crate::models::policy::ScopeFilter;
use crate::paths::RepoPaths;
use indexmap::IndexSet;
use log::{debug, warn};
use std::fs;
use std::path::PathBuf;
use std::process::Command;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Where the changed-file list comes from.
pub enum ChangeSource {
    /// Newline-separated, repo-relative list file.
    List(PathBuf),
    /// `git diff --name-only <base>...HEAD` in the repository root.
    GitDiff { base: String },
    /// No change information.
    Unavailable,
}

/// Resolve the changed-file set for `scope`.
pub fn changed_files(
    paths: &RepoPaths,
    scope: &ScopeFilter,
    source: &ChangeSource,
) -> Result<Option<IndexSet<PathBuf>>> {
    if !scope.is_enabled() {
        return Ok(None);
    }
    match source {
        ChangeSource::List(file) => {
            let file = paths.absolute(file);
            let text = fs::read_to_string(&file).map_err(|e| Error::io(&file, e))?;
            Ok(Some(parse_file_list(paths, &text)))
        }
        ChangeSource::GitDiff { base } => match git_diff(paths, base) {
            Ok(set) => Ok(Some(set)),
            Err(e) => {
                warn!("unable to list changed files, not filtering: {}", e);
                Ok(None)
            }
        },
        ChangeSource::Unavailable => {
            debug!("no change source configured, not filtering");
            Ok(None)
        }
    }
}

/// Parse a repo-relative file list into absolute paths. Blank lines are ignored.
pub fn parse_file_list(paths: &RepoPaths, text: &str) -> IndexSet<PathBuf> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| paths.absolute(l))
        .collect()
}

fn git_diff(paths: &RepoPaths, base: &str) -> Result<IndexSet<PathBuf>> {
    let range = format!("{}...HEAD", base);
    let out = Command::new("git")
        .args(["diff", "--name-only", &range])
        .current_dir(paths.root())
        .output()
        .map_err(|e| Error::Git {
            message: e.to_string(),
        })?;
    if !out.status.success() {
        return Err(Error::Git {
            message: String::from_utf8_lossy(&out.stderr).trim().to_string(),
        });
    }
    Ok(parse_file_list(paths, &String::from_utf8_lossy(&out.stdout)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::PathMatcher;
    use tempfile::tempdir;

    #[test]
    fn test_disabled_scope_yields_none() {
        let paths = RepoPaths::new("/repo");
        let src = ChangeSource::List(PathBuf::from("does-not-matter.txt"));
        assert_eq!(changed_files(&paths, &ScopeFilter::Disabled, &src).unwrap(), None);
    }

    #[test]
    fn test_list_file_is_resolved_against_root() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("changed.txt"), "src/a.svelte\n\n  lib/b.ts  \n").unwrap();
        let paths = RepoPaths::new(root);
        let set = changed_files(
            &paths,
            &ScopeFilter::Unconditional,
            &ChangeSource::List(PathBuf::from("changed.txt")),
        )
        .unwrap()
        .unwrap();
        let expected: Vec<PathBuf> = vec![paths.absolute("src/a.svelte"), paths.absolute("lib/b.ts")];
        assert_eq!(set.into_iter().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn test_empty_list_is_present_but_empty() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("changed.txt"), "\n").unwrap();
        let paths = RepoPaths::new(dir.path());
        let scope = ScopeFilter::Glob(PathMatcher::new(["src/**"]).unwrap());
        let set = changed_files(&paths, &scope, &ChangeSource::List("changed.txt".into())).unwrap();
        assert_eq!(set, Some(IndexSet::new()));
    }

    #[test]
    fn test_missing_list_file_is_an_error() {
        let dir = tempdir().unwrap();
        let paths = RepoPaths::new(dir.path());
        let res = changed_files(
            &paths,
            &ScopeFilter::Unconditional,
            &ChangeSource::List("nope.txt".into()),
        );
        assert!(matches!(res, Err(Error::Io { .. })));
    }

    #[test]
    fn test_git_failure_falls_back_to_none() {
        let dir = tempdir().unwrap();
        let paths = RepoPaths::new(dir.path());
        let src = ChangeSource::GitDiff {
            base: "origin/definitely-not-a-branch".into(),
        };
        assert_eq!(
            changed_files(&paths, &ScopeFilter::Unconditional, &src).unwrap(),
            None
        );
        assert_eq!(
            changed_files(&paths, &ScopeFilter::Unconditional, &ChangeSource::Unavailable).unwrap(),
            None
        );
    }
}
