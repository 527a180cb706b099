//! Configuration discovery and effective settings resolution.
//!
//! Reads `svelte-check-report.toml|yaml|yml` from the repository root (or the
//! closest ancestor) and merges it with CLI flags and GitHub Action inputs to
//! produce an `Effective` config.
//! Defaults:
//! - `paths`: the repository root
//! - `filter_changes`: true
//! - `fail_filter`: `["**"]`
//! - `fail_on_error|fail_on_warning`: false
//! - `command`: `npx -y svelte-check@4 --output=machine-verbose`
//! - `output`: `human`
//! - `annotations`: on when running inside GitHub Actions
//!
//! Overrides precedence: CLI/env > config file > defaults.

use crate::changes::ChangeSource;
use crate::error::{Error, Result};
use crate::ingest::DEFAULT_COMMAND;
use crate::matcher::PathMatcher;
use crate::models::policy::{FilterPolicy, ScopeFilter};
use crate::paths::{normalize, RepoPaths};
use crate::render;
use indexmap::IndexSet;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILES: [&str; 3] = [
    "svelte-check-report.toml",
    "svelte-check-report.yaml",
    "svelte-check-report.yml",
];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
/// `filterChanges`: a boolean, or globs limiting where change filtering applies.
pub enum FilterChanges {
    Flag(bool),
    Globs(Vec<String>),
}

impl Default for FilterChanges {
    fn default() -> Self {
        FilterChanges::Flag(true)
    }
}

/// YAML 1.2 core schema booleans, the forms action inputs accept.
pub fn parse_bool_input(input: &str) -> Option<bool> {
    match input.trim() {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

impl FilterChanges {
    /// Parse an action input: a YAML 1.2 core boolean, or newline-separated globs.
    pub fn from_input(input: &str) -> Self {
        match parse_bool_input(input) {
            Some(flag) => FilterChanges::Flag(flag),
            None => FilterChanges::Globs(
                input
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
        }
    }

    /// An empty glob list disables filtering.
    pub fn to_scope(&self) -> Result<ScopeFilter> {
        Ok(match self {
            FilterChanges::Flag(false) => ScopeFilter::Disabled,
            FilterChanges::Flag(true) => ScopeFilter::Unconditional,
            FilterChanges::Globs(globs) => {
                let matcher = PathMatcher::new(globs)?;
                if matcher.is_empty() {
                    ScopeFilter::Disabled
                } else {
                    ScopeFilter::Glob(matcher)
                }
            }
        })
    }
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `svelte-check-report.toml|yaml`.
pub struct ReportConfig {
    pub paths: Option<Vec<String>>,
    #[serde(alias = "filterChanges")]
    pub filter_changes: Option<FilterChanges>,
    #[serde(alias = "failFilter")]
    pub fail_filter: Option<Vec<String>>,
    #[serde(alias = "failOnError")]
    pub fail_on_error: Option<bool>,
    #[serde(alias = "failOnWarning")]
    pub fail_on_warning: Option<bool>,
    /// Repo-relative file listing the changed files, one per line
    #[serde(alias = "changedFiles")]
    pub changed_files: Option<String>,
    #[serde(alias = "baseRef")]
    pub base_ref: Option<String>,
    pub command: Option<String>,
    pub output: Option<String>,
    pub annotations: Option<bool>,
}

#[derive(Debug, Default, Clone)]
/// Values coming from CLI flags and the CI environment.
pub struct Overrides {
    pub repo_root: Option<String>,
    pub paths: Vec<String>,
    pub filter_changes: Option<String>,
    pub fail_filter: Vec<String>,
    pub fail_on_error: Option<bool>,
    pub fail_on_warning: Option<bool>,
    pub changed_files: Option<String>,
    pub base_ref: Option<String>,
    /// `GITHUB_BASE_REF`, the pull request's target branch name
    pub github_base_ref: Option<String>,
    pub command: Option<String>,
    pub output: Option<String>,
    pub summary_file: Option<String>,
    pub annotations: Option<bool>,
    pub github_actions: bool,
    pub server_url: Option<String>,
    pub repository: Option<String>,
    pub sha: Option<String>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by the check command.
pub struct Effective {
    pub repo_root: PathBuf,
    pub roots: Vec<PathBuf>,
    pub filter_changes: FilterChanges,
    pub fail_filter: Vec<String>,
    pub fail_on_error: bool,
    pub fail_on_warning: bool,
    pub change_source: ChangeSource,
    pub command: String,
    pub output: String,
    pub summary_file: Option<PathBuf>,
    pub annotations: bool,
    pub blob_base: Option<String>,
}

impl Effective {
    /// Compile the filter policy. Fails only on invalid globs.
    pub fn policy(&self) -> Result<FilterPolicy> {
        Ok(FilterPolicy {
            scope: self.filter_changes.to_scope()?,
            fail_filter: PathMatcher::new(&self.fail_filter)?,
        })
    }
}

/// Walk upward from `start` to detect the repository root.
///
/// Stops when a config file or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if CONFIG_FILES.iter().any(|f| cur.join(f).exists()) || cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `ReportConfig` from the first config file present in `root`.
pub fn load_config(root: &Path) -> Result<Option<ReportConfig>> {
    for name in CONFIG_FILES {
        let path = root.join(name);
        if !path.exists() {
            continue;
        }
        let s = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        let parsed = if name.ends_with(".toml") {
            toml::from_str::<ReportConfig>(&s).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str::<ReportConfig>(&s).map_err(|e| e.to_string())
        };
        return parsed
            .map(Some)
            .map_err(|message| Error::ConfigParse { path, message });
    }
    Ok(None)
}

/// Expand configured roots. Entries may be globs (`packages/*`), which
/// expand to matching directories. No entries means the repository root.
pub fn expand_roots(repo_root: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let paths = RepoPaths::new(repo_root);
    let mut roots: IndexSet<PathBuf> = IndexSet::new();
    for pat in patterns.iter().map(|p| p.trim()).filter(|p| !p.is_empty()) {
        if pat.contains(|c: char| matches!(c, '*' | '?' | '[')) {
            let abs = paths.absolute(pat).to_string_lossy().to_string();
            let entries = glob::glob(&abs).map_err(|source| Error::InvalidRootGlob {
                pattern: pat.to_string(),
                source,
            })?;
            roots.extend(entries.flatten().filter(|p| p.is_dir()).map(|p| normalize(&p)));
        } else {
            roots.insert(paths.absolute(pat));
        }
    }
    if roots.is_empty() {
        roots.insert(paths.root().to_path_buf());
    }
    Ok(roots.into_iter().collect())
}

fn non_empty(values: &[String]) -> Option<Vec<String>> {
    let kept: Vec<String> = values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();
    if kept.is_empty() {
        None
    } else {
        Some(kept)
    }
}

/// Resolve `Effective` by merging overrides, the discovered config, and defaults.
pub fn resolve_effective(ov: &Overrides) -> Result<Effective> {
    let cwd = std::env::current_dir().map_err(|e| Error::io(".", e))?;
    let start = normalize(&cwd.join(ov.repo_root.as_deref().unwrap_or(".")));
    let repo_root = detect_repo_root(&start);
    let cfg = load_config(&repo_root)?.unwrap_or_default();

    let paths = non_empty(&ov.paths)
        .or(cfg.paths)
        .unwrap_or_default();
    let roots = expand_roots(&repo_root, &paths)?;

    let filter_changes = ov
        .filter_changes
        .as_deref()
        .map(FilterChanges::from_input)
        .or(cfg.filter_changes)
        .unwrap_or_default();

    let fail_filter = non_empty(&ov.fail_filter)
        .or_else(|| cfg.fail_filter.as_deref().and_then(non_empty))
        .unwrap_or_else(|| vec!["**".to_string()]);

    let fail_on_error = ov.fail_on_error.or(cfg.fail_on_error).unwrap_or(false);
    let fail_on_warning = ov.fail_on_warning.or(cfg.fail_on_warning).unwrap_or(false);

    let change_source = if let Some(list) = ov.changed_files.clone().or(cfg.changed_files) {
        ChangeSource::List(PathBuf::from(list))
    } else if let Some(base) = ov
        .base_ref
        .clone()
        .or(cfg.base_ref)
        .or_else(|| {
            ov.github_base_ref
                .as_deref()
                .filter(|b| !b.is_empty())
                .map(|b| format!("origin/{}", b))
        })
    {
        ChangeSource::GitDiff { base }
    } else {
        ChangeSource::Unavailable
    };

    let command = ov
        .command
        .clone()
        .or(cfg.command)
        .unwrap_or_else(|| DEFAULT_COMMAND.to_string());
    let output = ov
        .output
        .clone()
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());
    let summary_file = ov
        .summary_file
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(PathBuf::from);
    let annotations = ov
        .annotations
        .or(cfg.annotations)
        .unwrap_or(ov.github_actions);
    let blob_base = render::blob_base(
        ov.server_url.as_deref(),
        ov.repository.as_deref(),
        ov.sha.as_deref(),
    );

    Ok(Effective {
        repo_root,
        roots,
        filter_changes,
        fail_filter,
        fail_on_error,
        fail_on_warning,
        change_source,
        command,
        output,
        summary_file,
        annotations,
        blob_base,
    })
}
