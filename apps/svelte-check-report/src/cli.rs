//! CLI argument parsing via `clap`.
//!
//! Every `check` option can also come from the matching GitHub Action input
//! (`INPUT_*`) so the binary can run directly as an action step.

use crate::config::{parse_bool_input, Overrides};
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "svelte-check-report",
    version,
    about = "Report svelte-check diagnostics on pull requests",
    long_about = "svelte-check-report runs svelte-check across one or more project roots, narrows the results to the files changed by the pull request, writes a markdown summary and inline annotations, and fails the build on configured thresholds.\n\nConfiguration precedence: CLI/env > svelte-check-report.toml > defaults.",
    after_help = "Examples:\n  svelte-check-report check --paths apps/web --fail-on-error true\n  svelte-check-report check --filter-changes 'src/**' --changed-files changed.txt\n  svelte-check-report check --filter-changes false --output json",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,

    /// No logging except for errors
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Verbose logging (-v) or trace logging (-vv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current version.")]
    Version,
    /// Run svelte-check and report
    #[command(
        about = "Run svelte-check and report",
        long_about = "Run svelte-check in every configured root, filter the diagnostics, emit annotations and the markdown summary, and exit non-zero when a failure threshold is hit.",
        after_help = "Exit codes:\n  0  success\n  1  a failure threshold was hit\n  2  the check could not run"
    )]
    Check(CheckArgs),
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    #[arg(long, env = "GITHUB_WORKSPACE", help = "Repository root (default: current dir)")]
    pub repo_root: Option<String>,
    #[arg(long, env = "INPUT_PATHS", value_delimiter = '\n', help = "Project roots to check, relative to the repo root; globs allowed")]
    pub paths: Vec<String>,
    #[arg(long, env = "INPUT_FILTERCHANGES", help = "true|false, or newline-separated globs limiting change filtering")]
    pub filter_changes: Option<String>,
    #[arg(long, env = "INPUT_FAILFILTER", value_delimiter = '\n', help = "Globs selecting diagnostics that count toward failure (default: **)")]
    pub fail_filter: Vec<String>,
    #[arg(long, env = "INPUT_FAILONERROR", num_args = 0..=1, value_parser = bool_input, default_missing_value = "true", help = "Fail when a filtered error is found")]
    pub fail_on_error: Option<bool>,
    #[arg(long, env = "INPUT_FAILONWARNING", num_args = 0..=1, value_parser = bool_input, default_missing_value = "true", help = "Fail when a filtered warning is found")]
    pub fail_on_warning: Option<bool>,
    #[arg(long, help = "File listing changed files (repo-relative, one per line)")]
    pub changed_files: Option<String>,
    #[arg(long, help = "Git ref to diff against for changed files (e.g. origin/main)")]
    pub base_ref: Option<String>,
    #[arg(long, env = "GITHUB_BASE_REF", hide = true)]
    pub github_base_ref: Option<String>,
    #[arg(long, help = "Diagnostic command, run with sh -c in each root")]
    pub command: Option<String>,
    #[arg(long, help = "Output mode: human|json|markdown (default: human)")]
    pub output: Option<String>,
    #[arg(long, env = "GITHUB_STEP_SUMMARY", help = "Write the markdown summary to this file")]
    pub summary_file: Option<String>,
    #[arg(long, env = "INPUT_ANNOTATIONS", num_args = 0..=1, value_parser = bool_input, default_missing_value = "true", help = "Emit workflow annotations (default: on in GitHub Actions)")]
    pub annotations: Option<bool>,
    #[arg(long, env = "GITHUB_ACTIONS", hide = true)]
    pub github_actions: Option<String>,
    #[arg(long, env = "GITHUB_SERVER_URL", hide = true)]
    pub server_url: Option<String>,
    #[arg(long, env = "GITHUB_REPOSITORY", hide = true)]
    pub repository: Option<String>,
    #[arg(long, env = "GITHUB_SHA", hide = true)]
    pub sha: Option<String>,
}

fn bool_input(value: &str) -> Result<bool, String> {
    parse_bool_input(value).ok_or_else(|| format!("expected true|True|TRUE|false|False|FALSE, got '{value}'"))
}

impl CheckArgs {
    pub fn into_overrides(self) -> Overrides {
        Overrides {
            repo_root: self.repo_root,
            paths: self.paths,
            filter_changes: self.filter_changes,
            fail_filter: self.fail_filter,
            fail_on_error: self.fail_on_error,
            fail_on_warning: self.fail_on_warning,
            changed_files: self.changed_files,
            base_ref: self.base_ref,
            github_base_ref: self.github_base_ref,
            command: self.command,
            output: self.output,
            summary_file: self.summary_file,
            annotations: self.annotations,
            github_actions: self.github_actions.as_deref() == Some("true"),
            server_url: self.server_url,
            repository: self.repository,
            sha: self.sha,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_flags_map_to_overrides() {
        let cli = Cli::try_parse_from([
            "svelte-check-report",
            "-v",
            "check",
            "--repo-root",
            "/repo",
            "--paths",
            "apps/web",
            "--paths",
            "apps/docs",
            "--filter-changes",
            "false",
            "--fail-on-error",
            "--fail-on-warning",
            "false",
            "--output",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);
        let Commands::Check(args) = cli.cmd else {
            panic!("expected check");
        };
        let ov = args.into_overrides();
        assert_eq!(ov.repo_root.as_deref(), Some("/repo"));
        assert_eq!(ov.paths, vec!["apps/web", "apps/docs"]);
        assert_eq!(ov.filter_changes.as_deref(), Some("false"));
        assert_eq!(ov.fail_on_error, Some(true));
        assert_eq!(ov.fail_on_warning, Some(false));
        assert_eq!(ov.output.as_deref(), Some("json"));
    }

    #[test]
    fn test_capitalized_action_boolean_inputs_are_accepted() {
        std::env::set_var("INPUT_FAILONERROR", "True");
        let parsed = Cli::try_parse_from(["svelte-check-report", "check", "--annotations", "FALSE"]);
        std::env::remove_var("INPUT_FAILONERROR");
        let Commands::Check(args) = parsed.unwrap().cmd else {
            panic!("expected check");
        };
        assert_eq!(args.fail_on_error, Some(true));
        assert_eq!(args.annotations, Some(false));
        assert!(Cli::try_parse_from(["svelte-check-report", "check", "--fail-on-warning", "yes"]).is_err());
    }
}
