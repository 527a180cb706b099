//! svelte-check-report core library.
//!
//! Runs svelte-check across project roots, keeps the diagnostics relevant to
//! the current pull request, and reports them as a markdown summary, inline
//! annotations, and a pass/fail verdict.
//!
//! High-level modules:
//! - `store`: Diagnostic aggregation with change-scope and fail filtering.
//! - `matcher`: Glob pattern sets over repo-relative display paths.
//! - `paths`: Path normalization and display paths.
//! - `ingest`: svelte-check runner and machine-verbose parser.
//! - `changes`: Changed-file provider (list file or git diff).
//! - `run`: Orchestration across configured roots.
//! - `render`: Markdown summary document.
//! - `annotate`: GitHub Actions workflow annotations.
//! - `verdict`: Failure-threshold decision.
//! - `config`: Discovery and effective configuration resolution.
//! - `cli`: CLI argument parsing (binary uses this).
//! - `output`: Human/JSON/markdown printers.
//! - `models`: Diagnostic records and filter policy.
pub mod annotate;
pub mod changes;
pub mod cli;
pub mod config;
pub mod error;
pub mod ingest;
pub mod matcher;
pub mod models;
pub mod output;
pub mod paths;
pub mod render;
pub mod run;
pub mod store;
pub mod verdict;

pub use error::{Error, Result};
pub use store::DiagnosticStore;
