//! Shared data models: diagnostic records, filter policy and printer summaries.

pub mod policy;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Diagnostic severity as reported by svelte-check.
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    /// Short label used in rendered code blocks.
    pub fn label(self) -> &'static str {
        match self {
            Severity::Error => "Error",
            Severity::Warning => "Warn",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
/// A document position. `line` is 1-based, `character` is 0-based.
///
/// Field order matters: the derived `Ord` is document order.
pub struct Position {
    pub line: u32,
    pub character: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
/// Diagnostic code, numeric for TypeScript errors and textual for Svelte ones.
pub enum Code {
    Number(i64),
    Text(String),
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Code::Number(n) => write!(f, "{}", n),
            Code::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// A single diagnostic, normalized to an absolute path and 1-based lines.
///
/// `path` is the grouping key in the store.
pub struct Diagnostic {
    pub severity: Severity,
    pub path: PathBuf,
    pub start: Position,
    pub end: Position,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<Code>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
/// Aggregated counts used by printers and the JSON output.
pub struct Summary {
    pub errors: usize,
    pub warnings: usize,
    pub total: usize,
    pub filtered_errors: usize,
    pub filtered_warnings: usize,
    pub filtered_total: usize,
    pub files: usize,
}
