//! svelte-check runner and `--output=machine-verbose` parser.
//!
//! Each output line is `<timestamp> <payload>`. Payloads are either the
//! `START`/`COMPLETED` markers or one JSON diagnostic. Lines that fail to
//! parse are logged and discarded; they never reach the store.

use crate::error::{Error, Result};
use crate::models::{Code, Diagnostic, Position, Severity};
use crate::paths::normalize;
use log::{info, warn};
use serde::Deserialize;
use serde_json::Value as Json;
use std::fs;
use std::path::Path;
use std::process::Command;

pub const DEFAULT_COMMAND: &str = "npx -y svelte-check@4 --output=machine-verbose";
const KIT_SYNC_COMMAND: &str = "npx -y svelte-kit sync";

#[derive(Deserialize)]
struct RawPosition {
    line: u32,
    character: u32,
}

#[derive(Deserialize)]
struct RawDiagnostic {
    #[serde(rename = "type")]
    kind: String,
    filename: String,
    start: RawPosition,
    end: RawPosition,
    message: String,
    #[serde(default)]
    code: Option<Code>,
    #[serde(default)]
    source: Option<String>,
}

/// Run svelte-check in `root` and return every diagnostic it reports.
pub fn get_diagnostics(root: &Path, command: &str) -> Result<Vec<Diagnostic>> {
    if uses_svelte_kit(root) {
        info!("running svelte-kit sync at \"{}\"", root.display());
        match run_shell(root, KIT_SYNC_COMMAND) {
            Ok(o) if o.status.success() => {}
            Ok(o) => warn!(
                "svelte-kit sync failed at \"{}\": {}",
                root.display(),
                String::from_utf8_lossy(&o.stderr).trim()
            ),
            Err(e) => warn!("svelte-kit sync failed: {}", e),
        }
    }

    let out = run_shell(root, command)?;
    // 1 means diagnostics were found. A tool killed by a signal has no code;
    // its output is incomplete, so it fails as -1 instead of passing silently.
    let code = out.status.code().unwrap_or(-1);
    if !(0..=1).contains(&code) {
        return Err(Error::ToolFailed {
            root: root.to_path_buf(),
            code,
            stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
        });
    }
    Ok(parse_output(root, &String::from_utf8_lossy(&out.stdout)))
}

fn run_shell(cwd: &Path, command: &str) -> Result<std::process::Output> {
    Command::new("sh")
        .arg("-c")
        .arg(command)
        .current_dir(cwd)
        .output()
        .map_err(|e| Error::io(cwd, e))
}

/// Whether `root/package.json` depends on `@sveltejs/kit`.
pub fn uses_svelte_kit(root: &Path) -> bool {
    let Ok(s) = fs::read_to_string(root.join("package.json")) else {
        return false;
    };
    let Ok(pkg) = serde_json::from_str::<Json>(&s) else {
        return false;
    };
    ["dependencies", "devDependencies"]
        .iter()
        .any(|k| pkg.get(k).and_then(|d| d.get("@sveltejs/kit")).is_some())
}

/// Parse machine-verbose output produced in `root`.
pub fn parse_output(root: &Path, stdout: &str) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    for line in stdout.lines() {
        match parse_line(root, line) {
            Ok(Some(d)) => out.push(d),
            Ok(None) => {}
            Err(e) => warn!(
                "failed to parse a diagnostic (cwd: \"{}\", line: \"{}\"): {}",
                root.display(),
                line,
                e
            ),
        }
    }
    out
}

/// `Ok(None)` for blank lines and the start/completed markers.
pub fn parse_line(root: &Path, line: &str) -> std::result::Result<Option<Diagnostic>, String> {
    let trimmed = line.trim();
    let tail = match trimmed.find(' ') {
        Some(i) => &trimmed[i + 1..],
        None => trimmed,
    };
    if tail.is_empty() || tail.starts_with("START") || tail.starts_with("COMPLETED") {
        return Ok(None);
    }

    let raw: RawDiagnostic = serde_json::from_str(tail).map_err(|e| e.to_string())?;
    let severity = match raw.kind.to_ascii_lowercase().as_str() {
        "error" => Severity::Error,
        "warning" => Severity::Warning,
        other => return Err(format!("unknown diagnostic type '{}'", other)),
    };
    Ok(Some(Diagnostic {
        severity,
        path: normalize(&root.join(&raw.filename)),
        start: Position {
            line: raw.start.line + 1,
            character: raw.start.character,
        },
        end: Position {
            line: raw.end.line + 1,
            character: raw.end.character,
        },
        message: raw.message,
        code: raw.code,
        source: raw.source,
    }))
}
