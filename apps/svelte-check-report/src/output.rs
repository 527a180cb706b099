//! Output rendering for the check command.
//!
//! Supports `human` (default), `json`, and `markdown` outputs. The JSON form
//! includes per-diagnostic fields, the summary counts, the verdict, and the
//! inputs that shaped them (checked roots, changed files, fail filter).

use crate::models::Severity;
use crate::run::Report;
use crate::store::DiagnosticStore;
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;

fn use_colors(output: &str) -> bool {
    output == "human" && std::env::var_os("NO_COLOR").is_none()
}

fn stderr_colors() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

pub fn error_prefix() -> String {
    if stderr_colors() {
        "error:".red().bold().to_string()
    } else {
        "error:".to_string()
    }
}

pub fn note_prefix() -> String {
    if stderr_colors() {
        "note:".cyan().bold().to_string()
    } else {
        "note:".to_string()
    }
}

pub fn info_prefix() -> String {
    if stderr_colors() {
        "info:".blue().bold().to_string()
    } else {
        "info:".to_string()
    }
}

/// Print the report in the requested format. `markdown` is the already
/// rendered summary document.
pub fn print_report(report: &Report, output: &str, markdown: &str) {
    match output {
        "json" => match serde_json::to_string_pretty(&compose_report_json(report)) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("{} {}", error_prefix(), e),
        },
        "markdown" => println!("{}", markdown),
        _ => print_human(&report.store, use_colors(output)),
    }
}

fn print_human(store: &DiagnosticStore, color: bool) {
    for (path, diags) in store.entries() {
        let file = store.paths().display(path);
        for d in diags {
            let (icon, sev) = match d.severity {
                Severity::Error => ("✖", "⟦error⟧"),
                Severity::Warning => ("▲", "⟦warn⟧"),
            };
            let location = format!("{}:{}:{}", file, d.start.line, d.start.character);
            let origin = match (&d.source, &d.code) {
                (Some(s), Some(c)) => format!(" ❲{} {}❳", s, c),
                (Some(s), None) => format!(" ❲{}❳", s),
                (None, Some(c)) => format!(" ❲{}❳", c),
                (None, None) => String::new(),
            };
            if color {
                let (icon, sev) = match d.severity {
                    Severity::Error => (icon.red().to_string(), sev.red().bold().to_string()),
                    Severity::Warning => {
                        (icon.yellow().to_string(), sev.yellow().bold().to_string())
                    }
                };
                println!("{} {} {}{} — {}", icon, sev, location.bold(), origin, d.message);
            } else {
                println!("{} {} {}{} — {}", icon, sev, location, origin, d.message);
            }
        }
    }
    let s = store.summary();
    let summary = format!(
        "— Summary — errors={} warnings={} filtered_errors={} filtered_warnings={} files={}",
        s.errors, s.warnings, s.filtered_errors, s.filtered_warnings, s.files
    );
    if color {
        println!("{}", summary.bold());
    } else {
        println!("{}", summary);
    }
}

/// Compose the report JSON object (pure) for testing/snapshot purposes.
pub fn compose_report_json(report: &Report) -> JsonVal {
    let store = &report.store;
    let diagnostics: Vec<JsonVal> = store
        .list()
        .map(|d| {
            json!({
                "severity": d.severity,
                "file": store.paths().display(&d.path),
                "path": d.path,
                "start": d.start,
                "end": d.end,
                "message": d.message,
                "code": d.code,
                "source": d.source,
            })
        })
        .collect();
    let paths = store.paths();
    let checked: Vec<String> = report.checked.iter().map(|r| paths.display(r)).collect();
    let changed_files: Option<Vec<String>> = store
        .changed_files()
        .map(|set| set.iter().map(|p| paths.display(p)).collect());
    json!({
        "checked": checked,
        "changed_files": changed_files,
        "fail_filter": store.policy().fail_filter.patterns(),
        "diagnostics": diagnostics,
        "summary": store.summary(),
        "failed": report.verdict.failed,
        "message": report.verdict.message,
    })
}
