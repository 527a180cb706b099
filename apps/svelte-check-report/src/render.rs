//! Markdown summary for the pull-request comment / job summary.
//!
//! The first line doubles as the marker used to find a previous comment, so
//! it must stay stable.

use crate::models::policy::ScopeFilter;
use crate::models::Diagnostic;
use crate::store::DiagnosticStore;
use crate::verdict::plural;
use chrono::{DateTime, Datelike, Utc};
use std::fs;
use std::process::Command;

pub const TITLE: &str = "# Svelte Check Results";

#[derive(Debug, Clone)]
/// Inputs to rendering that come from the environment rather than the store.
pub struct RenderContext {
    /// `<server>/<owner>/<repo>/blob/<sha>/`, when known.
    pub blob_base: Option<String>,
    pub now: DateTime<Utc>,
    pub commit: String,
}

impl RenderContext {
    pub fn new(blob_base: Option<String>) -> Self {
        RenderContext {
            blob_base,
            now: Utc::now(),
            commit: latest_commit(),
        }
    }
}

/// Build the blob link prefix from the GitHub server URL, repository slug and sha.
pub fn blob_base(
    server: Option<&str>,
    repository: Option<&str>,
    sha: Option<&str>,
) -> Option<String> {
    let server = server.filter(|s| !s.is_empty())?;
    let repo = repository.filter(|s| !s.is_empty())?;
    let sha = sha.filter(|s| !s.is_empty())?;
    Some(format!(
        "{}/{}/blob/{}/",
        server.trim_end_matches('/'),
        repo,
        sha
    ))
}

fn latest_commit() -> String {
    Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

/// `**n** word(s)`
fn bold_count(n: usize, word: &str) -> String {
    format!("**{}** {}", n, plural(n, word))
}

/// Render the store as a markdown document.
pub fn render(store: &DiagnosticStore, ctx: &RenderContext) -> String {
    let mut output: Vec<String> = vec![format!("{}\n", TITLE)];

    if store.count() == 0 {
        output.push("No issues found! 🎉".to_string());
    } else {
        let scope_note = match store.policy().scope {
            ScopeFilter::Unconditional => " with the files in this PR",
            _ => "",
        };
        output.push(format!(
            "Found {} and {} ({} total){}.\n",
            bold_count(store.error_count(), "error"),
            bold_count(store.warning_count(), "warning"),
            store.count(),
            scope_note
        ));

        for (path, diagnostics) in store.entries() {
            let readable = store.paths().display(path);
            let lines: Option<Vec<String>> = fs::read_to_string(path)
                .ok()
                .map(|c| c.lines().map(str::to_string).collect());
            let rendered: Vec<String> = diagnostics
                .iter()
                .map(|d| render_diagnostic(d, &readable, lines.as_deref(), ctx))
                .collect();
            output.push(format!(
                "\n\n<details>\n<summary>{}</summary>\n\n{}\n</details>",
                readable,
                rendered.join("\n")
            ));
        }
    }

    output.push("\n---\n".to_string());
    output.push(format!(
        "Last Updated: <span title=\"{}\">{}</span> ({})",
        ctx.now.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        human_date(&ctx.now),
        ctx.commit
    ));
    output.join("\n")
}

fn render_diagnostic(
    d: &Diagnostic,
    readable: &str,
    lines: Option<&[String]>,
    ctx: &RenderContext,
) -> String {
    let location = format!("{}:{}:{}", readable, d.start.line, d.start.character);
    let heading = match &ctx.blob_base {
        Some(base) => {
            let range = if d.start.line != d.end.line {
                format!("#L{}-L{}", d.start.line, d.end.line)
            } else {
                format!("#L{}", d.start.line)
            };
            format!("#### [{}]({}{}{})", location, base, readable, range)
        }
        None => format!("#### {}", location),
    };
    let snippet = lines
        .map(|lines| {
            let from = (d.start.line as usize).saturating_sub(1).min(lines.len());
            let to = (d.end.line as usize).clamp(from, lines.len());
            lines[from..to].join("\n").trim().to_string()
        })
        .unwrap_or_default();
    format!(
        "{}\n\n```ts\n{}: {}\n\n{}\n```\n",
        heading,
        d.severity.label(),
        d.message,
        snippet
    )
}

/// `19th October at 14:05`
fn human_date(now: &DateTime<Utc>) -> String {
    let day = now.day();
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!(
        "{}{} {} at {}",
        day,
        suffix,
        now.format("%B"),
        now.format("%H:%M")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::policy::FilterPolicy;
    use crate::models::{Position, Severity};
    use crate::paths::RepoPaths;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn ctx(blob_base: Option<&str>) -> RenderContext {
        RenderContext {
            blob_base: blob_base.map(str::to_string),
            now: Utc.with_ymd_and_hms(2024, 10, 2, 9, 5, 0).unwrap(),
            commit: "abc1234".into(),
        }
    }

    #[test]
    fn test_render_empty_store() {
        let store = DiagnosticStore::new(FilterPolicy::default(), None, RepoPaths::new("/repo"));
        let md = render(&store, &ctx(None));
        assert!(md.starts_with("# Svelte Check Results\n"));
        assert!(md.contains("No issues found! 🎉"));
        assert!(md.ends_with(
            "Last Updated: <span title=\"2024-10-02T09:05:00.000Z\">2nd October at 09:05</span> (abc1234)"
        ));
    }

    #[test]
    fn test_render_groups_with_links_and_snippets() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("src")).unwrap();
        std::fs::write(
            root.join("src/a.svelte"),
            "<script>\n  let x: number = 'a';\n  let y = 1;\n</script>\n",
        )
        .unwrap();
        let paths = RepoPaths::new(root);
        let mut store = DiagnosticStore::new(FilterPolicy::default(), None, paths.clone());
        store.add(Diagnostic {
            severity: Severity::Error,
            path: paths.absolute("src/a.svelte"),
            start: Position { line: 2, character: 6 },
            end: Position { line: 3, character: 2 },
            message: "Type 'string' is not assignable to type 'number'.".into(),
            code: None,
            source: None,
        });
        store.add(Diagnostic {
            severity: Severity::Warning,
            path: paths.absolute("src/missing.svelte"),
            start: Position { line: 1, character: 0 },
            end: Position { line: 1, character: 4 },
            message: "unused".into(),
            code: None,
            source: None,
        });

        let md = render(&store, &ctx(Some("https://github.com/o/r/blob/sha/")));
        assert!(md.contains("Found **1** error and **1** warning (2 total).\n"));
        assert!(md.contains("<summary>src/a.svelte</summary>"));
        assert!(md.contains(
            "#### [src/a.svelte:2:6](https://github.com/o/r/blob/sha/src/a.svelte#L2-L3)"
        ));
        assert!(md.contains("Error: Type 'string' is not assignable to type 'number'.\n\nlet x: number = 'a';\n  let y = 1;\n```"));
        assert!(md.contains("#### [src/missing.svelte:1:0](https://github.com/o/r/blob/sha/src/missing.svelte#L1)"));
        assert!(md.contains("Warn: unused\n\n\n```"));
    }

    #[test]
    fn test_render_without_blob_base_and_scope_note() {
        let paths = RepoPaths::new("/repo");
        let policy = FilterPolicy {
            scope: ScopeFilter::Unconditional,
            ..FilterPolicy::default()
        };
        let mut store = DiagnosticStore::new(policy, None, paths.clone());
        store.add(Diagnostic {
            severity: Severity::Warning,
            path: paths.absolute("lib/x.svelte"),
            start: Position { line: 4, character: 1 },
            end: Position { line: 4, character: 2 },
            message: "w".into(),
            code: None,
            source: None,
        });
        let md = render(&store, &ctx(None));
        assert!(md.contains("**0** errors and **1** warning (1 total) with the files in this PR."));
        assert!(md.contains("#### lib/x.svelte:4:1\n"));
    }

    #[test]
    fn test_blob_base_and_ordinals() {
        assert_eq!(
            blob_base(Some("https://github.com/"), Some("o/r"), Some("s")),
            Some("https://github.com/o/r/blob/s/".to_string())
        );
        assert_eq!(blob_base(Some("https://github.com"), None, Some("s")), None);
        let at = |d| Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap();
        assert_eq!(human_date(&at(1)), "1st January at 00:00");
        assert_eq!(human_date(&at(11)), "11th January at 00:00");
        assert_eq!(human_date(&at(22)), "22nd January at 00:00");
        assert_eq!(human_date(&at(23)), "23rd January at 00:00");
    }
}
