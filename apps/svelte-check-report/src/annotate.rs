//! GitHub Actions workflow-command annotations for kept diagnostics.

use crate::models::Diagnostic;
use crate::paths::RepoPaths;
use crate::store::DiagnosticStore;
use std::io::{self, Write};

const TITLE: &str = "svelte-check";

/// Render one `::error ...::message` / `::warning ...::message` command.
pub fn annotation(paths: &RepoPaths, diagnostic: &Diagnostic) -> String {
    let props = [
        ("title", TITLE.to_string()),
        ("file", paths.display(&diagnostic.path)),
        ("line", diagnostic.start.line.to_string()),
        ("endLine", diagnostic.end.line.to_string()),
        ("col", diagnostic.start.character.to_string()),
        ("endColumn", diagnostic.end.character.to_string()),
    ];
    let props = props
        .iter()
        .map(|(k, v)| format!("{}={}", k, escape_property(v)))
        .collect::<Vec<_>>()
        .join(",");
    format!(
        "::{} {}::{}",
        diagnostic.severity,
        props,
        escape_data(&diagnostic.message)
    )
}

/// Write annotations for every kept diagnostic in `entries()` order.
pub fn emit(store: &DiagnosticStore, out: &mut impl Write) -> io::Result<()> {
    for (_, diags) in store.entries() {
        for d in diags {
            writeln!(out, "{}", annotation(store.paths(), d))?;
        }
    }
    Ok(())
}

fn escape_data(s: &str) -> String {
    s.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(s: &str) -> String {
    escape_data(s).replace(':', "%3A").replace(',', "%2C")
}
