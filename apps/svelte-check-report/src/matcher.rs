//! Glob pattern sets for display paths.
//!
//! Patterns follow the conventions of the GitHub Action inputs they come
//! from: `*` stays within one path segment, `**` spans directories, `{a,b}`
//! alternates, and a leading `!` negates a pattern. The extglob form
//! `!(<glob>)/<rest>` matches paths where no leading run of segments matches
//! `<glob>` and the segments after some leading run match `<rest>`; a bare
//! `!(<glob>)` matches paths that `<glob>` does not. A set matches a path
//! when any of its patterns does.

use crate::error::{Error, Result};
use globset::{GlobBuilder, GlobMatcher};
use std::fmt;

#[derive(Clone)]
enum Rule {
    Everything,
    Glob { glob: GlobMatcher, negated: bool },
    NotGroup {
        inner: GlobMatcher,
        rest: Option<GlobMatcher>,
    },
}

impl Rule {
    fn is_match(&self, path: &str) -> bool {
        match self {
            Rule::Everything => true,
            Rule::Glob { glob, negated } => glob.is_match(path) != *negated,
            Rule::NotGroup { inner, rest: None } => !inner.is_match(path),
            Rule::NotGroup {
                inner,
                rest: Some(rest),
            } => {
                let segments: Vec<&str> = path.split('/').collect();
                let prefix = |n: usize| segments[..n].join("/");
                let suffix = |n: usize| segments[n..].join("/");
                let excluded = (1..=segments.len()).any(|n| inner.is_match(prefix(n)));
                !excluded && (1..segments.len()).any(|n| rest.is_match(suffix(n)))
            }
        }
    }
}

#[derive(Clone)]
/// A compiled set of glob patterns, matched against `/`-separated display paths.
pub struct PathMatcher {
    patterns: Vec<String>,
    rules: Vec<Rule>,
}

impl PathMatcher {
    /// Compile `patterns`. Blank entries are ignored.
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut kept = Vec::new();
        let mut rules = Vec::new();
        for raw in patterns {
            let pattern = raw.as_ref().trim();
            if pattern.is_empty() {
                continue;
            }
            rules.push(compile(pattern)?);
            kept.push(pattern.to_string());
        }
        Ok(PathMatcher {
            patterns: kept,
            rules,
        })
    }

    /// Matches every path (`**`).
    pub fn any() -> Self {
        PathMatcher {
            patterns: vec!["**".to_string()],
            rules: vec![Rule::Everything],
        }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn is_match(&self, path: &str) -> bool {
        let path = path.strip_prefix("./").unwrap_or(path);
        self.rules.iter().any(|rule| rule.is_match(path))
    }
}

fn compile(pattern: &str) -> Result<Rule> {
    // `!(...)` is an extglob group, not a negation
    if let Some(group) = pattern.strip_prefix("!(") {
        return compile_not_group(pattern, group);
    }
    let (negated, body) = match pattern.strip_prefix('!') {
        Some(rest) => (true, rest),
        None => (false, pattern),
    };
    let body = body.strip_prefix("./").unwrap_or(body);
    if body == "**" && !negated {
        return Ok(Rule::Everything);
    }
    Ok(Rule::Glob {
        glob: build(pattern, body)?,
        negated,
    })
}

/// `group` is the text after `!(`.
fn compile_not_group(pattern: &str, group: &str) -> Result<Rule> {
    let unsupported = || Error::UnsupportedGlob {
        pattern: pattern.to_string(),
    };
    let mut depth = 1usize;
    let close = group
        .char_indices()
        .find(|&(_, c)| {
            match c {
                '(' => depth += 1,
                ')' => depth -= 1,
                _ => {}
            }
            depth == 0
        })
        .map(|(i, _)| i)
        .ok_or_else(unsupported)?;
    let inner = &group[..close];
    let rest = match &group[close + 1..] {
        "" => None,
        tail => Some(tail.strip_prefix('/').ok_or_else(unsupported)?),
    };
    if inner.is_empty() || inner.contains(|c: char| matches!(c, '(' | ')')) || rest == Some("") {
        return Err(unsupported());
    }
    Ok(Rule::NotGroup {
        inner: build(pattern, inner)?,
        rest: rest.map(|r| build(pattern, r)).transpose()?,
    })
}

fn build(pattern: &str, body: &str) -> Result<GlobMatcher> {
    GlobBuilder::new(body)
        .literal_separator(true)
        .build()
        .map(|g| g.compile_matcher())
        .map_err(|source| Error::InvalidGlob {
            pattern: pattern.to_string(),
            source,
        })
}

impl fmt::Debug for PathMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PathMatcher").field(&self.patterns).finish()
    }
}
