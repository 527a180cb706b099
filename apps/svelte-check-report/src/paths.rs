//! Path helpers: lexical normalization and repo-relative display paths.
//!
//! Two representations are in play and must not be mixed up. Changed-file
//! membership uses absolute paths; glob matching and human output use the
//! `/`-separated path relative to the repository root.

use std::path::{Component, Path, PathBuf};

/// Remove `.` segments and fold `..` segments without touching the filesystem.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Whether `child` lies at or below `parent`.
pub fn is_subdir(parent: &Path, child: &Path) -> bool {
    normalize(child).starts_with(normalize(parent))
}

#[derive(Debug, Clone)]
/// Converts between absolute paths and repo-relative display paths.
pub struct RepoPaths {
    root: PathBuf,
}

impl RepoPaths {
    pub fn new(root: impl AsRef<Path>) -> Self {
        RepoPaths {
            root: normalize(root.as_ref()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute form of a repo-relative path. Absolute input is only normalized.
    pub fn absolute(&self, rel: impl AsRef<Path>) -> PathBuf {
        normalize(&self.root.join(rel))
    }

    /// Repo-relative, `/`-separated rendering of `path`.
    pub fn display(&self, path: &Path) -> String {
        let rel = pathdiff::diff_paths(path, &self.root).unwrap_or_else(|| path.to_path_buf());
        rel.components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}
