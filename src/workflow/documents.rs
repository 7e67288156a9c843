//! Snapshot of existing planning documents.
//!
//! The gate only ever sees a set of relative paths; this module builds that
//! set from caller input or from a walk of the project root.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use walkdir::{DirEntry, WalkDir};

use super::step::matches_template;

/// Directories never descended into when scanning.
const SKIP_DIRS: &[&str] = &["target", "node_modules"];

/// Set of document paths that exist, relative to the project root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSet {
    paths: BTreeSet<String>,
}

impl DocumentSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from paths, normalizing each one.
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for path in paths {
            set.insert(path.as_ref());
        }
        set
    }

    /// Walk `root` and collect every regular file beneath it.
    ///
    /// Hidden entries and build directories are skipped. A missing root
    /// yields an empty set.
    pub fn scan(root: &Path) -> Self {
        let mut set = Self::new();
        if !root.is_dir() {
            tracing::debug!(root = %root.display(), "Document root does not exist");
            return set;
        }

        let walker = WalkDir::new(root).follow_links(false).into_iter();
        for entry in walker.filter_entry(|e| e.depth() == 0 || !is_skipped(e)).flatten() {
            if !entry.file_type().is_file() {
                continue;
            }
            if let Ok(relative) = entry.path().strip_prefix(root) {
                set.insert(&relative.to_string_lossy());
            }
        }

        tracing::debug!(root = %root.display(), documents = set.len(), "Scanned documents");
        set
    }

    /// Add a path.
    pub fn insert(&mut self, path: &str) {
        let normalized = normalize(path);
        if !normalized.is_empty() {
            self.paths.insert(normalized);
        }
    }

    /// Check whether a path exists.
    ///
    /// A path ending in `/` names a directory, which exists when any
    /// document lies beneath it.
    pub fn contains(&self, path: &str) -> bool {
        let is_dir = path.ends_with('/') || path.ends_with('\\');
        let normalized = normalize(path);
        if normalized.is_empty() {
            return false;
        }
        if is_dir {
            let prefix = format!("{normalized}/");
            return self.paths.range(prefix.clone()..).next().is_some_and(|p| p.starts_with(&prefix));
        }
        self.paths.contains(&normalized)
    }

    /// Documents matching a `[placeholder]` template, in sorted order.
    pub fn matching<'a>(&'a self, template: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.paths.iter().map(String::as_str).filter(move |p| matches_template(template, p))
    }

    /// All paths in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Check if no documents exist.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for DocumentSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_paths(iter)
    }
}

/// Normalize a relative path: `/` separators, no leading `./`, no empty segments.
pub fn normalize(path: &str) -> String {
    let unified = path.trim().replace('\\', "/");
    unified
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

fn is_skipped(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || (entry.file_type().is_dir() && SKIP_DIRS.contains(&name.as_ref()))
}
