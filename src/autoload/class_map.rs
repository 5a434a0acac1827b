//! Class map artifact.

use crate::utils::paths::{make_absolute, make_relative};
use std::path::{Path, PathBuf};

/// An ordered list of class-defining file paths, normalized to absolute form
/// against a root directory.
///
/// Duplicates are tolerated positionally: `merge` concatenates, and the
/// caller decides the deduplication policy. Membership tests and removal
/// compare by absolute form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMap {
    root: PathBuf,
    filename: PathBuf,
    map: Vec<PathBuf>,
}

impl ClassMap {
    /// Create a class map from entries relative to (or absolute within)
    /// `root`, recorded as originating from `filename`.
    pub fn new<P: AsRef<Path>>(
        map: impl IntoIterator<Item = P>,
        filename: &Path,
        root: &Path,
    ) -> Self {
        let map = map
            .into_iter()
            .map(|path| make_absolute(path.as_ref(), root))
            .collect();
        Self {
            root: root.to_path_buf(),
            filename: make_absolute(filename, root),
            map,
        }
    }

    /// Whether `path` (relative or absolute) is present.
    #[must_use]
    pub fn has(&self, path: &Path) -> bool {
        let full = make_absolute(path, &self.root);
        self.map.contains(&full)
    }

    /// Return a class map without `path`.
    ///
    /// Removing a non-member is a no-op yielding an equal value. All
    /// occurrences of the path are removed.
    #[must_use]
    pub fn remove(&self, path: &Path) -> Self {
        let full = make_absolute(path, &self.root);
        if !self.has(&full) {
            return self.clone();
        }

        Self {
            root: self.root.clone(),
            filename: self.filename.clone(),
            map: self.map.iter().filter(|p| **p != full).cloned().collect(),
        }
    }

    /// Concatenate with `other`, keeping this map's root.
    #[must_use]
    pub fn merge(&self, other: &Self, filename: Option<&Path>) -> Self {
        let mut map = self.map.clone();
        map.extend(other.map.iter().cloned());
        Self {
            root: self.root.clone(),
            filename: filename.map_or_else(|| self.filename.clone(), |f| {
                make_absolute(f, &self.root)
            }),
            map,
        }
    }

    /// Entries in absolute or root-relative form.
    #[must_use]
    pub fn to_vec(&self, relative: bool) -> Vec<PathBuf> {
        if relative {
            self.map
                .iter()
                .map(|p| make_relative(p, &self.root))
                .collect()
        } else {
            self.map.clone()
        }
    }

    /// Originating filename, absolute or root-relative.
    #[must_use]
    pub fn filename(&self, relative: bool) -> PathBuf {
        if relative {
            make_relative(&self.filename, &self.root)
        } else {
            self.filename.clone()
        }
    }

    /// Root directory entries were normalized against.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether the map holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Number of entries, duplicates included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }
}
