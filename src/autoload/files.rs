//! Unconditionally-loaded file list artifact.

use crate::utils::paths::{make_absolute, make_relative};
use std::path::{Path, PathBuf};

/// A deduplicated, ordered list of unconditionally loaded files, normalized
/// to absolute form against a root directory.
///
/// Unlike [`super::ClassMap`], duplicates are folded away both at
/// construction and on `merge`, preserving first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileList {
    root: PathBuf,
    filename: PathBuf,
    files: Vec<PathBuf>,
}

impl FileList {
    /// Create a file list from entries relative to (or absolute within)
    /// `root`.
    pub fn new<P: AsRef<Path>>(
        files: impl IntoIterator<Item = P>,
        filename: &Path,
        root: &Path,
    ) -> Self {
        let mut deduped = Vec::new();
        for file in files {
            let absolute = make_absolute(file.as_ref(), root);
            if !deduped.contains(&absolute) {
                deduped.push(absolute);
            }
        }

        Self {
            root: root.to_path_buf(),
            filename: make_absolute(filename, root),
            files: deduped,
        }
    }

    /// Whether `path` (relative or absolute) is present.
    #[must_use]
    pub fn has(&self, path: &Path) -> bool {
        let full = make_absolute(path, &self.root);
        self.files.contains(&full)
    }

    /// Return a file list without `path`; removing a non-member yields an
    /// equal value.
    #[must_use]
    pub fn remove(&self, path: &Path) -> Self {
        let full = make_absolute(path, &self.root);
        Self {
            root: self.root.clone(),
            filename: self.filename.clone(),
            files: self.files.iter().filter(|f| **f != full).cloned().collect(),
        }
    }

    /// Union with `other`, deduplicating while preserving first-seen order.
    #[must_use]
    pub fn merge(&self, other: &Self, filename: Option<&Path>) -> Self {
        let mut files = self.files.clone();
        for file in &other.files {
            if !files.contains(file) {
                files.push(file.clone());
            }
        }

        Self {
            root: self.root.clone(),
            filename: filename.map_or_else(|| self.filename.clone(), |f| {
                make_absolute(f, &self.root)
            }),
            files,
        }
    }

    /// Entries in absolute or root-relative form.
    #[must_use]
    pub fn to_vec(&self, relative: bool) -> Vec<PathBuf> {
        if relative {
            self.files
                .iter()
                .map(|f| make_relative(f, &self.root))
                .collect()
        } else {
            self.files.clone()
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

    /// Whether the list holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
