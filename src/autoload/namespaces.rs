//! Namespace mapping artifact (psr-4).

use crate::utils::paths::{make_absolute, make_relative};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A mapping from namespace prefix to an ordered, duplicate-free list of
/// base directories, normalized to absolute form against a root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceMap {
    root: PathBuf,
    filename: PathBuf,
    namespaces: BTreeMap<String, Vec<PathBuf>>,
}

impl NamespaceMap {
    /// Create a namespace map from prefix/directory-list pairs.
    ///
    /// Directories are normalized against `root`; duplicate directories for
    /// one prefix collapse to their first occurrence.
    pub fn new<P: AsRef<Path>>(
        namespaces: impl IntoIterator<Item = (String, Vec<P>)>,
        filename: &Path,
        root: &Path,
    ) -> Self {
        let namespaces = namespaces
            .into_iter()
            .map(|(prefix, dirs)| {
                let mut seen = Vec::new();
                for dir in dirs {
                    let absolute = make_absolute(dir.as_ref(), root);
                    if !seen.contains(&absolute) {
                        seen.push(absolute);
                    }
                }
                (prefix, seen)
            })
            .collect();

        Self {
            root: root.to_path_buf(),
            filename: make_absolute(filename, root),
            namespaces,
        }
    }

    /// Union with `other`.
    ///
    /// Keys only in `other` are added; for keys present in both, directories
    /// from `other` not already present are appended, preserving order.
    #[must_use]
    pub fn merge(&self, other: &Self, filename: Option<&Path>) -> Self {
        let mut namespaces = self.namespaces.clone();

        for (prefix, dirs) in &other.namespaces {
            let entry = namespaces.entry(prefix.clone()).or_default();
            for dir in dirs {
                if !entry.contains(dir) {
                    entry.push(dir.clone());
                }
            }
        }

        Self {
            root: self.root.clone(),
            filename: filename.map_or_else(|| self.filename.clone(), |f| {
                make_absolute(f, &self.root)
            }),
            namespaces,
        }
    }

    /// Mapping in absolute or root-relative form.
    #[must_use]
    pub fn to_map(&self, relative: bool) -> BTreeMap<String, Vec<PathBuf>> {
        if !relative {
            return self.namespaces.clone();
        }

        self.namespaces
            .iter()
            .map(|(prefix, dirs)| {
                (
                    prefix.clone(),
                    dirs.iter().map(|d| make_relative(d, &self.root)).collect(),
                )
            })
            .collect()
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

    /// Whether the mapping holds no prefixes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }
}
