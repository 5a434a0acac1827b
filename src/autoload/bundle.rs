//! Autoload bundle assembly and target manifest dispatch.

use super::{AutoloadExport, ClassMap, FileList, NamespaceMap};
use crate::manifest::{ManifestEditor, extension};
use crate::utils::paths::{make_absolute, make_relative};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// One class map, one namespace mapping, and one file list aggregated under
/// a single target filename.
///
/// All three constituents share the bundle's root directory; merging two
/// bundles merges the constituents pairwise and adopts the caller-supplied
/// target filename (or keeps the receiver's).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoloadBundle {
    class_map: ClassMap,
    namespaces: NamespaceMap,
    files: FileList,
    filename: PathBuf,
    root: PathBuf,
}

impl AutoloadBundle {
    /// Assemble a bundle. Constituents are expected to be rooted at `root`.
    pub fn new(
        class_map: ClassMap,
        namespaces: NamespaceMap,
        files: FileList,
        filename: &Path,
        root: &Path,
    ) -> Self {
        debug_assert_eq!(class_map.root(), root);
        debug_assert_eq!(namespaces.root(), root);
        debug_assert_eq!(files.root(), root);

        Self {
            class_map,
            namespaces,
            files,
            filename: make_absolute(filename, root),
            root: root.to_path_buf(),
        }
    }

    /// Merge with `other`, combining all three constituents pairwise.
    #[must_use]
    pub fn merge(&self, other: &Self, filename: Option<&Path>) -> Self {
        let filename = filename
            .map_or_else(|| self.filename.clone(), |f| make_absolute(f, &self.root));

        Self {
            class_map: self.class_map.merge(&other.class_map, Some(&filename)),
            namespaces: self.namespaces.merge(&other.namespaces, Some(&filename)),
            files: self.files.merge(&other.files, Some(&filename)),
            filename,
            root: self.root.clone(),
        }
    }

    /// Replace the class map, keeping everything else. Used for post-merge
    /// exclusion of individual class-map paths.
    #[must_use]
    pub fn with_class_map(&self, class_map: ClassMap) -> Self {
        Self {
            class_map,
            ..self.clone()
        }
    }

    /// Serialize to the `{ classmap, psr-4, files }` shape, with absolute or
    /// root-relative paths. Empty constituents are omitted on the wire.
    #[must_use]
    pub fn export(&self, relative: bool) -> AutoloadExport {
        let path_string = |p: PathBuf| p.to_string_lossy().into_owned();

        AutoloadExport {
            classmap: self
                .class_map
                .to_vec(relative)
                .into_iter()
                .map(path_string)
                .collect(),
            psr4: self
                .namespaces
                .to_map(relative)
                .into_iter()
                .map(|(prefix, dirs)| {
                    (prefix, dirs.into_iter().map(path_string).collect())
                })
                .collect(),
            files: self
                .files
                .to_vec(relative)
                .into_iter()
                .map(path_string)
                .collect(),
        }
    }

    /// The bundle's class map.
    #[must_use]
    pub fn class_map(&self) -> &ClassMap {
        &self.class_map
    }

    /// Target filename, absolute or root-relative.
    #[must_use]
    pub fn filename(&self, relative: bool) -> PathBuf {
        if relative {
            make_relative(&self.filename, &self.root)
        } else {
            self.filename.clone()
        }
    }

    /// The bundle's root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Which manifest kind a merged bundle is written into.
///
/// The two variants differ only in output shape: the regular manifest keeps
/// array-valued psr-4 entries, while the legacy extension declaration uses
/// the single-string profile and rejects multi-directory prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetManifest {
    /// Write the export under `[autoload]` of a `package.toml`.
    #[default]
    Manifest,
    /// Write the export into the `autoload` key of a legacy extension
    /// declaration (`extension.toml`).
    ExtensionConfig,
}

impl TargetManifest {
    /// Write the bundle's export (root-relative paths) into its target file.
    pub fn write(self, bundle: &AutoloadBundle) -> Result<()> {
        let export = bundle.export(true);
        let target = bundle.filename(false);

        match self {
            Self::Manifest => {
                let mut editor = ManifestEditor::open(&target)?;
                editor.set_autoload(&export)?;
                editor.save()
            }
            Self::ExtensionConfig => extension::write_autoload(&target, &export),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle(root: &str, classmap: &[&str], files: &[&str]) -> AutoloadBundle {
        let root = Path::new(root);
        let manifest = Path::new("package.toml");
        AutoloadBundle::new(
            ClassMap::new(classmap.iter().copied(), manifest, root),
            NamespaceMap::new(
                [("Acme.Widgets".to_string(), vec!["src"])],
                manifest,
                root,
            ),
            FileList::new(files.iter().copied(), manifest, root),
            manifest,
            root,
        )
    }

    #[test]
    fn test_merge_merges_all_constituents_pairwise() {
        let root_bundle = bundle("/project", &["src/a.rs"], &["src/boot.rs"]);
        let vendor_bundle = bundle("/project", &["libs/vendor/b.rs"], &[]);

        let merged = root_bundle.merge(&vendor_bundle, Some(Path::new("merged.toml")));
        assert_eq!(merged.export(false).classmap.len(), 2);
        assert_eq!(merged.export(false).files.len(), 1);
        assert_eq!(
            merged.filename(false),
            PathBuf::from("/project/merged.toml")
        );
    }

    #[test]
    fn test_merge_keeps_receiver_filename_by_default() {
        let a = bundle("/project", &[], &[]);
        let b = bundle("/project", &["x.rs"], &[]);
        assert_eq!(
            a.merge(&b, None).filename(false),
            PathBuf::from("/project/package.toml")
        );
    }

    #[test]
    fn test_export_round_trip_omits_empty_files_key() {
        let merged = bundle("/project", &["src/a.rs"], &[]);
        let json = serde_json::to_value(merged.export(true)).unwrap();
        let object = json.as_object().unwrap();
        assert!(object.contains_key("classmap"));
        assert!(object.contains_key("psr-4"));
        assert!(!object.contains_key("files"));
    }

    #[test]
    fn test_export_relative_paths() {
        let export = bundle("/project", &["/project/src/a.rs"], &[]).export(true);
        assert_eq!(export.classmap, vec!["src/a.rs".to_string()]);
        assert_eq!(export.psr4["Acme.Widgets"], vec!["src".to_string()]);
    }

    #[test]
    fn test_with_class_map_replaces_only_class_map() {
        let original = bundle("/project", &["src/a.rs", "src/b.rs"], &["boot.rs"]);
        let trimmed = original.class_map().remove(Path::new("src/a.rs"));
        let updated = original.with_class_map(trimmed);

        assert_eq!(updated.export(false).classmap.len(), 1);
        assert_eq!(updated.export(false).files.len(), 1);
    }
}
