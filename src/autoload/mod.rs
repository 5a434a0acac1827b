//! Path-aware autoload artifacts and their merge model.
//!
//! Three structurally similar containers hold autoload metadata sourced from
//! different root directories:
//!
//! - [`ClassMap`] -- ordered list of class-defining file paths
//! - [`NamespaceMap`] -- namespace prefix to base-directory lists (psr-4)
//! - [`FileList`] -- deduplicated list of unconditionally loaded files
//!
//! All three are immutable value objects. Entries are normalized to absolute
//! paths against the artifact's root directory at construction time, so two
//! entries are equal iff their absolute forms are equal, regardless of the
//! relative spelling used to construct them. Every `merge` returns a new
//! instance rooted at the receiver's root directory and never mutates either
//! operand; merges are associative with respect to the resulting entry sets,
//! which lets [`bundle::AutoloadBundle`]s be combined pairwise in any
//! grouping order.
//!
//! Merged bundles serialize into [`AutoloadExport`], the
//! `{ classmap, psr-4, files }` wire shape consumed by both manifest kinds;
//! empty constituents are omitted from the serialized object entirely.

pub mod bundle;
mod class_map;
mod files;
mod namespaces;

pub use bundle::{AutoloadBundle, TargetManifest};
pub use class_map::ClassMap;
pub use files::FileList;
pub use namespaces::NamespaceMap;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Serialized autoload shape shared by both target manifest kinds.
///
/// Keys with empty values are omitted entirely, so a bundle without
/// unconditionally loaded files produces an object with no `files` key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoloadExport {
    /// Class-map file paths.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classmap: Vec<String>,
    /// Namespace prefix to base directories.
    #[serde(rename = "psr-4", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub psr4: BTreeMap<String, Vec<String>>,
    /// Unconditionally loaded files.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
}

impl AutoloadExport {
    /// Whether all three constituents are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classmap.is_empty() && self.psr4.is_empty() && self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_omits_empty_keys() {
        let export = AutoloadExport {
            classmap: vec!["/p/src/a.rs".to_string()],
            psr4: BTreeMap::from([(
                "Acme.Widgets".to_string(),
                vec!["/p/src".to_string()],
            )]),
            files: Vec::new(),
        };

        let json = serde_json::to_value(&export).unwrap();
        let object = json.as_object().unwrap();
        assert!(object.contains_key("classmap"));
        assert!(object.contains_key("psr-4"));
        assert!(!object.contains_key("files"));
    }

    #[test]
    fn test_empty_export_serializes_to_empty_object() {
        let json = serde_json::to_value(AutoloadExport::default()).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }
}
