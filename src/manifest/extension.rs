//! Legacy extension declaration (`extension.toml`) support.
//!
//! Framework extensions that predate manifest-based autoloading carry their
//! configuration in a standalone declaration file. Its `autoload` key mirrors
//! the regular export shape, with one legacy difference: psr-4 values are
//! single strings rather than arrays, so a merged bundle mapping one prefix
//! onto several directories cannot be expressed and is rejected.

use crate::autoload::AutoloadExport;
use crate::core::VbundleError;
use anyhow::Result;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use toml_edit::{Array, DocumentMut, Item, Table, value};

/// Parsed legacy extension declaration.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtensionDeclaration {
    /// The `[extension]` section.
    pub extension: ExtensionSection,
}

/// `[extension]` section of a declaration file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtensionSection {
    /// Extension key.
    #[serde(default)]
    pub name: Option<String>,
    /// Short description.
    #[serde(default)]
    pub description: Option<String>,
    /// Legacy autoload mirror, when present.
    #[serde(default)]
    pub autoload: Option<LegacyAutoload>,
}

/// Legacy `autoload` shape: single-string psr-4 values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegacyAutoload {
    /// Class-map paths.
    #[serde(default)]
    pub classmap: Vec<String>,
    /// Namespace prefix to single base directory.
    #[serde(rename = "psr-4", default)]
    pub psr4: BTreeMap<String, String>,
    /// Unconditionally loaded files.
    #[serde(default)]
    pub files: Vec<String>,
}

impl ExtensionDeclaration {
    /// Parse a declaration file.
    ///
    /// # Errors
    ///
    /// [`VbundleError::FileDoesNotExist`] when the file is missing,
    /// [`VbundleError::ManifestInvalid`] when it cannot be parsed or lacks
    /// the `[extension]` section.
    pub fn parse(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(VbundleError::FileDoesNotExist {
                path: path.display().to_string(),
            }
            .into());
        }

        let content = std::fs::read_to_string(path).map_err(|e| VbundleError::io(path, e))?;
        let declaration: Self = toml::from_str(&content)
            .map_err(|e| VbundleError::manifest_invalid(path.display(), e.to_string()))?;
        Ok(declaration)
    }
}

/// Write an autoload export into the `[extension.autoload]` key of a
/// declaration file, in the legacy single-string psr-4 profile.
///
/// Unrelated declaration content is preserved; a missing file is initialized
/// to a valid shell. Empty constituents are omitted.
///
/// # Errors
///
/// [`VbundleError::ManifestInvalid`] when a psr-4 prefix maps onto more than
/// one directory, which the legacy profile cannot express.
pub fn write_autoload(path: &Path, export: &AutoloadExport) -> Result<()> {
    let mut doc = if path.is_file() {
        let content = std::fs::read_to_string(path).map_err(|e| VbundleError::io(path, e))?;
        content
            .parse::<DocumentMut>()
            .map_err(|e| VbundleError::manifest_invalid(path.display(), e.to_string()))?
    } else {
        DocumentMut::new()
    };

    let mut autoload = Table::new();

    if !export.classmap.is_empty() {
        let mut classmap = Array::new();
        classmap.extend(export.classmap.iter().map(String::as_str));
        autoload["classmap"] = value(classmap);
    }

    if !export.psr4.is_empty() {
        let mut psr4 = Table::new();
        for (prefix, dirs) in &export.psr4 {
            match dirs.as_slice() {
                [single] => {
                    psr4[prefix] = value(single);
                }
                _ => {
                    return Err(VbundleError::manifest_invalid(
                        path.display(),
                        format!(
                            "psr-4 prefix '{prefix}' maps onto {} directories; the legacy \
                             profile supports exactly one",
                            dirs.len()
                        ),
                    )
                    .into());
                }
            }
        }
        autoload["psr-4"] = Item::Table(psr4);
    }

    if !export.files.is_empty() {
        let mut files = Array::new();
        files.extend(export.files.iter().map(String::as_str));
        autoload["files"] = value(files);
    }

    let extension = doc.entry("extension").or_insert(Item::Table(Table::new()));
    if !extension.is_table_like() {
        *extension = Item::Table(Table::new());
    }
    extension["autoload"] = Item::Table(autoload);

    crate::utils::fs::safe_write(path, &doc.to_string())
}
