//! Manifest parsing and surgical manifest editing.
//!
//! A project manifest (`package.toml`) declares the package identity, its
//! requirements, provided packages, autoload metadata, installer settings,
//! and package repositories:
//!
//! ```toml
//! [package]
//! name = "acme/widgets"
//! version = "1.2.0"
//! type = "library"
//!
//! [require]
//! "acme/http" = "^2.0"
//! "ext-sockets" = "*"
//!
//! [autoload]
//! classmap = ["src/Legacy"]
//! files = ["src/functions.rs"]
//!
//! [autoload."psr-4"]
//! "Acme.Widgets" = "src"
//!
//! [[repositories]]
//! type = "path"
//! path = "../internal-packages"
//! ```
//!
//! Reading goes through serde ([`Manifest`]); all mutation goes through
//! [`editor::ManifestEditor`], which edits the TOML document in place and
//! preserves unrelated content and formatting.

pub mod editor;
pub mod extension;

use crate::constants::MANIFEST_FILENAME;
use crate::core::VbundleError;
use crate::package::{PackageKind, Requirement, ResolvedPackage};
use anyhow::Result;
use semver::Version;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub use editor::ManifestEditor;
pub use extension::ExtensionDeclaration;

/// One or many strings; manifests may spell single-directory psr-4 values
/// as a bare string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    /// Single path.
    One(String),
    /// Multiple paths.
    Many(Vec<String>),
}

impl OneOrMany {
    /// Normalize to a list.
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(p) => vec![p],
            Self::Many(ps) => ps,
        }
    }
}

/// `[package]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PackageSection {
    /// Namespaced package name (`vendor/name`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Declared version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Package classification tag.
    #[serde(rename = "type", default)]
    pub kind: PackageKind,
    /// Short description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Declared licenses.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub license: Vec<String>,
    /// Author names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,
    /// Homepage URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
}

/// `[autoload]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AutoloadSection {
    /// Files and directories included in the class map.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classmap: Vec<String>,
    /// Namespace-prefix to base-directory mapping.
    #[serde(rename = "psr-4", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub psr4: BTreeMap<String, OneOrMany>,
    /// Files loaded unconditionally.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
}

/// `[config]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConfigSection {
    /// Whether installer plugins may run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_plugins: Option<bool>,
    /// Whether a lockfile is written on install.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock: Option<bool>,
}

/// A `[[repositories]]` entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Repository {
    /// Repository type (`path`, `registry`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Registry URL, for registry repositories.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Local directory, for path repositories.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Repository {
    /// Whether this entry points at the default public registry.
    #[must_use]
    pub fn is_default_registry(&self) -> bool {
        self.url
            .as_deref()
            .is_some_and(|url| url.contains(crate::constants::DEFAULT_REGISTRY))
    }
}

/// A parsed project manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    /// Package identity and metadata.
    #[serde(default)]
    pub package: PackageSection,
    /// Declared requirements (name to constraint).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub require: BTreeMap<String, String>,
    /// Declared provided packages (name to constraint).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub provide: BTreeMap<String, String>,
    /// Autoload metadata.
    #[serde(default)]
    pub autoload: AutoloadSection,
    /// Installer settings.
    #[serde(default)]
    pub config: ConfigSection,
    /// Package repositories.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub repositories: Vec<Repository>,
    /// Free-form tool metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<toml::Table>,

    /// Directory containing the manifest file. Not serialized.
    #[serde(skip)]
    pub manifest_dir: Option<PathBuf>,
}

impl Manifest {
    /// Load and parse a manifest file.
    ///
    /// # Errors
    ///
    /// [`VbundleError::FileDoesNotExist`] when the file is missing,
    /// [`VbundleError::ManifestInvalid`] when it cannot be parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(VbundleError::FileDoesNotExist {
                path: path.display().to_string(),
            }
            .into());
        }

        let content = std::fs::read_to_string(path).map_err(|e| VbundleError::io(path, e))?;
        let mut manifest: Self = toml::from_str(&content)
            .map_err(|e| VbundleError::manifest_invalid(path.display(), e.to_string()))?;
        manifest.manifest_dir = path.parent().map(Path::to_path_buf);
        Ok(manifest)
    }

    /// Load the `package.toml` of a project directory.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        Self::load(&dir.join(MANIFEST_FILENAME))
    }

    /// Serialize and atomically write this manifest to `path`.
    ///
    /// Used for freshly generated manifests; existing files are edited with
    /// [`ManifestEditor`] instead so their formatting survives.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(VbundleError::from)?;
        crate::utils::fs::safe_write(path, &content)
    }

    /// Convert this manifest into a resolved package.
    ///
    /// # Errors
    ///
    /// Fails when the manifest lacks a name or a parseable version.
    pub fn to_resolved_package(&self) -> Result<ResolvedPackage> {
        let name = self.package.name.clone().ok_or_else(|| {
            VbundleError::manifest_invalid(self.display_path(), "missing [package] name")
        })?;
        let raw_version = self.package.version.clone().ok_or_else(|| {
            VbundleError::manifest_invalid(self.display_path(), "missing [package] version")
        })?;
        let version = Version::parse(raw_version.trim_start_matches('v')).map_err(|e| {
            VbundleError::manifest_invalid(self.display_path(), format!("invalid version: {e}"))
        })?;

        Ok(ResolvedPackage {
            name,
            version,
            pretty_version: raw_version,
            kind: self.package.kind,
            requires: self
                .require
                .iter()
                .map(|(name, constraint)| Requirement {
                    name: name.clone(),
                    constraint: constraint.clone(),
                })
                .collect(),
            description: self.package.description.clone(),
            license: self.package.license.clone(),
            authors: self.package.authors.clone(),
            homepage: self.package.homepage.clone(),
            dist: None,
            source: None,
        })
    }

    fn display_path(&self) -> String {
        self.manifest_dir
            .as_deref()
            .map_or_else(|| MANIFEST_FILENAME.to_string(), |dir| {
                dir.join(MANIFEST_FILENAME).display().to_string()
            })
    }
}
