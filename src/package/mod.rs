//! Resolved package model and package classification.
//!
//! A [`ResolvedPackage`] is the unit of data the resolver hands to the
//! dependency extractor and the BOM generator: a concrete name/version
//! identity, the package's own declared requirements, and the descriptive
//! metadata a BOM component needs. The bundler never mutates packages; it
//! only classifies them and follows their requirement edges.
//!
//! Classification is attribute-based: a package's `[package] type` field maps
//! onto [`PackageKind`], and the [`PackageKind::is_framework`] /
//! [`PackageKind::is_extension`] predicates are the only places the bundler
//! interprets it. Platform packages (runtime primitives like `rt` or
//! `ext-sockets`) are recognized by name alone, before any resolution
//! happens.

use regex::Regex;
use semver::Version;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Classification tag carried in a manifest's `[package] type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PackageKind {
    /// A generic library, the default.
    #[default]
    Library,
    /// Bundles and re-exposes other packages as part of a baseline runtime.
    /// Its transitive requirements are treated as already satisfied once the
    /// framework package itself is present.
    Framework,
    /// A runtime-loadable unit, not a generic library. Excluded from
    /// dependency bundling entirely.
    Extension,
}

impl PackageKind {
    /// Whether this package provides a bundled baseline runtime.
    #[must_use]
    pub const fn is_framework(self) -> bool {
        matches!(self, Self::Framework)
    }

    /// Whether this package is a runtime-loadable extension.
    #[must_use]
    pub const fn is_extension(self) -> bool {
        matches!(self, Self::Extension)
    }
}

/// A single requirement edge declared by a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    /// Name of the required package.
    pub name: String,
    /// Version constraint, e.g. `^1.0` or `*`.
    pub constraint: String,
}

/// Distribution archive information of a resolved package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistInfo {
    /// Download URL of the distribution archive.
    pub url: String,
    /// Reference (tag or revision) the archive was built from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// SHA-256 checksum of the archive, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

/// Source repository information of a resolved package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    /// Repository URL.
    pub url: String,
    /// Checked-out reference (commit, tag).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// A package resolved to a concrete version, with its own requirement edges.
///
/// Produced by the resolver from repository manifests or lock state; opaque
/// to the extraction core except for identity, kind, and requirements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPackage {
    /// Namespaced package name, e.g. `vendor/name`.
    pub name: String,
    /// Parsed semantic version.
    pub version: Version,
    /// Version string as declared, e.g. `1.2.0` or `1.2.0-beta.1`.
    pub pretty_version: String,
    /// Package classification tag.
    #[serde(default)]
    pub kind: PackageKind,
    /// The package's own declared requirements.
    #[serde(default)]
    pub requires: Vec<Requirement>,
    /// Short description, for BOM components.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Declared licenses (SPDX identifiers or free-form names).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub license: Vec<String>,
    /// Author names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,
    /// Homepage URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    /// Distribution archive info.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dist: Option<DistInfo>,
    /// Source repository info.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceInfo>,
}

impl ResolvedPackage {
    /// Build a minimal package from name and version, defaulting everything
    /// else. Primarily useful in tests and repository scaffolding.
    pub fn new(name: impl Into<String>, version: Version) -> Self {
        let pretty_version = version.to_string();
        Self {
            name: name.into(),
            version,
            pretty_version,
            kind: PackageKind::default(),
            requires: Vec::new(),
            description: None,
            license: Vec::new(),
            authors: Vec::new(),
            homepage: None,
            dist: None,
            source: None,
        }
    }

    /// Author list flattened to one comma-joined string, empty entries
    /// dropped. `None` when no authors remain.
    #[must_use]
    pub fn author_line(&self) -> Option<String> {
        let joined = self
            .authors
            .iter()
            .map(|a| a.trim())
            .filter(|a| !a.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        if joined.is_empty() { None } else { Some(joined) }
    }
}

/// Split a namespaced package name into `(vendor, name)`.
///
/// Names without a `/` separator have no vendor part.
#[must_use]
pub fn split_name(name: &str) -> (Option<&str>, &str) {
    match name.split_once('/') {
        Some((vendor, rest)) => (Some(vendor), rest),
        None => (None, name),
    }
}

/// Whether a requirement name denotes a platform/runtime primitive rather
/// than an installable package.
///
/// Covers the language runtime (`rt`, with optional capability suffixes),
/// native extensions (`ext-*`), system libraries (`lib-*`), and the
/// installer's own API pseudo-packages.
#[must_use]
pub fn is_platform_package(name: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r"^(?:rt|rt-[a-z0-9-]+|ext-[a-z0-9_.-]+|lib-[a-z0-9_.-]+|installer(?:-api)?)$")
            .expect("platform package pattern is valid")
    });
    pattern.is_match(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_packages_are_recognized() {
        assert!(is_platform_package("rt"));
        assert!(is_platform_package("rt-64bit"));
        assert!(is_platform_package("ext-sockets"));
        assert!(is_platform_package("lib-ssl"));
        assert!(is_platform_package("installer"));
        assert!(is_platform_package("installer-api"));
    }

    #[test]
    fn test_regular_packages_are_not_platform() {
        assert!(!is_platform_package("acme/http"));
        assert!(!is_platform_package("extras"));
        assert!(!is_platform_package("rtl/widgets"));
        assert!(!is_platform_package("library"));
    }

    #[test]
    fn test_split_name() {
        assert_eq!(split_name("acme/http"), (Some("acme"), "http"));
        assert_eq!(split_name("standalone"), (None, "standalone"));
    }

    #[test]
    fn test_kind_predicates() {
        assert!(PackageKind::Framework.is_framework());
        assert!(!PackageKind::Framework.is_extension());
        assert!(PackageKind::Extension.is_extension());
        assert!(!PackageKind::Library.is_framework());
    }

    #[test]
    fn test_author_line_drops_empty_entries() {
        let mut pkg = ResolvedPackage::new("acme/http", Version::new(1, 0, 0));
        pkg.authors = vec!["Jo Dev".to_string(), "  ".to_string(), "Sam".to_string()];
        assert_eq!(pkg.author_line().as_deref(), Some("Jo Dev, Sam"));

        pkg.authors.clear();
        assert_eq!(pkg.author_line(), None);
    }

    #[test]
    fn test_kind_deserializes_from_kebab_case() {
        #[derive(Deserialize)]
        struct Probe {
            kind: PackageKind,
        }
        let probe: Probe = toml::from_str("kind = \"framework\"").unwrap();
        assert_eq!(probe.kind, PackageKind::Framework);
    }
}
