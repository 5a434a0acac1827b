//! Lockfile parsing and lock-state projection.
//!
//! The external installer records the fully resolved package set in
//! `package.lock` next to the manifest it installed. The bundler treats that
//! file as its lock state: BOM generation reads the locked packages, and the
//! resolver's loaded universe is seeded from them. The bundler itself never
//! writes a lockfile (`save` exists for tests and tooling).

use crate::constants::LOCKFILE_FILENAME;
use crate::core::VbundleError;
use crate::package::ResolvedPackage;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Current lockfile format version.
const LOCKFILE_VERSION: u32 = 1;

/// One locked package entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockedPackage {
    /// The resolved package as recorded at install time.
    #[serde(flatten)]
    pub package: ResolvedPackage,
    /// Whether the package was installed as a dev dependency.
    #[serde(default)]
    pub dev: bool,
}

/// A parsed `package.lock`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lockfile {
    /// Lockfile format version.
    pub version: u32,
    /// Locked packages.
    #[serde(default)]
    pub packages: Vec<LockedPackage>,
}

impl Default for Lockfile {
    fn default() -> Self {
        Self {
            version: LOCKFILE_VERSION,
            packages: Vec::new(),
        }
    }
}

impl Lockfile {
    /// Whether a lock state exists for the project at `dir`.
    #[must_use]
    pub fn exists(dir: &Path) -> bool {
        dir.join(LOCKFILE_FILENAME).is_file()
    }

    /// Load the lockfile of the project at `dir`.
    ///
    /// # Errors
    ///
    /// [`VbundleError::DependenciesNotInstalled`] when no lockfile is
    /// present, [`VbundleError::ManifestInvalid`] when it cannot be parsed.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let path = dir.join(LOCKFILE_FILENAME);
        if !path.is_file() {
            return Err(VbundleError::DependenciesNotInstalled.into());
        }
        Self::load(&path)
    }

    /// Load and parse a lockfile.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| VbundleError::io(path, e))?;
        let lockfile: Self = toml::from_str(&content)
            .map_err(|e| VbundleError::manifest_invalid(path.display(), e.to_string()))?;
        Ok(lockfile)
    }

    /// Serialize and atomically write this lockfile.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(VbundleError::from)?;
        crate::utils::fs::safe_write(path, &content)
    }

    /// Locked packages, optionally with dev dependencies excluded.
    #[must_use]
    pub fn locked_packages(&self, include_dev: bool) -> Vec<&ResolvedPackage> {
        self.packages
            .iter()
            .filter(|locked| include_dev || !locked.dev)
            .map(|locked| &locked.package)
            .collect()
    }

    /// Find a locked package by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&ResolvedPackage> {
        self.packages
            .iter()
            .find(|locked| locked.package.name == name)
            .map(|locked| &locked.package)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use semver::Version;
    use tempfile::TempDir;

    fn lockfile() -> Lockfile {
        Lockfile {
            version: LOCKFILE_VERSION,
            packages: vec![
                LockedPackage {
                    package: ResolvedPackage::new("acme/http", Version::new(2, 1, 0)),
                    dev: false,
                },
                LockedPackage {
                    package: ResolvedPackage::new("acme/testkit", Version::new(1, 0, 0)),
                    dev: true,
                },
            ],
        }
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("package.lock");

        lockfile().save(&path).unwrap();
        let loaded = Lockfile::load(&path).unwrap();

        assert_eq!(loaded.version, LOCKFILE_VERSION);
        assert_eq!(loaded.packages.len(), 2);
        assert_eq!(loaded.find("acme/http").unwrap().version, Version::new(2, 1, 0));
    }

    #[test]
    fn test_locked_packages_respects_dev_flag() {
        let lockfile = lockfile();
        assert_eq!(lockfile.locked_packages(true).len(), 2);
        let non_dev = lockfile.locked_packages(false);
        assert_eq!(non_dev.len(), 1);
        assert_eq!(non_dev[0].name, "acme/http");
    }

    #[test]
    fn test_missing_lockfile_is_not_installed() {
        let tmp = TempDir::new().unwrap();
        assert!(!Lockfile::exists(tmp.path()));
        let err = Lockfile::load_from_dir(tmp.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<VbundleError>(),
            Some(VbundleError::DependenciesNotInstalled)
        ));
    }
}
