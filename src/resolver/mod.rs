//! Resolver capability consumed by the dependency extractor.
//!
//! The bundler does not resolve version constraints itself; it consumes a
//! [`Resolver`] that can answer two questions:
//!
//! - [`Resolver::find_package`] -- resolve a name+constraint against the
//!   *currently loaded* package universe (the packages the project already
//!   knows about: lock state plus repository scan results, one loaded
//!   version per name).
//! - [`Resolver::find_best_candidate`] -- best-candidate version selection
//!   over the *full* candidate universe (every known version of a package),
//!   preferring the highest matching stable release.
//!
//! [`PackageRepository`] is the production implementation: it seeds the
//! loaded universe from the project's lock state and fills the candidate
//! universe by scanning the manifest's path repositories for nested package
//! manifests, one per package version.

use crate::constants::MANIFEST_FILENAME;
use crate::lockfile::Lockfile;
use crate::manifest::Manifest;
use crate::package::ResolvedPackage;
use crate::version::{Constraint, best_candidate};
use anyhow::Result;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Means of resolving requirement names and constraints to concrete
/// packages. See the module docs for the loaded/full universe distinction.
pub trait Resolver {
    /// Resolve against the currently loaded universe.
    fn find_package(&self, name: &str, constraint: &str) -> Option<&ResolvedPackage>;

    /// Best-candidate selection over the full candidate universe.
    fn find_best_candidate(&self, name: &str, constraint: &str) -> Option<&ResolvedPackage>;
}

/// In-memory package universe.
#[derive(Debug, Default)]
pub struct PackageRepository {
    /// One loaded version per package name; first registration wins, with
    /// lock state registered before repository scans.
    loaded: HashMap<String, ResolvedPackage>,
    /// Every known version per package name.
    available: HashMap<String, Vec<ResolvedPackage>>,
}

impl PackageRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the package universe for the project at `root`.
    ///
    /// Locked packages (when a lock state exists) are registered first, then
    /// each `path` repository of the manifest is scanned for nested
    /// `package.toml` files. Unreadable or incomplete manifests found during
    /// the scan are skipped with a warning.
    pub fn load(root: &Path, manifest: &Manifest) -> Result<Self> {
        let mut repository = Self::new();

        if Lockfile::exists(root) {
            let lockfile = Lockfile::load_from_dir(root)?;
            for locked in lockfile.locked_packages(true) {
                repository.register(locked.clone());
            }
        }

        for entry in &manifest.repositories {
            if entry.kind != "path" {
                continue;
            }
            let Some(path) = &entry.path else { continue };
            let dir = crate::utils::paths::make_absolute(Path::new(path), root);
            repository.scan_path_repository(&dir);
        }

        debug!(
            packages = repository.loaded.len(),
            candidates = repository.available.values().map(Vec::len).sum::<usize>(),
            "package universe loaded"
        );

        Ok(repository)
    }

    /// Register a package in both universes. The first registered version of
    /// a name becomes its loaded version.
    pub fn register(&mut self, package: ResolvedPackage) {
        self.loaded
            .entry(package.name.clone())
            .or_insert_with(|| package.clone());

        let versions = self.available.entry(package.name.clone()).or_default();
        if !versions.iter().any(|p| p.version == package.version) {
            versions.push(package);
        }
    }

    fn scan_path_repository(&mut self, dir: &Path) {
        if !dir.is_dir() {
            warn!(path = %dir.display(), "path repository does not exist, skipping");
            return;
        }

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(4)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
        {
            if entry.file_name() != MANIFEST_FILENAME || !entry.file_type().is_file() {
                continue;
            }

            match Manifest::load(entry.path()).and_then(|m| m.to_resolved_package()) {
                Ok(package) => {
                    debug!(
                        package = %package.name,
                        version = %package.version,
                        "registered repository package"
                    );
                    self.register(package);
                }
                Err(error) => {
                    warn!(
                        path = %entry.path().display(),
                        %error,
                        "skipping unreadable repository manifest"
                    );
                }
            }
        }
    }
}

impl Resolver for PackageRepository {
    fn find_package(&self, name: &str, constraint: &str) -> Option<&ResolvedPackage> {
        let package = self.loaded.get(name)?;
        crate::version::constraint_matches(constraint, &package.version).then_some(package)
    }

    fn find_best_candidate(&self, name: &str, constraint: &str) -> Option<&ResolvedPackage> {
        let versions = self.available.get(name)?;
        let constraint = Constraint::parse(constraint).ok()?;
        let best = best_candidate(versions.iter().map(|p| &p.version), &constraint)?;
        versions.iter().find(|p| p.version == *best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use semver::Version;

    fn repo() -> PackageRepository {
        let mut repo = PackageRepository::new();
        repo.register(ResolvedPackage::new("acme/http", Version::new(2, 0, 0)));
        repo.register(ResolvedPackage::new("acme/http", Version::new(2, 4, 0)));
        repo.register(ResolvedPackage::new("acme/http", Version::new(3, 0, 0)));
        repo
    }

    #[test]
    fn test_find_package_uses_first_loaded_version() {
        let repo = repo();
        let found = repo.find_package("acme/http", "^2.0").unwrap();
        assert_eq!(found.version, Version::new(2, 0, 0));
    }

    #[test]
    fn test_find_package_rejects_unsatisfied_constraint() {
        let repo = repo();
        // The loaded version is 2.0.0; ^3.0 does not match it even though a
        // 3.0.0 candidate exists.
        assert!(repo.find_package("acme/http", "^3.0").is_none());
        assert!(repo.find_package("acme/missing", "*").is_none());
    }

    #[test]
    fn test_find_best_candidate_picks_highest_matching() {
        let repo = repo();
        let best = repo.find_best_candidate("acme/http", "^2.0").unwrap();
        assert_eq!(best.version, Version::new(2, 4, 0));
    }

    #[test]
    fn test_register_ignores_duplicate_versions() {
        let mut repo = repo();
        repo.register(ResolvedPackage::new("acme/http", Version::new(2, 4, 0)));
        assert_eq!(repo.available["acme/http"].len(), 3);
    }

    #[test]
    fn test_load_scans_path_repositories() {
        use tempfile::TempDir;

        let tmp = TempDir::new().unwrap();
        let repo_dir = tmp.path().join("packages/acme/http/2.0.0");
        std::fs::create_dir_all(&repo_dir).unwrap();
        std::fs::write(
            repo_dir.join("package.toml"),
            "[package]\nname = \"acme/http\"\nversion = \"2.0.0\"\n",
        )
        .unwrap();
        // Malformed manifests are skipped, not fatal.
        std::fs::write(tmp.path().join("packages/package.toml"), "nope [").unwrap();

        let root = tmp.path().join("project");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(
            root.join("package.toml"),
            "[package]\nname = \"acme/app\"\nversion = \"0.1.0\"\n\n[[repositories]]\ntype = \"path\"\npath = \"../packages\"\n",
        )
        .unwrap();

        let manifest = Manifest::load_from_dir(&root).unwrap();
        let repo = PackageRepository::load(&root, &manifest).unwrap();
        assert!(repo.find_package("acme/http", "^2.0").is_some());
    }
}
