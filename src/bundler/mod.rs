//! Bundling workflows.
//!
//! The two user-facing workflows share one project context: a root project
//! with a `package.toml` and a libs sub-project (the extracted
//! vendor-libraries manifest) next to it. [`AutoloadBundler`] merges the
//! root's and the libs project's autoload metadata into one target file;
//! [`DependencyBundler`] turns the libs project's lock state into a
//! CycloneDX document.
//!
//! Both workflows extract the libs manifest on demand: when the libs
//! `package.toml` is absent, the dependency extractor runs against the root
//! manifest and the result is dumped before anything else happens.

pub mod autoload;
pub mod dependencies;

pub use autoload::{AutoloadBundler, AutoloadOptions};
pub use dependencies::{DependencyBundler, DependencyOptions};

use crate::config::VbundleConfig;
use crate::constants::{EXTRA_LIBS_PATH, MANIFEST_FILENAME};
use crate::core::VbundleError;
use crate::extractor::DependencyExtractor;
use crate::installer::Installer;
use crate::lockfile::Lockfile;
use crate::manifest::{Manifest, ManifestEditor};
use crate::output::TaskRunner;
use crate::resolver::PackageRepository;
use crate::utils::paths::make_absolute;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Shared state of one bundling run.
pub struct BundleContext<'a> {
    root: PathBuf,
    config: &'a VbundleConfig,
    runner: &'a TaskRunner,
}

impl<'a> BundleContext<'a> {
    /// Create a context for the project rooted at `root`.
    pub fn new(root: &Path, config: &'a VbundleConfig, runner: &'a TaskRunner) -> Self {
        Self {
            root: root.to_path_buf(),
            config,
            runner,
        }
    }

    /// Absolute project root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute libs sub-project directory.
    #[must_use]
    pub fn libs_dir(&self) -> PathBuf {
        make_absolute(&self.config.libs_path(), &self.root)
    }

    /// Load the root project manifest.
    pub fn root_manifest(&self) -> Result<Manifest> {
        Manifest::load_from_dir(&self.root)
    }

    /// Make sure the libs manifest exists, extracting it when permitted.
    ///
    /// With extraction enabled, a missing libs `package.toml` triggers a
    /// dependency extraction against the root manifest: every problem is
    /// printed as a warning line, a non-empty problem list is fatal when
    /// `fail_on_problems` is set, and the resulting set is dumped into the
    /// libs directory. With extraction disabled the libs project must
    /// already exist.
    ///
    /// # Errors
    ///
    /// [`VbundleError::ExtractionFailed`] for fatal extraction problems;
    /// [`VbundleError::DirectoryDoesNotExist`] /
    /// [`VbundleError::FileDoesNotExist`] when extraction is disabled and
    /// the libs project is absent.
    pub fn ensure_libs_manifest(&self, extract: bool, fail_on_problems: bool) -> Result<()> {
        let libs_dir = self.libs_dir();
        let libs_manifest = libs_dir.join(MANIFEST_FILENAME);
        if libs_manifest.is_file() {
            debug!(path = %libs_manifest.display(), "libs manifest present");
            return Ok(());
        }

        if !extract {
            if !libs_dir.is_dir() {
                return Err(VbundleError::DirectoryDoesNotExist {
                    path: libs_dir.display().to_string(),
                }
                .into());
            }
            return Err(VbundleError::FileDoesNotExist {
                path: libs_manifest.display().to_string(),
            }
            .into());
        }

        let manifest = self.root_manifest()?;
        let set = self.runner.run("Extract dependencies", || {
            let repository = PackageRepository::load(&self.root, &manifest)?;
            Ok(DependencyExtractor::new(&repository).extract(&manifest.require))
        })?;

        for problem in set.problems() {
            self.runner.warn(&problem);
        }
        if fail_on_problems && set.has_problems() {
            return Err(VbundleError::ExtractionFailed {
                problems: set.problems(),
            }
            .into());
        }

        crate::utils::fs::ensure_dir(&libs_dir)?;
        self.runner.run("Write libs manifest", || {
            set.dump_to_file(&libs_manifest, Some(&manifest))
        })
    }

    /// Install the libs sub-project with the configured installer and
    /// return the resulting lock state.
    pub fn install_libs(&self, include_dev: bool) -> Result<Lockfile> {
        let installer = self.installer()?;
        self.runner.run("Install dependencies", || {
            installer.install(&self.libs_dir(), include_dev)
        })
    }

    /// Locate the configured installer.
    pub fn installer(&self) -> Result<Installer> {
        Installer::locate(&self.config.installer.command)
    }

    /// Record the libs directory (relative form) under `[extra]` of the
    /// root manifest, preserving unrelated content.
    pub fn record_libs_path(&self) -> Result<()> {
        let relative = crate::utils::paths::make_relative(&self.libs_dir(), &self.root);
        let mut editor = ManifestEditor::open(&self.root.join(MANIFEST_FILENAME))?;
        editor.extra_set(EXTRA_LIBS_PATH, &relative.to_string_lossy());
        editor.save()
    }
}
