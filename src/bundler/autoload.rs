//! Autoload bundling workflow.

use crate::autoload::{AutoloadBundle, ClassMap, FileList, NamespaceMap, TargetManifest};
use crate::bundler::BundleContext;
use crate::config::AutoloadTarget;
use crate::constants::VENDOR_AUTOLOAD_FILE;
use crate::core::VbundleError;
use crate::manifest::Manifest;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Per-invocation switches for [`AutoloadBundler::bundle`].
#[derive(Debug, Clone)]
pub struct AutoloadOptions {
    /// Extract the libs manifest when it is missing.
    pub extract: bool,
}

impl Default for AutoloadOptions {
    fn default() -> Self {
        Self { extract: true }
    }
}

/// Merges the root project's and the libs project's autoload metadata into
/// one target file.
pub struct AutoloadBundler<'a> {
    context: &'a BundleContext<'a>,
}

impl<'a> AutoloadBundler<'a> {
    /// Create a bundler over a project context.
    pub fn new(context: &'a BundleContext<'a>) -> Self {
        Self { context }
    }

    /// Run the full autoload bundling workflow and return the written
    /// target path.
    ///
    /// The root project's own `[autoload]` section becomes one bundle, the
    /// installed libs project's `vendor/autoload.toml` a second; they merge
    /// root-first. Configured class-map exclusions are applied to the
    /// merged bundle with per-path reporting; a path missing from the class
    /// map is a warning, never an error. An existing target file other than
    /// the root manifest is only replaced with `overwrite` enabled; the
    /// root manifest itself is edited in place, optionally after a `.bak`
    /// backup.
    pub fn bundle(&self, options: &AutoloadOptions) -> Result<PathBuf> {
        let config = &self.context.config.autoload;
        let root = self.context.root();
        let target = crate::utils::paths::make_absolute(&config.target_file, root);
        let root_manifest_path = root.join(crate::constants::MANIFEST_FILENAME);
        let target_is_root_manifest = target == root_manifest_path;

        if target.is_file() && !config.overwrite && !target_is_root_manifest {
            return Err(VbundleError::FileAlreadyExists {
                path: target.display().to_string(),
            }
            .into());
        }

        let manifest = self.context.root_manifest()?;
        let root_bundle = self
            .context
            .runner
            .run("Collect project autoload metadata", || {
                Ok(root_autoload_bundle(&manifest, &target, root))
            })?;

        self.context
            .ensure_libs_manifest(options.extract, config.fail_on_extraction_problems)?;
        self.context.install_libs(false)?;

        let libs_dir = self.context.libs_dir();
        let vendor_bundle = self
            .context
            .runner
            .run("Collect vendor autoload metadata", || {
                vendor_autoload_bundle(&libs_dir, &target)
            })?;

        let merged = root_bundle.merge(&vendor_bundle, Some(&target));
        let merged = self.apply_exclusions(&merged);

        if target_is_root_manifest && config.backup_sources && target.is_file() {
            crate::utils::fs::backup_file(&target)?;
            debug!(target = %target.display(), "backed up root manifest");
        }

        let kind = match config.target {
            AutoloadTarget::Manifest => TargetManifest::Manifest,
            AutoloadTarget::ExtensionConfig => TargetManifest::ExtensionConfig,
        };
        self.context
            .runner
            .run("Write merged autoload metadata", || kind.write(&merged))?;

        self.context.record_libs_path()?;
        Ok(target)
    }

    /// Remove configured class-map paths, reporting each attempt.
    fn apply_exclusions(&self, bundle: &AutoloadBundle) -> AutoloadBundle {
        let exclusions = &self.context.config.autoload.exclude_from_classmap;
        if exclusions.is_empty() {
            return bundle.clone();
        }

        let mut class_map = bundle.class_map().clone();
        for path in exclusions {
            let label = format!("Exclude {} from class map", path.display());
            let removed = self.context.runner.attempt(&label, || class_map.has(path));
            if removed {
                class_map = class_map.remove(path);
            } else {
                self.context
                    .runner
                    .warn(&format!("{} is not part of the class map", path.display()));
            }
        }
        bundle.with_class_map(class_map)
    }
}

/// The root project's own (non-transitive) autoload metadata as a bundle.
fn root_autoload_bundle(manifest: &Manifest, target: &Path, root: &Path) -> AutoloadBundle {
    let autoload = &manifest.autoload;
    AutoloadBundle::new(
        ClassMap::new(autoload.classmap.iter(), target, root),
        NamespaceMap::new(
            autoload
                .psr4
                .iter()
                .map(|(prefix, dirs)| (prefix.clone(), dirs.clone().into_vec())),
            target,
            root,
        ),
        FileList::new(autoload.files.iter(), target, root),
        target,
        root,
    )
}

/// The libs project's transitive autoload metadata, generated by the
/// installer into `vendor/autoload.toml`.
///
/// # Errors
///
/// [`VbundleError::FileDoesNotExist`] when the file is missing (the libs
/// project was not installed), [`VbundleError::ManifestInvalid`] when it
/// cannot be parsed.
fn vendor_autoload_bundle(libs_dir: &Path, target: &Path) -> Result<AutoloadBundle> {
    let path = libs_dir.join(VENDOR_AUTOLOAD_FILE);
    if !path.is_file() {
        return Err(VbundleError::FileDoesNotExist {
            path: path.display().to_string(),
        }
        .into());
    }

    let content = std::fs::read_to_string(&path).map_err(|e| VbundleError::io(&path, e))?;
    let export: crate::autoload::AutoloadExport = toml::from_str(&content)
        .map_err(|e| VbundleError::manifest_invalid(path.display(), e.to_string()))?;

    Ok(AutoloadBundle::new(
        ClassMap::new(export.classmap.iter(), target, libs_dir),
        NamespaceMap::new(export.psr4, target, libs_dir),
        FileList::new(export.files.iter(), target, libs_dir),
        target,
        libs_dir,
    ))
}
