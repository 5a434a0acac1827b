//! Dependency (BOM) bundling workflow.

use crate::bom::{BomFormat, BomGenerator, BomOptions, SpecVersion, validate_json};
use crate::bundler::BundleContext;
use crate::core::VbundleError;
use crate::package::ResolvedPackage;
use anyhow::Result;
use semver::Version;
use std::path::PathBuf;

/// Per-invocation switches for [`DependencyBundler::bundle`].
#[derive(Debug, Clone)]
pub struct DependencyOptions {
    /// Extract the libs manifest when it is missing.
    pub extract: bool,
}

impl Default for DependencyOptions {
    fn default() -> Self {
        Self { extract: true }
    }
}

/// Turns the libs project's lock state into a validated CycloneDX document.
pub struct DependencyBundler<'a> {
    context: &'a BundleContext<'a>,
}

impl<'a> DependencyBundler<'a> {
    /// Create a bundler over a project context.
    pub fn new(context: &'a BundleContext<'a>) -> Self {
        Self { context }
    }

    /// Run the full BOM workflow and return the written BOM path.
    ///
    /// The output format follows the configured file extension and is
    /// checked against the spec version up front, before any install work
    /// happens. The libs project is extracted when needed and installed
    /// (dev packages included when configured), the document is generated
    /// from the resulting lock state, serialized, validated, and written.
    ///
    /// # Errors
    ///
    /// [`VbundleError::FileAlreadyExists`] when the BOM file exists and
    /// overwriting is not enabled, plus everything the underlying steps can
    /// fail with.
    pub fn bundle(&self, options: &DependencyOptions) -> Result<PathBuf> {
        let config = &self.context.config.dependencies;
        let libs_dir = self.context.libs_dir();
        let bom_file = crate::utils::paths::make_absolute(&config.bom_file, &libs_dir);

        let format = BomFormat::from_path(&bom_file)?;
        let spec_version = self.context.config.spec_version()?;
        format.ensure_supported(spec_version)?;

        if bom_file.is_file() && !config.overwrite {
            return Err(VbundleError::FileAlreadyExists {
                path: bom_file.display().to_string(),
            }
            .into());
        }

        self.context.ensure_libs_manifest(
            options.extract,
            self.context.config.autoload.fail_on_extraction_problems,
        )?;
        self.context.install_libs(config.include_dev)?;

        let serialized = self.generate(spec_version, format, &libs_dir)?;
        self.context.runner.run("Write BOM", || {
            crate::utils::fs::safe_write(&bom_file, &serialized)
        })?;

        Ok(bom_file)
    }

    fn generate(
        &self,
        spec_version: SpecVersion,
        format: BomFormat,
        libs_dir: &std::path::Path,
    ) -> Result<String> {
        let root = self.root_component_package(libs_dir)?;
        let installer = self.context.installer()?;
        let bom_options = BomOptions {
            include_dev: self.context.config.dependencies.include_dev,
            installer: Some(installer.command().to_string()),
            installer_version: installer.version(),
        };

        self.context.runner.run("Generate BOM", || {
            let bom = BomGenerator::new(spec_version).generate(&root, libs_dir, &bom_options)?;
            let serialized = bom.serialize(format)?;
            validate_json(&serialized, spec_version)?;
            Ok(serialized)
        })
    }

    /// The BOM's subject: the libs manifest as a package, with a fallback
    /// version for manifests that declare none.
    fn root_component_package(&self, libs_dir: &std::path::Path) -> Result<ResolvedPackage> {
        let manifest = crate::manifest::Manifest::load_from_dir(libs_dir)?;
        match manifest.to_resolved_package() {
            Ok(package) => Ok(package),
            Err(_) => {
                let name = manifest
                    .package
                    .name
                    .clone()
                    .unwrap_or_else(|| "vbundle/libs".to_string());
                let mut package = ResolvedPackage::new(name, Version::new(0, 0, 0));
                package.pretty_version = "dev".to_string();
                package.requires = manifest
                    .require
                    .iter()
                    .map(|(name, constraint)| crate::package::Requirement {
                        name: name.clone(),
                        constraint: constraint.clone(),
                    })
                    .collect();
                Ok(package)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VbundleConfig;
    use crate::output::TaskRunner;
    use tempfile::TempDir;

    fn fixture(bom_file: &str) -> (TempDir, VbundleConfig, TaskRunner) {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("package.toml"),
            "[package]\nname = \"acme/widgets\"\nversion = \"1.0.0\"\n",
        )
        .unwrap();
        std::fs::write(
            tmp.path().join("vbundle.toml"),
            format!("[dependencies]\nbom-file = \"{bom_file}\"\n"),
        )
        .unwrap();
        let config = VbundleConfig::read_from_dir(tmp.path()).unwrap();
        (tmp, config, TaskRunner::new(false, true))
    }

    #[test]
    fn test_unsupported_format_fails_before_any_work() {
        let (tmp, config, runner) = fixture("sbom.xml");
        let context = BundleContext::new(tmp.path(), &config, &runner);
        let err = DependencyBundler::new(&context)
            .bundle(&DependencyOptions::default())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<VbundleError>(),
            Some(VbundleError::BomFormatNotSupported { .. })
        ));
        // Nothing was extracted.
        assert!(!tmp.path().join("libs").exists());
    }

    #[test]
    fn test_existing_bom_without_overwrite_is_refused() {
        let (tmp, config, runner) = fixture("sbom.json");
        let libs = tmp.path().join("libs");
        std::fs::create_dir_all(&libs).unwrap();
        std::fs::write(libs.join("sbom.json"), "{}").unwrap();

        let context = BundleContext::new(tmp.path(), &config, &runner);
        let err = DependencyBundler::new(&context)
            .bundle(&DependencyOptions::default())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<VbundleError>(),
            Some(VbundleError::FileAlreadyExists { .. })
        ));
    }
}
