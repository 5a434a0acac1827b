//! Bundler configuration (`vbundle.toml`).
//!
//! Configuration is entirely optional: a missing file yields the defaults,
//! and every section and key has a sensible fallback. Paths in the file are
//! interpreted relative to the project root the CLI resolves.

use crate::constants::{
    CONFIG_FILENAME, DEFAULT_BOM_FILE, DEFAULT_INSTALLER_COMMAND, DEFAULT_LIBS_DIR,
    MANIFEST_FILENAME,
};
use crate::core::VbundleError;
use anyhow::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where a merged autoload export is written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AutoloadTarget {
    /// The `[autoload]` section of a `package.toml`.
    #[default]
    Manifest,
    /// The legacy `extension.toml` declaration.
    ExtensionConfig,
}

/// Settings for autoload bundling.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct AutoloadConfig {
    /// File the merged export is written to, relative to the root path.
    #[serde(default = "default_target_file")]
    pub target_file: PathBuf,
    /// Target flavor the file is written as.
    #[serde(default)]
    pub target: AutoloadTarget,
    /// Back up the target before overwriting it, when it is the root
    /// manifest.
    #[serde(default = "default_true")]
    pub backup_sources: bool,
    /// Class-map paths removed from the merged bundle.
    #[serde(default)]
    pub exclude_from_classmap: Vec<PathBuf>,
    /// Treat extraction problems as fatal.
    #[serde(default = "default_true")]
    pub fail_on_extraction_problems: bool,
    /// Allow clobbering an existing target file.
    #[serde(default)]
    pub overwrite: bool,
}

impl Default for AutoloadConfig {
    fn default() -> Self {
        Self {
            target_file: default_target_file(),
            target: AutoloadTarget::default(),
            backup_sources: true,
            exclude_from_classmap: Vec::new(),
            fail_on_extraction_problems: true,
            overwrite: false,
        }
    }
}

/// Settings for dependency (BOM) bundling.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct DependenciesConfig {
    /// BOM output file, relative to the libs directory.
    #[serde(default = "default_bom_file")]
    pub bom_file: PathBuf,
    /// CycloneDX spec version to emit.
    #[serde(default)]
    pub spec_version: Option<String>,
    /// Include dev packages of the libs lock state.
    #[serde(default)]
    pub include_dev: bool,
    /// Allow clobbering an existing BOM file.
    #[serde(default)]
    pub overwrite: bool,
}

impl Default for DependenciesConfig {
    fn default() -> Self {
        Self {
            bom_file: default_bom_file(),
            spec_version: None,
            include_dev: false,
            overwrite: false,
        }
    }
}

/// External installer settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct InstallerConfig {
    /// Command used to install the libs sub-project.
    #[serde(default = "default_installer_command")]
    pub command: String,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            command: default_installer_command(),
        }
    }
}

/// Parsed `vbundle.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct VbundleConfig {
    /// Project root, relative to the config file's directory.
    #[serde(default)]
    pub root_path: Option<PathBuf>,
    /// Libs sub-project directory, relative to the root path.
    #[serde(default)]
    pub libs_path: Option<PathBuf>,
    /// External installer settings.
    #[serde(default)]
    pub installer: InstallerConfig,
    /// Autoload bundling settings.
    #[serde(default)]
    pub autoload: AutoloadConfig,
    /// Dependency bundling settings.
    #[serde(default)]
    pub dependencies: DependenciesConfig,
}

impl VbundleConfig {
    /// Read the configuration file at `path`, or the defaults when it does
    /// not exist.
    ///
    /// # Errors
    ///
    /// [`VbundleError::ConfigError`] when the file cannot be read, parsed,
    /// or fails validation.
    pub fn read(path: &Path) -> Result<Self> {
        if !path.is_file() {
            debug!(path = %path.display(), "no configuration file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| VbundleError::ConfigError {
            message: format!("cannot read {}: {e}", path.display()),
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| VbundleError::ConfigError {
            message: format!("invalid configuration in {}: {e}", path.display()),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read `vbundle.toml` from a project directory.
    pub fn read_from_dir(dir: &Path) -> Result<Self> {
        Self::read(&dir.join(CONFIG_FILENAME))
    }

    /// Absolute project root for a config resolved against `base`.
    #[must_use]
    pub fn resolve_root(&self, base: &Path) -> PathBuf {
        self.root_path
            .as_deref()
            .map_or_else(|| base.to_path_buf(), |root| {
                crate::utils::paths::make_absolute(root, base)
            })
    }

    /// Libs directory, relative to the project root.
    #[must_use]
    pub fn libs_path(&self) -> PathBuf {
        self.libs_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LIBS_DIR))
    }

    /// Effective CycloneDX spec version.
    pub fn spec_version(&self) -> Result<crate::bom::SpecVersion> {
        match self.dependencies.spec_version.as_deref() {
            None => Ok(crate::bom::SpecVersion::default()),
            Some(raw) => crate::bom::SpecVersion::parse(raw),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.installer.command.trim().is_empty() {
            return Err(VbundleError::ConfigError {
                message: "installer command must not be empty".to_string(),
            }
            .into());
        }
        if self
            .libs_path
            .as_deref()
            .is_some_and(|libs| libs.as_os_str().is_empty())
        {
            return Err(VbundleError::ConfigError {
                message: "libs-path must not be empty".to_string(),
            }
            .into());
        }
        self.spec_version().map(|_| ())
    }
}

fn default_target_file() -> PathBuf {
    PathBuf::from(MANIFEST_FILENAME)
}

fn default_bom_file() -> PathBuf {
    PathBuf::from(DEFAULT_BOM_FILE)
}

fn default_installer_command() -> String {
    DEFAULT_INSTALLER_COMMAND.to_string()
}

fn default_true() -> bool {
    true
}
