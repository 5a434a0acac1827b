//! Command-line interface.
//!
//! Each subcommand lives in its own module with its own argument struct and
//! `execute` method; this module owns the global flags, logging setup, and
//! the shared project/config resolution all commands go through.
//!
//! # Commands
//!
//! - `bundle` - autoload bundling followed by dependency (BOM) bundling
//! - `bundle-autoload` - merge root and vendor autoload metadata
//! - `bundle-deps` - generate a CycloneDX BOM from the libs lock state
//! - `extract-deps` - extract dependencies and write the libs manifest only
//! - `validate-config` - load and validate `vbundle.toml`
//!
//! # Global options
//!
//! - `--verbose` / `--quiet` - output level (mutually exclusive)
//! - `--no-progress` - plain lines instead of spinners
//! - `--config <path>` - explicit `vbundle.toml` location
//! - `--root <path>` - project root (defaults to the current directory)

mod bundle;
mod extract;
mod validate;

use crate::config::VbundleConfig;
use crate::core::VbundleError;
use crate::output::TaskRunner;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Top-level CLI definition.
#[derive(Parser)]
#[command(
    name = "vbundle",
    about = "Bundle vendor libraries, autoload metadata, and BOMs for distributable packages",
    version,
    author
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable spinners and animated output.
    #[arg(long, global = true)]
    no_progress: bool,

    /// Path to the bundler configuration file (vbundle.toml).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Project root directory. Defaults to the current directory.
    #[arg(long, global = true)]
    root: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Bundle autoload metadata, then dependencies.
    Bundle(bundle::BundleCommand),

    /// Merge the root project's and the vendor libraries' autoload
    /// metadata into the configured target file.
    BundleAutoload(bundle::BundleAutoloadCommand),

    /// Generate a CycloneDX BOM from the libs project's lock state.
    BundleDeps(bundle::BundleDepsCommand),

    /// Extract bundled dependencies and write the libs manifest.
    ExtractDeps(extract::ExtractDepsCommand),

    /// Load and validate the bundler configuration.
    ValidateConfig(validate::ValidateConfigCommand),
}

impl Cli {
    /// Execute the parsed command.
    pub fn execute(self) -> Result<()> {
        self.init_logging();

        let session = Session::resolve(
            self.root.as_deref(),
            self.config.as_deref(),
            !self.no_progress,
            self.quiet,
        )?;

        match self.command {
            Commands::Bundle(cmd) => cmd.execute(&session),
            Commands::BundleAutoload(cmd) => cmd.execute(&session),
            Commands::BundleDeps(cmd) => cmd.execute(&session),
            Commands::ExtractDeps(cmd) => cmd.execute(&session),
            Commands::ValidateConfig(cmd) => cmd.execute(&session),
        }
    }

    fn init_logging(&self) {
        let filter = if self.verbose {
            EnvFilter::new("vbundle=debug")
        } else if self.quiet {
            EnvFilter::new("error")
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }
}

/// Everything a command needs to run: the resolved project root, the parsed
/// configuration, and the task runner.
pub struct Session {
    root: PathBuf,
    config: VbundleConfig,
    runner: TaskRunner,
}

impl Session {
    fn resolve(
        root: Option<&Path>,
        config_path: Option<&Path>,
        progress: bool,
        quiet: bool,
    ) -> Result<Self> {
        let cwd = std::env::current_dir().map_err(|_| VbundleError::WorkingDirUnavailable)?;
        let base = root.map_or_else(
            || cwd.clone(),
            |r| crate::utils::paths::make_absolute(r, &cwd),
        );

        let config = match config_path {
            Some(path) => VbundleConfig::read(path)?,
            None => VbundleConfig::read_from_dir(&base)?,
        };
        let project_root = config.resolve_root(&base);

        Ok(Self {
            root: project_root,
            config,
            runner: TaskRunner::new(progress, quiet),
        })
    }

    /// Resolved absolute project root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Parsed bundler configuration.
    #[must_use]
    pub fn config(&self) -> &VbundleConfig {
        &self.config
    }

    /// The session's task runner.
    #[must_use]
    pub fn runner(&self) -> &TaskRunner {
        &self.runner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_parse_with_every_subcommand() {
        for subcommand in [
            "bundle",
            "bundle-autoload",
            "bundle-deps",
            "extract-deps",
            "validate-config",
        ] {
            Cli::try_parse_from(["vbundle", subcommand, "--no-progress", "--quiet"]).unwrap();
        }
    }

    #[test]
    fn test_verbose_and_quiet_are_mutually_exclusive() {
        assert!(Cli::try_parse_from(["vbundle", "bundle", "-v", "-q"]).is_err());
    }
}
