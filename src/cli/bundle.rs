//! `bundle`, `bundle-autoload`, and `bundle-deps` commands.

use crate::bundler::{
    AutoloadBundler, AutoloadOptions, BundleContext, DependencyBundler, DependencyOptions,
};
use crate::cli::Session;
use crate::config::VbundleConfig;
use anyhow::Result;
use clap::Args;

/// Run the autoload workflow followed by the dependency workflow.
#[derive(Args)]
pub struct BundleCommand {
    /// Fail instead of extracting when the libs manifest is missing.
    #[arg(long)]
    no_extract: bool,

    /// Replace existing target files.
    #[arg(long)]
    overwrite: bool,
}

impl BundleCommand {
    pub fn execute(self, session: &Session) -> Result<()> {
        let autoload = BundleAutoloadCommand {
            no_extract: self.no_extract,
            overwrite: self.overwrite,
        };
        autoload.execute(session)?;

        let deps = BundleDepsCommand {
            no_extract: self.no_extract,
            overwrite: self.overwrite,
            include_dev: false,
        };
        deps.execute(session)
    }
}

/// Merge root and vendor autoload metadata into the configured target.
#[derive(Args)]
pub struct BundleAutoloadCommand {
    /// Fail instead of extracting when the libs manifest is missing.
    #[arg(long)]
    no_extract: bool,

    /// Replace an existing target file.
    #[arg(long)]
    overwrite: bool,
}

impl BundleAutoloadCommand {
    pub fn execute(self, session: &Session) -> Result<()> {
        let config = apply_overrides(session.config(), self.overwrite);
        let context = BundleContext::new(session.root(), &config, session.runner());

        let target = AutoloadBundler::new(&context).bundle(&AutoloadOptions {
            extract: !self.no_extract,
        })?;

        session
            .runner()
            .note(&format!("Autoload metadata written to {}", target.display()));
        Ok(())
    }
}

/// Generate a CycloneDX BOM from the libs project's lock state.
#[derive(Args)]
pub struct BundleDepsCommand {
    /// Fail instead of extracting when the libs manifest is missing.
    #[arg(long)]
    no_extract: bool,

    /// Replace an existing BOM file.
    #[arg(long)]
    overwrite: bool,

    /// Include dev packages of the libs lock state.
    #[arg(long)]
    include_dev: bool,
}

impl BundleDepsCommand {
    pub fn execute(self, session: &Session) -> Result<()> {
        let mut config = apply_overrides(session.config(), self.overwrite);
        config.dependencies.include_dev |= self.include_dev;
        let context = BundleContext::new(session.root(), &config, session.runner());

        let bom_file = DependencyBundler::new(&context).bundle(&DependencyOptions {
            extract: !self.no_extract,
        })?;

        session
            .runner()
            .note(&format!("BOM written to {}", bom_file.display()));
        Ok(())
    }
}

/// Config copy with the `--overwrite` flag folded in.
fn apply_overrides(config: &VbundleConfig, overwrite: bool) -> VbundleConfig {
    let mut config = config.clone();
    config.autoload.overwrite |= overwrite;
    config.dependencies.overwrite |= overwrite;
    config
}
