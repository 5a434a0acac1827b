//! `extract-deps` command.

use crate::bundler::BundleContext;
use crate::cli::Session;
use crate::constants::MANIFEST_FILENAME;
use anyhow::Result;
use clap::Args;

/// Extract bundled dependencies from the root manifest and write the libs
/// manifest, without installing or bundling anything.
#[derive(Args)]
pub struct ExtractDepsCommand {
    /// Report extraction problems as warnings instead of failing.
    #[arg(long)]
    no_fail_on_problems: bool,

    /// Re-extract even when the libs manifest already exists.
    #[arg(long)]
    force: bool,
}

impl ExtractDepsCommand {
    pub fn execute(self, session: &Session) -> Result<()> {
        let context = BundleContext::new(session.root(), session.config(), session.runner());
        let libs_manifest = context.libs_dir().join(MANIFEST_FILENAME);

        if self.force && libs_manifest.is_file() {
            std::fs::remove_file(&libs_manifest)
                .map_err(|e| crate::core::VbundleError::io(&libs_manifest, e))?;
        }

        let fail_on_problems = session.config().autoload.fail_on_extraction_problems
            && !self.no_fail_on_problems;
        context.ensure_libs_manifest(true, fail_on_problems)?;

        session.runner().note(&format!(
            "Libs manifest written to {}",
            libs_manifest.display()
        ));
        Ok(())
    }
}
