//! `validate-config` command.

use crate::cli::Session;
use anyhow::Result;
use clap::Args;
use colored::Colorize;

/// Load and validate `vbundle.toml`, reporting the effective settings.
///
/// The heavy lifting already happened when the session resolved its
/// configuration; reaching this point means the file parsed and validated.
#[derive(Args)]
pub struct ValidateConfigCommand {}

impl ValidateConfigCommand {
    #[allow(clippy::unused_self)]
    pub fn execute(self, session: &Session) -> Result<()> {
        let config = session.config();
        let runner = session.runner();

        runner.note(&format!("{} configuration is valid", "✓".green()));
        runner.note(&format!("  root: {}", session.root().display()));
        runner.note(&format!("  libs path: {}", config.libs_path().display()));
        runner.note(&format!("  installer: {}", config.installer.command));
        runner.note(&format!(
            "  autoload target: {}",
            config.autoload.target_file.display()
        ));
        runner.note(&format!(
            "  bom file: {} (spec {})",
            config.dependencies.bom_file.display(),
            config.spec_version()?
        ));
        Ok(())
    }
}
