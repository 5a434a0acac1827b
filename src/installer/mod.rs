//! External installer invocation.
//!
//! Installing the libs sub-project is delegated to the host ecosystem's
//! installer binary (`pkgr` by default, configurable under `[installer]` in
//! `vbundle.toml`). The bundler only cares about three things: the binary
//! exists, the install exits zero, and a lock state is present afterwards.

use crate::core::VbundleError;
use crate::lockfile::Lockfile;
use crate::utils::workdir::in_dir;
use anyhow::Result;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Handle to the configured installer binary.
#[derive(Debug, Clone)]
pub struct Installer {
    command: String,
}

impl Installer {
    /// Look up the installer binary in `PATH`.
    ///
    /// # Errors
    ///
    /// [`VbundleError::InstallerNotFound`] when the command cannot be found.
    pub fn locate(command: &str) -> Result<Self> {
        which::which(command).map_err(|_| VbundleError::InstallerNotFound {
            command: command.to_string(),
        })?;
        Ok(Self {
            command: command.to_string(),
        })
    }

    /// The configured command name.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Best-effort installer version, the first line of `<cmd> --version`.
    #[must_use]
    pub fn version(&self) -> Option<String> {
        let output = Command::new(&self.command).arg("--version").output().ok()?;
        if !output.status.success() {
            return None;
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        stdout.lines().next().map(|line| line.trim().to_string())
    }

    /// Run `<cmd> install [--no-dev]` inside `project_dir` and load the
    /// resulting lock state.
    ///
    /// Stdout and stderr are captured rather than streamed; on failure they
    /// travel with the error for diagnostics.
    ///
    /// # Errors
    ///
    /// [`VbundleError::InstallFailed`] when the installer exits non-zero,
    /// [`VbundleError::DependenciesNotInstalled`] when it succeeds without
    /// writing a lockfile.
    pub fn install(&self, project_dir: &Path, include_dev: bool) -> Result<Lockfile> {
        debug!(
            command = %self.command,
            dir = %project_dir.display(),
            include_dev,
            "running external install"
        );

        let output = in_dir(project_dir, || {
            let mut command = Command::new(&self.command);
            command.arg("install");
            if !include_dev {
                command.arg("--no-dev");
            }
            command
                .output()
                .map_err(|e| VbundleError::io(project_dir, e).into())
        })?;

        if !output.status.success() {
            let mut captured = String::from_utf8_lossy(&output.stdout).into_owned();
            captured.push_str(&String::from_utf8_lossy(&output.stderr));
            return Err(VbundleError::InstallFailed {
                path: project_dir.display().to_string(),
                output: captured,
            }
            .into());
        }

        Lockfile::load_from_dir(project_dir)
    }
}
