//! Scoped working-directory execution.
//!
//! The external installer resolves project-relative paths against the process
//! working directory, so install runs are wrapped in [`in_dir`], which
//! switches into the project directory and guarantees restoration of the
//! prior directory on every exit path, including errors and panics.

use crate::core::VbundleError;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Restores the saved working directory when dropped.
struct CwdGuard {
    previous: PathBuf,
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        // Restoration failure is unrecoverable here; the original directory
        // may have been removed underneath us.
        let _ = std::env::set_current_dir(&self.previous);
    }
}

/// Run `f` with the process working directory set to `dir`.
///
/// The previous working directory is restored before this function returns,
/// regardless of whether `f` succeeded, failed, or panicked.
///
/// # Errors
///
/// Fails with [`VbundleError::WorkingDirUnavailable`] when the current
/// directory cannot be determined and [`VbundleError::DirectoryDoesNotExist`]
/// when `dir` is missing.
pub fn in_dir<T>(dir: &Path, f: impl FnOnce() -> Result<T>) -> Result<T> {
    let previous = std::env::current_dir().map_err(|_| VbundleError::WorkingDirUnavailable)?;

    if !dir.is_dir() {
        return Err(VbundleError::DirectoryDoesNotExist {
            path: dir.display().to_string(),
        }
        .into());
    }

    std::env::set_current_dir(dir).map_err(|e| VbundleError::io(dir, e))?;
    let _guard = CwdGuard { previous };

    f()
}
