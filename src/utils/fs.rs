//! File system helpers.
//!
//! Writes go through a temporary file in the target directory followed by an
//! atomic rename, so a crashed run never leaves a half-written manifest or
//! BOM behind.

use crate::core::VbundleError;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tempfile::NamedTempFile;

/// Ensure a directory exists, creating it and all parents if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if path.exists() {
        if !path.is_dir() {
            return Err(VbundleError::Other {
                message: format!("Path exists but is not a directory: {}", path.display()),
            }
            .into());
        }
        return Ok(());
    }

    fs::create_dir_all(path)
        .map_err(|e| VbundleError::io(path, e))
        .with_context(|| format!("Failed to create directory {}", path.display()))
}

/// Atomically write `content` to `path`.
pub fn safe_write(path: &Path, content: &str) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    ensure_dir(dir)?;

    let tmp = NamedTempFile::new_in(dir).map_err(|e| VbundleError::io(dir, e))?;
    fs::write(tmp.path(), content).map_err(|e| VbundleError::io(tmp.path(), e))?;
    tmp.persist(path)
        .map_err(|e| VbundleError::io(path, e.error))
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(())
}

/// Copy `path` to `<path>.bak`, replacing any previous backup.
pub fn backup_file(path: &Path) -> Result<()> {
    let mut backup = path.as_os_str().to_owned();
    backup.push(".bak");
    fs::copy(path, &backup)
        .map_err(|e| VbundleError::io(path, e))
        .with_context(|| format!("Failed to back up {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_safe_write_creates_parent_dirs() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("nested/dir/file.toml");
        safe_write(&target, "x = 1\n").unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "x = 1\n");
    }

    #[test]
    fn test_safe_write_replaces_existing_content() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("file.toml");
        safe_write(&target, "a = 1\n").unwrap();
        safe_write(&target, "b = 2\n").unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "b = 2\n");
    }

    #[test]
    fn test_backup_file() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("package.toml");
        fs::write(&target, "original").unwrap();
        backup_file(&target).unwrap();
        assert_eq!(
            fs::read_to_string(tmp.path().join("package.toml.bak")).unwrap(),
            "original"
        );
    }
}
