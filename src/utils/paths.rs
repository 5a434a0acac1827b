//! Path normalization primitives.
//!
//! Every path-aware artifact in the bundler stores entries in a normalized
//! absolute form so that path-identity comparisons are exact regardless of
//! how a path was originally spelled (`foo.rs`, `./foo.rs`, `bar/../foo.rs`
//! and the absolute form all compare equal once normalized against the same
//! base directory).
//!
//! Normalization is purely lexical: `.` components are dropped and `..`
//! components fold their parent. No filesystem access takes place, so
//! normalization also works for paths that do not (yet) exist.

use std::path::{Component, Path, PathBuf};

/// Lexically normalize a path.
///
/// Removes `.` components and resolves `..` components against their parent
/// where possible. Leading `..` components of a relative path are kept, since
/// there is nothing to fold them into.
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(
                    normalized.components().next_back(),
                    Some(Component::Normal(_))
                );
                if popped {
                    normalized.pop();
                } else if !matches!(
                    normalized.components().next_back(),
                    Some(Component::RootDir | Component::Prefix(_))
                ) {
                    // Keep leading `..` of relative paths.
                    normalized.push(Component::ParentDir);
                }
            }
            other => normalized.push(other),
        }
    }

    normalized
}

/// Convert a path to its normalized absolute form, rooted at `base`.
///
/// Absolute inputs are normalized as-is; relative inputs are joined onto
/// `base` first. `base` is expected to be absolute.
#[must_use]
pub fn make_absolute(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize_path(path)
    } else {
        normalize_path(&base.join(path))
    }
}

/// Convert a path to a form relative to `base`.
///
/// Both paths are normalized first; relative inputs are interpreted against
/// `base`. When the path does not live below `base`, the result climbs out
/// with `..` components.
#[must_use]
pub fn make_relative(path: &Path, base: &Path) -> PathBuf {
    let path = make_absolute(path, base);
    let base = normalize_path(base);

    let mut path_components = path.components();
    let mut base_components = base.components();
    let mut relative = PathBuf::new();

    loop {
        match (path_components.clone().next(), base_components.clone().next()) {
            (Some(p), Some(b)) if p == b => {
                path_components.next();
                base_components.next();
            }
            (_, Some(Component::RootDir | Component::Prefix(_))) => {
                // Diverging prefixes cannot be expressed relatively.
                return path;
            }
            (_, Some(_)) => {
                relative.push(Component::ParentDir);
                base_components.next();
            }
            (Some(_), None) | (None, None) => break,
        }
    }

    relative.extend(path_components);
    relative
}
