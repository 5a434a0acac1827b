//! Cross-platform utilities: path normalization, file operations, and
//! scoped working-directory execution.

pub mod fs;
pub mod paths;
pub mod workdir;

pub use paths::{make_absolute, make_relative, normalize_path};
pub use workdir::in_dir;
