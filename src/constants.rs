//! Well-known filenames and other global constants.
//!
//! Everything the bundler assumes about the host package ecosystem on disk
//! lives here: manifest and lockfile names, the vendor directory layout, and
//! the package names used for BOM tool provenance. Defining them centrally
//! keeps the rest of the codebase free of magic strings.

/// Project manifest filename (`package.toml`).
pub const MANIFEST_FILENAME: &str = "package.toml";

/// Lockfile filename written by the external installer (`package.lock`).
pub const LOCKFILE_FILENAME: &str = "package.lock";

/// Aggregated autoload metadata the installer generates inside the vendor
/// directory after a successful install.
pub const VENDOR_AUTOLOAD_FILE: &str = "vendor/autoload.toml";

/// Bundler configuration filename, looked up in the project root.
pub const CONFIG_FILENAME: &str = "vbundle.toml";

/// Default directory (relative to the project root) for the extracted
/// vendor-libraries sub-project.
pub const DEFAULT_LIBS_DIR: &str = "libs";

/// Default BOM output filename, relative to the libs directory.
pub const DEFAULT_BOM_FILE: &str = "sbom.json";

/// Default external installer command.
pub const DEFAULT_INSTALLER_COMMAND: &str = "pkgr";

/// Name of the default public registry. Repository entries pointing here are
/// never copied into generated libs manifests.
pub const DEFAULT_REGISTRY: &str = "registry.pkgr.dev";

/// Vendor prefix used when generating a unique name for a libs manifest
/// whose origin project has no namespaced name.
pub const GENERATED_NAME_VENDOR: &str = "vbundle";

/// Package-url type emitted for BOM components.
pub const PURL_TYPE: &str = "pkgr";

/// Packages reported as BOM tool provenance when present in the package
/// universe. Missing entries are silently skipped.
pub const TOOL_PACKAGES: [&str; 2] = ["vbundle/bom-core", "vbundle/bundler"];

/// Dotted path below `[extra]` where the libs directory is recorded in the
/// root manifest.
pub const EXTRA_LIBS_PATH: &str = "vbundle.libs-path";
