//! vbundle - vendor library bundler for distributable packages.
//!
//! Some deployment targets install a package as one self-contained artifact
//! and run it without a package installer present at runtime. `vbundle`
//! prepares such packages: it extracts the third-party dependencies of a
//! project into a dedicated libs sub-project, merges the project's and the
//! installed libraries' autoload metadata into a single target manifest, and
//! generates a CycloneDX bill of materials for the bundled dependency set.
//!
//! # Architecture
//!
//! - [`extractor`] - the dependency extraction core: classifies direct
//!   requirements, prunes packages a framework package already provides,
//!   version-optimizes the rest, and computes the excluded overlap
//! - [`resolver`] - the package universe the extractor resolves against
//! - [`autoload`] - path-aware autoload artifacts and their merge model
//! - [`bundler`] - the two user-facing workflows (autoload, BOM)
//! - [`bom`] - the CycloneDX model, generator, and formats
//! - [`manifest`], [`lockfile`], [`config`] - on-disk formats
//! - [`installer`] - invocation of the external package installer
//! - [`cli`], [`output`] - command layer and progress reporting
//!
//! # Example
//!
//! ```no_run
//! use vbundle::bundler::{AutoloadBundler, AutoloadOptions, BundleContext};
//! use vbundle::config::VbundleConfig;
//! use vbundle::output::TaskRunner;
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let root = Path::new("/path/to/project");
//! let config = VbundleConfig::read_from_dir(root)?;
//! let runner = TaskRunner::new(false, false);
//!
//! let context = BundleContext::new(root, &config, &runner);
//! AutoloadBundler::new(&context).bundle(&AutoloadOptions::default())?;
//! # Ok(())
//! # }
//! ```

pub mod autoload;
pub mod bom;
pub mod bundler;
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod extractor;
pub mod installer;
pub mod lockfile;
pub mod manifest;
pub mod output;
pub mod package;
pub mod resolver;
pub mod utils;
pub mod version;
