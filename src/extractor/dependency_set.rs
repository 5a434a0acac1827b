//! Result of a dependency extraction run.

use crate::constants::GENERATED_NAME_VENDOR;
use crate::extractor::ExtractionProblem;
use crate::manifest::{Manifest, ManifestEditor};
use crate::package::ResolvedPackage;
use anyhow::Result;
use std::path::Path;

/// Immutable outcome of one extraction: the packages the libs manifest must
/// require, the names it must declare as provided, and the problems hit on
/// the way.
#[derive(Debug, Clone, Default)]
pub struct DependencySet {
    required: Vec<ResolvedPackage>,
    excluded: Vec<String>,
    problems: Vec<ExtractionProblem>,
}

impl DependencySet {
    pub(crate) fn new(
        required: Vec<ResolvedPackage>,
        excluded: Vec<String>,
        problems: Vec<ExtractionProblem>,
    ) -> Self {
        Self {
            required,
            excluded,
            problems,
        }
    }

    /// Requirement links (name to pretty version), sorted by name.
    #[must_use]
    pub fn requirements(&self) -> Vec<(String, String)> {
        let mut links: Vec<(String, String)> = self
            .required
            .iter()
            .map(|p| (p.name.clone(), p.pretty_version.clone()))
            .collect();
        links.sort();
        links
    }

    /// Provide links (name to `"*"`), sorted by name.
    #[must_use]
    pub fn exclusions(&self) -> Vec<(String, String)> {
        let mut links: Vec<(String, String)> = self
            .excluded
            .iter()
            .map(|name| (name.clone(), "*".to_string()))
            .collect();
        links.sort();
        links
    }

    /// Human-readable problem lines, in the order they were recorded.
    #[must_use]
    pub fn problems(&self) -> Vec<String> {
        self.problems.iter().map(ToString::to_string).collect()
    }

    /// Whether any problem was recorded.
    #[must_use]
    pub fn has_problems(&self) -> bool {
        !self.problems.is_empty()
    }

    /// Write this set into the libs manifest at `path`.
    ///
    /// A missing file is initialized as an empty-but-valid manifest shell:
    /// its declared name derives from the origin manifest (`<name>-libs` for
    /// a namespaced origin name, a generated `vbundle/<uuid>-libs` name
    /// otherwise), plugins are disallowed and lock state disabled. The
    /// requirement and provide links are then written, and any non-default
    /// repositories of the origin are copied over so path packages stay
    /// resolvable from inside the libs directory. Unrelated content of an
    /// existing file is preserved.
    ///
    /// # Errors
    ///
    /// [`crate::core::VbundleError::ManifestInvalid`] when an existing file
    /// cannot be parsed; I/O errors from writing the result.
    pub fn dump_to_file(&self, path: &Path, origin: Option<&Manifest>) -> Result<()> {
        let initialize = !path.is_file();
        let mut editor = ManifestEditor::open(path)?;

        if initialize {
            editor.set_name(&generated_name(origin));
            editor.set_config_setting("allow-plugins", false);
            editor.set_config_setting("lock", false);
        }

        for (name, version) in self.requirements() {
            editor.add_require(&name, &version);
        }
        for (name, constraint) in self.exclusions() {
            editor.add_provide(&name, &constraint);
        }

        if let Some(origin) = origin {
            for repository in &origin.repositories {
                if !repository.is_default_registry() {
                    editor.add_repository(repository);
                }
            }
        }

        editor.save()
    }
}

/// Derive the declared name of a generated libs manifest.
fn generated_name(origin: Option<&Manifest>) -> String {
    origin
        .and_then(|m| m.package.name.as_deref())
        .filter(|name| name.contains('/'))
        .map_or_else(
            || format!("{GENERATED_NAME_VENDOR}/{}-libs", uuid::Uuid::new_v4()),
            |name| format!("{name}-libs"),
        )
}
