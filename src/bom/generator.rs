//! BOM generation from a libs project's lock state.

use crate::bom::{Bom, Component, DependencyEntry, Metadata, SpecVersion, Tool};
use crate::constants::TOOL_PACKAGES;
use crate::core::VbundleError;
use crate::lockfile::Lockfile;
use crate::package::{ResolvedPackage, split_name};
use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Knobs for one BOM generation run.
#[derive(Debug, Clone, Default)]
pub struct BomOptions {
    /// Include dev packages of the lock state.
    pub include_dev: bool,
    /// Name of the external installer, reported as tool provenance.
    pub installer: Option<String>,
    /// Installer version, when it could be determined.
    pub installer_version: Option<String>,
}

/// Generates a [`Bom`] for the packages locked in a libs sub-project.
pub struct BomGenerator {
    spec_version: SpecVersion,
}

impl BomGenerator {
    /// Create a generator for the given spec version.
    #[must_use]
    pub const fn new(spec_version: SpecVersion) -> Self {
        Self { spec_version }
    }

    /// Generate a document for the project rooted at `libs_dir`.
    ///
    /// The lock state is the source of truth: one component per locked
    /// package, with `root` as the document's subject. Requirement links
    /// that resolve to a locked package become dependency-graph edges;
    /// links to anything outside the lock state (platform requirements,
    /// provided packages) are dropped.
    ///
    /// # Errors
    ///
    /// [`VbundleError::DependenciesNotInstalled`] when `libs_dir` has no
    /// lock state.
    pub fn generate(
        &self,
        root: &ResolvedPackage,
        libs_dir: &Path,
        options: &BomOptions,
    ) -> Result<Bom> {
        if !Lockfile::exists(libs_dir) {
            return Err(VbundleError::DependenciesNotInstalled.into());
        }
        let lockfile = Lockfile::load_from_dir(libs_dir)?;
        let packages = lockfile.locked_packages(options.include_dev);

        debug!(
            packages = packages.len(),
            spec_version = %self.spec_version,
            "generating BOM"
        );

        let dependencies = dependency_entries(root, &packages);
        let components = packages.iter().map(|p| Component::from_package(p)).collect();

        let metadata = Metadata {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            tools: tools(&lockfile, options),
            component: Component::root(root),
        };

        Ok(Bom::new(self.spec_version, metadata, components, dependencies))
    }
}

/// Dependency adjacency lists over the locked package set.
fn dependency_entries(
    root: &ResolvedPackage,
    packages: &[&ResolvedPackage],
) -> Vec<DependencyEntry> {
    let mut graph: DiGraph<String, ()> = DiGraph::new();
    let mut nodes: HashMap<&str, NodeIndex> = HashMap::new();

    let root_node = graph.add_node(bom_ref(root));
    nodes.insert(root.name.as_str(), root_node);
    for package in packages {
        let node = graph.add_node(bom_ref(package));
        nodes.insert(package.name.as_str(), node);
    }

    for requirement in &root.requires {
        if let Some(&target) = nodes.get(requirement.name.as_str()) {
            graph.add_edge(root_node, target, ());
        }
    }
    for package in packages {
        let Some(&source) = nodes.get(package.name.as_str()) else {
            continue;
        };
        for requirement in &package.requires {
            if let Some(&target) = nodes.get(requirement.name.as_str()) {
                if source != target {
                    graph.add_edge(source, target, ());
                }
            }
        }
    }

    graph
        .node_indices()
        .map(|node| {
            let mut depends_on: Vec<String> = graph
                .neighbors(node)
                .map(|neighbor| graph[neighbor].clone())
                .collect();
            depends_on.sort();
            depends_on.dedup();
            DependencyEntry {
                reference: graph[node].clone(),
                depends_on,
            }
        })
        .collect()
}

/// Tool provenance: the external installer plus this tool's own library
/// packages when present in the lock state.
fn tools(lockfile: &Lockfile, options: &BomOptions) -> Vec<Tool> {
    let mut tools = Vec::new();
    if let Some(installer) = &options.installer {
        tools.push(Tool {
            vendor: None,
            name: installer.clone(),
            version: options.installer_version.clone(),
        });
    }
    for tool_package in TOOL_PACKAGES {
        if let Some(package) = lockfile.find(tool_package) {
            let (vendor, name) = split_name(&package.name);
            tools.push(Tool {
                vendor: vendor.map(ToString::to_string),
                name: name.to_string(),
                version: Some(package.pretty_version.clone()),
            });
        }
    }
    tools
}

fn bom_ref(package: &ResolvedPackage) -> String {
    crate::bom::purl(&package.name, &package.pretty_version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bom::{BomFormat, validate_json};
    use crate::lockfile::LockedPackage;
    use crate::package::Requirement;
    use semver::Version;
    use tempfile::TempDir;

    fn locked(name: &str, version: &str, requires: &[(&str, &str)]) -> LockedPackage {
        let mut package = ResolvedPackage::new(name, Version::parse(version).unwrap());
        package.requires = requires
            .iter()
            .map(|(name, constraint)| Requirement {
                name: (*name).to_string(),
                constraint: (*constraint).to_string(),
            })
            .collect();
        LockedPackage {
            package,
            dev: false,
        }
    }

    fn libs_dir_with_lockfile(packages: Vec<LockedPackage>) -> TempDir {
        let tmp = TempDir::new().unwrap();
        let lockfile = Lockfile {
            packages,
            ..Lockfile::default()
        };
        lockfile.save(&tmp.path().join("package.lock")).unwrap();
        tmp
    }

    fn root() -> ResolvedPackage {
        let mut root = ResolvedPackage::new("acme/widgets-libs", Version::new(1, 0, 0));
        root.requires = vec![Requirement {
            name: "acme/http".to_string(),
            constraint: "^2.0".to_string(),
        }];
        root
    }

    #[test]
    fn test_missing_lock_state_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let err = BomGenerator::new(SpecVersion::V1_6)
            .generate(&root(), tmp.path(), &BomOptions::default())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<VbundleError>(),
            Some(VbundleError::DependenciesNotInstalled)
        ));
    }

    #[test]
    fn test_generates_component_per_locked_package() {
        let tmp = libs_dir_with_lockfile(vec![
            locked("acme/http", "2.4.0", &[("acme/logging", "^1.0"), ("rt", ">=1.0")]),
            locked("acme/logging", "1.2.0", &[]),
        ]);

        let bom = BomGenerator::new(SpecVersion::V1_6)
            .generate(&root(), tmp.path(), &BomOptions::default())
            .unwrap();
        assert_eq!(bom.components().len(), 2);

        let serialized = bom.serialize(BomFormat::Json).unwrap();
        validate_json(&serialized, SpecVersion::V1_6).unwrap();

        // Edges only exist between locked packages; the platform
        // requirement is dropped.
        assert!(serialized.contains("pkg:pkgr/acme/http@2.4.0"));
        assert!(serialized.contains("pkg:pkgr/acme/logging@1.2.0"));
        assert!(!serialized.contains("pkg:pkgr/rt"));
    }

    #[test]
    fn test_tool_provenance_includes_installer_and_tool_packages() {
        let tmp = libs_dir_with_lockfile(vec![locked("vbundle/bom-core", "0.3.0", &[])]);

        let options = BomOptions {
            include_dev: false,
            installer: Some("pkgr".to_string()),
            installer_version: Some("3.1.0".to_string()),
        };
        let bom = BomGenerator::new(SpecVersion::V1_6)
            .generate(&root(), tmp.path(), &options)
            .unwrap();

        let serialized = bom.serialize(BomFormat::Json).unwrap();
        assert!(serialized.contains("\"name\": \"pkgr\""));
        assert!(serialized.contains("\"name\": \"bom-core\""));
    }
}
