//! Dependency extraction.
//!
//! [`DependencyExtractor`] turns a project's declared requirements into a
//! [`DependencySet`]: the version-optimized packages the bundled libs
//! sub-project must require itself, the transitively needed packages a
//! framework package already guarantees (exported as provided instead), and
//! the problems encountered along the way. Problems are collected, never
//! thrown; callers decide whether they are fatal.

pub mod dependency_set;

pub use dependency_set::DependencySet;

use crate::package::{ResolvedPackage, is_platform_package};
use crate::resolver::Resolver;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use tracing::debug;

/// A non-fatal condition hit while extracting dependencies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionProblem {
    /// A declared requirement did not resolve to any known package.
    RequirementNotResolvable {
        /// Requirement name as declared in the manifest.
        name: String,
    },
    /// No candidate version satisfied the declared constraint.
    NoMatchingVersionFound {
        /// Requirement name as declared in the manifest.
        name: String,
        /// The constraint that matched nothing.
        constraint: String,
    },
}

impl ExtractionProblem {
    /// Name of the package the problem concerns.
    #[must_use]
    pub fn package(&self) -> &str {
        match self {
            Self::RequirementNotResolvable { name }
            | Self::NoMatchingVersionFound { name, .. } => name,
        }
    }
}

impl fmt::Display for ExtractionProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RequirementNotResolvable { name } => {
                write!(f, "requirement \"{name}\" could not be resolved to a package")
            }
            Self::NoMatchingVersionFound { name, constraint } => {
                write!(f, "no version of \"{name}\" matches the constraint \"{constraint}\"")
            }
        }
    }
}

/// Extracts bundled third-party dependencies from a requirement list.
pub struct DependencyExtractor<'a, R: Resolver + ?Sized> {
    resolver: &'a R,
}

impl<'a, R: Resolver + ?Sized> DependencyExtractor<'a, R> {
    /// Create an extractor over the given resolver.
    pub fn new(resolver: &'a R) -> Self {
        Self { resolver }
    }

    /// Extract a dependency set from `requirements` (name to constraint).
    ///
    /// Platform requirements (runtime and capability flags) are skipped.
    /// Requirements resolving to an extension package are silently dropped;
    /// framework packages contribute their transitive requirements as the
    /// provided pool instead of entering the required pool. Any problems are
    /// recorded on the returned set rather than returned as errors.
    #[must_use]
    pub fn extract(&self, requirements: &BTreeMap<String, String>) -> DependencySet {
        let mut problems = Vec::new();
        let mut problem_names = HashSet::new();
        let mut record = |problem: ExtractionProblem| {
            if problem_names.insert(problem.package().to_string()) {
                problems.push(problem);
            }
        };

        // Classify direct requirements against the loaded universe.
        let mut frameworks: Vec<&ResolvedPackage> = Vec::new();
        let mut working: Vec<(&ResolvedPackage, &str)> = Vec::new();
        for (name, constraint) in requirements {
            if is_platform_package(name) {
                continue;
            }
            let Some(package) = self.resolver.find_package(name, constraint) else {
                record(ExtractionProblem::RequirementNotResolvable { name: name.clone() });
                continue;
            };
            if package.kind.is_framework() {
                frameworks.push(package);
            } else if package.kind.is_extension() {
                debug!(package = %package.name, "skipping extension package");
            } else {
                working.push((package, constraint));
            }
        }

        // Everything reachable from a framework package is already present
        // at runtime and must not be required again.
        let mut provided = BTreeSet::new();
        for framework in &frameworks {
            self.requirement_closure(framework, &mut provided);
        }
        working.retain(|(package, _)| !provided.contains(&package.name));

        // Re-resolve the survivors against the full candidate universe so
        // the exported constraints pin the best available version.
        let mut required = Vec::new();
        for (package, constraint) in working {
            match self.resolver.find_best_candidate(&package.name, constraint) {
                Some(best) => required.push(best.clone()),
                None => record(ExtractionProblem::NoMatchingVersionFound {
                    name: package.name.clone(),
                    constraint: constraint.to_string(),
                }),
            }
        }

        // The required closure is seeded with the packages themselves; its
        // overlap with the provided pool becomes the exclusion list.
        let mut closure = BTreeSet::new();
        for package in &required {
            closure.insert(package.name.clone());
            self.requirement_closure(package, &mut closure);
        }
        let excluded: Vec<String> = closure.intersection(&provided).cloned().collect();

        debug!(
            required = required.len(),
            excluded = excluded.len(),
            problems = problems.len(),
            "dependency extraction finished"
        );

        DependencySet::new(required, excluded, problems)
    }

    /// Walk `package`'s requirements transitively into `acc`.
    ///
    /// Names already in the accumulator are not descended into again, which
    /// bounds the walk to one visit per distinct package and terminates on
    /// dependency cycles. Unresolvable or platform requirements are skipped.
    fn requirement_closure(&self, package: &ResolvedPackage, acc: &mut BTreeSet<String>) {
        for requirement in &package.requires {
            if is_platform_package(&requirement.name) || acc.contains(&requirement.name) {
                continue;
            }
            let Some(dependency) = self
                .resolver
                .find_package(&requirement.name, &requirement.constraint)
            else {
                continue;
            };
            acc.insert(dependency.name.clone());
            self.requirement_closure(dependency, acc);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::{PackageKind, Requirement};
    use crate::resolver::PackageRepository;
    use semver::Version;

    fn package(name: &str, version: &str, requires: &[(&str, &str)]) -> ResolvedPackage {
        let mut package = ResolvedPackage::new(name, Version::parse(version).unwrap());
        package.requires = requires
            .iter()
            .map(|(name, constraint)| Requirement {
                name: (*name).to_string(),
                constraint: (*constraint).to_string(),
            })
            .collect();
        package
    }

    fn framework(name: &str, version: &str, requires: &[(&str, &str)]) -> ResolvedPackage {
        let mut package = package(name, version, requires);
        package.kind = PackageKind::Framework;
        package
    }

    fn requirements(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(n, c)| ((*n).to_string(), (*c).to_string()))
            .collect()
    }

    #[test]
    fn test_platform_requirements_are_skipped() {
        let repo = PackageRepository::new();
        let set = DependencyExtractor::new(&repo)
            .extract(&requirements(&[("rt", ">=1.85"), ("ext-json", "*")]));
        assert!(set.requirements().is_empty());
        assert!(set.problems().is_empty());
    }

    #[test]
    fn test_unresolvable_requirement_records_problem() {
        let repo = PackageRepository::new();
        let set = DependencyExtractor::new(&repo).extract(&requirements(&[("acme/gone", "^1.0")]));
        assert_eq!(
            set.problems(),
            vec!["requirement \"acme/gone\" could not be resolved to a package".to_string()]
        );
        assert!(set.requirements().is_empty());
    }

    #[test]
    fn test_framework_provided_packages_are_pruned() {
        let mut repo = PackageRepository::new();
        repo.register(framework("core/base", "12.0.0", &[("acme/logging", "^1.0")]));
        repo.register(package("acme/logging", "1.2.0", &[]));
        repo.register(package("acme/http", "2.0.0", &[]));

        let set = DependencyExtractor::new(&repo).extract(&requirements(&[
            ("core/base", "^12.0"),
            ("acme/logging", "^1.0"),
            ("acme/http", "^2.0"),
        ]));

        // The framework itself never enters the required pool, and neither
        // does anything it already provides.
        let names: Vec<String> = set.requirements().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["acme/http"]);
    }

    #[test]
    fn test_extension_packages_are_dropped() {
        let mut repo = PackageRepository::new();
        let mut ext = package("acme/widget-ext", "1.0.0", &[]);
        ext.kind = PackageKind::Extension;
        repo.register(ext);
        repo.register(package("acme/http", "2.0.0", &[]));

        let set = DependencyExtractor::new(&repo).extract(&requirements(&[
            ("acme/widget-ext", "^1.0"),
            ("acme/http", "^2.0"),
        ]));

        let names: Vec<String> = set.requirements().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["acme/http"]);
        assert!(set.problems().is_empty());
    }

    #[test]
    fn test_best_candidate_version_is_exported() {
        let mut repo = PackageRepository::new();
        repo.register(package("acme/http", "2.0.0", &[]));
        repo.register(package("acme/http", "2.4.0", &[]));

        let set = DependencyExtractor::new(&repo).extract(&requirements(&[("acme/http", "^2.0")]));
        assert_eq!(
            set.requirements(),
            vec![("acme/http".to_string(), "2.4.0".to_string())]
        );
    }

    #[test]
    fn test_transitive_overlap_becomes_exclusion() {
        let mut repo = PackageRepository::new();
        repo.register(framework("core/base", "12.0.0", &[("acme/logging", "^1.0")]));
        repo.register(package("acme/logging", "1.2.0", &[]));
        repo.register(package("acme/http", "2.0.0", &[("acme/logging", "^1.0")]));

        let set = DependencyExtractor::new(&repo).extract(&requirements(&[
            ("core/base", "^12.0"),
            ("acme/http", "^2.0"),
        ]));

        assert_eq!(
            set.exclusions(),
            vec![("acme/logging".to_string(), "*".to_string())]
        );
        // acme/http stays required even though its transitive dependency is
        // excluded.
        let names: Vec<String> = set.requirements().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["acme/http"]);
    }

    #[test]
    fn test_pruned_direct_requirement_reappears_as_excluded() {
        let mut repo = PackageRepository::new();
        repo.register(framework("core/base", "12.0.0", &[("shared/x", "^1.0")]));
        repo.register(package("shared/x", "1.3.0", &[]));
        repo.register(package("lib/a", "1.0.0", &[("shared/x", "^1.0")]));

        // shared/x is declared directly, pruned because the framework
        // provides it, then pulled back transitively by lib/a: it must land
        // in the exclusion list, not vanish entirely.
        let set = DependencyExtractor::new(&repo).extract(&requirements(&[
            ("core/base", "^12.0"),
            ("shared/x", "^1.0"),
            ("lib/a", "^1.0"),
        ]));

        let names: Vec<String> = set.requirements().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["lib/a"]);
        assert_eq!(
            set.exclusions(),
            vec![("shared/x".to_string(), "*".to_string())]
        );
        assert!(set.problems().is_empty());
    }

    #[test]
    fn test_dependency_cycles_terminate() {
        let mut repo = PackageRepository::new();
        repo.register(package("acme/a", "1.0.0", &[("acme/b", "^1.0")]));
        repo.register(package("acme/b", "1.0.0", &[("acme/a", "^1.0")]));

        let set = DependencyExtractor::new(&repo).extract(&requirements(&[("acme/a", "^1.0")]));
        let names: Vec<String> = set.requirements().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["acme/a"]);
    }

    #[test]
    fn test_problems_are_deduplicated_per_package() {
        let mut repo = PackageRepository::new();
        repo.register(package("acme/http", "1.0.0", &[]));

        // ^2.0 resolves against nothing loaded, recording one problem even
        // though the name would otherwise fail at two separate steps.
        let set = DependencyExtractor::new(&repo).extract(&requirements(&[("acme/http", "^2.0")]));
        assert_eq!(set.problems().len(), 1);
    }
}
