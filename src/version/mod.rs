//! Version constraint parsing and best-candidate selection.
//!
//! Constraints use the usual operator syntax (`^1.0`, `~1.2`, `>=1.0, <2.0`,
//! `*`) and may be unioned with `||`. Parsing builds on [`semver`];
//! matching against prerelease versions follows semver rules (a prerelease
//! only matches a constraint that itself mentions a prerelease), except for
//! the `*` wildcard which matches every version.

use anyhow::{Context, Result};
use semver::{Version, VersionReq};

/// A parsed version constraint: a union of one or more requirement sets.
#[derive(Debug, Clone)]
pub struct Constraint {
    raw: String,
    branches: Vec<VersionReq>,
}

impl Constraint {
    /// Parse a constraint string.
    pub fn parse(input: &str) -> Result<Self> {
        let raw = input.trim().to_string();
        let mut branches = Vec::new();

        for branch in raw.split("||") {
            let branch = branch.trim();
            if branch.is_empty() {
                continue;
            }
            let req = VersionReq::parse(branch)
                .with_context(|| format!("Invalid version constraint '{branch}'"))?;
            branches.push(req);
        }

        if branches.is_empty() {
            branches.push(VersionReq::STAR);
        }

        Ok(Self { raw, branches })
    }

    /// The constraint as originally written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether `version` satisfies this constraint.
    #[must_use]
    pub fn matches(&self, version: &Version) -> bool {
        self.branches.iter().any(|req| {
            if *req == VersionReq::STAR {
                // The wildcard accepts prereleases too.
                true
            } else {
                req.matches(version)
            }
        })
    }
}

/// Whether `constraint` accepts `version`. Unparseable constraints match
/// nothing.
#[must_use]
pub fn constraint_matches(constraint: &str, version: &Version) -> bool {
    Constraint::parse(constraint).is_ok_and(|c| c.matches(version))
}

/// Select the best candidate among `versions` for `constraint`.
///
/// "Best" prefers the highest matching stable release; prerelease versions
/// are only considered when no stable version matches.
#[must_use]
pub fn best_candidate<'a>(
    versions: impl IntoIterator<Item = &'a Version>,
    constraint: &Constraint,
) -> Option<&'a Version> {
    let matching: Vec<&Version> = versions
        .into_iter()
        .filter(|v| constraint.matches(v))
        .collect();

    matching
        .iter()
        .filter(|v| v.pre.is_empty())
        .max()
        .or_else(|| matching.iter().max())
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn test_caret_and_tilde_constraints() {
        assert!(constraint_matches("^1.0", &v("1.4.2")));
        assert!(!constraint_matches("^1.0", &v("2.0.0")));
        assert!(constraint_matches("~1.2", &v("1.2.9")));
        assert!(!constraint_matches("~1.2", &v("1.3.0")));
    }

    #[test]
    fn test_range_and_union_constraints() {
        assert!(constraint_matches(">=1.0, <2.0", &v("1.9.9")));
        assert!(constraint_matches("^1.0 || ^2.0", &v("2.3.0")));
        assert!(!constraint_matches("^1.0 || ^2.0", &v("3.0.0")));
    }

    #[test]
    fn test_wildcard_matches_prereleases() {
        assert!(constraint_matches("*", &v("1.0.0-beta.1")));
    }

    #[test]
    fn test_unparseable_constraint_matches_nothing() {
        assert!(!constraint_matches("not-a-constraint", &v("1.0.0")));
    }

    #[test]
    fn test_best_candidate_prefers_highest_stable() {
        let versions = [v("1.0.0"), v("1.4.0"), v("2.0.0"), v("1.5.0-rc.1")];
        let constraint = Constraint::parse("^1.0").unwrap();
        assert_eq!(best_candidate(versions.iter(), &constraint), Some(&v("1.4.0")));
    }

    #[test]
    fn test_best_candidate_falls_back_to_prerelease() {
        let versions = [v("2.0.0-beta.2"), v("2.0.0-beta.1")];
        let constraint = Constraint::parse("*").unwrap();
        assert_eq!(
            best_candidate(versions.iter(), &constraint),
            Some(&v("2.0.0-beta.2"))
        );
    }

    #[test]
    fn test_best_candidate_none_when_nothing_matches() {
        let versions = [v("1.0.0")];
        let constraint = Constraint::parse("^2.0").unwrap();
        assert_eq!(best_candidate(versions.iter(), &constraint), None);
    }
}
