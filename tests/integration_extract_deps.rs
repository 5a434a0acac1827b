//! Integration tests for the `extract-deps` command.

use anyhow::Result;
use predicates::prelude::*;

mod common;
use common::TestProject;

fn seeded_project() -> Result<TestProject> {
    let project = TestProject::new()?;
    project.write(
        "package.toml",
        r#"[package]
name = "acme/widgets"
version = "1.0.0"
type = "extension"

[require]
"rt" = ">=1.0"
"ext-sockets" = "*"
"fw/core" = "^12.0"
"acme/http" = "^2.0"

[[repositories]]
type = "path"
path = "packages"
"#,
    )?;

    project.add_repository_package("fw/core", "12.4.0", "framework", &[("shared/x", "^1.0")])?;
    project.add_repository_package("shared/x", "1.3.0", "library", &[])?;
    project.add_repository_package("acme/http", "2.0.0", "library", &[("shared/x", "^1.0")])?;
    project.add_repository_package("acme/http", "2.4.0", "library", &[("shared/x", "^1.0")])?;
    Ok(project)
}

#[test]
fn extract_deps_writes_libs_manifest() -> Result<()> {
    let project = seeded_project()?;

    project.vbundle().arg("extract-deps").assert().success();

    let libs_manifest = project.read("libs/package.toml")?;
    // The framework package and everything it provides stay out of the
    // requirement list; the surviving package is pinned to its best
    // candidate version.
    assert!(libs_manifest.contains("name = \"acme/widgets-libs\""));
    assert!(libs_manifest.contains("\"acme/http\" = \"2.4.0\""));
    assert!(!libs_manifest.contains("fw/core"));
    // The transitively shared package is provided, not required.
    assert!(libs_manifest.contains("\"shared/x\" = \"*\""));
    assert!(libs_manifest.contains("allow-plugins = false"));
    assert!(libs_manifest.contains("lock = false"));
    // Platform requirements never propagate.
    assert!(!libs_manifest.contains("ext-sockets"));
    // The path repository is copied so the libs project resolves the same
    // packages.
    assert!(libs_manifest.contains("type = \"path\""));
    Ok(())
}

#[test]
fn extract_deps_is_idempotent_without_force() -> Result<()> {
    let project = seeded_project()?;

    project.vbundle().arg("extract-deps").assert().success();
    let first = project.read("libs/package.toml")?;

    project.vbundle().arg("extract-deps").assert().success();
    assert_eq!(first, project.read("libs/package.toml")?);
    Ok(())
}

#[test]
fn unresolvable_requirement_fails_with_problem_listing() -> Result<()> {
    let project = TestProject::new()?;
    project.write(
        "package.toml",
        r#"[package]
name = "acme/widgets"
version = "1.0.0"

[require]
"lib/missing" = "^9.9"
"#,
    )?;

    project
        .vbundle()
        .arg("extract-deps")
        .assert()
        .failure()
        .stderr(predicate::str::contains("lib/missing"));
    assert!(!project.exists("libs/package.toml"));
    Ok(())
}

#[test]
fn problems_become_warnings_when_not_fatal() -> Result<()> {
    let project = TestProject::new()?;
    project.write(
        "package.toml",
        r#"[package]
name = "acme/widgets"
version = "1.0.0"

[require]
"lib/missing" = "^9.9"
"#,
    )?;

    project
        .vbundle()
        .args(["extract-deps", "--no-fail-on-problems"])
        .assert()
        .success()
        .stderr(predicate::str::contains("lib/missing"));

    let libs_manifest = project.read("libs/package.toml")?;
    assert!(!libs_manifest.contains("lib/missing"));
    Ok(())
}
