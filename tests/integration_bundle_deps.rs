//! Integration tests for the `bundle-deps` command.

#![cfg(unix)]

use anyhow::Result;
use predicates::prelude::*;

mod common;
use common::TestProject;

fn seeded_project() -> Result<TestProject> {
    let project = TestProject::new()?;
    project.add_fake_installer()?;
    project.write(
        "package.toml",
        r#"[package]
name = "acme/widgets"
version = "1.0.0"

[require]
"acme/http" = "^2.0"

[[repositories]]
type = "path"
path = "packages"
"#,
    )?;
    project.add_repository_package("acme/http", "2.4.0", "library", &[])?;
    Ok(project)
}

#[test]
fn bundle_deps_writes_validated_cyclonedx_json() -> Result<()> {
    let project = seeded_project()?;

    project.vbundle().arg("bundle-deps").assert().success();

    let bom: serde_json::Value = serde_json::from_str(&project.read("libs/sbom.json")?)?;
    assert_eq!(bom["bomFormat"], "CycloneDX");
    assert_eq!(bom["specVersion"], "1.6");
    assert!(
        bom["serialNumber"]
            .as_str()
            .unwrap()
            .starts_with("urn:uuid:")
    );

    // One component per locked package.
    let components = bom["components"].as_array().unwrap();
    assert_eq!(components.len(), 2);
    let purls: Vec<&str> = components
        .iter()
        .map(|c| c["purl"].as_str().unwrap())
        .collect();
    assert!(purls.contains(&"pkg:pkgr/acme/http@2.4.0"));
    assert!(purls.contains(&"pkg:pkgr/acme/logging@1.2.0"));

    // The requirement edge between locked packages is present.
    let dependencies = bom["dependencies"].as_array().unwrap();
    let http_entry = dependencies
        .iter()
        .find(|d| d["ref"] == "pkg:pkgr/acme/http@2.4.0")
        .unwrap();
    assert_eq!(http_entry["dependsOn"][0], "pkg:pkgr/acme/logging@1.2.0");

    // Tool provenance reports the fake installer with its version.
    let tools = bom["metadata"]["tools"].as_array().unwrap();
    assert_eq!(tools[0]["name"], "pkgr");
    assert_eq!(tools[0]["version"], "pkgr 3.1.0");
    Ok(())
}

#[test]
fn bundle_deps_honors_configured_spec_version() -> Result<()> {
    let project = seeded_project()?;
    project.write("vbundle.toml", "[dependencies]\nspec-version = \"1.4\"\n")?;

    project.vbundle().arg("bundle-deps").assert().success();

    let bom: serde_json::Value = serde_json::from_str(&project.read("libs/sbom.json")?)?;
    assert_eq!(bom["specVersion"], "1.4");
    Ok(())
}

#[test]
fn xml_bom_target_is_rejected() -> Result<()> {
    let project = seeded_project()?;
    project.write("vbundle.toml", "[dependencies]\nbom-file = \"sbom.xml\"\n")?;

    project
        .vbundle()
        .arg("bundle-deps")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not supported"));
    // The failure happens before any extraction or install work.
    assert!(!project.exists("libs"));
    Ok(())
}

#[test]
fn existing_bom_requires_overwrite() -> Result<()> {
    let project = seeded_project()?;
    project.write("libs/sbom.json", "{}")?;
    // An existing libs manifest keeps extraction out of the picture.
    project.write(
        "libs/package.toml",
        "[package]\nname = \"acme/widgets-libs\"\n\n[require]\n\"acme/http\" = \"2.4.0\"\n",
    )?;

    project
        .vbundle()
        .arg("bundle-deps")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
    assert_eq!(project.read("libs/sbom.json")?, "{}");

    project
        .vbundle()
        .args(["bundle-deps", "--overwrite"])
        .assert()
        .success();
    assert!(project.read("libs/sbom.json")?.contains("CycloneDX"));
    Ok(())
}
