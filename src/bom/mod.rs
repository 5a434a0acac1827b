//! CycloneDX bill-of-materials model.
//!
//! The model covers the subset of CycloneDX the bundler emits: document
//! identity, metadata with tool provenance and a root component, one
//! component per locked package, and the dependency graph as per-component
//! adjacency lists. Serialization is JSON only; see [`BomFormat`].

pub mod format;
pub mod generator;

pub use format::{BomFormat, SpecVersion};
pub use generator::{BomGenerator, BomOptions};

use crate::constants::PURL_TYPE;
use crate::core::VbundleError;
use crate::package::{PackageKind, ResolvedPackage, split_name};
use anyhow::Result;
use serde::Serialize;
use uuid::Uuid;

/// A CycloneDX document.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bom {
    #[serde(rename = "$schema")]
    schema: String,
    bom_format: &'static str,
    spec_version: String,
    serial_number: String,
    version: u32,
    metadata: Metadata,
    components: Vec<Component>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    dependencies: Vec<DependencyEntry>,
}

impl Bom {
    pub(crate) fn new(
        spec_version: SpecVersion,
        metadata: Metadata,
        components: Vec<Component>,
        dependencies: Vec<DependencyEntry>,
    ) -> Self {
        Self {
            schema: spec_version.schema_url().to_string(),
            bom_format: "CycloneDX",
            spec_version: spec_version.as_str().to_string(),
            serial_number: format!("urn:uuid:{}", Uuid::new_v4()),
            version: 1,
            metadata,
            components,
            dependencies,
        }
    }

    /// Serialize the document in `format`.
    ///
    /// # Errors
    ///
    /// [`VbundleError::BomFormatNotSupported`] for non-JSON formats.
    pub fn serialize(&self, format: BomFormat) -> Result<String> {
        match format {
            BomFormat::Json => serde_json::to_string_pretty(self).map_err(|e| {
                VbundleError::BomInvalid {
                    reason: e.to_string(),
                }
                .into()
            }),
            BomFormat::Xml => Err(VbundleError::BomFormatNotSupported {
                format: format.to_string(),
                spec_version: self.spec_version.clone(),
            }
            .into()),
        }
    }

    /// Components of the document, root component excluded.
    #[must_use]
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Document serial number (`urn:uuid:` form).
    #[must_use]
    pub fn serial_number(&self) -> &str {
        &self.serial_number
    }
}

/// Structurally validate a serialized JSON document.
///
/// This is a post-generation sanity check, not schema validation: the
/// document must be a JSON object declaring `bomFormat` CycloneDX, the
/// expected `specVersion`, a `urn:uuid:` serial number, and a components
/// array.
///
/// # Errors
///
/// [`VbundleError::BomInvalid`] describing the first violated expectation.
pub fn validate_json(serialized: &str, spec_version: SpecVersion) -> Result<()> {
    let invalid = |reason: String| VbundleError::BomInvalid { reason };

    let document: serde_json::Value = serde_json::from_str(serialized)
        .map_err(|e| invalid(format!("not valid JSON: {e}")))?;
    let object = document
        .as_object()
        .ok_or_else(|| invalid("document is not a JSON object".to_string()))?;

    if object.get("bomFormat").and_then(|v| v.as_str()) != Some("CycloneDX") {
        return Err(invalid("missing or wrong bomFormat".to_string()).into());
    }
    if object.get("specVersion").and_then(|v| v.as_str()) != Some(spec_version.as_str()) {
        return Err(invalid(format!("specVersion is not {spec_version}")).into());
    }
    if !object
        .get("serialNumber")
        .and_then(|v| v.as_str())
        .is_some_and(|s| s.starts_with("urn:uuid:"))
    {
        return Err(invalid("serialNumber is not a urn:uuid".to_string()).into());
    }
    if !object.get("components").is_some_and(serde_json::Value::is_array) {
        return Err(invalid("components is not an array".to_string()).into());
    }

    Ok(())
}

/// Document metadata.
#[derive(Debug, Serialize)]
pub struct Metadata {
    pub(crate) timestamp: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) tools: Vec<Tool>,
    pub(crate) component: Component,
}

/// A tool that contributed to creating the document.
#[derive(Debug, Serialize)]
pub struct Tool {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) vendor: Option<String>,
    pub(crate) name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) version: Option<String>,
}

/// A single component entry.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(rename = "bom-ref")]
    bom_ref: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    group: Option<String>,
    name: String,
    version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    author: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    licenses: Vec<LicenseEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    purl: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    external_references: Vec<ExternalReference>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    properties: Vec<Property>,
}

impl Component {
    /// Build a library component from a resolved package.
    #[must_use]
    pub fn from_package(package: &ResolvedPackage) -> Self {
        Self::build(package, "library")
    }

    /// Build the root (application) component.
    #[must_use]
    pub fn root(package: &ResolvedPackage) -> Self {
        Self::build(package, "application")
    }

    fn build(package: &ResolvedPackage, kind: &'static str) -> Self {
        let (group, name) = split_name(&package.name);
        let purl = purl(&package.name, &package.version.to_string());

        let mut external_references = Vec::new();
        if let Some(dist) = &package.dist {
            external_references.push(ExternalReference {
                kind: "distribution",
                url: dist.url.clone(),
            });
        }
        if let Some(source) = &package.source {
            external_references.push(ExternalReference {
                kind: "vcs",
                url: source.url.clone(),
            });
        }
        if let Some(homepage) = &package.homepage {
            external_references.push(ExternalReference {
                kind: "website",
                url: homepage.clone(),
            });
        }

        let mut properties = Vec::new();
        if let Some(reference) = package.dist.as_ref().and_then(|d| d.reference.as_deref()) {
            properties.push(Property::new("vbundle:dist:reference", reference));
        }
        if let Some(reference) = package.source.as_ref().and_then(|s| s.reference.as_deref()) {
            properties.push(Property::new("vbundle:source:reference", reference));
        }
        if package.kind != PackageKind::Library {
            properties.push(Property::new(
                "vbundle:package:type",
                match package.kind {
                    PackageKind::Framework => "framework",
                    PackageKind::Extension => "extension",
                    PackageKind::Library => unreachable!(),
                },
            ));
        }

        Self {
            kind,
            bom_ref: purl.clone(),
            group: group.map(ToString::to_string),
            name: name.to_string(),
            version: package.pretty_version.clone(),
            description: package.description.clone(),
            author: package.author_line(),
            licenses: package
                .license
                .iter()
                .map(|id| LicenseEntry {
                    license: License { id: id.clone() },
                })
                .collect(),
            purl: Some(purl),
            external_references,
            properties,
        }
    }

    /// The component's graph reference.
    #[must_use]
    pub fn bom_ref(&self) -> &str {
        &self.bom_ref
    }

    /// The component name, group excluded.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Package-url for a package in the host ecosystem.
#[must_use]
pub fn purl(full_name: &str, version: &str) -> String {
    format!("pkg:{PURL_TYPE}/{full_name}@{version}")
}

#[derive(Debug, Serialize)]
struct LicenseEntry {
    license: License,
}

#[derive(Debug, Serialize)]
struct License {
    id: String,
}

#[derive(Debug, Serialize)]
struct ExternalReference {
    #[serde(rename = "type")]
    kind: &'static str,
    url: String,
}

#[derive(Debug, Serialize)]
struct Property {
    name: String,
    value: String,
}

impl Property {
    fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

/// One adjacency-list entry of the dependency graph.
#[derive(Debug, Serialize)]
pub struct DependencyEntry {
    #[serde(rename = "ref")]
    pub(crate) reference: String,
    #[serde(rename = "dependsOn", skip_serializing_if = "Vec::is_empty")]
    pub(crate) depends_on: Vec<String>,
}
