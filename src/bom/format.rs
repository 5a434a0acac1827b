//! BOM output formats and spec versions.

use crate::core::VbundleError;
use anyhow::Result;
use std::fmt;
use std::path::Path;

/// Wire format of a BOM file, derived from the target file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BomFormat {
    /// CycloneDX JSON.
    Json,
    /// CycloneDX XML. Recognized but not serializable.
    Xml,
}

impl BomFormat {
    /// Derive the format from a target filename.
    ///
    /// # Errors
    ///
    /// [`VbundleError::BomFormatNotSupported`] for an unknown or missing
    /// extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("xml") => Ok(Self::Xml),
            _ => Err(VbundleError::BomFormatNotSupported {
                format: extension.unwrap_or_else(|| "(none)".to_string()),
                spec_version: "any".to_string(),
            }
            .into()),
        }
    }

    /// Whether this format can be serialized for `spec_version`.
    ///
    /// Every supported spec version serializes to JSON; XML serialization is
    /// not implemented for any.
    #[must_use]
    pub fn supports(self, _spec_version: SpecVersion) -> bool {
        matches!(self, Self::Json)
    }

    /// Fail unless the format/spec-version pairing is serializable.
    pub fn ensure_supported(self, spec_version: SpecVersion) -> Result<()> {
        if self.supports(spec_version) {
            return Ok(());
        }
        Err(VbundleError::BomFormatNotSupported {
            format: self.to_string(),
            spec_version: spec_version.to_string(),
        }
        .into())
    }
}

impl fmt::Display for BomFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Xml => write!(f, "xml"),
        }
    }
}

/// Supported CycloneDX spec versions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum SpecVersion {
    /// CycloneDX 1.4.
    V1_4,
    /// CycloneDX 1.5.
    V1_5,
    /// CycloneDX 1.6.
    #[default]
    V1_6,
}

impl SpecVersion {
    /// Parse a `1.x` version string.
    ///
    /// # Errors
    ///
    /// [`VbundleError::ConfigError`] for anything but `1.4`, `1.5`, `1.6`.
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim() {
            "1.4" => Ok(Self::V1_4),
            "1.5" => Ok(Self::V1_5),
            "1.6" => Ok(Self::V1_6),
            other => Err(VbundleError::ConfigError {
                message: format!("unsupported BOM spec version '{other}' (supported: 1.4, 1.5, 1.6)"),
            }
            .into()),
        }
    }

    /// The version string emitted in the document.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V1_4 => "1.4",
            Self::V1_5 => "1.5",
            Self::V1_6 => "1.6",
        }
    }

    /// JSON schema URL for this spec version.
    #[must_use]
    pub const fn schema_url(self) -> &'static str {
        match self {
            Self::V1_4 => "http://cyclonedx.org/schema/bom-1.4.schema.json",
            Self::V1_5 => "http://cyclonedx.org/schema/bom-1.5.schema.json",
            Self::V1_6 => "http://cyclonedx.org/schema/bom-1.6.schema.json",
        }
    }
}

impl fmt::Display for SpecVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
