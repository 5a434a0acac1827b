//! Error types and user-friendly error reporting.
//!
//! The error system follows two principles:
//! 1. **Strongly-typed errors** ([`VbundleError`]) for precise handling in code
//! 2. **User-friendly messages** ([`ErrorContext`]) with actionable suggestions
//!    for CLI users
//!
//! Hard failures abort the current operation and surface a single
//! human-readable message. Dependency extraction problems, in contrast, are
//! collected as data and reported one line per problem; they only become a
//! [`VbundleError::ExtractionFailed`] when the caller decides they are fatal.

use colored::Colorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for all hard failures in the bundler.
///
/// Each variant represents a specific failure mode and carries the context
/// needed to render an actionable message. Variants map one-to-one onto the
/// failure conditions of the bundling workflows: manifest handling, external
/// install runs, autoload bundling, and BOM generation.
#[derive(Error, Debug)]
pub enum VbundleError {
    /// A manifest or declaration file exists but cannot be parsed or violates
    /// a structural expectation.
    #[error("Declaration file '{file}' is invalid: {reason}")]
    ManifestInvalid {
        /// Path to the offending file.
        file: String,
        /// Specific reason for the failure.
        reason: String,
    },

    /// An expected file is missing.
    #[error("File '{path}' does not exist")]
    FileDoesNotExist {
        /// Path to the missing file.
        path: String,
    },

    /// A target file already exists and overwriting was not permitted.
    #[error("File '{path}' already exists")]
    FileAlreadyExists {
        /// Path to the existing file.
        path: String,
    },

    /// An expected directory is missing.
    #[error("Directory '{path}' does not exist")]
    DirectoryDoesNotExist {
        /// Path to the missing directory.
        path: String,
    },

    /// The current working directory cannot be determined.
    #[error("Unable to detect current working directory")]
    WorkingDirUnavailable,

    /// The configured external installer binary was not found in PATH.
    #[error("Installer command '{command}' not found in PATH")]
    InstallerNotFound {
        /// The configured installer command.
        command: String,
    },

    /// The external install step exited non-zero.
    ///
    /// Carries the captured installer output for diagnostics; the output is
    /// shown as error details, not as part of the one-line message.
    #[error("Failed to install dependencies in '{path}'")]
    InstallFailed {
        /// The project directory the install ran in.
        path: String,
        /// Captured stdout and stderr of the installer.
        output: String,
    },

    /// BOM generation was requested but no lock state is present.
    #[error("Dependencies are not installed (missing lock state)")]
    DependenciesNotInstalled,

    /// The requested BOM format/spec-version pairing is unsupported.
    #[error("BOM format '{format}' is not supported for spec version {spec_version}")]
    BomFormatNotSupported {
        /// The requested wire format (file extension).
        format: String,
        /// The requested spec version.
        spec_version: String,
    },

    /// A generated BOM document failed post-generation validation.
    #[error("Serialized BOM is invalid: {reason}")]
    BomInvalid {
        /// Validation failure description.
        reason: String,
    },

    /// Dependency extraction reported problems and the caller treats them as
    /// fatal.
    #[error("Dependency extraction failed with {} problem(s)", problems.len())]
    ExtractionFailed {
        /// One human-readable line per extraction problem.
        problems: Vec<String>,
    },

    /// Bundler configuration is invalid.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error.
        message: String,
    },

    /// IO error wrapper with the path that was being accessed.
    #[error("IO error while accessing '{}'", path.display())]
    Io {
        /// Path being accessed when the error occurred.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// TOML deserialization error from [`toml::de::Error`].
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error from [`toml::ser::Error`].
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// Semantic version parsing error from [`semver::Error`].
    #[error("Version parsing error: {0}")]
    Semver(#[from] semver::Error),

    /// Generic error for cases not covered by specific variants.
    #[error("{message}")]
    Other {
        /// The error message.
        message: String,
    },
}

impl VbundleError {
    /// Wrap an IO error together with the path that was being accessed.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Convenience constructor for [`VbundleError::ManifestInvalid`].
    pub fn manifest_invalid(file: impl fmt::Display, reason: impl Into<String>) -> Self {
        Self::ManifestInvalid {
            file: file.to_string(),
            reason: reason.into(),
        }
    }
}

/// Wrapper that adds user-friendly presentation to a [`VbundleError`].
///
/// Rendered by the CLI on failure: the error itself in red, optional details
/// in yellow, an optional suggestion in green.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error.
    pub error: VbundleError,
    /// Optional actionable suggestion for resolving the error.
    pub suggestion: Option<String>,
    /// Optional additional details about the error.
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context without suggestion or details.
    #[must_use]
    pub const fn new(error: VbundleError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into a user-friendly format with contextual suggestions.
///
/// Walks the error chain looking for a [`VbundleError`]; errors wrapped by
/// `anyhow` context are unwrapped to their typed cause so suggestions stay
/// specific. Unknown errors fall back to a generic context.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let mut current: &dyn std::error::Error = error.as_ref();
    loop {
        if let Some(err) = current.downcast_ref::<VbundleError>() {
            return create_error_context(err);
        }
        match current.source() {
            Some(source) => current = source,
            None => break,
        }
    }

    ErrorContext::new(VbundleError::Other {
        message: error.to_string(),
    })
}

fn create_error_context(error: &VbundleError) -> ErrorContext {
    let rebuilt = rebuild(error);
    match error {
        VbundleError::ManifestInvalid { .. } => ErrorContext::new(rebuilt)
            .with_suggestion("Check the file for syntax errors or missing required keys"),
        VbundleError::FileDoesNotExist { .. } => ErrorContext::new(rebuilt)
            .with_suggestion("Check that the path exists and is readable"),
        VbundleError::FileAlreadyExists { .. } => ErrorContext::new(rebuilt)
            .with_suggestion("Pass --overwrite to replace the existing file"),
        VbundleError::DirectoryDoesNotExist { .. } => ErrorContext::new(rebuilt)
            .with_suggestion("Run 'vbundle extract-deps' first, or enable dependency extraction"),
        VbundleError::InstallerNotFound { command } => ErrorContext::new(rebuilt).with_suggestion(
            format!("Install '{command}' or set a different command under [installer] in vbundle.toml"),
        ),
        VbundleError::InstallFailed { output, .. } => ErrorContext::new(rebuilt)
            .with_details(output.trim().to_string())
            .with_suggestion("Inspect the installer output above for the underlying failure"),
        VbundleError::DependenciesNotInstalled => ErrorContext::new(rebuilt)
            .with_suggestion("Run the installer in the libs directory to create a lock state"),
        VbundleError::BomFormatNotSupported { .. } => ErrorContext::new(rebuilt)
            .with_suggestion("Use a .json target file; XML output is not supported"),
        VbundleError::ExtractionFailed { problems } => ErrorContext::new(rebuilt)
            .with_details(problems.join("\n"))
            .with_suggestion(
                "Fix the listed requirements, or pass --no-fail-on-problems to continue anyway",
            ),
        _ => ErrorContext::new(rebuilt),
    }
}

// VbundleError is not Clone (it owns io::Error), so the context rebuilds the
// variants it needs for display.
fn rebuild(error: &VbundleError) -> VbundleError {
    match error {
        VbundleError::ManifestInvalid { file, reason } => VbundleError::ManifestInvalid {
            file: file.clone(),
            reason: reason.clone(),
        },
        VbundleError::FileDoesNotExist { path } => {
            VbundleError::FileDoesNotExist { path: path.clone() }
        }
        VbundleError::FileAlreadyExists { path } => {
            VbundleError::FileAlreadyExists { path: path.clone() }
        }
        VbundleError::DirectoryDoesNotExist { path } => {
            VbundleError::DirectoryDoesNotExist { path: path.clone() }
        }
        VbundleError::WorkingDirUnavailable => VbundleError::WorkingDirUnavailable,
        VbundleError::InstallerNotFound { command } => VbundleError::InstallerNotFound {
            command: command.clone(),
        },
        VbundleError::InstallFailed { path, output } => VbundleError::InstallFailed {
            path: path.clone(),
            output: output.clone(),
        },
        VbundleError::DependenciesNotInstalled => VbundleError::DependenciesNotInstalled,
        VbundleError::BomFormatNotSupported {
            format,
            spec_version,
        } => VbundleError::BomFormatNotSupported {
            format: format.clone(),
            spec_version: spec_version.clone(),
        },
        VbundleError::BomInvalid { reason } => VbundleError::BomInvalid {
            reason: reason.clone(),
        },
        VbundleError::ExtractionFailed { problems } => VbundleError::ExtractionFailed {
            problems: problems.clone(),
        },
        VbundleError::ConfigError { message } => VbundleError::ConfigError {
            message: message.clone(),
        },
        other => VbundleError::Other {
            message: other.to_string(),
        },
    }
}
