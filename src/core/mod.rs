//! Core types and error handling.
//!
//! This module hosts the strongly-typed error enum shared by every part of
//! the bundler, together with the user-facing error presentation used by the
//! CLI. Extraction problems are deliberately *not* part of this error type:
//! they are collected as data by the dependency extractor (see
//! [`crate::extractor::ExtractionProblem`]) and only promoted to a hard
//! [`VbundleError::ExtractionFailed`] by the calling workflow.

pub mod error;

pub use error::{ErrorContext, VbundleError, user_friendly_error};
