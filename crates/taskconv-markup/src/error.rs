//! Error types for the markup layer
//!
//! Covers:
//! - Shape mismatches while walking a descriptor
//! - Failures of the HTML tidy collaborator
//! - Normalization as a whole

use serde_json::Value;

/// A descriptor value did not have the shape its location requires
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected {expected} at '{path}', found {found}")]
pub struct ShapeError {
    /// Dotted path of the offending value (e.g. `problems.p1.choices`)
    pub path: String,
    /// Shape required at this location
    pub expected: &'static str,
    /// Shape actually found
    pub found: &'static str,
}

impl ShapeError {
    /// Create shape error for the value found at `path`
    pub fn new(path: impl Into<String>, expected: &'static str, found: &Value) -> Self {
        Self {
            path: path.into(),
            expected,
            found: crate::value::kind_of(found),
        }
    }
}

/// Errors raised by an [`HtmlTidy`](crate::HtmlTidy) implementation
///
/// Malformed HTML is never an error; these only describe a tidy step that
/// could not run at all.
#[derive(Debug, thiserror::Error)]
pub enum TidyError {
    /// Tidy backend is not available
    #[error("html tidy unavailable: {0}")]
    Unavailable(String),

    /// Tidy backend failed unexpectedly
    #[error("html tidy failed: {0}")]
    Failed(String),
}

/// Errors during descriptor normalization
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    /// Descriptor value has the wrong shape
    #[error("shape error: {0}")]
    Shape(#[from] ShapeError),

    /// HTML tidy step failed
    #[error("tidy error: {0}")]
    Tidy(#[from] TidyError),
}
