//! Error types for the comparator crate.

use thiserror::Error;

use crate::mismatch::Mismatch;

/// Raised by the assertion entry points when two values are not equivalent.
///
/// Carries every mismatch found in a single full traversal.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("Expected objects to be equivalent:\n{report}")]
pub struct AssertionError {
    report: String,
    mismatches: Vec<Mismatch>,
}

impl AssertionError {
    pub(crate) fn new(mismatches: Vec<Mismatch>) -> Self {
        let report = mismatches
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        Self { report, mismatches }
    }

    /// The mismatches that caused the assertion to fail, in traversal order.
    pub fn mismatches(&self) -> &[Mismatch] {
        &self.mismatches
    }

    /// The newline-joined diff text, without the header line.
    pub fn report(&self) -> &str {
        &self.report
    }
}

/// Errors from comparing typed (serializable) models.
#[derive(Debug, Error)]
pub enum CompareError {
    /// One of the models could not be converted into a JSON value.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The values were converted but are not equivalent.
    #[error(transparent)]
    NotEquivalent(#[from] AssertionError),
}

/// Errors from loading a comparison profile.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// The profile file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The profile text is not a valid TOML profile.
    #[error("invalid profile: {0}")]
    Parse(#[from] toml::de::Error),
}
