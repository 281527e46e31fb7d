use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for a [`FailureStore`](crate::FailureStore).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecallConfig {
    /// File the store is loaded from and saved to, if any.
    pub store_path: Option<PathBuf>,
    /// Maximum number of failures kept; the oldest are evicted first.
    pub capacity: usize,
    /// Error text is truncated to this many characters before storing.
    pub max_error_chars: usize,
    /// Minimum cosine similarity for a match.
    pub threshold: f32,
    /// Maximum number of matches returned.
    pub limit: usize,
}

impl Default for RecallConfig {
    fn default() -> Self {
        Self {
            store_path: None,
            capacity: 1000,
            max_error_chars: 500,
            threshold: 0.8,
            limit: 3,
        }
    }
}

impl RecallConfig {
    /// Default settings persisted at `path`.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            store_path: Some(path.into()),
            ..Default::default()
        }
    }
}
