//! Bounded failure history with similarity search.

use std::collections::VecDeque;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::RecallConfig;
use crate::error::{RecallError, Result};
use crate::similarity::cosine_similarity;

/// A recorded test failure and the analysis attached to it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub id: Uuid,
    /// Error text, truncated to the configured length.
    pub error: String,
    pub analysis: String,
    pub embedding: Vec<f32>,
    pub timestamp: DateTime<Utc>,
}

/// A stored failure ranked against a query embedding.
#[derive(Clone, Debug, PartialEq)]
pub struct SimilarFailure {
    pub record: FailureRecord,
    pub similarity: f32,
}

/// In-memory failure history, optionally backed by a JSON file.
///
/// Holds at most `capacity` records; adding beyond that evicts the oldest.
#[derive(Debug)]
pub struct FailureStore {
    config: RecallConfig,
    records: VecDeque<FailureRecord>,
}

impl FailureStore {
    /// Create an empty store.
    pub fn new(config: RecallConfig) -> Self {
        Self {
            config,
            records: VecDeque::new(),
        }
    }

    /// Create a store and load its configured file, if any.
    ///
    /// A missing file yields an empty store. A file that cannot be parsed is
    /// logged and ignored.
    pub fn open(config: RecallConfig) -> Result<Self> {
        let mut store = Self::new(config);
        if let Some(path) = store.config.store_path.clone() {
            store.records = load_records(&path)?;
            store.enforce_capacity();
            debug!(path = %path.display(), records = store.records.len(), "failure store loaded");
        }
        Ok(store)
    }

    pub fn config(&self) -> &RecallConfig {
        &self.config
    }

    /// Number of stored failures.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if no failures are stored.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Stored failures, oldest first.
    pub fn records(&self) -> impl Iterator<Item = &FailureRecord> {
        self.records.iter()
    }

    /// Record a failure with its analysis and the embedding of its error text.
    pub fn add_failure(&mut self, error: &str, analysis: &str, embedding: Vec<f32>) -> Result<Uuid> {
        if embedding.is_empty() {
            return Err(RecallError::EmptyEmbedding);
        }
        let record = FailureRecord {
            id: Uuid::now_v7(),
            error: truncate_chars(error, self.config.max_error_chars),
            analysis: analysis.to_string(),
            embedding,
            timestamp: Utc::now(),
        };
        let id = record.id;
        self.records.push_back(record);
        self.enforce_capacity();
        debug!(%id, records = self.records.len(), "failure recorded");
        Ok(id)
    }

    /// Failures whose similarity to `query` is at least `threshold`, best
    /// first, at most `limit` of them.
    pub fn find_similar(&self, query: &[f32], threshold: f32, limit: usize) -> Vec<SimilarFailure> {
        let mut matches: Vec<SimilarFailure> = self
            .records
            .iter()
            .filter_map(|record| {
                let similarity = cosine_similarity(query, &record.embedding)?;
                (similarity >= threshold).then(|| SimilarFailure {
                    record: record.clone(),
                    similarity,
                })
            })
            .collect();
        matches.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        matches.truncate(limit);
        matches
    }

    /// [`find_similar`](Self::find_similar) with the configured threshold and limit.
    pub fn find_similar_default(&self, query: &[f32]) -> Vec<SimilarFailure> {
        self.find_similar(query, self.config.threshold, self.config.limit)
    }

    /// Write the store as pretty JSON to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.records)?;
        std::fs::write(path, json)?;
        debug!(path = %path.display(), records = self.records.len(), "failure store saved");
        Ok(())
    }

    /// Write the store to its configured file. A store without one is not
    /// persisted.
    pub fn save(&self) -> Result<()> {
        match &self.config.store_path {
            Some(path) => self.save_to(path),
            None => Ok(()),
        }
    }

    fn enforce_capacity(&mut self) {
        while self.records.len() > self.config.capacity {
            self.records.pop_front();
        }
    }
}

fn load_records(path: &Path) -> Result<VecDeque<FailureRecord>> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(VecDeque::new()),
        Err(e) => return Err(e.into()),
    };
    match serde_json::from_str(&text) {
        Ok(records) => Ok(records),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "corrupt failure store; starting empty");
            Ok(VecDeque::new())
        }
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
