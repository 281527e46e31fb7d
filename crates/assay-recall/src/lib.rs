//! Failure recall for Assay.
//!
//! Keeps a bounded history of analysed test failures together with an
//! embedding of each error message, and finds past failures whose embedding
//! is close to a new one. Embeddings are produced elsewhere; this crate only
//! stores them and ranks them by cosine similarity.
//!
//! # Key Types
//!
//! - [`FailureStore`] -- Bounded, JSON-persisted failure history
//! - [`FailureRecord`] / [`SimilarFailure`] -- Stored entries and ranked matches
//! - [`RecallConfig`] -- Capacity, truncation and search defaults

pub mod config;
pub mod error;
pub mod similarity;
pub mod store;

pub use config::RecallConfig;
pub use error::{RecallError, Result};
pub use similarity::cosine_similarity;
pub use store::{FailureRecord, FailureStore, SimilarFailure};
