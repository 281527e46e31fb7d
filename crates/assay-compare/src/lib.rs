//! Structural equivalence comparator for Assay.
//!
//! Compares two JSON-like values (`serde_json::Value`) under a configurable
//! policy and reports every mismatch with the path where it was found, rather
//! than a bare boolean.
//!
//! # Key Types
//!
//! - [`CompareOptions`] -- Excluded paths and array-order policy
//! - [`FieldComparator`] -- Per-path override of the default comparison
//! - [`CompareResult`] / [`Mismatch`] -- The collected diff report
//! - [`Comparison`] -- Owns options and comparators, runs both entry points
//! - [`CompareProfile`] -- TOML description of a [`Comparison`]
//!
//! # Example
//!
//! ```
//! use assay_compare::{compute_equivalence, CompareOptions};
//! use serde_json::json;
//!
//! let actual = json!({"id": 1, "name": "Apple Juice", "extra": true});
//! let expected = json!({"id": 1, "name": "Orange Juice"});
//!
//! let result = compute_equivalence(&actual, &expected, &CompareOptions::default(), &[]);
//! assert!(!result.equal());
//! assert_eq!(result.diffs(), vec!["Value mismatch at name: Apple Juice !== Orange Juice"]);
//! ```

pub mod comparators;
pub mod engine;
pub mod error;
pub mod mismatch;
pub mod options;
pub mod path;
pub mod profile;
pub mod render;

pub use comparators::{
    array_key_comparator, array_key_comparator_by_field, datetime_comparator,
    DatetimeTolerance, FieldComparator,
};
pub use engine::{assert_equivalent, compute_equivalence, Comparison};
pub use error::{AssertionError, CompareError, ProfileError};
pub use mismatch::{CompareResult, Mismatch};
pub use options::CompareOptions;
pub use path::FieldPath;
pub use profile::{CompareProfile, ComparatorSpec};
