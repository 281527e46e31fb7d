//! Comparison profiles: a [`Comparison`] described in TOML.
//!
//! ```toml
//! ignore_array_order = false
//! exclude_keys = ["data[].updatedAt", "status"]
//!
//! [[comparators]]
//! kind = "datetime"
//! path = "data[0].createdAt"
//! tolerance_secs = 120
//!
//! [[comparators]]
//! kind = "array_key"
//! path = "data"
//! key = "id"
//! ```

use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::comparators::{
    array_key_comparator_by_field, datetime_comparator, DatetimeTolerance, FieldComparator,
    DEFAULT_DATETIME_PATTERN, DEFAULT_DATETIME_TOLERANCE,
};
use crate::engine::Comparison;
use crate::error::ProfileError;
use crate::options::CompareOptions;

/// On-disk description of a comparison policy.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompareProfile {
    pub ignore_array_order: bool,
    pub exclude_keys: BTreeSet<String>,
    pub comparators: Vec<ComparatorSpec>,
}

/// One `[[comparators]]` entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComparatorSpec {
    /// Timestamps within a tolerance window are equal.
    Datetime {
        path: String,
        #[serde(default)]
        pattern: Option<String>,
        #[serde(default)]
        tolerance_secs: Option<u64>,
    },
    /// Arrays of objects paired by one key field, irrespective of order.
    ArrayKey { path: String, key: String },
}

impl ComparatorSpec {
    /// Build the comparator this entry describes.
    pub fn build(&self) -> FieldComparator {
        match self {
            ComparatorSpec::Datetime {
                path,
                pattern,
                tolerance_secs,
            } => datetime_comparator(
                path.clone(),
                DatetimeTolerance {
                    pattern: pattern
                        .clone()
                        .unwrap_or_else(|| DEFAULT_DATETIME_PATTERN.to_string()),
                    tolerance: tolerance_secs
                        .map(Duration::from_secs)
                        .unwrap_or(DEFAULT_DATETIME_TOLERANCE),
                },
            ),
            ComparatorSpec::ArrayKey { path, key } => {
                array_key_comparator_by_field(path.clone(), key.clone())
            }
        }
    }
}

impl CompareProfile {
    /// Parse a profile from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ProfileError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a profile file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProfileError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let profile = Self::from_toml_str(&text)?;
        debug!(
            path = %path.display(),
            excluded = profile.exclude_keys.len(),
            comparators = profile.comparators.len(),
            "loaded comparison profile"
        );
        Ok(profile)
    }

    /// The options part of the profile.
    pub fn options(&self) -> CompareOptions {
        CompareOptions {
            exclude_keys: self.exclude_keys.clone(),
            ignore_array_order: self.ignore_array_order,
        }
    }

    /// Turn the profile into a ready-to-run comparison.
    pub fn into_comparison(self) -> Comparison {
        self.comparators
            .iter()
            .map(ComparatorSpec::build)
            .fold(Comparison::with_options(self.options()), Comparison::field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    const PROFILE: &str = r#"
ignore_array_order = false
exclude_keys = ["data[].updatedAt"]

[[comparators]]
kind = "datetime"
path = "data[0].createdAt"
tolerance_secs = 120

[[comparators]]
kind = "array_key"
path = "tags"
key = "name"
"#;

    #[test]
    fn empty_profile_is_default() {
        let profile = CompareProfile::from_toml_str("").unwrap();
        assert_eq!(profile, CompareProfile::default());
        assert_eq!(profile.options(), CompareOptions::default());
    }

    #[test]
    fn parses_all_sections() {
        let profile = CompareProfile::from_toml_str(PROFILE).unwrap();
        assert!(!profile.ignore_array_order);
        assert!(profile.exclude_keys.contains("data[].updatedAt"));
        assert_eq!(
            profile.comparators,
            vec![
                ComparatorSpec::Datetime {
                    path: "data[0].createdAt".into(),
                    pattern: None,
                    tolerance_secs: Some(120),
                },
                ComparatorSpec::ArrayKey {
                    path: "tags".into(),
                    key: "name".into(),
                },
            ]
        );
    }

    #[test]
    fn rejects_unknown_comparator_kind() {
        let text = "[[comparators]]\nkind = \"fuzzy\"\npath = \"x\"\n";
        assert!(matches!(
            CompareProfile::from_toml_str(text),
            Err(ProfileError::Parse(_))
        ));
    }

    #[test]
    fn rejects_unknown_fields() {
        assert!(CompareProfile::from_toml_str("ignore_order = true").is_err());
    }

    #[test]
    fn comparison_from_profile() {
        let comparison = CompareProfile::from_toml_str(PROFILE).unwrap().into_comparison();
        assert_eq!(comparison.comparators().len(), 2);
        assert_eq!(comparison.comparators()[0].name(), "datetime_comparator");

        let actual = json!({
            "data": [{"createdAt": "2024-10-01T12:00:00Z", "updatedAt": "2024-10-01T12:00:00Z"}],
            "tags": [{"name": "juice"}, {"name": "fruit"}]
        });
        let expected = json!({
            "data": [{"createdAt": "2024-10-01T12:01:30Z", "updatedAt": "2025-01-01T00:00:00Z"}],
            "tags": [{"name": "fruit"}, {"name": "juice"}]
        });
        assert!(comparison.assert(&actual, &expected).is_ok());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(PROFILE.as_bytes()).unwrap();
        let profile = CompareProfile::load(file.path()).unwrap();
        assert_eq!(profile.comparators.len(), 2);
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            CompareProfile::load(dir.path().join("absent.toml")),
            Err(ProfileError::Io(_))
        ));
    }
}
