use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Policy applied to a whole comparison.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareOptions {
    /// Index-erased paths (e.g. `items[].createdAt`) that are treated as equal
    /// without descending into them.
    pub exclude_keys: BTreeSet<String>,
    /// When `true`, arrays are sorted by their canonical serialization before
    /// being compared element by element.
    pub ignore_array_order: bool,
}

impl CompareOptions {
    /// Options with nothing excluded and array order significant.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an excluded path.
    pub fn exclude(mut self, path: impl Into<String>) -> Self {
        self.exclude_keys.insert(path.into());
        self
    }

    /// Set whether array order is ignored.
    pub fn ignore_array_order(mut self, ignore: bool) -> Self {
        self.ignore_array_order = ignore;
        self
    }

    /// Returns `true` if the given index-erased path is excluded.
    pub fn is_excluded(&self, erased_path: &str) -> bool {
        self.exclude_keys.contains(erased_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opts = CompareOptions::default();
        assert!(opts.exclude_keys.is_empty());
        assert!(!opts.ignore_array_order);
    }

    #[test]
    fn builder() {
        let opts = CompareOptions::new()
            .exclude("someArray[].value")
            .exclude("updatedAt")
            .ignore_array_order(true);
        assert!(opts.is_excluded("updatedAt"));
        assert!(opts.is_excluded("someArray[].value"));
        assert!(!opts.is_excluded("someArray[0].value"));
        assert!(opts.ignore_array_order);
    }

    #[test]
    fn deserialize_partial() {
        let opts: CompareOptions = serde_json::from_str(r#"{"ignore_array_order": true}"#).unwrap();
        assert!(opts.ignore_array_order);
        assert!(opts.exclude_keys.is_empty());
    }
}
