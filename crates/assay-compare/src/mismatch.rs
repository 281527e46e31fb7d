//! The diff report produced by a comparison.

use std::fmt;

use crate::path::FieldPath;

/// A single difference found while traversing two values.
///
/// The `Display` form is the human-readable diff line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mismatch {
    /// Two arrays differ in length; their elements were not compared.
    LengthMismatch {
        path: FieldPath,
        actual: usize,
        expected: usize,
    },
    /// The two values are of incompatible kinds; the subtree was not compared.
    TypeMismatch { path: FieldPath },
    /// Two values differ, either by default comparison or because a named
    /// field comparator rejected them.
    ValueMismatch {
        path: FieldPath,
        actual: String,
        expected: String,
        comparator: Option<String>,
    },
}

impl Mismatch {
    /// The path at which the mismatch was found.
    pub fn path(&self) -> &FieldPath {
        match self {
            Mismatch::LengthMismatch { path, .. }
            | Mismatch::TypeMismatch { path }
            | Mismatch::ValueMismatch { path, .. } => path,
        }
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::LengthMismatch {
                path,
                actual,
                expected,
            } => write!(f, "Array length mismatch at {path}: {actual} !== {expected}"),
            Mismatch::TypeMismatch { path } => write!(f, "Type mismatch at {path}"),
            Mismatch::ValueMismatch {
                path,
                actual,
                expected,
                comparator: None,
            } => write!(f, "Value mismatch at {path}: {actual} !== {expected}"),
            Mismatch::ValueMismatch {
                path,
                actual,
                expected,
                comparator: Some(name),
            } => write!(
                f,
                "Value mismatch at {path}: {actual} !== {expected} [{name}]"
            ),
        }
    }
}

/// Outcome of a comparison: every mismatch in traversal (pre)order.
///
/// The values are equivalent exactly when the list is empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompareResult {
    mismatches: Vec<Mismatch>,
}

impl CompareResult {
    /// An equal result.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn single(mismatch: Mismatch) -> Self {
        Self {
            mismatches: vec![mismatch],
        }
    }

    pub(crate) fn absorb(&mut self, child: CompareResult) {
        self.mismatches.extend(child.mismatches);
    }

    /// Returns `true` if no mismatch was found.
    pub fn equal(&self) -> bool {
        self.mismatches.is_empty()
    }

    /// Number of mismatches.
    pub fn len(&self) -> usize {
        self.mismatches.len()
    }

    /// Returns `true` if there are no mismatches.
    pub fn is_empty(&self) -> bool {
        self.mismatches.is_empty()
    }

    /// The structured mismatches.
    pub fn mismatches(&self) -> &[Mismatch] {
        &self.mismatches
    }

    /// The mismatches rendered as diff lines.
    pub fn diffs(&self) -> Vec<String> {
        self.mismatches.iter().map(ToString::to_string).collect()
    }

    /// Consume the result, returning the mismatches.
    pub fn into_mismatches(self) -> Vec<Mismatch> {
        self.mismatches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_forms() {
        let length = Mismatch::LengthMismatch {
            path: "items".into(),
            actual: 2,
            expected: 3,
        };
        assert_eq!(length.to_string(), "Array length mismatch at items: 2 !== 3");

        let ty = Mismatch::TypeMismatch { path: "id".into() };
        assert_eq!(ty.to_string(), "Type mismatch at id");

        let value = Mismatch::ValueMismatch {
            path: "someArray[0].key".into(),
            actual: "1".into(),
            expected: "2".into(),
            comparator: None,
        };
        assert_eq!(value.to_string(), "Value mismatch at someArray[0].key: 1 !== 2");

        let tagged = Mismatch::ValueMismatch {
            path: "updatedAt".into(),
            actual: "a".into(),
            expected: "b".into(),
            comparator: Some("datetime_comparator".into()),
        };
        assert_eq!(
            tagged.to_string(),
            "Value mismatch at updatedAt: a !== b [datetime_comparator]"
        );
    }

    #[test]
    fn equal_tracks_emptiness() {
        let mut result = CompareResult::new();
        assert!(result.equal());
        assert!(result.diffs().is_empty());

        result.absorb(CompareResult::single(Mismatch::TypeMismatch {
            path: "x".into(),
        }));
        assert!(!result.equal());
        assert_eq!(result.len(), 1);
        assert_eq!(result.mismatches()[0].path().as_str(), "x");
    }
}
