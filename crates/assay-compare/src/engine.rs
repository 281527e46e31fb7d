//! The recursive structural comparison.
//!
//! At every node the checks run in a fixed order: identity short-circuit,
//! exclusion (on the index-erased path), exact-path field comparator, array
//! branch, type check, primitive comparison, and finally the mapping branch,
//! which only visits the fields present on `expected`.

use serde::Serialize;
use serde_json::{Map, Number, Value};
use tracing::{debug, trace};

use crate::comparators::FieldComparator;
use crate::error::{AssertionError, CompareError};
use crate::mismatch::{CompareResult, Mismatch};
use crate::options::CompareOptions;
use crate::path::FieldPath;
use crate::render::{canonical_json, display_value};

/// Compare two values and return every mismatch found.
///
/// Never fails on a mismatch; inspect the returned [`CompareResult`].
pub fn compute_equivalence(
    actual: &Value,
    expected: &Value,
    options: &CompareOptions,
    comparators: &[FieldComparator],
) -> CompareResult {
    let walker = Walker {
        options,
        comparators,
    };
    let result = walker.compare(Some(actual), Some(expected), &FieldPath::root());
    debug!(
        diffs = result.len(),
        excluded = options.exclude_keys.len(),
        comparators = comparators.len(),
        "structural comparison finished"
    );
    result
}

/// Compare two values, failing with the complete diff set if they differ.
///
/// The whole tree is traversed before the error is raised.
pub fn assert_equivalent(
    actual: &Value,
    expected: &Value,
    options: &CompareOptions,
    comparators: &[FieldComparator],
) -> Result<(), AssertionError> {
    let result = compute_equivalence(actual, expected, options, comparators);
    if result.equal() {
        Ok(())
    } else {
        Err(AssertionError::new(result.into_mismatches()))
    }
}

/// A reusable comparison policy: options plus field comparators.
#[derive(Clone, Debug, Default)]
pub struct Comparison {
    options: CompareOptions,
    comparators: Vec<FieldComparator>,
}

impl Comparison {
    /// Default policy, no comparators.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing options.
    pub fn with_options(options: CompareOptions) -> Self {
        Self {
            options,
            comparators: Vec::new(),
        }
    }

    /// Exclude an index-erased path.
    pub fn exclude(mut self, path: impl Into<String>) -> Self {
        self.options.exclude_keys.insert(path.into());
        self
    }

    /// Set whether array order is ignored.
    pub fn ignore_array_order(mut self, ignore: bool) -> Self {
        self.options.ignore_array_order = ignore;
        self
    }

    /// Install a field comparator. Earlier comparators win on the same path.
    pub fn field(mut self, comparator: FieldComparator) -> Self {
        self.comparators.push(comparator);
        self
    }

    /// The options applied to every comparison.
    pub fn options(&self) -> &CompareOptions {
        &self.options
    }

    /// The installed field comparators, in lookup order.
    pub fn comparators(&self) -> &[FieldComparator] {
        &self.comparators
    }

    /// See [`compute_equivalence`].
    pub fn compute(&self, actual: &Value, expected: &Value) -> CompareResult {
        compute_equivalence(actual, expected, &self.options, &self.comparators)
    }

    /// See [`assert_equivalent`].
    pub fn assert(&self, actual: &Value, expected: &Value) -> Result<(), AssertionError> {
        assert_equivalent(actual, expected, &self.options, &self.comparators)
    }

    /// Compare two serializable models through their JSON form.
    pub fn compute_serialized<A, E>(&self, actual: &A, expected: &E) -> Result<CompareResult, CompareError>
    where
        A: Serialize + ?Sized,
        E: Serialize + ?Sized,
    {
        let actual = serde_json::to_value(actual)?;
        let expected = serde_json::to_value(expected)?;
        Ok(self.compute(&actual, &expected))
    }

    /// Assert two serializable models are equivalent through their JSON form.
    pub fn assert_serialized<A, E>(&self, actual: &A, expected: &E) -> Result<(), CompareError>
    where
        A: Serialize + ?Sized,
        E: Serialize + ?Sized,
    {
        let actual = serde_json::to_value(actual)?;
        let expected = serde_json::to_value(expected)?;
        self.assert(&actual, &expected)?;
        Ok(())
    }
}

/// Coarse value classes used for the type check.
///
/// Null shares a class with objects; arrays are always their own class.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Kind {
    Absent,
    Boolean,
    Number,
    String,
    Array,
    Composite,
}

fn kind_of(value: Option<&Value>) -> Kind {
    match value {
        None => Kind::Absent,
        Some(Value::Bool(_)) => Kind::Boolean,
        Some(Value::Number(_)) => Kind::Number,
        Some(Value::String(_)) => Kind::String,
        Some(Value::Array(_)) => Kind::Array,
        Some(Value::Null) | Some(Value::Object(_)) => Kind::Composite,
    }
}

fn numbers_equal(a: &Number, b: &Number) -> bool {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x == y;
    }
    a.as_f64() == b.as_f64()
}

/// Strict equality: equal primitives, or the very same composite instance.
fn strictly_equal(actual: Option<&Value>, expected: Option<&Value>) -> bool {
    match (actual, expected) {
        (None, None) => true,
        (Some(a), Some(b)) => match (a, b) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(x), Value::Bool(y)) => x == y,
            (Value::Number(x), Value::Number(y)) => numbers_equal(x, y),
            (Value::String(x), Value::String(y)) => x == y,
            (Value::Array(_), Value::Array(_)) | (Value::Object(_), Value::Object(_)) => {
                std::ptr::eq(a, b)
            }
            _ => false,
        },
        _ => false,
    }
}

struct Walker<'a> {
    options: &'a CompareOptions,
    comparators: &'a [FieldComparator],
}

impl Walker<'_> {
    fn compare(&self, actual: Option<&Value>, expected: Option<&Value>, path: &FieldPath) -> CompareResult {
        if strictly_equal(actual, expected) {
            return CompareResult::new();
        }

        if self.options.is_excluded(&path.index_erased()) {
            trace!(path = %path, "path excluded");
            return CompareResult::new();
        }

        if let Some(comparator) = self.comparators.iter().find(|c| c.path() == path.as_str()) {
            let accepted = comparator.accepts(actual, expected);
            trace!(path = %path, comparator = comparator.name(), accepted, "field comparator applied");
            if accepted {
                return CompareResult::new();
            }
            return CompareResult::single(Mismatch::ValueMismatch {
                path: path.clone(),
                actual: display_value(actual),
                expected: display_value(expected),
                comparator: Some(comparator.name().to_string()),
            });
        }

        if let (Some(Value::Array(a)), Some(Value::Array(e))) = (actual, expected) {
            return self.compare_arrays(a, e, path);
        }

        if kind_of(actual) != kind_of(expected) {
            return CompareResult::single(Mismatch::TypeMismatch { path: path.clone() });
        }

        match (actual, expected) {
            (Some(Value::Object(a)), Some(Value::Object(e))) => self.compare_objects(a, e, path),
            // Strictly-equal primitives were handled above.
            _ => CompareResult::single(Mismatch::ValueMismatch {
                path: path.clone(),
                actual: display_value(actual),
                expected: display_value(expected),
                comparator: None,
            }),
        }
    }

    fn compare_arrays(&self, actual: &[Value], expected: &[Value], path: &FieldPath) -> CompareResult {
        if actual.len() != expected.len() {
            return CompareResult::single(Mismatch::LengthMismatch {
                path: path.clone(),
                actual: actual.len(),
                expected: expected.len(),
            });
        }

        let mut actual: Vec<&Value> = actual.iter().collect();
        let mut expected: Vec<&Value> = expected.iter().collect();
        if self.options.ignore_array_order {
            actual.sort_by_cached_key(|v| canonical_json(v));
            expected.sort_by_cached_key(|v| canonical_json(v));
        }

        let mut result = CompareResult::new();
        for (i, (a, e)) in actual.into_iter().zip(expected).enumerate() {
            result.absorb(self.compare(Some(a), Some(e), &path.index(i)));
        }
        result
    }

    fn compare_objects(
        &self,
        actual: &Map<String, Value>,
        expected: &Map<String, Value>,
        path: &FieldPath,
    ) -> CompareResult {
        let mut result = CompareResult::new();
        for (key, expected_value) in expected {
            result.absorb(self.compare(actual.get(key), Some(expected_value), &path.key(key)));
        }
        result
    }
}
