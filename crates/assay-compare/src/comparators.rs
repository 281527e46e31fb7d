//! Per-path comparison overrides and the stock comparators built on them.
//!
//! A [`FieldComparator`] replaces the default structural comparison for the
//! value found at one exact path (literal indices included). When its
//! predicate rejects the pair, the engine reports a single value mismatch
//! tagged with the comparator's name and does not look any deeper.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::engine::compute_equivalence;
use crate::options::CompareOptions;
use crate::render::display_value;

/// Predicate over the actual and expected values at a path.
///
/// `None` stands for a field that is absent on that side.
pub type Predicate = dyn Fn(Option<&Value>, Option<&Value>) -> bool + Send + Sync;

/// Pattern tried first when parsing timestamps.
pub const DEFAULT_DATETIME_PATTERN: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Default window within which two timestamps are considered equal.
pub const DEFAULT_DATETIME_TOLERANCE: Duration = Duration::from_secs(60);

/// Layouts tried, as UTC, after the caller's pattern and RFC 3339 fail.
const FALLBACK_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// A named comparison override bound to an exact path.
#[derive(Clone)]
pub struct FieldComparator {
    path: String,
    name: String,
    predicate: Arc<Predicate>,
}

impl FieldComparator {
    /// Create a comparator for `path` (exact match, e.g. `items[0].price`).
    pub fn new<F>(path: impl Into<String>, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(Option<&Value>, Option<&Value>) -> bool + Send + Sync + 'static,
    {
        Self {
            path: path.into(),
            name: name.into(),
            predicate: Arc::new(predicate),
        }
    }

    /// The exact path this comparator applies to.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The name used to tag mismatches reported by this comparator.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the predicate.
    pub fn accepts(&self, actual: Option<&Value>, expected: Option<&Value>) -> bool {
        (self.predicate)(actual, expected)
    }
}

impl fmt::Debug for FieldComparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldComparator")
            .field("path", &self.path)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Settings for [`datetime_comparator`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatetimeTolerance {
    /// `chrono` format pattern tried before the generic layouts.
    pub pattern: String,
    /// Largest accepted distance between the two instants (inclusive).
    pub tolerance: Duration,
}

impl Default for DatetimeTolerance {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_DATETIME_PATTERN.to_string(),
            tolerance: DEFAULT_DATETIME_TOLERANCE,
        }
    }
}

impl DatetimeTolerance {
    /// Default pattern with a custom tolerance.
    pub fn within(tolerance: Duration) -> Self {
        Self {
            tolerance,
            ..Default::default()
        }
    }

    /// Returns `true` if both values parse as instants no further apart than
    /// the tolerance. Anything that does not parse compares unequal.
    pub fn accepts(&self, actual: Option<&Value>, expected: Option<&Value>) -> bool {
        let parse = |v: Option<&Value>| match v {
            Some(Value::String(s)) => parse_datetime(s, &self.pattern),
            _ => None,
        };
        let (Some(a), Some(b)) = (parse(actual), parse(expected)) else {
            return false;
        };
        let distance_ms = u128::from((a - b).num_milliseconds().unsigned_abs());
        distance_ms <= self.tolerance.as_millis()
    }
}

/// Parse a timestamp with `pattern`, falling back to RFC 3339 and a few
/// common layouts. Values without an offset are taken as UTC.
pub fn parse_datetime(value: &str, pattern: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_str(value, pattern) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, pattern) {
        return Some(naive.and_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for layout in FALLBACK_LAYOUTS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, layout) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    DateTime::parse_from_rfc2822(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Treat two timestamp strings at `path` as equal when they are within
/// `settings.tolerance` of each other.
pub fn datetime_comparator(path: impl Into<String>, settings: DatetimeTolerance) -> FieldComparator {
    FieldComparator::new(path, "datetime_comparator", move |a, b| {
        settings.accepts(a, b)
    })
}

/// Compare two arrays of objects at `path` irrespective of order, pairing
/// elements by the key `key_fn` extracts.
///
/// Both sides are sorted by key and each pair must be equivalent under the
/// default policy. Non-arrays and arrays of different length never match.
pub fn array_key_comparator<K>(path: impl Into<String>, key_fn: K) -> FieldComparator
where
    K: Fn(&Value) -> String + Send + Sync + 'static,
{
    FieldComparator::new(path, "array_key_comparator", move |a, b| {
        let (Some(Value::Array(actual)), Some(Value::Array(expected))) = (a, b) else {
            return false;
        };
        if actual.len() != expected.len() {
            return false;
        }
        let options = CompareOptions::default();
        sort_by_extracted_key(actual, &key_fn)
            .into_iter()
            .zip(sort_by_extracted_key(expected, &key_fn))
            .all(|(x, y)| compute_equivalence(x, y, &options, &[]).equal())
    })
}

fn sort_by_extracted_key<'v, K>(items: &'v [Value], key_fn: &K) -> Vec<&'v Value>
where
    K: Fn(&Value) -> String,
{
    let mut keyed: Vec<(String, &Value)> = items.iter().map(|item| (key_fn(item), item)).collect();
    keyed.sort_by(|x, y| x.0.cmp(&y.0));
    keyed.into_iter().map(|(_, item)| item).collect()
}

/// [`array_key_comparator`] keyed by one field of each element.
pub fn array_key_comparator_by_field(
    path: impl Into<String>,
    field: impl Into<String>,
) -> FieldComparator {
    let field = field.into();
    array_key_comparator(path, move |item| display_value(item.get(field.as_str())))
}
