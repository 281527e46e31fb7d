//! Text forms of values: how they appear in diffs, and the canonical
//! serialization used to order arrays when array order is ignored.

use serde_json::{Number, Value};

/// Render a value the way it appears in a `Value mismatch` diff.
///
/// Strings are written without quotes, numbers in [`number_text`] form,
/// composites as compact JSON, and an absent field as `undefined`.
pub fn display_value(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => number_text(n),
        Some(other) => other.to_string(),
    }
}

/// A number as text, with whole floats written as integers (`2.0` -> `2`).
///
/// Numerically equal numbers get the same text whether they were parsed or
/// serialized as integers or floats.
pub fn number_text(n: &Number) -> String {
    const U64_BOUND: f64 = 18_446_744_073_709_551_616.0;
    const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 => {
            if (0.0..U64_BOUND).contains(&f) {
                (f as u64).to_string()
            } else if (-I64_BOUND..0.0).contains(&f) {
                (f as i64).to_string()
            } else {
                n.to_string()
            }
        }
        _ => n.to_string(),
    }
}

/// Compact JSON with object keys sorted at every level.
///
/// Equal values always produce the same text regardless of field order.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(item, out);
            }
            out.push('}');
        }
        Value::Number(n) => out.push_str(&number_text(n)),
        scalar => out.push_str(&scalar.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strings_are_unquoted() {
        assert_eq!(display_value(Some(&json!("Test Object"))), "Test Object");
    }

    #[test]
    fn scalars_and_absent() {
        assert_eq!(display_value(Some(&json!(15))), "15");
        assert_eq!(display_value(Some(&json!(1.5))), "1.5");
        assert_eq!(display_value(Some(&json!(true))), "true");
        assert_eq!(display_value(Some(&Value::Null)), "null");
        assert_eq!(display_value(None), "undefined");
    }

    #[test]
    fn whole_floats_render_as_integers() {
        assert_eq!(display_value(Some(&json!(2.0))), "2");
        assert_eq!(display_value(Some(&json!(-3.0))), "-3");
        assert_eq!(display_value(Some(&json!(-0.0))), "0");
        assert_eq!(display_value(Some(&json!(2.5))), "2.5");
        assert_eq!(display_value(Some(&json!(u64::MAX))), u64::MAX.to_string());
        assert_eq!(display_value(Some(&json!(1e300))), json!(1e300).to_string());
    }

    #[test]
    fn canonical_numbers_ignore_representation() {
        assert_eq!(canonical_json(&json!([1, {"p": 2}])), canonical_json(&json!([1.0, {"p": 2.0}])));
        assert_ne!(canonical_json(&json!(1)), canonical_json(&json!(1.5)));
    }

    #[test]
    fn composites_are_compact_json() {
        assert_eq!(display_value(Some(&json!([1, "a"]))), r#"[1,"a"]"#);
    }

    #[test]
    fn canonical_sorts_keys_recursively() {
        let a = json!({"b": 1, "a": {"y": [2, {"d": 1, "c": 2}], "x": null}});
        assert_eq!(
            canonical_json(&a),
            r#"{"a":{"x":null,"y":[2,{"c":2,"d":1}]},"b":1}"#
        );
    }

    #[test]
    fn canonical_ignores_field_order() {
        let a = json!({"value": "a", "key": "1"});
        let b = json!({"key": "1", "value": "a"});
        assert_eq!(canonical_json(&a), canonical_json(&b));
    }

    #[test]
    fn canonical_escapes_keys() {
        assert_eq!(canonical_json(&json!({"a\"b": 1})), r#"{"a\"b":1}"#);
    }
}
