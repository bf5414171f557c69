//! Coercions matching the loose value semantics the stored rule data is authored against.
//!
//! Answers and rule payloads are untyped JSON, so comparisons follow the same
//! truthiness, numeric and string conversions the questionnaire front end uses.

use serde_json::{Number, Value};

/// Returns `false` for `null`, `false`, `0` and the empty string.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Numeric coercion; anything without a numeric reading becomes NaN.
///
/// Arrays go through their string form, so `[]` is `0`, `[5]` is `5` and
/// `[1, 2]` is NaN. Objects are always NaN.
pub fn to_number(value: Option<&Value>) -> f64 {
    match value {
        None => f64::NAN,
        Some(Value::Null) => 0.0,
        Some(Value::Bool(flag)) => f64::from(u8::from(*flag)),
        Some(Value::Number(number)) => number.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(text)) => parse_numeric(text),
        Some(items @ Value::Array(_)) => parse_numeric(&to_display_string(Some(items))),
        Some(Value::Object(_)) => f64::NAN,
    }
}

fn parse_numeric(text: &str) -> f64 {
    let trimmed = text.trim();
    match trimmed {
        "" => 0.0,
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ if trimmed
            .chars()
            .all(|ch| ch.is_ascii_digit() || matches!(ch, '+' | '-' | '.' | 'e' | 'E')) =>
        {
            trimmed.parse().unwrap_or(f64::NAN)
        }
        _ => f64::NAN,
    }
}

/// String conversion; a missing value renders as `undefined`.
pub fn to_display_string(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(Value::Null) => "null".to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        Some(Value::Number(number)) => number_to_string(number),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => to_display_string(Some(other)),
            })
            .collect::<Vec<_>>()
            .join(","),
        Some(Value::Object(_)) => "[object Object]".to_string(),
    }
}

fn number_to_string(number: &Number) -> String {
    if number.is_f64() {
        match number.as_f64() {
            Some(n) if n.is_nan() => "NaN".to_string(),
            Some(n) if n.is_infinite() && n > 0.0 => "Infinity".to_string(),
            Some(n) if n.is_infinite() => "-Infinity".to_string(),
            // f64 Display already drops a zero fraction ("5", not "5.0").
            Some(n) => n.to_string(),
            None => number.to_string(),
        }
    } else {
        number.to_string()
    }
}

/// Strict equality between two possibly-missing values.
///
/// Numbers compare by value regardless of their integer/float encoding;
/// arrays and objects compare structurally.
pub fn strict_equals(left: Option<&Value>, right: Option<&Value>) -> bool {
    match (left, right) {
        (None, None) => true,
        (Some(left), Some(right)) => values_equal(left, right),
        _ => false,
    }
}

fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| values_equal(x, y)))
        }
        _ => left == right,
    }
}

/// Length of a string in characters rather than bytes.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}
