// Inspection and coercion of untyped input values

use serde_json::Value;
use std::fmt;

/// Characters stripped before deciding whether a string is blank.
const BLANK_CHARS: &[char] = &[' ', '\t', '\n', '\r', '\0', '\x0B'];

/// Tokens that `boolean()` maps to `true`.
const TRUTHY_TOKENS: &[&str] = &["yes", "on", "1", "true"];

/// Generic type of a value as seen by size-based rules and message keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// Integer or float; its size is the value itself
    Number,
    /// Anything that is neither a number nor a container; sized by characters
    String,
    /// Sequence or mapping; sized by element count
    Array,
}

impl ValueType {
    /// Classify a value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Number(_) => ValueType::Number,
            Value::Array(_) | Value::Object(_) => ValueType::Array,
            _ => ValueType::String,
        }
    }

    /// Suffix used in message keys such as `between.number`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Number => "number",
            ValueType::String => "string",
            ValueType::Array => "array",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a value counts as "blank".
///
/// Null, whitespace-only strings and empty containers are blank. Numbers and
/// booleans never are, including `0` and `false`.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim_matches(BLANK_CHARS).is_empty(),
        Value::Number(_) | Value::Bool(_) => false,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// A number recovered from input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Numeric {
    Int(i64),
    Float(f64),
}

impl Numeric {
    pub(crate) fn to_i64(self) -> i64 {
        match self {
            Numeric::Int(i) => i,
            // Saturating truncation toward zero
            Numeric::Float(f) => f as i64,
        }
    }

    pub(crate) fn to_f64(self) -> f64 {
        match self {
            Numeric::Int(i) => i as f64,
            Numeric::Float(f) => f,
        }
    }
}

/// Read a number out of a numeric value or a numeric string.
///
/// Booleans, containers and null are not numeric.
pub(crate) fn numeric(value: &Value) -> Option<Numeric> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Numeric::Int(i))
            } else if let Some(u) = n.as_u64() {
                Some(Numeric::Int(i64::try_from(u).unwrap_or(i64::MAX)))
            } else {
                n.as_f64().map(Numeric::Float)
            }
        }
        Value::String(s) => parse_numeric(s),
        _ => None,
    }
}

/// Parse a decimal numeric string: optional surrounding whitespace, an
/// optional sign, digits with an optional fraction, and an optional exponent.
pub(crate) fn parse_numeric(s: &str) -> Option<Numeric> {
    let trimmed = s.trim_matches(|c: char| matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0B' | '\x0C'));

    if !is_numeric_literal(trimmed) {
        return None;
    }

    if let Ok(i) = trimmed.parse::<i64>() {
        return Some(Numeric::Int(i));
    }

    trimmed
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(Numeric::Float)
}

fn is_numeric_literal(s: &str) -> bool {
    let bytes = s.as_bytes();
    let len = bytes.len();
    let mut i = 0;

    if matches!(bytes.first().copied(), Some(b'+' | b'-')) {
        i += 1;
    }

    let start = i;
    while i < len && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - start;

    if i < len && bytes[i] == b'.' {
        i += 1;
        let start = i;
        while i < len && bytes[i].is_ascii_digit() {
            i += 1;
        }
        digits += i - start;
    }

    if digits == 0 {
        return false;
    }

    if i < len && matches!(bytes[i], b'e' | b'E') {
        i += 1;
        if i < len && matches!(bytes[i], b'+' | b'-') {
            i += 1;
        }
        let start = i;
        while i < len && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == start {
            return false;
        }
    }

    i == len
}

/// Render a scalar the way it is stringified for form values.
///
/// `true` becomes `"1"`, `false` becomes `""`, and whole floats drop their
/// fraction. Containers have no string form and return `None`.
pub fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(true) => Some("1".to_string()),
        Value::Bool(false) => Some(String::new()),
        Value::Number(n) => Some(match numeric(value) {
            Some(Numeric::Float(f)) => f.to_string(),
            _ => n.to_string(),
        }),
        Value::String(s) => Some(s.clone()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Text used when a value is substituted into a message template.
pub fn display_value(value: &Value) -> String {
    stringify(value).unwrap_or_else(|| value.to_string())
}

/// Whether a value is one of the literal truthy tokens.
///
/// Matching is strict: the integer `1` counts, the float `1.0` does not.
pub(crate) fn is_truthy_token(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_u64() == Some(1),
        Value::String(s) => TRUTHY_TOKENS.contains(&s.as_str()),
        _ => false,
    }
}

/// Size of a value under its generic type.
///
/// Numbers measure as themselves, containers by element count and everything
/// else by character count of its string form.
pub(crate) fn measure(value: &Value) -> f64 {
    match value {
        Value::Number(_) => numeric(value).map(Numeric::to_f64).unwrap_or(0.0),
        Value::Array(items) => items.len() as f64,
        Value::Object(map) => map.len() as f64,
        other => stringify(other)
            .map(|s| s.chars().count() as f64)
            .unwrap_or(0.0),
    }
}

/// Strict equality: same type and same value. `1` and `1.0` differ.
pub(crate) fn strict_eq(a: &Value, b: &Value) -> bool {
    a == b
}

/// Loose equality with form-input semantics: numeric strings compare as
/// numbers, and null or booleans compare by truthiness.
pub(crate) fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        // null compares as "" against a string
        (Value::Null, Value::String(s)) | (Value::String(s), Value::Null) => s.is_empty(),
        (Value::Null | Value::Bool(_), _) | (_, Value::Null | Value::Bool(_)) => {
            is_truthy(a) == is_truthy(b)
        }
        (Value::Number(_), Value::Number(_)) => numbers_eq(a, b),
        (Value::Number(_), Value::String(s)) | (Value::String(s), Value::Number(_)) => {
            let number = if a.is_number() { a } else { b };
            match parse_numeric(s) {
                Some(parsed) => numeric(number).map(Numeric::to_f64) == Some(parsed.to_f64()),
                None => stringify(number).as_deref() == Some(s.as_str()),
            }
        }
        (Value::String(x), Value::String(y)) => match (parse_numeric(x), parse_numeric(y)) {
            (Some(x), Some(y)) => x.to_f64() == y.to_f64(),
            _ => x == y,
        },
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(x, y)| loose_eq(x, y))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .all(|(key, value)| y.get(key).is_some_and(|other| loose_eq(value, other)))
        }
        _ => false,
    }
}

fn numbers_eq(a: &Value, b: &Value) -> bool {
    match (numeric(a), numeric(b)) {
        (Some(x), Some(y)) => x.to_f64() == y.to_f64(),
        _ => false,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(_) => numeric(value).is_some_and(|n| n.to_f64() != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
