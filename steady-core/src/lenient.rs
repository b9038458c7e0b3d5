//! Forgiving serde helpers for form-entered fields.
//!
//! Tool forms store numbers as strings or numbers depending on the input
//! widget, and optional fields as absent, `null` or `""`. These helpers accept
//! all of those so that one odd field does not throw away the whole record.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Number(f64),
    Other(IgnoredAny),
}

impl TextOrNumber {
    fn into_text(self) -> String {
        match self {
            TextOrNumber::Text(s) => s,
            TextOrNumber::Number(n) => n.to_string(),
            TextOrNumber::Other(_) => String::new(),
        }
    }
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

static LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?").expect("valid number regex")
});

/// Parse the leading decimal number of free text.
///
/// `"30.5"` -> 30.5, `"12 dollars"` -> 12.0, `"abc"` / `""` -> 0.0.
pub fn parse_amount(text: &str) -> f64 {
    LEADING_NUMBER
        .find(text)
        .and_then(|m| m.as_str().trim().parse::<f64>().ok())
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

/// String from a JSON string or number; anything else is empty.
pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<TextOrNumber>::deserialize(deserializer)?
        .map(TextOrNumber::into_text)
        .unwrap_or_default())
}

/// Optional string; `null` and blank strings become `None`.
pub fn opt_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<TextOrNumber>::deserialize(deserializer)?
        .map(TextOrNumber::into_text)
        .filter(|s| !s.trim().is_empty()))
}

/// Number from a JSON number, numeric string or null (0.0).
pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(match Option::<TextOrNumber>::deserialize(deserializer)? {
        Some(TextOrNumber::Number(n)) => n,
        Some(TextOrNumber::Text(s)) => parse_amount(&s),
        Some(TextOrNumber::Other(_)) | None => 0.0,
    })
}

/// Non-negative whole number (scores, counts, seconds).
pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let n = number(deserializer)?;
    Ok(n.max(0.0).round().min(u32::MAX as f64) as u32)
}

/// List of strings. A lone string or number is a one-item list; other
/// shapes, and non-text items inside an array, are dropped.
pub fn list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().filter_map(scalar_text).collect(),
        other => scalar_text(other).into_iter().collect(),
    })
}

/// Array of objects; items that do not parse are skipped and a lone object
/// is a one-item list.
pub fn entries<'de, D: Deserializer<'de>, T: DeserializeOwned>(deserializer: D) -> Result<Vec<T>, D::Error> {
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        object @ Value::Object(_) => vec![object],
        _ => Vec::new(),
    };
    Ok(items.into_iter().filter_map(|v| serde_json::from_value(v).ok()).collect())
}

/// Optional `YYYY-MM-DD` date; blanks and unparseable input become `None`.
pub fn opt_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        let s = s.trim();
        let day = s.get(..10).unwrap_or(s);
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }))
}
