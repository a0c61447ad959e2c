//! Write-time value coercion.
//!
//! Every value crossing the record repository's write path is coerced to its
//! column's type. Coercion never rejects: unparseable numbers become 0,
//! invalid dates become the current time. The same rules apply to filter
//! values before comparison, so a string `"18"` filters a number column
//! correctly.

use crate::models::schema::ColumnType;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

/// Coerces a caller-supplied value to the given column type.
///
/// The result is the canonical stored shape: numbers as JSON numbers,
/// booleans as JSON booleans, dates as RFC 3339 strings, strings as strings.
pub fn coerce(value: &Value, ctype: ColumnType, now: DateTime<Utc>) -> Value {
    match ctype {
        ColumnType::Number => Value::from(coerce_number(value)),
        ColumnType::Boolean => Value::Bool(coerce_boolean(value)),
        ColumnType::Date => Value::String(coerce_date(value, now).to_rfc3339()),
        ColumnType::String => Value::String(coerce_string(value)),
    }
}

/// The stored default when an insert omits a column entirely.
pub fn default_value(ctype: ColumnType, now: DateTime<Utc>) -> Value {
    match ctype {
        ColumnType::String => Value::String(String::new()),
        ColumnType::Number => Value::from(0.0),
        ColumnType::Boolean => Value::Bool(false),
        ColumnType::Date => Value::String(now.to_rfc3339()),
    }
}

/// Parses as a float; anything that does not parse in full becomes 0.
pub fn coerce_number(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if parsed.is_nan() {
        0.0
    } else {
        parsed
    }
}

/// Booleans pass through; otherwise true iff the value equals `"true"`,
/// `"1"` or numeric 1.
pub fn coerce_boolean(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s == "true" || s == "1",
        Value::Number(n) => n.as_f64() == Some(1.0),
        _ => false,
    }
}

/// Parses a date from RFC 3339, `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` or Unix
/// milliseconds. Invalid input yields `now`, never an error.
pub fn coerce_date(value: &Value, now: DateTime<Utc>) -> DateTime<Utc> {
    match value {
        Value::String(s) => parse_date_str(s.trim()).unwrap_or(now),
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .unwrap_or(now),
        _ => now,
    }
}

fn parse_date_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&d.and_hms_opt(0, 0, 0)?));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&dt));
    }
    None
}

/// Stringifies; null or missing becomes the empty string.
pub fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}
