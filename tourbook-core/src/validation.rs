//! Boundary checks shared by the request contracts in [`crate::models`].

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use crate::{CoreError, CoreResult};

pub const MISSING_FIELDS: &str = "Missing required fields";

/// Keys a client may never set directly on a stored record.
pub const RESERVED_KEYS: &[&str] = &["_id"];

/// Absent and empty strings are both treated as "not provided".
pub fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

pub fn missing_fields() -> CoreError {
    CoreError::Validation(MISSING_FIELDS.to_string())
}

/// Accepts a JSON number or a numeric string ("12.5", " 40 ").
pub fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// RFC 3339 timestamps or plain `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_date(raw: &str) -> CoreResult<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| CoreError::Validation(format!("Invalid date: {raw}")))
}

pub fn strip_reserved(extra: &mut serde_json::Map<String, Value>, also: &[&str]) {
    for key in RESERVED_KEYS.iter().chain(also) {
        extra.remove(*key);
    }
}
