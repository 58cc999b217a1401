//! Decode policy for storage values whose tag doesn't match
//!
//! `Strict` (the default) turns a tag mismatch into `Error::TypeMismatch`.
//! `Lenient` reproduces variant-style coercion:
//!
//! | target | accepted |
//! |--------|----------|
//! | bool | Bool; numbers (`!= 0`); Text (`false` for `""`, `"0"`, `"false"`, otherwise `true`) |
//! | i32 / i64 | integers (saturating); Double (truncated, not NaN); Bool (0/1); Text (parsed) |
//! | f64 | any number; Bool (0/1); Text (parsed) |
//! | String | any value, via its storage text form |
//! | timestamp | integers as milliseconds; Double (truncated); Text as millis or RFC 3339 |
//!
//! When nothing applies the target's zero value is returned (`false`, `0`,
//! `0.0`, `""`, the Unix epoch) and a `warn` event is emitted.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::value::{StorageKind, StorageValue};

/// How `from_storage_with`/`from_row_with` treat a tag mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodePolicy {
    /// Tag mismatch is an error
    #[default]
    Strict,
    /// Coerce, falling back to the type's zero value
    Lenient,
}

/// Runs a lenient conversion, logging every coercion and fallback.
pub(crate) fn lenient<T>(
    value: StorageValue,
    kind: StorageKind,
    convert: impl FnOnce(&StorageValue) -> Option<T>,
    fallback: T,
) -> T {
    let got = value.kind();
    match convert(&value) {
        Some(converted) => {
            if got != kind.physical() {
                tracing::debug!(
                    target: "structcast::codec",
                    expected = %kind,
                    got = %got,
                    "Coerced storage value"
                );
            }
            converted
        }
        None => {
            tracing::warn!(
                target: "structcast::codec",
                expected = %kind,
                got = %got,
                "Storage value not convertible, using default"
            );
            fallback
        }
    }
}

pub(crate) fn coerce_bool(value: &StorageValue) -> Option<bool> {
    match value {
        StorageValue::Bool(b) => Some(*b),
        StorageValue::Int32(i) => Some(*i != 0),
        StorageValue::Int64(i) => Some(*i != 0),
        StorageValue::Double(d) => Some(*d != 0.0),
        StorageValue::Text(s) => {
            Some(!(s.is_empty() || s == "0" || s.eq_ignore_ascii_case("false")))
        }
    }
}

pub(crate) fn coerce_i64(value: &StorageValue) -> Option<i64> {
    match value {
        StorageValue::Bool(b) => Some(i64::from(*b)),
        StorageValue::Int32(i) => Some(i64::from(*i)),
        StorageValue::Int64(i) => Some(*i),
        StorageValue::Double(d) if d.is_nan() => None,
        // `as` saturates at the bounds
        StorageValue::Double(d) => Some(*d as i64),
        StorageValue::Text(s) => s.trim().parse().ok(),
    }
}

pub(crate) fn coerce_i32(value: &StorageValue) -> Option<i32> {
    match value {
        StorageValue::Int32(i) => Some(*i),
        StorageValue::Text(s) => s.trim().parse().ok(),
        other => {
            coerce_i64(other).map(|i| i.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32)
        }
    }
}

pub(crate) fn coerce_f64(value: &StorageValue) -> Option<f64> {
    match value {
        StorageValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        StorageValue::Int32(i) => Some(f64::from(*i)),
        StorageValue::Int64(i) => Some(*i as f64),
        StorageValue::Double(d) => Some(*d),
        StorageValue::Text(s) => s.trim().parse().ok(),
    }
}

pub(crate) fn coerce_text(value: &StorageValue) -> Option<String> {
    Some(value.to_text())
}

pub(crate) fn coerce_timestamp(value: &StorageValue) -> Option<DateTime<Utc>> {
    match value {
        StorageValue::Text(s) => {
            let s = s.trim();
            match s.parse::<i64>() {
                Ok(millis) => DateTime::<Utc>::from_timestamp_millis(millis),
                Err(_) => DateTime::<FixedOffset>::parse_from_rfc3339(s)
                    .ok()
                    .map(|dt| dt.with_timezone(&Utc)),
            }
        }
        StorageValue::Bool(_) => None,
        other => coerce_i64(other).and_then(DateTime::<Utc>::from_timestamp_millis),
    }
}
