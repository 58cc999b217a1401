//! The `Storable` codec: native field values <-> storage values
//!
//! Implemented for exactly six native types, one per `StorageKind`:
//!
//! | native | kind | `to_storage` |
//! |--------|------|--------------|
//! | `bool` | Bool | `Bool(v)` |
//! | `i32` | Int32 | `Int32(v)` |
//! | `i64` | Int64 | `Int64(v)` |
//! | `f64` | Double | `Double(v)` |
//! | `String` | Text | `Text(v)` |
//! | `DateTime<Utc>` | Timestamp | `Int64(milliseconds since epoch)` |
//!
//! Timestamps keep only the instant to millisecond precision; anything finer
//! is truncated. There is no blanket or fallback impl: a field
//! type without an impl here fails to compile wherever it is used.

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::policy::{self, DecodePolicy};
use crate::value::{StorageKind, StorageValue};

/// Convert a native field value to and from its storage-safe form.
pub trait Storable: Sized {
    /// Storage kind of this native type
    const KIND: StorageKind;

    /// Stable type name for schemas
    fn type_name() -> &'static str {
        Self::KIND.type_name()
    }

    /// Convert to a storage value
    fn to_storage(&self) -> StorageValue;

    /// Convert to text, for media that only accept text
    fn to_storage_text(&self) -> String {
        self.to_storage().to_text()
    }

    /// Convert from a storage value; a tag mismatch is an error
    fn from_storage(value: StorageValue) -> Result<Self>;

    /// Convert from a storage value, coercing mismatched tags
    fn from_storage_lenient(value: StorageValue) -> Self;

    /// Convert from a storage value under `policy`
    fn from_storage_with(value: StorageValue, policy: DecodePolicy) -> Result<Self> {
        match policy {
            DecodePolicy::Strict => Self::from_storage(value),
            DecodePolicy::Lenient => Ok(Self::from_storage_lenient(value)),
        }
    }

    /// Parse the output of [`Storable::to_storage_text`]
    fn from_storage_text(text: &str) -> Result<Self> {
        Self::from_storage(StorageValue::parse(Self::KIND, text)?)
    }
}

fn mismatch(expected: StorageKind, value: &StorageValue) -> Error {
    Error::TypeMismatch {
        expected,
        got: value.kind(),
    }
}

// ============================================================================
// Primitive Type Implementations
// ============================================================================

impl Storable for bool {
    const KIND: StorageKind = StorageKind::Bool;

    fn to_storage(&self) -> StorageValue {
        StorageValue::Bool(*self)
    }

    fn from_storage(value: StorageValue) -> Result<Self> {
        value.as_bool().ok_or_else(|| mismatch(Self::KIND, &value))
    }

    fn from_storage_lenient(value: StorageValue) -> Self {
        policy::lenient(value, Self::KIND, policy::coerce_bool, false)
    }
}

impl Storable for i32 {
    const KIND: StorageKind = StorageKind::Int32;

    fn to_storage(&self) -> StorageValue {
        StorageValue::Int32(*self)
    }

    fn from_storage(value: StorageValue) -> Result<Self> {
        value.as_i32().ok_or_else(|| mismatch(Self::KIND, &value))
    }

    fn from_storage_lenient(value: StorageValue) -> Self {
        policy::lenient(value, Self::KIND, policy::coerce_i32, 0)
    }
}

impl Storable for i64 {
    const KIND: StorageKind = StorageKind::Int64;

    fn to_storage(&self) -> StorageValue {
        StorageValue::Int64(*self)
    }

    fn from_storage(value: StorageValue) -> Result<Self> {
        value.as_i64().ok_or_else(|| mismatch(Self::KIND, &value))
    }

    fn from_storage_lenient(value: StorageValue) -> Self {
        policy::lenient(value, Self::KIND, policy::coerce_i64, 0)
    }
}

impl Storable for f64 {
    const KIND: StorageKind = StorageKind::Double;

    fn to_storage(&self) -> StorageValue {
        StorageValue::Double(*self)
    }

    fn from_storage(value: StorageValue) -> Result<Self> {
        value.as_f64().ok_or_else(|| mismatch(Self::KIND, &value))
    }

    fn from_storage_lenient(value: StorageValue) -> Self {
        policy::lenient(value, Self::KIND, policy::coerce_f64, 0.0)
    }
}

impl Storable for String {
    const KIND: StorageKind = StorageKind::Text;

    fn to_storage(&self) -> StorageValue {
        StorageValue::Text(self.clone())
    }

    fn to_storage_text(&self) -> String {
        self.clone()
    }

    fn from_storage(value: StorageValue) -> Result<Self> {
        match value {
            StorageValue::Text(s) => Ok(s),
            other => Err(mismatch(Self::KIND, &other)),
        }
    }

    fn from_storage_lenient(value: StorageValue) -> Self {
        match value {
            StorageValue::Text(s) => s,
            other => policy::lenient(other, Self::KIND, policy::coerce_text, String::new()),
        }
    }

    fn from_storage_text(text: &str) -> Result<Self> {
        Ok(text.to_string())
    }
}

impl Storable for DateTime<Utc> {
    const KIND: StorageKind = StorageKind::Timestamp;

    fn to_storage(&self) -> StorageValue {
        StorageValue::Int64(self.timestamp_millis())
    }

    fn from_storage(value: StorageValue) -> Result<Self> {
        let millis = value.as_i64().ok_or_else(|| mismatch(Self::KIND, &value))?;
        DateTime::<Utc>::from_timestamp_millis(millis).ok_or(Error::TimestampOutOfRange(millis))
    }

    fn from_storage_lenient(value: StorageValue) -> Self {
        // Unix epoch
        policy::lenient(value, Self::KIND, policy::coerce_timestamp, DateTime::<Utc>::default())
    }
}
