//! StorageValue and StorageKind: the closed storage-safe type set
//!
//! # Kinds
//!
//! ```text
//! StorageKind   TypeName    physical StorageValue
//! Bool          "Bool"      Bool(bool)
//! Int32         "Integer"   Int32(i32)
//! Int64         "Int64"     Int64(i64)
//! Double        "Double"    Double(f64)
//! Text          "String"    Text(String)
//! Timestamp     "DateTime"  Int64(milliseconds since the Unix epoch)
//! ```
//!
//! A timestamp has no storage tag of its own; JSON and SQL both carry it as a
//! 64-bit integer, so `StorageValue` only has five physical variants.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// The six storage-safe kinds.
///
/// Each kind owns one stable type name, used as a schema/column-type tag by
/// persistence layers. Adding a kind means adding a variant here and an arm
/// to every match below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageKind {
    /// Boolean
    Bool,
    /// 32-bit signed integer
    #[serde(rename = "Integer")]
    Int32,
    /// 64-bit signed integer
    Int64,
    /// IEEE-754 double
    Double,
    /// UTF-8 text
    #[serde(rename = "String")]
    Text,
    /// Instant, stored as milliseconds since the Unix epoch
    #[serde(rename = "DateTime")]
    Timestamp,
}

impl StorageKind {
    /// All kinds (for iteration)
    pub const ALL: [StorageKind; 6] = [
        StorageKind::Bool,
        StorageKind::Int32,
        StorageKind::Int64,
        StorageKind::Double,
        StorageKind::Text,
        StorageKind::Timestamp,
    ];

    /// Stable type name
    pub const fn type_name(&self) -> &'static str {
        match self {
            StorageKind::Bool => "Bool",
            StorageKind::Int32 => "Integer",
            StorageKind::Int64 => "Int64",
            StorageKind::Double => "Double",
            StorageKind::Text => "String",
            StorageKind::Timestamp => "DateTime",
        }
    }

    /// Parse from a type name
    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.type_name() == name)
    }

    /// Kind of the `StorageValue` this kind travels as
    pub const fn physical(&self) -> StorageKind {
        match self {
            StorageKind::Timestamp => StorageKind::Int64,
            other => *other,
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A value restricted to the storage-safe set.
///
/// Produced by `Storable::to_storage`, consumed by JSON/SQL collaborators.
/// Carries no reference to the aggregate it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StorageValue {
    /// Boolean
    Bool(bool),
    /// 32-bit signed integer
    Int32(i32),
    /// 64-bit signed integer (also timestamps, as milliseconds)
    Int64(i64),
    /// IEEE-754 double
    Double(f64),
    /// UTF-8 text
    Text(String),
}

impl StorageValue {
    /// Physical kind of this value (never `Timestamp`)
    pub const fn kind(&self) -> StorageKind {
        match self {
            StorageValue::Bool(_) => StorageKind::Bool,
            StorageValue::Int32(_) => StorageKind::Int32,
            StorageValue::Int64(_) => StorageKind::Int64,
            StorageValue::Double(_) => StorageKind::Double,
            StorageValue::Text(_) => StorageKind::Text,
        }
    }

    /// Get as bool if this is a Bool value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            StorageValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as i32 if this is an Int32 value
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            StorageValue::Int32(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as i64 if this is an Int64 value
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            StorageValue::Int64(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as f64 if this is a Double value
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            StorageValue::Double(d) => Some(*d),
            _ => None,
        }
    }

    /// Get as &str if this is a Text value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            StorageValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Text form for text-only media.
    ///
    /// Bool is `"0"`/`"1"`, numbers are their shortest round-trip decimal
    /// form, text is passed through.
    pub fn to_text(&self) -> String {
        match self {
            StorageValue::Bool(b) => String::from(if *b { "1" } else { "0" }),
            StorageValue::Int32(i) => i.to_string(),
            StorageValue::Int64(i) => i.to_string(),
            StorageValue::Double(d) => d.to_string(),
            StorageValue::Text(s) => s.clone(),
        }
    }

    /// Parse the text form of `kind` back into its physical value.
    ///
    /// Inverse of [`StorageValue::to_text`]. Bool only accepts `"0"`/`"1"`.
    pub fn parse(kind: StorageKind, text: &str) -> Result<StorageValue> {
        let invalid = || Error::InvalidText {
            kind,
            text: text.to_string(),
        };
        match kind {
            StorageKind::Bool => match text {
                "0" => Ok(StorageValue::Bool(false)),
                "1" => Ok(StorageValue::Bool(true)),
                _ => Err(invalid()),
            },
            StorageKind::Int32 => text.parse().map(StorageValue::Int32).map_err(|_| invalid()),
            StorageKind::Int64 | StorageKind::Timestamp => {
                text.parse().map(StorageValue::Int64).map_err(|_| invalid())
            }
            StorageKind::Double => text.parse().map(StorageValue::Double).map_err(|_| invalid()),
            StorageKind::Text => Ok(StorageValue::Text(text.to_string())),
        }
    }
}

// ============================================================================
// From implementations
// ============================================================================

impl From<bool> for StorageValue {
    fn from(b: bool) -> Self {
        StorageValue::Bool(b)
    }
}

impl From<i32> for StorageValue {
    fn from(i: i32) -> Self {
        StorageValue::Int32(i)
    }
}

impl From<i64> for StorageValue {
    fn from(i: i64) -> Self {
        StorageValue::Int64(i)
    }
}

impl From<f64> for StorageValue {
    fn from(d: f64) -> Self {
        StorageValue::Double(d)
    }
}

impl From<String> for StorageValue {
    fn from(s: String) -> Self {
        StorageValue::Text(s)
    }
}

impl From<&str> for StorageValue {
    fn from(s: &str) -> Self {
        StorageValue::Text(s.to_string())
    }
}
