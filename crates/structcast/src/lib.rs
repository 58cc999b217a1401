//! structcast - structural reflection and storage codec for plain aggregates
//!
//! This crate provides the runtime half of the library; `#[derive(Aggregate)]`
//! lives in `structcast-derive` and is re-exported here.
//!
//! - `Aggregate`: arity, ordered field type list, aggregate <-> tuple bridge
//! - `Storable`: native field value <-> `StorageValue` for the six
//!   storage-safe types (bool, i32, i64, f64, String, `DateTime<Utc>`)
//! - `Row`/`RowDecoder`: storage-value sequences with arity and tag checks
//!
//! Persistence collaborators (JSON writers, SQL binders) build a schema once
//! with [`schema`], write instances with `to_row`, and read them back with
//! `from_row`.
//!
//! # Example
//!
//! ```ignore
//! use structcast::{Aggregate, StorageValue};
//!
//! #[derive(Aggregate, Debug, PartialEq)]
//! pub struct Person {
//!     pub age: i32,
//!     pub name: String,
//! }
//!
//! assert_eq!(structcast::arity::<Person>(), 2);
//!
//! let row = vec![StorageValue::Int32(30), StorageValue::from("Ann")];
//! let ann = Person::from_row(row)?;
//! assert_eq!(ann.name, "Ann");
//! ```

#![warn(missing_docs)]

// Generated code names `::structcast`; make that resolve inside this crate too.
extern crate self as structcast;

pub mod aggregate;
pub mod convert;
pub mod error;
pub mod policy;
pub mod predicates;
pub mod row;
pub mod value;

pub use aggregate::{Aggregate, FieldSchema};
pub use convert::Storable;
pub use error::{Error, Result};
pub use policy::DecodePolicy;
pub use predicates::{
    accepts_positional, check_arity, detect_arity, is_strictly_constructible, probe_arity,
};
pub use row::{Row, RowDecoder};
pub use value::{StorageKind, StorageValue};

/// Derive macro for [`Aggregate`]
pub use structcast_derive::Aggregate;

// ============================================================================
// Aggregate operations
// ============================================================================

/// Number of fields in `T`
pub const fn arity<T: Aggregate>() -> usize {
    T::ARITY
}

/// Storage kind of each field of `T`, in declaration order
pub fn type_list<T: Aggregate>() -> &'static [StorageKind] {
    T::FIELD_KINDS
}

/// Per-field schema of `T`
pub fn schema<T: Aggregate>() -> Vec<FieldSchema> {
    T::schema()
}

/// Move the fields of `value` out into a tuple, in declaration order
pub fn decompose<T: Aggregate>(value: T) -> T::Fields {
    value.decompose()
}

/// Borrow the fields of `value` as a tuple of references, in declaration order
pub fn decompose_ref<T: Aggregate>(value: &T) -> T::FieldRefs<'_> {
    value.decompose_ref()
}

/// Build a `T` from a tuple of its fields
pub fn compose<T: Aggregate>(fields: T::Fields) -> T {
    T::compose(fields)
}

/// Build a `T` from storage values; fails on length or tag mismatch
pub fn compose_row<T: Aggregate>(row: Row) -> Result<T> {
    T::from_row(row)
}

// ============================================================================
// Field operations
// ============================================================================

/// Stable type name of the field type `F`
pub fn type_name<F: Storable>() -> &'static str {
    F::type_name()
}

/// Convert a field value to its storage value
pub fn to_storage<F: Storable>(value: &F) -> StorageValue {
    value.to_storage()
}

/// Convert a field value to its storage text
pub fn to_storage_text<F: Storable>(value: &F) -> String {
    value.to_storage_text()
}

/// Convert a storage value back to a field value; tag mismatch is an error
pub fn from_storage<F: Storable>(value: StorageValue) -> Result<F> {
    F::from_storage(value)
}
