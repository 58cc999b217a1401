//! The `Aggregate` trait: arity, type list and the sequence bridge
//!
//! Implemented by `#[derive(Aggregate)]` for plain structs, and here for
//! tuples of up to twelve storage-safe elements.
//!
//! # Example
//!
//! ```ignore
//! use structcast::{Aggregate, StorageValue};
//!
//! #[derive(Aggregate, Debug, PartialEq)]
//! struct Person {
//!     pub age: i32,
//!     pub name: String,
//! }
//!
//! let ann = Person { age: 30, name: "Ann".to_string() };
//! assert_eq!(Person::ARITY, 2);
//! assert_eq!(ann.to_row(), vec![StorageValue::Int32(30), StorageValue::from("Ann")]);
//!
//! let (age, name) = ann.decompose_ref();
//! assert_eq!((*age, name.as_str()), (30, "Ann"));
//!
//! let fields = ann.decompose();
//! assert_eq!(fields, (30, "Ann".to_string()));
//! ```

use serde::Serialize;

use crate::convert::Storable;
use crate::error::{Error, Result};
use crate::policy::DecodePolicy;
use crate::predicates::check_arity;
use crate::row::{Row, RowDecoder};
use crate::value::{StorageKind, StorageValue};

/// A type fully described by an ordered list of storage-safe fields.
///
/// `ARITY`, `Fields`, `FIELD_NAMES` and `FIELD_KINDS` are properties of the
/// type and are fixed at compile time. All methods are pure.
pub trait Aggregate: Sized {
    /// Type name used in error messages
    const NAME: &'static str;

    /// Number of fields
    const ARITY: usize;

    /// Field names in declaration order; tuple fields are named by index
    const FIELD_NAMES: &'static [&'static str];

    /// Storage kind of each field in declaration order
    const FIELD_KINDS: &'static [StorageKind];

    /// Tuple of the native field types in declaration order
    type Fields;

    /// Tuple of shared references to the fields, in declaration order
    type FieldRefs<'a>
    where
        Self: 'a;

    /// Move the fields out, in declaration order
    fn decompose(self) -> Self::Fields;

    /// Borrow every field, in declaration order; the instance is only read
    fn decompose_ref(&self) -> Self::FieldRefs<'_>;

    /// Build from fields in declaration order
    fn compose(fields: Self::Fields) -> Self;

    /// Convert every field to its storage value
    fn to_row(&self) -> Row;

    /// Convert every field to its storage text
    fn to_text_row(&self) -> Vec<String>;

    /// Build from storage values under `policy`.
    ///
    /// Fails with `ArityMismatch` when `row.len() != ARITY`; never truncates
    /// or pads.
    fn from_row_with(row: Row, policy: DecodePolicy) -> Result<Self>;

    /// Build from storage values; tag mismatches are errors
    fn from_row(row: Row) -> Result<Self> {
        Self::from_row_with(row, DecodePolicy::Strict)
    }

    /// Build from storage text, one entry per field
    fn from_text_row<S: AsRef<str>>(texts: &[S]) -> Result<Self> {
        check_arity(Self::NAME, Self::ARITY, texts.len())?;
        let row = Self::schema()
            .into_iter()
            .zip(texts)
            .map(|(field, text)| {
                StorageValue::parse(field.kind, text.as_ref()).map_err(|e| Error::Field {
                    index: field.index,
                    name: field.name,
                    source: Box::new(e),
                })
            })
            .collect::<Result<Row>>()?;
        Self::from_row(row)
    }

    /// Per-field schema in declaration order
    fn schema() -> Vec<FieldSchema> {
        Self::FIELD_NAMES
            .iter()
            .zip(Self::FIELD_KINDS)
            .enumerate()
            .map(|(index, (name, kind))| FieldSchema {
                index,
                name: *name,
                kind: *kind,
            })
            .collect()
    }
}

/// Schema entry for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSchema {
    /// Position in declaration order
    pub index: usize,
    /// Declared name
    pub name: &'static str,
    /// Storage kind
    pub kind: StorageKind,
}

impl FieldSchema {
    /// Type name of the field's kind
    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }
}

// ============================================================================
// Tuple Implementations
// ============================================================================

impl Aggregate for () {
    const NAME: &'static str = "()";
    const ARITY: usize = 0;
    const FIELD_NAMES: &'static [&'static str] = &[];
    const FIELD_KINDS: &'static [StorageKind] = &[];

    type Fields = ();
    type FieldRefs<'a> = ();

    fn decompose(self) -> Self::Fields {}

    fn decompose_ref(&self) -> Self::FieldRefs<'_> {}

    fn compose(_fields: Self::Fields) -> Self {}

    fn to_row(&self) -> Row {
        Vec::new()
    }

    fn to_text_row(&self) -> Vec<String> {
        Vec::new()
    }

    fn from_row_with(row: Row, _policy: DecodePolicy) -> Result<Self> {
        check_arity(Self::NAME, 0, row.len())
    }
}

macro_rules! tuple_aggregate {
    ($arity:expr; $($ty:ident $idx:tt),+) => {
        impl<$($ty: Storable),+> Aggregate for ($($ty,)+) {
            const NAME: &'static str = "tuple";
            const ARITY: usize = $arity;
            const FIELD_NAMES: &'static [&'static str] = &[$(stringify!($idx)),+];
            const FIELD_KINDS: &'static [StorageKind] = &[$($ty::KIND),+];

            type Fields = Self;
            type FieldRefs<'a> = ($(&'a $ty,)+) where Self: 'a;

            fn decompose(self) -> Self::Fields {
                self
            }

            fn decompose_ref(&self) -> Self::FieldRefs<'_> {
                ($(&self.$idx,)+)
            }

            fn compose(fields: Self::Fields) -> Self {
                fields
            }

            fn to_row(&self) -> Row {
                vec![$(self.$idx.to_storage()),+]
            }

            fn to_text_row(&self) -> Vec<String> {
                vec![$(self.$idx.to_storage_text()),+]
            }

            fn from_row_with(row: Row, policy: DecodePolicy) -> Result<Self> {
                let mut decoder = RowDecoder::new::<Self>(row, policy)?;
                let value = ($(decoder.decode::<$ty>()?,)+);
                decoder.finish()?;
                Ok(value)
            }
        }
    };
}

tuple_aggregate!(1; A 0);
tuple_aggregate!(2; A 0, B 1);
tuple_aggregate!(3; A 0, B 1, C 2);
tuple_aggregate!(4; A 0, B 1, C 2, D 3);
tuple_aggregate!(5; A 0, B 1, C 2, D 3, E 4);
tuple_aggregate!(6; A 0, B 1, C 2, D 3, E 4, F 5);
tuple_aggregate!(7; A 0, B 1, C 2, D 3, E 4, F 5, G 6);
tuple_aggregate!(8; A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7);
tuple_aggregate!(9; A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8);
tuple_aggregate!(10; A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9);
tuple_aggregate!(11; A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9, K 10);
tuple_aggregate!(12; A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9, K 10, L 11);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tuple_arity_and_kinds() {
        assert_eq!(<()>::ARITY, 0);
        assert_eq!(<(bool,)>::ARITY, 1);
        assert_eq!(<(i32, String)>::FIELD_KINDS, &[StorageKind::Int32, StorageKind::Text]);
        assert_eq!(<(i32, String)>::FIELD_NAMES, &["0", "1"]);
    }

    #[test]
    fn test_tuple_row_roundtrip() {
        let value = (7i64, true, 0.5f64);
        let row = value.to_row();
        assert_eq!(
            row,
            vec![StorageValue::Int64(7), StorageValue::Bool(true), StorageValue::Double(0.5)]
        );
        assert_eq!(<(i64, bool, f64)>::from_row(row).unwrap(), value);
    }

    #[test]
    fn test_unit_rejects_values() {
        assert!(<()>::from_row(Vec::new()).is_ok());
        assert!(matches!(
            <()>::from_row(vec![StorageValue::Bool(true)]),
            Err(Error::ArityMismatch {
                expected: 0,
                got: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_from_text_row() {
        let value = <(bool, i32, String)>::from_text_row(&["1", "-3", "x"]).unwrap();
        assert_eq!(value, (true, -3, "x".to_string()));

        let err = <(bool, i32, String)>::from_text_row(&["1", "three", "x"]).unwrap_err();
        assert!(matches!(err, Error::Field { index: 1, .. }));

        let err = <(bool, i32)>::from_text_row(&["1"]).unwrap_err();
        assert!(matches!(err, Error::ArityMismatch { expected: 2, got: 1, .. }));
    }

    #[test]
    fn test_schema() {
        let schema = <(i64, String)>::schema();
        assert_eq!(schema.len(), 2);
        assert_eq!(schema[1].index, 1);
        assert_eq!(schema[1].name, "1");
        assert_eq!(schema[1].type_name(), "String");
    }

    #[test]
    fn test_tuple_decompose_ref() {
        let value = (1i32, "a".to_string());
        let (first, second) = value.decompose_ref();
        assert_eq!(*first, 1);
        assert_eq!(second, "a");
        assert_eq!(value.decompose_ref(), (&1, &"a".to_string()));
    }

    #[test]
    fn test_twelve_tuple() {
        type Wide = (i32, i32, i32, i32, i32, i32, i32, i32, i32, i32, i32, i32);
        let value: Wide = (0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11);
        assert_eq!(<Wide>::ARITY, 12);
        assert_eq!(<Wide>::from_row(value.to_row()).unwrap(), value);
    }
}
