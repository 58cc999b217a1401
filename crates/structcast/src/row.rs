//! Rows: the storage-value form of an aggregate's ordered sequence

use crate::aggregate::Aggregate;
use crate::convert::Storable;
use crate::error::{Error, Result};
use crate::policy::DecodePolicy;
use crate::predicates::check_arity;
use crate::value::StorageValue;

/// One storage value per field, in declaration order.
pub type Row = Vec<StorageValue>;

/// Sequential field decoder used by `Aggregate::from_row_with`.
///
/// Construction checks the row length against the aggregate's arity; each
/// `decode` call then consumes the next value and attaches the field's index
/// and name to any error.
pub struct RowDecoder {
    aggregate: &'static str,
    names: &'static [&'static str],
    values: std::vec::IntoIter<StorageValue>,
    policy: DecodePolicy,
    index: usize,
}

impl RowDecoder {
    /// Start decoding `row` as a `T`.
    pub fn new<T: Aggregate>(row: Row, policy: DecodePolicy) -> Result<Self> {
        check_arity(T::NAME, T::ARITY, row.len())?;
        Ok(RowDecoder {
            aggregate: T::NAME,
            names: T::FIELD_NAMES,
            values: row.into_iter(),
            policy,
            index: 0,
        })
    }

    /// Decode the next field as an `F`.
    pub fn decode<F: Storable>(&mut self) -> Result<F> {
        let index = self.index;
        let name = self.names.get(index).copied().unwrap_or("?");
        let value = self.values.next().ok_or(Error::ArityMismatch {
            aggregate: self.aggregate,
            expected: self.names.len(),
            got: index,
        })?;
        self.index += 1;

        tracing::trace!(
            target: "structcast::row",
            aggregate = self.aggregate,
            field = name,
            index,
            "Decoding field"
        );

        F::from_storage_with(value, self.policy).map_err(|e| {
            tracing::debug!(
                target: "structcast::row",
                aggregate = self.aggregate,
                field = name,
                index,
                error = %e,
                "Field decode failed"
            );
            Error::Field {
                index,
                name,
                source: Box::new(e),
            }
        })
    }

    /// Finish decoding; every value must have been consumed.
    pub fn finish(self) -> Result<()> {
        let remaining = self.values.len();
        if remaining == 0 {
            return Ok(());
        }
        Err(Error::ArityMismatch {
            aggregate: self.aggregate,
            expected: self.index,
            got: self.index + remaining,
        })
    }
}
