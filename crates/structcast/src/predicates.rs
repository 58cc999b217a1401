//! Constructibility predicates and the positional arity probe
//!
//! The derive reads the arity straight off the declaration. The predicates
//! here state what that number means: an aggregate is built from exactly
//! `ARITY` positional values, and a positional list of `n` values can only
//! start a build of `T` when `n <= ARITY`. That second predicate is monotone,
//! so the arity is also the largest accepted `n`, found by binary search in
//! [`probe_arity`].

use crate::aggregate::Aggregate;
use crate::error::{Error, Result};

/// True iff `T` is built from exactly `n` positional values.
pub const fn is_strictly_constructible<T: Aggregate>(n: usize) -> bool {
    n == T::ARITY
}

/// True iff `n` positional values fit `T`'s field list.
pub const fn accepts_positional<T: Aggregate>(n: usize) -> bool {
    n <= T::ARITY
}

/// Binary search for the largest `n` in `[0, upper]` accepted by `accepts`.
///
/// `accepts` must be monotone (true up to some bound, false after it) and
/// `accepts(0)` is assumed. When the search collapses to 0 the probed type
/// must be empty: `None` is returned for a non-empty type, which means the
/// type is not a positional aggregate at all, as opposed to `Some(0)`.
pub fn probe_arity(
    upper: usize,
    is_empty: bool,
    mut accepts: impl FnMut(usize) -> bool,
) -> Option<usize> {
    let (mut low, mut high) = (0usize, upper.saturating_add(1));
    loop {
        let mid = low + (high - low) / 2;
        if mid == 0 {
            return is_empty.then_some(0);
        }
        if mid == low {
            return Some(mid);
        }
        if accepts(mid) {
            low = mid;
        } else {
            high = mid;
        }
    }
}

/// Probe `T`'s arity through [`accepts_positional`].
///
/// Every storage-safe field occupies at least one byte, so the size of `T`
/// bounds the search.
pub fn detect_arity<T: Aggregate>() -> Option<usize> {
    let size = std::mem::size_of::<T>();
    probe_arity(size, size == 0, accepts_positional::<T>)
}

/// Check that a sequence of `got` values can compose `aggregate`.
pub fn check_arity(aggregate: &'static str, expected: usize, got: usize) -> Result<()> {
    if expected == got {
        return Ok(());
    }
    tracing::debug!(
        target: "structcast::row",
        aggregate,
        expected,
        got,
        "Rejected sequence with wrong length"
    );
    Err(Error::ArityMismatch {
        aggregate,
        expected,
        got,
    })
}
