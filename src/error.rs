//! Error type for table operations.

use crate::value::ValueKind;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = TableError> = std::result::Result<T, E>;

/// Failures reported by [`Table`](crate::Table) and [`RawTable`](crate::RawTable).
///
/// Every error leaves the table exactly as it was before the failing call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// Doubling the slot array would overflow `usize` or pass the configured limit.
    #[error("capacity overflow: cannot grow past {capacity} slots (limit {limit})")]
    CapacityOverflow { capacity: usize, limit: usize },

    /// The allocator refused a slot array, key or value buffer.
    #[error("allocation failure: could not reserve {requested} elements")]
    AllocationFailure { requested: usize },

    /// A write of one kind was aimed at a key that holds the other kind.
    #[error("value kind mismatch for key {key:?}: stored {stored}, incoming {incoming}")]
    KindMismatch {
        key: String,
        stored: ValueKind,
        incoming: ValueKind,
    },
}
