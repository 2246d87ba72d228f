//! Error type shared by the trees and lists.
//!
//! Every variant describes a caller bug (querying an empty tree, removing a
//! key that was never inserted, overflowing a fixed capacity) rather than a
//! transient condition. Nothing in the crate retries or degrades on these; they
//! surface immediately to the caller.

use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by the index-linked collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    #[error("collection is empty")]
    Empty,

    #[error("no element compares equal to the key")]
    NotFound,

    #[error("capacity of {capacity} slots exhausted")]
    CapacityExceeded { capacity: usize },

    #[error("position {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("capacity {requested} exceeds the index type limit of {limit} slots")]
    InvalidCapacity { requested: usize, limit: usize },

    #[error("failed to reserve storage for {capacity} slots")]
    AllocationFailed { capacity: usize },

    #[error("arena corrupted at slot {index}: {reason}")]
    Corrupted { index: usize, reason: &'static str },
}
