//! Errors reported by the structures of this crate.

use thiserror::Error;

/// Errors raised while constructing a [`BucketMap`](crate::bucketmap::BucketMap).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum BucketMapError {
    /// The requested number of buckets can not back a map. A map needs at
    /// least one bucket, and the count must fit the signed modulus used to
    /// place keys.
    #[error("Illegal number of buckets: {0}")]
    IllegalBucketCount(usize),
}

/// Errors raised by a [`BlockingQueue`](crate::queue::BlockingQueue).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum QueueError {
    /// The dequeuer was interrupted while waiting on an empty queue. No
    /// element was consumed.
    #[error("Interrupted while waiting for an element")]
    Interrupted,
}
