//! Lockbucket - Lock based concurrent building blocks
//!
//! This crate provides two small structures that may be shared between threads
//! without any further synchronisation.
//!
//! * [`BucketMap`] - a hashmap with a fixed number of buckets, where each bucket
//!   has its own mutex. Keys in different buckets never contend, keys in the
//!   same bucket are serialised.
//! * [`BlockingQueue`] - an unbounded FIFO queue guarded by a single mutex and
//!   condition variable, where dequeue waits for an element to arrive.
//!
//! The structures are independent and share no state. Neither resizes, bounds
//! its size, nor offers iteration.
//!
//! # Features
//!
//! * `foldhash` - use the foldhash crate as the default `BucketMap` hasher
//! * `ahash` - use the cpu accelerated ahash crate as the default hasher
//!
//! `foldhash` is enabled by default. With neither feature, std's `RandomState`
//! is used.

#![deny(warnings)]
#![warn(unused_extern_crates)]
#![warn(missing_docs)]

pub mod bucketmap;
pub mod error;
pub mod queue;

// Shared helpers for key placement and bucket scans.
mod utils;

pub use bucketmap::BucketMap;
pub use error::{BucketMapError, QueueError};
pub use queue::{BlockingQueue, Interrupt};
