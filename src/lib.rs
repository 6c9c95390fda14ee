//! # bucket-set
//!
//! Hash sets that partition their elements into a fixed number of chained
//! buckets, with the hash and equality functions supplied explicitly.
//!
//! ## Overview
//!
//! An element lives in bucket `hash(element) mod bucket_count`. Membership
//! testing hashes the query, jumps to that one bucket, and scans its chain,
//! which turns an O(n) scan into roughly O(n / bucket count) under an even
//! hash. The bucket count is fixed at construction; there is no resizing
//! and no deletion.
//!
//! - **Capabilities**: [`HashFunction`] and [`EqualityFunction`] are bound
//!   on the container rather than taken from the element type, so closures
//!   work as well as `Hash`/`PartialEq`
//! - **[`BucketSet`]**: mutable, single-owner set
//! - **`PersistentBucketSet`**: immutable set; inserts return new versions
//!   that share every untouched bucket
//! - **`ConcurrentBucketSet`**: one read-write lock per bucket
//!
//! ## Feature Flags
//!
//! - `persistent`: `PersistentBucketSet` (default)
//! - `concurrent`: `ConcurrentBucketSet` (default)
//! - `arc`: back persistent sets with `Arc` so versions are `Send + Sync`
//! - `rayon`: `par_iter` on [`BucketSet`] and `PersistentBucketSet`
//! - `serde`: serialization of configs and sets
//! - `fxhash`, `ahash`: alternative deterministic hash capabilities
//! - `full`: `persistent`, `concurrent`, and `serde`
//!
//! ## Example
//!
//! ```rust
//! use bucket_set::prelude::*;
//!
//! let mut set = BucketSet::new(4).unwrap();
//! set.insert("alpha");
//! set.insert("beta");
//!
//! assert!(set.contains(&"alpha"));
//! assert!(!set.contains(&"gamma"));
//!
//! // Zero and negative bucket counts are rejected
//! assert!(matches!(
//!     BucketSet::<&str>::new(0),
//!     Err(BucketSetError::InvalidArgument { .. })
//! ));
//! ```
//!
//! ## Logging
//!
//! Construction, conversions, and inserts emit [`tracing`] events at
//! `debug` and `trace` level. Install any subscriber to see them.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use bucket_set::prelude::*;
/// ```
pub mod prelude {
    pub use crate::capability::*;
    pub use crate::config::*;
    pub use crate::error::BucketSetError;
    pub use crate::set::*;
}

pub mod capability;
pub mod config;
pub mod error;
pub mod set;

pub use capability::{Capabilities, EqualityFunction, HashFunction, NaturalEquality, StandardHash};
#[cfg(feature = "ahash")]
pub use capability::AHash;
#[cfg(feature = "fxhash")]
pub use capability::FxHash;
pub use config::{BucketCount, BucketSetConfig, DuplicatePolicy};
pub use error::{BucketSetError, Result};
pub use set::{BucketSet, BucketSetIntoIterator, BucketSetIterator, BucketStatistics};
#[cfg(feature = "concurrent")]
pub use set::ConcurrentBucketSet;
#[cfg(feature = "persistent")]
pub use set::{PersistentBucketSet, PersistentBucketSetIterator};
