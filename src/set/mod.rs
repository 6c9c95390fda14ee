//! Fixed-bucket chained hash sets.
//!
//! Every container in this module partitions its elements into a fixed
//! number of buckets chosen at construction. An element lives in bucket
//! `hash(element) mod bucket_count`, and a membership query scans only
//! that bucket's chain.
//!
//! - [`BucketSet`]: mutable, single-owner set
//! - `PersistentBucketSet` (feature `persistent`): immutable set whose
//!   inserts return new versions sharing untouched buckets
//! - `ConcurrentBucketSet` (feature `concurrent`): set shared across
//!   threads with one lock per bucket
//!
//! None of them resize or delete: the bucket count is fixed and elements
//! stay until the set is dropped.
//!
//! # Examples
//!
//! ```rust
//! use bucket_set::BucketSet;
//!
//! let mut set = BucketSet::new(8).unwrap();
//! set.insert("apple");
//! set.insert("banana");
//!
//! assert!(set.contains(&"apple"));
//! assert!(!set.contains(&"cherry"));
//! assert_eq!(set.bucket_count(), 8);
//! ```

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type.
///
/// `std::sync::Arc` with the `arc` feature, so persistent versions can
/// cross threads; `std::rc::Rc` otherwise.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

mod bucket;
mod bucket_set;
#[cfg(feature = "concurrent")]
mod concurrent;
#[cfg(feature = "persistent")]
mod persistent;
mod statistics;

pub use bucket_set::BucketSet;
pub use bucket_set::BucketSetIntoIterator;
pub use bucket_set::BucketSetIterator;
#[cfg(feature = "concurrent")]
pub use concurrent::ConcurrentBucketSet;
#[cfg(feature = "persistent")]
pub use persistent::PersistentBucketSet;
#[cfg(feature = "persistent")]
pub use persistent::PersistentBucketSetIterator;
pub use statistics::BucketStatistics;

// =============================================================================
// Serde Representation
// =============================================================================

/// Wire shape shared by the serializable containers:
/// `{"config": {...}, "elements": [...]}`.
#[cfg(feature = "serde")]
#[derive(serde::Serialize)]
struct SerializedSet<'a, T> {
    config: crate::config::BucketSetConfig,
    elements: Vec<&'a T>,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct DeserializedSet<T> {
    config: crate::config::BucketSetConfig,
    elements: Vec<T>,
}
