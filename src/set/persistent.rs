//! Persistent (immutable) fixed-bucket hash set.
//!
//! [`PersistentBucketSet`] never changes once built. `insert` returns a new
//! version and leaves the receiver exactly as it was, so a set can be
//! handed out without any risk of the recipient changing what the owner
//! sees.
//!
//! # Structural Sharing
//!
//! The bucket spine and every chain sit behind reference counters. An
//! insert copies the spine (one pointer per bucket) and the single chain it
//! appends to; all other chains, and the capability pair, are shared
//! between the old and new versions.
//!
//! # Examples
//!
//! ```rust
//! use bucket_set::PersistentBucketSet;
//!
//! let base = PersistentBucketSet::new(4).unwrap().insert(1).insert(2);
//! let left = base.insert(3);
//! let right = base.insert(4);
//!
//! assert!(left.contains(&3) && !left.contains(&4));
//! assert!(right.contains(&4) && !right.contains(&3));
//! assert_eq!(base.len(), 2);
//! ```

use std::fmt;

use tracing::{debug, trace};

use super::bucket::{Bucket, empty_buckets};
use super::statistics::BucketStatistics;
use super::{BucketSet, ReferenceCounter};
use crate::capability::{
    Capabilities, EqualityFunction, HashFunction, NaturalEquality, StandardHash,
};
use crate::config::{BucketCount, BucketSetConfig, DuplicatePolicy};
use crate::error::{BucketSetError, Result};

// =============================================================================
// PersistentBucketSet Definition
// =============================================================================

/// An immutable hash set with a fixed number of chained buckets.
///
/// # Time Complexity
///
/// | Operation   | Complexity                          |
/// |-------------|-------------------------------------|
/// | `new`       | O(bucket count)                     |
/// | `clone`     | O(1)                                |
/// | `contains`  | O(chain length)                     |
/// | `insert`    | O(bucket count + chain length)      |
/// | `len`       | O(1)                                |
/// | `transient` | O(1) per unshared bucket, else copy |
///
/// With the `arc` feature the set is `Send + Sync` (for `Send + Sync`
/// elements and capabilities) and versions can be read from many threads.
pub struct PersistentBucketSet<T, H = StandardHash, E = NaturalEquality> {
    buckets: ReferenceCounter<[ReferenceCounter<Bucket<T>>]>,
    capabilities: ReferenceCounter<Capabilities<H, E>>,
    config: BucketSetConfig,
    len: usize,
}

#[cfg(not(feature = "arc"))]
static_assertions::assert_not_impl_any!(PersistentBucketSet<i32>: Send, Sync);

#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(PersistentBucketSet<i32>: Send, Sync);
#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(PersistentBucketSet<String>: Send, Sync);

impl<T> PersistentBucketSet<T> {
    /// Creates an empty set with `bucket_count` buckets and the standard
    /// capabilities.
    ///
    /// # Errors
    ///
    /// Returns [`BucketSetError::InvalidArgument`] if `bucket_count` is
    /// zero, negative, or does not fit in `usize`.
    pub fn new<C>(bucket_count: C) -> Result<Self>
    where
        C: TryInto<BucketCount>,
        BucketSetError: From<C::Error>,
    {
        BucketSetConfig::new(bucket_count)
            .and_then(Self::from_config)
            .inspect_err(|error| debug!(%error, "rejected persistent bucket set construction"))
    }

    /// Creates an empty set from `config` with the standard capabilities.
    ///
    /// # Errors
    ///
    /// Returns [`BucketSetError::InvalidArgument`] if the configured bucket
    /// count cannot be allocated.
    pub fn from_config(config: BucketSetConfig) -> Result<Self> {
        Self::with_capabilities(config, StandardHash, NaturalEquality)
    }
}

impl<T, H, E> PersistentBucketSet<T, H, E> {
    /// Creates an empty set from `config` with the given capability pair.
    ///
    /// # Errors
    ///
    /// Returns [`BucketSetError::InvalidArgument`] if the configured bucket
    /// count cannot be allocated.
    pub fn with_capabilities(config: BucketSetConfig, hash: H, equality: E) -> Result<Self> {
        let bucket_count = config.bucket_count().get();
        let buckets = empty_buckets::<T, ReferenceCounter<Bucket<T>>>(bucket_count)
            .inspect_err(|error| debug!(%error, "rejected persistent bucket set construction"))?;
        debug!(
            bucket_count,
            duplicate_policy = ?config.duplicate_policy(),
            "created persistent bucket set"
        );
        Ok(Self::from_parts(
            buckets,
            ReferenceCounter::new(Capabilities::new(hash, equality)),
            config,
            0,
        ))
    }

    pub(crate) fn from_parts(
        buckets: Vec<ReferenceCounter<Bucket<T>>>,
        capabilities: ReferenceCounter<Capabilities<H, E>>,
        config: BucketSetConfig,
        len: usize,
    ) -> Self {
        Self {
            buckets: buckets.into(),
            capabilities,
            config,
            len,
        }
    }

    /// Returns the number of stored elements.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the set holds no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the fixed number of buckets.
    #[inline]
    #[must_use]
    pub const fn bucket_count(&self) -> usize {
        self.config.bucket_count().get()
    }

    /// Returns how `insert` treats duplicates.
    #[inline]
    #[must_use]
    pub const fn duplicate_policy(&self) -> DuplicatePolicy {
        self.config.duplicate_policy()
    }

    /// Returns the config this set was built from.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> BucketSetConfig {
        self.config
    }

    /// Returns a read-only view of the chain at `index`.
    #[must_use]
    pub fn bucket(&self, index: usize) -> Option<&[T]> {
        self.buckets.get(index).map(|bucket| bucket.as_slice())
    }

    /// Returns an iterator over the elements, bucket by bucket.
    #[must_use]
    pub fn iter(&self) -> PersistentBucketSetIterator<'_, T> {
        PersistentBucketSetIterator {
            buckets: self.buckets.iter(),
            current: Default::default(),
            remaining: self.len,
        }
    }

    /// Summarizes how evenly elements are spread across buckets.
    #[must_use]
    pub fn statistics(&self) -> BucketStatistics {
        BucketStatistics::from_chain_lengths(self.buckets.iter().map(|bucket| bucket.len()))
    }
}

impl<T, H, E> PersistentBucketSet<T, H, E>
where
    H: HashFunction<T>,
{
    /// Returns the bucket `element` maps to.
    #[inline]
    #[must_use]
    pub fn bucket_index_of(&self, element: &T) -> usize {
        self.config
            .bucket_count()
            .index_of(self.capabilities.hash_code(element))
    }
}

impl<T, H, E> PersistentBucketSet<T, H, E>
where
    H: HashFunction<T>,
    E: EqualityFunction<T>,
{
    /// Returns `true` if an equivalent element is stored in the bucket
    /// `element` hashes to.
    #[must_use]
    pub fn contains(&self, element: &T) -> bool {
        self.buckets[self.bucket_index_of(element)].contains(element, self.capabilities.equality())
    }
}

impl<T, H, E> PersistentBucketSet<T, H, E>
where
    T: Clone,
    H: HashFunction<T>,
    E: EqualityFunction<T>,
{
    /// Returns a new version with `element` appended to its bucket.
    ///
    /// If the set deduplicates and an equivalent element is present, the
    /// returned version shares everything with `self`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bucket_set::PersistentBucketSet;
    ///
    /// let first = PersistentBucketSet::new(4).unwrap().insert("a");
    /// let second = first.insert("b");
    ///
    /// assert!(!first.contains(&"b"));
    /// assert!(second.contains(&"a") && second.contains(&"b"));
    /// ```
    #[must_use]
    pub fn insert(&self, element: T) -> Self {
        let index = self.bucket_index_of(&element);
        if self.duplicate_policy() == DuplicatePolicy::Deduplicate
            && self.buckets[index].contains(&element, self.capabilities.equality())
        {
            trace!(bucket = index, "ignored duplicate element");
            return self.clone();
        }

        let mut spine = self.buckets.to_vec();
        let bucket = ReferenceCounter::make_mut(&mut spine[index]);
        bucket.push(element);
        trace!(bucket = index, chain_length = bucket.len(), "inserted element into new version");

        Self::from_parts(
            spine,
            ReferenceCounter::clone(&self.capabilities),
            self.config,
            self.len + 1,
        )
    }
}

impl<T, H, E> PersistentBucketSet<T, H, E>
where
    T: Clone,
    H: Clone,
    E: Clone,
{
    /// Converts this version into a mutable [`BucketSet`].
    ///
    /// Chains that no other version shares are moved; shared chains are
    /// copied, so other versions are never affected.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bucket_set::PersistentBucketSet;
    ///
    /// let frozen = PersistentBucketSet::new(4).unwrap().insert(1);
    /// let mut thawed = frozen.clone().transient();
    /// thawed.insert(2);
    ///
    /// assert!(!frozen.contains(&2));
    /// assert!(thawed.contains(&1) && thawed.contains(&2));
    /// ```
    #[must_use]
    pub fn transient(self) -> BucketSet<T, H, E> {
        let Self {
            buckets,
            capabilities,
            config,
            len,
        } = self;
        let spine = buckets.to_vec();
        drop(buckets);

        debug!(
            bucket_count = config.bucket_count().get(),
            len, "thawed persistent bucket set into transient form"
        );
        BucketSet::from_parts(
            spine
                .into_iter()
                .map(ReferenceCounter::unwrap_or_clone)
                .collect(),
            ReferenceCounter::unwrap_or_clone(capabilities),
            config,
            len,
        )
    }
}

impl<T, H, E> Clone for PersistentBucketSet<T, H, E> {
    fn clone(&self) -> Self {
        Self {
            buckets: ReferenceCounter::clone(&self.buckets),
            capabilities: ReferenceCounter::clone(&self.capabilities),
            config: self.config,
            len: self.len,
        }
    }
}

// =============================================================================
// Iterator Implementations
// =============================================================================

/// An iterator over the elements of a [`PersistentBucketSet`].
pub struct PersistentBucketSetIterator<'a, T> {
    buckets: std::slice::Iter<'a, ReferenceCounter<Bucket<T>>>,
    current: std::slice::Iter<'a, T>,
    remaining: usize,
}

impl<'a, T> Iterator for PersistentBucketSetIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(element) = self.current.next() {
                self.remaining -= 1;
                return Some(element);
            }
            self.current = self.buckets.next()?.iter();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for PersistentBucketSetIterator<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<'a, T, H, E> IntoIterator for &'a PersistentBucketSet<T, H, E> {
    type Item = &'a T;
    type IntoIter = PersistentBucketSetIterator<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// =============================================================================
// Formatting
// =============================================================================

impl<T: fmt::Debug, H, E> fmt::Debug for PersistentBucketSet<T, H, E> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display, H, E> fmt::Display for PersistentBucketSet<T, H, E> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        for (position, element) in self.iter().enumerate() {
            if position > 0 {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{element}")?;
        }
        write!(formatter, "}}")
    }
}

// =============================================================================
// Rayon Integration
// =============================================================================

#[cfg(feature = "rayon")]
impl<T: Send + Sync, H, E> PersistentBucketSet<T, H, E> {
    /// Returns a parallel iterator over the elements.
    pub fn par_iter(&self) -> impl rayon::iter::ParallelIterator<Item = &T> {
        use rayon::prelude::*;
        self.buckets.par_iter().flat_map_iter(|bucket| bucket.iter())
    }
}

// =============================================================================
// Serde Integration
// =============================================================================

#[cfg(feature = "serde")]
impl<T: serde::Serialize, H, E> serde::Serialize for PersistentBucketSet<T, H, E> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let representation = super::SerializedSet {
            config: self.config,
            elements: self.iter().collect(),
        };
        serde::Serialize::serialize(&representation, serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de, T, H, E> serde::Deserialize<'de> for PersistentBucketSet<T, H, E>
where
    T: serde::Deserialize<'de>,
    H: HashFunction<T> + Default,
    E: EqualityFunction<T> + Default,
{
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        <BucketSet<T, H, E> as serde::Deserialize>::deserialize(deserializer)
            .map(BucketSet::persistent)
    }
}

// =============================================================================
// Tests
// =============================================================================
