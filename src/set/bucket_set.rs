//! Mutable fixed-bucket hash set.
//!
//! [`BucketSet`] is the plain, single-owner container: `insert` takes
//! `&mut self` and appends to one bucket in place.
//!
//! - O(1) bucket selection
//! - O(chain length) `insert` (with deduplication) and `contains`
//! - O(1) `len` and `is_empty`
//!
//! # Examples
//!
//! ```rust
//! use bucket_set::{BucketSet, BucketSetConfig};
//!
//! let mut set = BucketSet::with_capabilities(
//!     BucketSetConfig::new(4).unwrap(),
//!     |value: &u64| *value,
//!     |left: &u64, right: &u64| left == right,
//! )
//! .unwrap();
//!
//! for value in [1, 2, 5, 9] {
//!     set.insert(value);
//! }
//!
//! // 1, 5 and 9 all collide in bucket 1
//! assert_eq!(set.bucket(1), Some(&[1, 5, 9][..]));
//! assert_eq!(set.bucket(2), Some(&[2][..]));
//!
//! assert!(set.contains(&5));
//! assert!(!set.contains(&6));
//! ```

use std::fmt;

use tracing::{debug, trace};

use super::bucket::{Bucket, empty_buckets};
use super::statistics::BucketStatistics;
use crate::capability::{
    Capabilities, EqualityFunction, HashFunction, NaturalEquality, StandardHash,
};
use crate::config::{BucketCount, BucketSetConfig, DuplicatePolicy};
use crate::error::{BucketSetError, Result};

// =============================================================================
// BucketSet Definition
// =============================================================================

/// A hash set with a fixed number of chained buckets.
///
/// The hash and equality functions are bound at construction as a
/// [`Capabilities`] pair; by default they are [`StandardHash`] and
/// [`NaturalEquality`].
///
/// # Time Complexity
///
/// | Operation          | Complexity             |
/// |--------------------|------------------------|
/// | `new`              | O(bucket count)        |
/// | `insert`           | O(chain length)        |
/// | `contains`         | O(chain length)        |
/// | `len`              | O(1)                   |
/// | `bucket_index_of`  | O(1)                   |
/// | `statistics`       | O(bucket count)        |
///
/// With an even hash, the chain length is about `len / bucket_count`.
///
/// # Stale Hash Codes
///
/// The set trusts an element's hash code never to change while stored.
/// If it does, `contains` looks in the wrong bucket and returns `false`
/// for an element that is physically present. Nothing detects this.
#[derive(Clone)]
pub struct BucketSet<T, H = StandardHash, E = NaturalEquality> {
    buckets: Box<[Bucket<T>]>,
    capabilities: Capabilities<H, E>,
    config: BucketSetConfig,
    len: usize,
}

impl<T> BucketSet<T> {
    /// Creates an empty set with `bucket_count` buckets and the standard
    /// capabilities.
    ///
    /// # Errors
    ///
    /// Returns [`BucketSetError::InvalidArgument`] if `bucket_count` is
    /// zero, negative, or does not fit in `usize`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bucket_set::BucketSet;
    ///
    /// let set: BucketSet<i32> = BucketSet::new(16).unwrap();
    /// assert!(set.is_empty());
    /// assert_eq!(set.bucket_count(), 16);
    ///
    /// assert!(BucketSet::<i32>::new(0).is_err());
    /// assert!(BucketSet::<i32>::new(-2).is_err());
    /// ```
    pub fn new<C>(bucket_count: C) -> Result<Self>
    where
        C: TryInto<BucketCount>,
        BucketSetError: From<C::Error>,
    {
        BucketSetConfig::new(bucket_count)
            .and_then(Self::from_config)
            .inspect_err(|error| debug!(%error, "rejected bucket set construction"))
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

impl<T, H, E> BucketSet<T, H, E> {
    /// Creates an empty set from `config`, hashing with `hash` and
    /// comparing with `equality`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bucket_set::{BucketSet, BucketSetConfig};
    ///
    /// // Case-insensitive set of words
    /// let mut set = BucketSet::with_capabilities(
    ///     BucketSetConfig::new(8).unwrap(),
    ///     |word: &&str| {
    ///         word.bytes()
    ///             .map(|byte| u64::from(byte.to_ascii_lowercase()))
    ///             .sum::<u64>()
    ///     },
    ///     |left: &&str, right: &&str| left.eq_ignore_ascii_case(right),
    /// )
    /// .unwrap();
    ///
    /// set.insert("Rust");
    /// assert!(set.contains(&"rust"));
    /// assert!(!set.insert("RUST"));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`BucketSetError::InvalidArgument`] if the configured bucket
    /// count cannot be allocated.
    pub fn with_capabilities(config: BucketSetConfig, hash: H, equality: E) -> Result<Self> {
        let bucket_count = config.bucket_count().get();
        let buckets = empty_buckets::<T, Bucket<T>>(bucket_count)
            .inspect_err(|error| debug!(%error, "rejected bucket set construction"))?;
        debug!(
            bucket_count,
            duplicate_policy = ?config.duplicate_policy(),
            "created bucket set"
        );
        Ok(Self {
            buckets: buckets.into_boxed_slice(),
            capabilities: Capabilities::new(hash, equality),
            config,
            len: 0,
        })
    }

    #[cfg_attr(
        not(any(feature = "concurrent", feature = "persistent")),
        allow(dead_code)
    )]
    pub(crate) fn from_parts(
        buckets: Box<[Bucket<T>]>,
        capabilities: Capabilities<H, E>,
        config: BucketSetConfig,
        len: usize,
    ) -> Self {
        Self {
            buckets,
            capabilities,
            config,
            len,
        }
    }

    #[cfg_attr(not(feature = "concurrent"), allow(dead_code))]
    pub(crate) fn into_parts(self) -> (Box<[Bucket<T>]>, Capabilities<H, E>, BucketSetConfig, usize) {
        (self.buckets, self.capabilities, self.config, self.len)
    }

    /// Returns the number of stored elements.
    ///
    /// Under [`DuplicatePolicy::Permit`] every accepted insertion counts,
    /// including repeats.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if nothing has been inserted.
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

    /// Returns the bound hash/equality pair.
    #[inline]
    #[must_use]
    pub const fn capabilities(&self) -> &Capabilities<H, E> {
        &self.capabilities
    }

    /// Returns a read-only view of the chain at `index`, or `None` if
    /// `index` is not below [`bucket_count`](Self::bucket_count).
    #[must_use]
    pub fn bucket(&self, index: usize) -> Option<&[T]> {
        self.buckets.get(index).map(Bucket::as_slice)
    }

    /// Returns read-only views of every chain, in bucket index order.
    pub fn buckets(&self) -> impl ExactSizeIterator<Item = &[T]> {
        self.buckets.iter().map(Bucket::as_slice)
    }

    /// Returns an iterator over the elements, bucket by bucket.
    #[must_use]
    pub fn iter(&self) -> BucketSetIterator<'_, T> {
        BucketSetIterator {
            buckets: self.buckets.iter(),
            current: Default::default(),
            remaining: self.len,
        }
    }

    /// Summarizes how evenly elements are spread across buckets.
    #[must_use]
    pub fn statistics(&self) -> BucketStatistics {
        BucketStatistics::from_chain_lengths(self.buckets.iter().map(Bucket::len))
    }
}

impl<T, H, E> BucketSet<T, H, E>
where
    H: HashFunction<T>,
{
    /// Returns the bucket `element` maps to: `hash(element) mod bucket_count`.
    #[inline]
    #[must_use]
    pub fn bucket_index_of(&self, element: &T) -> usize {
        self.config
            .bucket_count()
            .index_of(self.capabilities.hash_code(element))
    }
}

impl<T, H, E> BucketSet<T, H, E>
where
    H: HashFunction<T>,
    E: EqualityFunction<T>,
{
    /// Returns `true` if an element equivalent to `element` is stored in
    /// the bucket `element` currently hashes to.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bucket_set::BucketSet;
    ///
    /// let mut set = BucketSet::new(4).unwrap();
    /// set.insert(String::from("hello"));
    ///
    /// assert!(set.contains(&String::from("hello")));
    /// assert!(!set.contains(&String::from("world")));
    /// ```
    #[must_use]
    pub fn contains(&self, element: &T) -> bool {
        self.buckets[self.bucket_index_of(element)].contains(element, self.capabilities.equality())
    }

    /// Appends `element` to its bucket.
    ///
    /// Returns `false` if the set deduplicates and an equivalent element
    /// is already stored; the set is then unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bucket_set::{BucketSet, BucketSetConfig, DuplicatePolicy};
    ///
    /// let mut deduplicating = BucketSet::new(4).unwrap();
    /// assert!(deduplicating.insert(1));
    /// assert!(!deduplicating.insert(1));
    /// assert_eq!(deduplicating.len(), 1);
    ///
    /// let config = BucketSetConfig::new(4)
    ///     .unwrap()
    ///     .with_duplicate_policy(DuplicatePolicy::Permit);
    /// let mut permissive = BucketSet::from_config(config).unwrap();
    /// assert!(permissive.insert(1));
    /// assert!(permissive.insert(1));
    /// assert_eq!(permissive.len(), 2);
    /// ```
    pub fn insert(&mut self, element: T) -> bool {
        let index = self.bucket_index_of(&element);
        let bucket = &mut self.buckets[index];
        let inserted = bucket.insert(
            element,
            self.capabilities.equality(),
            self.config.duplicate_policy(),
        );
        if inserted {
            self.len += 1;
            trace!(bucket = index, chain_length = bucket.len(), "inserted element");
        } else {
            trace!(bucket = index, "ignored duplicate element");
        }
        inserted
    }
}

// =============================================================================
// Conversions
// =============================================================================

#[cfg(feature = "persistent")]
impl<T, H, E> BucketSet<T, H, E> {
    /// Freezes this set into a [`PersistentBucketSet`](super::PersistentBucketSet).
    ///
    /// Buckets move without copying.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bucket_set::BucketSet;
    ///
    /// let mut set = BucketSet::new(4).unwrap();
    /// set.insert(1);
    ///
    /// let frozen = set.persistent();
    /// let extended = frozen.insert(2);
    /// assert_eq!(frozen.len(), 1);
    /// assert_eq!(extended.len(), 2);
    /// ```
    #[must_use]
    pub fn persistent(self) -> super::PersistentBucketSet<T, H, E> {
        debug!(
            bucket_count = self.bucket_count(),
            len = self.len,
            "froze bucket set into persistent form"
        );
        super::PersistentBucketSet::from_parts(
            self.buckets
                .into_vec()
                .into_iter()
                .map(super::ReferenceCounter::new)
                .collect(),
            super::ReferenceCounter::new(self.capabilities),
            self.config,
            self.len,
        )
    }
}

// =============================================================================
// Iterator Implementations
// =============================================================================

/// An iterator over the elements of a [`BucketSet`], bucket by bucket and
/// in chain order within a bucket.
pub struct BucketSetIterator<'a, T> {
    buckets: std::slice::Iter<'a, Bucket<T>>,
    current: std::slice::Iter<'a, T>,
    remaining: usize,
}

impl<'a, T> Iterator for BucketSetIterator<'a, T> {
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

impl<T> ExactSizeIterator for BucketSetIterator<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

/// An owning iterator over the elements of a [`BucketSet`].
pub struct BucketSetIntoIterator<T> {
    elements: std::iter::Flatten<std::vec::IntoIter<Bucket<T>>>,
    remaining: usize,
}

impl<T> Iterator for BucketSetIntoIterator<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.elements.next()?;
        self.remaining -= 1;
        Some(element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for BucketSetIntoIterator<T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T, H, E> IntoIterator for BucketSet<T, H, E> {
    type Item = T;
    type IntoIter = BucketSetIntoIterator<T>;

    fn into_iter(self) -> Self::IntoIter {
        BucketSetIntoIterator {
            elements: self.buckets.into_vec().into_iter().flatten(),
            remaining: self.len,
        }
    }
}

impl<'a, T, H, E> IntoIterator for &'a BucketSet<T, H, E> {
    type Item = &'a T;
    type IntoIter = BucketSetIterator<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, H, E> Extend<T> for BucketSet<T, H, E>
where
    H: HashFunction<T>,
    E: EqualityFunction<T>,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for element in iter {
            self.insert(element);
        }
    }
}

// =============================================================================
// Formatting
// =============================================================================

impl<T: fmt::Debug, H, E> fmt::Debug for BucketSet<T, H, E> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display, H, E> fmt::Display for BucketSet<T, H, E> {
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
impl<T: Sync, H, E> BucketSet<T, H, E> {
    /// Returns a parallel iterator over the elements; buckets are the unit
    /// of work.
    pub fn par_iter(&self) -> impl rayon::iter::ParallelIterator<Item = &T> {
        use rayon::prelude::*;
        self.buckets.par_iter().flat_map_iter(Bucket::iter)
    }
}

// =============================================================================
// Serde Integration
// =============================================================================

#[cfg(feature = "serde")]
impl<T: serde::Serialize, H, E> serde::Serialize for BucketSet<T, H, E> {
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
impl<'de, T, H, E> serde::Deserialize<'de> for BucketSet<T, H, E>
where
    T: serde::Deserialize<'de>,
    H: HashFunction<T> + Default,
    E: EqualityFunction<T> + Default,
{
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let super::DeserializedSet { config, elements } =
            <super::DeserializedSet<T> as serde::Deserialize>::deserialize(deserializer)?;
        let mut set = Self::with_capabilities(config, H::default(), E::default())
            .map_err(<D::Error as serde::de::Error>::custom)?;
        set.extend(elements);
        Ok(set)
    }
}

// =============================================================================
// Tests
// =============================================================================
