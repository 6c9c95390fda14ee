//! Fixed-bucket hash set shared across threads.
//!
//! [`ConcurrentBucketSet`] guards every bucket with its own
//! `parking_lot::RwLock`. Because the bucket count never changes, there
//! is no table-wide lock at all: `insert` write-locks only its target
//! bucket and `contains` read-locks only its target bucket, so operations
//! on different buckets never contend.
//!
//! Deduplication stays exact under concurrency: equivalent elements hash
//! to the same bucket, and the duplicate scan and append happen under
//! that bucket's write lock.
//!
//! A hash code that changes while the element is stored is no more
//! detected here than in [`BucketSet`].

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::RwLock;
use tracing::{debug, trace};

use super::BucketSet;
use super::bucket::{Bucket, empty_buckets};
use super::statistics::BucketStatistics;
use crate::capability::{
    Capabilities, EqualityFunction, HashFunction, NaturalEquality, StandardHash,
};
use crate::config::{BucketCount, BucketSetConfig};
use crate::error::{BucketSetError, Result};

/// A hash set with a fixed number of independently locked buckets.
///
/// # Examples
///
/// ```rust
/// use bucket_set::ConcurrentBucketSet;
/// use std::thread;
///
/// let set = ConcurrentBucketSet::<i32>::new(8).unwrap();
/// thread::scope(|scope| {
///     scope.spawn(|| set.insert(1));
///     scope.spawn(|| set.insert(2));
/// });
///
/// assert!(set.contains(&1));
/// assert!(set.contains(&2));
/// assert_eq!(set.len(), 2);
/// ```
pub struct ConcurrentBucketSet<T, H = StandardHash, E = NaturalEquality> {
    buckets: Box<[RwLock<Bucket<T>>]>,
    capabilities: Capabilities<H, E>,
    config: BucketSetConfig,
    len: AtomicUsize,
}

static_assertions::assert_impl_all!(ConcurrentBucketSet<i32>: Send, Sync);
static_assertions::assert_impl_all!(ConcurrentBucketSet<String>: Send, Sync);
static_assertions::assert_not_impl_any!(ConcurrentBucketSet<std::rc::Rc<i32>>: Send, Sync);

impl<T> ConcurrentBucketSet<T> {
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
            .inspect_err(|error| debug!(%error, "rejected concurrent bucket set construction"))
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

impl<T, H, E> ConcurrentBucketSet<T, H, E> {
    /// Creates an empty set from `config` with the given capability pair.
    ///
    /// # Errors
    ///
    /// Returns [`BucketSetError::InvalidArgument`] if the configured bucket
    /// count cannot be allocated.
    pub fn with_capabilities(config: BucketSetConfig, hash: H, equality: E) -> Result<Self> {
        let bucket_count = config.bucket_count().get();
        let buckets = empty_buckets::<T, RwLock<Bucket<T>>>(bucket_count)
            .inspect_err(|error| debug!(%error, "rejected concurrent bucket set construction"))?;
        debug!(
            bucket_count,
            duplicate_policy = ?config.duplicate_policy(),
            "created concurrent bucket set"
        );
        Ok(Self {
            buckets: buckets.into_boxed_slice(),
            capabilities: Capabilities::new(hash, equality),
            config,
            len: AtomicUsize::new(0),
        })
    }

    /// Returns the number of stored elements at the moment of the call.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Acquire)
    }

    /// Returns `true` if nothing has been stored yet.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the fixed number of buckets.
    #[inline]
    #[must_use]
    pub const fn bucket_count(&self) -> usize {
        self.config.bucket_count().get()
    }

    /// Returns the config this set was built from.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> BucketSetConfig {
        self.config
    }

    /// Returns the chain length of bucket `index`, or `None` if `index` is
    /// out of range.
    #[must_use]
    pub fn bucket_len(&self, index: usize) -> Option<usize> {
        self.buckets.get(index).map(|bucket| bucket.read().len())
    }

    /// Summarizes the bucket spread, locking one bucket at a time.
    ///
    /// Inserts racing with this call may or may not be counted.
    #[must_use]
    pub fn statistics(&self) -> BucketStatistics {
        BucketStatistics::from_chain_lengths(self.buckets.iter().map(|bucket| bucket.read().len()))
    }

    /// Copies every element out, bucket by bucket.
    ///
    /// Each bucket is copied under its read lock, but the buckets are not
    /// locked together: an insert racing with the snapshot may appear in
    /// it or not.
    #[must_use]
    pub fn snapshot(&self) -> Vec<T>
    where
        T: Clone,
    {
        let mut elements = Vec::with_capacity(self.len());
        for bucket in &*self.buckets {
            elements.extend(bucket.read().iter().cloned());
        }
        elements
    }

    /// Unwraps the locks and returns a single-owner [`BucketSet`].
    #[must_use]
    pub fn into_inner(self) -> BucketSet<T, H, E> {
        let len = self.len.into_inner();
        debug!(
            bucket_count = self.config.bucket_count().get(),
            len, "unwrapped concurrent bucket set"
        );
        BucketSet::from_parts(
            self.buckets
                .into_vec()
                .into_iter()
                .map(RwLock::into_inner)
                .collect(),
            self.capabilities,
            self.config,
            len,
        )
    }
}

impl<T, H, E> ConcurrentBucketSet<T, H, E>
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

impl<T, H, E> ConcurrentBucketSet<T, H, E>
where
    H: HashFunction<T>,
    E: EqualityFunction<T>,
{
    /// Returns `true` if an equivalent element is stored in the bucket
    /// `element` hashes to. Only that bucket is read-locked.
    #[must_use]
    pub fn contains(&self, element: &T) -> bool {
        self.buckets[self.bucket_index_of(element)]
            .read()
            .contains(element, self.capabilities.equality())
    }

    /// Appends `element` to its bucket under that bucket's write lock.
    ///
    /// Returns `false` if the set deduplicates and an equivalent element
    /// is already stored.
    pub fn insert(&self, element: T) -> bool {
        let index = self.bucket_index_of(&element);
        let mut bucket = self.buckets[index].write();
        let inserted = bucket.insert(
            element,
            self.capabilities.equality(),
            self.config.duplicate_policy(),
        );
        if inserted {
            self.len.fetch_add(1, Ordering::AcqRel);
            trace!(bucket = index, chain_length = bucket.len(), "inserted element");
        } else {
            trace!(bucket = index, "ignored duplicate element");
        }
        inserted
    }
}

impl<T, H, E> From<BucketSet<T, H, E>> for ConcurrentBucketSet<T, H, E> {
    fn from(set: BucketSet<T, H, E>) -> Self {
        let (buckets, capabilities, config, len) = set.into_parts();
        Self {
            buckets: buckets.into_vec().into_iter().map(RwLock::new).collect(),
            capabilities,
            config,
            len: AtomicUsize::new(len),
        }
    }
}

impl<T, H, E> fmt::Debug for ConcurrentBucketSet<T, H, E> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ConcurrentBucketSet")
            .field("bucket_count", &self.bucket_count())
            .field("len", &self.len())
            .field("duplicate_policy", &self.config.duplicate_policy())
            .finish_non_exhaustive()
    }
}
