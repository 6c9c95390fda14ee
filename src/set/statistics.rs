//! Bucket distribution statistics.
//!
//! Chaining turns one O(n) scan into a scan of about `n / bucket_count`
//! elements, but only while the hash spreads elements evenly.
//! [`BucketStatistics`] shows how even the spread actually is.

use std::fmt;

/// A snapshot of how elements are spread across buckets.
///
/// # Examples
///
/// ```rust
/// use bucket_set::BucketSet;
///
/// let mut set = BucketSet::with_capabilities(
///     bucket_set::BucketSetConfig::new(4).unwrap(),
///     |value: &u64| *value,
///     |left: &u64, right: &u64| left == right,
/// )
/// .unwrap();
/// for value in [1, 2, 5, 9] {
///     set.insert(value);
/// }
///
/// let statistics = set.statistics();
/// assert_eq!(statistics.element_count(), 4);
/// assert_eq!(statistics.occupied_buckets(), 2);
/// assert_eq!(statistics.longest_chain(), 3);
/// assert!((statistics.load_factor() - 1.0).abs() < f64::EPSILON);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketStatistics {
    bucket_count: usize,
    element_count: usize,
    occupied_buckets: usize,
    longest_chain: usize,
}

impl BucketStatistics {
    pub(crate) fn from_chain_lengths<I>(lengths: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        lengths.into_iter().fold(
            Self {
                bucket_count: 0,
                element_count: 0,
                occupied_buckets: 0,
                longest_chain: 0,
            },
            |statistics, length| Self {
                bucket_count: statistics.bucket_count + 1,
                element_count: statistics.element_count + length,
                occupied_buckets: statistics.occupied_buckets + usize::from(length > 0),
                longest_chain: statistics.longest_chain.max(length),
            },
        )
    }

    /// Number of buckets.
    #[must_use]
    pub const fn bucket_count(&self) -> usize {
        self.bucket_count
    }

    /// Number of stored elements, duplicates included.
    #[must_use]
    pub const fn element_count(&self) -> usize {
        self.element_count
    }

    /// Buckets holding at least one element.
    #[must_use]
    pub const fn occupied_buckets(&self) -> usize {
        self.occupied_buckets
    }

    /// Buckets holding nothing.
    #[must_use]
    pub const fn empty_buckets(&self) -> usize {
        self.bucket_count - self.occupied_buckets
    }

    /// Length of the longest chain, i.e. the worst-case `contains` scan.
    #[must_use]
    pub const fn longest_chain(&self) -> usize {
        self.longest_chain
    }

    /// Mean chain length: elements per bucket.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn load_factor(&self) -> f64 {
        if self.bucket_count == 0 {
            return 0.0;
        }
        self.element_count as f64 / self.bucket_count as f64
    }
}

impl fmt::Display for BucketStatistics {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{} elements in {} buckets ({} occupied, longest chain {}, load factor {:.2})",
            self.element_count,
            self.bucket_count,
            self.occupied_buckets,
            self.longest_chain,
            self.load_factor()
        )
    }
}
