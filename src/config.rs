//! Construction parameters for bucket sets.
//!
//! - [`BucketCount`]: a validated, strictly positive number of buckets
//! - [`DuplicatePolicy`]: what `insert` does with an element already present
//! - [`BucketSetConfig`]: both of the above, bundled
//!
//! Every container in this crate is built from a [`BucketSetConfig`], and
//! the bucket count it carries never changes for the container's lifetime.
//!
//! # Examples
//!
//! ```rust
//! use bucket_set::{BucketSetConfig, DuplicatePolicy};
//!
//! let config = BucketSetConfig::new(16)
//!     .unwrap()
//!     .with_duplicate_policy(DuplicatePolicy::Permit);
//!
//! assert_eq!(config.bucket_count().get(), 16);
//! assert_eq!(config.duplicate_policy(), DuplicatePolicy::Permit);
//!
//! assert!(BucketSetConfig::new(0).is_err());
//! assert!(BucketSetConfig::new(-1).is_err());
//! ```

use std::fmt;
use std::num::NonZeroUsize;

use crate::error::{BucketSetError, Result};

// =============================================================================
// BucketCount
// =============================================================================

/// The number of buckets in a set. Always at least one.
///
/// Conversions from signed and unsigned integers reject zero, negative
/// values, and values that do not fit in `usize`.
///
/// # Examples
///
/// ```rust
/// use bucket_set::BucketCount;
///
/// let count = BucketCount::try_from(4).unwrap();
/// assert_eq!(count.index_of(9), 1);
///
/// assert!(BucketCount::try_from(0).is_err());
/// assert!(BucketCount::try_from(-7_i64).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u64", into = "u64"))]
pub struct BucketCount(NonZeroUsize);

impl BucketCount {
    /// Creates a bucket count, rejecting zero.
    ///
    /// # Errors
    ///
    /// Returns [`BucketSetError::InvalidArgument`] if `count` is zero.
    pub fn new(count: usize) -> Result<Self> {
        NonZeroUsize::new(count)
            .map(Self)
            .ok_or_else(|| BucketSetError::invalid_bucket_count(count))
    }

    /// Returns the count as a plain `usize`.
    #[inline]
    #[must_use]
    pub const fn get(self) -> usize {
        self.0.get()
    }

    /// Maps a hash code onto a bucket index: `hash mod count`.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn index_of(self, hash: u64) -> usize {
        // The remainder is below `count`, which came from a usize.
        (hash % self.0.get() as u64) as usize
    }
}

impl From<NonZeroUsize> for BucketCount {
    fn from(count: NonZeroUsize) -> Self {
        Self(count)
    }
}

impl From<BucketCount> for usize {
    fn from(count: BucketCount) -> Self {
        count.get()
    }
}

impl From<BucketCount> for u64 {
    fn from(count: BucketCount) -> Self {
        count.get() as Self
    }
}

impl TryFrom<usize> for BucketCount {
    type Error = BucketSetError;

    fn try_from(count: usize) -> Result<Self> {
        Self::new(count)
    }
}

macro_rules! bucket_count_from_integer {
    (signed: $($integer:ty),*) => {
        $(
            impl TryFrom<$integer> for BucketCount {
                type Error = BucketSetError;

                fn try_from(count: $integer) -> Result<Self> {
                    if count <= 0 {
                        return Err(BucketSetError::invalid_bucket_count(count));
                    }
                    bucket_count_from_integer!(@narrow count)
                }
            }
        )*
    };
    (unsigned: $($integer:ty),*) => {
        $(
            impl TryFrom<$integer> for BucketCount {
                type Error = BucketSetError;

                fn try_from(count: $integer) -> Result<Self> {
                    bucket_count_from_integer!(@narrow count)
                }
            }
        )*
    };
    (@narrow $count:ident) => {
        usize::try_from($count)
            .map_err(|_| BucketSetError::bucket_count_overflow($count))
            .and_then(Self::new)
    };
}

bucket_count_from_integer!(signed: i32, i64, isize);
bucket_count_from_integer!(unsigned: u32, u64);

impl fmt::Display for BucketCount {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

// =============================================================================
// DuplicatePolicy
// =============================================================================

/// What `insert` does with an element equivalent to one already stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DuplicatePolicy {
    /// Scan the target bucket first and drop the element if an equivalent
    /// one is present.
    #[default]
    Deduplicate,
    /// Append unconditionally. Each insertion counts toward `len`.
    Permit,
}

// =============================================================================
// BucketSetConfig
// =============================================================================

/// Construction parameters shared by every container in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BucketSetConfig {
    bucket_count: BucketCount,
    #[cfg_attr(feature = "serde", serde(default))]
    duplicate_policy: DuplicatePolicy,
}

impl BucketSetConfig {
    /// Creates a config with the given bucket count and
    /// [`DuplicatePolicy::Deduplicate`].
    ///
    /// # Errors
    ///
    /// Returns [`BucketSetError::InvalidArgument`] if the count is zero,
    /// negative, or does not fit in `usize`.
    pub fn new<C>(bucket_count: C) -> Result<Self>
    where
        C: TryInto<BucketCount>,
        BucketSetError: From<C::Error>,
    {
        Ok(Self::from(bucket_count.try_into()?))
    }

    /// Returns a copy of this config using `policy`.
    #[must_use]
    pub const fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    /// The number of buckets.
    #[inline]
    #[must_use]
    pub const fn bucket_count(&self) -> BucketCount {
        self.bucket_count
    }

    /// The duplicate-handling policy.
    #[inline]
    #[must_use]
    pub const fn duplicate_policy(&self) -> DuplicatePolicy {
        self.duplicate_policy
    }
}

impl From<BucketCount> for BucketSetConfig {
    fn from(bucket_count: BucketCount) -> Self {
        Self {
            bucket_count,
            duplicate_policy: DuplicatePolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 1)]
    #[case(4, 4)]
    #[case(1024, 1024)]
    fn test_positive_counts_accepted(#[case] input: i32, #[case] expected: usize) {
        assert_eq!(BucketCount::try_from(input).unwrap().get(), expected);
    }

    #[rstest]
    #[case(0)]
    #[case(-1)]
    #[case(i64::MIN)]
    fn test_non_positive_counts_rejected(#[case] input: i64) {
        let error = BucketCount::try_from(input).unwrap_err();
        assert!(matches!(
            error,
            BucketSetError::InvalidArgument {
                parameter: "bucket_count",
                ..
            }
        ));
    }

    #[rstest]
    fn test_zero_usize_rejected() {
        assert!(BucketCount::new(0).is_err());
        assert!(BucketCount::try_from(0_usize).is_err());
    }

    #[rstest]
    fn test_non_zero_usize_is_infallible() {
        let count = BucketCount::from(NonZeroUsize::new(8).unwrap());
        assert_eq!(count.get(), 8);
    }

    #[rstest]
    #[case(1, 1)]
    #[case(2, 2)]
    #[case(5, 1)]
    #[case(9, 1)]
    #[case(6, 2)]
    #[case(u64::MAX, 3)]
    fn test_index_of_is_modulo(#[case] hash: u64, #[case] expected: usize) {
        let count = BucketCount::new(4).unwrap();
        assert_eq!(count.index_of(hash), expected);
    }

    #[rstest]
    fn test_single_bucket_maps_everything_to_zero() {
        let count = BucketCount::new(1).unwrap();
        assert_eq!(count.index_of(0), 0);
        assert_eq!(count.index_of(12345), 0);
    }

    #[rstest]
    fn test_config_defaults_to_deduplicate() {
        let config = BucketSetConfig::new(3).unwrap();
        assert_eq!(config.duplicate_policy(), DuplicatePolicy::Deduplicate);
        assert_eq!(config.bucket_count().get(), 3);
    }

    #[rstest]
    fn test_config_with_duplicate_policy() {
        let config = BucketSetConfig::new(3)
            .unwrap()
            .with_duplicate_policy(DuplicatePolicy::Permit);
        assert_eq!(config.duplicate_policy(), DuplicatePolicy::Permit);
    }

    #[rstest]
    fn test_config_rejects_negative() {
        assert_eq!(
            BucketSetConfig::new(-4).unwrap_err(),
            BucketSetError::invalid_bucket_count(-4)
        );
    }

    #[rstest]
    fn test_bucket_count_display() {
        assert_eq!(format!("{}", BucketCount::new(12).unwrap()), "12");
    }
}
