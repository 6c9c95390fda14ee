//! Error types for bucket-set construction.
//!
//! The only fault this crate raises is [`BucketSetError::InvalidArgument`],
//! returned when a set is asked for an unusable bucket count, including one
//! too large to allocate. Membership
//! queries never fail: an element whose hash code changed after insertion
//! simply stops being found, and nothing reports it.

use std::convert::Infallible;

/// Errors produced while configuring or constructing a bucket set.
///
/// # Examples
///
/// ```rust
/// use bucket_set::{BucketSet, BucketSetError};
///
/// let error = BucketSet::<i32>::new(0).unwrap_err();
/// assert!(matches!(error, BucketSetError::InvalidArgument { .. }));
/// assert_eq!(
///     error.to_string(),
///     "invalid argument `bucket_count`: must be positive, got 0"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BucketSetError {
    /// A construction parameter was outside its valid range.
    #[error("invalid argument `{parameter}`: {reason}")]
    InvalidArgument {
        /// The name of the rejected parameter.
        parameter: &'static str,
        /// Why the value was rejected, including the value itself.
        reason: String,
    },
}

impl BucketSetError {
    pub(crate) fn invalid_bucket_count(value: impl std::fmt::Display) -> Self {
        Self::InvalidArgument {
            parameter: "bucket_count",
            reason: format!("must be positive, got {value}"),
        }
    }

    pub(crate) fn bucket_count_overflow(value: impl std::fmt::Display) -> Self {
        Self::InvalidArgument {
            parameter: "bucket_count",
            reason: format!("does not fit in usize, got {value}"),
        }
    }

    pub(crate) fn bucket_spine_unavailable(count: usize) -> Self {
        Self::InvalidArgument {
            parameter: "bucket_count",
            reason: format!("cannot allocate {count} buckets"),
        }
    }
}

impl From<Infallible> for BucketSetError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BucketSetError>;
