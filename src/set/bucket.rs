//! A single hash chain.

use smallvec::SmallVec;

use crate::capability::EqualityFunction;
use crate::config::DuplicatePolicy;
use crate::error::{BucketSetError, Result};

/// Elements stored inline before a chain spills to the heap.
const INLINE_CAPACITY: usize = 4;

/// An append-only chain of elements whose hash codes share a bucket index.
#[derive(Clone, Debug)]
pub(crate) struct Bucket<T> {
    elements: SmallVec<[T; INLINE_CAPACITY]>,
}

impl<T> Bucket<T> {
    #[inline]
    pub(crate) fn new() -> Self {
        Self {
            elements: SmallVec::new(),
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.elements.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[inline]
    pub(crate) fn as_slice(&self) -> &[T] {
        self.elements.as_slice()
    }

    #[inline]
    pub(crate) fn iter(&self) -> std::slice::Iter<'_, T> {
        self.elements.iter()
    }

    /// Scans the chain front to back and stops at the first match.
    pub(crate) fn contains<E>(&self, element: &T, equality: &E) -> bool
    where
        E: EqualityFunction<T> + ?Sized,
    {
        self.elements
            .iter()
            .any(|stored| equality.equivalent(stored, element))
    }

    /// Appends `element` without scanning the chain.
    #[inline]
    pub(crate) fn push(&mut self, element: T) {
        self.elements.push(element);
    }

    /// Appends `element` unless `policy` deduplicates and an equivalent
    /// element is already chained. Returns whether the element was stored.
    pub(crate) fn insert<E>(&mut self, element: T, equality: &E, policy: DuplicatePolicy) -> bool
    where
        E: EqualityFunction<T> + ?Sized,
    {
        if policy == DuplicatePolicy::Deduplicate && self.contains(&element, equality) {
            return false;
        }
        self.push(element);
        true
    }
}

impl<T> Default for Bucket<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> IntoIterator for Bucket<T> {
    type Item = T;
    type IntoIter = smallvec::IntoIter<[T; INLINE_CAPACITY]>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

/// Creates `count` empty buckets, failing instead of aborting when the
/// spine cannot be allocated.
pub(crate) fn empty_buckets<T, B: From<Bucket<T>>>(count: usize) -> Result<Vec<B>> {
    let mut buckets = Vec::new();
    buckets
        .try_reserve_exact(count)
        .map_err(|_| BucketSetError::bucket_spine_unavailable(count))?;
    buckets.extend(std::iter::repeat_with(|| B::from(Bucket::new())).take(count));
    Ok(buckets)
}
