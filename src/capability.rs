//! Hashing and equality capabilities.
//!
//! A bucket set never asks its elements how to hash or compare themselves.
//! Instead, a pair of capabilities is bound on the container at
//! construction:
//!
//! - [`HashFunction`]: maps an element to a deterministic `u64` hash code
//! - [`EqualityFunction`]: decides whether two elements are equivalent
//!
//! Closures implement both traits, so ad hoc schemes need no new types:
//!
//! ```rust
//! use bucket_set::{BucketSet, BucketSetConfig};
//!
//! // Hash by length, compare ignoring ASCII case.
//! let config = BucketSetConfig::new(4).unwrap();
//! let mut set = BucketSet::with_capabilities(
//!     config,
//!     |word: &String| word.len() as u64,
//!     |left: &String, right: &String| left.eq_ignore_ascii_case(right),
//! )
//! .unwrap();
//!
//! set.insert("Hello".to_string());
//! assert!(set.contains(&"hello".to_string()));
//! ```
//!
//! The defaults are [`StandardHash`] and [`NaturalEquality`], which defer
//! to `std::hash::Hash` and `PartialEq`.
//!
//! # Stability
//!
//! Whatever the hash function reads must not change while the element is
//! stored. Containers do not detect a drifting hash code: a query for the
//! element lands in a different bucket and silently misses.

use std::collections::hash_map::DefaultHasher;
#[cfg(any(feature = "fxhash", feature = "ahash"))]
use std::hash::BuildHasher;
use std::hash::{Hash, Hasher};

// =============================================================================
// Capability Traits
// =============================================================================

/// Computes a deterministic hash code for an element.
///
/// Equal elements (under the paired [`EqualityFunction`]) must produce
/// equal hash codes.
pub trait HashFunction<T: ?Sized> {
    /// Returns the hash code of `element`.
    fn hash_code(&self, element: &T) -> u64;
}

/// Decides whether two elements are the same set member.
pub trait EqualityFunction<T: ?Sized> {
    /// Returns `true` if `left` and `right` are equivalent.
    fn equivalent(&self, left: &T, right: &T) -> bool;
}

impl<T: ?Sized, F> HashFunction<T> for F
where
    F: Fn(&T) -> u64,
{
    #[inline]
    fn hash_code(&self, element: &T) -> u64 {
        self(element)
    }
}

impl<T: ?Sized, F> EqualityFunction<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    #[inline]
    fn equivalent(&self, left: &T, right: &T) -> bool {
        self(left, right)
    }
}

// =============================================================================
// Standard Capabilities
// =============================================================================

/// Hashes through `std::hash::Hash` with fixed-key SipHash.
///
/// Unlike `std::collections::HashMap`'s `RandomState`, the keys are the
/// same in every process, so a value's hash code is reproducible.
///
/// # Examples
///
/// ```rust
/// use bucket_set::{HashFunction, StandardHash};
///
/// let hash = StandardHash;
/// assert_eq!(hash.hash_code("bucket"), hash.hash_code("bucket"));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StandardHash;

impl<T: Hash + ?Sized> HashFunction<T> for StandardHash {
    fn hash_code(&self, element: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        element.hash(&mut hasher);
        hasher.finish()
    }
}

/// Compares through `PartialEq`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NaturalEquality;

impl<T: PartialEq + ?Sized> EqualityFunction<T> for NaturalEquality {
    #[inline]
    fn equivalent(&self, left: &T, right: &T) -> bool {
        left == right
    }
}

/// Hashes through `std::hash::Hash` with `rustc-hash`'s Fx algorithm.
///
/// Fx is unkeyed and therefore deterministic. It is much faster than
/// SipHash for integer keys but offers no flooding resistance.
#[cfg(feature = "fxhash")]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FxHash;

#[cfg(feature = "fxhash")]
impl<T: Hash + ?Sized> HashFunction<T> for FxHash {
    fn hash_code(&self, element: &T) -> u64 {
        rustc_hash::FxBuildHasher.hash_one(element)
    }
}

/// Hashes through `std::hash::Hash` with `ahash`, seeded with constants.
///
/// `ahash::RandomState::new()` would pick per-process seeds; fixed seeds
/// keep hash codes reproducible.
#[cfg(feature = "ahash")]
#[derive(Clone)]
pub struct AHash {
    state: ahash::RandomState,
}

#[cfg(feature = "ahash")]
impl AHash {
    const SEEDS: [u64; 4] = [
        0x243f_6a88_85a3_08d3,
        0x1319_8a2e_0370_7344,
        0xa409_3822_299f_31d0,
        0x082e_fa98_ec4e_6c89,
    ];

    /// Creates an `AHash` capability with the crate's fixed seeds.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seeds(Self::SEEDS)
    }

    /// Creates an `AHash` capability with caller-chosen seeds.
    #[must_use]
    pub fn with_seeds(seeds: [u64; 4]) -> Self {
        Self {
            state: ahash::RandomState::with_seeds(seeds[0], seeds[1], seeds[2], seeds[3]),
        }
    }
}

#[cfg(feature = "ahash")]
impl Default for AHash {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "ahash")]
impl std::fmt::Debug for AHash {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.debug_struct("AHash").finish_non_exhaustive()
    }
}

#[cfg(feature = "ahash")]
impl<T: Hash + ?Sized> HashFunction<T> for AHash {
    fn hash_code(&self, element: &T) -> u64 {
        self.state.hash_one(element)
    }
}

// =============================================================================
// Capabilities
// =============================================================================

/// The `{hash-function, equality-function}` pair bound on a container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities<H = StandardHash, E = NaturalEquality> {
    hash: H,
    equality: E,
}

impl<H, E> Capabilities<H, E> {
    /// Pairs a hash function with an equality function.
    #[inline]
    pub const fn new(hash: H, equality: E) -> Self {
        Self { hash, equality }
    }

    /// The hash function.
    #[inline]
    pub const fn hash(&self) -> &H {
        &self.hash
    }

    /// The equality function.
    #[inline]
    pub const fn equality(&self) -> &E {
        &self.equality
    }

    /// Hashes `element`.
    #[inline]
    pub fn hash_code<T: ?Sized>(&self, element: &T) -> u64
    where
        H: HashFunction<T>,
    {
        self.hash.hash_code(element)
    }

    /// Compares `left` and `right`.
    #[inline]
    pub fn equivalent<T: ?Sized>(&self, left: &T, right: &T) -> bool
    where
        E: EqualityFunction<T>,
    {
        self.equality.equivalent(left, right)
    }
}
