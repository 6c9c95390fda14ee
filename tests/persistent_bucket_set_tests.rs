#![cfg(feature = "persistent")]
//! Unit and property tests for PersistentBucketSet.

use bucket_set::{BucketSet, BucketSetConfig, BucketSetError, PersistentBucketSet};
use proptest::prelude::*;
use rstest::rstest;
use std::cell::Cell;
use std::rc::Rc;

type IdentitySet = PersistentBucketSet<u64, fn(&u64) -> u64, fn(&u64, &u64) -> bool>;

fn identity_set(bucket_count: i32) -> IdentitySet {
    IdentitySet::with_capabilities(
        BucketSetConfig::new(bucket_count).unwrap(),
        |value| *value,
        |left, right| left == right,
    )
    .unwrap()
}

/// An element whose hash code can be changed after insertion.
#[derive(Debug)]
struct Tagged {
    name: &'static str,
    hash_code: Cell<u64>,
}

impl Tagged {
    fn new(name: &'static str, hash_code: u64) -> Rc<Self> {
        Rc::new(Self {
            name,
            hash_code: Cell::new(hash_code),
        })
    }
}

type TaggedSet =
    PersistentBucketSet<Rc<Tagged>, fn(&Rc<Tagged>) -> u64, fn(&Rc<Tagged>, &Rc<Tagged>) -> bool>;

fn tagged_set(bucket_count: i32) -> TaggedSet {
    TaggedSet::with_capabilities(
        BucketSetConfig::new(bucket_count).unwrap(),
        |element| element.hash_code.get(),
        |left, right| left.name == right.name,
    )
    .unwrap()
}

// =============================================================================
// Construction
// =============================================================================

#[rstest]
#[case(0)]
#[case(-3)]
fn test_invalid_bucket_count(#[case] bucket_count: i32) {
    assert!(matches!(
        PersistentBucketSet::<i32>::new(bucket_count),
        Err(BucketSetError::InvalidArgument { .. })
    ));
}

#[rstest]
fn test_unallocatable_bucket_count_is_invalid_argument() {
    assert!(matches!(
        PersistentBucketSet::<i32>::new(usize::MAX),
        Err(BucketSetError::InvalidArgument {
            parameter: "bucket_count",
            ..
        })
    ));
}

// =============================================================================
// Scenario From The Bucket Model
// =============================================================================

#[rstest]
fn test_hash_codes_one_two_five_nine_in_four_buckets() {
    let set = [1, 2, 5, 9]
        .into_iter()
        .fold(identity_set(4), |set, value| set.insert(value));

    assert_eq!(set.bucket(1), Some(&[1, 5, 9][..]));
    assert_eq!(set.bucket(2), Some(&[2][..]));
    for value in [1, 2, 5, 9] {
        assert!(set.contains(&value));
    }
    assert!(!set.contains(&6));
}

#[rstest]
fn test_equal_hash_codes_unequal_values_are_both_found() {
    let first = Tagged::new("first", 3);
    let second = Tagged::new("second", 3);
    let set = tagged_set(4)
        .insert(Rc::clone(&first))
        .insert(Rc::clone(&second));

    assert!(set.contains(&first));
    assert!(set.contains(&second));
    assert!(!set.contains(&Tagged::new("third", 3)));
    assert_eq!(set.bucket(3).map(<[_]>::len), Some(2));
}

// =============================================================================
// Known Limitation: Stale Hash Codes
// =============================================================================

#[rstest]
fn test_mutating_hash_code_after_insert_hides_element() {
    let element = Tagged::new("drifting", 1);
    let set = tagged_set(4).insert(Rc::clone(&element));
    assert!(set.contains(&element));

    element.hash_code.set(2);

    assert!(!set.contains(&element));
    assert_eq!(set.bucket(1).map(<[_]>::len), Some(1));
    assert_eq!(set.len(), 1);

    element.hash_code.set(5);
    assert!(set.contains(&element));
}

#[rstest]
fn test_stale_hash_code_is_shared_by_every_version() {
    let element = Tagged::new("drifting", 1);
    let before = tagged_set(4).insert(Rc::clone(&element));
    let after = before.insert(Tagged::new("other", 0));

    element.hash_code.set(2);

    assert!(!before.contains(&element));
    assert!(!after.contains(&element));
}

// =============================================================================
// Immutability
// =============================================================================

#[rstest]
fn test_every_version_keeps_its_contents() {
    let versions: Vec<IdentitySet> = (0..10).fold(vec![identity_set(3)], |mut versions, value| {
        let next = versions.last().unwrap().insert(value);
        versions.push(next);
        versions
    });

    for (size, version) in versions.iter().enumerate() {
        assert_eq!(version.len(), size);
        for value in 0..10_u64 {
            let expected = usize::try_from(value).unwrap() < size;
            assert_eq!(version.contains(&value), expected);
        }
    }
}

#[rstest]
fn test_branching_versions_are_independent() {
    let base = identity_set(4).insert(1);
    let left = base.insert(2);
    let right = base.insert(3);

    assert!(left.contains(&2) && !left.contains(&3));
    assert!(right.contains(&3) && !right.contains(&2));
    assert_eq!(base.len(), 1);
}

#[rstest]
fn test_duplicate_insert_returns_equivalent_version() {
    let set = identity_set(4).insert(7);
    let again = set.insert(7);
    assert_eq!(again.len(), 1);
    assert_eq!(again.bucket(3), Some(&[7][..]));
}

// =============================================================================
// Conversions
// =============================================================================

#[rstest]
fn test_bucket_set_round_trip() {
    let mut set = BucketSet::new(4).unwrap();
    set.extend(["a", "b", "c"]);

    let frozen = set.persistent();
    let extended = frozen.insert("d");
    let thawed = extended.clone().transient();

    assert_eq!(frozen.len(), 3);
    assert_eq!(thawed.len(), 4);
    assert!(thawed.contains(&"d"));
    assert!(!frozen.contains(&"d"));
}

#[rstest]
fn test_iter_matches_len() {
    let set = (0..25).fold(identity_set(6), |set, value| set.insert(value));
    assert_eq!(set.iter().len(), 25);
    let mut elements: Vec<u64> = set.iter().copied().collect();
    elements.sort_unstable();
    assert_eq!(elements, (0..25).collect::<Vec<_>>());
}

// =============================================================================
// Laws
// =============================================================================

proptest! {
    #[test]
    fn prop_insert_does_not_affect_original(
        elements in prop::collection::vec(any::<i32>(), 0..50),
        new_element: i32
    ) {
        let original = elements
            .iter()
            .fold(PersistentBucketSet::new(8).unwrap(), |set, element| set.insert(*element));
        let was_present = original.contains(&new_element);
        let length_before = original.len();

        let _updated = original.insert(new_element);

        prop_assert_eq!(original.contains(&new_element), was_present);
        prop_assert_eq!(original.len(), length_before);
    }
}

proptest! {
    #[test]
    fn prop_agrees_with_bucket_set(
        bucket_count in 1_usize..32,
        elements in prop::collection::vec(0_i32..100, 0..100),
        probe in 0_i32..100
    ) {
        let persistent = elements
            .iter()
            .fold(PersistentBucketSet::new(bucket_count).unwrap(), |set, element| set.insert(*element));
        let mut mutable = BucketSet::new(bucket_count).unwrap();
        mutable.extend(elements.iter().copied());

        prop_assert_eq!(persistent.len(), mutable.len());
        prop_assert_eq!(persistent.contains(&probe), mutable.contains(&probe));
    }
}
