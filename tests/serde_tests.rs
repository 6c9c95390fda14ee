#![cfg(feature = "serde")]

//! Integration tests for serde support.
//!
//! Sets serialize as `{"config": {...}, "elements": [...]}` and are rebuilt
//! by replaying the elements through `insert`.

use bucket_set::{BucketSet, BucketSetConfig, DuplicatePolicy};
use rstest::rstest;

// =============================================================================
// BucketSet
// =============================================================================

#[rstest]
fn test_bucket_set_json_shape() {
    let mut set = BucketSet::with_capabilities(
        BucketSetConfig::new(4).unwrap(),
        |value: &u64| *value,
        |left: &u64, right: &u64| left == right,
    )
    .unwrap();
    set.extend([9, 2, 5, 1]);

    let json = serde_json::to_value(&set).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "config": { "bucket_count": 4, "duplicate_policy": "deduplicate" },
            "elements": [9, 5, 1, 2]
        })
    );
}

#[rstest]
fn test_bucket_set_json_roundtrip() {
    let mut set: BucketSet<String> = BucketSet::new(8).unwrap();
    set.extend(["alpha", "beta", "gamma"].map(String::from));

    let json = serde_json::to_string(&set).unwrap();
    let restored: BucketSet<String> = serde_json::from_str(&json).unwrap();

    assert_eq!(restored.len(), 3);
    assert_eq!(restored.bucket_count(), 8);
    assert!(restored.contains(&"beta".to_string()));
    assert!(!restored.contains(&"delta".to_string()));
}

#[rstest]
fn test_deserialize_applies_duplicate_policy() {
    let json = r#"{"config":{"bucket_count":2},"elements":[1,1,2,2,2]}"#;
    let restored: BucketSet<i32> = serde_json::from_str(json).unwrap();
    assert_eq!(restored.len(), 2);

    let json = r#"{"config":{"bucket_count":2,"duplicate_policy":"permit"},"elements":[1,1,2]}"#;
    let restored: BucketSet<i32> = serde_json::from_str(json).unwrap();
    assert_eq!(restored.duplicate_policy(), DuplicatePolicy::Permit);
    assert_eq!(restored.len(), 3);
}

#[rstest]
#[case(r#"{"config":{"bucket_count":0},"elements":[]}"#)]
#[case(r#"{"config":{"bucket_count":-1},"elements":[]}"#)]
#[case(r#"{"elements":[1]}"#)]
fn test_invalid_documents_are_rejected(#[case] json: &str) {
    let result: Result<BucketSet<i32>, _> = serde_json::from_str(json);
    assert!(result.is_err());
}

// =============================================================================
// PersistentBucketSet
// =============================================================================

#[cfg(feature = "persistent")]
#[rstest]
fn test_persistent_bucket_set_json_roundtrip() {
    use bucket_set::PersistentBucketSet;

    let set = (1..=5).fold(PersistentBucketSet::new(3).unwrap(), |set, value| {
        set.insert(value)
    });

    let json = serde_json::to_string(&set).unwrap();
    let restored: PersistentBucketSet<i32> = serde_json::from_str(&json).unwrap();

    assert_eq!(restored.len(), 5);
    assert!((1..=5).all(|value| restored.contains(&value)));
}
