//! Property-based tests for context semantics

use proptest::prelude::*;
use serde_json::Value;
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use warden::context::PURPOSE;
use warden::Context;

fn non_null_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        ".*".prop_map(Value::from),
        prop::collection::vec(any::<i32>(), 0..4).prop_map(Value::from),
    ]
}

fn key() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,11}"
}

fn hash_of(context: &Context) -> u64 {
    let mut hasher = DefaultHasher::new();
    context.hash(&mut hasher);
    hasher.finish()
}

proptest! {
    #[test]
    fn put_then_get_returns_value(k in key(), v in non_null_value()) {
        let mut context = Context::new();
        context.put(k.clone(), v.clone()).unwrap();
        prop_assert_eq!(context.get(&k), Some(&v));
    }

    #[test]
    fn put_if_absent_never_overwrites(k in key(), first in non_null_value(), second in non_null_value()) {
        let mut context = Context::new();
        context.put(k.clone(), first.clone()).unwrap();
        context.put_if_absent(k.clone(), second).unwrap();
        prop_assert_eq!(context.get(&k), Some(&first));
    }

    #[test]
    fn snapshot_is_unaffected_by_later_mutation(
        entries in prop::collection::btree_map(key(), non_null_value(), 0..8),
        k in key(),
        v in non_null_value(),
    ) {
        let mut context = Context::from_contents(entries.clone()).unwrap();
        let snapshot = context.contents_copy();
        context.put(k, v).unwrap();
        context.purpose("changed");
        prop_assert_eq!(&*snapshot, &entries);
    }

    #[test]
    fn equal_mappings_give_equal_contexts(entries in prop::collection::vec((key(), non_null_value()), 0..8)) {
        let forward: BTreeMap<String, Value> = entries.iter().cloned().collect();
        let mut reversed = Context::new();
        // Insert in reverse; later duplicates must win like in `forward`.
        let mut seen = std::collections::HashSet::new();
        for (k, v) in entries.iter().rev() {
            if seen.insert(k.clone()) {
                reversed.put(k.clone(), v.clone()).unwrap();
            }
        }
        let a = Context::from_contents(forward).unwrap();
        prop_assert_eq!(&a, &reversed);
        prop_assert_eq!(hash_of(&a), hash_of(&reversed));
    }

    #[test]
    fn different_mappings_give_unequal_contexts(k in key(), a in non_null_value(), b in non_null_value()) {
        prop_assume!(a != b);
        let mut left = Context::new();
        left.put(k.clone(), a).unwrap();
        let mut right = Context::new();
        right.put(k, b).unwrap();
        prop_assert_ne!(left, right);
    }

    #[test]
    fn purpose_round_trips(purpose in ".*") {
        let mut context = Context::new();
        context.purpose(purpose.clone());
        prop_assert_eq!(context.get_purpose().unwrap(), Some(purpose.as_str()));
    }

    #[test]
    fn non_string_purpose_is_rejected(v in non_null_value()) {
        prop_assume!(!v.is_string());
        let mut context = Context::new();
        context.put(PURPOSE, v).unwrap();
        prop_assert!(context.get_purpose().is_err());
    }
}
