use btree_engine::{BTree, BTreeError, KeyFn};
use proptest::collection::{btree_set, vec};
use proptest::prelude::*;
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
enum Op {
    Insert(u16),
    Remove(u16),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..500u16).prop_map(Op::Insert),
        2 => (0..500u16).prop_map(Op::Remove),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn operations_keep_invariants(min_degree in 2usize..10, ops in vec(op_strategy(), 0..400)) {
        let mut tree = BTree::with_natural_order(min_degree).unwrap();
        let mut reference = BTreeSet::new();

        for op in ops {
            match op {
                Op::Insert(key) => {
                    let inserted = reference.insert(key);
                    let result = tree.insert(key);
                    prop_assert_eq!(result.is_ok(), inserted);
                    if !inserted {
                        prop_assert_eq!(result, Err(BTreeError::DuplicateKey));
                    }
                }
                Op::Remove(key) => {
                    let removed = reference.remove(&key);
                    let result = tree.remove(&key);
                    prop_assert_eq!(result.is_ok(), removed);
                }
            }
            prop_assert!(tree.check_invariants());
        }

        prop_assert_eq!(tree.len(), reference.len());
        prop_assert!(tree.iter().eq(reference.iter()));
    }

    #[test]
    fn bulk_load_round_trips(min_degree in 2usize..12, keys in btree_set(any::<i32>(), 0..600)) {
        let mut tree = BTree::with_natural_order(min_degree).unwrap();
        tree.bulk_load(keys.iter().copied()).unwrap();
        prop_assert!(tree.check_invariants());

        let mut walked = Vec::new();
        tree.walk(|record| walked.push(*record));
        prop_assert_eq!(walked, keys.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn bounds_bracket_key(keys in btree_set(0..1000u32, 1..300), probe in 0..1001u32) {
        let mut tree = BTree::with_natural_order(2).unwrap();
        for &key in &keys {
            tree.insert(key).unwrap();
        }

        let lower = tree.lower_bound(&probe);
        let upper = tree.upper_bound(&probe);
        prop_assert_eq!(lower.get(), keys.range(probe..).next());
        prop_assert_eq!(upper.get(), keys.range(probe + 1..).next());

        if keys.contains(&probe) {
            let mut stepped = lower.clone();
            stepped.advance();
            prop_assert_eq!(stepped, upper);
        } else {
            prop_assert_eq!(lower, upper);
        }
    }

    #[test]
    fn keyed_records_follow_key_order(entries in vec((any::<u16>(), any::<u8>()), 0..300)) {
        let mut tree = BTree::new(3, KeyFn::new(|entry: &(u16, u8)| &entry.0)).unwrap();
        let mut reference = std::collections::BTreeMap::new();

        for (key, payload) in entries {
            let fresh = !reference.contains_key(&key);
            if fresh {
                reference.insert(key, payload);
            }
            prop_assert_eq!(tree.insert((key, payload)).is_ok(), fresh);
        }

        let stored: Vec<(u16, u8)> = tree.iter().copied().collect();
        let expected: Vec<(u16, u8)> = reference.into_iter().collect();
        prop_assert_eq!(stored, expected);
    }
}
