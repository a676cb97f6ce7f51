//! Property-based tests for the minimality index using proptest.

use super::sorted_ids::{contains_all, union, union_len};
use super::BloomTrie;
use proptest::prelude::*;

/// Random sorted set over a small universe, so that subsets are common
fn arb_set() -> impl Strategy<Value = Vec<u32>> {
    proptest::collection::btree_set(0..12u32, 0..6).prop_map(|s| s.into_iter().collect())
}

proptest! {
    #[test]
    fn bloom_trie_agrees_with_linear_scan(
        stored in proptest::collection::vec(arb_set(), 0..30),
        queries in proptest::collection::vec(arb_set(), 1..20),
    ) {
        let mut trie = BloomTrie::new();
        for set in &stored {
            trie.insert(set);
        }
        for query in &queries {
            let expected = !stored.iter().any(|s| contains_all(query, s));
            prop_assert_eq!(trie.is_minimal(query), expected, "query {:?}", query);
        }
    }

    #[test]
    fn insert_if_minimal_keeps_an_antichain(sets in proptest::collection::vec(arb_set(), 0..40)) {
        let mut trie = BloomTrie::new();
        let mut kept: Vec<Vec<u32>> = Vec::new();
        for set in &sets {
            if trie.insert_if_minimal(set) {
                kept.push(set.clone());
            }
        }
        for (i, a) in kept.iter().enumerate() {
            for b in &kept[..i] {
                // later sets are never supersets of earlier ones
                prop_assert!(!contains_all(a, b));
            }
        }
    }

    #[test]
    fn union_is_sorted_superset(a in arb_set(), b in arb_set()) {
        let u = union(&a, &b);
        prop_assert!(u.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(contains_all(&u, &a));
        prop_assert!(contains_all(&u, &b));
        prop_assert_eq!(u.len(), union_len(&a, &b));
    }
}
