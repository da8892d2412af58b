use super::*;

use proptest::prelude::*;
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
enum Op {
    Insert(Vec<u8>, u32, bool),
    Remove(Vec<u8>),
    RemoveSubtree(Vec<u8>),
    Get(Vec<u8>),
}

fn key_strategy() -> impl Strategy<Value = Vec<u8>> + Clone {
    // A narrow alphabet forces shared prefixes, splits and merges.
    prop::collection::vec(b'a'..=b'd', 0..=14)
}

/// Mostly runs of one byte, so long capped chains form and later split,
/// with the occasional arbitrary byte to branch off them.
fn run_byte() -> impl Strategy<Value = u8> + Clone {
    prop_oneof![
        6 => Just(b'a'),
        2 => b'a'..=b'b',
        1 => any::<u8>(),
    ]
}

fn run_key_strategy() -> impl Strategy<Value = Vec<u8>> + Clone {
    prop::collection::vec(run_byte(), 0..=14)
}

fn ops_over<K, P>(key: K, prefix: P) -> impl Strategy<Value = Vec<Op>>
where
    K: Strategy<Value = Vec<u8>> + Clone + 'static,
    P: Strategy<Value = Vec<u8>> + 'static,
{
    let op = prop_oneof![
        50 => (key.clone(), any::<u32>(), any::<bool>())
            .prop_map(|(k, v, overwrite)| Op::Insert(k, v, overwrite)),
        25 => key.clone().prop_map(Op::Remove),
        4 => prefix.prop_map(Op::RemoveSubtree),
        21 => key.prop_map(Op::Get),
    ];
    prop::collection::vec(op, 0..=400)
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    ops_over(key_strategy(), prop::collection::vec(b'a'..=b'd', 1..=3))
}

fn run_ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    ops_over(run_key_strategy(), prop::collection::vec(run_byte(), 1..=3))
}

fn options_strategy() -> impl Strategy<Value = TrieOptions> {
    (1usize..=12, 1usize..=6).prop_map(|(prefix, sparse)| {
        TrieOptions::default()
            .max_prefix_per_node(prefix)
            .max_children_per_sparse_node(sparse)
    })
}

fn small_cap_options_strategy() -> impl Strategy<Value = TrieOptions> {
    (1usize..=5, 1usize..=4).prop_map(|(prefix, sparse)| {
        TrieOptions::default()
            .max_prefix_per_node(prefix)
            .max_children_per_sparse_node(sparse)
    })
}

fn apply(trie: &mut Trie<u32>, model: &mut BTreeMap<Vec<u8>, u32>, op: Op) -> Result<(), TestCaseError> {
    match op {
        Op::Insert(key, value, overwrite) => {
            let expected = overwrite || !model.contains_key(&key);
            prop_assert_eq!(trie.insert_at(&key, value, overwrite), expected);
            if expected {
                model.insert(key, value);
            }
        }
        Op::Remove(key) => {
            prop_assert_eq!(trie.remove(&key), model.remove(&key));
        }
        Op::RemoveSubtree(prefix) => {
            let doomed: Vec<Vec<u8>> = model
                .keys()
                .filter(|k| k.starts_with(&prefix))
                .cloned()
                .collect();
            prop_assert_eq!(trie.delete_subtree(&prefix), !doomed.is_empty());
            for k in doomed {
                model.remove(&k);
            }
        }
        Op::Get(key) => {
            prop_assert_eq!(trie.get(&key), model.get(&key));
            prop_assert_eq!(trie.matches(&key), model.contains_key(&key));
        }
    }
    prop_assert_eq!(trie.len(), model.len());
    Ok(())
}

fn contents(trie: &Trie<u32>) -> Vec<(Vec<u8>, u32)> {
    let mut out = Vec::new();
    trie.visit(|key, value| {
        out.push((key.to_vec(), *value));
        VisitFlow::<()>::Continue
    })
    .unwrap();
    out
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence_with_btreemap(opts in options_strategy(), ops in ops_strategy()) {
        let mut trie = Trie::with_options(opts).unwrap();
        let mut model = BTreeMap::new();

        for op in ops {
            apply(&mut trie, &mut model, op)?;
            trie.assert_invariants();
        }

        let expected: Vec<(Vec<u8>, u32)> = model.iter().map(|(k, v)| (k.clone(), *v)).collect();
        prop_assert_eq!(contents(&trie), expected.clone());
        let via_iter: Vec<(Vec<u8>, u32)> = trie.iter().map(|(k, v)| (k, *v)).collect();
        prop_assert_eq!(via_iter, expected);
    }

    #[test]
    fn prop_runs_under_small_caps_stay_compacted(
        opts in small_cap_options_strategy(),
        ops in run_ops_strategy(),
    ) {
        let mut trie = Trie::with_options(opts).unwrap();
        let mut model = BTreeMap::new();

        for op in ops {
            apply(&mut trie, &mut model, op)?;
            trie.assert_invariants();
        }

        let expected: Vec<(Vec<u8>, u32)> = model.iter().map(|(k, v)| (k.clone(), *v)).collect();
        prop_assert_eq!(contents(&trie), expected);
    }

    #[test]
    fn prop_sparse_and_dense_agree(ops in ops_strategy()) {
        let mut sparse = Trie::with_options(TrieOptions::default().max_children_per_sparse_node(256)).unwrap();
        let mut dense = Trie::with_options(TrieOptions::default().max_children_per_sparse_node(1)).unwrap();
        let mut model_s = BTreeMap::new();
        let mut model_d = BTreeMap::new();

        for op in ops {
            apply(&mut sparse, &mut model_s, op.clone())?;
            apply(&mut dense, &mut model_d, op)?;
        }
        prop_assert_eq!(contents(&sparse), contents(&dense));
    }

    #[test]
    fn prop_visit_subtree_is_prefix_filter(
        keys in prop::collection::btree_set(key_strategy(), 0..64),
        prefix in prop::collection::vec(b'a'..=b'd', 0..=4),
    ) {
        let mut trie = Trie::new();
        for (i, k) in keys.iter().enumerate() {
            trie.insert_at(k, i as u32, true);
        }

        let mut seen = Vec::new();
        trie.visit_subtree(&prefix, |key, _| {
            seen.push(key.to_vec());
            VisitFlow::<()>::Continue
        })
        .unwrap();
        let expected: Vec<Vec<u8>> = keys.iter().filter(|k| k.starts_with(&prefix)).cloned().collect();
        prop_assert_eq!(trie.matches_subtree(&prefix), !expected.is_empty());
        prop_assert_eq!(seen, expected);
    }

    #[test]
    fn prop_visit_prefixes_finds_ancestors(
        keys in prop::collection::btree_set(key_strategy(), 0..64),
        target in key_strategy(),
    ) {
        let mut trie = Trie::new();
        for k in &keys {
            trie.insert_at(k, 0u32, true);
        }

        let mut seen = Vec::new();
        trie.visit_prefixes(&target, |key, _| {
            seen.push(key.to_vec());
            VisitFlow::<()>::Continue
        })
        .unwrap();
        let expected: Vec<Vec<u8>> = keys.iter().filter(|k| target.starts_with(k)).cloned().collect();
        prop_assert_eq!(seen, expected);
    }

    #[test]
    fn prop_skip_subtree_prunes_descendants(
        keys in prop::collection::btree_set(key_strategy(), 1..64),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut trie = Trie::new();
        for k in &keys {
            trie.insert_at(k, 0u32, true);
        }
        let all: Vec<&Vec<u8>> = keys.iter().collect();
        let pivot = all[pick.index(all.len())].clone();

        let mut seen = Vec::new();
        trie.visit(|key, _| {
            seen.push(key.to_vec());
            if key == pivot.as_slice() {
                VisitFlow::<()>::SkipSubtree
            } else {
                VisitFlow::Continue
            }
        })
        .unwrap();
        let expected: Vec<Vec<u8>> = keys
            .iter()
            .filter(|k| **k == pivot || !k.starts_with(&pivot))
            .cloned()
            .collect();
        prop_assert_eq!(seen, expected);
    }
}

#[test]
fn every_removal_order_compacts() {
    let keys: [&[u8]; 6] = [b"a", b"ab", b"abc", b"abd", b"b", b"abcdefghijklmnop"];
    let opts = TrieOptions::default().max_prefix_per_node(3);

    // Rotations of the removal order exercise merges at every depth.
    for shift in 0..keys.len() {
        let mut trie = Trie::with_options(opts).unwrap();
        for k in keys {
            assert!(trie.insert_at(k, k.len(), false));
        }
        trie.assert_invariants();

        for i in 0..keys.len() {
            let k = keys[(i + shift) % keys.len()];
            assert_eq!(trie.remove(k), Some(k.len()));
            trie.assert_invariants();
            for j in i + 1..keys.len() {
                let left = keys[(j + shift) % keys.len()];
                assert_eq!(trie.get(left), Some(&left.len()));
            }
        }
        assert!(trie.is_empty());
    }
}
