#![cfg(test)]

// Property tests for Table kept inside the crate so they can check the
// digest index and chain layout directly.

use crate::digest::Digester;
use crate::error::TableError;
use crate::table::{Lookup, Table};
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

/// Folds digests into a handful of values so that chains get long and
/// distinct keys routinely share a digest.
#[derive(Clone)]
struct FoldingDigester {
    modulus: u64,
}

impl<Q: ?Sized + AsRef<str>> Digester<Q> for FoldingDigester {
    fn digest(&self, key: &Q) -> Result<u64, TableError> {
        let sum: u64 = key.as_ref().bytes().map(u64::from).sum();
        Ok(sum % self.modulus)
    }
}

// Pool-indexed operations so shrinking moves toward earlier keys.
#[derive(Clone, Debug)]
enum Op {
    Set(usize, i32),
    SetAbsent(i32),
    Get(usize),
    GetMany(Vec<usize>),
    Keys,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-d]{0,3}", 1..=10).prop_flat_map(|pool| {
        let idx = 0..pool.len();
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Set(i, v)),
            1 => any::<i32>().prop_map(Op::SetAbsent),
            2 => idx.clone().prop_map(Op::Get),
            2 => proptest::collection::vec(idx.clone(), 0..5).prop_map(Op::GetMany),
            1 => Just(Op::Keys),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn run_scenario<D: Digester<String> + Digester<str>>(
    mut sut: Table<String, i32, D>,
    pool: &[String],
    ops: Vec<Op>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<String, i32> = HashMap::new();
    for op in ops {
        match op {
            Op::Set(i, v) => {
                let k = pool[i].clone();
                let entry = sut.set(k.clone(), v).expect("string keys digest");
                prop_assert_eq!(entry.key(), &k);
                prop_assert_eq!(*entry.value(), v);
                model.insert(k, v);
            }
            Op::SetAbsent(v) => {
                let before = sut.len();
                prop_assert!(sut.set_opt(None, v).expect("no-op").is_none());
                prop_assert_eq!(sut.len(), before);
            }
            Op::Get(i) => {
                let k = pool[i].as_str();
                prop_assert_eq!(sut.get(k).expect("digest"), model.get(k));
                prop_assert_eq!(sut.contains_key(k).expect("digest"), model.contains_key(k));
            }
            Op::GetMany(idxs) => {
                let keys: Vec<&str> = idxs.iter().map(|&i| pool[i].as_str()).collect();
                let expected: Vec<&i32> = keys.iter().filter_map(|k| model.get(*k)).collect();
                let got = sut.get_many(keys.iter().copied()).expect("digest");
                match expected.len() {
                    0 => prop_assert_eq!(&got, &Lookup::Missing),
                    1 => prop_assert_eq!(&got, &Lookup::One(expected[0])),
                    _ => prop_assert_eq!(&got, &Lookup::Many(expected.clone())),
                }
                prop_assert_eq!(got.into_vec(), expected);
            }
            Op::Keys => {
                let keys: Vec<&String> = sut.keys().collect();
                let unique: BTreeSet<&String> = keys.iter().copied().collect();
                prop_assert_eq!(keys.len(), unique.len(), "each key exactly once");
                let expected: BTreeSet<&String> = model.keys().collect();
                prop_assert_eq!(unique, expected);
            }
        }
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        sut.check_invariants();
    }
    Ok(())
}

// Property: state-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - `set` then `get` round-trips; overwrites never add entries.
// - `keys` yields each stored key exactly once.
// - `get_many` returns hits in request order and collapses one hit.
// - Absent-key writes are no-ops.
// - The digest index equals `digest % bucket_count` and every stored key
//   sits in the bucket its digest maps to.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_default_digester((pool, ops) in arb_scenario(), buckets in 1usize..16) {
        let sut: Table<String, i32> = Table::with_buckets(buckets).unwrap();
        run_scenario(sut, &pool, ops)?;
    }

    #[test]
    fn prop_state_machine_colliding_digests((pool, ops) in arb_scenario(), buckets in 1usize..8, modulus in 1u64..6) {
        let sut = Table::with_digester(buckets, FoldingDigester { modulus }).unwrap();
        run_scenario(sut, &pool, ops)?;
    }
}

// Property: within one bucket, keys keep their first-insertion order no
// matter how often they are overwritten afterwards.
proptest! {
    #[test]
    fn prop_chain_order_is_first_insertion(keys in proptest::collection::vec("[a-c]{1,2}", 1..40)) {
        let mut sut = Table::with_digester(1, FoldingDigester { modulus: 1 }).unwrap();
        let mut first_seen: Vec<String> = Vec::new();
        for (v, k) in keys.into_iter().enumerate() {
            if !first_seen.contains(&k) {
                first_seen.push(k.clone());
            }
            sut.set(k, v).unwrap();
        }
        let order: Vec<&String> = sut.keys().collect();
        prop_assert_eq!(order, first_seen.iter().collect::<Vec<_>>());
        prop_assert_eq!(sut.bucket_len(0), first_seen.len());
    }
}
