// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fuzz `IHashMultimap` with arbitrary operation sequences.
//!
//! Checks the map against a naive vector model after every operation.
#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pion_ihash::{CaseFold, IHashMultimap};

#[derive(Debug, Arbitrary)]
enum Op {
    Insert(String, String),
    Find(String),
    Erase(String),
    RemoveValue(String, String),
}

#[derive(Debug, Arbitrary)]
struct Input {
    unicode: bool,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let fold = if input.unicode {
        CaseFold::Unicode
    } else {
        CaseFold::Ascii
    };
    let mut map = IHashMultimap::with_fold(fold);
    let mut model: Vec<(String, String)> = Vec::new();

    for op in input.ops.into_iter().take(256) {
        match op {
            Op::Insert(k, v) => {
                map.insert(k.clone(), v.clone());
                model.push((k, v));
            }
            Op::Find(k) => {
                let expected: Vec<_> = model
                    .iter()
                    .filter(|(mk, _)| fold.keys_equal(mk, &k))
                    .collect();
                let found = map.find(&k);
                assert_eq!(found.len(), expected.len());
                for (entry, (mk, mv)) in found.iter().zip(expected) {
                    assert_eq!(entry.key(), mk);
                    assert_eq!(entry.value(), mv);
                }
            }
            Op::Erase(k) => {
                let before = model.len();
                model.retain(|(mk, _)| !fold.keys_equal(mk, &k));
                assert_eq!(map.erase(&k), before - model.len());
            }
            Op::RemoveValue(k, v) => {
                let pos = model
                    .iter()
                    .position(|(mk, mv)| fold.keys_equal(mk, &k) && *mv == v);
                let removed = map.remove_value(&k, &v);
                assert_eq!(removed.is_some(), pos.is_some());
                if let Some(pos) = pos {
                    model.remove(pos);
                }
            }
        }
        assert_eq!(map.len(), model.len());
    }
});
