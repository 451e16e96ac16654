#![no_main]

use std::collections::BTreeMap as NatMap;
use std::ops::Range;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use sorted_collections::GenericSortedDict;
use sorted_collections::shared_ptr::RcK;

type Dict = GenericSortedDict<u16, u32, RcK>;

#[derive(Arbitrary, Debug)]
enum Action<A: Clone + Ord> {
    Insert(A, u32),
    Get(A),
    Range(Range<A>),
    Snapshot(A, u32),
    IndexWalk(u8),
}

fn check_range(dict: &Dict, nat: &NatMap<u16, u32>, range: Range<u16>) {
    if range.start > range.end {
        assert_eq!(dict.range(range).next(), None);
        return;
    }
    assert!(dict.range(range.clone()).eq(nat.range(range.clone())));
    let range = range.start..=range.end;
    assert!(dict.range(range.clone()).eq(nat.range(range.clone())));
    assert!(dict.range(range.clone()).rev().eq(nat.range(range).rev()));
}

fuzz_target!(|input: (u8, u8, Vec<Action<u16>>)| {
    let (leaf, internal, actions) = input;
    let leaf = 2 + leaf as usize % 8;
    let internal = 2 + internal as usize % 6;
    let mut dict = Dict::with_capacities(leaf, internal);
    let mut nat = NatMap::new();
    for action in actions {
        match action {
            Action::Insert(key, value) => {
                assert_eq!(nat.insert(key, value), dict.insert(key, value));
            }
            Action::Get(key) => {
                assert_eq!(nat.get(&key), dict.get(&key));
                assert_eq!(nat.contains_key(&key), dict.contains_key(&key));
                match dict.index_of(&key) {
                    Some(index) => {
                        let offset = nat.range(..key).count();
                        assert_eq!(offset, dict.offset_of(&index));
                        assert_eq!((&key, &nat[&key]), dict.element(&index));
                    }
                    None => assert!(!nat.contains_key(&key)),
                }
            }
            Action::Range(range) => {
                assert_eq!(dict.get_min(), nat.first_key_value());
                assert_eq!(dict.get_max(), nat.last_key_value());
                check_range(&dict, &nat, range);
            }
            Action::Snapshot(key, value) => {
                let before = dict.clone();
                let old = nat.clone();
                nat.insert(key, value);
                dict.insert(key, value);
                assert!(before.iter().eq(old.iter()));
            }
            Action::IndexWalk(step) => {
                let step = 1 + step as usize;
                let mut index = dict.start_index();
                let mut expected = nat.iter();
                let mut offset = 0;
                while !index.is_end() {
                    let element = expected.next();
                    assert_eq!(element, Some(dict.element(&index)));
                    assert_eq!(offset, dict.offset_of(&index));
                    index = dict.index_after(&index);
                    offset += 1;
                    for _ in 1..step {
                        expected.next();
                        if index.is_end() {
                            break;
                        }
                        index = dict.index_after(&index);
                        offset += 1;
                    }
                }
                if offset > 0 {
                    let last = dict.index_before(&dict.end_index());
                    assert_eq!(nat.len() - 1, dict.offset_of(&last));
                }
            }
        }
        assert_eq!(nat.len(), dict.len());
    }
    assert!(dict.iter().eq(nat.iter()));
    assert!(dict.iter().rev().eq(nat.iter().rev()));
    for offset in 0..nat.len() {
        assert_eq!(nat.iter().nth(offset), dict.get_index(offset));
    }
    assert_eq!(Dict::from_iter(nat.clone()), dict);
    assert!(dict.into_iter().eq(nat));
});
