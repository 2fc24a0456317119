#![no_main]

use std::collections::BTreeSet;

use libfuzzer_sys::fuzz_target;

use bitgraph::{core::BitSet, infra::testing::check_set_consistency};

fuzz_target!(|ops: Vec<(bool, u16)>| {
    let mut set = BitSet::new();
    let mut model = BTreeSet::new();

    for (insert, value) in ops {
        let value = value as usize;

        if insert {
            assert_eq!(set.insert(value), model.insert(value));
        } else {
            assert_eq!(set.remove(value), model.remove(&value));
        }

        check_set_consistency(&set)
            .as_ref()
            .map_err(ToString::to_string)
            .unwrap();
    }

    assert_eq!(set.values(), model.into_iter().collect::<Vec<_>>());
});
