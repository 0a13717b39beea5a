use std::collections::HashMap;

use cuckoo::collections::{AdjacencyTable, AncestryTable, InsertOutcome};
use cuckoo::{Atomic, Plain, TwiceSet};
use proptest::prelude::*;

proptest! {
    #[test]
    fn twice_set_matches_saturating_counter(marks in proptest::collection::vec(0usize..80, 0..200)) {
        let set = TwiceSet::<Plain>::new(80);
        let mut model = [0u8; 80];
        for &node in &marks {
            set.mark(node);
            model[node] = (model[node] + 1).min(2);
        }
        for node in 0..80 {
            prop_assert_eq!(set.sightings(node), model[node]);
            prop_assert_eq!(set.is_nonleaf(node), model[node] == 2);
        }
        prop_assert_eq!(set.count_nonleaf(), model.iter().filter(|&&c| c == 2).count());
        set.reset();
        prop_assert_eq!(set.count_seen(), 0);
    }

    #[test]
    fn ancestry_matches_last_write_model(ops in proptest::collection::vec((0u32..32, 0u32..8), 1..48)) {
        let table = AncestryTable::<Atomic>::new(64);
        // Latest value per key, and whether it was written twice in a row.
        let mut model: HashMap<u32, (u32, u8)> = HashMap::new();
        let mut last_load = 0;
        for &(key, value) in &ops {
            let outcome = table.insert(key, value);
            match model.get_mut(&key) {
                None => {
                    prop_assert_eq!(outcome, InsertOutcome::Inserted);
                    model.insert(key, (value, 1));
                }
                Some(entry) if entry.0 == value => {
                    prop_assert_eq!(outcome, InsertOutcome::Duplicate);
                    entry.1 = 2;
                }
                Some(entry) => {
                    prop_assert_eq!(outcome, InsertOutcome::Replaced);
                    *entry = (value, 1);
                }
            }
            prop_assert!(table.load() >= last_load);
            last_load = table.load();
        }

        prop_assert_eq!(table.len(), model.len());
        for key in 0..32 {
            prop_assert_eq!(table.lookup(key), model.get(&key).map(|&(v, _)| v));
        }
        for (&key, &(value, count)) in &model {
            prop_assert_eq!(table.multiplicity(key, value), count);
        }
        table.clear();
        prop_assert_eq!(table.load(), 0);
        prop_assert!(table.is_empty());
    }

    #[test]
    fn adjacency_matches_multimap_model(ops in proptest::collection::vec((0u32..32, 0u32..8), 1..48)) {
        let table = AdjacencyTable::<Plain>::new(64);
        // Distinct values per key in first-insertion order, with insert counts.
        let mut model: HashMap<u32, Vec<(u32, u8)>> = HashMap::new();
        for &(key, value) in &ops {
            let values = model.entry(key).or_default();
            let outcome = table.insert(key, value);
            match values.iter_mut().find(|(v, _)| *v == value) {
                Some(entry) => {
                    prop_assert_eq!(outcome, InsertOutcome::Duplicate);
                    entry.1 = 2;
                }
                None => {
                    prop_assert_eq!(outcome, InsertOutcome::Inserted);
                    values.push((value, 1));
                }
            }
        }

        let distinct: usize = model.values().map(Vec::len).sum();
        prop_assert_eq!(table.len(), distinct);
        for key in 0..32 {
            let expected: Vec<u32> = model
                .get(&key)
                .map(|vs| vs.iter().map(|(v, _)| *v).collect())
                .unwrap_or_default();
            prop_assert_eq!(table.values(key).collect::<Vec<_>>(), expected);
        }
        for (key, values) in &model {
            for &(value, count) in values {
                prop_assert_eq!(table.multiplicity(*key, value), count);
            }
        }
    }
}
