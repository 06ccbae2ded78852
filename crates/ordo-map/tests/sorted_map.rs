//! Sorted map behaviour against a linear-scan model

use ordo_core::{equal, Comparator, Value};
use ordo_map::{MapError, SortedMap, VecStore};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Set(Value, u32),
    Delete(Value),
}

fn key() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        (-4i64..4).prop_map(Value::Int),
        (-4i64..4).prop_map(|i| Value::Float(i as f64 / 2.0)),
        (-2i64..2, -2i64..2).prop_map(|(re, im)| Value::complex(re as f64, im as f64)),
        "[a-d]{0,3}".prop_map(Value::Text),
        any::<bool>().prop_map(Value::Bool),
    ];
    leaf.prop_recursive(2, 8, 3, |inner| {
        prop::collection::vec(inner, 0..3).prop_map(Value::Sequence)
    })
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (key(), any::<u32>()).prop_map(|(k, v)| Op::Set(k, v)),
        1 => key().prop_map(Op::Delete),
    ]
}

/// Unsorted entries, found by linear equality scan
#[derive(Default)]
struct Model {
    entries: Vec<(Value, u32)>,
}

impl Model {
    fn position(&self, key: &Value) -> Option<usize> {
        self.entries
            .iter()
            .position(|(k, _)| equal(k, key).unwrap())
    }

    fn set(&mut self, key: Value, value: u32) -> Option<u32> {
        match self.position(&key) {
            Some(i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    fn delete(&mut self, key: &Value) -> Option<u32> {
        self.position(key).map(|i| self.entries.remove(i).1)
    }
}

#[test]
fn test_end_to_end_scenario() {
    let mut map = SortedMap::new();
    map.set(Value::from("b"), 1).unwrap();
    map.set(Value::from("a"), 2).unwrap();
    map.set(Value::from("c"), 3).unwrap();

    let keys: Vec<_> = map
        .keys()
        .map(|k| match k {
            Value::Text(s) => s.as_str(),
            _ => "",
        })
        .collect();
    assert_eq!(keys, vec!["a", "b", "c"]);
    assert_eq!(*map.get(&Value::from("a")).unwrap(), 2);

    assert_eq!(map.delete(&Value::from("b")).unwrap(), 1);
    assert!(!map.contains_key(&Value::from("b")).unwrap());
    assert_eq!(map.len(), 2);
    assert_eq!(*map.set_default(Value::from("a"), 99).unwrap(), 2);
}

#[test]
fn test_store_round_trip() {
    let map = SortedMap::from_entries([
        (Value::from("z"), 0u8),
        (Value::Int(3), 1),
        (Value::sequence([1i64, 2]), 2),
    ])
    .unwrap();

    let store: VecStore<u8> = map.into_store();
    let reopened = SortedMap::from_store(store).unwrap();
    assert_eq!(reopened.len(), 3);
    assert_eq!(*reopened.get(&Value::Int(3)).unwrap(), 1);
    assert!(matches!(
        reopened.get(&Value::Int(4)),
        Err(MapError::KeyNotFound { .. })
    ));
}

proptest! {
    #[test]
    fn prop_matches_model(ops in prop::collection::vec(op(), 0..64)) {
        let mut map = SortedMap::new();
        let mut model = Model::default();

        for op in ops {
            match op {
                Op::Set(k, v) => {
                    prop_assert_eq!(map.set(k.clone(), v).unwrap(), model.set(k, v));
                }
                Op::Delete(k) => {
                    prop_assert_eq!(map.delete(&k).ok(), model.delete(&k));
                }
            }
        }

        prop_assert_eq!(map.len(), model.entries.len());

        let cmp = Comparator::new();
        let reference = cmp.sort_entries(&model.entries).unwrap();
        for ((key, value), (expected_key, expected_value)) in map.iter().zip(reference) {
            prop_assert!(cmp.equal(key, expected_key).unwrap());
            prop_assert_eq!(value, expected_value);
        }
        for pair in map.keys().collect::<Vec<_>>().windows(2) {
            prop_assert!(cmp.less_than(pair[0], pair[1]).unwrap());
        }
    }
}
