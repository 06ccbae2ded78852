//! Property tests: the exact order is a strict total order over mixed kinds

use ordo_core::{ArrayData, Comparator, NdArray, Value};
use proptest::prelude::*;

/// Small domains so that equal values across kinds come up often
fn float() -> impl Strategy<Value = f64> {
    prop_oneof![
        Just(f64::NAN),
        (-3i64..3).prop_map(|i| i as f64),
        Just(0.5),
        Just(f64::INFINITY),
    ]
}

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-3i64..3).prop_map(Value::Int),
        float().prop_map(Value::Float),
        (float(), float()).prop_map(|(re, im)| Value::complex(re, im)),
        "[a-c]{0,3}".prop_map(Value::Text),
        prop::collection::vec(b'a'..b'd', 0..3).prop_map(|b| Value::bytes(b)),
        prop::collection::vec(b'a'..b'd', 0..3).prop_map(|b| Value::byte_array(&b)),
        prop::collection::vec(-2i64..2, 0..3)
            .prop_map(|d| Value::Array(NdArray::vector(ArrayData::Int(d)))),
        prop::collection::vec(float(), 0..3)
            .prop_map(|d| Value::Array(NdArray::vector(ArrayData::Float(d)))),
    ]
}

fn value() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(3, 24, 3, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..3).prop_map(Value::Sequence),
            prop::collection::vec(inner.clone(), 0..3).prop_map(Value::Tuple),
            prop::collection::vec(inner.clone(), 0..3)
                .prop_map(|items| Value::set(items).expect("no opaque values")),
            prop::collection::vec(inner.clone(), 0..3)
                .prop_map(|items| Value::frozen_set(items).expect("no opaque values")),
            prop::collection::vec((inner.clone(), inner), 0..3)
                .prop_map(|pairs| Value::mapping(pairs).expect("no opaque values")),
        ]
    })
}

proptest! {
    #[test]
    fn prop_irreflexive(x in value()) {
        let cmp = Comparator::new();
        prop_assert!(!cmp.less_than(&x, &x).unwrap());
        prop_assert!(cmp.equal(&x, &x).unwrap());
    }

    #[test]
    fn prop_antisymmetric(x in value(), y in value()) {
        let cmp = Comparator::new();
        let xy = cmp.less_than(&x, &y).unwrap();
        let yx = cmp.less_than(&y, &x).unwrap();
        prop_assert!(!(xy && yx), "{:?} and {:?} are each less than the other", x, y);
        prop_assert_eq!(cmp.greater_than(&y, &x).unwrap(), xy);
    }

    #[test]
    fn prop_transitive(x in value(), y in value(), z in value()) {
        let cmp = Comparator::new();
        let lt = |a: &Value, b: &Value| cmp.less_than(a, b).unwrap();
        let eq = |a: &Value, b: &Value| cmp.equal(a, b).unwrap();

        if lt(&x, &y) && lt(&y, &z) {
            prop_assert!(lt(&x, &z));
        }
        if eq(&x, &y) && eq(&y, &z) {
            prop_assert!(eq(&x, &z));
        }
        if lt(&x, &y) && eq(&y, &z) {
            prop_assert!(lt(&x, &z));
        }
        if eq(&x, &y) && lt(&y, &z) {
            prop_assert!(lt(&x, &z));
        }
    }

    #[test]
    fn prop_sort_is_ascending(items in prop::collection::vec(value(), 0..12)) {
        let cmp = Comparator::new();
        let sorted = cmp.sort(&items).unwrap();
        prop_assert_eq!(sorted.len(), items.len());
        for pair in sorted.windows(2) {
            prop_assert!(!cmp.less_than(pair[1], pair[0]).unwrap());
        }
    }

    #[test]
    fn prop_tuple_equals_sequence(items in prop::collection::vec(value(), 0..4)) {
        let cmp = Comparator::new();
        let seq = Value::Sequence(items.clone());
        let tuple = Value::Tuple(items);
        prop_assert!(cmp.equal(&seq, &tuple).unwrap());
    }
}
