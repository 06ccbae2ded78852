//! Order-law checks and map operation replay for fuzz targets

use arbitrary::Arbitrary;
use ordo_core::{Comparator, OrderResult, Value};
use ordo_map::{MapError, MapResult, SortedMap, VecStore};

use crate::{fuzz_comparator, FuzzValue};

/// Order law broken by a triple of values
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LawViolation {
    Reflexive,
    Asymmetric,
    Intransitive,
    EqualityIntransitive,
}

/// First law the triple breaks, if any
pub fn check_laws(
    cmp: &Comparator,
    x: &Value,
    y: &Value,
    z: &Value,
) -> OrderResult<Option<LawViolation>> {
    if cmp.less_than(x, x)? {
        return Ok(Some(LawViolation::Reflexive));
    }
    let (xy, yx) = (cmp.less_than(x, y)?, cmp.less_than(y, x)?);
    if xy && yx {
        return Ok(Some(LawViolation::Asymmetric));
    }
    if xy && cmp.less_than(y, z)? && !cmp.less_than(x, z)? {
        return Ok(Some(LawViolation::Intransitive));
    }
    if !xy && !yx && cmp.equal(y, z)? && !cmp.equal(x, z)? {
        return Ok(Some(LawViolation::EqualityIntransitive));
    }
    Ok(None)
}

/// One sorted map call
#[derive(Arbitrary, Clone, Debug)]
pub enum FuzzOp {
    Set(FuzzValue, u16),
    SetDefault(FuzzValue, u16),
    Delete(FuzzValue),
    Get(FuzzValue),
}

/// Outcome of replaying ops on a map and on a linear-scan model
#[derive(Debug, Default)]
pub struct ReplayReport {
    pub ops: usize,
    pub mismatches: u32,
    pub final_len: usize,
    pub keys_out_of_order: u32,
}

impl ReplayReport {
    pub fn is_valid(&self) -> bool {
        self.mismatches == 0 && self.keys_out_of_order == 0
    }
}

/// Replay `ops` on a sorted map and on an unsorted model, comparing results
pub fn replay(ops: &[FuzzOp]) -> MapResult<ReplayReport> {
    let cmp = fuzz_comparator();
    let mut map = SortedMap::with_comparator(VecStore::new(), cmp.clone())?;
    let mut model: Vec<(Value, u16)> = Vec::new();
    let mut report = ReplayReport::default();

    let find = |model: &[(Value, u16)], key: &Value| -> OrderResult<Option<usize>> {
        for (i, (k, _)) in model.iter().enumerate() {
            if cmp.equal(k, key)? {
                return Ok(Some(i));
            }
        }
        Ok(None)
    };

    for op in ops {
        report.ops += 1;
        match op {
            FuzzOp::Set(k, v) => {
                let key = k.to_value()?;
                let expected = match find(&model, &key)? {
                    Some(i) => Some(std::mem::replace(&mut model[i].1, *v)),
                    None => {
                        model.push((key.clone(), *v));
                        None
                    }
                };
                if map.set(key, *v)? != expected {
                    report.mismatches += 1;
                }
            }
            FuzzOp::SetDefault(k, v) => {
                let key = k.to_value()?;
                let expected = match find(&model, &key)? {
                    Some(i) => model[i].1,
                    None => {
                        model.push((key.clone(), *v));
                        *v
                    }
                };
                if *map.set_default(key, *v)? != expected {
                    report.mismatches += 1;
                }
            }
            FuzzOp::Delete(k) => {
                let key = k.to_value()?;
                let expected = find(&model, &key)?.map(|i| model.remove(i).1);
                let actual = match map.delete(&key) {
                    Ok(v) => Some(v),
                    Err(MapError::KeyNotFound { .. }) => None,
                    Err(e) => return Err(e),
                };
                if actual != expected {
                    report.mismatches += 1;
                }
            }
            FuzzOp::Get(k) => {
                let key = k.to_value()?;
                let expected = find(&model, &key)?.map(|i| model[i].1);
                let actual = match map.get(&key) {
                    Ok(v) => Some(*v),
                    Err(MapError::KeyNotFound { .. }) => None,
                    Err(e) => return Err(e),
                };
                if actual != expected {
                    report.mismatches += 1;
                }
            }
        }
    }

    report.final_len = map.len();
    if map.len() != model.len() {
        report.mismatches += 1;
    }
    let keys: Vec<&Value> = map.keys().collect();
    for pair in keys.windows(2) {
        if !cmp.less_than(pair[0], pair[1])? {
            report.keys_out_of_order += 1;
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use arbitrary::Unstructured;

    use super::*;

    #[test]
    fn test_laws_hold_on_samples() {
        let cmp = fuzz_comparator();
        let values = [
            Value::Null,
            Value::Int(1),
            Value::Bool(true),
            Value::Float(f64::NAN),
            Value::from("a"),
            Value::sequence([1i64]),
        ];
        for x in &values {
            for y in &values {
                for z in &values {
                    assert_eq!(check_laws(&cmp, x, y, z).unwrap(), None);
                }
            }
        }
    }

    #[test]
    fn test_replay_scripted() {
        let ops = vec![
            FuzzOp::Set(FuzzValue::Text("b".into()), 1),
            FuzzOp::Set(FuzzValue::Text("a".into()), 2),
            FuzzOp::SetDefault(FuzzValue::Text("a".into()), 9),
            FuzzOp::Set(FuzzValue::Int(1), 3),
            FuzzOp::Get(FuzzValue::Bool(true)),
            FuzzOp::Delete(FuzzValue::Float(1.0)),
            FuzzOp::Delete(FuzzValue::Null),
            FuzzOp::Set(FuzzValue::Token(vec![7]), 4),
        ];
        let report = replay(&ops).unwrap();
        assert!(report.is_valid(), "{:?}", report);
        assert_eq!(report.final_len, 3);
    }

    #[test]
    fn test_replay_from_bytes() {
        for seed in 1u8..32 {
            let data: Vec<u8> = (0..512).map(|i| (i as u8).wrapping_mul(seed) ^ seed).collect();
            let mut u = Unstructured::new(&data);
            if let Ok(ops) = Vec::<FuzzOp>::arbitrary(&mut u) {
                let report = replay(&ops).unwrap();
                assert!(report.is_valid(), "{:?}", report);
            }
        }
    }
}
