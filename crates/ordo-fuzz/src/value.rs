//! Structured value generation from fuzzer bytes

use arbitrary::Arbitrary;
use ordo_core::{ArrayData, Comparator, Complex, NdArray, Opaque, OrderResult, Value};

/// Type name of the fuzzed opaque values, ordered by payload bytes
pub const TOKEN_TYPE: &str = "fuzz::Token";

/// Containers nested deeper than this become `Null`
pub const MAX_NESTING: usize = 6;

/// Comparator that knows how to order [`TOKEN_TYPE`] values
pub fn fuzz_comparator() -> Comparator {
    // build only rejects a bad tolerance
    Comparator::builder()
        .rule(TOKEN_TYPE, |a, b| a < b)
        .build()
        .unwrap_or_default()
}

/// Arbitrary-derived mirror of [`Value`]
#[derive(Arbitrary, Clone, Debug)]
pub enum FuzzValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Complex(f64, f64),
    Text(String),
    Bytes(Vec<u8>),
    ByteArray(Vec<u8>),
    Sequence(Vec<FuzzValue>),
    Tuple(Vec<FuzzValue>),
    Mapping(Vec<(FuzzValue, FuzzValue)>),
    Set(Vec<FuzzValue>),
    FrozenSet(Vec<FuzzValue>),
    IntArray(Vec<i64>),
    FloatArray(Vec<f64>),
    ComplexArray(Vec<(f64, f64)>),
    Matrix { rows: u8, data: Vec<f64> },
    Token(Vec<u8>),
}

impl FuzzValue {
    /// Convert to a [`Value`], folding anything below [`MAX_NESTING`] to `Null`
    pub fn to_value(&self) -> OrderResult<Value> {
        self.to_value_at(0)
    }

    fn to_value_at(&self, depth: usize) -> OrderResult<Value> {
        let items = |xs: &[FuzzValue]| -> OrderResult<Vec<Value>> {
            xs.iter().map(|x| x.to_value_at(depth + 1)).collect()
        };

        if depth >= MAX_NESTING && self.is_container() {
            return Ok(Value::Null);
        }

        let cmp = fuzz_comparator();
        Ok(match self {
            FuzzValue::Null => Value::Null,
            FuzzValue::Bool(b) => Value::Bool(*b),
            FuzzValue::Int(i) => Value::Int(*i),
            FuzzValue::Float(f) => Value::Float(*f),
            FuzzValue::Complex(re, im) => Value::complex(*re, *im),
            FuzzValue::Text(s) => Value::Text(s.clone()),
            FuzzValue::Bytes(b) => Value::bytes(b.clone()),
            FuzzValue::ByteArray(b) => Value::byte_array(b),
            FuzzValue::Sequence(xs) => Value::Sequence(items(xs)?),
            FuzzValue::Tuple(xs) => Value::Tuple(items(xs)?),
            FuzzValue::Mapping(pairs) => {
                let mut converted = Vec::with_capacity(pairs.len());
                for (k, v) in pairs {
                    converted.push((k.to_value_at(depth + 1)?, v.to_value_at(depth + 1)?));
                }
                // keep only the last value for each key, as a mapping would
                let sorted = cmp.sort_entries(&converted)?;
                let mut unique: Vec<(Value, Value)> = Vec::with_capacity(sorted.len());
                for (k, v) in sorted {
                    let repeated = match unique.last() {
                        Some((prev, _)) => cmp.equal(prev, k)?,
                        None => false,
                    };
                    if repeated {
                        if let Some(last) = unique.last_mut() {
                            last.1 = v.clone();
                        }
                    } else {
                        unique.push((k.clone(), v.clone()));
                    }
                }
                Value::Mapping(unique)
            }
            FuzzValue::Set(xs) => Value::Set(unique(&cmp, items(xs)?)?),
            FuzzValue::FrozenSet(xs) => Value::FrozenSet(unique(&cmp, items(xs)?)?),
            FuzzValue::IntArray(d) => Value::Array(NdArray::vector(ArrayData::Int(d.clone()))),
            FuzzValue::FloatArray(d) => {
                Value::Array(NdArray::vector(ArrayData::Float(d.clone())))
            }
            FuzzValue::ComplexArray(d) => {
                let data = d.iter().map(|&(re, im)| Complex::new(re, im)).collect();
                Value::Array(NdArray::vector(ArrayData::Complex(data)))
            }
            FuzzValue::Matrix { rows, data } => {
                let rows = usize::from(*rows % 4) + 1;
                let cols = data.len() / rows;
                let data = data[..rows * cols].to_vec();
                Value::Array(NdArray::new(vec![rows, cols], ArrayData::Float(data))?)
            }
            FuzzValue::Token(payload) => Value::Opaque(Opaque::new(TOKEN_TYPE, payload.clone())),
        })
    }

    fn is_container(&self) -> bool {
        matches!(
            self,
            FuzzValue::Sequence(_)
                | FuzzValue::Tuple(_)
                | FuzzValue::Mapping(_)
                | FuzzValue::Set(_)
                | FuzzValue::FrozenSet(_)
        )
    }
}

/// Sort and drop repeats under the fuzz comparator
fn unique(cmp: &Comparator, items: Vec<Value>) -> OrderResult<Vec<Value>> {
    let sorted = cmp.sort(&items)?;
    let mut out: Vec<Value> = Vec::with_capacity(sorted.len());
    for item in sorted {
        let repeated = match out.last() {
            Some(prev) => cmp.equal(prev, item)?,
            None => false,
        };
        if !repeated {
            out.push(item.clone());
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use arbitrary::Unstructured;

    use super::*;

    #[test]
    fn test_from_bytes_never_fails() {
        let cmp = fuzz_comparator();
        for seed in 0u8..64 {
            let data: Vec<u8> = (0..256).map(|i| (i as u8).wrapping_mul(seed)).collect();
            let mut u = Unstructured::new(&data);
            if let Ok(fv) = FuzzValue::arbitrary(&mut u) {
                let value = fv.to_value().unwrap();
                assert!(!cmp.less_than(&value, &value).unwrap());
            }
        }
    }

    #[test]
    fn test_matrix_shape() {
        let fv = FuzzValue::Matrix {
            rows: 1,
            data: vec![1.0, 2.0, 3.0, 4.0, 5.0],
        };
        match fv.to_value().unwrap() {
            Value::Array(a) => assert_eq!(a.shape(), &[2, 2]),
            other => panic!("expected array, got {:?}", other),
        }
    }

    #[test]
    fn test_nesting_is_capped() {
        let mut fv = FuzzValue::Int(1);
        for _ in 0..(MAX_NESTING + 4) {
            fv = FuzzValue::Sequence(vec![fv]);
        }

        let mut value = fv.to_value().unwrap();
        let mut depth = 0;
        while let Value::Sequence(mut items) = value {
            value = items.pop().unwrap_or(Value::Null);
            depth += 1;
        }
        assert_eq!(depth, MAX_NESTING);
        assert!(value.is_null());
    }

    #[test]
    fn test_tokens_are_ordered() {
        let cmp = fuzz_comparator();
        let a = FuzzValue::Token(vec![1]).to_value().unwrap();
        let b = FuzzValue::Token(vec![2]).to_value().unwrap();
        assert!(cmp.less_than(&a, &b).unwrap());
    }

    #[test]
    fn test_mapping_last_value_wins() {
        let fv = FuzzValue::Mapping(vec![
            (FuzzValue::Int(1), FuzzValue::Text("a".into())),
            (FuzzValue::Bool(true), FuzzValue::Text("b".into())),
        ]);
        match fv.to_value().unwrap() {
            Value::Mapping(pairs) => {
                assert_eq!(pairs.len(), 1);
                assert!(matches!(&pairs[0].1, Value::Text(s) if s == "b"));
            }
            other => panic!("expected mapping, got {:?}", other),
        }
    }
}
