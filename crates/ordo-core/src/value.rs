//! Dynamic value definitions
//!
//! A [`Value`] is any key the universal comparator can order:
//! - Scalars: null, booleans, integers, floats (NaN included), complex numbers
//! - Text and byte strings
//! - Containers: sequences, tuples, mappings, sets, frozen sets
//! - Numeric arrays of integer, float or complex elements
//! - Opaque values known only by their type name

use std::fmt;

use bytes::{Bytes, BytesMut};

use crate::{Comparator, OrderError, OrderResult};

/// Complex number with `f64` parts
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    #[inline]
    pub const fn new(re: f64, im: f64) -> Self {
        Complex { re, im }
    }
}

impl From<f64> for Complex {
    fn from(re: f64) -> Self {
        Complex::new(re, 0.0)
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}{:+}j)", self.re, self.im)
    }
}

/// Element kind of a numeric array
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Int,
    Float,
    Complex,
}

/// Flat, row-major element storage of a numeric array
#[derive(Clone, Debug)]
pub enum ArrayData {
    Int(Vec<i64>),
    Float(Vec<f64>),
    Complex(Vec<Complex>),
}

impl ArrayData {
    pub fn len(&self) -> usize {
        match self {
            ArrayData::Int(d) => d.len(),
            ArrayData::Float(d) => d.len(),
            ArrayData::Complex(d) => d.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn element_kind(&self) -> ElementKind {
        match self {
            ArrayData::Int(_) => ElementKind::Int,
            ArrayData::Float(_) => ElementKind::Float,
            ArrayData::Complex(_) => ElementKind::Complex,
        }
    }
}

/// Multi-dimensional numeric array
///
/// Only what ordering needs: a shape and the elements in row-major order.
#[derive(Clone, Debug)]
pub struct NdArray {
    shape: Vec<usize>,
    data: ArrayData,
}

impl NdArray {
    /// Create an array, checking that the shape covers exactly the elements
    pub fn new(shape: Vec<usize>, data: ArrayData) -> OrderResult<Self> {
        let expected = shape.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d));
        if expected != Some(data.len()) {
            return Err(OrderError::ShapeMismatch {
                shape,
                len: data.len(),
            });
        }
        Ok(NdArray { shape, data })
    }

    /// One-dimensional array
    pub fn vector(data: ArrayData) -> Self {
        NdArray {
            shape: vec![data.len()],
            data,
        }
    }

    /// Boolean arrays are stored as integer arrays of 0 and 1
    pub fn from_bools(shape: Vec<usize>, data: &[bool]) -> OrderResult<Self> {
        NdArray::new(
            shape,
            ArrayData::Int(data.iter().map(|&b| i64::from(b)).collect()),
        )
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    #[inline]
    pub fn data(&self) -> &ArrayData {
        &self.data
    }

    #[inline]
    pub fn element_kind(&self) -> ElementKind {
        self.data.element_kind()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Value of a type outside the built-in kinds
///
/// Identified by its fully-qualified type name. Two opaque values of the same
/// name only compare when a rule for that name is registered with the
/// [`Comparator`]; the rule sees the payloads.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Opaque {
    type_name: String,
    payload: Bytes,
}

impl Opaque {
    pub fn new(type_name: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        Opaque {
            type_name: type_name.into(),
            payload: payload.into(),
        }
    }

    /// Opaque value with an empty payload
    pub fn named(type_name: impl Into<String>) -> Self {
        Opaque::new(type_name, Bytes::new())
    }

    #[inline]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

/// Concrete kind of a value, the tag the comparator dispatches on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Bool,
    Int,
    Float,
    Complex,
    Text,
    Bytes,
    ByteArray,
    Sequence,
    Tuple,
    Mapping,
    Set,
    FrozenSet,
    IntArray,
    FloatArray,
    ComplexArray,
    Opaque,
}

impl Kind {
    /// Stable type name of a built-in kind
    ///
    /// `Null` owns the reserved empty name. `Opaque` values carry their own
    /// name, see [`Value::type_name`].
    pub const fn name(self) -> &'static str {
        match self {
            Kind::Null => "",
            Kind::Bool => "value::bool",
            Kind::Int => "value::int",
            Kind::Float => "value::float",
            Kind::Complex => "value::complex",
            Kind::Text => "value::text",
            Kind::Bytes => "value::bytes",
            Kind::ByteArray => "value::bytearray",
            Kind::Sequence => "value::sequence",
            Kind::Tuple => "value::tuple",
            Kind::Mapping => "value::mapping",
            Kind::Set => "value::set",
            Kind::FrozenSet => "value::frozenset",
            Kind::IntArray => "value::ndarray<int>",
            Kind::FloatArray => "value::ndarray<float>",
            Kind::ComplexArray => "value::ndarray<complex>",
            Kind::Opaque => "value::opaque",
        }
    }
}

/// Dynamically typed key
#[derive(Clone, Debug)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    /// May be NaN; NaN is the least float and equal to itself
    Float(f64),
    Complex(Complex),
    Text(String),
    /// Immutable byte string
    Bytes(Bytes),
    /// Mutable byte string
    ByteArray(BytesMut),
    /// Variable-length ordered sequence
    Sequence(Vec<Value>),
    /// Fixed-length ordered sequence
    Tuple(Vec<Value>),
    /// Key/value pairs with unique keys; pair order is irrelevant
    Mapping(Vec<(Value, Value)>),
    /// Unique elements; element order is irrelevant
    Set(Vec<Value>),
    /// Immutable set
    FrozenSet(Vec<Value>),
    Array(NdArray),
    Opaque(Opaque),
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::Float(_) => Kind::Float,
            Value::Complex(_) => Kind::Complex,
            Value::Text(_) => Kind::Text,
            Value::Bytes(_) => Kind::Bytes,
            Value::ByteArray(_) => Kind::ByteArray,
            Value::Sequence(_) => Kind::Sequence,
            Value::Tuple(_) => Kind::Tuple,
            Value::Mapping(_) => Kind::Mapping,
            Value::Set(_) => Kind::Set,
            Value::FrozenSet(_) => Kind::FrozenSet,
            Value::Array(a) => match a.element_kind() {
                ElementKind::Int => Kind::IntArray,
                ElementKind::Float => Kind::FloatArray,
                ElementKind::Complex => Kind::ComplexArray,
            },
            Value::Opaque(_) => Kind::Opaque,
        }
    }

    /// Fully-qualified type name
    pub fn type_name(&self) -> &str {
        match self {
            Value::Opaque(o) => o.type_name(),
            other => other.kind().name(),
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn complex(re: f64, im: f64) -> Self {
        Value::Complex(Complex::new(re, im))
    }

    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    pub fn bytes(b: impl Into<Bytes>) -> Self {
        Value::Bytes(b.into())
    }

    pub fn byte_array(b: &[u8]) -> Self {
        Value::ByteArray(BytesMut::from(b))
    }

    pub fn sequence<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Value::Sequence(items.into_iter().map(Into::into).collect())
    }

    pub fn tuple<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Value::Tuple(items.into_iter().map(Into::into).collect())
    }

    /// Build a set, dropping elements equal under the exact order
    pub fn set<I, T>(items: I) -> OrderResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Ok(Value::Set(unique_sorted(items)?))
    }

    /// Build a frozen set, dropping elements equal under the exact order
    pub fn frozen_set<I, T>(items: I) -> OrderResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Ok(Value::FrozenSet(unique_sorted(items)?))
    }

    /// Build a mapping; for repeated keys the last value wins
    pub fn mapping<I, K, V>(pairs: I) -> OrderResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        let comparator = Comparator::new();
        let pairs: Vec<(Value, Value)> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let sorted = comparator.sort_entries(&pairs)?;
        let mut unique: Vec<(Value, Value)> = Vec::with_capacity(sorted.len());
        for (key, value) in sorted {
            match unique.last_mut() {
                // stable sort keeps insertion order within equal keys
                Some(last) if comparator.equal(&last.0, key)? => last.1 = value.clone(),
                _ => unique.push((key.clone(), value.clone())),
            }
        }
        Ok(Value::Mapping(unique))
    }
}

fn unique_sorted<I, T>(items: I) -> OrderResult<Vec<Value>>
where
    I: IntoIterator<Item = T>,
    T: Into<Value>,
{
    let comparator = Comparator::new();
    let items: Vec<Value> = items.into_iter().map(Into::into).collect();

    let sorted = comparator.sort(&items)?;
    let mut unique: Vec<Value> = Vec::with_capacity(sorted.len());
    for item in sorted {
        match unique.last() {
            Some(last) if comparator.equal(last, item)? => {}
            _ => unique.push(item.clone()),
        }
    }
    Ok(unique)
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<Complex> for Value {
    fn from(c: Complex) -> Self {
        Value::Complex(c)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Bytes> for Value {
    fn from(b: Bytes) -> Self {
        Value::Bytes(b)
    }
}

impl From<BytesMut> for Value {
    fn from(b: BytesMut) -> Self {
        Value::ByteArray(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

impl From<NdArray> for Value {
    fn from(a: NdArray) -> Self {
        Value::Array(a)
    }
}

impl From<Opaque> for Value {
    fn from(o: Opaque) -> Self {
        Value::Opaque(o)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
