//! Universal value order
//!
//! `less_than` is a strict total order over every [`Value`]:
//! 1. Values of the same kind are compared by that kind's rule.
//! 2. Otherwise both are converted to their least common ancestor in the
//!    [`lattice`](crate::lattice) and compared there.
//! 3. Values that only meet at the lattice root are ordered by type name.
//!
//! Length comes first for every string and container: a shorter text,
//! byte string, sequence, set, mapping or array shape is always less.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::{debug, warn};

use crate::lattice::{common_kind, family_name};
use crate::{
    ArrayData, CompareConfig, Complex, Kind, NdArray, Opaque, OrderError, OrderResult, Value,
};

/// Less-than rule for the payloads of one opaque type
pub type OpaqueRule = fn(&[u8], &[u8]) -> bool;

/// Elements per block when scanning arrays for the first difference
const SCAN_BLOCK: usize = 64;

/// Universal comparator
///
/// Immutable once built. Cheap to share between threads.
#[derive(Clone, Debug, Default)]
pub struct Comparator {
    config: CompareConfig,
    rules: HashMap<String, OpaqueRule>,
}

/// Builder for a [`Comparator`] with custom tolerance or opaque rules
#[derive(Clone, Debug, Default)]
pub struct ComparatorBuilder {
    config: CompareConfig,
    rules: HashMap<String, OpaqueRule>,
}

impl ComparatorBuilder {
    pub fn config(mut self, config: CompareConfig) -> Self {
        self.config = config;
        self
    }

    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.config.tolerance = tolerance;
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    /// Order opaque values named `type_name` with `rule`
    pub fn rule(mut self, type_name: impl Into<String>, rule: OpaqueRule) -> Self {
        self.rules.insert(type_name.into(), rule);
        self
    }

    pub fn build(self) -> OrderResult<Comparator> {
        if !self.config.is_valid() {
            return Err(OrderError::InvalidTolerance(self.config.tolerance));
        }
        Ok(Comparator {
            config: self.config,
            rules: self.rules,
        })
    }
}

impl Comparator {
    /// Exact comparator without opaque rules
    pub fn new() -> Self {
        Comparator::default()
    }

    /// Comparator with the default absolute tolerance
    pub fn approximate() -> Self {
        Comparator {
            config: CompareConfig::approximate(),
            rules: HashMap::new(),
        }
    }

    pub fn with_config(config: CompareConfig) -> OrderResult<Self> {
        Comparator::builder().config(config).build()
    }

    pub fn builder() -> ComparatorBuilder {
        ComparatorBuilder::default()
    }

    #[inline]
    pub fn config(&self) -> &CompareConfig {
        &self.config
    }

    /// Test whether `x < y`
    pub fn less_than(&self, x: &Value, y: &Value) -> OrderResult<bool> {
        Ok(self.ord(x, y, self.config.tolerance, 0)? == Ordering::Less)
    }

    /// Test whether `x < y` with a one-off absolute tolerance
    pub fn less_than_within(&self, x: &Value, y: &Value, tolerance: f64) -> OrderResult<bool> {
        if !(tolerance.is_finite() && tolerance >= 0.0) {
            return Err(OrderError::InvalidTolerance(tolerance));
        }
        Ok(self.ord(x, y, tolerance, 0)? == Ordering::Less)
    }

    /// Test whether `x > y`
    pub fn greater_than(&self, x: &Value, y: &Value) -> OrderResult<bool> {
        self.less_than(y, x)
    }

    /// Test whether neither `x < y` nor `y < x`
    pub fn equal(&self, x: &Value, y: &Value) -> OrderResult<bool> {
        Ok(!self.less_than(x, y)? && !self.less_than(y, x)?)
    }

    pub fn compare(&self, x: &Value, y: &Value) -> OrderResult<Ordering> {
        self.ord(x, y, self.config.tolerance, 0)
    }

    /// Stable ascending sort
    ///
    /// Always uses the exact order, whatever the configured tolerance: an
    /// approximate order is not transitive and cannot sort.
    pub fn sort<'a>(&self, items: &'a [Value]) -> OrderResult<Vec<&'a Value>> {
        self.sorted(items.iter(), |v| v, 0)
    }

    /// Stable ascending sort of entries by key, exact order
    pub fn sort_entries<'a, V>(&self, entries: &'a [(Value, V)]) -> OrderResult<Vec<&'a (Value, V)>> {
        self.sorted(entries.iter(), |e| &e.0, 0)
    }

    /// Three-way comparison; each nested pair is descended into once
    fn ord(&self, x: &Value, y: &Value, tol: f64, depth: usize) -> OrderResult<Ordering> {
        if depth > self.config.max_depth {
            warn!(limit = self.config.max_depth, "comparison nesting limit reached");
            return Err(OrderError::DepthLimitExceeded {
                limit: self.config.max_depth,
            });
        }

        let (rx, ry) = match common_kind(x.kind(), y.kind()) {
            Some(kind) => (Repr::of(x, kind), Repr::of(y, kind)),
            None => (Repr::root(x), Repr::root(y)),
        };
        self.ord_repr(&rx, &ry, tol, depth)
    }

    fn ord_repr(&self, x: &Repr<'_>, y: &Repr<'_>, tol: f64, depth: usize) -> OrderResult<Ordering> {
        let ord = match (x, y) {
            (Repr::Name { name: a, builtin: ba }, Repr::Name { name: b, builtin: bb }) => {
                // an opaque name can shadow a built-in one
                text_ord(a, b).then(ba.cmp(bb))
            }
            (Repr::Int(a), Repr::Int(b)) => a.cmp(b),
            (Repr::Float(a), Repr::Float(b)) => float_ord(*a, *b, tol),
            (Repr::Complex(a), Repr::Complex(b)) => {
                float_ord(a.re, b.re, tol).then_with(|| float_ord(a.im, b.im, tol))
            }
            (Repr::Text(a), Repr::Text(b)) => text_ord(a, b),
            (Repr::Bytes(a), Repr::Bytes(b)) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
            (Repr::Sequence(a), Repr::Sequence(b)) => {
                if a.len() != b.len() {
                    return Ok(a.len().cmp(&b.len()));
                }
                return self.lex_ord(a.iter().zip(b.iter()), tol, depth);
            }
            (Repr::Mapping(a), Repr::Mapping(b)) => {
                if a.len() != b.len() {
                    return Ok(a.len().cmp(&b.len()));
                }
                let a = self.sorted(a.iter(), |e| &e.0, depth + 1)?;
                let b = self.sorted(b.iter(), |e| &e.0, depth + 1)?;
                let pairs = a
                    .into_iter()
                    .zip(b)
                    .flat_map(|(p, q)| [(&p.0, &q.0), (&p.1, &q.1)]);
                return self.lex_ord(pairs, tol, depth);
            }
            (Repr::Set(a), Repr::Set(b)) => {
                if a.len() != b.len() {
                    return Ok(a.len().cmp(&b.len()));
                }
                let a = self.sorted(a.iter(), |v| v, depth + 1)?;
                let b = self.sorted(b.iter(), |v| v, depth + 1)?;
                return self.lex_ord(a.into_iter().zip(b), tol, depth);
            }
            (
                Repr::IntArray { shape: sa, data: a },
                Repr::IntArray { shape: sb, data: b },
            ) => shape_ord(sa, sb)
                .then_with(|| first_difference(&a[..], &b[..], |&v| v, |p, q| p.cmp(&q))),
            (
                Repr::FloatArray { shape: sa, data: a },
                Repr::FloatArray { shape: sb, data: b },
            ) => shape_ord(sa, sb)
                .then_with(|| first_difference(&a[..], &b[..], |&v| v, |p, q| float_ord(p, q, tol))),
            (
                Repr::ComplexArray { shape: sa, data: a },
                Repr::ComplexArray { shape: sb, data: b },
            ) => shape_ord(sa, sb)
                .then_with(|| first_difference(&a[..], &b[..], |c| c.re, |p, q| float_ord(p, q, tol)))
                .then_with(|| first_difference(&a[..], &b[..], |c| c.im, |p, q| float_ord(p, q, tol))),
            (Repr::Opaque(a), Repr::Opaque(b)) => return self.opaque_ord(a, b),
            // `Repr::of` never pairs different representations; keep the order total anyway
            _ => x.tag().cmp(&y.tag()),
        };
        Ok(ord)
    }

    /// Lexicographic order over already length-matched pairs
    fn lex_ord<'v>(
        &self,
        pairs: impl Iterator<Item = (&'v Value, &'v Value)>,
        tol: f64,
        depth: usize,
    ) -> OrderResult<Ordering> {
        for (x, y) in pairs {
            match self.ord(x, y, tol, depth + 1)? {
                Ordering::Equal => continue,
                decided => return Ok(decided),
            }
        }
        Ok(Ordering::Equal)
    }

    fn opaque_ord(&self, x: &Opaque, y: &Opaque) -> OrderResult<Ordering> {
        let (nx, ny) = (x.type_name(), y.type_name());
        if nx != ny {
            return Ok(text_ord(nx, ny));
        }
        if nx.is_empty() {
            return Ok(Ordering::Equal);
        }
        match self.rules.get(nx) {
            Some(rule) => {
                let (xs, ys) = (x.payload(), y.payload());
                Ok(if rule(xs, ys) {
                    Ordering::Less
                } else if rule(ys, xs) {
                    Ordering::Greater
                } else {
                    Ordering::Equal
                })
            }
            None => {
                debug!(type_name = nx, "no ordering rule registered");
                Err(OrderError::Unordered {
                    type_name: nx.to_owned(),
                })
            }
        }
    }

    /// Exact, stable merge sort; never panics on a misbehaving opaque rule
    fn sorted<'v, T>(
        &self,
        items: impl Iterator<Item = &'v T>,
        key: fn(&T) -> &Value,
        depth: usize,
    ) -> OrderResult<Vec<&'v T>> {
        let lt = |a: &T, b: &T| -> OrderResult<bool> {
            Ok(self.ord(key(a), key(b), 0.0, depth)? == Ordering::Less)
        };
        merge_sort(items.collect(), &lt)
    }
}

fn merge_sort<'v, T>(
    mut items: Vec<&'v T>,
    lt: &impl Fn(&T, &T) -> OrderResult<bool>,
) -> OrderResult<Vec<&'v T>> {
    if items.len() <= 1 {
        return Ok(items);
    }
    let right = items.split_off(items.len() / 2);
    let left = merge_sort(items, lt)?;
    let right = merge_sort(right, lt)?;

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    while let (Some(&a), Some(&b)) = (left.peek(), right.peek()) {
        // take from the right only when strictly less, keeping the sort stable
        if lt(b, a)? {
            merged.push(b);
            right.next();
        } else {
            merged.push(a);
            left.next();
        }
    }
    merged.extend(left);
    merged.extend(right);
    Ok(merged)
}

/// A value converted to the representation it is compared in
enum Repr<'a> {
    /// Lattice root: ordered by type name
    Name { name: &'a str, builtin: bool },
    Int(i64),
    Float(f64),
    Complex(Complex),
    Text(&'a str),
    Bytes(&'a [u8]),
    Sequence(&'a [Value]),
    Mapping(&'a [(Value, Value)]),
    Set(&'a [Value]),
    IntArray {
        shape: &'a [usize],
        data: &'a [i64],
    },
    FloatArray {
        shape: &'a [usize],
        data: Cow<'a, [f64]>,
    },
    ComplexArray {
        shape: &'a [usize],
        data: Cow<'a, [Complex]>,
    },
    Opaque(&'a Opaque),
}

impl<'a> Repr<'a> {
    /// Representation at the lattice root
    fn root(value: &'a Value) -> Self {
        match value {
            Value::Null => Repr::Name {
                name: "",
                builtin: false,
            },
            Value::Opaque(o) => Repr::Name {
                name: o.type_name(),
                builtin: false,
            },
            other => Repr::Name {
                name: family_name(other.kind()),
                builtin: true,
            },
        }
    }

    /// Representation of `value` upcast to `kind`
    fn of(value: &'a Value, kind: Kind) -> Self {
        match (kind, value) {
            (Kind::Bool | Kind::Int, Value::Bool(b)) => Repr::Int(i64::from(*b)),
            (Kind::Int, Value::Int(i)) => Repr::Int(*i),
            (Kind::Float, Value::Bool(b)) => Repr::Float(f64::from(u8::from(*b))),
            (Kind::Float, Value::Int(i)) => Repr::Float(*i as f64),
            (Kind::Float, Value::Float(f)) => Repr::Float(*f),
            (Kind::Complex, Value::Bool(b)) => Repr::Complex(Complex::from(f64::from(u8::from(*b)))),
            (Kind::Complex, Value::Int(i)) => Repr::Complex(Complex::from(*i as f64)),
            (Kind::Complex, Value::Float(f)) => Repr::Complex(Complex::from(*f)),
            (Kind::Complex, Value::Complex(c)) => Repr::Complex(*c),
            (Kind::Text, Value::Text(s)) => Repr::Text(s),
            (Kind::Bytes | Kind::ByteArray, Value::Text(s)) => Repr::Bytes(s.as_bytes()),
            (Kind::Bytes | Kind::ByteArray, Value::Bytes(b)) => Repr::Bytes(b),
            (Kind::ByteArray, Value::ByteArray(b)) => Repr::Bytes(b),
            (Kind::Sequence | Kind::Tuple, Value::Sequence(items) | Value::Tuple(items)) => {
                Repr::Sequence(items)
            }
            (Kind::Mapping, Value::Mapping(pairs)) => Repr::Mapping(pairs),
            (Kind::Set | Kind::FrozenSet, Value::Set(items) | Value::FrozenSet(items)) => {
                Repr::Set(items)
            }
            (Kind::IntArray | Kind::FloatArray | Kind::ComplexArray, Value::Array(a)) => {
                Repr::array(a, kind)
            }
            (Kind::Opaque, Value::Opaque(o)) => Repr::Opaque(o),
            _ => Repr::root(value),
        }
    }

    fn array(a: &'a NdArray, kind: Kind) -> Self {
        let shape = a.shape();
        match (kind, a.data()) {
            (Kind::IntArray, ArrayData::Int(d)) => Repr::IntArray { shape, data: d },
            (Kind::FloatArray, ArrayData::Int(d)) => Repr::FloatArray {
                shape,
                data: Cow::Owned(d.iter().map(|&i| i as f64).collect()),
            },
            (Kind::FloatArray, ArrayData::Float(d)) => Repr::FloatArray {
                shape,
                data: Cow::Borrowed(d.as_slice()),
            },
            (Kind::ComplexArray, ArrayData::Int(d)) => Repr::ComplexArray {
                shape,
                data: Cow::Owned(d.iter().map(|&i| Complex::from(i as f64)).collect()),
            },
            (Kind::ComplexArray, ArrayData::Float(d)) => Repr::ComplexArray {
                shape,
                data: Cow::Owned(d.iter().map(|&f| Complex::from(f)).collect()),
            },
            (Kind::ComplexArray, ArrayData::Complex(d)) => Repr::ComplexArray {
                shape,
                data: Cow::Borrowed(d.as_slice()),
            },
            _ => Repr::Name {
                name: family_name(kind),
                builtin: true,
            },
        }
    }

    fn tag(&self) -> u8 {
        match self {
            Repr::Name { .. } => 0,
            Repr::Int(_) => 1,
            Repr::Float(_) => 2,
            Repr::Complex(_) => 3,
            Repr::Text(_) => 4,
            Repr::Bytes(_) => 5,
            Repr::Sequence(_) => 6,
            Repr::Mapping(_) => 7,
            Repr::Set(_) => 8,
            Repr::IntArray { .. } => 9,
            Repr::FloatArray { .. } => 10,
            Repr::ComplexArray { .. } => 11,
            Repr::Opaque(_) => 12,
        }
    }
}

/// NaN is the least float and equal to itself
#[inline]
fn float_lt(x: f64, y: f64, tol: f64) -> bool {
    !y.is_nan() && (x.is_nan() || x + tol < y)
}

#[inline]
fn float_ord(x: f64, y: f64, tol: f64) -> Ordering {
    if float_lt(x, y, tol) {
        Ordering::Less
    } else if float_lt(y, x, tol) {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

/// Length of the UTF-8 encoding first, then code-point order
///
/// Measuring the encoding keeps text consistent with its upcast to bytes;
/// byte order of UTF-8 agrees with code-point order.
#[inline]
fn text_ord(x: &str, y: &str) -> Ordering {
    x.len().cmp(&y.len()).then_with(|| x.cmp(y))
}

/// Shapes compare as integer sequences
fn shape_ord(xs: &[usize], ys: &[usize]) -> Ordering {
    xs.len().cmp(&ys.len()).then_with(|| xs.cmp(ys))
}

/// Direction of the first position where two equal-length arrays differ
///
/// Whole blocks that compare equal are skipped in one slice comparison; a
/// block holding NaN never compares equal and is scanned element by element,
/// so the result matches a plain per-element loop.
fn first_difference<T, U>(
    xs: &[T],
    ys: &[T],
    project: impl Fn(&T) -> U,
    ord: impl Fn(U, U) -> Ordering,
) -> Ordering
where
    T: PartialEq,
{
    for (bx, by) in xs.chunks(SCAN_BLOCK).zip(ys.chunks(SCAN_BLOCK)) {
        if bx == by {
            continue;
        }
        for (a, b) in bx.iter().zip(by) {
            match ord(project(a), project(b)) {
                Ordering::Equal => continue,
                decided => return decided,
            }
        }
    }
    Ordering::Equal
}

/// Test whether `x < y` under the exact order
pub fn less_than(x: &Value, y: &Value) -> OrderResult<bool> {
    Comparator::new().less_than(x, y)
}

/// Test whether `x < y` with an absolute tolerance
pub fn less_than_within(x: &Value, y: &Value, tolerance: f64) -> OrderResult<bool> {
    Comparator::new().less_than_within(x, y, tolerance)
}

/// Test whether `x > y` under the exact order
pub fn greater_than(x: &Value, y: &Value) -> OrderResult<bool> {
    Comparator::new().greater_than(x, y)
}

/// Test whether `x` and `y` are equal under the exact order
pub fn equal(x: &Value, y: &Value) -> OrderResult<bool> {
    Comparator::new().equal(x, y)
}
