//! Benchmarks for ORDO comparator operations

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use ordo_core::{ArrayData, Comparator, NdArray, Value};
use ordo_test::random_key;

fn bench_same_kind(c: &mut Criterion) {
    let cmp = Comparator::new();
    let (x, y) = (Value::Int(41), Value::Int(42));

    c.bench_function("less_than_int", |b| {
        b.iter(|| cmp.less_than(black_box(&x), black_box(&y)))
    });
}

fn bench_cross_kind(c: &mut Criterion) {
    let cmp = Comparator::new();
    let x = Value::Bool(true);
    let y = Value::complex(1.0, 0.5);
    let z = Value::from("abc");

    c.bench_function("less_than_upcast", |b| {
        b.iter(|| cmp.less_than(black_box(&x), black_box(&y)))
    });

    c.bench_function("less_than_type_name", |b| {
        b.iter(|| cmp.less_than(black_box(&y), black_box(&z)))
    });
}

fn bench_nested(c: &mut Criterion) {
    let cmp = Comparator::new();
    let x = Value::sequence((0..32).map(|i| Value::sequence([i, i + 1])));
    let mut items: Vec<Value> = (0..32).map(|i| Value::sequence([i, i + 1])).collect();
    items[31] = Value::sequence([31, 33]);
    let y = Value::Sequence(items);

    c.bench_function("less_than_nested_sequence", |b| {
        b.iter(|| cmp.less_than(black_box(&x), black_box(&y)))
    });

    let set = Value::set((0..32i64).rev()).unwrap();
    let other = Value::set(0..32i64).unwrap();
    c.bench_function("equal_set", |b| {
        b.iter(|| cmp.equal(black_box(&set), black_box(&other)))
    });
}

fn bench_array(c: &mut Criterion) {
    let cmp = Comparator::new();
    let mut data: Vec<f64> = (0..4096).map(|i| i as f64).collect();
    let x = Value::Array(NdArray::vector(ArrayData::Float(data.clone())));
    data[4000] += 1.0;
    let y = Value::Array(NdArray::vector(ArrayData::Float(data)));

    c.bench_function("less_than_array_4096", |b| {
        b.iter(|| cmp.less_than(black_box(&x), black_box(&y)))
    });
}

fn bench_sort(c: &mut Criterion) {
    let cmp = Comparator::new();
    let mut rng = StdRng::seed_from_u64(42);
    let items: Vec<Value> = (0..256).map(|_| random_key(&mut rng, 2)).collect();

    c.bench_function("sort_256_mixed", |b| {
        b.iter(|| black_box(cmp.sort(black_box(&items)).unwrap().len()))
    });
}

criterion_group!(
    benches,
    bench_same_kind,
    bench_cross_kind,
    bench_nested,
    bench_array,
    bench_sort
);
criterion_main!(benches);
