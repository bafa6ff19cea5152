// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use warp_math::{op, DefaultBackend, Fx32, Fx64, Lanes, ScalarBackend, Vec4};

type F = Fx32<16>;
type G = Fx64<32>;

fn scalar_ops(c: &mut Criterion) {
    let mut group = c.benchmark_group("fixed_scalar");
    let (a, b) = (G::from_f64(12.345), G::from_f64(-0.678));
    group.bench_function("q32_mul", |bench| bench.iter(|| black_box(a) * black_box(b)));
    group.bench_function("q32_div", |bench| bench.iter(|| black_box(a) / black_box(b)));
    group.bench_function("q32_sqrt", |bench| bench.iter(|| black_box(a).sqrt()));
    let (x, y) = (F::from_f64(12.345), F::from_f64(-0.678));
    group.bench_function("q16_mul", |bench| bench.iter(|| black_box(x) * black_box(y)));
    group.bench_function("q16_div", |bench| bench.iter(|| black_box(x) / black_box(y)));
    group.finish();
}

fn lanes<T, B>(c: &mut Criterion, name: &str, seed: [f64; 4])
where
    T: warp_math::Element,
    B: Lanes<T>,
{
    let a = Vec4::<T, B>::from_array(seed.map(T::from_f64));
    let b = Vec4::<T, B>::from_array(seed.map(|s| T::from_f64(1.0 - s * 0.5)));
    let mut group = c.benchmark_group(format!("fixed_vec4/{name}"));
    group.throughput(Throughput::Elements(4));
    group.bench_with_input(BenchmarkId::new("mul_add", B::NAME), &(a, b), |bench, &(a, b)| {
        bench.iter(|| black_box(a) * black_box(b) + black_box(a));
    });
    group.bench_with_input(BenchmarkId::new("dot", B::NAME), &(a, b), |bench, &(a, b)| {
        bench.iter(|| op::dot(black_box(a), black_box(b)));
    });
    group.bench_with_input(BenchmarkId::new("round", B::NAME), &a, |bench, &a| {
        bench.iter(|| op::round(black_box(a)));
    });
    group.finish();
}

fn lane_backends(c: &mut Criterion) {
    let seed = [1.25, -2.5, 0.125, 3.75];
    lanes::<F, ScalarBackend>(c, "q16_16", seed);
    lanes::<F, DefaultBackend>(c, "q16_16", seed);
    lanes::<G, ScalarBackend>(c, "q32_32", seed);
    lanes::<G, DefaultBackend>(c, "q32_32", seed);
}

criterion_group!(benches, scalar_ops, lane_backends);
criterion_main!(benches);
