// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use warp_geom::{Aabb, Frustum, Obb, Ray};
use warp_math::{Mat4, Quat, Vec3};

fn boxes(n: usize) -> Vec<Aabb> {
    (0..n)
        .map(|i| {
            let f = f32::from(u16::try_from(i % 1_000).unwrap_or(0));
            let center = Vec3::new(f * 0.37 % 40.0 - 20.0, f * 0.11 % 10.0 - 5.0, -f * 0.05 - 1.0);
            Aabb::from_center_half_extents(center, Vec3::splat(0.5))
        })
        .collect()
}

fn bench_frustum_culling(c: &mut Criterion) {
    let proj = Mat4::<f32>::perspective_rh(1.1, 16.0 / 9.0, 0.1, 100.0);
    let view = Mat4::<f32>::look_at_rh(Vec3::new(0.0, 1.0, 5.0), Vec3::new(0.0, 0.0, -10.0), Vec3::unit_y());
    let Some(frustum) = Frustum::from_view_projection(&(proj * view)) else {
        return;
    };
    let mut group = c.benchmark_group("frustum_cull_aabb");
    for &n in &[64_usize, 1_024] {
        let items = boxes(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &items, |b, items| {
            b.iter(|| items.iter().filter(|bx| frustum.intersects_aabb(bx)).count());
        });
    }
    group.finish();
}

fn bench_ray_casts(c: &mut Criterion) {
    let items = boxes(1_024);
    let Some(ray) = Ray::new(Vec3::new(0.0, 0.0, 2.0), Vec3::new(0.1, -0.05, -1.0)) else {
        return;
    };
    let mut group = c.benchmark_group("ray_cast");
    group.throughput(Throughput::Elements(items.len() as u64));
    group.bench_function("aabb_slab", |b| {
        b.iter(|| {
            items
                .iter()
                .filter_map(|bx| ray.intersect_aabb(bx))
                .fold(f32::INFINITY, f32::min)
        });
    });
    group.finish();
}

fn bench_obb_sat(c: &mut Criterion) {
    let a: Obb = Obb::new(Vec3::zero(), Vec3::new(1.0, 0.5, 2.0), Quat::from_axis_angle(Vec3::unit_y(), 0.3));
    let b: Obb = Obb::new(
        Vec3::new(1.5, 0.4, 0.2),
        Vec3::one(),
        Quat::from_axis_angle(Vec3::new(1.0, 1.0, 0.0), 0.9),
    );
    c.bench_function("obb_overlap_sat", |bench| {
        bench.iter(|| black_box(a).overlaps(black_box(&b)));
    });
}

criterion_group!(benches, bench_frustum_culling, bench_ray_casts, bench_obb_sat);
criterion_main!(benches);
