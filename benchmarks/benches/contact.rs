//! Wall contact benchmarks (criterion - wall-clock time).
//!
//! Run all:    cargo bench --manifest-path benchmarks/Cargo.toml --bench contact
//! Filter:     cargo bench --manifest-path benchmarks/Cargo.toml --bench contact -- classify

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use glam::DVec3;
use rein_dem::{
    ContactConfig, ContactRecordBuilder, Facet, NodalForceBuffer, RadiusBoundary,
    TorqueForceInputs, WallContactSystem, WallMotionSpec, accumulate_glued_forces,
    apply_wall_motion, distribute_torque, edge_check, facet_check, resolve_pairs, vertex_check,
};
use rein_dem_bench::*;

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

fn bench_classify(c: &mut Criterion) {
    let triangle = Facet::triangle(DVec3::ZERO, DVec3::X, DVec3::Y);
    let quad = Facet::quad(
        DVec3::ZERO,
        DVec3::X,
        DVec3::new(1.0, 1.0, 0.0),
        DVec3::Y,
    );

    {
        let mut group = c.benchmark_group("classify/facet_check");
        let inside = DVec3::new(0.2, 0.3, 0.05);
        let outside = DVec3::new(2.0, 2.0, 0.05);
        group.bench_function("triangle_inside", |b| {
            b.iter(|| facet_check(&triangle, inside, 0.1, RadiusBoundary::Inclusive));
        });
        group.bench_function("triangle_outside", |b| {
            b.iter(|| facet_check(&triangle, outside, 0.1, RadiusBoundary::Inclusive));
        });
        group.bench_function("quad_second_triangle", |b| {
            b.iter(|| {
                facet_check(
                    &quad,
                    DVec3::new(0.2, 0.7, 0.05),
                    0.1,
                    RadiusBoundary::Inclusive,
                )
            });
        });
        group.finish();
    }

    {
        let mut group = c.benchmark_group("classify/edge_vertex");
        let center = DVec3::new(0.5, -0.05, 0.05);
        group.bench_function("edge", |b| {
            b.iter(|| {
                edge_check(DVec3::ZERO, DVec3::X, center, 0.1, RadiusBoundary::Inclusive, None)
            });
        });
        group.bench_function("vertex", |b| {
            b.iter(|| vertex_check(DVec3::ZERO, center, 0.1, RadiusBoundary::Inclusive, None));
        });
        group.finish();
    }
}

// ---------------------------------------------------------------------------
// Torque distribution
// ---------------------------------------------------------------------------

fn bench_distribute(c: &mut Criterion) {
    let mut group = c.benchmark_group("distribute/torque");
    let facet = Facet::triangle(DVec3::ZERO, DVec3::X, DVec3::Y);
    let inputs = TorqueForceInputs {
        force: DVec3::new(1.0, -0.5, 2.0),
        distance_signed_with_normal: 0.05,
        shape_function_weights: [0.5, 0.3, 0.2, 0.0],
    };
    group.bench_function("triangle", |b| {
        b.iter(|| distribute_torque(&facet, &inputs));
    });
    group.finish();
}

// ---------------------------------------------------------------------------
// Batch
// ---------------------------------------------------------------------------

fn bench_batch(c: &mut Criterion) {
    {
        let mut group = c.benchmark_group("batch/resolve_pairs");
        for &n in &[10, 30, 100] {
            let facets = quad_floor(n);
            let particles = particles_over(n, 0.1);
            let pairs = face_pairs(n * n);
            let builder = ContactRecordBuilder::new(ContactConfig::default());
            group.bench_with_input(BenchmarkId::from_parameter(n * n), &pairs, |b, pairs| {
                b.iter(|| resolve_pairs(&builder, &facets, &particles, pairs));
            });
        }
        group.finish();
    }

    {
        let mut group = c.benchmark_group("batch/apply_wall_motion");
        let spec = WallMotionSpec::rotation(0.5, DVec3::Z, DVec3::ZERO).with_axial_speed(0.1);
        for &n in &[10, 30, 100] {
            let mut facets = quad_floor(n);
            group.bench_with_input(BenchmarkId::from_parameter(n * n), &n, |b, _| {
                b.iter(|| apply_wall_motion(&spec, &mut facets, 1.0, 1e-4));
            });
        }
        group.finish();
    }

    {
        let mut group = c.benchmark_group("batch/glued_forces");
        for &n in &[10, 30, 100] {
            let facets = quad_floor(n);
            let (particles, forces) = glued_scene(n, 0.1);
            let mut buffers: Vec<NodalForceBuffer> =
                facets.iter().map(NodalForceBuffer::for_facet).collect();
            group.bench_with_input(BenchmarkId::from_parameter(n * n), &n, |b, _| {
                b.iter(|| {
                    buffers.iter_mut().for_each(NodalForceBuffer::clear);
                    accumulate_glued_forces(&facets, &particles, &forces, &mut buffers)
                });
            });
        }
        group.finish();
    }
}

// ---------------------------------------------------------------------------
// ECS
// ---------------------------------------------------------------------------

fn bench_ecs(c: &mut Criterion) {
    let mut group = c.benchmark_group("ecs/step");
    for &n in &[10, 30] {
        let Ok((mut world, candidates)) = setup_wall_world(n, 0.1) else {
            continue;
        };
        let mut system = WallContactSystem::new(ContactConfig::default());
        group.bench_with_input(BenchmarkId::from_parameter(n * n), &n, |b, _| {
            b.iter(|| system.step(&mut world, 0.0, 1e-4, &candidates));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_classify, bench_distribute, bench_batch, bench_ecs);
criterion_main!(benches);
