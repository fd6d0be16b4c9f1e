//! # World Benchmark
//!
//! Entity lifecycle and query cost over a two-type component list.
//!
//! Run with: `cargo bench --package tektonik_core --bench world_benchmark`

// Benchmarks don't need docs
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tektonik_core::{Component, World};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Position {
    x: f32,
    y: f32,
}

impl Component for Position {}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Velocity {
    dx: f32,
    dy: f32,
}

impl Component for Velocity {}

type BenchWorld = World<(Position, Velocity)>;

/// Benchmark: create entities with both components.
fn bench_spawn(c: &mut Criterion) {
    let mut group = c.benchmark_group("world_spawn");

    for count in [10_000, 100_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                let mut world = BenchWorld::new(count);
                for _ in 0..count {
                    let entity = world.new_entity();
                    let manager = world.component_manager_mut();
                    manager.add_component(entity, Position { x: 0.0, y: 0.0 });
                    manager.add_component(entity, Velocity { dx: 1.0, dy: 1.0 });
                }
                world.alive_count()
            });
        });
    }

    group.finish();
}

/// Benchmark: delete and recreate half the world.
fn bench_delete_cascade(c: &mut Criterion) {
    let count = 100_000;

    c.bench_function("world_delete_recreate_50k", |b| {
        let mut world = BenchWorld::new(count);
        let mut entities: Vec<_> = (0..count)
            .map(|_| {
                let entity = world.new_entity();
                world
                    .component_manager_mut()
                    .add_component(entity, Position { x: 0.0, y: 0.0 });
                entity
            })
            .collect();

        b.iter(|| {
            for entity in entities.iter_mut().step_by(2) {
                world.delete_entity(*entity);
                *entity = world.new_entity();
                world
                    .component_manager_mut()
                    .add_component(*entity, Position { x: 1.0, y: 1.0 });
            }
        });
    });
}

/// Benchmark: query over both types when only a tenth have velocity.
fn bench_query(c: &mut Criterion) {
    let count = 100_000;
    let mut world = BenchWorld::new(count);
    for i in 0..count {
        let entity = world.new_entity();
        let manager = world.component_manager_mut();
        manager.add_component(entity, Position { x: 0.0, y: 0.0 });
        if i % 10 == 0 {
            manager.add_component(entity, Velocity { dx: 1.0, dy: 2.0 });
        }
    }

    c.bench_function("world_query_position_velocity_100k", |b| {
        let manager = world.component_manager();
        b.iter(|| {
            let mut sum = 0.0_f32;
            for entity in manager.get_entities_with_components::<(Position, Velocity), _>() {
                let position = manager.get_component::<Position, _>(entity);
                let velocity = manager.get_component::<Velocity, _>(entity);
                sum += position.x + position.y + velocity.dx + velocity.dy;
            }
            black_box(sum)
        });
    });
}

criterion_group!(benches, bench_spawn, bench_delete_cascade, bench_query);
criterion_main!(benches);
