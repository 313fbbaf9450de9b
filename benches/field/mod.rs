//! Benchmarks for grid setup and single ticks.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use pulsefield::{
    io::{input::NodeCommand, playback::Muted},
    SimConfig, Simulation,
};

use crate::FILLS;

pub fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("field/build");

    // Adjacency is O(n^2), so this is the cost that max_nodes bounds
    for side in [6u32, 12, 16] {
        let config = SimConfig::default()
            .grid(side, side)
            .max_nodes((side * side) as usize);
        group.bench_with_input(BenchmarkId::new("grid", side * side), &config, |b, config| {
            b.iter(|| Simulation::with_seed(black_box(config.clone()), 8643))
        });
    }

    group.finish();
}

pub fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("field/step");

    for &fill in FILLS {
        let mut sim = Simulation::with_seed(SimConfig::default(), 8643).expect("default config");
        let total = sim.grid().len();
        let ids: Vec<_> = sim
            .grid()
            .nodes()
            .iter()
            .take(total * fill / 100)
            .map(|n| n.id())
            .collect();
        for id in ids {
            sim.submit(NodeCommand::activate(id)).expect("known node");
        }

        group.bench_with_input(BenchmarkId::new("fill", fill), &fill, |b, _| {
            b.iter(|| black_box(sim.step(&mut Muted)))
        });
    }

    group.finish();
}
