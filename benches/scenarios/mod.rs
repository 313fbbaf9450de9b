//! Real-world scenario benchmarks.
//!
//! A full session played from a share link, and the synth draining a burst
//! of strikes at audio block sizes.

use std::{collections::VecDeque, hint::black_box};

use criterion::{BenchmarkId, Criterion};
use pulsefield::{
    io::{input::NodeCommand, playback::PlaybackEvent, state::SavedState},
    synth::PingSynth,
    SimConfig, Simulation,
};

use crate::BLOCK_SIZES;

const SHARE_LINK: &str = "seed=8643&beats=a-min+d-maj+e-min&nodes=30+43+44+55+58+93+106+141";

pub fn bench_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/session");
    let state: SavedState = SHARE_LINK.parse().expect("share link parses");

    // 10 seconds at 60 Hz
    group.bench_function("share_link_600_ticks", |b| {
        b.iter(|| {
            let mut sim = Simulation::with_seed(SimConfig::default(), 0).expect("default config");
            sim.restore_state(&state).expect("restore");
            let mut events: Vec<PlaybackEvent> = Vec::with_capacity(64);
            let mut total = 0;
            for _ in 0..600 {
                events.clear();
                sim.step(&mut events);
                total += events.len();
            }
            black_box(total)
        })
    });

    group.finish();
}

/// Strike events from a fully lit field, one wave's worth.
fn strike_burst() -> Vec<PlaybackEvent> {
    let mut sim = Simulation::with_seed(SimConfig::default(), 8643).expect("default config");
    let ids: Vec<_> = sim.grid().nodes().iter().map(|n| n.id()).collect();
    for id in ids {
        sim.submit(NodeCommand::activate(id)).expect("known node");
    }

    let mut events = Vec::new();
    for _ in 0..120 {
        sim.step(&mut events);
    }
    events
}

pub fn bench_synth(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/synth");
    let burst = strike_burst();

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        group.bench_with_input(BenchmarkId::new("full_field", size), &size, |b, _| {
            b.iter(|| {
                let queue: VecDeque<PlaybackEvent> = burst.iter().copied().collect();
                let mut synth = PingSynth::new(48_000.0, 24, queue);
                synth.render_block(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
