use std::collections::{HashMap, HashSet};

use pulsefield::{
    io::{
        input::NodeCommand,
        playback::{Muted, PlaybackEvent},
        state::BeatSpec,
    },
    scale::ScaleTable,
    SimConfig, SimError, Simulation,
};

const SCENARIO_SEED: u32 = 8643;
const SCENARIO_NODES: [usize; 8] = [30, 43, 44, 55, 58, 93, 106, 141];

fn single_beat_config() -> SimConfig {
    SimConfig::default().default_beats(vec![BeatSpec::new("a", "min")])
}

fn activate(sim: &mut Simulation, indices: &[usize]) {
    for &index in indices {
        let id = sim.grid().node(index).unwrap().id();
        sim.submit(NodeCommand::activate(id)).unwrap();
    }
}

fn run(sim: &mut Simulation, ticks: usize) -> Vec<(u64, PlaybackEvent)> {
    let mut log = Vec::new();
    let mut events: Vec<PlaybackEvent> = Vec::new();
    for _ in 0..ticks {
        events.clear();
        sim.step(&mut events);
        log.extend(events.iter().map(|e| (sim.tick_count(), *e)));
    }
    log
}

#[test]
fn scenario_nodes_all_sound_their_seeded_notes() {
    let mut sim = Simulation::with_seed(single_beat_config(), SCENARIO_SEED).unwrap();
    activate(&mut sim, &SCENARIO_NODES);

    let log = run(&mut sim, 150);
    let a_min = ScaleTable::standard().resolve("a", "min").unwrap().clone();

    for index in SCENARIO_NODES {
        let expected = a_min.frequency((SCENARIO_SEED as usize * index) % 10);
        let hits: Vec<_> = log.iter().filter(|(_, e)| e.grid_index == index).collect();
        assert!(!hits.is_empty(), "node {index} never sounded");
        for (_, event) in hits {
            assert_eq!(event.frequency, expected, "node {index}");
            assert_eq!(event.attack, 0.01);
            assert_eq!(event.release, 0.6);
        }
    }

    // Only active nodes ever sound
    let allowed: HashSet<usize> = SCENARIO_NODES.into_iter().collect();
    assert!(log.iter().all(|(_, e)| allowed.contains(&e.grid_index)));
}

#[test]
fn each_wave_strikes_a_node_at_most_once() {
    let mut sim = Simulation::with_seed(SimConfig::default(), SCENARIO_SEED).unwrap();
    let cluster: Vec<usize> = (0..sim.grid().len()).step_by(3).collect();
    activate(&mut sim, &cluster);

    let log = run(&mut sim, 600);
    let mut strikes: HashMap<(usize, u64), usize> = HashMap::new();
    for (_, event) in &log {
        *strikes.entry((event.grid_index, event.generation)).or_default() += 1;
    }

    assert!(!strikes.is_empty());
    for ((index, generation), count) in strikes {
        assert_eq!(count, 1, "node {index} struck {count} times by wave {generation}");
    }
}

#[test]
fn first_pass_strikes_every_active_node_exactly_once() {
    let mut sim = Simulation::with_seed(single_beat_config(), SCENARIO_SEED).unwrap();
    activate(&mut sim, &SCENARIO_NODES);

    let log = run(&mut sim, 150);
    let first_wave = log.first().map(|(_, e)| e.generation).unwrap();
    let mut struck: Vec<usize> = log
        .iter()
        .filter(|(_, e)| e.generation == first_wave)
        .map(|(_, e)| e.grid_index)
        .collect();
    struck.sort_unstable();
    assert_eq!(struck, SCENARIO_NODES.to_vec());
}

#[test]
fn never_more_than_two_waves_in_flight() {
    let mut sim = Simulation::with_seed(SimConfig::default(), 1).unwrap();
    for (key, mode) in [("d", "maj"), ("e", "min"), ("a", "maj")] {
        sim.add_beat(key, mode).unwrap();
    }

    let mut launches = 0;
    for _ in 0..2_000 {
        let report = sim.step(&mut Muted);
        assert!(report.active_beats <= 2, "{report:?}");
        assert_eq!(report.active_beats, sim.beats().active_count());
        launches += usize::from(report.launched.is_some());
    }
    assert!(launches > 20);
}

#[test]
fn beat_limit_is_ten() {
    let mut sim = Simulation::with_seed(SimConfig::default(), 1).unwrap();
    while sim.beats().len() < 10 {
        sim.add_beat("e", "maj").unwrap();
    }
    assert_eq!(
        sim.add_beat("a", "min"),
        Err(SimError::BeatLimitExceeded { limit: 10 })
    );
    assert_eq!(sim.beats().len(), 10);
}

#[test]
fn removing_the_current_beat_reselects_the_first() {
    let mut sim = Simulation::with_seed(SimConfig::default(), 1).unwrap();
    sim.add_beat("d", "min").unwrap();
    run(&mut sim, 120);

    let current = sim.beats().current_index().unwrap();
    sim.remove_beat(current).unwrap();
    assert_eq!(sim.beats().current_index(), None);
    assert_eq!(sim.beats().len(), 2);

    let report = sim.step(&mut Muted);
    assert_eq!(report.launched, Some(0));
    assert_eq!(sim.beats().current_index(), Some(0));
    assert_eq!(report.active_beats, sim.beats().active_count());
}

#[test]
fn relaunching_a_beat_in_flight_counts_it_once() {
    let mut sim = Simulation::with_seed(SimConfig::default(), 1).unwrap();
    sim.add_beat("d", "min").unwrap();
    run(&mut sim, 60);
    assert_eq!(sim.beats().current_index(), Some(1));
    assert_eq!(sim.beats().active_count(), 2);

    sim.remove_beat(1).unwrap();
    let report = sim.step(&mut Muted);
    assert_eq!(report.launched, Some(0));
    assert_eq!(report.active_beats, 1);
    assert_eq!(report.active_beats, sim.beats().active_count());
}

#[test]
fn backwards_or_broken_deltas_do_not_move_time() {
    let mut sim = Simulation::with_seed(SimConfig::default(), 1).unwrap();
    activate(&mut sim, &[0]);
    sim.step(&mut Muted);
    sim.highlight(sim.grid().node(0).unwrap().id()).unwrap();
    let lead = sim.beats().get(0).unwrap().strength();

    for delta in [-300.0, f64::NAN, f64::NEG_INFINITY, f64::INFINITY] {
        sim.advance(delta, &mut Muted);
        for node in sim.grid().nodes() {
            assert!((0.0..=1.0).contains(&node.strength()), "delta {delta}");
        }
        assert_eq!(sim.beats().get(0).unwrap().strength(), lead, "delta {delta}");
    }
    assert_eq!(sim.grid().node(0).unwrap().strength(), 1.0);
}

#[test]
fn commands_for_foreign_nodes_are_rejected() {
    let mut sim = Simulation::with_seed(SimConfig::default(), 1).unwrap();
    let bigger = Simulation::with_seed(SimConfig::default().grid(13, 12).max_nodes(156), 1).unwrap();
    let foreign = bigger.grid().node(150).unwrap().id();

    assert_eq!(
        sim.submit(NodeCommand::activate(foreign)),
        Err(SimError::UnknownNodeId(foreign))
    );
    assert_eq!(
        sim.remove_beat(9),
        Err(SimError::UnknownBeatIndex { index: 9, len: 2 })
    );

    // The tick loop keeps running
    run(&mut sim, 5);
    assert_eq!(sim.tick_count(), 5);
}

#[test]
fn highlight_lags_the_strike_by_six_ticks() {
    let mut sim = Simulation::with_seed(single_beat_config(), SCENARIO_SEED).unwrap();
    activate(&mut sim, &[141]);

    let mut events: Vec<PlaybackEvent> = Vec::new();
    let mut struck_at = None;
    for _ in 0..150 {
        sim.step(&mut events);
        if !events.is_empty() {
            struck_at = Some(sim.tick_count());
            break;
        }
    }
    assert!(struck_at.is_some());
    assert_eq!(sim.grid().node(141).unwrap().strength(), 0.0);

    for _ in 0..5 {
        sim.step(&mut Muted);
        assert_eq!(sim.grid().node(141).unwrap().strength(), 0.0);
    }
    sim.step(&mut Muted);
    let strength = sim.grid().node(141).unwrap().strength();
    assert!((strength - 0.99).abs() < 1e-9, "strength {strength}");
}

#[test]
fn zero_delay_highlights_on_the_strike() {
    let config = single_beat_config().highlight_delay_ms(0);
    let mut sim = Simulation::with_seed(config, SCENARIO_SEED).unwrap();
    activate(&mut sim, &[141]);

    let mut events: Vec<PlaybackEvent> = Vec::new();
    while events.is_empty() {
        sim.step(&mut events);
        assert!(sim.tick_count() < 150);
    }
    assert_eq!(sim.grid().node(141).unwrap().strength(), 1.0);
    assert_eq!(sim.scheduled_effects(), 0);
}

#[test]
fn node_strength_stays_in_unit_range() {
    let mut sim = Simulation::with_seed(SimConfig::default(), 42).unwrap();
    let all: Vec<usize> = (0..sim.grid().len()).collect();
    activate(&mut sim, &all);

    for _ in 0..400 {
        sim.step(&mut Muted);
        for node in sim.grid().nodes() {
            assert!((0.0..=1.0).contains(&node.strength()));
        }
    }
}

#[test]
fn variable_timing_covers_the_same_ground() {
    let mut fixed = Simulation::with_seed(single_beat_config(), SCENARIO_SEED).unwrap();
    let mut halves = Simulation::with_seed(single_beat_config(), SCENARIO_SEED).unwrap();

    for _ in 0..40 {
        fixed.step(&mut Muted);
    }
    // First call launches, the rest advance in half steps
    halves.advance(1.0, &mut Muted);
    for _ in 0..78 {
        halves.advance(0.5, &mut Muted);
    }

    let a = fixed.beats().get(0).unwrap().strength();
    let b = halves.beats().get(0).unwrap().strength();
    assert!((a - b).abs() < 1e-9, "{a} vs {b}");
}

#[test]
fn same_seed_same_notes() {
    let a = Simulation::with_seed(SimConfig::default(), 777).unwrap();
    let b = Simulation::with_seed(SimConfig::default(), 777).unwrap();
    let notes = |s: &Simulation| s.grid().nodes().iter().map(|n| n.note_index()).collect::<Vec<_>>();
    assert_eq!(notes(&a), notes(&b));
}
