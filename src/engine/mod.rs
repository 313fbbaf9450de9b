//! The simulation: one owner for the grid, the beats and everything that
//! drives them tick to tick.
//!
//! Each tick runs in a fixed order:
//!
//! 1. apply queued node commands
//! 2. fire scheduled effects that have come due
//! 3. decay and propagate node displacement
//! 4. grow every active wave and strike active nodes on its front
//! 5. evaluate beat rotation
//!
//! Nothing inside a tick can fail. Commands are validated when submitted.

pub mod config;
pub mod scheduler;

pub use config::SimConfig;
pub use scheduler::{Effect, Scheduler};

use std::collections::VecDeque;

use rand::Rng;
use tracing::{debug, trace, warn};

use crate::{
    beats::{Beat, BeatSet},
    error::{SimError, SimResult},
    geometry::Point,
    grid::{NodeGrid, NodeId},
    ids::IdGenerator,
    io::{
        input::{NodeAction, NodeCommand},
        playback::{PlaybackEvent, PlaybackSink},
        render::{BeatView, NodeView, Snapshot},
        state::{BeatSpec, SavedState},
    },
    scale::{ScaleTable, SCALE_LEN},
};

/// Seeds drawn when none is supplied fall in `0..RANDOM_SEED_RANGE`.
pub const RANDOM_SEED_RANGE: u32 = 10_000;

/// What happened during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickReport {
    /// Nodes struck this tick
    pub triggered: usize,
    /// Beats mid-flight after waves advanced
    pub active_beats: usize,
    /// Index of a beat launched by rotation this tick
    pub launched: Option<usize>,
    /// Strength of the lowest-indexed active beat
    pub lead_strength: Option<f64>,
}

pub struct Simulation {
    config: SimConfig,
    scales: ScaleTable,
    grid: NodeGrid,
    beats: BeatSet,
    scheduler: Scheduler,
    ids: IdGenerator,
    seed: u32,
    pending: VecDeque<NodeCommand>,
    ticks: u64,
    center: Point,
    beat_size: f64,
}

impl Simulation {
    /// A session with a random seed and the standard scale table.
    pub fn new(config: SimConfig) -> SimResult<Self> {
        let seed = rand::rng().random_range(0..RANDOM_SEED_RANGE);
        Self::with_seed(config, seed)
    }

    pub fn with_seed(config: SimConfig, seed: u32) -> SimResult<Self> {
        Self::with_scales(config, ScaleTable::standard(), seed)
    }

    /// A session over a custom scale table.
    ///
    /// Fails if the configuration is invalid or a default beat names a scale
    /// the table does not hold.
    pub fn with_scales(config: SimConfig, scales: ScaleTable, seed: u32) -> SimResult<Self> {
        config.validate()?;
        for spec in &config.default_beats {
            scales.resolve(&spec.key, &spec.mode)?;
        }

        let mut ids = IdGenerator::new();
        let mut grid = NodeGrid::build(config.width, config.height, config.columns, config.rows, &mut ids);
        grid.compute_neighbors(config.wave_radius);
        grid.assign_notes(seed, SCALE_LEN);

        let mut sim = Self {
            center: Point::new(config.width / 2.0, config.height / 2.0),
            beat_size: config.beat_size(),
            beats: BeatSet::new(config.beat_limit, config.beat_frequency),
            scheduler: Scheduler::new(),
            pending: VecDeque::new(),
            ticks: 0,
            config,
            scales,
            grid,
            ids,
            seed,
        };
        sim.add_default_beats();

        debug!(
            seed,
            nodes = sim.grid.len(),
            beats = sim.beats.len(),
            "simulation created"
        );
        Ok(sim)
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn scales(&self) -> &ScaleTable {
        &self.scales
    }

    pub fn grid(&self) -> &NodeGrid {
        &self.grid
    }

    pub fn beats(&self) -> &BeatSet {
        &self.beats
    }

    /// Ticks run since the session started.
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    /// Where every wave starts.
    pub fn center(&self) -> Point {
        self.center
    }

    /// Commands waiting for the next tick.
    pub fn pending_commands(&self) -> usize {
        self.pending.len()
    }

    /// Effects waiting on the scheduler.
    pub fn scheduled_effects(&self) -> usize {
        self.scheduler.len()
    }

    /// Append a beat to the rotation. Returns its index.
    pub fn add_beat(&mut self, key: &str, mode: &str) -> SimResult<usize> {
        if self.beats.is_full() {
            return Err(SimError::BeatLimitExceeded {
                limit: self.beats.limit(),
            });
        }
        let scale = self.scales.resolve(key, mode)?.clone();
        let beat = Beat::new(scale, self.center, self.beat_size, self.ids.next_id());
        let index = self.beats.push(beat)?;
        debug!(index, key, mode, "beat added");
        Ok(index)
    }

    pub fn remove_beat(&mut self, index: usize) -> SimResult<()> {
        let beat = self.beats.remove(index)?;
        debug!(index, key = beat.key(), mode = beat.mode(), "beat removed");
        Ok(())
    }

    /// Re-key a beat in place. Its position in the rotation is kept; a wave in
    /// flight sounds the new scale from its next strike.
    pub fn set_beat_scale(&mut self, index: usize, key: &str, mode: &str) -> SimResult<()> {
        let scale = self.scales.resolve(key, mode)?.clone();
        self.beats.get_mut(index)?.set_scale(scale);
        debug!(index, key, mode, "beat re-keyed");
        Ok(())
    }

    /// Queue a node command for the start of the next tick.
    pub fn submit(&mut self, command: NodeCommand) -> SimResult<()> {
        if self.grid.index_of(command.node).is_none() {
            return Err(SimError::UnknownNodeId(command.node));
        }
        self.pending.push_back(command);
        Ok(())
    }

    /// Flash a node at full strength right away.
    pub fn highlight(&mut self, id: NodeId) -> SimResult<()> {
        let index = self.grid.index_of(id).ok_or(SimError::UnknownNodeId(id))?;
        self.grid.highlight(index);
        Ok(())
    }

    /// Deactivate everything and start over with the default beats. The seed
    /// and node identities are kept.
    pub fn reset(&mut self) {
        self.grid.reset_all();
        self.scheduler.clear();
        self.pending.clear();
        self.beats.clear();
        self.add_default_beats();
        debug!(seed = self.seed, "simulation reset");
    }

    /// One nominal tick.
    pub fn step(&mut self, sink: &mut impl PlaybackSink) -> TickReport {
        self.advance(1.0, sink)
    }

    /// Run one tick covering `delta` nominal ticks of time.
    ///
    /// `delta` scales node decay, wave growth and the scheduler clock. Easing
    /// fractions are applied once per call regardless of `delta`. Negative or
    /// non-finite deltas count as zero; time never runs backwards.
    pub fn advance(&mut self, delta: f64, sink: &mut impl PlaybackSink) -> TickReport {
        let delta = if delta.is_finite() { delta.max(0.0) } else { 0.0 };
        self.apply_pending();

        self.scheduler.tick(delta);
        while let Some(effect) = self.scheduler.pop_due() {
            match effect {
                Effect::Highlight(index) => self.grid.highlight(index),
            }
        }

        self.grid.propagate(delta);

        let mut report = TickReport::default();
        let step = self.config.beat_velocity * delta;
        let highlight_delay = self.config.highlight_delay_ticks();
        let activation_distance = self.config.activation_distance;

        for beat in self.beats.beats_mut() {
            let was_active = beat.is_active();
            if !beat.advance(step) {
                if was_active {
                    debug!(
                        index = beat.sequence_index(),
                        generation = beat.generation(),
                        "beat retired"
                    );
                }
                continue;
            }

            report.active_beats += 1;
            if report.lead_strength.is_none() {
                report.lead_strength = Some(beat.strength());
            }

            let generation = beat.generation();
            for (index, node) in self.grid.nodes_mut().iter_mut().enumerate() {
                if !node.can_collide(generation) {
                    continue;
                }
                if beat.wave_distance(node.position()) >= activation_distance {
                    continue;
                }

                node.mark_struck(generation);
                let event = PlaybackEvent {
                    node: node.id(),
                    grid_index: index,
                    note_index: node.note_index(),
                    generation,
                    frequency: beat.scale().frequency(node.note_index()),
                    attack: self.config.attack,
                    release: self.config.release,
                };
                trace!(
                    node = %event.node,
                    index,
                    generation,
                    frequency = event.frequency,
                    "node struck"
                );
                sink.node_triggered(event);
                report.triggered += 1;

                if highlight_delay > 0.0 {
                    self.scheduler.enqueue(highlight_delay, Effect::Highlight(index));
                } else {
                    node.highlight();
                }
            }
        }

        // A relaunch after removing the current beat may restart one already in flight
        report.launched = self.beats.rotate(&mut self.ids);
        report.active_beats = self.beats.active_count();

        self.ticks += 1;
        report
    }

    /// The persistent part of the session.
    pub fn serialize_state(&self) -> SavedState {
        SavedState {
            seed: self.seed,
            beats: self
                .beats
                .iter()
                .map(|beat| BeatSpec::new(beat.key(), beat.mode()))
                .collect(),
            nodes: self.grid.active_indices(),
        }
    }

    /// Replace the session with a saved one.
    ///
    /// Beats are checked up front: an unknown scale or more beats than the
    /// limit rejects the restore and leaves the session untouched. Node
    /// indices outside the grid are skipped.
    pub fn restore_state(&mut self, state: &SavedState) -> SimResult<()> {
        if state.beats.len() > self.beats.limit() {
            return Err(SimError::BeatLimitExceeded {
                limit: self.beats.limit(),
            });
        }
        let scales = state
            .beats
            .iter()
            .map(|spec| self.scales.resolve(&spec.key, &spec.mode).cloned())
            .collect::<SimResult<Vec<_>>>()?;

        self.seed = state.seed;
        self.grid.reset_all();
        self.grid.assign_notes(self.seed, SCALE_LEN);
        self.scheduler.clear();
        self.pending.clear();
        self.beats.clear();

        for scale in scales {
            let beat = Beat::new(scale, self.center, self.beat_size, self.ids.next_id());
            self.beats.push(beat)?;
        }

        for &index in &state.nodes {
            if let Err(err) = self.grid.activate_index(index) {
                warn!(index, %err, "ignoring saved node");
            }
        }

        debug!(
            seed = self.seed,
            beats = self.beats.len(),
            nodes = self.grid.active_count(),
            "state restored"
        );
        Ok(())
    }

    pub fn node_views(&self) -> Vec<NodeView> {
        self.grid.nodes().iter().map(NodeView::of).collect()
    }

    pub fn beat_views(&self) -> Vec<BeatView> {
        let current = self.beats.current_index();
        self.beats
            .iter()
            .enumerate()
            .map(|(index, beat)| BeatView::of(beat, current == Some(index)))
            .collect()
    }

    /// Copy out everything a renderer needs for this frame.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.ticks,
            nodes: self.node_views(),
            beats: self.beat_views(),
        }
    }

    fn apply_pending(&mut self) {
        while let Some(command) = self.pending.pop_front() {
            let result = match command.action {
                NodeAction::Activate => self.grid.activate(command.node),
                NodeAction::Deactivate => self.grid.deactivate(command.node),
            };
            if let Err(err) = result {
                warn!(%err, "dropping node command");
            }
        }
    }

    fn add_default_beats(&mut self) {
        let defaults = self.config.default_beats.clone();
        for spec in defaults {
            if let Err(err) = self.add_beat(&spec.key, &spec.mode) {
                warn!(beat = %spec, %err, "skipping default beat");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::playback::Muted;

    fn sim() -> Simulation {
        Simulation::with_seed(SimConfig::default(), 8643).unwrap()
    }

    #[test]
    fn starts_with_default_beats() {
        let s = sim();
        assert_eq!(s.beats().len(), 2);
        assert_eq!(s.grid().len(), 144);
        assert_eq!(s.center(), Point::new(300.0, 250.0));
        assert!(s.beats().iter().all(|b| b.key() == "a" && b.mode() == "min"));
    }

    #[test]
    fn random_seeds_stay_in_range() {
        for _ in 0..20 {
            let s = Simulation::new(SimConfig::default()).unwrap();
            assert!(s.seed() < RANDOM_SEED_RANGE);
        }
    }

    #[test]
    fn bad_default_beat_fails_construction() {
        let config = SimConfig::default().default_beats(vec![BeatSpec::new("q", "min")]);
        assert!(matches!(
            Simulation::with_seed(config, 1),
            Err(SimError::InvalidScaleReference { .. })
        ));
    }

    #[test]
    fn commands_apply_on_the_next_tick() {
        let mut s = sim();
        let id = s.grid().node(30).unwrap().id();
        s.submit(NodeCommand::activate(id)).unwrap();
        assert!(!s.grid().node(30).unwrap().is_active());
        assert_eq!(s.pending_commands(), 1);

        s.step(&mut Muted);
        assert!(s.grid().node(30).unwrap().is_active());
        assert_eq!(s.pending_commands(), 0);
    }

    #[test]
    fn unknown_node_commands_are_rejected_at_submit() {
        let mut s = sim();
        let bogus = NodeId(10_000);
        assert_eq!(
            s.submit(NodeCommand::activate(bogus)),
            Err(SimError::UnknownNodeId(bogus))
        );
        assert_eq!(s.pending_commands(), 0);
        assert_eq!(s.highlight(bogus), Err(SimError::UnknownNodeId(bogus)));
    }

    #[test]
    fn failed_edits_leave_beats_alone() {
        let mut s = sim();
        assert!(matches!(
            s.add_beat("z", "min"),
            Err(SimError::InvalidScaleReference { .. })
        ));
        assert!(matches!(
            s.set_beat_scale(0, "a", "dorian"),
            Err(SimError::InvalidScaleReference { .. })
        ));
        assert_eq!(
            s.set_beat_scale(7, "d", "maj"),
            Err(SimError::UnknownBeatIndex { index: 7, len: 2 })
        );
        assert_eq!(s.beats().len(), 2);
        assert_eq!(s.beats().get(0).unwrap().key(), "a");

        s.set_beat_scale(1, "e", "maj").unwrap();
        assert_eq!(s.beats().get(1).unwrap().key(), "e");
        assert_eq!(s.beats().get(1).unwrap().sequence_index(), 1);
    }

    #[test]
    fn reset_restores_defaults_and_keeps_seed() {
        let mut s = sim();
        s.add_beat("d", "maj").unwrap();
        let id = s.grid().node(3).unwrap().id();
        s.submit(NodeCommand::activate(id)).unwrap();
        for _ in 0..10 {
            s.step(&mut Muted);
        }

        s.reset();
        assert_eq!(s.seed(), 8643);
        assert_eq!(s.beats().len(), 2);
        assert_eq!(s.beats().current_index(), None);
        assert_eq!(s.grid().active_count(), 0);
        assert_eq!(s.scheduled_effects(), 0);
    }

    #[test]
    fn first_tick_launches_a_wave() {
        let mut s = sim();
        let report = s.step(&mut Muted);
        assert_eq!(report.launched, Some(0));
        assert_eq!(report.active_beats, 1);
        assert_eq!(s.tick_count(), 1);
    }

    #[test]
    fn snapshot_marks_the_current_beat() {
        let mut s = sim();
        s.step(&mut Muted);
        let snap = s.snapshot();
        assert_eq!(snap.tick, 1);
        assert_eq!(snap.nodes.len(), 144);
        assert_eq!(snap.beats.len(), 2);
        assert!(snap.beats[0].current && snap.beats[0].active);
        assert!(!snap.beats[1].current && !snap.beats[1].active);
    }
}
