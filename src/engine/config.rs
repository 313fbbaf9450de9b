#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::{SimError, SimResult},
    grid::node_count,
    io::state::BeatSpec,
};

/// Every tunable of a [`Simulation`](super::Simulation).
///
/// Defaults reproduce the classic 12x12 field on a 600x500 world.
///
/// # Example
///
/// ```
/// use pulsefield::SimConfig;
///
/// let config = SimConfig::default()
///     .grid(8, 8)
///     .beat_frequency(3)
///     .highlight_delay_ms(0);
/// assert!(config.validate().is_ok());
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// World width in world units
    pub width: f64,
    /// World height in world units
    pub height: f64,
    /// Nodes per row
    pub columns: u32,
    /// Nodes per column
    pub rows: u32,
    /// Upper bound on `columns * rows` (adjacency is O(n^2))
    pub max_nodes: usize,
    /// Wave progress per nominal tick
    pub beat_velocity: f64,
    /// Maximum waves in flight at once
    pub beat_frequency: usize,
    /// Maximum beats in the beat set
    pub beat_limit: usize,
    /// How close a wave front must pass to strike a node
    pub activation_distance: f64,
    /// Neighbour radius in grid cells
    pub wave_radius: f64,
    /// Fully expanded wave radius as a fraction of the larger world side
    pub beat_size_ratio: f64,
    /// Lag between a strike and its visual flash
    pub highlight_delay_ms: u64,
    /// Nominal ticks per second
    pub tick_rate: f64,
    /// Attack of a triggered note, seconds
    pub attack: f64,
    /// Release of a triggered note, seconds
    pub release: f64,
    /// Beats a fresh or reset session starts with
    pub default_beats: Vec<BeatSpec>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 500.0,
            columns: 12,
            rows: 12,
            max_nodes: 144,
            beat_velocity: 0.01,
            beat_frequency: 2,
            beat_limit: 10,
            activation_distance: 20.0,
            wave_radius: 3.0,
            beat_size_ratio: 0.65,
            highlight_delay_ms: 100,
            tick_rate: 60.0,
            attack: 0.01,
            release: 0.6,
            default_beats: vec![BeatSpec::new("a", "min"), BeatSpec::new("a", "min")],
        }
    }
}

impl SimConfig {
    /// Set the world dimensions
    pub fn world(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the node lattice size
    pub fn grid(mut self, columns: u32, rows: u32) -> Self {
        self.columns = columns;
        self.rows = rows;
        self
    }

    pub fn max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    pub fn beat_velocity(mut self, velocity: f64) -> Self {
        self.beat_velocity = velocity;
        self
    }

    pub fn beat_frequency(mut self, frequency: usize) -> Self {
        self.beat_frequency = frequency;
        self
    }

    pub fn beat_limit(mut self, limit: usize) -> Self {
        self.beat_limit = limit;
        self
    }

    pub fn activation_distance(mut self, distance: f64) -> Self {
        self.activation_distance = distance;
        self
    }

    pub fn wave_radius(mut self, radius: f64) -> Self {
        self.wave_radius = radius;
        self
    }

    pub fn highlight_delay_ms(mut self, delay_ms: u64) -> Self {
        self.highlight_delay_ms = delay_ms;
        self
    }

    pub fn tick_rate(mut self, tick_rate: f64) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    /// Set the envelope of triggered notes
    pub fn envelope(mut self, attack: f64, release: f64) -> Self {
        self.attack = attack;
        self.release = release;
        self
    }

    pub fn default_beats(mut self, beats: Vec<BeatSpec>) -> Self {
        self.default_beats = beats;
        self
    }

    /// Fully expanded wave radius in world units.
    pub fn beat_size(&self) -> f64 {
        self.width.max(self.height) * self.beat_size_ratio
    }

    /// Highlight delay expressed in nominal ticks.
    pub fn highlight_delay_ticks(&self) -> f64 {
        self.highlight_delay_ms as f64 * self.tick_rate / 1000.0
    }

    pub fn validate(&self) -> SimResult<()> {
        let invalid = |msg: String| Err(SimError::InvalidConfig(msg));

        if !(self.width > 0.0 && self.height > 0.0) {
            return invalid(format!("world must be non-empty, got {}x{}", self.width, self.height));
        }
        if self.columns == 0 || self.rows == 0 {
            return invalid(format!("grid must be non-empty, got {}x{}", self.columns, self.rows));
        }
        let count = node_count(self.columns, self.rows);
        if count > self.max_nodes {
            return invalid(format!("{count} nodes exceeds the cap of {}", self.max_nodes));
        }
        if self.beat_frequency == 0 {
            return invalid("beat_frequency must be at least 1".into());
        }
        if self.beat_limit == 0 {
            return invalid("beat_limit must be at least 1".into());
        }
        if self.default_beats.len() > self.beat_limit {
            return invalid(format!(
                "{} default beats exceed the limit of {}",
                self.default_beats.len(),
                self.beat_limit
            ));
        }
        if !(self.tick_rate > 0.0) {
            return invalid(format!("tick_rate must be positive, got {}", self.tick_rate));
        }
        if !(self.beat_velocity > 0.0) {
            return invalid(format!("beat_velocity must be positive, got {}", self.beat_velocity));
        }
        if !(self.beat_size_ratio > 0.0 && self.beat_size_ratio.is_finite()) {
            return invalid(format!("beat_size_ratio must be positive, got {}", self.beat_size_ratio));
        }
        for (name, value) in [
            ("activation_distance", self.activation_distance),
            ("wave_radius", self.wave_radius),
            ("attack", self.attack),
            ("release", self.release),
        ] {
            if !(value >= 0.0 && value.is_finite()) {
                return invalid(format!("{name} must be finite and non-negative, got {value}"));
            }
        }
        Ok(())
    }
}
