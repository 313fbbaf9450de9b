//! Beat - one wave emitter at the world centre.

use crate::{
    geometry::Point,
    scale::{Hsl, Scale},
};

/// A wave bound to a scale.
///
/// `strength` is the wave's progress: 0 is collapsed at the centre, 1 is
/// fully expanded. The wave's radius is `size * strength`. Every activation
/// hands the beat a fresh generation id; a node struck by this generation
/// cannot be struck by it again.
#[derive(Debug, Clone)]
pub struct Beat {
    generation: u64,
    scale: Scale,
    active: bool,
    strength: f64,
    sequence_index: usize,
    center: Point,
    size: f64,
}

impl Beat {
    pub(crate) fn new(scale: Scale, center: Point, size: f64, generation: u64) -> Self {
        Self {
            generation,
            scale,
            active: false,
            strength: 0.0,
            sequence_index: 0,
            center,
            size,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn scale(&self) -> &Scale {
        &self.scale
    }

    pub fn key(&self) -> &str {
        self.scale.key()
    }

    pub fn mode(&self) -> &str {
        self.scale.mode()
    }

    pub fn color(&self) -> Hsl {
        self.scale.color()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }

    /// Position in the beat set.
    pub fn sequence_index(&self) -> usize {
        self.sequence_index
    }

    pub fn center(&self) -> Point {
        self.center
    }

    /// Fully expanded radius.
    pub fn size(&self) -> f64 {
        self.size
    }

    /// Current wave radius.
    pub fn radius(&self) -> f64 {
        self.size * self.strength
    }

    /// Distance between a point and the wave front.
    pub fn wave_distance(&self, point: Point) -> f64 {
        (point.distance_to(self.center) - self.radius()).abs()
    }

    /// Start a new pass from the centre under a new generation.
    pub(crate) fn activate(&mut self, generation: u64) {
        self.generation = generation;
        self.active = true;
        self.strength = 0.0;
    }

    pub(crate) fn deactivate(&mut self) {
        self.active = false;
    }

    pub(crate) fn set_scale(&mut self, scale: Scale) {
        self.scale = scale;
    }

    pub(crate) fn set_sequence_index(&mut self, index: usize) {
        self.sequence_index = index;
    }

    /// Grow the wave by `step`. A wave past full size retires; strength is
    /// left where it landed. Returns whether the beat is still live.
    pub(crate) fn advance(&mut self, step: f64) -> bool {
        if self.active {
            self.strength += step;
        }

        if self.strength > 1.0 {
            self.deactivate();
        }

        self.active
    }
}
