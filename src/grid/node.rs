//! Node - one cell of the field.
//!
//! A node never moves: its grid address and rest position are fixed when the
//! grid is laid out. What changes every tick is its flash `strength`, the pin
//! `size` easing toward its target, and a displacement `offset` chasing a
//! decaying `offset_target`.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::{GridCoord, Point};

/// Flash strength lost per nominal tick.
pub const STRENGTH_DECAY: f64 = 0.01;
/// A node only pushes its neighbours while brighter than this.
pub const PROPAGATION_THRESHOLD: f64 = 0.1;
/// Fraction of the gap to `size_target` closed per tick.
pub const SIZE_EASING: f64 = 0.25;
/// Multiplier applied to `offset_target` per tick.
pub const OFFSET_DAMPING: f64 = 0.6;
/// Fraction of the gap to `offset_target` closed per tick.
pub const OFFSET_EASING: f64 = 0.2;
/// Pin radius of an inactive node.
pub const IDLE_SIZE: f64 = 1.0;
/// Pin radius of an active node.
pub const ACTIVE_SIZE: f64 = 5.0;

/// Process-lifetime identity of a node.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u64);

impl NodeId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which palette a renderer should draw the node with.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeColor {
    Idle,
    Active,
}

#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    coord: GridCoord,
    position: Point,

    active: bool,
    strength: f64,
    size: f64,
    size_target: f64,
    offset: Point,
    offset_target: Point,

    note_index: usize,
    // Generation id of the last wave that struck this node
    collision_level: u64,
}

impl Node {
    pub(crate) fn new(id: NodeId, coord: GridCoord, position: Point, note_index: usize) -> Self {
        Self {
            id,
            coord,
            position,
            active: false,
            strength: 0.0,
            size: IDLE_SIZE,
            size_target: IDLE_SIZE,
            offset: Point::ORIGIN,
            offset_target: Point::ORIGIN,
            note_index,
            collision_level: 0,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn coord(&self) -> GridCoord {
        self.coord
    }

    /// Rest position in world units.
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn size_target(&self) -> f64 {
        self.size_target
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn offset_target(&self) -> Point {
        self.offset_target
    }

    pub fn note_index(&self) -> usize {
        self.note_index
    }

    pub fn collision_level(&self) -> u64 {
        self.collision_level
    }

    pub fn color(&self) -> NodeColor {
        if self.active {
            NodeColor::Active
        } else {
            NodeColor::Idle
        }
    }

    /// Distance between two nodes in grid cells.
    pub fn grid_distance(&self, other: &Node) -> f64 {
        self.coord.distance_to(other.coord)
    }

    /// Make the node eligible for triggering and grow its pin.
    pub fn activate(&mut self) {
        self.active = true;
        self.size_target = ACTIVE_SIZE;
    }

    /// Make the node ineligible for triggering and shrink its pin.
    pub fn deactivate(&mut self) {
        self.active = false;
        self.size_target = IDLE_SIZE;
    }

    /// Flash at full strength.
    pub fn highlight(&mut self) {
        self.strength = 1.0;
    }

    /// True while bright enough to displace neighbours.
    pub fn is_excited(&self) -> bool {
        self.strength > PROPAGATION_THRESHOLD
    }

    /// True if a wave of this generation may still strike the node.
    pub fn can_collide(&self, generation: u64) -> bool {
        self.active && self.collision_level < generation
    }

    pub(crate) fn set_note_index(&mut self, note_index: usize) {
        self.note_index = note_index;
    }

    pub(crate) fn mark_struck(&mut self, generation: u64) {
        self.collision_level = generation;
    }

    pub(crate) fn push(&mut self, impulse: Point) {
        self.offset_target += impulse;
    }

    /// One tick of decay and easing. `delta` scales the linear strength decay.
    pub(crate) fn relax(&mut self, delta: f64) {
        self.strength = (self.strength - STRENGTH_DECAY * delta).max(0.0);
        self.size += (self.size_target - self.size) * SIZE_EASING;

        self.offset_target = self.offset_target * OFFSET_DAMPING;
        self.offset.interpolate(self.offset_target, OFFSET_EASING);
    }

    /// Back to the freshly-built state, keeping identity and note.
    pub(crate) fn reset(&mut self) {
        self.deactivate();
        self.strength = 0.0;
        self.size = IDLE_SIZE;
        self.offset = Point::ORIGIN;
        self.offset_target = Point::ORIGIN;
        self.collision_level = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node() -> Node {
        Node::new(NodeId(1), GridCoord::new(0, 0), Point::new(10.0, 10.0), 3)
    }

    #[test]
    fn activation_retargets_size() {
        let mut n = node();
        n.activate();
        assert!(n.is_active());
        assert_eq!(n.size_target(), ACTIVE_SIZE);
        assert_eq!(n.color(), NodeColor::Active);

        n.activate();
        assert!(n.is_active(), "activate is idempotent");

        n.deactivate();
        assert!(!n.is_active());
        assert_eq!(n.size_target(), IDLE_SIZE);
    }

    #[test]
    fn size_eases_exponentially() {
        let mut n = node();
        n.activate();
        n.relax(1.0);
        assert_eq!(n.size(), 1.0 + 4.0 * 0.25);
        n.relax(1.0);
        assert_eq!(n.size(), 2.0 + 3.0 * 0.25);
    }

    #[test]
    fn strength_decays_and_floors_at_zero() {
        let mut n = node();
        n.highlight();
        let mut previous = n.strength();
        for _ in 0..150 {
            n.relax(1.0);
            assert!((0.0..=1.0).contains(&n.strength()));
            if previous > 0.0 {
                assert!(n.strength() < previous);
            }
            previous = n.strength();
        }
        assert_eq!(n.strength(), 0.0);
    }

    #[test]
    fn offset_target_fades() {
        let mut n = node();
        n.push(Point::new(10.0, 0.0));
        n.relax(1.0);
        assert!((n.offset_target().x - 6.0).abs() < 1e-12);
        assert_eq!(n.offset_target().y, 0.0);
        assert!((n.offset().x - 1.2).abs() < 1e-12);
        for _ in 0..100 {
            n.relax(1.0);
        }
        assert!(n.offset().length() < 1e-6);
    }

    #[test]
    fn collision_gate_blocks_same_generation() {
        let mut n = node();
        assert!(!n.can_collide(5), "inactive nodes are never struck");
        n.activate();
        assert!(n.can_collide(5));
        n.mark_struck(5);
        assert!(!n.can_collide(5));
        assert!(n.can_collide(6));
    }
}
