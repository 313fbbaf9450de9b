//! Read-only render feed.
//!
//! Renderers get plain copies of what they need to draw. Nothing here holds
//! a reference back into the simulation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    beats::Beat,
    geometry::Point,
    grid::{Node, NodeColor, NodeId},
    scale::Hsl,
};

/// How far a fully lit pin head leans, at the far edge of the world.
pub const PIN_LEAN: f64 = 30.0;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeView {
    pub id: NodeId,
    pub position: Point,
    pub offset: Point,
    pub size: f64,
    pub strength: f64,
    pub color: NodeColor,
}

impl NodeView {
    pub fn of(node: &Node) -> Self {
        Self {
            id: node.id(),
            position: node.position(),
            offset: node.offset(),
            size: node.size(),
            strength: node.strength(),
            color: node.color(),
        }
    }

    /// Where to draw the pin head: displaced by the ripple offset and leaning
    /// away from `center` in proportion to the flash strength and distance.
    pub fn pin_head(&self, center: Point, world_min: f64) -> Point {
        let radians = (center.y - self.position.y).atan2(center.x - self.position.x);
        let distance_factor = self.position.distance_to(center) / world_min;
        let lean = PIN_LEAN * distance_factor * self.strength;
        let away = radians - std::f64::consts::PI;

        self.position + self.offset + Point::new(away.cos() * lean, away.sin() * lean)
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeatView {
    pub center: Point,
    pub radius: f64,
    pub strength: f64,
    pub color: Hsl,
    pub active: bool,
    pub current: bool,
}

impl BeatView {
    /// A retired wave can overshoot full size by one step; the view stops at
    /// full size.
    pub fn of(beat: &Beat, current: bool) -> Self {
        let strength = beat.strength().clamp(0.0, 1.0);
        Self {
            center: beat.center(),
            radius: beat.size() * strength,
            strength,
            color: beat.color(),
            active: beat.is_active(),
            current,
        }
    }
}

/// Everything a renderer needs for one frame.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub tick: u64,
    pub nodes: Vec<NodeView>,
    pub beats: Vec<BeatView>,
}
