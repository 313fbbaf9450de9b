//! Node commands and pointer gestures.
//!
//! Input never touches the grid directly. A [`Gesture`] reads the grid to
//! decide what a press or drag means and produces [`NodeCommand`]s; the
//! simulation applies queued commands at the start of its next tick.

use std::collections::HashSet;

use crate::{
    geometry::Point,
    grid::{NodeGrid, NodeId},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeAction {
    Activate,
    Deactivate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeCommand {
    pub node: NodeId,
    pub action: NodeAction,
}

impl NodeCommand {
    pub fn activate(node: NodeId) -> Self {
        Self {
            node,
            action: NodeAction::Activate,
        }
    }

    pub fn deactivate(node: NodeId) -> Self {
        Self {
            node,
            action: NodeAction::Deactivate,
        }
    }
}

/// One press-drag-release of a pointer.
///
/// The first node touched decides the gesture's action: touching an idle
/// node makes it an activating gesture, touching an active node makes it a
/// deactivating one. Each node is acted on at most once per press.
#[derive(Debug, Default)]
pub struct Gesture {
    pressed: bool,
    action: Option<NodeAction>,
    visited: HashSet<NodeId>,
}

impl Gesture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer down: start a fresh gesture.
    pub fn press(&mut self) {
        self.pressed = true;
        self.action = None;
        self.visited.clear();
    }

    /// Pointer up.
    pub fn release(&mut self) {
        self.pressed = false;
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// The action this gesture has settled on, if any node was touched yet.
    pub fn action(&self) -> Option<NodeAction> {
        self.action
    }

    /// Feed the pointer position; returns the command it produces, if any.
    pub fn track(&mut self, grid: &NodeGrid, pointer: Point) -> Option<NodeCommand> {
        if !self.pressed {
            return None;
        }

        let node = grid.node_at(pointer)?;
        if !self.visited.insert(node.id()) {
            return None;
        }

        match (self.action, node.is_active()) {
            (None | Some(NodeAction::Activate), false) => {
                self.action = Some(NodeAction::Activate);
                Some(NodeCommand::activate(node.id()))
            }
            (None | Some(NodeAction::Deactivate), true) => {
                self.action = Some(NodeAction::Deactivate);
                Some(NodeCommand::deactivate(node.id()))
            }
            _ => None,
        }
    }
}
