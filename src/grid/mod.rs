//! The node field: a fixed lattice of [`Node`]s and their adjacency.
//!
//! Nodes are stored row-major, so a node's index in the grid is
//! `row * columns + column`. That index is what saved states refer to; the
//! [`NodeId`] is the identity commands refer to.

pub mod node;

pub use node::{Node, NodeColor, NodeId};

use crate::{
    error::{SimError, SimResult},
    geometry::{GridCoord, Point},
    ids::IdGenerator,
    scale::note_index,
};

pub struct NodeGrid {
    nodes: Vec<Node>,
    // Row-major adjacency, parallel to `nodes`
    neighbors: Vec<Vec<usize>>,
    columns: u32,
    rows: u32,
    cell: Point,
    activate_node_distance: f64,
    wave_radius: f64,
    first_id: u64,
}

/// Node count of a `columns x rows` lattice, computed without `u32` overflow.
pub fn node_count(columns: u32, rows: u32) -> usize {
    columns as usize * rows as usize
}

impl NodeGrid {
    /// Lay out `columns x rows` nodes inset one cell from every world edge.
    ///
    /// Notes are all zero until [`assign_notes`](Self::assign_notes) runs and
    /// adjacency is empty until [`compute_neighbors`](Self::compute_neighbors)
    /// runs.
    pub fn build(width: f64, height: f64, columns: u32, rows: u32, ids: &mut IdGenerator) -> Self {
        let cx = width / (columns as f64 + 1.0);
        let cy = height / (rows as f64 + 1.0);

        let mut nodes = Vec::with_capacity(node_count(columns, rows));
        let mut first_id = 0;
        for y in 0..rows {
            for x in 0..columns {
                let id = ids.next_id();
                if nodes.is_empty() {
                    first_id = id;
                }
                let position = Point::new(cx + x as f64 * cx, cy + y as f64 * cy);
                nodes.push(Node::new(NodeId(id), GridCoord::new(x, y), position, 0));
            }
        }

        Self {
            neighbors: vec![Vec::new(); nodes.len()],
            nodes,
            columns,
            rows,
            cell: Point::new(cx, cy),
            activate_node_distance: cx.min(cy) * 0.5,
            wave_radius: 0.0,
            first_id,
        }
    }

    /// Link every ordered pair of distinct nodes closer than `wave_radius`
    /// grid cells. O(n^2); calling it again rebuilds the lists from scratch.
    pub fn compute_neighbors(&mut self, wave_radius: f64) {
        self.wave_radius = wave_radius;
        for (a, list) in self.neighbors.iter_mut().enumerate() {
            list.clear();
            let node_a = &self.nodes[a];
            for (b, node_b) in self.nodes.iter().enumerate() {
                if a != b && node_b.grid_distance(node_a) < wave_radius {
                    list.push(b);
                }
            }
        }
    }

    /// Derive every node's note index from the session seed.
    pub fn assign_notes(&mut self, seed: u32, scale_len: usize) {
        let columns = self.columns;
        for node in &mut self.nodes {
            node.set_note_index(note_index(seed, node.coord(), columns, scale_len));
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Spacing between nodes in world units.
    pub fn cell_size(&self) -> Point {
        self.cell
    }

    /// Pointer radius within which a node counts as touched.
    pub fn activate_node_distance(&self) -> f64 {
        self.activate_node_distance
    }

    pub fn wave_radius(&self) -> f64 {
        self.wave_radius
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    /// Row-major index of the node with this id.
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        let index = id.0.checked_sub(self.first_id)? as usize;
        (index < self.nodes.len()).then_some(index)
    }

    pub fn node_by_id(&self, id: NodeId) -> Option<&Node> {
        self.index_of(id).map(|index| &self.nodes[index])
    }

    /// Indices of the nodes adjacent to `index`.
    pub fn neighbors(&self, index: usize) -> &[usize] {
        self.neighbors.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First node strictly within the activation distance of `point`.
    pub fn node_at(&self, point: Point) -> Option<&Node> {
        self.nodes
            .iter()
            .find(|node| node.position().distance_to(point) < self.activate_node_distance)
    }

    pub fn activate(&mut self, id: NodeId) -> SimResult<()> {
        let index = self.index_of(id).ok_or(SimError::UnknownNodeId(id))?;
        self.nodes[index].activate();
        Ok(())
    }

    pub fn deactivate(&mut self, id: NodeId) -> SimResult<()> {
        let index = self.index_of(id).ok_or(SimError::UnknownNodeId(id))?;
        self.nodes[index].deactivate();
        Ok(())
    }

    /// Activate by row-major index, as saved states address nodes.
    pub fn activate_index(&mut self, index: usize) -> SimResult<()> {
        let node = self
            .nodes
            .get_mut(index)
            .ok_or(SimError::UnknownNodeIndex(index))?;
        node.activate();
        Ok(())
    }

    /// Row-major indices of every active node, ascending.
    pub fn active_indices(&self) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.is_active())
            .map(|(index, _)| index)
            .collect()
    }

    pub fn active_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_active()).count()
    }

    /// Deactivate everything and clear transient state. Identities and
    /// adjacency survive.
    pub fn reset_all(&mut self) {
        for node in &mut self.nodes {
            node.reset();
        }
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    pub(crate) fn highlight(&mut self, index: usize) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.highlight();
        }
    }

    /// Per-tick decay, easing and outward push from every excited node.
    ///
    /// All nodes relax first. Each excited node then reads only its own state
    /// and accumulates into its neighbours' offset targets, so iteration order
    /// does not matter.
    pub(crate) fn propagate(&mut self, delta: f64) {
        for node in &mut self.nodes {
            node.relax(delta);
        }

        for index in 0..self.nodes.len() {
            let source = &self.nodes[index];
            if !source.is_excited() {
                continue;
            }

            let strength = source.strength();
            let from = source.coord();

            for &neighbor in &self.neighbors[index] {
                let target = &mut self.nodes[neighbor];
                let to = target.coord();

                let distance = from.distance_to(to);
                let magnitude = strength * (self.wave_radius - distance);

                // Points from the source through the neighbour
                let radians = (from.x as f64 - to.x as f64).atan2(from.y as f64 - to.y as f64);
                let push = Point::new(
                    (radians - std::f64::consts::PI).sin() * magnitude,
                    (radians - std::f64::consts::PI).cos() * magnitude,
                );
                target.push(push);
            }
        }
    }
}
