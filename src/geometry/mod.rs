//! Plane geometry shared by nodes and beats.
//!
//! Entities *have* a position rather than being one: a node stores a `Point`
//! for its rest position and another for its displacement, a beat stores the
//! point its wave expands from. `GridCoord` is the integer lattice address of
//! a node; neighbour adjacency and displacement directions are measured in
//! this space, not in world units.

use std::ops::{Add, AddAssign, Mul, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A 2D position (or displacement vector) in world units.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Length of this point read as a vector from the origin.
    pub fn length(self) -> f64 {
        self.distance_to(Point::ORIGIN)
    }

    /// Move a fraction `amount` of the way toward `target`.
    ///
    /// Applied once per tick this is exponential smoothing.
    pub fn interpolate(&mut self, target: Point, amount: f64) {
        self.x += (target.x - self.x) * amount;
        self.y += (target.y - self.y) * amount;
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// Integer lattice address of a node: column `x`, row `y`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridCoord {
    pub x: u32,
    pub y: u32,
}

impl GridCoord {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Row-major index of this coordinate in a grid `columns` wide.
    pub fn to_index(self, columns: u32) -> usize {
        (self.y as usize) * (columns as usize) + self.x as usize
    }

    /// Inverse of [`GridCoord::to_index`].
    pub fn from_index(index: usize, columns: u32) -> Self {
        let columns = columns.max(1) as usize;
        Self {
            x: (index % columns) as u32,
            y: (index / columns) as u32,
        }
    }

    /// Euclidean distance measured in grid cells.
    pub fn distance_to(self, other: GridCoord) -> f64 {
        let dx = other.x as f64 - self.x as f64;
        let dy = other.y as f64 - self.y as f64;
        (dx * dx + dy * dy).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_symmetric() {
        let a = Point::new(3.0, 4.0);
        let b = Point::new(-1.0, 1.0);
        assert_eq!(a.distance_to(b), b.distance_to(a));
        assert_eq!(a.length(), 5.0);
    }

    #[test]
    fn interpolate_moves_a_fraction_of_the_gap() {
        let mut p = Point::new(0.0, 10.0);
        p.interpolate(Point::new(10.0, 0.0), 0.25);
        assert_eq!(p, Point::new(2.5, 7.5));
    }

    #[test]
    fn grid_index_round_trip() {
        let coord = GridCoord::from_index(141, 12);
        assert_eq!(coord, GridCoord::new(9, 11));
        assert_eq!(coord.to_index(12), 141);
    }

    #[test]
    fn grid_distance_counts_cells() {
        let a = GridCoord::new(0, 0);
        assert_eq!(a.distance_to(GridCoord::new(2, 0)), 2.0);
        assert!((a.distance_to(GridCoord::new(2, 2)) - 8.0_f64.sqrt()).abs() < 1e-12);
    }
}
