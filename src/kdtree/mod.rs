//! Static 2-d tree for nearest place lookups.
//!
//! The tree is bulk loaded once by median partitioning and is read-only
//! afterwards, so a built index can be shared between threads freely.

mod tree;

pub use tree::{Iter, KdTree, Neighbor};

/// Splitting axis of a tree level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Axis 0, used at even depths
    Latitude,
    /// Axis 1, used at odd depths
    Longitude,
}

impl Axis {
    pub fn at_depth(depth: usize) -> Self {
        if depth % 2 == 0 {
            Axis::Latitude
        } else {
            Axis::Longitude
        }
    }

    pub fn index(self) -> usize {
        match self {
            Axis::Latitude => 0,
            Axis::Longitude => 1,
        }
    }
}

/// Anything that can report a latitude and a longitude can be indexed.
pub trait Coordinates {
    fn coordinate(&self, axis: Axis) -> f64;
}

impl Coordinates for [f64; 2] {
    fn coordinate(&self, axis: Axis) -> f64 {
        self[axis.index()]
    }
}

impl Coordinates for (f64, f64) {
    fn coordinate(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Latitude => self.0,
            Axis::Longitude => self.1,
        }
    }
}

impl<T: Coordinates> Coordinates for &T {
    fn coordinate(&self, axis: Axis) -> f64 {
        (**self).coordinate(axis)
    }
}

/// Planar squared distance on raw degrees.
pub fn squared_distance<A: Coordinates, B: Coordinates>(a: &A, b: &B) -> f64 {
    let d_lat = a.coordinate(Axis::Latitude) - b.coordinate(Axis::Latitude);
    let d_lon = a.coordinate(Axis::Longitude) - b.coordinate(Axis::Longitude);
    d_lat * d_lat + d_lon * d_lon
}
