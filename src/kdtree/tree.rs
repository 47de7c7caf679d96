//! Bulk loaded k-d tree (k = 2) with branch-and-bound nearest neighbour search.

use std::cmp::Ordering;

use tracing::debug;

use super::{squared_distance, Axis, Coordinates};
use crate::error::{GeocodeError, Result};

/// Slices smaller than this are built on the current thread.
const PARALLEL_THRESHOLD: usize = 16 * 1024;

struct Node<T> {
    record: T,
    axis: Axis,
    /// Records with coordinate[axis] <= this node's
    left: Option<Box<Node<T>>>,
    /// Records with coordinate[axis] >= this node's
    right: Option<Box<Node<T>>>,
}

/// Result of a nearest neighbour query.
#[derive(Debug, Clone, Copy)]
pub struct Neighbor<'a, T> {
    pub record: &'a T,
    /// Squared planar distance to the query, in degrees²
    pub distance_sq: f64,
}

impl<T> Neighbor<'_, T> {
    pub fn distance(&self) -> f64 {
        self.distance_sq.sqrt()
    }
}

/// Immutable 2-d tree over latitude/longitude.
pub struct KdTree<T> {
    root: Option<Box<Node<T>>>,
    len: usize,
}

impl<T> Default for KdTree<T> {
    /// An index that was never built. Every query on it fails with
    /// [`GeocodeError::EmptyIndex`].
    fn default() -> Self {
        Self { root: None, len: 0 }
    }
}

impl<T: Coordinates> KdTree<T> {
    /// Build a balanced tree from a batch of records.
    pub fn build(records: Vec<T>) -> Result<Self> {
        if records.is_empty() {
            return Err(GeocodeError::EmptyDataset);
        }
        let len = records.len();
        let root = build_subtree(records, 0);
        debug!("Built k-d tree with {} records", len);
        Ok(Self { root, len })
    }

    /// Same tree as [`KdTree::build`], with large subtrees built in parallel.
    pub fn par_build(records: Vec<T>) -> Result<Self>
    where
        T: Send,
    {
        if records.is_empty() {
            return Err(GeocodeError::EmptyDataset);
        }
        let len = records.len();
        let root = par_build_subtree(records, 0);
        debug!("Built k-d tree with {} records (parallel)", len);
        Ok(Self { root, len })
    }

    /// Record closest to the query point.
    pub fn nearest(&self, latitude: f64, longitude: f64) -> Result<&T> {
        self.nearest_neighbor(latitude, longitude)
            .map(|neighbor| neighbor.record)
    }

    /// Record closest to the query point, with its squared distance.
    ///
    /// Among equidistant records the first one reached in traversal order is
    /// returned, which is stable for a given build input.
    pub fn nearest_neighbor(&self, latitude: f64, longitude: f64) -> Result<Neighbor<'_, T>> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(GeocodeError::InvalidCoordinate {
                lat: latitude,
                lon: longitude,
            });
        }
        let root = self.root.as_deref().ok_or(GeocodeError::EmptyIndex)?;
        let query = [latitude, longitude];

        let mut best = Neighbor {
            record: &root.record,
            distance_sq: f64::INFINITY,
        };
        search(root, &query, &mut best);
        Ok(best)
    }
}

impl<T> KdTree<T> {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of levels, 0 for an empty tree.
    pub fn depth(&self) -> usize {
        fn depth_of<T>(node: Option<&Node<T>>) -> usize {
            match node {
                None => 0,
                Some(n) => 1 + depth_of(n.left.as_deref()).max(depth_of(n.right.as_deref())),
            }
        }
        depth_of(self.root.as_deref())
    }

    /// In-order traversal over every indexed record.
    pub fn iter(&self) -> Iter<'_, T> {
        let mut iter = Iter { stack: Vec::new() };
        iter.push_left(self.root.as_deref());
        iter
    }
}

impl<'a, T> IntoIterator for &'a KdTree<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct Iter<'a, T> {
    stack: Vec<&'a Node<T>>,
}

impl<'a, T> Iter<'a, T> {
    fn push_left(&mut self, mut node: Option<&'a Node<T>>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left.as_deref();
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left(node.right.as_deref());
        Some(&node.record)
    }
}

fn compare_on<T: Coordinates>(axis: Axis) -> impl Fn(&T, &T) -> Ordering {
    move |a, b| a.coordinate(axis).total_cmp(&b.coordinate(axis))
}

/// Split `records` around the median on `axis`.
/// Returns (before median, median, after median).
fn split_at_median<T: Coordinates>(mut records: Vec<T>, axis: Axis) -> Option<(Vec<T>, T, Vec<T>)> {
    if records.is_empty() {
        return None;
    }
    let median = records.len() / 2;
    records.select_nth_unstable_by(median, compare_on(axis));
    let after = records.split_off(median + 1);
    let record = records.pop()?;
    Some((records, record, after))
}

fn build_subtree<T: Coordinates>(records: Vec<T>, depth: usize) -> Option<Box<Node<T>>> {
    let axis = Axis::at_depth(depth);
    let (before, record, after) = split_at_median(records, axis)?;

    Some(Box::new(Node {
        record,
        axis,
        left: build_subtree(before, depth + 1),
        right: build_subtree(after, depth + 1),
    }))
}

fn par_build_subtree<T: Coordinates + Send>(records: Vec<T>, depth: usize) -> Option<Box<Node<T>>> {
    if records.len() < PARALLEL_THRESHOLD {
        return build_subtree(records, depth);
    }

    let axis = Axis::at_depth(depth);
    let (before, record, after) = split_at_median(records, axis)?;
    let (left, right) = rayon::join(
        || par_build_subtree(before, depth + 1),
        || par_build_subtree(after, depth + 1),
    );

    Some(Box::new(Node {
        record,
        axis,
        left,
        right,
    }))
}

fn search<'a, T: Coordinates>(node: &'a Node<T>, query: &[f64; 2], best: &mut Neighbor<'a, T>) {
    let distance_sq = squared_distance(&node.record, query);
    if distance_sq < best.distance_sq {
        *best = Neighbor {
            record: &node.record,
            distance_sq,
        };
    }

    let delta = query[node.axis.index()] - node.record.coordinate(node.axis);
    let (near, far) = if delta <= 0.0 {
        (node.left.as_deref(), node.right.as_deref())
    } else {
        (node.right.as_deref(), node.left.as_deref())
    };

    if let Some(child) = near {
        search(child, query, best);
    }

    // The far side lies entirely beyond the splitting line.
    if delta * delta < best.distance_sq {
        if let Some(child) = far {
            search(child, query, best);
        }
    }
}
