//! Output type for k-nearest-neighbor queries.

use std::cmp::Ordering;
use std::time::Duration;

use crate::error::{DetectError, Result};
use crate::point::{Point, PointId};

/// One entry of a k-NN result.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Neighbor {
    /// Slot of the point in the engine's point list.
    pub index: usize,
    /// Identifier of the point.
    pub id: PointId,
    /// Euclidean distance to the query origin.
    pub distance: f64,
}

impl Neighbor {
    pub fn new(index: usize, point: &Point, distance: f64) -> Self {
        Self {
            index,
            id: point.id(),
            distance,
        }
    }

    /// Ascending distance, then ascending id.
    pub fn order(a: &Neighbor, b: &Neighbor) -> Ordering {
        a.distance
            .total_cmp(&b.distance)
            .then_with(|| a.id.cmp(&b.id))
    }
}

/// Result of a k-NN query.
///
/// Neighbors are sorted ascending by distance, ties broken by id. The origin
/// itself never appears, so the length is `min(k, n - 1)` for an origin taken
/// from the point set and `min(k, n)` for any other origin.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct KnnResult {
    origin: Point,
    k: usize,
    neighbors: Vec<Neighbor>,
    elapsed: Duration,
}

impl KnnResult {
    pub(crate) fn new(origin: Point, k: usize, neighbors: Vec<Neighbor>, elapsed: Duration) -> Self {
        Self {
            origin,
            k,
            neighbors,
            elapsed,
        }
    }

    pub fn origin(&self) -> &Point {
        &self.origin
    }

    /// The requested k, before truncation.
    pub fn k(&self) -> usize {
        self.k
    }

    pub fn neighbors(&self) -> &[Neighbor] {
        &self.neighbors
    }

    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    pub fn ids(&self) -> Vec<PointId> {
        self.neighbors.iter().map(|n| n.id).collect()
    }

    pub fn distances(&self) -> Vec<f64> {
        self.neighbors.iter().map(|n| n.distance).collect()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

/// Converts a signed neighbor count into a `usize`, rejecting negatives.
pub fn validate_k(k: i64) -> Result<usize> {
    usize::try_from(k).map_err(|_| DetectError::NegativeK { k })
}
