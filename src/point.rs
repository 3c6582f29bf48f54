use std::fmt;
use std::hash::{Hash, Hasher};

use crate::grid::Cell;

/// Stable identifier of a point, unique within one engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointId(u32);

impl PointId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out monotonically increasing point identifiers, starting at 1.
///
/// Whoever builds the point set owns the allocator; there is no process-wide counter.
#[derive(Clone, Debug)]
pub struct PointIdAllocator {
    next: u32,
}

impl PointIdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_id(&mut self) -> PointId {
        let id = PointId(self.next);
        self.next += 1;
        id
    }

    /// Allocates an id and builds a point at `(x, y)` with it.
    pub fn point(&mut self, x: f64, y: f64) -> Point {
        Point::new(self.next_id(), x, y)
    }
}

impl Default for PointIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// A 2D point with a fixed identity and a mutable position.
///
/// Equality and hashing use the identifier only: two points at the same
/// coordinates with different ids are distinct.
///
/// The position and cached grid cell are only written by the
/// [`DetectionEngine`](crate::DetectionEngine), which keeps both in sync.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Point {
    id: PointId,
    x: f64,
    y: f64,
    cell: Cell,
    user_data: u128,
}

impl Point {
    pub fn new(id: PointId, x: f64, y: f64) -> Self {
        Self {
            id,
            x,
            y,
            cell: Cell::default(),
            user_data: 0,
        }
    }

    /// Attaches an opaque value the engine carries but never inspects.
    pub fn with_user_data(mut self, user_data: u128) -> Self {
        self.user_data = user_data;
        self
    }

    pub fn id(&self) -> PointId {
        self.id
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn position(&self) -> [f64; 2] {
        [self.x, self.y]
    }

    /// The grid cell this point was last assigned to.
    pub fn cell(&self) -> Cell {
        self.cell
    }

    pub fn user_data(&self) -> u128 {
        self.user_data
    }

    pub fn set_user_data(&mut self, user_data: u128) {
        self.user_data = user_data;
    }

    /// Euclidean distance to `(x, y)`.
    ///
    /// Not rounded: the singles test is a strict `>` against the threshold.
    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        let dx = self.x - x;
        let dy = self.y - y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn distance(&self, other: &Point) -> f64 {
        self.distance_to(other.x, other.y)
    }

    pub(crate) fn place(&mut self, x: f64, y: f64, cell: Cell) {
        self.x = x;
        self.y = y;
        self.cell = cell;
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id: {}, X: {}, Y: {}", self.id, self.x, self.y)
    }
}
