use crate::grid::{Cell, GridLayout};
use crate::knn::Neighbor;
use crate::point::Point;

pub mod grid;
pub mod naive;

/// Point count from which [`StrategyKind::Auto`] picks the grid strategy.
pub const AUTO_GRID_MIN_POINTS: usize = 64;

/// Trait defining a single-detection and k-NN algorithm.
/// This allows swapping between the naive scan and the grid-accelerated search.
///
/// Strategies see points by slot (their index in the engine's point list).
/// The engine keeps every point's cached cell current and reports each change
/// through [`relocate`](DetectionStrategy::relocate) before any query runs.
pub trait DetectionStrategy: Send + Sync {
    /// Human readable name, used in logs.
    fn name(&self) -> &'static str;

    /// Rebuild any index from scratch for the given points.
    fn rebuild(&mut self, points: &[Point], layout: &GridLayout);

    /// Point `index` moved from cell `from` to cell `to`.
    fn relocate(&mut self, index: usize, from: Cell, to: Cell);

    /// Slots of all points with no other point within `max_distance`, ascending.
    fn update_singles(&self, points: &[Point], max_distance: f64) -> Vec<usize>;

    /// The `k` points closest to `origin`, excluding any point with the origin's id.
    ///
    /// Sorted by ascending distance, ties broken by ascending id.
    fn update_knn(&self, points: &[Point], origin: &Point, k: usize) -> Vec<Neighbor>;
}

impl<T: DetectionStrategy + ?Sized> DetectionStrategy for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn rebuild(&mut self, points: &[Point], layout: &GridLayout) {
        (**self).rebuild(points, layout)
    }

    fn relocate(&mut self, index: usize, from: Cell, to: Cell) {
        (**self).relocate(index, from, to)
    }

    fn update_singles(&self, points: &[Point], max_distance: f64) -> Vec<usize> {
        (**self).update_singles(points, max_distance)
    }

    fn update_knn(&self, points: &[Point], origin: &Point, k: usize) -> Vec<Neighbor> {
        (**self).update_knn(points, origin, k)
    }
}

/// Which strategy an engine built from configuration uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StrategyKind {
    /// O(n^2) scan. Reference behavior.
    Naive,
    /// Uniform grid with 3x3 neighborhood lookups.
    Grid,
    /// `Naive` below [`AUTO_GRID_MIN_POINTS`] points, `Grid` otherwise.
    #[default]
    Auto,
}

impl StrategyKind {
    /// Resolves `Auto` for a point set of `count` points.
    pub fn resolve(self, count: usize) -> StrategyKind {
        match self {
            StrategyKind::Auto if count < AUTO_GRID_MIN_POINTS => StrategyKind::Naive,
            StrategyKind::Auto => StrategyKind::Grid,
            kind => kind,
        }
    }

    /// Instantiates the strategy for a point set of `count` points.
    pub fn build(self, layout: &GridLayout, count: usize) -> Box<dyn DetectionStrategy> {
        match self.resolve(count) {
            StrategyKind::Naive => Box::new(naive::NaiveStrategy::new()),
            _ => Box::new(grid::GridStrategy::new(layout)),
        }
    }
}

/// Sorts neighbors by distance, then id, and keeps the first `k`.
pub(crate) fn finish_knn(mut neighbors: Vec<Neighbor>, k: usize) -> Vec<Neighbor> {
    neighbors.sort_unstable_by(Neighbor::order);
    neighbors.truncate(k);
    neighbors
}
