use crate::algorithm::{finish_knn, DetectionStrategy};
use crate::grid::{Cell, GridLayout};
use crate::knn::Neighbor;
use crate::point::Point;

/// Exhaustive pairwise scan.
///
/// Singles in O(n^2), k-NN in O(n log n). Keeps no index, so relocations are
/// free. Serves as the reference the grid strategy is checked against.
#[derive(Clone, Copy, Debug, Default)]
pub struct NaiveStrategy;

impl NaiveStrategy {
    pub fn new() -> Self {
        NaiveStrategy
    }
}

impl DetectionStrategy for NaiveStrategy {
    fn name(&self) -> &'static str {
        "Naive Strategy"
    }

    fn rebuild(&mut self, _points: &[Point], _layout: &GridLayout) {}

    fn relocate(&mut self, _index: usize, _from: Cell, _to: Cell) {}

    fn update_singles(&self, points: &[Point], max_distance: f64) -> Vec<usize> {
        let mut singles = Vec::new();
        for (i, p1) in points.iter().enumerate() {
            let isolated = points
                .iter()
                .enumerate()
                .all(|(j, p2)| i == j || p1.distance(p2) > max_distance);
            if isolated {
                singles.push(i);
            }
        }
        singles
    }

    fn update_knn(&self, points: &[Point], origin: &Point, k: usize) -> Vec<Neighbor> {
        let neighbors = points
            .iter()
            .enumerate()
            .filter(|(_, p)| p.id() != origin.id())
            .map(|(i, p)| Neighbor::new(i, p, origin.distance(p)))
            .collect();
        finish_knn(neighbors, k)
    }
}
