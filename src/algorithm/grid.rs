use crate::algorithm::{finish_knn, DetectionStrategy};
use crate::grid::{Cell, GridIndex, GridLayout};
use crate::knn::Neighbor;
use crate::point::Point;

/// Single detection and k-NN over a uniform grid.
///
/// Singles only test the 3x3 block around each point's cell, which is
/// complete as long as the cell side is at least the threshold. Expected cost
/// is close to O(n) for evenly spread points and tends to O(n^2) when most
/// points crowd into a single cell.
///
/// k-NN grows the search ring by ring around the origin's cell and stops once
/// the k-th best candidate is provably closer than anything left unscanned.
#[derive(Clone, Debug)]
pub struct GridStrategy {
    index: GridIndex,
}

impl GridStrategy {
    pub fn new(layout: &GridLayout) -> Self {
        GridStrategy {
            index: GridIndex::new(*layout),
        }
    }

    pub fn index(&self) -> &GridIndex {
        &self.index
    }
}

impl DetectionStrategy for GridStrategy {
    fn name(&self) -> &'static str {
        "Grid Strategy"
    }

    fn rebuild(&mut self, points: &[Point], layout: &GridLayout) {
        self.index.rebuild(points, layout);
    }

    fn relocate(&mut self, index: usize, from: Cell, to: Cell) {
        self.index.relocate(index, from, to);
    }

    fn update_singles(&self, points: &[Point], max_distance: f64) -> Vec<usize> {
        let mut singles = Vec::new();
        for (i, p1) in points.iter().enumerate() {
            let isolated = self
                .index
                .candidates(p1.cell())
                .all(|j| i == j || p1.distance(&points[j]) > max_distance);
            if isolated {
                singles.push(i);
            }
        }
        singles
    }

    fn update_knn(&self, points: &[Point], origin: &Point, k: usize) -> Vec<Neighbor> {
        if k == 0 || points.is_empty() {
            return Vec::new();
        }

        let layout = self.index.layout();
        let center = layout.cell_of(origin.x(), origin.y());
        let mut candidates: Vec<Neighbor> = Vec::new();
        let mut radius = 0;

        loop {
            for cell in layout.ring(center, radius) {
                for &j in self.index.bucket(cell) {
                    let p = &points[j];
                    if p.id() == origin.id() {
                        continue;
                    }
                    candidates.push(Neighbor::new(j, p, origin.distance(p)));
                }
            }

            if layout.covers_grid(center, radius) {
                break;
            }

            // Anything closer than `radius` cells to the origin lies in a scanned ring.
            if candidates.len() >= k {
                let coverage = radius as f64 * layout.cell_side;
                let (_, kth, _) = candidates.select_nth_unstable_by(k - 1, Neighbor::order);
                if kth.distance < coverage {
                    break;
                }
            }
            radius += 1;
        }

        finish_knn(candidates, k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::naive::NaiveStrategy;
    use crate::bounds::Viewport;
    use crate::point::PointId;

    fn setup(coords: &[(f64, f64)], cell_side: f64) -> (Vec<Point>, GridStrategy) {
        let layout = GridLayout::new(&Viewport::new(0.0, 0.0, 100.0, 100.0), cell_side);
        let points: Vec<Point> = coords
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| {
                let mut p = Point::new(PointId::new(i as u32 + 1), x, y);
                p.place(x, y, layout.cell_of(x, y));
                p
            })
            .collect();
        let mut grid = GridStrategy::new(&layout);
        grid.rebuild(&points, &layout);
        (points, grid)
    }

    #[test]
    fn test_singles_across_cell_border() {
        // 9.5 and 10.5 sit in different cells but are 1 apart.
        let (points, grid) = setup(&[(9.5, 50.0), (10.5, 50.0), (80.0, 80.0)], 10.0);
        assert_eq!(grid.update_singles(&points, 10.0), vec![2]);
    }

    #[test]
    fn test_singles_diagonal_neighbor() {
        let (points, grid) = setup(&[(19.9, 19.9), (26.0, 26.0)], 10.0);
        assert!(grid.update_singles(&points, 10.0).is_empty());
    }

    #[test]
    fn test_knn_far_neighbor_needs_many_rings() {
        let (points, grid) = setup(&[(1.0, 1.0), (99.0, 99.0), (50.0, 50.0)], 5.0);
        let result = grid.update_knn(&points, &points[0], 1);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].index, 2);
    }

    #[test]
    fn test_knn_closer_point_in_outer_ring() {
        // Origin near the right border of its cell: the point one cell to the right
        // is closer than the one sharing the origin's cell.
        let (points, grid) = setup(&[(9.9, 5.0), (0.1, 5.0), (10.2, 5.0)], 10.0);
        let result = grid.update_knn(&points, &points[0], 1);
        assert_eq!(result[0].index, 2);
    }

    #[test]
    fn test_knn_matches_naive_on_lattice() {
        let coords: Vec<(f64, f64)> = (0..100)
            .map(|i| ((i % 10) as f64 * 9.7 + 1.0, (i / 10) as f64 * 9.7 + 1.0))
            .collect();
        let (points, grid) = setup(&coords, 7.0);
        for &origin in &[0, 37, 99] {
            for k in [1, 4, 5, 12, 99, 150] {
                let a = grid.update_knn(&points, &points[origin], k);
                let b = NaiveStrategy.update_knn(&points, &points[origin], k);
                assert_eq!(a, b, "origin {} k {}", origin, k);
            }
        }
    }

    #[test]
    fn test_knn_origin_outside_set() {
        let (points, grid) = setup(&[(10.0, 10.0), (20.0, 20.0)], 10.0);
        let stranger = Point::new(PointId::new(99), 150.0, -20.0);
        let result = grid.update_knn(&points, &stranger, 5);
        let slots: Vec<usize> = result.iter().map(|n| n.index).collect();
        assert_eq!(slots, vec![1, 0]);
    }
}
