//! Reference mover: random point sets and per-frame movement of a subset.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand::seq::index::sample;

use crate::algorithm::DetectionStrategy;
use crate::bounds::Viewport;
use crate::engine::DetectionEngine;
use crate::error::Result;
use crate::point::{Point, PointIdAllocator};

/// Generates `count` points inside `viewport`.
///
/// Coordinates are whole numbers when the viewport spans at least one on an axis.
pub fn random_points<R: Rng + ?Sized>(
    count: usize,
    viewport: &Viewport,
    ids: &mut PointIdAllocator,
    rng: &mut R,
) -> Vec<Point> {
    (0..count)
        .map(|_| {
            let x = random_coordinate(rng, viewport.min_x, viewport.max_x);
            let y = random_coordinate(rng, viewport.min_y, viewport.max_y);
            ids.point(x, y)
        })
        .collect()
}

fn random_coordinate<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    let (lo, hi) = (min.ceil(), max.floor());
    if lo <= hi {
        rng.gen_range(lo as i64..=hi as i64) as f64
    } else if min < max {
        rng.gen_range(min..max)
    } else {
        min
    }
}

/// Moves a random subset of an engine's points each frame, keeping them in the viewport.
pub struct Animation {
    rng: StdRng,
    moving: Vec<usize>,
}

impl Animation {
    pub fn new(seed: u64) -> Self {
        Animation {
            rng: StdRng::seed_from_u64(seed),
            moving: Vec::new(),
        }
    }

    /// Seeded from the host on wasm32, fixed otherwise.
    pub fn from_entropy() -> Self {
        Self::new(get_seed())
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Slots moved by the last [`step`](Self::step).
    pub fn moving(&self) -> &[usize] {
        &self.moving
    }

    /// Picks up to `count` distinct slots out of `total` to move next.
    pub fn select_moving(&mut self, count: usize, total: usize) {
        let count = count.min(total);
        self.moving = sample(&mut self.rng, total, count).into_vec();
        self.moving.sort_unstable();
    }

    /// Offsets every selected point by up to `speed` on each axis, clamped to the viewport.
    ///
    /// A NaN speed moves nothing; larger speeds are capped at the viewport extent.
    pub fn step<A: DetectionStrategy>(&mut self, engine: &mut DetectionEngine<A>, speed: f64) -> Result<()> {
        let viewport = *engine.viewport();
        let speed = if speed.is_nan() {
            0.0
        } else {
            speed.abs().min(viewport.width().max(viewport.height()))
        };
        for &index in &self.moving {
            let [x, y] = engine.point(index)?.position();
            let (dx, dy) = if speed > 0.0 {
                (
                    self.rng.gen_range(-speed..=speed),
                    self.rng.gen_range(-speed..=speed),
                )
            } else {
                (0.0, 0.0)
            };
            let (nx, ny) = viewport.clamp(x + dx, y + dy);
            engine.set_position(index, nx, ny)?;
        }
        Ok(())
    }

    /// One frame: select `count` points, move them, refresh the singles.
    ///
    /// Returns the elapsed detection time in milliseconds.
    pub fn frame<A: DetectionStrategy>(
        &mut self,
        engine: &mut DetectionEngine<A>,
        count: usize,
        speed: f64,
    ) -> Result<f64> {
        self.select_moving(count, engine.len());
        self.step(engine, speed)?;
        Ok(engine.refresh_singles().as_secs_f64() * 1000.0)
    }
}

fn get_seed() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        (js_sys::Math::random() * 4294967296.0) as u64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        123456789 // Fixed seed for tests
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::grid::GridStrategy;
    use crate::config::DetectorConfig;

    fn engine(count: usize) -> DetectionEngine<GridStrategy> {
        let viewport = Viewport::new(0.0, 0.0, 600.0, 500.0);
        let config = DetectorConfig::new(viewport, 45.0);
        let mut rng = StdRng::seed_from_u64(7);
        let points = random_points(count, &viewport, &mut PointIdAllocator::new(), &mut rng);
        DetectionEngine::new(points, &config, GridStrategy::new(&config.layout())).unwrap()
    }

    #[test]
    fn test_random_points_in_viewport() {
        let viewport = Viewport::new(0.0, 0.0, 600.0, 500.0);
        let mut rng = StdRng::seed_from_u64(1);
        let points = random_points(200, &viewport, &mut PointIdAllocator::new(), &mut rng);
        assert_eq!(points.len(), 200);
        assert!(points.iter().all(|p| viewport.contains(p.x(), p.y())));
        assert!(points.iter().all(|p| p.x().fract() == 0.0));
    }

    #[test]
    fn test_random_points_fractional_viewport() {
        let viewport = Viewport::new(0.5, 0.5, 10.5, 3.5);
        let mut rng = StdRng::seed_from_u64(2);
        let points = random_points(500, &viewport, &mut PointIdAllocator::new(), &mut rng);
        assert!(points.iter().all(|p| viewport.contains(p.x(), p.y())));
        assert!(points.iter().any(|p| p.x() == 1.0));
        assert!(points.iter().any(|p| p.x() == 10.0));

        let narrow = Viewport::new(0.2, 0.2, 0.8, 0.8);
        let points = random_points(100, &narrow, &mut PointIdAllocator::new(), &mut rng);
        assert!(points.iter().all(|p| narrow.contains(p.x(), p.y())));
    }

    #[test]
    fn test_unbounded_speed_stays_in_viewport() {
        let mut engine = engine(30);
        let mut anim = Animation::new(9);
        for speed in [f64::INFINITY, f64::NEG_INFINITY, f64::MAX] {
            anim.frame(&mut engine, 30, speed).unwrap();
            assert!(engine.points().iter().all(|p| engine.viewport().contains(p.x(), p.y())));
        }

        let before: Vec<[f64; 2]> = engine.points().iter().map(|p| p.position()).collect();
        anim.frame(&mut engine, 30, f64::NAN).unwrap();
        let after: Vec<[f64; 2]> = engine.points().iter().map(|p| p.position()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_select_moving_distinct() {
        let mut anim = Animation::new(3);
        anim.select_moving(10, 50);
        let mut moving = anim.moving().to_vec();
        moving.dedup();
        assert_eq!(moving.len(), 10);
        assert!(moving.iter().all(|&i| i < 50));

        anim.select_moving(10, 4);
        assert_eq!(anim.moving(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_step_stays_in_viewport_and_keeps_cells_in_sync() {
        let mut engine = engine(50);
        let mut anim = Animation::new(11);
        for _ in 0..200 {
            anim.frame(&mut engine, 10, 30.0).unwrap();
        }
        let layout = *engine.layout();
        for p in engine.points() {
            assert!(engine.viewport().contains(p.x(), p.y()));
            assert_eq!(p.cell(), layout.cell_of(p.x(), p.y()));
        }
        let in_buckets: usize = (0..layout.grid_height)
            .flat_map(|y| (0..layout.grid_width).map(move |x| crate::grid::Cell::new(x, y)))
            .map(|c| engine.strategy().index().bucket(c).len())
            .sum();
        assert_eq!(in_buckets, 50);
    }

    #[test]
    fn test_zero_speed_keeps_positions() {
        let mut engine = engine(20);
        let before: Vec<[f64; 2]> = engine.points().iter().map(|p| p.position()).collect();
        let mut anim = Animation::new(5);
        anim.frame(&mut engine, 20, 0.0).unwrap();
        let after: Vec<[f64; 2]> = engine.points().iter().map(|p| p.position()).collect();
        assert_eq!(before, after);
    }
}
