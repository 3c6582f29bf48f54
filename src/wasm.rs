use wasm_bindgen::prelude::*;

use crate::algorithm::{DetectionStrategy, StrategyKind};
use crate::animation::{random_points, Animation};
use crate::bounds::Viewport;
use crate::config::DetectorConfig;
use crate::engine::DetectionEngine;
use crate::knn::validate_k;
use crate::point::PointIdAllocator;

/// Browser-facing detector over a random point set, driven once per animation frame.
///
/// wasm-bindgen rejects re-entrant calls on the same object, so a frame that is
/// still running cannot be overlapped by the next one.
#[wasm_bindgen]
pub struct SingleDetect {
    inner: DetectionEngine<Box<dyn DetectionStrategy>>,
    animation: Animation,
}

#[wasm_bindgen]
impl SingleDetect {
    /// Creates `count` random points in the viewport and a detector for them.
    ///
    /// # Arguments
    ///
    /// * `max_distance` - Points farther than this from all others are singles.
    /// * `use_grid` - Grid-accelerated strategy if true, naive scan otherwise.
    #[wasm_bindgen(constructor)]
    pub fn new(
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
        max_distance: f64,
        count: usize,
        use_grid: bool,
    ) -> Result<SingleDetect, JsError> {
        let viewport = Viewport::new(min_x, min_y, max_x, max_y);
        let kind = if use_grid { StrategyKind::Grid } else { StrategyKind::Naive };
        let config = DetectorConfig::new(viewport, max_distance).with_strategy(kind);
        config.validate()?;

        let mut animation = Animation::from_entropy();
        let points = random_points(count, &viewport, &mut PointIdAllocator::new(), animation.rng());
        let inner = DetectionEngine::from_config(points, &config)?;
        Ok(SingleDetect { inner, animation })
    }

    /// Moves `moving` random points by up to `speed` and refreshes the singles.
    ///
    /// Returns the detection time in milliseconds.
    pub fn frame(&mut self, moving: usize, speed: f64) -> Result<f64, JsError> {
        Ok(self.animation.frame(&mut self.inner, moving, speed)?)
    }

    /// Recomputes the singles without moving anything; returns milliseconds.
    pub fn refresh_singles(&mut self) -> f64 {
        self.inner.refresh_singles().as_secs_f64() * 1000.0
    }

    /// Moves the point in slot `index`.
    pub fn set_position(&mut self, index: usize, x: f64, y: f64) -> Result<(), JsError> {
        Ok(self.inner.set_position(index, x, y)?)
    }

    /// Slots of the `k` nearest neighbors of the point in slot `index`.
    pub fn query_knn(&mut self, index: usize, k: i32) -> Result<Vec<u32>, JsError> {
        let k = validate_k(k as i64)?;
        let result = self.inner.query_knn_at(index, k)?;
        Ok(result.neighbors().iter().map(|n| n.index as u32).collect())
    }

    /// Distances of the last k-NN query, in result order.
    #[wasm_bindgen(getter)]
    pub fn knn_distances(&self) -> Vec<f64> {
        self.inner.knn().map(|r| r.distances()).unwrap_or_default()
    }

    /// Flat `[x, y, x, y, ...]` array of all point positions.
    #[wasm_bindgen(getter)]
    pub fn points(&self) -> Vec<f64> {
        self.inner.points().iter().flat_map(|p| p.position()).collect()
    }

    #[wasm_bindgen(getter)]
    pub fn singles(&self) -> Vec<u32> {
        self.inner.singles().indices().iter().map(|&i| i as u32).collect()
    }

    #[wasm_bindgen(getter)]
    pub fn moving(&self) -> Vec<u32> {
        self.animation.moving().iter().map(|&i| i as u32).collect()
    }

    #[wasm_bindgen(getter)]
    pub fn count(&self) -> usize {
        self.inner.len()
    }

    #[wasm_bindgen(getter)]
    pub fn strategy(&self) -> String {
        self.inner.strategy().name().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn max_distance(&self) -> f64 {
        self.inner.max_distance()
    }

    #[wasm_bindgen(getter)]
    pub fn cell_side(&self) -> f64 {
        self.inner.cell_side()
    }

    #[wasm_bindgen(getter)]
    pub fn grid_width(&self) -> usize {
        self.inner.grid_width()
    }

    #[wasm_bindgen(getter)]
    pub fn grid_height(&self) -> usize {
        self.inner.grid_height()
    }
}
