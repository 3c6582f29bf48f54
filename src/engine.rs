use std::time::Duration;

use rustc_hash::FxHashMap;
use tracing::{debug, info, trace};

use crate::algorithm::DetectionStrategy;
use crate::bounds::Viewport;
use crate::config::DetectorConfig;
use crate::error::{DetectError, Result};
use crate::grid::GridLayout;
use crate::knn::KnnResult;
use crate::point::{Point, PointId};
use crate::singles::SinglesResult;
use crate::stopwatch::Stopwatch;

/// Owns a fixed set of points and keeps the singles and k-NN results for them.
///
/// The point set never grows or shrinks after construction. Callers move
/// points between refreshes with [`set_position`](Self::set_position), which is
/// the only place coordinates change, so each point's cached grid cell and the
/// strategy's buckets are reconciled on every write.
///
/// All operations are synchronous and single-threaded. The engine needs
/// `&mut self` to refresh, so overlapping refreshes on one instance cannot happen.
pub struct DetectionEngine<A: DetectionStrategy> {
    viewport: Viewport,
    layout: GridLayout,
    max_distance: f64,
    points: Vec<Point>,
    slots: FxHashMap<PointId, usize>,
    strategy: A,
    singles: SinglesResult,
    knn: Option<KnnResult>,
}

impl<A: DetectionStrategy> DetectionEngine<A> {
    /// Builds an engine over `points` with an explicit strategy.
    ///
    /// Fails if the configuration is invalid, a point has a non-finite
    /// coordinate, or two points share an id.
    pub fn new(points: Vec<Point>, config: &DetectorConfig, strategy: A) -> Result<Self> {
        config.validate()?;
        let layout = config.layout();

        let mut slots = FxHashMap::default();
        slots.reserve(points.len());
        for (index, point) in points.iter().enumerate() {
            check_finite(point.id(), point.x(), point.y())?;
            if slots.insert(point.id(), index).is_some() {
                return Err(DetectError::DuplicatePointId { id: point.id() });
            }
        }

        let mut engine = DetectionEngine {
            viewport: *config.viewport(),
            layout,
            max_distance: config.max_distance(),
            points,
            slots,
            strategy,
            singles: SinglesResult::default(),
            knn: None,
        };
        for point in &mut engine.points {
            let cell = layout.cell_of(point.x(), point.y());
            point.place(point.x(), point.y(), cell);
        }
        engine.strategy.rebuild(&engine.points, &engine.layout);

        info!(
            points = engine.points.len(),
            strategy = engine.strategy.name(),
            max_distance = engine.max_distance,
            cell_side = layout.cell_side,
            grid_width = layout.grid_width,
            grid_height = layout.grid_height,
            "detection engine ready"
        );
        Ok(engine)
    }

    /// Recomputes the singles from scratch and returns the time it took.
    #[tracing::instrument(skip_all, fields(points = self.points.len()))]
    pub fn refresh_singles(&mut self) -> Duration {
        let watch = Stopwatch::start();
        let singles = self.strategy.update_singles(&self.points, self.max_distance);
        let elapsed = watch.elapsed();

        debug!(singles = singles.len(), elapsed_us = elapsed.as_micros() as u64, "singles refreshed");
        self.singles = SinglesResult::new(singles, elapsed);
        elapsed
    }

    /// Finds the `k` points nearest to `origin` and stores the result.
    ///
    /// `origin` need not belong to the set; any point sharing its id is
    /// excluded. `k = 0` yields an empty result, and `k` at or above the number
    /// of other points yields all of them.
    #[tracing::instrument(skip_all, fields(origin = %origin.id(), k = k))]
    pub fn query_knn(&mut self, origin: &Point, k: usize) -> &KnnResult {
        let watch = Stopwatch::start();
        let neighbors = if k == 0 || self.points.is_empty() {
            Vec::new()
        } else {
            self.strategy.update_knn(&self.points, origin, k)
        };
        let elapsed = watch.elapsed();

        debug!(found = neighbors.len(), elapsed_us = elapsed.as_micros() as u64, "knn query done");
        self.knn.insert(KnnResult::new(origin.clone(), k, neighbors, elapsed))
    }

    /// Same as [`query_knn`](Self::query_knn) with the point in slot `index` as origin.
    pub fn query_knn_at(&mut self, index: usize, k: usize) -> Result<&KnnResult> {
        let origin = self.point(index)?.clone();
        Ok(self.query_knn(&origin, k))
    }

    /// Moves the point in slot `index` to `(x, y)`.
    ///
    /// Coordinates outside the viewport are accepted; the point is bucketed in
    /// the nearest border cell. NaN and infinite coordinates are rejected and
    /// leave the point where it was.
    pub fn set_position(&mut self, index: usize, x: f64, y: f64) -> Result<()> {
        let len = self.points.len();
        let point = self
            .points
            .get_mut(index)
            .ok_or(DetectError::PointIndexOutOfRange { index, len })?;
        check_finite(point.id(), x, y)?;

        let from = point.cell();
        let to = self.layout.cell_of(x, y);
        point.place(x, y, to);

        if from != to {
            trace!(index, ?from, ?to, "point changed cell");
            self.strategy.relocate(index, from, to);
        }
        Ok(())
    }

    /// Moves the point with identifier `id` to `(x, y)`.
    pub fn set_position_by_id(&mut self, id: PointId, x: f64, y: f64) -> Result<()> {
        let index = self.index_of(id).ok_or(DetectError::UnknownPointId { id })?;
        self.set_position(index, x, y)
    }

    /// Replaces the strategy, rebuilding its index for the current positions.
    pub fn set_strategy(&mut self, strategy: A) {
        self.strategy = strategy;
        self.strategy.rebuild(&self.points, &self.layout);
        debug!(strategy = self.strategy.name(), "strategy replaced");
    }

    pub fn strategy(&self) -> &A {
        &self.strategy
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn point(&self, index: usize) -> Result<&Point> {
        self.points.get(index).ok_or(DetectError::PointIndexOutOfRange {
            index,
            len: self.points.len(),
        })
    }

    /// Slot of the point with identifier `id`.
    pub fn index_of(&self, id: PointId) -> Option<usize> {
        self.slots.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Result of the last [`refresh_singles`](Self::refresh_singles).
    pub fn singles(&self) -> &SinglesResult {
        &self.singles
    }

    /// Identifiers of the current singles, in slot order.
    pub fn singles_ids(&self) -> Vec<PointId> {
        self.singles
            .indices()
            .iter()
            .map(|&i| self.points[i].id())
            .collect()
    }

    /// Result of the last k-NN query, if any.
    pub fn knn(&self) -> Option<&KnnResult> {
        self.knn.as_ref()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    pub fn cell_side(&self) -> f64 {
        self.layout.cell_side
    }

    pub fn grid_width(&self) -> usize {
        self.layout.grid_width
    }

    pub fn grid_height(&self) -> usize {
        self.layout.grid_height
    }
}

fn check_finite(id: PointId, x: f64, y: f64) -> Result<()> {
    if x.is_finite() && y.is_finite() {
        Ok(())
    } else {
        Err(DetectError::NonFinitePosition { id, x, y })
    }
}

impl DetectionEngine<Box<dyn DetectionStrategy>> {
    /// Builds an engine whose strategy is chosen by `config.strategy()`.
    pub fn from_config(points: Vec<Point>, config: &DetectorConfig) -> Result<Self> {
        config.validate()?;
        let strategy = config.strategy().build(&config.layout(), points.len());
        Self::new(points, config, strategy)
    }
}
