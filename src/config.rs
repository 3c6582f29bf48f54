//! Configuration for a detection engine.

use crate::algorithm::StrategyKind;
use crate::bounds::Viewport;
use crate::error::{DetectError, Result};
use crate::grid::{GridLayout, MAX_GRID_CELLS};

/// Parameters fixed for the lifetime of a [`DetectionEngine`](crate::DetectionEngine).
///
/// Use the builder methods to customise parameters.
///
/// # Example
///
/// ```
/// use singledetect::{DetectorConfig, StrategyKind, Viewport};
///
/// let config = DetectorConfig::new(Viewport::new(0.0, 0.0, 600.0, 500.0), 45.0)
///     .with_strategy(StrategyKind::Grid);
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.cell_side(), 45.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DetectorConfig {
    /// Bounds the grid is laid over.
    viewport: Viewport,
    /// Points farther than this from every other point are singles.
    max_distance: f64,
    /// Strategy picked at construction.
    strategy: StrategyKind,
    /// Grid cell side; `None` means `max_distance`.
    cell_side: Option<f64>,
}

impl DetectorConfig {
    /// Creates a configuration with the given viewport and threshold.
    ///
    /// Defaults: `strategy = Auto`, `cell_side = max_distance`.
    pub fn new(viewport: Viewport, max_distance: f64) -> Self {
        Self {
            viewport,
            max_distance,
            strategy: StrategyKind::Auto,
            cell_side: None,
        }
    }

    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = strategy;
        self
    }

    /// Overrides the grid cell side. Must not be smaller than the threshold.
    pub fn with_cell_side(mut self, cell_side: f64) -> Self {
        self.cell_side = Some(cell_side);
        self
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    pub fn strategy(&self) -> StrategyKind {
        self.strategy
    }

    pub fn cell_side(&self) -> f64 {
        self.cell_side.unwrap_or(self.max_distance)
    }

    /// Grid geometry derived from the viewport and cell side.
    pub fn layout(&self) -> GridLayout {
        GridLayout::new(&self.viewport, self.cell_side())
    }

    /// Validates this configuration.
    ///
    /// Checks the viewport first, then the threshold, then the cell side, then
    /// the number of grid cells it yields.
    pub fn validate(&self) -> Result<()> {
        self.viewport.validate()?;
        if !self.max_distance.is_finite() || self.max_distance <= 0.0 {
            return Err(DetectError::InvalidMaxDistance {
                max_distance: self.max_distance,
            });
        }
        let cell_side = self.cell_side();
        if !cell_side.is_finite() || cell_side < self.max_distance {
            return Err(DetectError::InvalidCellSide {
                cell_side,
                max_distance: self.max_distance,
            });
        }
        let layout = self.layout();
        if layout.checked_cell_count().is_none() {
            return Err(DetectError::GridTooLarge {
                grid_width: layout.grid_width,
                grid_height: layout.grid_height,
                max_cells: MAX_GRID_CELLS,
            });
        }
        Ok(())
    }
}
