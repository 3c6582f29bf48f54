//! # singledetect
//!
//! `singledetect` finds the isolated points ("singles") of a moving 2D point set:
//! the points whose nearest neighbor is farther than a fixed threshold. It also
//! answers k-nearest-neighbor queries against any origin point. It is meant to
//! be refreshed once per animation frame, in Rust or compiled to WebAssembly (WASM).
//!
//! ## Features
//!
//! - **Pluggable strategies**: an exact O(n^2) reference scan and a uniform-grid
//!   strategy that only inspects the 3x3 block of cells around each point.
//! - **Incremental grid upkeep**: moving a point only touches the two buckets involved.
//! - **Exact k-NN**: the grid search widens ring by ring until the result is certain.
//! - **WASM-first**: a `wasm-bindgen` facade drives a random point set frame by frame.
//!
//! ## Example
//!
//! ```
//! use singledetect::{DetectionEngine, DetectorConfig, PointIdAllocator, Viewport};
//!
//! let mut ids = PointIdAllocator::new();
//! let points = vec![ids.point(0.0, 0.0), ids.point(10.0, 0.0), ids.point(100.0, 0.0)];
//! let config = DetectorConfig::new(Viewport::new(0.0, 0.0, 600.0, 500.0), 45.0);
//!
//! let mut engine = DetectionEngine::from_config(points, &config)?;
//! engine.refresh_singles();
//! assert_eq!(engine.singles().indices(), &[2]);
//! # Ok::<(), singledetect::DetectError>(())
//! ```
//!
//! ## Main Interface
//!
//! The primary entry point is the [`DetectionEngine`] struct, which owns the points,
//! the grid geometry and the active [`DetectionStrategy`].

mod algorithm;
mod animation;
mod bounds;
mod config;
mod engine;
mod error;
mod grid;
mod knn;
mod point;
mod singles;
mod stopwatch;
mod wasm;

pub use algorithm::grid::GridStrategy;
pub use algorithm::naive::NaiveStrategy;
pub use algorithm::DetectionStrategy;
pub use algorithm::StrategyKind;
pub use algorithm::AUTO_GRID_MIN_POINTS;
pub use animation::random_points;
pub use animation::Animation;
pub use bounds::Viewport;
pub use config::DetectorConfig;
pub use engine::DetectionEngine;
pub use error::DetectError;
pub use error::Result;
pub use grid::Cell;
pub use grid::GridIndex;
pub use grid::GridLayout;
pub use grid::MAX_GRID_CELLS;
pub use knn::validate_k;
pub use knn::KnnResult;
pub use knn::Neighbor;
pub use point::Point;
pub use point::PointId;
pub use point::PointIdAllocator;
pub use singles::SinglesResult;
pub use wasm::SingleDetect;
