use tracing::warn;

use crate::bounds::Viewport;
use crate::point::Point;

/// Largest number of cells a grid may have.
pub const MAX_GRID_CELLS: usize = 1 << 20;

/// Column/row coordinate of a grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub x: usize,
    pub y: usize,
}

impl Cell {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Chebyshev distance between two cells, in cells.
    pub fn ring_distance(&self, other: Cell) -> usize {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }
}

/// Geometry of the uniform grid laid over the viewport.
///
/// With `cell_side >= max_distance`, two points within `max_distance` of each
/// other always sit in the same or adjacent cells (the 3x3 block is complete),
/// and points two or more cells apart on either axis are always farther than
/// `max_distance` (the block never needs widening).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    /// Side length of a square cell.
    pub cell_side: f64,
    /// Number of cells along the X axis.
    pub grid_width: usize,
    /// Number of cells along the Y axis.
    pub grid_height: usize,
    /// Minimum X coordinate of the grid.
    pub min_x: f64,
    /// Minimum Y coordinate of the grid.
    pub min_y: f64,
}

impl GridLayout {
    /// Lays cells of side `cell_side` over `viewport`, rounding the cell counts up.
    pub fn new(viewport: &Viewport, cell_side: f64) -> Self {
        let grid_width = ((viewport.width() / cell_side).ceil() as usize).max(1);
        let grid_height = ((viewport.height() / cell_side).ceil() as usize).max(1);
        GridLayout {
            cell_side,
            grid_width,
            grid_height,
            min_x: viewport.min_x,
            min_y: viewport.min_y,
        }
    }

    pub fn cell_count(&self) -> usize {
        self.grid_width.saturating_mul(self.grid_height)
    }

    /// Number of cells, or `None` if it exceeds [`MAX_GRID_CELLS`].
    pub fn checked_cell_count(&self) -> Option<usize> {
        self.grid_width
            .checked_mul(self.grid_height)
            .filter(|&cells| cells <= MAX_GRID_CELLS)
    }

    /// The cell containing `(x, y)`, clamped into the grid.
    ///
    /// Coordinates outside the viewport land in the nearest border cell, so the
    /// result is always a valid bucket.
    pub fn cell_of(&self, x: f64, y: f64) -> Cell {
        let limit_x = (self.grid_width - 1) as f64;
        let limit_y = (self.grid_height - 1) as f64;
        let ix = ((x - self.min_x) / self.cell_side).floor().clamp(0.0, limit_x) as usize;
        let iy = ((y - self.min_y) / self.cell_side).floor().clamp(0.0, limit_y) as usize;
        Cell::new(ix, iy)
    }

    /// Linear bucket index of a cell.
    pub fn bin_index(&self, cell: Cell) -> usize {
        cell.x + cell.y * self.grid_width
    }

    /// Lower-left corner of a cell in viewport coordinates.
    pub fn cell_origin(&self, cell: Cell) -> [f64; 2] {
        [
            self.min_x + cell.x as f64 * self.cell_side,
            self.min_y + cell.y as f64 * self.cell_side,
        ]
    }

    /// The 3x3 block centered on `center`, clipped to the grid.
    pub fn neighbor_cells(&self, center: Cell) -> impl Iterator<Item = Cell> + use<> {
        let x_lo = center.x.saturating_sub(1);
        let x_hi = (center.x + 1).min(self.grid_width - 1);
        let y_lo = center.y.saturating_sub(1);
        let y_hi = (center.y + 1).min(self.grid_height - 1);
        (y_lo..=y_hi).flat_map(move |y| (x_lo..=x_hi).map(move |x| Cell::new(x, y)))
    }

    /// Cells at exactly `radius` rings from `center`, clipped to the grid.
    ///
    /// Ring 0 is the center cell itself, ring 1 the eight cells around it, and so on.
    pub fn ring(&self, center: Cell, radius: usize) -> impl Iterator<Item = Cell> + use<> {
        let cx = center.x as isize;
        let cy = center.y as isize;
        let r = radius as isize;
        let w = self.grid_width as isize;
        let h = self.grid_height as isize;
        (cy - r..=cy + r)
            .filter(move |&y| y >= 0 && y < h)
            .flat_map(move |y| {
                let edge_row = y == cy - r || y == cy + r;
                let step = if edge_row { 1 } else { (2 * r) as usize };
                (cx - r..=cx + r)
                    .step_by(step)
                    .filter(move |&x| x >= 0 && x < w)
                    .map(move |x| Cell::new(x as usize, y as usize))
            })
    }

    /// Returns true if the rings `0..=radius` around `center` cover every cell.
    pub fn covers_grid(&self, center: Cell, radius: usize) -> bool {
        center.x <= radius
            && center.y <= radius
            && center.x + radius >= self.grid_width - 1
            && center.y + radius >= self.grid_height - 1
    }
}

/// Buckets of point slots, one per grid cell.
///
/// Membership mirrors the cached [`Point::cell`] of every point: a point sits
/// in exactly one bucket, the one for its cached cell. Buckets are allocated by
/// the first [`rebuild`](Self::rebuild), after the layout has been validated.
#[derive(Clone, Debug)]
pub struct GridIndex {
    layout: GridLayout,
    bins: Vec<Vec<usize>>,
}

impl GridIndex {
    pub fn new(layout: GridLayout) -> Self {
        GridIndex {
            layout,
            bins: Vec::new(),
        }
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Clears all buckets and re-inserts every point by its cached cell.
    pub fn rebuild(&mut self, points: &[Point], layout: &GridLayout) {
        if self.layout != *layout || self.bins.len() != layout.cell_count() {
            self.layout = *layout;
            self.bins = vec![Vec::new(); layout.cell_count()];
        } else {
            self.bins.iter_mut().for_each(|bin| bin.clear());
        }

        for (index, point) in points.iter().enumerate() {
            let bin = self.layout.bin_index(point.cell());
            self.bins[bin].push(index);
        }
    }

    /// Moves `index` from the bucket of `from` to the bucket of `to`.
    pub fn relocate(&mut self, index: usize, from: Cell, to: Cell) {
        if from == to {
            return;
        }
        let old_bin = self.layout.bin_index(from);
        let pos = self
            .bins
            .get(old_bin)
            .and_then(|bin| bin.iter().position(|&slot| slot == index));
        debug_assert!(pos.is_some(), "slot {index} missing from bucket {from:?}");
        match pos {
            Some(pos) => {
                self.bins[old_bin].swap_remove(pos);
            }
            None => warn!(index, ?from, ?to, "slot missing from its bucket"),
        }
        let new_bin = self.layout.bin_index(to);
        if let Some(bin) = self.bins.get_mut(new_bin) {
            bin.push(index);
        }
    }

    /// Point slots currently in `cell`.
    pub fn bucket(&self, cell: Cell) -> &[usize] {
        self.bins
            .get(self.layout.bin_index(cell))
            .map_or(&[][..], Vec::as_slice)
    }

    /// Point slots in the 3x3 block around `cell`.
    pub fn candidates(&self, cell: Cell) -> impl Iterator<Item = usize> + '_ {
        self.layout
            .neighbor_cells(cell)
            .flat_map(move |c| self.bucket(c).iter().copied())
    }

    pub fn occupied_cells(&self) -> usize {
        self.bins.iter().filter(|bin| !bin.is_empty()).count()
    }
}
