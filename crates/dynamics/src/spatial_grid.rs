// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

// Uniform grid for neighbor queries over the simulation domain.
//
// Partitions the domain into rectangular cells. Each occupied cell stores the
// indices of particles whose positions fall within it; empty cells are never
// allocated. Queries walk the cell range covering the query circle's bounding
// box and hand every particle found there to the caller, giving O(N)
// construction and O(k) queries. The grid is a throwaway value: build it,
// query it, drop it. Nothing is updated incrementally.

use common::Domain;
use glam::DVec2;
use rustc_hash::FxHashMap;

use crate::particle::Particle;

/// Smallest cell edge the grid will use, regardless of what the caller asks for.
pub const MIN_CELL_SIZE: f64 = 4.0;

/// How positions outside the nominal domain are assigned to cells.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CellMapping {
    /// Out-of-range coordinates land in the nearest edge cell (reflecting walls).
    Clamp,
    /// Out-of-range coordinates wrap around (periodic boundaries).
    Wrap,
}

/// A uniform 2D grid of particle indices.
///
/// With [`CellMapping::Clamp`] cells are squares of side `max(cell_size, MIN_CELL_SIZE)`.  With
/// [`CellMapping::Wrap`] the cells are stretched so that a whole number of them tiles the domain
/// exactly; every cell is still at least the requested size, which keeps the query range
/// conservative across the periodic seam.
pub struct SpatialGrid {
    cell_extent: DVec2,
    inv_cell_extent: DVec2,
    columns: i32,
    rows: i32,
    mapping: CellMapping,
    cells: FxHashMap<(i32, i32), Vec<usize>>,
}

impl SpatialGrid {
    /// Builds a grid from an iterator of positions.  Particle `i` is the `i`-th position.
    pub fn build<I>(positions: I, domain: &Domain, cell_size: f64, mapping: CellMapping) -> Self
    where
        I: IntoIterator<Item = DVec2>,
    {
        let cell_size = if cell_size.is_finite() {
            cell_size.max(MIN_CELL_SIZE)
        } else {
            MIN_CELL_SIZE
        };
        let width = domain.width.max(cell_size);
        let height = domain.height.max(cell_size);

        let (columns, rows, cell_extent) = match mapping {
            CellMapping::Clamp => {
                let columns = (width / cell_size).ceil() as i32;
                let rows = (height / cell_size).ceil() as i32;
                (columns, rows, DVec2::splat(cell_size))
            }
            CellMapping::Wrap => {
                let columns = ((width / cell_size).floor() as i32).max(1);
                let rows = ((height / cell_size).floor() as i32).max(1);
                let extent = DVec2::new(width / columns as f64, height / rows as f64);
                (columns, rows, extent)
            }
        };

        let mut grid = Self {
            cell_extent,
            inv_cell_extent: cell_extent.recip(),
            columns: columns.max(1),
            rows: rows.max(1),
            mapping,
            cells: FxHashMap::default(),
        };

        for (i, position) in positions.into_iter().enumerate() {
            let cell = grid.cell_of(position);
            grid.cells.entry(cell).or_default().push(i);
        }

        grid
    }

    /// Builds a grid over the current particle positions.
    pub fn from_particles(
        particles: &[Particle],
        domain: &Domain,
        cell_size: f64,
        mapping: CellMapping,
    ) -> Self {
        Self::build(
            particles.iter().map(|p| p.position),
            domain,
            cell_size,
            mapping,
        )
    }

    /// The cell a point belongs to.  Points on a cell boundary go to the cell on their
    /// positive side (floor semantics).
    pub fn cell_of(&self, point: DVec2) -> (i32, i32) {
        let gx = self.raw_index(point.x * self.inv_cell_extent.x);
        let gy = self.raw_index(point.y * self.inv_cell_extent.y);
        (
            self.map_index(gx, self.columns),
            self.map_index(gy, self.rows),
        )
    }

    /// Calls `f(j)` for every particle `j` stored in a cell that could hold a point within
    /// `radius` of `point`.
    ///
    /// The visited set is a superset of the particles actually within `radius`: callers must
    /// check exact distances themselves.  Each particle is visited at most once per call, in no
    /// particular order.
    pub fn for_each_neighbor<F: FnMut(usize)>(&self, point: DVec2, radius: f64, mut f: F) {
        let radius = radius.max(0.0);
        let min = (point - DVec2::splat(radius)) * self.inv_cell_extent;
        let max = (point + DVec2::splat(radius)) * self.inv_cell_extent;

        let (x_start, x_end) =
            self.axis_range(self.raw_index(min.x), self.raw_index(max.x), self.columns);
        let (y_start, y_end) =
            self.axis_range(self.raw_index(min.y), self.raw_index(max.y), self.rows);

        for gx in x_start..=x_end {
            let cx = self.map_index(gx, self.columns);
            for gy in y_start..=y_end {
                let cy = self.map_index(gy, self.rows);
                if let Some(indices) = self.cells.get(&(cx, cy)) {
                    for &j in indices {
                        f(j);
                    }
                }
            }
        }
    }

    /// Edge lengths of a single cell.
    pub fn cell_extent(&self) -> DVec2 {
        self.cell_extent
    }

    pub fn columns(&self) -> i32 {
        self.columns
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    /// Number of cells holding at least one particle.
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    fn raw_index(&self, scaled: f64) -> i32 {
        // Saturating float-to-int cast keeps NaN and huge coordinates from wrapping.
        scaled.floor() as i32
    }

    fn map_index(&self, index: i32, count: i32) -> i32 {
        match self.mapping {
            CellMapping::Clamp => index.clamp(0, count - 1),
            CellMapping::Wrap => index.rem_euclid(count),
        }
    }

    /// Unmapped index range to sweep along one axis.  Wrapped ranges never exceed one full
    /// period, so no cell is visited twice.
    fn axis_range(&self, start: i32, end: i32, count: i32) -> (i32, i32) {
        match self.mapping {
            CellMapping::Clamp => (start.clamp(0, count - 1), end.clamp(0, count - 1)),
            CellMapping::Wrap => {
                if end.saturating_sub(start) >= count - 1 {
                    (0, count - 1)
                } else {
                    (start, end)
                }
            }
        }
    }
}


// End of File
