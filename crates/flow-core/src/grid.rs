use serde::{Deserialize, Serialize};

/// A single grid square, identified by row and column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// True iff the two cells are orthogonal neighbors (Manhattan distance exactly 1).
pub fn adjacent(a: Cell, b: Cell) -> bool {
    a.row.abs_diff(b.row) + a.col.abs_diff(b.col) == 1
}

/// Fixed grid dimensions, set once at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub rows: usize,
    pub cols: usize,
}

impl Grid {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    /// Step from `cell` by a row/column delta, or `None` if that leaves the grid.
    pub fn step(&self, cell: Cell, dr: i32, dc: i32) -> Option<Cell> {
        let row = cell.row as i32 + dr;
        let col = cell.col as i32 + dc;
        if row < 0 || col < 0 || row >= self.rows as i32 || col >= self.cols as i32 {
            return None;
        }
        Some(Cell::new(row as usize, col as usize))
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |r| (0..cols).map(move |c| Cell::new(r, c)))
    }
}

/// Pixel-space mapping for a grid rendered with square cells.
///
/// `cell_from_point` and `cell_center` are exact inverses: the center of any
/// in-bounds cell always maps back to that cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridGeometry {
    grid: Grid,
    cell_size: u32,
}

impl GridGeometry {
    /// Geometry for a grid rendered `pixel_width` wide. Cells are square, so
    /// the side length is `pixel_width / cols` and the height follows from
    /// the row count.
    pub fn new(grid: Grid, pixel_width: u32) -> Self {
        let cell_size = if grid.cols == 0 {
            0
        } else {
            pixel_width / grid.cols as u32
        };
        Self { grid, cell_size }
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    /// Map a continuous point to the cell containing it, or `None` when the
    /// point lies outside the grid's pixel extent.
    pub fn cell_from_point(&self, x: i32, y: i32) -> Option<Cell> {
        if x < 0 || y < 0 || self.cell_size == 0 {
            return None;
        }
        let cell = Cell::new(
            (y as u32 / self.cell_size) as usize,
            (x as u32 / self.cell_size) as usize,
        );
        self.grid.in_bounds(cell).then_some(cell)
    }

    /// Pixel center of a cell.
    pub fn cell_center(&self, cell: Cell) -> (u32, u32) {
        (
            cell.col as u32 * self.cell_size + self.cell_size / 2,
            cell.row as u32 * self.cell_size + self.cell_size / 2,
        )
    }
}
