use serde::{Deserialize, Serialize};

use crate::grid::Cell;

/// Why a path-editing input left the session untouched. Callers are free to
/// ignore the reason; illegal input is a defined no-op, never an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    /// Input arrived while the solved board waits for regeneration.
    Frozen,
    /// No color is currently being drawn.
    NotDrawing,
    /// `begin` on a cell that is nobody's endpoint.
    NotAnEndpoint,
    /// The color already connects its two endpoints.
    AlreadyComplete,
    /// Target equals the path's current last cell.
    Duplicate,
    /// Target is not orthogonally adjacent to the last cell.
    NotAdjacent,
    /// Target already appears in the path being drawn.
    Revisit,
    /// Target is another color's endpoint or lies on another color's path.
    ForeignOccupied,
}

/// Outcome of a single path-editing input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttemptResult {
    Accepted,
    Rejected(RejectReason),
}

impl AttemptResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, AttemptResult::Accepted)
    }
}

/// An ordered run of distinct, pairwise-adjacent cells owned by one color.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    cells: Vec<Cell>,
}

impl Path {
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn first(&self) -> Option<Cell> {
        self.cells.first().copied()
    }

    pub fn last(&self) -> Option<Cell> {
        self.cells.last().copied()
    }

    pub fn second_to_last(&self) -> Option<Cell> {
        (self.cells.len() >= 2).then(|| self.cells[self.cells.len() - 2])
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    pub fn push(&mut self, cell: Cell) {
        self.cells.push(cell);
    }

    /// Drop the last cell; the exact inverse of the most recent `push`.
    pub fn retract(&mut self) {
        self.cells.pop();
    }

    /// Discard any previous cells and start over from `cell`.
    pub fn restart(&mut self, cell: Cell) {
        self.cells.clear();
        self.cells.push(cell);
    }

    /// True iff the path links the two given endpoints, in either order.
    pub fn connects(&self, endpoints: [Cell; 2]) -> bool {
        if self.cells.len() < 2 {
            return false;
        }
        let (first, last) = (self.cells[0], self.cells[self.cells.len() - 1]);
        (first == endpoints[0] && last == endpoints[1])
            || (first == endpoints[1] && last == endpoints[0])
    }
}
