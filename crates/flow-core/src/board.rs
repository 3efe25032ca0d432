use serde::{Deserialize, Serialize};

use crate::grid::{Cell, Grid};

/// Index into the color palette. Each generated board assigns colors
/// `0..num_pairs` in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorId(pub usize);

/// One color's two endpoints plus the seed walk that produced them.
///
/// The seed walk is the generator's witness that the endpoints are
/// connectable; it never blocks play.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorRecord {
    pub endpoints: [Cell; 2],
    pub seed: Vec<Cell>,
}

/// A generated puzzle instance: grid dimensions plus per-color endpoint
/// records. Immutable until the session regenerates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    grid: Grid,
    records: Vec<ColorRecord>,
}

impl Board {
    pub fn new(grid: Grid, records: Vec<ColorRecord>) -> Self {
        Self { grid, records }
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn num_colors(&self) -> usize {
        self.records.len()
    }

    pub fn colors(&self) -> impl Iterator<Item = ColorId> {
        (0..self.records.len()).map(ColorId)
    }

    pub fn record(&self, color: ColorId) -> &ColorRecord {
        &self.records[color.0]
    }

    pub fn records(&self) -> impl Iterator<Item = (ColorId, &ColorRecord)> {
        self.records.iter().enumerate().map(|(i, r)| (ColorId(i), r))
    }

    pub fn endpoints(&self, color: ColorId) -> [Cell; 2] {
        self.records[color.0].endpoints
    }

    /// The color whose endpoint sits on `cell`, if any.
    pub fn endpoint_color_at(&self, cell: Cell) -> Option<ColorId> {
        self.records()
            .find(|(_, r)| r.endpoints.contains(&cell))
            .map(|(color, _)| color)
    }

    /// The endpoint of `color` other than `cell`, or `None` when `cell` is
    /// not one of that color's endpoints.
    pub fn other_endpoint(&self, color: ColorId, cell: Cell) -> Option<Cell> {
        let [a, b] = self.records[color.0].endpoints;
        if cell == a {
            Some(b)
        } else if cell == b {
            Some(a)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> Board {
        Board::new(
            Grid::new(3, 3),
            vec![
                ColorRecord {
                    endpoints: [Cell::new(0, 0), Cell::new(0, 2)],
                    seed: vec![Cell::new(0, 0), Cell::new(0, 1), Cell::new(0, 2)],
                },
                ColorRecord {
                    endpoints: [Cell::new(2, 0), Cell::new(2, 2)],
                    seed: vec![Cell::new(2, 0), Cell::new(2, 1), Cell::new(2, 2)],
                },
            ],
        )
    }

    #[test]
    fn endpoint_lookup() {
        let board = board();
        assert_eq!(board.endpoint_color_at(Cell::new(0, 0)), Some(ColorId(0)));
        assert_eq!(board.endpoint_color_at(Cell::new(2, 2)), Some(ColorId(1)));
        assert_eq!(board.endpoint_color_at(Cell::new(0, 1)), None);
        assert_eq!(board.endpoint_color_at(Cell::new(1, 1)), None);
    }

    #[test]
    fn other_endpoint_both_directions() {
        let board = board();
        assert_eq!(
            board.other_endpoint(ColorId(0), Cell::new(0, 0)),
            Some(Cell::new(0, 2))
        );
        assert_eq!(
            board.other_endpoint(ColorId(0), Cell::new(0, 2)),
            Some(Cell::new(0, 0))
        );
        assert_eq!(board.other_endpoint(ColorId(0), Cell::new(2, 0)), None);
    }
}
