use crate::board::{Board, ColorId};
use crate::generator::{self, GeneratorConfig};
use crate::grid::{Cell, Grid, adjacent};
use crate::path::{AttemptResult, Path, RejectReason};

/// Fire-and-forget notification for the audio/render collaborators. Queued
/// in the session and drained by the driving loop; dropping one never
/// affects puzzle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowEvent {
    /// A color just linked its two endpoints.
    Connected(ColorId),
    /// Every color is connected; the board is solved.
    Solved,
}

/// One play-through of generated boards.
///
/// Owns the board, the per-color committed paths and the drawing state;
/// all mutation goes through `begin`/`extend_to`/`release`/`regenerate`.
/// Illegal input is rejected silently and leaves the last valid state
/// intact. Once solved, the session latches: input is frozen until the
/// driver calls `regenerate`.
pub struct Session {
    board: Board,
    paths: Vec<Path>,
    active: Option<ColorId>,
    solved: bool,
    events: Vec<FlowEvent>,
}

impl Session {
    /// Start a session on a freshly generated board. Retries generation
    /// until a valid board is produced.
    pub fn generate(grid: Grid, config: &GeneratorConfig) -> Self {
        Self::with_board(generator::generate_until_valid(grid, config))
    }

    /// Start a session on a pre-built board. Every color begins with an
    /// empty path.
    pub fn with_board(board: Board) -> Self {
        let paths = vec![Path::default(); board.num_colors()];
        Self {
            board,
            paths,
            active: None,
            solved: false,
            events: Vec::new(),
        }
    }

    // ── Read-only snapshot for rendering ─────────────────────────────────

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn grid(&self) -> Grid {
        self.board.grid()
    }

    pub fn path(&self, color: ColorId) -> &Path {
        &self.paths[color.0]
    }

    pub fn paths(&self) -> impl Iterator<Item = (ColorId, &Path)> {
        self.paths.iter().enumerate().map(|(i, p)| (ColorId(i), p))
    }

    /// The color currently being drawn, if a gesture is in progress.
    pub fn active_color(&self) -> Option<ColorId> {
        self.active
    }

    /// True iff `color`'s committed path links its two endpoints.
    pub fn is_complete(&self, color: ColorId) -> bool {
        self.paths[color.0].connects(self.board.endpoints(color))
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// Take all events queued since the last drain. The solve event appears
    /// exactly once per solve edge no matter how often this is polled.
    pub fn drain_events(&mut self) -> Vec<FlowEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Path engine transitions ──────────────────────────────────────────

    /// Grab an endpoint and start drawing its color, discarding any prior
    /// in-progress path for that color.
    pub fn begin(&mut self, cell: Cell) -> AttemptResult {
        if self.solved {
            return AttemptResult::Rejected(RejectReason::Frozen);
        }
        let Some(color) = self.board.endpoint_color_at(cell) else {
            return AttemptResult::Rejected(RejectReason::NotAnEndpoint);
        };
        if self.is_complete(color) {
            return AttemptResult::Rejected(RejectReason::AlreadyComplete);
        }
        self.paths[color.0].restart(cell);
        self.active = Some(color);
        AttemptResult::Accepted
    }

    /// Apply one pointer position to the active path.
    ///
    /// Stepping onto the second-to-last cell retracts by one (the only
    /// undo). Reaching the color's other endpoint completes the path and
    /// queues a `Connected` event. Everything else either appends a free
    /// adjacent cell or is rejected.
    pub fn extend_to(&mut self, cell: Cell) -> AttemptResult {
        if self.solved {
            return AttemptResult::Rejected(RejectReason::Frozen);
        }
        let Some(color) = self.active else {
            return AttemptResult::Rejected(RejectReason::NotDrawing);
        };
        if self.is_complete(color) {
            return AttemptResult::Rejected(RejectReason::AlreadyComplete);
        }
        let path = &self.paths[color.0];
        let Some(last) = path.last() else {
            return AttemptResult::Rejected(RejectReason::NotDrawing);
        };

        if cell == last {
            return AttemptResult::Rejected(RejectReason::Duplicate);
        }

        if path.second_to_last() == Some(cell) {
            self.paths[color.0].retract();
            return AttemptResult::Accepted;
        }

        if !adjacent(cell, last) {
            return AttemptResult::Rejected(RejectReason::NotAdjacent);
        }
        if path.contains(cell) {
            return AttemptResult::Rejected(RejectReason::Revisit);
        }

        // Foreign endpoints always block; the editing color's own endpoint
        // is only reachable here as the terminal move (its start endpoint is
        // already in the path, caught by the revisit rule above).
        match self.board.endpoint_color_at(cell) {
            Some(c) if c == color => {
                self.paths[color.0].push(cell);
                self.events.push(FlowEvent::Connected(color));
                self.check_solved();
                return AttemptResult::Accepted;
            }
            Some(_) => return AttemptResult::Rejected(RejectReason::ForeignOccupied),
            None => {}
        }
        if self
            .paths
            .iter()
            .enumerate()
            .any(|(i, p)| i != color.0 && p.contains(cell))
        {
            return AttemptResult::Rejected(RejectReason::ForeignOccupied);
        }

        self.paths[color.0].push(cell);
        AttemptResult::Accepted
    }

    /// End the current input gesture. The in-progress path, complete or
    /// not, stays committed until the next `begin` for its color.
    pub fn release(&mut self) {
        self.active = None;
    }

    /// Replace the board with a fresh generation and clear all paths. The
    /// swap is a single synchronous call: no half-reset state is ever
    /// observable.
    pub fn regenerate(&mut self, config: &GeneratorConfig) {
        let grid = self.board.grid();
        *self = Session::with_board(generator::generate_until_valid(grid, config));
    }

    fn check_solved(&mut self) {
        if self.solved {
            return;
        }
        if self.board.colors().all(|c| self.is_complete(c)) {
            self.solved = true;
            self.active = None;
            self.events.push(FlowEvent::Solved);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::ColorRecord;

    fn cell(row: usize, col: usize) -> Cell {
        Cell::new(row, col)
    }

    /// 2x2 grid, one pair at opposite corners.
    fn two_by_two() -> Session {
        Session::with_board(Board::new(
            Grid::new(2, 2),
            vec![ColorRecord {
                endpoints: [cell(0, 0), cell(1, 1)],
                seed: vec![cell(0, 0), cell(0, 1), cell(1, 1)],
            }],
        ))
    }

    /// 3x3 grid, two pairs on the top and bottom rows.
    fn three_by_three() -> Session {
        Session::with_board(Board::new(
            Grid::new(3, 3),
            vec![
                ColorRecord {
                    endpoints: [cell(0, 0), cell(0, 2)],
                    seed: vec![cell(0, 0), cell(0, 1), cell(0, 2)],
                },
                ColorRecord {
                    endpoints: [cell(2, 0), cell(2, 2)],
                    seed: vec![cell(2, 0), cell(2, 1), cell(2, 2)],
                },
            ],
        ))
    }

    #[test]
    fn two_by_two_solve() {
        let mut s = two_by_two();
        assert!(s.begin(cell(0, 0)).is_accepted());
        assert!(s.extend_to(cell(0, 1)).is_accepted());
        assert!(s.extend_to(cell(1, 1)).is_accepted());
        assert_eq!(
            s.path(ColorId(0)).cells(),
            &[cell(0, 0), cell(0, 1), cell(1, 1)]
        );
        assert!(s.is_complete(ColorId(0)));
        assert!(s.is_solved());
        assert_eq!(
            s.drain_events(),
            vec![FlowEvent::Connected(ColorId(0)), FlowEvent::Solved]
        );
    }

    #[test]
    fn backtrack_retracts_one_step() {
        let mut s = three_by_three();
        s.begin(cell(0, 0));
        s.extend_to(cell(1, 0));
        s.extend_to(cell(1, 1));
        assert_eq!(
            s.extend_to(cell(1, 0)),
            AttemptResult::Accepted,
            "second-to-last cell retracts"
        );
        assert_eq!(s.path(ColorId(0)).cells(), &[cell(0, 0), cell(1, 0)]);
    }

    #[test]
    fn backtrack_restores_pre_extension_path() {
        let mut s = three_by_three();
        s.begin(cell(0, 0));
        s.extend_to(cell(1, 0));
        let before = s.path(ColorId(0)).clone();
        assert!(s.extend_to(cell(1, 1)).is_accepted());
        assert!(s.extend_to(cell(1, 0)).is_accepted());
        assert_eq!(s.path(ColorId(0)), &before);
    }

    #[test]
    fn non_adjacent_extension_is_a_no_op() {
        let mut s = three_by_three();
        s.begin(cell(0, 0));
        let result = s.extend_to(cell(1, 1));
        assert_eq!(result, AttemptResult::Rejected(RejectReason::NotAdjacent));
        assert_eq!(s.path(ColorId(0)).cells(), &[cell(0, 0)]);
    }

    #[test]
    fn duplicate_position_is_ignored() {
        let mut s = three_by_three();
        s.begin(cell(0, 0));
        s.extend_to(cell(1, 0));
        assert_eq!(
            s.extend_to(cell(1, 0)),
            AttemptResult::Rejected(RejectReason::Duplicate)
        );
        assert_eq!(s.path(ColorId(0)).cells(), &[cell(0, 0), cell(1, 0)]);
    }

    #[test]
    fn revisiting_own_path_is_rejected() {
        let mut s = three_by_three();
        s.begin(cell(0, 0));
        s.extend_to(cell(1, 0));
        s.extend_to(cell(1, 1));
        s.extend_to(cell(0, 1));
        // (0,0) is adjacent to (0,1) but already in the path.
        assert_eq!(
            s.extend_to(cell(0, 0)),
            AttemptResult::Rejected(RejectReason::Revisit)
        );
    }

    #[test]
    fn foreign_endpoint_blocks() {
        let mut s = three_by_three();
        s.begin(cell(0, 0));
        s.extend_to(cell(1, 0));
        assert_eq!(
            s.extend_to(cell(2, 0)),
            AttemptResult::Rejected(RejectReason::ForeignOccupied)
        );
    }

    #[test]
    fn foreign_path_cell_blocks() {
        let mut s = three_by_three();
        s.begin(cell(2, 0));
        s.extend_to(cell(1, 0));
        s.release();
        s.begin(cell(0, 0));
        assert_eq!(
            s.extend_to(cell(1, 0)),
            AttemptResult::Rejected(RejectReason::ForeignOccupied)
        );
        // The blocked color can still route elsewhere.
        assert!(s.extend_to(cell(0, 1)).is_accepted());
    }

    #[test]
    fn begin_requires_an_endpoint() {
        let mut s = three_by_three();
        assert_eq!(
            s.begin(cell(1, 1)),
            AttemptResult::Rejected(RejectReason::NotAnEndpoint)
        );
        assert_eq!(s.active_color(), None);
    }

    #[test]
    fn begin_overwrites_the_previous_attempt() {
        let mut s = three_by_three();
        s.begin(cell(0, 0));
        s.extend_to(cell(1, 0));
        s.release();
        s.begin(cell(0, 2));
        assert_eq!(s.path(ColorId(0)).cells(), &[cell(0, 2)]);
    }

    #[test]
    fn begin_on_a_complete_color_is_rejected() {
        let mut s = three_by_three();
        s.begin(cell(0, 0));
        s.extend_to(cell(0, 1));
        s.extend_to(cell(0, 2));
        s.release();
        assert!(s.is_complete(ColorId(0)));
        assert_eq!(
            s.begin(cell(0, 0)),
            AttemptResult::Rejected(RejectReason::AlreadyComplete)
        );
    }

    #[test]
    fn extend_without_begin_is_rejected() {
        let mut s = three_by_three();
        assert_eq!(
            s.extend_to(cell(1, 1)),
            AttemptResult::Rejected(RejectReason::NotDrawing)
        );
    }

    #[test]
    fn release_keeps_the_partial_path() {
        let mut s = three_by_three();
        s.begin(cell(0, 0));
        s.extend_to(cell(1, 0));
        s.release();
        assert_eq!(s.active_color(), None);
        assert_eq!(s.path(ColorId(0)).cells(), &[cell(0, 0), cell(1, 0)]);
    }

    #[test]
    fn solve_signal_is_edge_triggered() {
        let mut s = two_by_two();
        s.begin(cell(0, 0));
        s.extend_to(cell(0, 1));
        s.extend_to(cell(1, 1));
        let first = s.drain_events();
        assert!(first.contains(&FlowEvent::Solved));
        assert!(s.drain_events().is_empty());
        assert!(s.is_solved());
    }

    #[test]
    fn solved_session_freezes_input() {
        let mut s = two_by_two();
        s.begin(cell(0, 0));
        s.extend_to(cell(0, 1));
        s.extend_to(cell(1, 1));
        assert_eq!(
            s.begin(cell(0, 0)),
            AttemptResult::Rejected(RejectReason::Frozen)
        );
        assert_eq!(
            s.extend_to(cell(1, 0)),
            AttemptResult::Rejected(RejectReason::Frozen)
        );
        assert_eq!(
            s.path(ColorId(0)).cells(),
            &[cell(0, 0), cell(0, 1), cell(1, 1)]
        );
    }

    #[test]
    fn connecting_one_color_does_not_solve_the_board() {
        let mut s = three_by_three();
        s.begin(cell(0, 0));
        s.extend_to(cell(0, 1));
        s.extend_to(cell(0, 2));
        assert_eq!(s.drain_events(), vec![FlowEvent::Connected(ColorId(0))]);
        assert!(!s.is_solved());
    }

    #[test]
    fn solved_paths_never_share_a_cell() {
        let mut s = three_by_three();
        s.begin(cell(0, 0));
        s.extend_to(cell(0, 1));
        s.extend_to(cell(0, 2));
        s.release();
        s.begin(cell(2, 0));
        s.extend_to(cell(2, 1));
        s.extend_to(cell(2, 2));
        s.release();
        assert!(s.is_solved());

        let mut seen = std::collections::HashSet::new();
        for (_, path) in s.paths() {
            for c in path.cells() {
                assert!(seen.insert(*c), "cell {c:?} appears in two paths");
            }
        }
    }

    #[test]
    fn regenerate_resets_everything() {
        let mut s = two_by_two();
        s.begin(cell(0, 0));
        s.extend_to(cell(0, 1));
        s.extend_to(cell(1, 1));
        assert!(s.is_solved());

        s.regenerate(&GeneratorConfig::new(1));
        assert!(!s.is_solved());
        assert_eq!(s.active_color(), None);
        assert!(s.drain_events().is_empty());
        assert_eq!(s.grid(), Grid::new(2, 2));
        assert!(s.paths().all(|(_, p)| p.is_empty()));
    }
}
