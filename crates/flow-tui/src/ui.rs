use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Clear, Paragraph},
};

use flow_core::{Cell, ColorId, Grid, Session};

use crate::app::{App, CELL_HEIGHT, CELL_WIDTH};

// ── Constants ────────────────────────────────────────────────────────────────

/// Terminal rendering of the original ten-color palette (red, green, blue,
/// yellow, magenta, cyan, orange, purple, teal, olive).
const COLOR_LIST: [Color; 10] = [
    Color::Red,
    Color::Green,
    Color::Blue,
    Color::Yellow,
    Color::Magenta,
    Color::Cyan,
    Color::Rgb(255, 165, 0),
    Color::Rgb(128, 0, 128),
    Color::Rgb(0, 128, 128),
    Color::Rgb(128, 128, 0),
];

// ── Layout helpers (shared with the mouse mapping in app.rs) ─────────────────

/// The frame minus the bottom status line.
pub fn board_area(area: Rect) -> Rect {
    Rect {
        height: area.height.saturating_sub(1),
        ..area
    }
}

/// Top-left character of the grid, centered in `area`.
pub fn grid_origin(area: Rect, grid: Grid) -> (u16, u16) {
    let w = grid.cols as u16 * CELL_WIDTH;
    let h = grid.rows as u16 * CELL_HEIGHT;
    (
        area.x + area.width.saturating_sub(w) / 2,
        area.y + area.height.saturating_sub(h) / 2,
    )
}

pub fn color_for(color: ColorId) -> Color {
    COLOR_LIST[color.0 % COLOR_LIST.len()]
}

// ── Public entry point ───────────────────────────────────────────────────────

pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();
    let board = board_area(area);
    let grid = app.session.grid();

    let w = grid.cols as u16 * CELL_WIDTH;
    let h = grid.rows as u16 * CELL_HEIGHT;
    if board.width < w + 2 || board.height < h + 2 {
        let msg = Paragraph::new("Terminal too small for the board")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Red));
        f.render_widget(msg, area);
        return;
    }

    let (ox, oy) = grid_origin(board, grid);

    let frame_block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::White));
    f.render_widget(frame_block, Rect::new(ox - 1, oy - 1, w + 2, h + 2));

    draw_board(f, app, Rect::new(ox, oy, w, h));
    draw_status(f, app, area);

    if app.session.is_solved() {
        draw_solved_banner(f, board);
    }
}

// ── Board ────────────────────────────────────────────────────────────────────

fn draw_board(f: &mut Frame, app: &App, area: Rect) {
    let session = &app.session;
    let grid = session.grid();

    // The endpoint the active drag still has to reach, rendered ringed.
    let open_endpoint = session.active_color().and_then(|color| {
        let first = session.path(color).first()?;
        session.board().other_endpoint(color, first)
    });

    let mut lines: Vec<Line> = Vec::with_capacity(area.height as usize);
    for visual_row in 0..grid.rows * CELL_HEIGHT as usize {
        let grid_row = visual_row / CELL_HEIGHT as usize;
        let sub_row = visual_row % CELL_HEIGHT as usize;
        let mut spans: Vec<Span> = Vec::new();
        for grid_col in 0..grid.cols {
            let cell = Cell::new(grid_row, grid_col);
            render_cell(&mut spans, session, cell, sub_row, open_endpoint);
        }
        lines.push(Line::from(spans));
    }

    f.render_widget(Paragraph::new(lines), area);
}

/// Append the spans for one cell on one of its text rows. The dot markers
/// sit on the cell's center row and center column.
fn render_cell(
    spans: &mut Vec<Span<'static>>,
    session: &Session,
    cell: Cell,
    sub_row: usize,
    open_endpoint: Option<Cell>,
) {
    let path_color = session
        .paths()
        .find(|(_, p)| p.contains(cell))
        .map(|(color, _)| color);
    let endpoint_color = session.board().endpoint_color_at(cell);
    let center_row = sub_row == CELL_HEIGHT as usize / 2;

    let left = CELL_WIDTH as usize / 2;
    let right = CELL_WIDTH as usize - left - 1;

    match (path_color, endpoint_color) {
        (Some(color), endpoint) => {
            let fill = Style::default().fg(color_for(color));
            if center_row && endpoint.is_some() {
                let dot = Style::default().fg(Color::Black).bg(color_for(color));
                spans.push(Span::styled("█".repeat(left), fill));
                spans.push(Span::styled("●", dot));
                spans.push(Span::styled("█".repeat(right), fill));
            } else {
                spans.push(Span::styled("█".repeat(CELL_WIDTH as usize), fill));
            }
        }
        (None, Some(color)) if center_row => {
            let mut dot = Style::default()
                .fg(color_for(color))
                .add_modifier(Modifier::BOLD);
            if open_endpoint == Some(cell) {
                dot = dot.bg(Color::White);
            }
            spans.push(Span::raw(" ".repeat(left)));
            spans.push(Span::styled("●", dot));
            spans.push(Span::raw(" ".repeat(right)));
        }
        (None, _) if center_row => {
            spans.push(Span::raw(" ".repeat(left)));
            spans.push(Span::styled("·", Style::default().fg(Color::DarkGray)));
            spans.push(Span::raw(" ".repeat(right)));
        }
        (None, _) => spans.push(Span::raw(" ".repeat(CELL_WIDTH as usize))),
    }
}

// ── Status line and solved banner ────────────────────────────────────────────

fn draw_status(f: &mut Frame, app: &App, area: Rect) {
    let session = &app.session;
    let connected = session
        .board()
        .colors()
        .filter(|&c| session.is_complete(c))
        .count();
    let total = session.board().num_colors();

    let line = Line::from(vec![
        Span::styled(
            format!(" {connected}/{total} connected "),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("· {} boards solved ", app.boards_solved),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(
            "· drag dots to connect · q quits",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    f.render_widget(
        Paragraph::new(line),
        Rect::new(area.x, area.bottom() - 1, area.width, 1),
    );
}

fn draw_solved_banner(f: &mut Frame, area: Rect) {
    let rect = center_rect(20, 3, area);
    f.render_widget(Clear, rect);
    let banner = Paragraph::new(Line::from(Span::styled(
        "Solved!",
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(
        Block::bordered()
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(Color::Green)),
    );
    f.render_widget(banner, rect);
}

fn center_rect(width: u16, height: u16, area: Rect) -> Rect {
    Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + area.height.saturating_sub(height) / 2,
        width.min(area.width),
        height.min(area.height),
    )
}
