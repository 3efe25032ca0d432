use std::io::{self, Write};
use std::time::Duration;

use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use futures_util::StreamExt;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;

use flow_core::{Cell, FlowEvent, GeneratorConfig, Grid, GridGeometry, Session};

use crate::Options;
use crate::ui;

/// Terminal columns per grid cell. Two text rows per cell keeps cells
/// roughly square in common fonts.
pub const CELL_WIDTH: u16 = 4;
pub const CELL_HEIGHT: u16 = 2;
/// Horizontal stretch of terminal characters relative to the square pixel
/// space the core geometry works in.
pub const CELL_ASPECT: u16 = CELL_WIDTH / CELL_HEIGHT;

/// Freeze time between solving a board and dealing the next one.
const SOLVE_PAUSE: Duration = Duration::from_millis(600);

pub struct App {
    pub session: Session,
    pub config: GeneratorConfig,
    pub geometry: GridGeometry,
    pub boards_solved: u32,
}

pub fn run(options: &Options) -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async_run(options))
}

async fn async_run(options: &Options) -> Result<(), Box<dyn std::error::Error>> {
    if options.min_walk == 0 || options.min_walk > options.max_walk {
        return Err("walk length range is empty".into());
    }

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, options).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    options: &Options,
) -> Result<(), Box<dyn std::error::Error>> {
    let grid = Grid::new(usize::from(options.rows), usize::from(options.cols));
    let config = GeneratorConfig {
        num_pairs: options.pairs as usize,
        min_walk: options.min_walk,
        max_walk: options.max_walk,
        max_attempts: options.max_attempts,
    };
    let mut app = App {
        session: Session::generate(grid, &config),
        config,
        geometry: GridGeometry::new(grid, grid.cols as u32 * u32::from(CELL_WIDTH)),
        boards_solved: 0,
    };

    let mut event_stream = EventStream::new();
    let tick_rate = Duration::from_millis(16);

    loop {
        terminal.draw(|f| ui::draw(f, &app))?;

        tokio::select! {
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) => {
                        if key.kind == KeyEventKind::Press && is_quit(key) {
                            return Ok(());
                        }
                    }
                    Some(Ok(Event::Mouse(mouse))) => {
                        let size = terminal.size()?;
                        let area = Rect::new(0, 0, size.width, size.height);
                        handle_mouse(&mut app, area, mouse);
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => return Ok(()),
                }
            }
            _ = tokio::time::sleep(tick_rate) => {}
        }

        for event in app.session.drain_events() {
            match event {
                FlowEvent::Connected(_) => bell(),
                FlowEvent::Solved => {
                    app.boards_solved += 1;
                    bell();
                    // Show the finished board during the freeze, then deal
                    // the next one.
                    terminal.draw(|f| ui::draw(f, &app))?;
                    tokio::time::sleep(SOLVE_PAUSE).await;
                    app.session.regenerate(&app.config);
                }
            }
        }
    }
}

fn is_quit(key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

fn handle_mouse(app: &mut App, area: Rect, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(cell) = cell_at(app, area, mouse.column, mouse.row) {
                let _ = app.session.begin(cell);
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            // Off-grid positions map to no cell and are dropped, same as
            // any other illegal move.
            if let Some(cell) = cell_at(app, area, mouse.column, mouse.row) {
                let _ = app.session.extend_to(cell);
            }
        }
        MouseEventKind::Up(MouseButton::Left) => app.session.release(),
        _ => {}
    }
}

/// Map a terminal mouse position to a grid cell. Terminal cells span
/// `CELL_WIDTH` x `CELL_HEIGHT` characters, so rows are stretched by the
/// aspect factor before the square-cell pixel mapping applies.
fn cell_at(app: &App, area: Rect, column: u16, row: u16) -> Option<Cell> {
    let (ox, oy) = ui::grid_origin(ui::board_area(area), app.session.grid());
    let dx = i32::from(column) - i32::from(ox);
    let dy = i32::from(row) - i32::from(oy);
    app.geometry.cell_from_point(dx, dy * i32::from(CELL_ASPECT))
}

/// Terminal bell as the stand-in audio cue. Failure to beep is ignored;
/// audio must never affect puzzle state.
fn bell() {
    let mut stdout = io::stdout();
    let _ = stdout.write_all(b"\x07");
    let _ = stdout.flush();
}
