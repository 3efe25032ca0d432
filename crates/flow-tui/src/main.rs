mod app;
mod ui;

use clap::Parser;

/// Flow-style connection puzzle in the terminal: drag colored endpoint
/// pairs together without crossing paths.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Options {
    /// Grid rows
    #[arg(long, default_value_t = 8, value_parser = clap::value_parser!(u16).range(1..=32))]
    pub rows: u16,

    /// Grid columns
    #[arg(long, default_value_t = 8, value_parser = clap::value_parser!(u16).range(1..=32))]
    pub cols: u16,

    /// Endpoint pairs per board (at most the palette size)
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u8).range(1..=10))]
    pub pairs: u8,

    /// Minimum seed-walk steps during generation
    #[arg(long, default_value_t = 4)]
    pub min_walk: usize,

    /// Maximum seed-walk steps during generation
    #[arg(long, default_value_t = 7)]
    pub max_walk: usize,

    /// Placement attempts before a board is discarded and retried
    #[arg(long, default_value_t = 1000)]
    pub max_attempts: u32,
}

fn main() {
    env_logger::init();
    let options = Options::parse();
    log::debug!("starting with {options:?}");
    if let Err(e) = app::run(&options) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
