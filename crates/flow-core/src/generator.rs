use std::collections::HashSet;
use std::fmt;

use rand::RngExt;
use rand::rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::board::{Board, ColorRecord};
use crate::grid::{Cell, Grid};

/// The four axis directions a seed walk may step in.
const DIRECTIONS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Parameters for one board generation. `min_walk`/`max_walk` bound the
/// number of steps requested per seed walk (the walk may still end early at
/// a dead end); `max_attempts` is the shared placement-retry ceiling across
/// all colors of one attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub num_pairs: usize,
    pub min_walk: usize,
    pub max_walk: usize,
    pub max_attempts: u32,
}

impl GeneratorConfig {
    pub fn new(num_pairs: usize) -> Self {
        Self {
            num_pairs,
            min_walk: 4,
            max_walk: 7,
            max_attempts: 1000,
        }
    }
}

/// Board construction ran out of placement attempts: the requested pairs do
/// not fit, or the walks kept trapping themselves. Never a partial board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenerationExhausted {
    pub attempts: u32,
}

impl fmt::Display for GenerationExhausted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to place all paths after {} attempts - board too crowded",
            self.attempts
        )
    }
}

impl std::error::Error for GenerationExhausted {}

/// Self-avoiding random walk of up to `steps` steps from `start`, staying
/// in bounds and off globally used cells. Ends early at a dead end.
fn random_walk<R: RngExt>(
    grid: Grid,
    start: Cell,
    steps: usize,
    used: &HashSet<Cell>,
    rng: &mut R,
) -> Vec<Cell> {
    let mut walk = vec![start];
    let mut current = start;
    let mut dirs = DIRECTIONS;
    for _ in 0..steps {
        dirs.shuffle(rng);
        let mut moved = false;
        for (dr, dc) in dirs {
            if let Some(next) = grid.step(current, dr, dc) {
                if !used.contains(&next) && !walk.contains(&next) {
                    walk.push(next);
                    current = next;
                    moved = true;
                    break;
                }
            }
        }
        if !moved {
            break;
        }
    }
    walk
}

/// One bounded generation attempt with the thread-local RNG.
pub fn generate(grid: Grid, config: &GeneratorConfig) -> Result<Board, GenerationExhausted> {
    generate_with(grid, config, &mut rng())
}

/// One bounded generation attempt.
///
/// Colors are placed in palette order. Each color retries random starts and
/// walks until an acceptable walk is found; every rejection burns one shared
/// attempt, and crossing `max_attempts` aborts the whole attempt.
pub fn generate_with<R: RngExt>(
    grid: Grid,
    config: &GeneratorConfig,
    rng: &mut R,
) -> Result<Board, GenerationExhausted> {
    // A zero-area grid cannot place anything; fail the attempt instead of
    // sampling an empty range.
    if grid.rows == 0 || grid.cols == 0 {
        return Err(GenerationExhausted { attempts: 0 });
    }

    let mut used: HashSet<Cell> = HashSet::new();
    let mut records = Vec::with_capacity(config.num_pairs);
    let mut attempts = 0u32;

    for pair in 0..config.num_pairs {
        let walk = loop {
            if attempts > config.max_attempts {
                log::debug!(
                    "generation exhausted after {attempts} attempts ({pair}/{} pairs placed)",
                    config.num_pairs
                );
                return Err(GenerationExhausted { attempts });
            }
            let start = Cell::new(
                rng.random_range(0..grid.rows),
                rng.random_range(0..grid.cols),
            );
            if used.contains(&start) {
                attempts += 1;
                continue;
            }
            let steps = rng.random_range(config.min_walk..=config.max_walk);
            let walk = random_walk(grid, start, steps, &used, rng);
            // Too short, or (defensively re-checked) colliding with a
            // previously placed color.
            if walk.len() < 3 || walk.iter().any(|c| used.contains(c)) {
                attempts += 1;
                continue;
            }
            break walk;
        };

        used.extend(walk.iter().copied());
        records.push(ColorRecord {
            endpoints: [walk[0], walk[walk.len() - 1]],
            seed: walk,
        });
    }

    Ok(Board::new(grid, records))
}

/// Retry `generate` until a board is produced.
///
/// Each failed attempt is discarded whole and generation restarts from an
/// empty grid. Expected to succeed quickly for pair counts small relative
/// to the grid area; a config that cannot fit loops forever, so callers
/// pick feasible parameters.
pub fn generate_until_valid(grid: Grid, config: &GeneratorConfig) -> Board {
    let mut rng = rng();
    loop {
        match generate_with(grid, config, &mut rng) {
            Ok(board) => return board,
            Err(e) => log::debug!("discarding board attempt: {e}"),
        }
    }
}
