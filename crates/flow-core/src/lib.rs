pub mod board;
pub mod generator;
pub mod grid;
pub mod path;
pub mod session;

pub use board::{Board, ColorId, ColorRecord};
pub use generator::{GenerationExhausted, GeneratorConfig, generate, generate_until_valid};
pub use grid::{Cell, Grid, GridGeometry, adjacent};
pub use path::{AttemptResult, Path, RejectReason};
pub use session::{FlowEvent, Session};
