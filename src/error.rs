//! Error taxonomy for the engine.

use crate::game::{Position, TileColor};
use thiserror::Error;

/// Why a requested swap was refused. Never fatal: the grid is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SwapError {
    #[error("position {pos} is outside the {size}x{size} grid")]
    OutOfBounds { pos: Position, size: usize },
    #[error("{0} and {1} are not adjacent")]
    NotAdjacent(Position, Position),
    #[error("no tile at {0}")]
    EmptyCell(Position),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("grid size {size} is smaller than the minimum run of {min}")]
    GridTooSmall { size: usize, min: usize },
    #[error("palette needs at least 3 colors, got {0}")]
    PaletteTooSmall(usize),
    #[error("palette lists {0} more than once")]
    DuplicateColor(TileColor),
    #[error("cascade step cap must be at least 1")]
    ZeroCascadeCap,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("invalid swap: {0}")]
    InvalidSwap(#[from] SwapError),
    #[error("a swap is already waiting to be resolved")]
    SwapPending,
    #[error("input is disabled while a cascade is running")]
    InputGated,
    #[error("match detection needs a full grid, {empty} cells are empty")]
    IncompleteGrid { empty: usize },
    #[error("cascade did not settle within {steps} steps")]
    CascadeRunaway { steps: u32 },
    #[error(transparent)]
    Config(#[from] ConfigError),
}
