//! Match-3 resolution engine: grid, match detection, gravity collapse and
//! the cascade state machine that ties them together.

pub mod config;
pub mod error;
pub mod game;

pub use config::GameConfig;
pub use error::{ConfigError, GameError, SwapError};
