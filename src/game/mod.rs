//! Game core: grid storage, match detection, gravity collapse, tile
//! generation and the cascade controller.

pub mod cascade;
pub mod collapse;
pub mod generator;
pub mod grid;
pub mod matcher;
pub mod swap;
pub mod test_helpers;

pub use cascade::{Game, GameEvent, Phase, Stats};
pub use collapse::{Collapse, TileMove, TileSpawn};
pub use generator::{ColorSource, RandomColors, SequenceColors, TileGenerator};
pub use grid::{Cell, Grid, Position, Tile, TileColor, TileId};
pub use matcher::{find_matches, MatchSet};
