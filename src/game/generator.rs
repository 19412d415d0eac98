use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game::grid::{Grid, Position, Tile, TileColor, TileId};

// ============================================================================
// Color Source Trait
// ============================================================================

pub trait ColorSource {
    fn next_color(&mut self, palette: &[TileColor]) -> TileColor;
}

/// Uniform draws from the palette.
pub struct RandomColors {
    rng: StdRng,
}

impl RandomColors {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomColors {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorSource for RandomColors {
    fn next_color(&mut self, palette: &[TileColor]) -> TileColor {
        palette[self.rng.gen_range(0..palette.len())]
    }
}

/// Cycles through a fixed list, ignoring the palette.
pub struct SequenceColors {
    colors: Vec<TileColor>,
    index: usize,
}

impl SequenceColors {
    pub fn new(colors: Vec<TileColor>) -> Self {
        Self { colors, index: 0 }
    }
}

impl ColorSource for SequenceColors {
    fn next_color(&mut self, _palette: &[TileColor]) -> TileColor {
        let color = self.colors[self.index % self.colors.len()];
        self.index += 1;
        color
    }
}

// ============================================================================
// Tile Generator
// ============================================================================

/// Creates tiles whose color differs from the cells two to the left and two
/// above at the time of creation. Only that lookback is checked; a new tile can
/// still complete a run with its direct neighbours.
pub struct TileGenerator {
    source: Box<dyn ColorSource>,
    palette: Vec<TileColor>,
    max_resamples: u32,
    next_id: u64,
    exhausted: u64,
}

impl TileGenerator {
    pub fn new(source: Box<dyn ColorSource>, palette: Vec<TileColor>, max_resamples: u32) -> Self {
        Self {
            source,
            palette,
            max_resamples,
            next_id: 0,
            exhausted: 0,
        }
    }

    pub fn palette(&self) -> &[TileColor] {
        &self.palette
    }

    /// Times the resample cap was hit and a constrained color was accepted.
    pub fn exhausted(&self) -> u64 {
        self.exhausted
    }

    /// Reserves ids below `next` for tiles built outside the generator.
    pub fn reserve_ids(&mut self, next: u64) {
        self.next_id = self.next_id.max(next);
    }

    pub fn generate(&mut self, grid: &Grid, pos: Position) -> Tile {
        let left = pos
            .col
            .checked_sub(2)
            .and_then(|col| grid.color(Position::new(pos.row, col)));
        let above = pos
            .row
            .checked_sub(2)
            .and_then(|row| grid.color(Position::new(row, pos.col)));

        let mut color = self.source.next_color(&self.palette);
        let mut resamples = 0;
        while Some(color) == left || Some(color) == above {
            if resamples == self.max_resamples {
                self.exhausted += 1;
                log::warn!(
                    "generator gave up after {} resamples at {}, accepting {}",
                    resamples,
                    pos,
                    color
                );
                break;
            }
            color = self.source.next_color(&self.palette);
            resamples += 1;
        }

        let id = TileId(self.next_id);
        self.next_id += 1;
        Tile { id, color }
    }
}
