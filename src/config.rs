use crate::error::ConfigError;
use crate::game::TileColor;

// ============================================================================
// Constants
// ============================================================================

pub const GRID_SIZE: usize = 8;

/// Shortest run that counts as a match. Not configurable.
pub const MIN_RUN: usize = 3;

pub const DEFAULT_PALETTE: [TileColor; 5] = [
    TileColor::RED,
    TileColor::GREEN,
    TileColor::BLUE,
    TileColor::YELLOW,
    TileColor::PURPLE,
];

/// Resamples the generator attempts before accepting whatever it drew.
pub const MAX_RESAMPLES: u32 = 50;

/// Clear/collapse cycles allowed in a single cascade.
pub const MAX_CASCADE_STEPS: u32 = 1000;

// ============================================================================
// Game Config
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub grid_size: usize,
    pub palette: Vec<TileColor>,
    pub max_resamples: u32,
    pub max_cascade_steps: u32,
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size < MIN_RUN {
            return Err(ConfigError::GridTooSmall {
                size: self.grid_size,
                min: MIN_RUN,
            });
        }
        // Two lookback constraints can exclude at most two colors.
        if self.palette.len() < 3 {
            return Err(ConfigError::PaletteTooSmall(self.palette.len()));
        }
        for (i, color) in self.palette.iter().enumerate() {
            if self.palette[..i].contains(color) {
                return Err(ConfigError::DuplicateColor(*color));
            }
        }
        if self.max_cascade_steps == 0 {
            return Err(ConfigError::ZeroCascadeCap);
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            palette: DEFAULT_PALETTE.to_vec(),
            max_resamples: MAX_RESAMPLES,
            max_cascade_steps: MAX_CASCADE_STEPS,
        }
    }
}
