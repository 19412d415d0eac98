use crate::config::GameConfig;
use crate::error::GameError;
use crate::game::collapse::{self, TileMove, TileSpawn};
use crate::game::generator::{ColorSource, RandomColors, TileGenerator};
use crate::game::grid::{Grid, Position, Tile};
use crate::game::matcher::{self, MatchSet};
use crate::game::swap;

// ============================================================================
// Types
// ============================================================================

/// Where the controller is in its cycle. Input is accepted only in `Idle`;
/// the gate is closed for `Clearing` and `Collapsing`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Phase {
    Idle,
    AwaitingSwapResolution { a: Position, b: Position },
    Clearing { matches: MatchSet },
    Collapsing,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum GameEvent {
    TileSpawned(TileSpawn),
    TileMoved(TileMove),
    TileCleared { at: Position, tile: Tile },
    MatchesCleared { positions: Vec<Position>, chain: u32 },
    SwapApplied { a: Position, b: Position },
    SwapRejected { a: Position, b: Position },
    InputGateChanged(bool),
    CascadeSettled { chains: u32 },
    CascadeAborted { steps: u32 },
}

#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct Stats {
    pub swaps_accepted: u32,
    pub swaps_rejected: u32,
    pub tiles_cleared: u32,
    pub longest_chain: u32,
}

// ============================================================================
// Game
// ============================================================================

pub struct Game {
    grid: Grid,
    phase: Phase,
    generator: TileGenerator,
    config: GameConfig,
    chain: u32,
    stats: Stats,
    events: Vec<GameEvent>,
}

impl Game {
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        Self::with_source(config, Box::new(RandomColors::new()))
    }

    pub fn seeded(config: GameConfig, seed: u64) -> Result<Self, GameError> {
        Self::with_source(config, Box::new(RandomColors::seeded(seed)))
    }

    /// Fills a fresh grid row by row and settles it before the first swap.
    pub fn with_source(config: GameConfig, source: Box<dyn ColorSource>) -> Result<Self, GameError> {
        config.validate()?;
        let size = config.grid_size;
        let generator = TileGenerator::new(source, config.palette.clone(), config.max_resamples);
        let mut game = Self {
            grid: Grid::new(size),
            phase: Phase::Idle,
            generator,
            config,
            chain: 0,
            stats: Stats::default(),
            events: Vec::new(),
        };

        for row in 0..size {
            for col in 0..size {
                let at = Position::new(row, col);
                let tile = game.generator.generate(&game.grid, at);
                game.grid.set(at, tile);
                game.events.push(GameEvent::TileSpawned(TileSpawn {
                    id: tile.id,
                    at,
                    color: tile.color,
                    fall_from: row as isize - size as isize,
                    distance: size,
                }));
            }
        }

        if game.begin_cascade()? {
            log::debug!("initial fill contained matches, settling");
            game.resolve()?;
        }
        game.stats = Stats::default();
        Ok(game)
    }

    /// Starts from a prepared full grid. Existing matches are left in place
    /// until `begin_cascade` is called.
    pub fn with_grid(
        mut config: GameConfig,
        grid: Grid,
        source: Box<dyn ColorSource>,
    ) -> Result<Self, GameError> {
        config.grid_size = grid.size();
        config.validate()?;
        let empty = grid.empty_count();
        if empty > 0 {
            return Err(GameError::IncompleteGrid { empty });
        }

        let mut generator = TileGenerator::new(source, config.palette.clone(), config.max_resamples);
        let next_id = grid
            .rows()
            .iter()
            .flatten()
            .filter_map(|cell| cell.tile().map(|tile| tile.id.0 + 1))
            .max()
            .unwrap_or(0);
        generator.reserve_ids(next_id);

        Ok(Self {
            grid,
            phase: Phase::Idle,
            generator,
            config,
            chain: 0,
            stats: Stats::default(),
            events: Vec::new(),
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Clears completed in the running cascade, zero when idle.
    pub fn chain(&self) -> u32 {
        self.chain
    }

    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    pub fn input_enabled(&self) -> bool {
        !matches!(self.phase, Phase::Clearing { .. } | Phase::Collapsing)
    }

    /// Takes and clears all pending events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Applies a swap and waits for `step` to decide whether it stands.
    /// Illegal swaps leave the grid untouched and queue `SwapRejected`.
    pub fn request_swap(&mut self, a: Position, b: Position) -> Result<(), GameError> {
        self.ensure_idle()?;
        if let Err(err) = swap::apply(&mut self.grid, a, b) {
            log::warn!("rejected swap {} <-> {}: {}", a, b, err);
            self.stats.swaps_rejected += 1;
            self.events.push(GameEvent::SwapRejected { a, b });
            return Err(err.into());
        }

        log::debug!("swapped {} <-> {}", a, b);
        self.events.push(GameEvent::SwapApplied { a, b });
        self.phase = Phase::AwaitingSwapResolution { a, b };
        Ok(())
    }

    /// Starts a cascade if the idle grid already holds matches.
    pub fn begin_cascade(&mut self) -> Result<bool, GameError> {
        self.ensure_idle()?;
        let matches = self.detect(false)?;
        if matches.is_empty() {
            return Ok(false);
        }
        self.start_cascade(matches);
        Ok(true)
    }

    /// Hook for the presentation layer once it has caught up with the last
    /// batch of events.
    pub fn notify_visual_settled(&mut self) -> Result<(), GameError> {
        self.step()
    }

    /// Advances the state machine by one transition. A no-op when idle.
    pub fn step(&mut self) -> Result<(), GameError> {
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Idle => {}
            Phase::AwaitingSwapResolution { a, b } => {
                let matches = self.detect(false)?;
                if matches.is_empty() {
                    self.grid.swap(a, b);
                    log::debug!("swap {} <-> {} made no match, reverted", a, b);
                    self.stats.swaps_rejected += 1;
                    self.events.push(GameEvent::SwapRejected { a, b });
                } else {
                    self.stats.swaps_accepted += 1;
                    self.start_cascade(matches);
                }
            }
            Phase::Clearing { matches } => {
                self.clear_matches(matches);
                self.phase = Phase::Collapsing;
            }
            Phase::Collapsing => {
                let result = collapse::collapse(&mut self.grid, &mut self.generator);
                self.events
                    .extend(result.moves.into_iter().map(GameEvent::TileMoved));
                self.events
                    .extend(result.spawns.into_iter().map(GameEvent::TileSpawned));

                let matches = self.detect(true)?;
                if matches.is_empty() {
                    log::info!("cascade settled after {} chain(s)", self.chain);
                    self.events.push(GameEvent::CascadeSettled { chains: self.chain });
                    self.finish_cascade();
                } else if self.chain >= self.config.max_cascade_steps {
                    let steps = self.chain;
                    log::error!("cascade still matching after {} steps, aborting", steps);
                    self.events.push(GameEvent::CascadeAborted { steps });
                    self.finish_cascade();
                    return Err(GameError::CascadeRunaway { steps });
                } else {
                    self.phase = Phase::Clearing { matches };
                }
            }
        }
        Ok(())
    }

    /// Steps until idle, returning the number of steps taken.
    pub fn resolve(&mut self) -> Result<u32, GameError> {
        let mut steps = 0;
        while !self.is_idle() {
            self.step()?;
            steps += 1;
        }
        Ok(steps)
    }

    fn ensure_idle(&self) -> Result<(), GameError> {
        match self.phase {
            Phase::Idle => Ok(()),
            Phase::AwaitingSwapResolution { .. } => Err(GameError::SwapPending),
            Phase::Clearing { .. } | Phase::Collapsing => Err(GameError::InputGated),
        }
    }

    /// Runs the detector. On a broken precondition the controller drops back
    /// to idle, reopening the gate if a cascade held it.
    fn detect(&mut self, gated: bool) -> Result<MatchSet, GameError> {
        matcher::find_matches(&self.grid).map_err(|err| {
            log::error!("match detection out of sequence: {}", err);
            if gated {
                self.finish_cascade();
            }
            self.phase = Phase::Idle;
            err
        })
    }

    fn start_cascade(&mut self, matches: MatchSet) {
        self.chain = 0;
        self.events.push(GameEvent::InputGateChanged(false));
        self.phase = Phase::Clearing { matches };
    }

    fn finish_cascade(&mut self) {
        self.chain = 0;
        self.phase = Phase::Idle;
        self.events.push(GameEvent::InputGateChanged(true));
    }

    fn clear_matches(&mut self, matches: MatchSet) {
        self.chain += 1;
        for &at in &matches {
            if let Some(tile) = self.grid.clear(at) {
                self.events.push(GameEvent::TileCleared { at, tile });
            }
        }
        self.stats.tiles_cleared += matches.len() as u32;
        self.stats.longest_chain = self.stats.longest_chain.max(self.chain);
        log::debug!("chain {}: cleared {} tile(s)", self.chain, matches.len());
        self.events.push(GameEvent::MatchesCleared {
            positions: matches.into_iter().collect(),
            chain: self.chain,
        });
    }
}
