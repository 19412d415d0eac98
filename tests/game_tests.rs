//! Tests for the match-3 engine
//!
//! Test categories:
//! - Swap validation and reversal
//! - Cascade sequencing and input gating
//! - Collapse conservation
//! - Tile generation constraints
//! - Runaway protection
//! - Randomised play keeps the settled invariant

use match3::game::{
    find_matches, swap, test_helpers::*, Game, GameEvent, Grid, Phase, Position, RandomColors,
    SequenceColors, TileColor, TileGenerator, TileId,
};
use match3::{GameConfig, GameError, SwapError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ============================================================================
// Fixtures
// ============================================================================

/// Stable grid with a lone horizontal triple at row 3, cols 2..=4.
fn triple_grid() -> Grid {
    let mut pattern = stable_pattern(8);
    pattern[3][3] = 2;
    pattern[3][4] = 2;
    grid_from_indices(&pattern)
}

/// Stable grid where swapping (2, 4) with (3, 4) forms row 3, cols 2..=4.
fn swap_ready_grid() -> Grid {
    let mut pattern = stable_pattern(8);
    pattern[3][3] = 2;
    pattern[2][4] = 2;
    grid_from_indices(&pattern)
}

/// Refill colors that leave the triple fixtures stable after one clear.
fn quiet_refill() -> Box<SequenceColors> {
    Box::new(SequenceColors::new(vec![color(1), color(3), color(4)]))
}

fn gate_events(events: &[GameEvent]) -> Vec<bool> {
    events
        .iter()
        .filter_map(|event| match event {
            GameEvent::InputGateChanged(open) => Some(*open),
            _ => None,
        })
        .collect()
}

fn assert_settled(game: &Game) {
    assert!(game.is_idle());
    assert!(game.input_enabled());
    assert!(game.grid().is_full());
    assert!(find_matches(game.grid()).unwrap().is_empty());
}

// ============================================================================
// Swap Validation Tests
// ============================================================================

mod swap_validation {
    use super::*;

    #[test]
    fn swap_is_its_own_inverse() {
        let original = grid_from_indices(&stable_pattern(8));
        for row in 0..8 {
            for col in 0..8 {
                let a = Position::new(row, col);
                for b in [Position::new(row + 1, col), Position::new(row, col + 1)] {
                    if !b.in_bounds(8) {
                        continue;
                    }
                    let mut grid = original.clone();
                    swap::apply(&mut grid, a, b).unwrap();
                    assert_ne!(grid, original);
                    swap::apply(&mut grid, a, b).unwrap();
                    assert_eq!(grid, original);
                }
            }
        }
    }

    #[test]
    fn swap_moves_tile_identities() {
        let mut grid = grid_from_indices(&stable_pattern(8));
        let a = Position::new(4, 4);
        let b = Position::new(4, 5);
        let (id_a, id_b) = (grid.get(a).unwrap().id, grid.get(b).unwrap().id);

        swap::apply(&mut grid, a, b).unwrap();

        assert_eq!(grid.get(a).unwrap().id, id_b);
        assert_eq!(grid.get(b).unwrap().id, id_a);
    }

    #[test]
    fn diagonal_swap_is_rejected() {
        let mut grid = grid_from_indices(&stable_pattern(8));
        let before = grid.clone();
        let (a, b) = (Position::new(1, 1), Position::new(2, 2));

        assert_eq!(swap::apply(&mut grid, a, b), Err(SwapError::NotAdjacent(a, b)));
        assert_eq!(grid, before);
    }

    #[test]
    fn out_of_bounds_swap_is_rejected() {
        let grid = grid_from_indices(&stable_pattern(8));
        let (a, b) = (Position::new(7, 7), Position::new(7, 8));

        assert_eq!(
            swap::validate(&grid, a, b),
            Err(SwapError::OutOfBounds { pos: b, size: 8 })
        );
    }

    #[test]
    fn swap_into_empty_cell_is_rejected() {
        let mut grid = grid_from_indices(&stable_pattern(8));
        grid.clear(Position::new(0, 1));
        let before = grid.clone();

        let result = swap::apply(&mut grid, Position::new(0, 0), Position::new(0, 1));

        assert_eq!(result, Err(SwapError::EmptyCell(Position::new(0, 1))));
        assert_eq!(grid, before);
    }
}

// ============================================================================
// Swap Request Tests
// ============================================================================

mod swap_requests {
    use super::*;

    #[test]
    fn non_adjacent_request_never_touches_grid_or_gate() {
        let mut game = Game::with_grid(GameConfig::default(), swap_ready_grid(), quiet_refill()).unwrap();
        let before = game.grid().clone();
        let (a, b) = (Position::new(0, 0), Position::new(5, 5));

        let result = game.request_swap(a, b);

        assert_eq!(
            result,
            Err(GameError::InvalidSwap(SwapError::NotAdjacent(a, b)))
        );
        assert_eq!(game.grid(), &before);
        assert!(game.input_enabled());
        let events = game.take_events();
        assert_eq!(events, vec![GameEvent::SwapRejected { a, b }]);
        assert!(gate_events(&events).is_empty());
        assert_eq!(game.stats().swaps_rejected, 1);
    }

    #[test]
    fn swap_without_match_is_reverted() {
        let mut game = Game::with_grid(GameConfig::default(), swap_ready_grid(), quiet_refill()).unwrap();
        let before = game.grid().clone();
        let (a, b) = (Position::new(0, 0), Position::new(0, 1));

        game.request_swap(a, b).unwrap();
        assert_eq!(game.phase(), &Phase::AwaitingSwapResolution { a, b });
        assert_ne!(game.grid(), &before);

        game.step().unwrap();

        assert_eq!(game.grid(), &before);
        assert!(game.is_idle());
        let events = game.take_events();
        assert_eq!(
            events,
            vec![GameEvent::SwapApplied { a, b }, GameEvent::SwapRejected { a, b }]
        );
        assert!(gate_events(&events).is_empty());
    }

    #[test]
    fn second_request_while_pending_is_refused() {
        let mut game = Game::with_grid(GameConfig::default(), swap_ready_grid(), quiet_refill()).unwrap();
        game.request_swap(Position::new(2, 4), Position::new(3, 4)).unwrap();

        let result = game.request_swap(Position::new(0, 0), Position::new(0, 1));

        assert_eq!(result, Err(GameError::SwapPending));
    }

    #[test]
    fn requests_are_gated_during_cascade() {
        let mut game = Game::with_grid(GameConfig::default(), swap_ready_grid(), quiet_refill()).unwrap();
        game.request_swap(Position::new(2, 4), Position::new(3, 4)).unwrap();
        game.step().unwrap();
        assert!(matches!(game.phase(), Phase::Clearing { .. }));
        assert!(!game.input_enabled());
        let before = game.grid().clone();

        let result = game.request_swap(Position::new(0, 0), Position::new(0, 1));

        assert_eq!(result, Err(GameError::InputGated));
        assert_eq!(game.grid(), &before);

        game.step().unwrap();
        assert_eq!(game.phase(), &Phase::Collapsing);
        assert_eq!(
            game.request_swap(Position::new(0, 0), Position::new(0, 1)),
            Err(GameError::InputGated)
        );
    }
}

// ============================================================================
// Cascade Tests
// ============================================================================

mod cascade {
    use super::*;

    #[test]
    fn matching_swap_runs_full_cycle() {
        let mut game = Game::with_grid(GameConfig::default(), swap_ready_grid(), quiet_refill()).unwrap();
        let (a, b) = (Position::new(2, 4), Position::new(3, 4));

        game.request_swap(a, b).unwrap();
        let steps = game.resolve().unwrap();

        assert_eq!(steps, 3);
        assert_settled(&game);
        let events = game.take_events();
        assert_eq!(events[0], GameEvent::SwapApplied { a, b });
        assert_eq!(gate_events(&events), vec![false, true]);
        assert!(events.contains(&GameEvent::MatchesCleared {
            positions: vec![Position::new(3, 2), Position::new(3, 3), Position::new(3, 4)],
            chain: 1,
        }));
        assert_eq!(
            events.last(),
            Some(&GameEvent::InputGateChanged(true))
        );
        assert!(events.contains(&GameEvent::CascadeSettled { chains: 1 }));

        let stats = game.stats();
        assert_eq!(stats.swaps_accepted, 1);
        assert_eq!(stats.tiles_cleared, 3);
        assert_eq!(stats.longest_chain, 1);
    }

    #[test]
    fn seeded_triple_clears_and_refills() {
        let grid = triple_grid();
        let before: Vec<Vec<TileId>> = (0..8).map(|col| grid.column_ids(col)).collect();
        let mut game = Game::with_grid(GameConfig::default(), grid, quiet_refill()).unwrap();

        assert!(game.begin_cascade().unwrap());
        assert!(!game.input_enabled());

        // Clearing
        game.step().unwrap();
        for col in 2..5 {
            assert!(game.grid().get(Position::new(3, col)).is_none());
        }
        assert_eq!(game.grid().empty_count(), 3);

        // Collapsing
        game.step().unwrap();
        assert_eq!(column_counts(game.grid()), vec![8; 8]);
        for col in 2..5 {
            let after = game.grid().column_ids(col);
            assert_eq!(after[1..4], before[col][0..3]);
            assert_eq!(after[4..], before[col][4..]);
        }
        let refilled: Vec<Option<TileColor>> = (2..5)
            .map(|col| game.grid().color(Position::new(0, col)))
            .collect();
        assert_eq!(refilled, vec![Some(color(1)), Some(color(3)), Some(color(4))]);

        assert_settled(&game);
        let moves = game
            .take_events()
            .into_iter()
            .filter(|event| matches!(event, GameEvent::TileMoved(_)))
            .count();
        assert_eq!(moves, 9);
    }

    #[test]
    fn seeded_triple_settles_with_random_refill() {
        for seed in 0..20 {
            let mut game = Game::with_grid(
                GameConfig::default(),
                triple_grid(),
                Box::new(RandomColors::seeded(seed)),
            )
            .unwrap();

            assert!(game.begin_cascade().unwrap());
            game.resolve().unwrap();

            assert_settled(&game);
            assert!(game.stats().longest_chain <= 10);
            assert!(game.stats().tiles_cleared >= 3);
        }
    }

    #[test]
    fn begin_cascade_on_stable_grid_is_noop() {
        let mut game = Game::with_grid(
            GameConfig::default(),
            grid_from_indices(&stable_pattern(8)),
            quiet_refill(),
        )
        .unwrap();

        assert!(!game.begin_cascade().unwrap());
        assert!(game.is_idle());
        assert!(game.take_events().is_empty());
    }

    #[test]
    fn step_while_idle_does_nothing() {
        let mut game = Game::with_grid(GameConfig::default(), triple_grid(), quiet_refill()).unwrap();
        let before = game.grid().clone();

        game.notify_visual_settled().unwrap();

        assert_eq!(game.grid(), &before);
        assert!(game.take_events().is_empty());
    }

    #[test]
    fn spawn_events_describe_fall() {
        let mut game = Game::with_grid(GameConfig::default(), triple_grid(), quiet_refill()).unwrap();
        game.begin_cascade().unwrap();
        game.resolve().unwrap();

        let spawns: Vec<_> = game
            .take_events()
            .into_iter()
            .filter_map(|event| match event {
                GameEvent::TileSpawned(spawn) => Some(spawn),
                _ => None,
            })
            .collect();

        assert_eq!(spawns.len(), 3);
        for spawn in spawns {
            assert_eq!(spawn.at.row, 0);
            assert_eq!(spawn.fall_from, -1);
            assert_eq!(spawn.distance, 1);
            assert!(spawn.id.0 >= 64);
        }
    }
}

// ============================================================================
// Runaway Protection Tests
// ============================================================================

mod runaway {
    use super::*;

    #[test]
    fn endless_cascade_is_aborted_and_input_restored() {
        let config = GameConfig {
            max_cascade_steps: 3,
            ..GameConfig::default()
        };
        let source = Box::new(SequenceColors::new(vec![TileColor::RED]));
        let mut game = Game::with_grid(config, triple_grid(), source).unwrap();

        game.begin_cascade().unwrap();
        let result = game.resolve();

        assert_eq!(result, Err(GameError::CascadeRunaway { steps: 3 }));
        assert!(game.is_idle());
        assert!(game.input_enabled());
        assert!(game.grid().is_full());
        let events = game.take_events();
        assert!(events.contains(&GameEvent::CascadeAborted { steps: 3 }));
        assert_eq!(gate_events(&events), vec![false, true]);
    }

    #[test]
    fn game_still_accepts_swaps_after_abort() {
        let config = GameConfig {
            max_cascade_steps: 1,
            ..GameConfig::default()
        };
        let source = Box::new(SequenceColors::new(vec![TileColor::RED]));
        let mut game = Game::with_grid(config, triple_grid(), source).unwrap();
        game.begin_cascade().unwrap();
        assert!(game.resolve().is_err());

        let result = game.request_swap(Position::new(7, 0), Position::new(7, 1));

        assert!(result.is_ok());
    }
}

// ============================================================================
// Construction Tests
// ============================================================================

mod construction {
    use super::*;

    #[test]
    fn new_game_starts_settled() {
        for seed in 0..25 {
            let mut game = Game::seeded(GameConfig::default(), seed).unwrap();

            assert_settled(&game);
            assert_eq!(game.stats(), Default::default());
            let spawned = game
                .take_events()
                .iter()
                .filter(|event| matches!(event, GameEvent::TileSpawned(_)))
                .count();
            assert!(spawned >= 64);
        }
    }

    #[test]
    fn initial_fill_only_uses_palette() {
        let game = Game::seeded(GameConfig::default(), 99).unwrap();
        let palette = &game.config().palette;

        for row in game.grid().rows() {
            for cell in row {
                assert!(palette.contains(&cell.tile().unwrap().color));
            }
        }
    }

    #[test]
    fn custom_grid_size_is_honoured() {
        let config = GameConfig {
            grid_size: 5,
            ..GameConfig::default()
        };
        let game = Game::seeded(config, 3).unwrap();

        assert_eq!(game.grid().size(), 5);
        assert_settled(&game);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = GameConfig {
            palette: vec![TileColor::RED, TileColor::GREEN],
            ..GameConfig::default()
        };

        assert!(matches!(Game::seeded(config, 0), Err(GameError::Config(_))));
    }

    #[test]
    fn partial_grid_is_rejected() {
        let mut grid = triple_grid();
        grid.clear(Position::new(0, 0));

        let result = Game::with_grid(GameConfig::default(), grid, quiet_refill());

        assert!(matches!(result, Err(GameError::IncompleteGrid { empty: 1 })));
    }
}

// ============================================================================
// Generator Tests
// ============================================================================

mod generator {
    use super::*;

    #[test]
    fn fresh_tiles_avoid_two_back_colors() {
        let palette = GameConfig::default().palette;
        let mut rng = StdRng::seed_from_u64(5);
        for seed in 0..50 {
            let mut grid = grid_from_indices(&stable_pattern(8));
            let mut generator =
                TileGenerator::new(Box::new(RandomColors::seeded(seed)), palette.clone(), 50);
            generator.reserve_ids(64);
            let at = Position::new(rng.gen_range(0..8), rng.gen_range(0..8));
            grid.clear(at);

            let tile = generator.generate(&grid, at);

            if at.col >= 2 {
                assert_ne!(Some(tile.color), grid.color(Position::new(at.row, at.col - 2)));
            }
            if at.row >= 2 {
                assert_ne!(Some(tile.color), grid.color(Position::new(at.row - 2, at.col)));
            }
            assert_eq!(generator.exhausted(), 0);
        }
    }
}

// ============================================================================
// Randomised Play Tests
// ============================================================================

mod random_play {
    use super::*;

    #[test]
    fn every_idle_state_is_settled() {
        let mut game = Game::seeded(GameConfig::default(), 2024).unwrap();
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..300 {
            let a = Position::new(rng.gen_range(0..8), rng.gen_range(0..8));
            let b = if rng.gen_bool(0.5) {
                Position::new(a.row + 1, a.col)
            } else {
                Position::new(a.row, a.col + 1)
            };
            let before = game.grid().clone();

            match game.request_swap(a, b) {
                Ok(()) => {
                    game.resolve().unwrap();
                }
                Err(GameError::InvalidSwap(_)) => assert_eq!(game.grid(), &before),
                Err(err) => panic!("unexpected error: {err}"),
            }

            assert_settled(&game);
            game.take_events();
        }

        let stats = game.stats();
        assert!(stats.swaps_accepted + stats.swaps_rejected >= 300);
    }
}
