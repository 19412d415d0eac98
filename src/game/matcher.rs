use std::collections::BTreeSet;

use crate::config::MIN_RUN;
use crate::error::GameError;
use crate::game::grid::{Grid, Position};

/// Unique matched positions, iterated row-major.
pub type MatchSet = BTreeSet<Position>;

/// Scans every horizontal and vertical window of `MIN_RUN` cells and collects
/// the cells of each single-color window. Longer runs fall out of overlapping
/// windows. Requires a full grid.
pub fn find_matches(grid: &Grid) -> Result<MatchSet, GameError> {
    let empty = grid.empty_count();
    if empty > 0 {
        return Err(GameError::IncompleteGrid { empty });
    }

    let size = grid.size();
    let mut matched = MatchSet::new();
    if size < MIN_RUN {
        return Ok(matched);
    }

    // Horizontal
    for row in 0..size {
        for col in 0..=size - MIN_RUN {
            let window: Vec<Position> = (0..MIN_RUN).map(|i| Position::new(row, col + i)).collect();
            if same_color(grid, &window) {
                matched.extend(window);
            }
        }
    }

    // Vertical
    for col in 0..size {
        for row in 0..=size - MIN_RUN {
            let window: Vec<Position> = (0..MIN_RUN).map(|i| Position::new(row + i, col)).collect();
            if same_color(grid, &window) {
                matched.extend(window);
            }
        }
    }

    Ok(matched)
}

fn same_color(grid: &Grid, window: &[Position]) -> bool {
    let first = grid.color(window[0]);
    first.is_some() && window[1..].iter().all(|pos| grid.color(*pos) == first)
}
