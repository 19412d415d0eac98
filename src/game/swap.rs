use crate::error::SwapError;
use crate::game::grid::{Grid, Position};

/// Checks that both positions are on the grid, hold tiles and touch along one axis.
pub fn validate(grid: &Grid, a: Position, b: Position) -> Result<(), SwapError> {
    let size = grid.size();
    for pos in [a, b] {
        if !pos.in_bounds(size) {
            return Err(SwapError::OutOfBounds { pos, size });
        }
    }
    if !a.is_adjacent(&b) {
        return Err(SwapError::NotAdjacent(a, b));
    }
    for pos in [a, b] {
        if grid.get(pos).is_none() {
            return Err(SwapError::EmptyCell(pos));
        }
    }
    Ok(())
}

/// Exchanges the tiles at `a` and `b` if the swap is legal. The grid is left
/// untouched on error. Applying the same swap twice restores the grid.
pub fn apply(grid: &mut Grid, a: Position, b: Position) -> Result<(), SwapError> {
    validate(grid, a, b)?;
    grid.swap(a, b);
    Ok(())
}
