use crate::config::DEFAULT_PALETTE;
use crate::game::grid::{Grid, Position, Tile, TileColor, TileId};

/// Palette indices with no three-in-a-row: neighbours across a row differ by
/// 2 mod 5, neighbours down a column by 1 mod 5.
pub fn stable_pattern(size: usize) -> Vec<Vec<usize>> {
    (0..size)
        .map(|row| (0..size).map(|col| (row + 2 * col) % 5).collect())
        .collect()
}

pub fn color(index: usize) -> TileColor {
    DEFAULT_PALETTE[index % DEFAULT_PALETTE.len()]
}

/// Builds a full grid from palette indices, numbering tiles row-major.
pub fn grid_from_indices(pattern: &[Vec<usize>]) -> Grid {
    let mut grid = Grid::new(pattern.len());
    for (row, cols) in pattern.iter().enumerate() {
        for (col, &index) in cols.iter().enumerate() {
            let tile = Tile {
                id: TileId((row * pattern.len() + col) as u64),
                color: color(index),
            };
            grid.set(Position::new(row, col), tile);
        }
    }
    grid
}

/// Per-column count of occupied cells.
pub fn column_counts(grid: &Grid) -> Vec<usize> {
    (0..grid.size()).map(|col| grid.occupied_in_column(col)).collect()
}
