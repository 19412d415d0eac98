use crate::game::generator::TileGenerator;
use crate::game::grid::{Grid, Position, TileColor, TileId};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TileMove {
    pub id: TileId,
    pub from: Position,
    pub to: Position,
    pub distance: usize,
}

/// A new tile entering from above the grid. `fall_from` is the visual start
/// row, negative when above row 0.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TileSpawn {
    pub id: TileId,
    pub at: Position,
    pub color: TileColor,
    pub fall_from: isize,
    pub distance: usize,
}

#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct Collapse {
    pub moves: Vec<TileMove>,
    pub spawns: Vec<TileSpawn>,
}

/// Drops the surviving tiles of one column onto the floor, keeping their order.
/// Returns the moves made and the number of cells left empty at the top.
pub fn compact_column(grid: &mut Grid, col: usize) -> (Vec<TileMove>, usize) {
    let mut moves = Vec::new();
    let mut empty = 0;
    for row in (0..grid.size()).rev() {
        let from = Position::new(row, col);
        match grid.get(from).map(|tile| tile.id) {
            None => empty += 1,
            Some(id) if empty > 0 => {
                grid.shift_column_down(col, row, empty);
                moves.push(TileMove {
                    id,
                    from,
                    to: Position::new(row + empty, col),
                    distance: empty,
                });
            }
            Some(_) => {}
        }
    }
    (moves, empty)
}

/// Compacts every column, left to right, and refills each column's vacated top
/// cells top-down with generated tiles before moving on to the next column.
pub fn collapse(grid: &mut Grid, generator: &mut TileGenerator) -> Collapse {
    let mut result = Collapse::default();
    for col in 0..grid.size() {
        let (moves, vacated) = compact_column(grid, col);
        result.moves.extend(moves);

        for row in 0..vacated {
            let at = Position::new(row, col);
            let tile = generator.generate(grid, at);
            grid.set(at, tile);
            result.spawns.push(TileSpawn {
                id: tile.id,
                at,
                color: tile.color,
                fall_from: row as isize - vacated as isize,
                distance: vacated,
            });
        }
    }
    result
}
