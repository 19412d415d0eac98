use std::fmt;

// ============================================================================
// Types
// ============================================================================

/// Tile color as a 0xRRGGBB value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TileColor(pub u32);

impl TileColor {
    pub const RED: Self = Self(0xff0000);
    pub const GREEN: Self = Self(0x00ff00);
    pub const BLUE: Self = Self(0x0000ff);
    pub const YELLOW: Self = Self(0xffff00);
    pub const PURPLE: Self = Self(0xbb00ee);

    pub fn rgb(&self) -> (u8, u8, u8) {
        ((self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8)
    }
}

impl fmt::Display for TileColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct TileId(pub u64);

/// A tile lives in exactly one cell. Matching compares `color` only.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Tile {
    pub id: TileId,
    pub color: TileColor,
}

/// `(row, col)` with row 0 at the top. Orders row-major.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// 4-connectivity: exactly one axis differs, by exactly one.
    pub fn is_adjacent(&self, other: &Position) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }

    pub fn in_bounds(&self, size: usize) -> bool {
        self.row < size && self.col < size
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Cell {
    Empty,
    Occupied(Tile),
}

impl Cell {
    pub fn tile(&self) -> Option<&Tile> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(tile) => Some(tile),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

// ============================================================================
// Grid
// ============================================================================

/// Square container of cells indexed `[row][col]`. Holds no game rules.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Grid {
    size: usize,
    cells: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![vec![Cell::Empty; size]; size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.cells
    }

    /// Off-grid positions read as "no tile" so callers can probe neighbours freely.
    pub fn get(&self, pos: Position) -> Option<&Tile> {
        self.cells
            .get(pos.row)
            .and_then(|row| row.get(pos.col))
            .and_then(Cell::tile)
    }

    pub fn color(&self, pos: Position) -> Option<TileColor> {
        self.get(pos).map(|tile| tile.color)
    }

    pub fn set(&mut self, pos: Position, tile: Tile) {
        self.cells[pos.row][pos.col] = Cell::Occupied(tile);
    }

    /// Empties the cell, handing back whatever tile it held.
    pub fn clear(&mut self, pos: Position) -> Option<Tile> {
        match std::mem::replace(&mut self.cells[pos.row][pos.col], Cell::Empty) {
            Cell::Empty => None,
            Cell::Occupied(tile) => Some(tile),
        }
    }

    /// Exchanges the two cells' tiles. Its own inverse.
    pub fn swap(&mut self, a: Position, b: Position) {
        let first = self.cells[a.row][a.col];
        self.cells[a.row][a.col] = self.cells[b.row][b.col];
        self.cells[b.row][b.col] = first;
    }

    /// Moves the tile at `from_row` down by `count` rows, leaving the source empty.
    /// The caller guarantees `from_row + count` is on the grid.
    pub fn shift_column_down(&mut self, col: usize, from_row: usize, count: usize) {
        let cell = std::mem::replace(&mut self.cells[from_row][col], Cell::Empty);
        self.cells[from_row + count][col] = cell;
    }

    pub fn is_full(&self) -> bool {
        self.empty_count() == 0
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().flatten().filter(|cell| cell.is_empty()).count()
    }

    pub fn occupied_in_column(&self, col: usize) -> usize {
        self.cells.iter().filter(|row| !row[col].is_empty()).count()
    }

    /// Tile ids in a column, top to bottom, skipping empty cells.
    pub fn column_ids(&self, col: usize) -> Vec<TileId> {
        self.cells
            .iter()
            .filter_map(|row| row[col].tile().map(|tile| tile.id))
            .collect()
    }
}
