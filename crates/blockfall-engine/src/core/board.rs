use std::{fmt, iter};

use arrayvec::ArrayVec;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{BOARD_HEIGHT, BOARD_SIZE, BOARD_WIDTH};

/// A single cell of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, derive_more::IsVariant)]
pub enum Tile {
    #[default]
    Empty,
    Filled,
}

impl Tile {
    const fn as_char(self) -> char {
        match self {
            Tile::Empty => '.',
            Tile::Filled => '#',
        }
    }
}

/// One row of tiles, left to right.
pub type TileRow = [Tile; BOARD_WIDTH];

const EMPTY_ROW: TileRow = [Tile::Empty; BOARD_WIDTH];

/// Fixed-size playfield stored as a flat, row-major array of tiles.
///
/// Row 0 is the top of the board. A linear position is `row * BOARD_WIDTH + col`.
/// The number of tiles never changes: mutation only replaces single cells or
/// whole rows.
///
/// Accessing a position outside `0..BOARD_SIZE` is a logic error in the caller
/// (collision detection must reject such positions first) and panics.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, Tile, BOARD_WIDTH};
///
/// let mut board = Board::empty();
/// board.set_row(19, [Tile::Filled; BOARD_WIDTH]);
/// assert!(board.is_row_full(19));
///
/// let cleared = board.clear_full_rows();
/// assert_eq!(cleared.as_slice(), &[19]);
/// assert_eq!(board.filled_count(), 0);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    tiles: [Tile; BOARD_SIZE],
}

impl Default for Board {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board {{")?;
        for row in self.rows() {
            let line: String = row.iter().map(|tile| tile.as_char()).collect();
            writeln!(f, "    {line}")?;
        }
        write!(f, "}}")
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for tile in row {
                write!(f, "{}", tile.as_char())?;
            }
        }
        Ok(())
    }
}

impl Board {
    pub const EMPTY: Self = Self {
        tiles: [Tile::Empty; BOARD_SIZE],
    };

    #[must_use]
    pub const fn empty() -> Self {
        Self::EMPTY
    }

    /// Builds a board from its textual form, one string per row, top to bottom.
    ///
    /// `#` marks a filled tile and `.` an empty one. Fewer than
    /// [`BOARD_HEIGHT`] rows are aligned to the bottom of the board.
    ///
    /// # Panics
    ///
    /// Panics if there are too many rows, a row has the wrong width, or an
    /// unknown character is found.
    ///
    /// ```
    /// use blockfall_engine::Board;
    ///
    /// let board = Board::from_rows(&["#.........", "##########"]);
    /// assert!(board.is_row_full(19));
    /// assert!(board.is_filled(18 * 10));
    /// ```
    #[must_use]
    pub fn from_rows(rows: &[&str]) -> Self {
        assert!(rows.len() <= BOARD_HEIGHT, "too many rows: {}", rows.len());
        let mut board = Self::EMPTY;
        let first_row = BOARD_HEIGHT - rows.len();
        for (i, line) in rows.iter().enumerate() {
            let mut row = EMPTY_ROW;
            assert_eq!(line.chars().count(), BOARD_WIDTH, "bad row width: {line:?}");
            for (tile, ch) in iter::zip(&mut row, line.chars()) {
                *tile = match ch {
                    '#' => Tile::Filled,
                    '.' => Tile::Empty,
                    _ => panic!("unexpected tile character {ch:?}"),
                };
            }
            board.set_row(first_row + i, row);
        }
        board
    }

    /// Returns an empty board whose bottom `count` rows hold random garbage.
    ///
    /// Every garbage row keeps at least one empty tile, so none of them is
    /// full when play starts.
    #[must_use]
    pub fn with_garbage_rows<R>(count: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let count = count.min(BOARD_HEIGHT);
        let mut board = Self::EMPTY;
        for row_index in BOARD_HEIGHT - count..BOARD_HEIGHT {
            let mut row = EMPTY_ROW;
            for tile in &mut row {
                if rng.random_bool(0.5) {
                    *tile = Tile::Filled;
                }
            }
            let hole = rng.random_range(0..BOARD_WIDTH);
            row[hole] = Tile::Empty;
            board.set_row(row_index, row);
        }
        board
    }

    #[must_use]
    pub fn get(&self, pos: usize) -> Tile {
        self.tiles[pos]
    }

    pub fn set(&mut self, pos: usize, tile: Tile) {
        self.tiles[pos] = tile;
    }

    #[must_use]
    pub fn is_filled(&self, pos: usize) -> bool {
        self.get(pos).is_filled()
    }

    #[must_use]
    pub fn row(&self, row: usize) -> &TileRow {
        &self.tiles.as_chunks::<BOARD_WIDTH>().0[row]
    }

    pub fn set_row(&mut self, row: usize, tiles: TileRow) {
        self.tiles.as_chunks_mut::<BOARD_WIDTH>().0[row] = tiles;
    }

    /// Iterates over the rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &TileRow> + '_ {
        self.tiles.as_chunks::<BOARD_WIDTH>().0.iter()
    }

    /// Returns `true` iff every tile in the row is filled.
    #[must_use]
    pub fn is_row_full(&self, row: usize) -> bool {
        self.row(row).iter().all(|tile| tile.is_filled())
    }

    #[must_use]
    pub fn filled_count(&self) -> usize {
        self.tiles.iter().filter(|tile| tile.is_filled()).count()
    }

    /// Removes every full row and compacts the rest toward the bottom.
    ///
    /// Non-full rows keep their relative order and form the bottom
    /// `BOARD_HEIGHT - n` rows; `n` empty rows are inserted on top.
    ///
    /// Returns the indices of the removed rows, scanned from bottom to top.
    pub fn clear_full_rows(&mut self) -> ArrayVec<usize, BOARD_HEIGHT> {
        let mut cleared = ArrayVec::new();
        let mut write_row = BOARD_HEIGHT;
        for read_row in (0..BOARD_HEIGHT).rev() {
            if self.is_row_full(read_row) {
                cleared.push(read_row);
                continue;
            }
            write_row -= 1;
            if write_row != read_row {
                let row = *self.row(read_row);
                self.set_row(write_row, row);
            }
        }
        for row in 0..write_row {
            self.set_row(row, EMPTY_ROW);
        }
        cleared
    }
}
