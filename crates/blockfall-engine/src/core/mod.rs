pub use self::{board::*, piece::*};

pub(crate) mod board;
pub(crate) mod piece;

/// Number of columns on the board.
pub const BOARD_WIDTH: usize = 10;
/// Number of rows on the board.
pub const BOARD_HEIGHT: usize = 20;
/// Number of tiles on the board.
pub const BOARD_SIZE: usize = BOARD_WIDTH * BOARD_HEIGHT;
