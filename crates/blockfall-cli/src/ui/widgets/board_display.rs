use std::iter;

use blockfall_engine::{BOARD_HEIGHT, BOARD_WIDTH, Board, Piece};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt, Widget},
};

use crate::ui::widgets::TileDisplay;

/// The settled stack, with the falling piece drawn in its kind's color.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a Board,
    falling_piece: Option<Piece>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            falling_piece: None,
            block: None,
        }
    }

    pub fn falling_piece(self, piece: Option<Piece>) -> Self {
        Self {
            falling_piece: piece,
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn width(&self) -> u16 {
        BOARD_WIDTH as u16 * TileDisplay::width() + super::block_margin(self.block.as_ref()).width
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn height(&self) -> u16 {
        BOARD_HEIGHT as u16 * TileDisplay::height() + super::block_margin(self.block.as_ref()).height
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let piece_positions = self
            .falling_piece
            .map(|piece| piece.positions())
            .unwrap_or_default();

        let col_constraints =
            (0..BOARD_WIDTH).map(|_| Constraint::Length(TileDisplay::width()));
        let row_constraints =
            (0..BOARD_HEIGHT).map(|_| Constraint::Length(TileDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_cells = area
            .layout::<BOARD_HEIGHT>(&vertical)
            .into_iter()
            .map(|row| row.layout::<BOARD_WIDTH>(&horizontal));

        for (row_index, (grid_row, row)) in iter::zip(grid_cells, self.board.rows()).enumerate() {
            for (col_index, (grid_cell, tile)) in iter::zip(grid_row, row).enumerate() {
                let pos = row_index * BOARD_WIDTH + col_index;
                let display = match self.falling_piece {
                    Some(piece) if piece_positions.contains(&pos) => {
                        TileDisplay::from_piece_kind(piece.kind())
                    }
                    _ => TileDisplay::from_tile(*tile, true),
                };
                display.render(grid_cell, buf);
            }
        }
    }
}
