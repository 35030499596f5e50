use blockfall_engine::{Piece, Tile};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::TileDisplay;

/// Every piece fits in this many tiles at its spawn rotation.
const PREVIEW_COLS: u16 = 4;
const PREVIEW_ROWS: u16 = 2;

/// The upcoming piece, drawn from its spawn cells and centered in a fixed
/// preview grid.
#[derive(Debug)]
pub struct NextPieceDisplay<'a> {
    piece: Option<Piece>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> NextPieceDisplay<'a> {
    pub fn new(piece: Option<Piece>) -> Self {
        Self { piece, block: None }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        PREVIEW_COLS * TileDisplay::width() + super::block_margin(self.block.as_ref()).width
    }

    pub fn height(&self) -> u16 {
        PREVIEW_ROWS * TileDisplay::height() + super::block_margin(self.block.as_ref()).height
    }
}

/// Tile offsets of the piece's cells relative to its bounding box, plus the
/// box size in tiles.
fn normalized_cells(piece: &Piece) -> (Vec<(u16, u16)>, (u16, u16)) {
    let (left, top) = (piece.left_col(), piece.top_row());
    let span = |from: i32, to: i32| u16::try_from(to - from + 1).unwrap_or(0);
    let size = (
        span(left, piece.right_col()),
        span(top, piece.bottom_row()),
    );
    let cells = piece
        .cells()
        .iter()
        .filter_map(|cell| {
            let col = u16::try_from(cell.col - left).ok()?;
            let row = u16::try_from(cell.row - top).ok()?;
            Some((col, row))
        })
        .collect();
    (cells, size)
}

impl Widget for NextPieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &NextPieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let grid = area.centered(
            Constraint::Length(PREVIEW_COLS * TileDisplay::width()),
            Constraint::Length(PREVIEW_ROWS * TileDisplay::height()),
        );
        TileDisplay::from_tile(Tile::Empty, false).render(grid, buf);

        let Some(piece) = self.piece else {
            return;
        };
        let (cells, (cols, rows)) = normalized_cells(&piece);
        let origin_x = grid.x + grid.width.saturating_sub(cols * TileDisplay::width()) / 2;
        let origin_y = grid.y + grid.height.saturating_sub(rows * TileDisplay::height()) / 2;

        let tile = TileDisplay::from_piece_kind(piece.kind());
        for (col, row) in cells {
            let cell_area = Rect::new(
                origin_x + col * TileDisplay::width(),
                origin_y + row * TileDisplay::height(),
                TileDisplay::width(),
                TileDisplay::height(),
            )
            .intersection(grid);
            if !cell_area.is_empty() {
                (&tile).render(cell_area, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::PieceKind;
    use ratatui::style::Color;

    use super::*;
    use crate::ui::widgets::palette;

    fn render(kind: Option<PieceKind>) -> Buffer {
        let display = NextPieceDisplay::new(kind.map(Piece::spawn));
        let area = Rect::new(0, 0, display.width(), display.height());
        let mut buf = Buffer::empty(area);
        display.render(area, &mut buf);
        buf
    }

    fn bg(buf: &Buffer, x: u16, y: u16) -> Color {
        buf[(x, y)].bg
    }

    #[test]
    fn test_cells_are_relative_to_bounding_box() {
        let (cells, size) = normalized_cells(&Piece::spawn(PieceKind::T));
        assert_eq!(size, (3, 2));
        assert_eq!(cells, vec![(1, 0), (0, 1), (1, 1), (2, 1)]);

        let (_, size) = normalized_cells(&Piece::spawn(PieceKind::I));
        assert_eq!(size, (4, 1));
    }

    #[test]
    fn test_render_centers_narrow_piece() {
        let buf = render(Some(PieceKind::O));
        let color = palette::piece(PieceKind::O);

        // Two tiles wide in a four tile grid: one empty tile on each side.
        for y in 0..2 {
            assert_eq!(bg(&buf, 1, y), palette::BACKGROUND);
            assert_eq!(bg(&buf, 2, y), color);
            assert_eq!(bg(&buf, 5, y), color);
            assert_eq!(bg(&buf, 6, y), palette::BACKGROUND);
        }
    }

    #[test]
    fn test_render_odd_width_piece() {
        let buf = render(Some(PieceKind::T));
        let color = palette::piece(PieceKind::T);

        assert_eq!(bg(&buf, 0, 0), palette::BACKGROUND);
        assert_eq!(bg(&buf, 2, 0), palette::BACKGROUND);
        assert_eq!(bg(&buf, 3, 0), color);
        assert_eq!(bg(&buf, 5, 0), palette::BACKGROUND);
        assert_eq!(bg(&buf, 0, 1), palette::BACKGROUND);
        assert_eq!(bg(&buf, 1, 1), color);
        assert_eq!(bg(&buf, 6, 1), color);
        assert_eq!(bg(&buf, 7, 1), palette::BACKGROUND);
    }

    #[test]
    fn test_render_without_piece_is_blank() {
        let buf = render(None);
        let area = buf.area;
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                assert_eq!(bg(&buf, x, y), palette::BACKGROUND);
            }
        }
    }
}
