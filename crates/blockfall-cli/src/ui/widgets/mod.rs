use ratatui::{
    layout::{Rect, Size},
    widgets::Block as BlockWidget,
};

pub use self::{
    board_display::*, game_display::*, key_binding_display::*, next_piece_display::*,
    stats_display::*, tile_display::*,
};

mod board_display;
mod game_display;
mod key_binding_display;
mod next_piece_display;
mod stats_display;
mod tile_display;

/// Colors by what they paint, not by hue.
pub mod palette {
    use blockfall_engine::{GameState, PieceKind};
    use ratatui::style::Color;

    pub const BACKGROUND: Color = Color::Rgb(0, 0, 0);
    pub const TEXT: Color = Color::Rgb(255, 255, 255);
    pub const GRID_DOT: Color = Color::Rgb(127, 127, 127);
    pub const STACK: Color = Color::Rgb(191, 191, 191);

    pub const fn piece(kind: PieceKind) -> Color {
        match kind {
            PieceKind::I => Color::Rgb(0, 255, 255),
            PieceKind::O => Color::Rgb(255, 255, 0),
            PieceKind::T => Color::Rgb(255, 0, 255),
            PieceKind::S => Color::Rgb(0, 255, 0),
            PieceKind::Z => Color::Rgb(255, 0, 0),
            PieceKind::J => Color::Rgb(0, 0, 255),
            PieceKind::L => Color::Rgb(255, 127, 0),
        }
    }

    /// Border and popup accent for each game state.
    pub const fn accent(state: GameState) -> Color {
        match state {
            GameState::Loading => GRID_DOT,
            GameState::Started => TEXT,
            GameState::Paused => Color::Rgb(255, 255, 0),
            GameState::Over => Color::Rgb(255, 0, 0),
        }
    }
}

pub mod style {
    use ratatui::style::{Color, Style};

    use super::palette;

    /// Foreground and background in the same color, so the cell reads as a solid tile.
    pub const fn solid(color: Color) -> Style {
        Style::new().fg(color).bg(color)
    }

    pub const DEFAULT: Style = Style::new().fg(palette::TEXT).bg(palette::BACKGROUND);
    pub const EMPTY: Style = solid(palette::BACKGROUND);
    pub const EMPTY_DOT: Style = Style::new().fg(palette::GRID_DOT).bg(palette::BACKGROUND);
    pub const STACK: Style = solid(palette::STACK);
}

/// Space taken by the block's borders and padding around its inner area.
fn block_margin(block: Option<&BlockWidget>) -> Size {
    let outer = Rect::new(0, 0, 100, 100);
    let inner = block.map_or(outer, |block| block.inner(outer));
    Size::new(outer.width - inner.width, outer.height - inner.height)
}
