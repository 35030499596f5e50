use blockfall_engine::{EngineState, GameState};
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::{Color, Style},
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use crate::ui::widgets::{BoardDisplay, NextPieceDisplay, StatsDisplay, palette, style};

/// Board, next piece and stats side by side, with a popup over the board
/// whenever the game is not running.
#[derive(Debug)]
pub struct GameDisplay<'a> {
    state: &'a EngineState,
    best_score: u32,
    horizontal_padding: u16,
    vertical_padding: u16,
}

impl<'a> GameDisplay<'a> {
    pub fn new(state: &'a EngineState, best_score: u32) -> Self {
        Self {
            state,
            best_score,
            horizontal_padding: 1,
            vertical_padding: 0,
        }
    }

    /// Height of the board with its border, the tallest column.
    pub fn height(&self) -> u16 {
        let board = self.state.board();
        BoardDisplay::new(board).block(Block::bordered()).height()
    }

    fn border_color(&self) -> Color {
        palette::accent(self.state.game_state())
    }

    fn popup(&self) -> Option<(&'static str, Style)> {
        let state = self.state.game_state();
        let text = match state {
            GameState::Started => return None,
            GameState::Loading => "PRESS ENTER",
            GameState::Paused => "PAUSED",
            GameState::Over => "GAME OVER!!",
        };
        let fg = if state.is_over() {
            palette::TEXT
        } else {
            palette::BACKGROUND
        };
        let accent = if state.is_loading() {
            palette::TEXT
        } else {
            palette::accent(state)
        };
        Some((text, Style::new().fg(fg).bg(accent)))
    }
}

impl Widget for GameDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &GameDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let block_padding = Padding::symmetric(self.horizontal_padding, self.vertical_padding);
        let border_style = self.border_color();
        let titled_block = |title: &'static str| {
            Block::bordered()
                .title(Line::from(title).centered())
                .padding(block_padding)
                .border_style(border_style)
                .style(style::DEFAULT)
        };

        let settled = self.state.settled_board();
        let falling_piece = self
            .state
            .current()
            .copied()
            .filter(|_| self.state.is_current_placed());
        let game_board = BoardDisplay::new(&settled)
            .falling_piece(falling_piece)
            .block(Block::bordered().border_style(border_style).style(style::DEFAULT));
        let next_panel =
            NextPieceDisplay::new(Some(*self.state.next())).block(titled_block("NEXT"));
        let stats = StatsDisplay::new(self.state, self.best_score).block(titled_block("STATS"));

        let [left_column, center_column, right_column] = Layout::horizontal([
            Constraint::Length(stats.width()),
            Constraint::Length(game_board.width()),
            Constraint::Length(next_panel.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [stats_area] = Layout::vertical([Constraint::Length(stats.height())]).areas(left_column);
        let [board_area] =
            Layout::vertical([Constraint::Length(game_board.height())]).areas(center_column);
        let [next_area] =
            Layout::vertical([Constraint::Length(next_panel.height())]).areas(right_column);

        let game_board_width = game_board.width();
        stats.render(stats_area, buf);
        game_board.render(board_area, buf);
        next_panel.render(next_area, buf);

        if let Some((text, style)) = self.popup() {
            let block = Block::new().style(style);
            let text = Text::styled(text, style).centered();
            let area =
                board_area.centered(Constraint::Length(game_board_width), Constraint::Length(3));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(1)), buf);
        }
    }
}
