use blockfall_engine::Command;
use crossterm::event::{KeyCode, KeyEvent};

/// A player control, independent of the physical key that triggered it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Control {
    Left,
    Right,
    Rotate,
    Down,
    Start,
    Pause,
    Reset,
    Sound,
    Quit,
}

impl Control {
    pub(crate) const LEN: usize = 9;

    pub(crate) fn from_key(key: KeyEvent) -> Option<Self> {
        let control = match key.code {
            KeyCode::Left => Self::Left,
            KeyCode::Right => Self::Right,
            KeyCode::Up => Self::Rotate,
            KeyCode::Down => Self::Down,
            KeyCode::Enter | KeyCode::Char(' ') => Self::Start,
            KeyCode::Char('p' | 'P') => Self::Pause,
            KeyCode::Char('r' | 'R') => Self::Reset,
            KeyCode::Char('s' | 'S') => Self::Sound,
            KeyCode::Char('q' | 'Q') | KeyCode::Esc => Self::Quit,
            _ => return None,
        };
        Some(control)
    }

    /// Engine command for this control; `Quit` is handled by the host.
    pub(crate) fn command(self) -> Option<Command> {
        let command = match self {
            Self::Left => Command::MoveLeft,
            Self::Right => Command::MoveRight,
            Self::Rotate => Command::Rotate,
            Self::Down => Command::SoftDrop,
            Self::Start => Command::Start,
            Self::Pause => Command::TogglePause,
            Self::Reset => Command::Reset,
            Self::Sound => Command::ToggleSound,
            Self::Quit => return None,
        };
        Some(command)
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// Controls pressed since the last tick.
#[derive(Debug, Default, Clone)]
pub(crate) struct KeyboardState {
    pressed: [bool; Control::LEN],
}

impl KeyboardState {
    pub(crate) fn press(&mut self, control: Control) {
        self.pressed[control.index()] = true;
    }

    pub(crate) fn is_pressed(&self, control: Control) -> bool {
        self.pressed[control.index()]
    }

    pub(crate) fn clear(&mut self) {
        self.pressed = [false; Control::LEN];
    }
}
