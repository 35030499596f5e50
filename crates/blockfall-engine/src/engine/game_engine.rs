use std::time::Duration;

use tracing::{debug, info, trace};

use crate::{
    BOARD_HEIGHT, BOARD_WIDTH, ConfigError,
    core::{
        board::{Board, Tile},
        piece::Piece,
    },
};

use super::{
    best_score::BestScoreStore,
    config::EngineConfig,
    piece_factory::PieceFactory,
    tables::{Speed, speed_for, tick_interval_for},
};

/// Lifecycle of a game.
///
/// `Loading -(start)-> Started <-(pause/resume)-> Paused`, `Started -> Over`
/// when a spawned piece has no room, and `reset` returns to `Loading` from
/// anywhere.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, derive_more::IsVariant, derive_more::Display,
)]
pub enum GameState {
    #[default]
    Loading,
    Started,
    Paused,
    Over,
}

/// What the host must do with its tick timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickSchedule {
    /// Cancel any pending timer and call [`GameEngine::tick`] at this interval.
    Every(Duration),
    /// Cancel any pending timer.
    Stop,
}

/// Outcome of a mutating call on [`GameEngine`].
///
/// `changed` tells the host to re-read [`GameEngine::state`]; `schedule`
/// carries a timer request that must be honored before the next tick.
#[must_use]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Effects {
    pub changed: bool,
    pub schedule: Option<TickSchedule>,
}

impl Effects {
    pub const NONE: Self = Self {
        changed: false,
        schedule: None,
    };

    const CHANGED: Self = Self {
        changed: true,
        schedule: None,
    };

    const fn changed_with(schedule: TickSchedule) -> Self {
        Self {
            changed: true,
            schedule: Some(schedule),
        }
    }

    /// Combines two outcomes; a later schedule request replaces an earlier one.
    pub fn merge(self, later: Self) -> Self {
        Self {
            changed: self.changed || later.changed,
            schedule: later.schedule.or(self.schedule),
        }
    }
}

/// The command surface, for hosts that translate input into values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    Resume,
    TogglePause,
    Reset,
    MoveLeft,
    MoveRight,
    Rotate,
    SoftDrop,
    Tick,
    SetSound(bool),
    ToggleSound,
}

/// Read-only view of everything the engine tracks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineState {
    board: Board,
    current: Option<Piece>,
    // Whether `current` is drawn onto `board`. A freshly spawned piece is not
    // drawn until the next tick or move.
    placed: bool,
    next: Piece,
    points: u32,
    locked: bool,
    sound_enabled: bool,
    init_speed: Speed,
    current_speed: Speed,
    cleared_lines: u32,
    game_state: GameState,
    best_score: u32,
}

impl EngineState {
    /// The board, including the falling piece once it has been drawn.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The board without the falling piece.
    #[must_use]
    pub fn settled_board(&self) -> Board {
        let mut board = self.board.clone();
        if let Some(piece) = self.current.filter(|_| self.placed) {
            for pos in piece.positions() {
                board.set(pos, Tile::Empty);
            }
        }
        board
    }

    #[must_use]
    pub fn current(&self) -> Option<&Piece> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn is_current_placed(&self) -> bool {
        self.current.is_some() && self.placed
    }

    #[must_use]
    pub fn next(&self) -> &Piece {
        &self.next
    }

    #[must_use]
    pub fn points(&self) -> u32 {
        self.points
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    #[must_use]
    pub fn is_sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    #[must_use]
    pub fn init_speed(&self) -> Speed {
        self.init_speed
    }

    #[must_use]
    pub fn current_speed(&self) -> Speed {
        self.current_speed
    }

    /// Interval at which the host should currently be ticking.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        tick_interval_for(self.current_speed)
    }

    #[must_use]
    pub fn cleared_lines(&self) -> u32 {
        self.cleared_lines
    }

    #[must_use]
    pub fn game_state(&self) -> GameState {
        self.game_state
    }

    /// Best score read from the store when the engine was created, raised by
    /// finished games on [`GameEngine::reset`].
    #[must_use]
    pub fn best_score(&self) -> u32 {
        self.best_score
    }
}

/// The falling-block game engine.
///
/// A synchronous state container: it never sleeps or owns a timer. The host
/// calls [`tick`](Self::tick) at the interval requested through
/// [`Effects::schedule`] and forwards player input to the command methods.
///
/// # Example
///
/// ```
/// use blockfall_engine::{EngineConfig, GameEngine, GameState, TickSchedule};
///
/// let mut engine = GameEngine::new(EngineConfig::default(), 0).unwrap();
/// assert_eq!(engine.state().game_state(), GameState::Loading);
///
/// let effects = engine.start();
/// assert!(matches!(effects.schedule, Some(TickSchedule::Every(_))));
///
/// let _ = engine.tick();
/// let _ = engine.move_left();
/// let _ = engine.rotate();
/// assert!(engine.state().is_current_placed());
///
/// let effects = engine.pause();
/// assert_eq!(effects.schedule, Some(TickSchedule::Stop));
/// ```
#[derive(Debug, Clone)]
pub struct GameEngine {
    config: EngineConfig,
    factory: PieceFactory,
    state: EngineState,
}

impl GameEngine {
    pub fn new(config: EngineConfig, best_score: u32) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut factory = config
            .seed
            .map_or_else(PieceFactory::new, PieceFactory::with_seed);
        let state = initial_state(&config, &mut factory, best_score);
        debug!(
            init_speed = %config.init_speed,
            init_lines = config.init_lines,
            best_score,
            "engine created"
        );
        Ok(Self {
            config,
            factory,
            state,
        })
    }

    /// Like [`Self::new`], reading the best score from `store`.
    pub fn with_store<S>(config: EngineConfig, store: &S) -> Result<Self, ConfigError>
    where
        S: BestScoreStore + ?Sized,
    {
        Self::new(config, store.load())
    }

    #[must_use]
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn apply(&mut self, command: Command) -> Effects {
        match command {
            Command::Start => self.start(),
            Command::Pause => self.pause(),
            Command::Resume => self.resume(),
            Command::TogglePause => self.toggle_pause(),
            Command::Reset => self.reset(),
            Command::MoveLeft => self.move_left(),
            Command::MoveRight => self.move_right(),
            Command::Rotate => self.rotate(),
            Command::SoftDrop => self.soft_drop(),
            Command::Tick => self.tick(),
            Command::SetSound(enabled) => self.set_sound_enabled(enabled),
            Command::ToggleSound => self.toggle_sound(),
        }
    }

    /// Starts a new game from `Loading`, or resumes one from `Paused`.
    ///
    /// A new game promotes `next` to the falling piece and starts at the
    /// initial speed; resuming keeps the speed already reached.
    pub fn start(&mut self) -> Effects {
        let state = &mut self.state;
        if state.game_state.is_started() || state.game_state.is_over() {
            return Effects::NONE;
        }
        if state.current.is_none() {
            let next = self.factory.random_piece();
            state.current = Some(std::mem::replace(&mut state.next, next));
            state.placed = false;
            state.current_speed = state.init_speed;
        }
        debug!(from = %state.game_state, speed = %state.current_speed, "game started");
        state.game_state = GameState::Started;
        state.locked = false;
        Effects::changed_with(TickSchedule::Every(state.tick_interval()))
    }

    /// Same as [`start`](Self::start), but only from `Paused`.
    pub fn resume(&mut self) -> Effects {
        if !self.state.game_state.is_paused() {
            return Effects::NONE;
        }
        self.start()
    }

    pub fn pause(&mut self) -> Effects {
        if !self.state.game_state.is_started() {
            return Effects::NONE;
        }
        debug!("game paused");
        self.state.locked = true;
        self.state.game_state = GameState::Paused;
        Effects::changed_with(TickSchedule::Stop)
    }

    pub fn toggle_pause(&mut self) -> Effects {
        match self.state.game_state {
            GameState::Started => self.pause(),
            GameState::Paused => self.resume(),
            GameState::Loading | GameState::Over => Effects::NONE,
        }
    }

    /// Throws the current game away and returns to `Loading`.
    ///
    /// Does not start a new game; call [`start`](Self::start) afterwards.
    pub fn reset(&mut self) -> Effects {
        let best_score = self.state.best_score.max(self.state.points);
        debug!(points = self.state.points, best_score, "game reset");
        self.state = initial_state(&self.config, &mut self.factory, best_score);
        Effects::changed_with(TickSchedule::Stop)
    }

    pub fn move_left(&mut self) -> Effects {
        self.shift(Piece::moved_left, collides_left)
    }

    pub fn move_right(&mut self) -> Effects {
        self.shift(Piece::moved_right, collides_right)
    }

    /// Rotates the falling piece, nudging it left off the right wall if needed.
    ///
    /// The piece either ends fully on the board without overlap, or keeps the
    /// exact transform it had before the call.
    pub fn rotate(&mut self) -> Effects {
        let Some(piece) = self.movable_piece() else {
            return Effects::NONE;
        };
        let before = self.state.board.clone();
        self.erase_current();

        let board = &self.state.board;
        let mut tentative = piece.store().rotated();
        while collides_right(board, &tentative) {
            tentative = tentative.moved_left();
            if collides_left(board, &tentative) {
                tentative = tentative.revert();
                break;
            }
        }
        if !fits(board, &tentative) {
            tentative = tentative.revert();
        }

        self.state.current = Some(tentative);
        self.draw_current();
        self.changed_since(&before, &piece)
    }

    /// Moves the falling piece down one row immediately, exactly like a tick.
    pub fn soft_drop(&mut self) -> Effects {
        trace!("soft drop");
        self.tick()
    }

    /// One gravity step: fall one row, or lock, clear lines and spawn.
    pub fn tick(&mut self) -> Effects {
        let Some(piece) = self.movable_piece() else {
            return Effects::NONE;
        };
        self.state.locked = true;
        self.erase_current();

        let tentative = piece.store().moved_down();
        if !collides_bottom(&self.state.board, &tentative) {
            self.state.current = Some(tentative);
            self.draw_current();
            self.state.locked = false;
            trace!(row = tentative.position().row, "piece fell");
            return Effects::CHANGED;
        }

        self.state.current = Some(tentative.revert());
        self.draw_current();
        let effects = Effects::CHANGED.merge(self.clear_full_lines());
        self.spawn_next();

        if self.is_spawn_blocked() {
            self.finish_game();
            return effects.merge(Effects::changed_with(TickSchedule::Stop));
        }
        self.state.locked = false;
        effects
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) -> Effects {
        if self.state.sound_enabled == enabled {
            return Effects::NONE;
        }
        self.state.sound_enabled = enabled;
        Effects::CHANGED
    }

    pub fn toggle_sound(&mut self) -> Effects {
        self.set_sound_enabled(!self.state.sound_enabled)
    }

    fn movable_piece(&self) -> Option<Piece> {
        if self.state.locked || !self.state.game_state.is_started() {
            return None;
        }
        self.state.current
    }

    fn shift(
        &mut self,
        transform: fn(&Piece) -> Piece,
        collides: fn(&Board, &Piece) -> bool,
    ) -> Effects {
        let Some(piece) = self.movable_piece() else {
            return Effects::NONE;
        };
        let before = self.state.board.clone();
        self.erase_current();

        let mut tentative = transform(&piece.store());
        if collides(&self.state.board, &tentative) {
            tentative = tentative.revert();
        }

        self.state.current = Some(tentative);
        self.draw_current();
        self.changed_since(&before, &piece)
    }

    fn changed_since(&self, board: &Board, piece: &Piece) -> Effects {
        let moved = self
            .state
            .current
            .is_some_and(|current| current.transform() != piece.transform());
        if moved || self.state.board != *board {
            Effects::CHANGED
        } else {
            Effects::NONE
        }
    }

    fn erase_current(&mut self) {
        if let Some(piece) = self.state.current.filter(|_| self.state.placed) {
            for pos in piece.positions() {
                self.state.board.set(pos, Tile::Empty);
            }
        }
        self.state.placed = false;
    }

    fn draw_current(&mut self) {
        if let Some(piece) = self.state.current {
            let piece = piece.clear_store();
            for pos in piece.positions() {
                self.state.board.set(pos, Tile::Filled);
            }
            self.state.current = Some(piece);
            self.state.placed = true;
        }
    }

    fn clear_full_lines(&mut self) -> Effects {
        let cleared = self.state.board.clear_full_rows();
        let count = cleared.len();
        if count == 0 {
            return Effects::NONE;
        }

        let state = &mut self.state;
        let added = self.config.score_table.points_for(count);
        state.points = state.points.saturating_add(added);
        state.cleared_lines = state
            .cleared_lines
            .saturating_add(u32::try_from(count).unwrap_or(u32::MAX));
        debug!(
            rows = ?cleared.as_slice(),
            added,
            points = state.points,
            total_lines = state.cleared_lines,
            "lines cleared"
        );

        let speed = speed_for(state.init_speed, state.cleared_lines);
        if speed == state.current_speed {
            return Effects::CHANGED;
        }
        debug!(from = %state.current_speed, to = %speed, "speed changed");
        state.current_speed = speed;
        Effects::changed_with(TickSchedule::Every(tick_interval_for(speed)))
    }

    fn spawn_next(&mut self) {
        let next = self.factory.random_piece();
        let current = std::mem::replace(&mut self.state.next, next);
        trace!(
            current = %current.kind().as_char(),
            next = %next.kind().as_char(),
            "piece spawned"
        );
        self.state.current = Some(current);
        self.state.placed = false;
    }

    /// The spawned piece has no room if it already overlaps the stack or
    /// cannot fall a single row.
    fn is_spawn_blocked(&self) -> bool {
        self.state.current.is_some_and(|piece| {
            overlaps(&self.state.board, &piece)
                || collides_bottom(&self.state.board, &piece.moved_down())
        })
    }

    fn finish_game(&mut self) {
        info!(
            points = self.state.points,
            lines = self.state.cleared_lines,
            speed = %self.state.current_speed,
            "game over"
        );
        self.state.locked = true;
        self.state.game_state = GameState::Over;
    }
}

fn initial_state(config: &EngineConfig, factory: &mut PieceFactory, best_score: u32) -> EngineState {
    let board = Board::with_garbage_rows(usize::from(config.init_lines), factory.rng());
    EngineState {
        board,
        current: None,
        placed: false,
        next: factory.random_piece(),
        points: 0,
        locked: true,
        sound_enabled: true,
        init_speed: config.init_speed,
        current_speed: config.init_speed,
        cleared_lines: 0,
        game_state: GameState::Loading,
        best_score,
    }
}

/// Any on-board cell of the piece is already filled.
fn overlaps(board: &Board, piece: &Piece) -> bool {
    piece.positions().iter().any(|&pos| board.is_filled(pos))
}

fn collides_left(board: &Board, piece: &Piece) -> bool {
    piece.left_col() < 0 || overlaps(board, piece)
}

fn collides_right(board: &Board, piece: &Piece) -> bool {
    usize::try_from(piece.right_col()).is_ok_and(|col| col >= BOARD_WIDTH)
        || overlaps(board, piece)
}

fn collides_bottom(board: &Board, piece: &Piece) -> bool {
    usize::try_from(piece.bottom_row()).is_ok_and(|row| row >= BOARD_HEIGHT)
        || overlaps(board, piece)
}

fn fits(board: &Board, piece: &Piece) -> bool {
    piece.is_within_bounds() && !overlaps(board, piece)
}
