//! Game rules and state management.
//!
//! - [`GameEngine`] - the state machine driven by commands and ticks
//! - [`EngineState`] - read-only snapshot handed to renderers
//! - [`PieceFactory`] - seeded uniform piece generation
//! - [`Speed`], [`ScoreTable`] - speed levels, tick intervals and points
//! - [`EngineConfig`] - settings fixed for the lifetime of an engine
//! - [`BestScoreStore`] - where the best score lives between runs
//!
//! # Game Flow
//!
//! 1. Create a [`GameEngine`]; it starts in [`GameState::Loading`]
//! 2. [`GameEngine::start`] spawns the first piece and requests a tick timer
//! 3. Every tick moves the piece down one row, or locks it, clears full rows
//!    and spawns the next piece
//! 4. The game ends when a spawned piece has no room; [`GameEngine::reset`]
//!    returns to `Loading`

pub use self::{best_score::*, config::*, game_engine::*, piece_factory::*, tables::*};

mod best_score;
mod config;
mod game_engine;
mod piece_factory;
mod tables;
