//! Falling-block puzzle engine.
//!
//! The crate is split in two layers:
//!
//! - [`core`] - the board grid and the piece catalog with its pure transforms
//! - [`engine`] - piece generation, scoring and speed tables, and the
//!   tick-driven [`GameEngine`] state machine
//!
//! The engine owns no timer and performs no I/O. Hosts drive it by calling
//! [`GameEngine::tick`] at the interval it requests and persist the best score
//! through a [`BestScoreStore`].

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("speed level {_0} is outside 1..=6")]
pub struct InvalidSpeedError(#[error(not(source))] pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("score table {_0:?} is not strictly increasing")]
pub struct ScoreTableError(#[error(not(source))] pub [u32; 4]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("init_lines is {_0}, at most 10 garbage rows are allowed")]
    TooManyInitLines(#[error(not(source))] u8),
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParsePieceSeedError {
    #[display("expected 32 hex digits, got {_0} characters")]
    InvalidLength(#[error(not(source))] usize),
    #[display("invalid hex digits in seed {_0:?}")]
    InvalidHex(#[error(not(source))] String),
}
