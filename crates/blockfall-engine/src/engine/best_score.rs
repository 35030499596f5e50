use std::convert::Infallible;

/// External storage for the best score ever reached.
///
/// The engine only reads it once, when created. Writing back is the host's
/// job: after a mutation, compare [`EngineState::points`] with the stored
/// value and call [`save`](Self::save) when it is higher.
///
/// [`EngineState::points`]: crate::EngineState::points
pub trait BestScoreStore {
    type Error;

    fn load(&self) -> u32;

    fn save(&mut self, best_score: u32) -> Result<(), Self::Error>;

    /// Saves `points` if it beats the stored value. Returns whether it did.
    fn record(&mut self, points: u32) -> Result<bool, Self::Error> {
        if points <= self.load() {
            return Ok(false);
        }
        self.save(points)?;
        Ok(true)
    }
}

/// A best score kept in memory only.
///
/// ```
/// use blockfall_engine::{BestScoreStore, MemoryBestScore};
///
/// let mut store = MemoryBestScore::new(500);
/// assert_eq!(store.record(300), Ok(false));
/// assert_eq!(store.record(800), Ok(true));
/// assert_eq!(store.load(), 800);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryBestScore(u32);

impl MemoryBestScore {
    #[must_use]
    pub const fn new(best_score: u32) -> Self {
        Self(best_score)
    }
}

impl BestScoreStore for MemoryBestScore {
    type Error = Infallible;

    fn load(&self) -> u32 {
        self.0
    }

    fn save(&mut self, best_score: u32) -> Result<(), Self::Error> {
        self.0 = best_score;
        Ok(())
    }
}
