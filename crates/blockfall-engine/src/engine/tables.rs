use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{BOARD_HEIGHT, InvalidSpeedError, ScoreTableError};

/// Fall speed level, always within `1..=6`.
///
/// ```
/// use blockfall_engine::Speed;
///
/// assert_eq!(Speed::new(3).unwrap().get(), 3);
/// assert!(Speed::new(0).is_err());
/// assert!(Speed::new(7).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Speed(u8);

impl Speed {
    pub const MIN: Self = Self(1);
    pub const MAX: Self = Self(6);

    pub fn new(level: u8) -> Result<Self, InvalidSpeedError> {
        if (Self::MIN.0..=Self::MAX.0).contains(&level) {
            Ok(Self(level))
        } else {
            Err(InvalidSpeedError(level))
        }
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self::MIN
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<u8> for Speed {
    type Error = InvalidSpeedError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::new(level)
    }
}

impl From<Speed> for u8 {
    fn from(speed: Speed) -> Self {
        speed.0
    }
}

/// Tick interval in milliseconds, indexed by `speed - 1`.
const TICK_INTERVALS_MS: [u64; 6] = [800, 650, 500, 370, 250, 160];

/// Returns the gravity tick interval for a speed level.
///
/// Higher speeds never have a longer interval.
#[must_use]
pub fn tick_interval_for(speed: Speed) -> Duration {
    Duration::from_millis(TICK_INTERVALS_MS[usize::from(speed.0 - 1)])
}

/// Returns the speed reached after `cleared_lines` lines, starting at `init_speed`.
///
/// One level is gained per [`BOARD_HEIGHT`] cleared lines, capped at [`Speed::MAX`].
///
/// ```
/// use blockfall_engine::{Speed, speed_for};
///
/// let init = Speed::MIN;
/// assert_eq!(speed_for(init, 19), Speed::MIN);
/// assert_eq!(speed_for(init, 20).get(), 2);
/// assert_eq!(speed_for(init, 1000), Speed::MAX);
/// ```
#[must_use]
pub fn speed_for(init_speed: Speed, cleared_lines: u32) -> Speed {
    let gained = cleared_lines / u32::try_from(BOARD_HEIGHT).unwrap_or(u32::MAX);
    let level = u32::from(init_speed.0)
        .saturating_add(gained)
        .min(u32::from(Speed::MAX.0));
    // `level` is within `init_speed..=MAX`, so it fits in a `u8`.
    Speed(u8::try_from(level).unwrap_or(Speed::MAX.0))
}

/// Points awarded for clearing 1, 2, 3 or 4 lines at once.
///
/// Values must be strictly increasing, so a multi-line clear is always worth
/// more than a smaller one.
///
/// ```
/// use blockfall_engine::ScoreTable;
///
/// let table = ScoreTable::default();
/// assert_eq!(table.points_for(0), 0);
/// assert_eq!(table.points_for(1), 100);
/// assert_eq!(table.points_for(4), 1500);
///
/// assert!(ScoreTable::new([100, 100, 200, 300]).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "[u32; 4]", into = "[u32; 4]")]
pub struct ScoreTable([u32; 4]);

impl ScoreTable {
    pub const DEFAULT: Self = Self([100, 300, 700, 1500]);

    pub fn new(points: [u32; 4]) -> Result<Self, ScoreTableError> {
        if points.windows(2).all(|pair| pair[0] < pair[1]) {
            Ok(Self(points))
        } else {
            Err(ScoreTableError(points))
        }
    }

    /// Points for clearing `lines` rows with a single lock.
    ///
    /// Zero lines award nothing; more than four lines award the four-line value.
    #[must_use]
    pub fn points_for(&self, lines: usize) -> u32 {
        match lines {
            0 => 0,
            n => self.0[n.min(self.0.len()) - 1],
        }
    }
}

impl Default for ScoreTable {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<[u32; 4]> for ScoreTable {
    type Error = ScoreTableError;

    fn try_from(points: [u32; 4]) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<ScoreTable> for [u32; 4] {
    fn from(table: ScoreTable) -> Self {
        table.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_speeds() -> impl Iterator<Item = Speed> {
        (1..=6).map(|level| Speed::new(level).unwrap())
    }

    #[test]
    fn test_speed_bounds() {
        assert_eq!(Speed::new(1), Ok(Speed::MIN));
        assert_eq!(Speed::new(6), Ok(Speed::MAX));
        assert_eq!(Speed::new(0), Err(InvalidSpeedError(0)));
        assert_eq!(Speed::new(7), Err(InvalidSpeedError(7)));
    }

    #[test]
    fn test_tick_interval_is_non_increasing() {
        let intervals: Vec<_> = all_speeds().map(tick_interval_for).collect();
        assert_eq!(intervals[0], Duration::from_millis(800));
        assert_eq!(intervals[5], Duration::from_millis(160));
        for pair in intervals.windows(2) {
            assert!(pair[0] >= pair[1], "{pair:?}");
        }
    }

    #[test]
    fn test_speed_for_cleared_lines() {
        let init = Speed::new(1).unwrap();
        assert_eq!(speed_for(init, 0).get(), 1);
        assert_eq!(speed_for(init, 19).get(), 1);
        assert_eq!(speed_for(init, 20).get(), 2);
        assert_eq!(speed_for(init, 45).get(), 3);
        assert_eq!(speed_for(init, 100).get(), 6);
        assert_eq!(speed_for(init, u32::MAX).get(), 6);

        let init = Speed::new(5).unwrap();
        assert_eq!(speed_for(init, 0).get(), 5);
        assert_eq!(speed_for(init, 20).get(), 6);
        assert_eq!(speed_for(init, 40).get(), 6);
    }

    #[test]
    fn test_speed_for_is_monotonic() {
        for init in all_speeds() {
            let mut previous = speed_for(init, 0);
            assert_eq!(previous, init);
            for lines in 1..200 {
                let speed = speed_for(init, lines);
                assert!(speed >= previous);
                previous = speed;
            }
        }
    }

    #[test]
    fn test_default_points_are_strictly_increasing() {
        let table = ScoreTable::default();
        assert!(table.points_for(1) < table.points_for(2));
        assert!(table.points_for(2) < table.points_for(3));
        assert!(table.points_for(3) < table.points_for(4));
    }

    #[test]
    fn test_points_beyond_four_lines() {
        let table = ScoreTable::default();
        assert_eq!(table.points_for(5), table.points_for(4));
        assert_eq!(table.points_for(20), table.points_for(4));
    }

    #[test]
    fn test_custom_score_table() {
        let table = ScoreTable::new([1, 2, 3, 4]).unwrap();
        assert_eq!(table.points_for(3), 3);

        assert_eq!(
            ScoreTable::new([10, 5, 20, 30]),
            Err(ScoreTableError([10, 5, 20, 30]))
        );
    }

    #[test]
    fn test_serde_validates() {
        let speed: Speed = serde_json::from_str("4").unwrap();
        assert_eq!(speed.get(), 4);
        assert!(serde_json::from_str::<Speed>("9").is_err());

        let table: ScoreTable = serde_json::from_str("[40, 100, 300, 1200]").unwrap();
        assert_eq!(table.points_for(4), 1200);
        assert!(serde_json::from_str::<ScoreTable>("[1, 1, 1, 1]").is_err());
        assert_eq!(serde_json::to_string(&table).unwrap(), "[40,100,300,1200]");
    }
}
