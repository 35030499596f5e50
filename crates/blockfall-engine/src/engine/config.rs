use serde::{Deserialize, Serialize};

use crate::{ConfigError, PieceSeed, ScoreTable, Speed};

/// Upper bound for [`EngineConfig::init_lines`], half the board height.
pub const MAX_INIT_LINES: u8 = 10;

/// Settings fixed for the lifetime of a [`GameEngine`](crate::GameEngine).
///
/// Every field has a default, so a partial JSON document is accepted:
///
/// ```
/// use blockfall_engine::EngineConfig;
///
/// let config: EngineConfig = serde_json::from_str(r#"{ "init_speed": 3 }"#).unwrap();
/// assert_eq!(config.init_speed.get(), 3);
/// assert_eq!(config.init_lines, 0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Speed level every game starts at.
    pub init_speed: Speed,
    /// Number of garbage rows at the bottom of a fresh board.
    pub init_lines: u8,
    pub score_table: ScoreTable,
    /// Seed for piece generation; random when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<PieceSeed>,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.init_lines > MAX_INIT_LINES {
            return Err(ConfigError::TooManyInitLines(self.init_lines));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.init_speed, Speed::MIN);
        assert_eq!(config.init_lines, 0);
        assert_eq!(config.score_table, ScoreTable::DEFAULT);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_empty_document_is_default() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_full_document() {
        let json = r#"{
            "init_speed": 2,
            "init_lines": 4,
            "score_table": [40, 100, 300, 1200],
            "seed": "00000000000000000000000000000001"
        }"#;
        let config: EngineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.init_speed.get(), 2);
        assert_eq!(config.init_lines, 4);
        assert_eq!(config.score_table.points_for(2), 100);
        assert_eq!(
            config.seed.map(|seed| seed.to_string()).as_deref(),
            Some("00000000000000000000000000000001")
        );
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(serde_json::from_str::<EngineConfig>(r#"{ "init_speed": 0 }"#).is_err());
        assert!(serde_json::from_str::<EngineConfig>(r#"{ "colour": "red" }"#).is_err());

        let config = EngineConfig {
            init_lines: MAX_INIT_LINES + 1,
            ..EngineConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::TooManyInitLines(MAX_INIT_LINES + 1))
        );
    }
}
