use std::path::{Path, PathBuf};

use anyhow::Context as _;
use blockfall_engine::BestScoreStore;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::util;

pub const DEFAULT_BEST_SCORE_FILE: &str = "./data/best_score.json";

const FILE_KIND: &str = "best score";

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct BestScoreRecord {
    best_score: u32,
}

/// Best score persisted as `{ "best_score": n }`.
///
/// The file is read once by [`open`](Self::open); a missing file counts as 0.
#[derive(Debug)]
pub struct BestScoreFile {
    path: PathBuf,
    best_score: u32,
}

impl BestScoreFile {
    pub fn open<P>(path: P) -> anyhow::Result<Self>
    where
        P: Into<PathBuf>,
    {
        let path = path.into();
        let exists = path
            .try_exists()
            .with_context(|| format!("Failed to access {FILE_KIND} file: {}", path.display()))?;
        let best_score = if exists {
            util::read_json_file::<BestScoreRecord, _>(FILE_KIND, &path)?.best_score
        } else {
            0
        };
        debug!(path = %path.display(), best_score, "best score loaded");
        Ok(Self { path, best_score })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BestScoreStore for BestScoreFile {
    type Error = anyhow::Error;

    fn load(&self) -> u32 {
        self.best_score
    }

    fn save(&mut self, best_score: u32) -> anyhow::Result<()> {
        util::write_json_file(FILE_KIND, &self.path, &BestScoreRecord { best_score })?;
        debug!(path = %self.path.display(), best_score, "best score saved");
        self.best_score = best_score;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_missing_file_is_zero() {
        let dir = TempDir::new().unwrap();
        let store = BestScoreFile::open(dir.path().join("best_score.json")).unwrap();
        assert_eq!(store.load(), 0);
    }

    #[test]
    fn test_record_writes_and_reloads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("best_score.json");
        let mut store = BestScoreFile::open(&path).unwrap();

        assert!(store.record(1200).unwrap());
        assert!(!store.record(700).unwrap());

        let reopened = BestScoreFile::open(&path).unwrap();
        assert_eq!(reopened.load(), 1200);
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json, serde_json::json!({ "best_score": 1200 }));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("best_score.json");
        fs::write(&path, "{ \"best\": ").unwrap();

        let err = BestScoreFile::open(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse best score JSON file"));
    }

    #[test]
    fn test_temp_dir_is_removed_after_failed_assertion() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().to_path_buf();

        let result = std::panic::catch_unwind(move || {
            let mut store = BestScoreFile::open(dir.path().join("best_score.json")).unwrap();
            store.record(10).unwrap();
            assert_eq!(store.load(), 0, "deliberate failure");
        });

        assert!(result.is_err());
        assert!(!root.exists());
    }
}
