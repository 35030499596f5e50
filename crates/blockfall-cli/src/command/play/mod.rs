use std::path::PathBuf;

use anyhow::Context as _;
use blockfall_engine::{BestScoreStore as _, EngineConfig, GameEngine, PieceSeed, Speed};
use ratatui_runtime::Runtime;
use tracing::{info, level_filters::LevelFilter};

use crate::{
    best_score_file::{BestScoreFile, DEFAULT_BEST_SCORE_FILE},
    logging, util,
};

use self::app::PlayApp;

mod app;
mod keyboard;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Speed level every game starts at (1-6)
    #[clap(long, value_parser = clap::value_parser!(u8).range(1..=6))]
    init_speed: Option<u8>,
    /// Number of garbage rows at the bottom of a fresh board (0-10)
    #[clap(long, value_parser = clap::value_parser!(u8).range(0..=10))]
    init_lines: Option<u8>,
    /// Seed for piece generation, as 32 hex digits
    #[clap(long)]
    seed: Option<PieceSeed>,
    /// Engine settings file (JSON); command line flags take precedence
    #[clap(long)]
    config: Option<PathBuf>,
    /// File where the best score is kept
    #[clap(long, default_value = DEFAULT_BEST_SCORE_FILE)]
    best_score_file: PathBuf,
    /// Write logs to this file
    #[clap(long)]
    log_file: Option<PathBuf>,
    /// Maximum level of logged events
    #[clap(long, default_value = "info")]
    log_level: LevelFilter,
}

impl PlayArg {
    pub(crate) fn engine_config(&self) -> anyhow::Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_json_file("engine config", path)?,
            None => EngineConfig::default(),
        };
        if let Some(level) = self.init_speed {
            config.init_speed = Speed::new(level)?;
        }
        if let Some(lines) = self.init_lines {
            config.init_lines = lines;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        config.validate().context("Invalid engine config")?;
        Ok(config)
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    logging::init(arg.log_file.as_deref(), arg.log_level)?;

    let config = arg.engine_config()?;
    let store = BestScoreFile::open(&arg.best_score_file)?;
    let engine = GameEngine::with_store(config, &store)?;
    info!(config = ?engine.config(), best_score = store.load(), "starting play");

    let mut app = PlayApp::new(engine, store);
    Runtime::new().run(&mut app)?;

    let points = app.engine().state().points();
    let mut store = app.into_store();
    if store.record(points)? {
        info!(points, "new best score");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use clap::Parser as _;
    use tempfile::TempDir;

    use super::*;

    #[derive(Debug, clap::Parser)]
    struct Cli {
        #[clap(flatten)]
        play: PlayArg,
    }

    fn parse(args: &[&str]) -> PlayArg {
        Cli::try_parse_from(iter_args(args)).unwrap().play
    }

    fn iter_args<'a>(args: &'a [&'a str]) -> impl Iterator<Item = &'a str> {
        std::iter::once("play").chain(args.iter().copied())
    }

    #[test]
    fn test_defaults() {
        let arg = parse(&[]);
        assert_eq!(arg.engine_config().unwrap(), EngineConfig::default());
        assert_eq!(arg.best_score_file, PathBuf::from(DEFAULT_BEST_SCORE_FILE));
        assert_eq!(arg.log_level, LevelFilter::INFO);
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("engine.json");
        fs::write(&path, r#"{ "init_speed": 2, "init_lines": 3 }"#).unwrap();

        let path_arg = path.to_str().unwrap();
        let arg = parse(&["--config", path_arg, "--init-speed", "5"]);
        let config = arg.engine_config().unwrap();
        assert_eq!(config.init_speed.get(), 5);
        assert_eq!(config.init_lines, 3);

        fs::write(&path, r#"{ "init_lines": 12 }"#).unwrap();
        assert!(parse(&["--config", path_arg]).engine_config().is_err());
    }

    #[test]
    fn test_bad_seed_is_rejected() {
        assert!(Cli::try_parse_from(iter_args(&["--seed", "xyz"])).is_err());
    }
}
