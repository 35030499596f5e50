use std::path::PathBuf;

use blockfall_engine::BestScoreStore as _;

use crate::best_score_file::{BestScoreFile, DEFAULT_BEST_SCORE_FILE};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct BestScoreArg {
    /// File where the best score is kept
    #[clap(long, default_value = DEFAULT_BEST_SCORE_FILE)]
    best_score_file: PathBuf,
    /// Reset the stored best score to zero
    #[clap(long)]
    reset: bool,
}

pub(crate) fn run(arg: &BestScoreArg) -> anyhow::Result<()> {
    let BestScoreArg {
        best_score_file,
        reset,
    } = arg;

    let mut store = BestScoreFile::open(best_score_file)?;
    if *reset {
        store.save(0)?;
        eprintln!("Best score reset in {}", store.path().display());
    }
    println!("{}", store.load());
    Ok(())
}
