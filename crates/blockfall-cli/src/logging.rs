use std::{fs::OpenOptions, path::Path, sync::Mutex};

use anyhow::Context as _;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::util::SubscriberInitExt as _;

/// Installs the global log subscriber.
///
/// The terminal is taken by the UI, so logs only go to `log_file`. Without a
/// file no subscriber is installed and every event is dropped.
pub fn init(log_file: Option<&Path>, level: LevelFilter) -> anyhow::Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .compact()
        .finish()
        .try_init()
        .context("Failed to install log subscriber")?;
    Ok(())
}
