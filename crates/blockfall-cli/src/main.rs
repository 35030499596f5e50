mod best_score_file;
mod command;
mod logging;
mod ui;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
