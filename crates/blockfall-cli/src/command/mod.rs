use clap::{Parser, Subcommand};

use self::{best_score::BestScoreArg, play::PlayArg};

mod best_score;
mod play;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None, args_conflicts_with_subcommands = true)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
    /// Options for the default `play` mode
    #[clap(flatten)]
    play: PlayArg,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play in the terminal (default)
    Play(#[clap(flatten)] PlayArg),
    /// Show or reset the stored best score
    BestScore(#[clap(flatten)] BestScoreArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Play(args.play)) {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::BestScore(arg) => best_score::run(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_command_definition() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_play() {
        let args = CommandArgs::try_parse_from(["blockfall", "--init-lines", "2"]).unwrap();
        assert!(args.mode.is_none());
        assert_eq!(args.play.engine_config().unwrap().init_lines, 2);
    }

    #[test]
    fn test_play_flags() {
        let args = CommandArgs::try_parse_from([
            "blockfall",
            "play",
            "--init-speed",
            "3",
            "--init-lines",
            "4",
            "--seed",
            "000102030405060708090a0b0c0d0e0f",
        ])
        .unwrap();
        let Some(Mode::Play(arg)) = args.mode else {
            panic!("expected play mode");
        };
        let config = arg.engine_config().unwrap();
        assert_eq!(config.init_speed.get(), 3);
        assert_eq!(config.init_lines, 4);
        assert!(config.seed.is_some());
    }

    #[test]
    fn test_rejects_out_of_range_speed() {
        assert!(CommandArgs::try_parse_from(["blockfall", "play", "--init-speed", "7"]).is_err());
        assert!(CommandArgs::try_parse_from(["blockfall", "play", "--init-lines", "11"]).is_err());
    }
}
