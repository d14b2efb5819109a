use clap::{Parser, Subcommand};

use self::{auto_play::AutoPlayArg, solve_filter::SolveFilterArg, theme::ThemeArg};

mod auto_play;
mod solve_filter;
mod theme;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play a headless game with the placement AI and report the result
    AutoPlay(#[clap(flatten)] AutoPlayArg),
    /// Find the CSS filter chain that turns black into a color
    SolveFilter(#[clap(flatten)] SolveFilterArg),
    /// Generate a random color theme
    Theme(#[clap(flatten)] ThemeArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::AutoPlay(arg) => auto_play::run(&arg)?,
        Mode::SolveFilter(arg) => solve_filter::run(&arg)?,
        Mode::Theme(arg) => theme::run(&arg)?,
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
    fn test_parse_subcommands() {
        let args = CommandArgs::try_parse_from([
            "stackbot",
            "auto-play",
            "--seed",
            "3",
            "--lines",
            "0.9",
            "--no-lookahead",
        ])
        .unwrap();
        assert!(matches!(args.mode, Mode::AutoPlay(_)));

        let args = CommandArgs::try_parse_from(["stackbot", "solve-filter", "#0af"]).unwrap();
        assert!(matches!(args.mode, Mode::SolveFilter(_)));

        assert!(CommandArgs::try_parse_from(["stackbot", "solve-filter", "blue"]).is_err());
        assert!(CommandArgs::try_parse_from(["stackbot"]).is_err());
    }
}
