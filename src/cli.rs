//! Command-line interface for football_quiz.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Football Quiz - trivia Bingo and Tic-Tac-Toe in the terminal
#[derive(Parser, Debug)]
#[command(name = "football_quiz")]
#[command(about = "Football trivia Bingo and Tic-Tac-Toe", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML config file (defaults apply if it does not exist)
    #[arg(long, global = true, default_value = "football_quiz.toml")]
    pub config: PathBuf,

    /// Profile JSON file, overriding the config
    #[arg(long, global = true)]
    pub profile: Option<PathBuf>,

    /// RNG seed for a reproducible game, overriding the config
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Play Football Bingo
    Bingo,

    /// Play quiz Tic-Tac-Toe against the computer
    #[command(name = "tictactoe")]
    TicTacToe,

    /// Show the saved profile and statistics
    Profile,

    /// Change the player name
    SetName {
        /// New display name
        name: String,
    },

    /// Clear high scores and game history
    ResetScores,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::parse_from(["football_quiz", "tictactoe", "--seed", "9"]);
        assert_eq!(cli.command, Command::TicTacToe);
        assert_eq!(cli.seed, Some(9));
        assert_eq!(cli.config, PathBuf::from("football_quiz.toml"));

        let cli = Cli::parse_from(["football_quiz", "--profile", "me.json", "set-name", "Ada"]);
        assert_eq!(
            cli.command,
            Command::SetName {
                name: "Ada".to_string()
            }
        );
        assert_eq!(cli.profile, Some(PathBuf::from("me.json")));
    }

    #[test]
    fn test_reset_scores_name() {
        let cli = Cli::parse_from(["football_quiz", "reset-scores"]);
        assert_eq!(cli.command, Command::ResetScores);
    }
}
