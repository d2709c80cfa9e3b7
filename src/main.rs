//! Football Quiz - terminal front end
//!
//! Loads configuration and the player profile, then runs the chosen game
//! or profile command.

#![warn(missing_docs)]

mod cli;
mod terminal;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use football_quiz::{GameConfig, GameMode, JsonFileStorage, ProfileService};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Logs go to stderr so they never interleave with the game on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let mut profile = ProfileService::load(JsonFileStorage::new(config.profile_path().clone()));

    match cli.command {
        Command::Bingo => terminal::run_bingo(&config, &mut profile).await,
        Command::TicTacToe => terminal::run_tictactoe(&config, &mut profile).await,
        Command::Profile => show_profile(&profile),
        Command::SetName { name } => {
            profile.set_name(&name)?;
            println!("Player name set to {}", profile.profile().player_name());
            Ok(())
        }
        Command::ResetScores => {
            profile.reset_scores()?;
            println!("High scores and history cleared.");
            Ok(())
        }
    }
}

/// Reads the config file and applies command-line overrides.
#[instrument(skip(cli), fields(config = %cli.config.display()))]
fn load_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = GameConfig::load_or_default(&cli.config)?;
    if let Some(path) = &cli.profile {
        config = config.with_profile_path(path.clone());
    }
    if let Some(seed) = cli.seed {
        config = config.with_seed(Some(seed));
    }
    info!(profile = %config.profile_path().display(), "Configuration ready");
    Ok(config)
}

/// Prints the profile summary.
fn show_profile(profile: &ProfileService) -> Result<()> {
    let user = profile.profile();
    let stats = profile.stats();
    println!("Player: {}", user.player_name());
    println!("Bingo high score: {}", user.high_score(GameMode::Bingo));
    println!(
        "Tic-Tac-Toe high score: {}",
        user.high_score(GameMode::TicTacToe)
    );
    println!(
        "Tic-Tac-Toe record: {} played, {} won, {} lost, {} drawn ({:.0}% wins)",
        stats.total_games(),
        stats.wins(),
        stats.losses(),
        stats.draws(),
        stats.win_rate()
    );
    println!("Total points: {}", user.total_points());
    for record in user.tic_tac_toe().history().iter().rev().take(5) {
        println!(
            "  {}  {:<4}  {} pts",
            record.date().format("%Y-%m-%d %H:%M"),
            record.result().as_str(),
            record.score()
        );
    }
    println!("Achievements:");
    for achievement in profile.achievements() {
        let mark = if *achievement.unlocked() { "x" } else { " " };
        println!(
            "  [{}] {:<16}  {}",
            mark,
            achievement.kind(),
            achievement.kind().description()
        );
    }
    Ok(())
}
