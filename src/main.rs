//! Kalah - terminal client for the engine and orchestrator.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use kalah::{AI_STORE, Game, HttpOracle, Orchestrator, Player, Settings, USER_STORE};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            config,
            oracle_url,
            first,
        } => run_play(config, oracle_url, first.into()).await,
    }
}

/// Run a terminal game against the automated opponent
async fn run_play(config: PathBuf, oracle_url: Option<String>, first: Player) -> Result<()> {
    // Logs go to stderr at warn level by default so the board stays readable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let mut settings = if config.exists() {
        Settings::from_file(&config)?
    } else {
        info!(path = %config.display(), "No settings file, using defaults");
        Settings::default()
    };
    settings = settings.resolve_env();
    if let Some(url) = oracle_url {
        settings = settings.with_oracle_url(url);
    }

    let game = Arc::new(Mutex::new(Game::new()));

    // Bridge committed-state notifications into the render loop
    let (tx, mut rx) = mpsc::unbounded_channel::<()>();
    let subscription = {
        let mut game = game.lock().unwrap();
        game.subscribe(move || {
            let _ = tx.send(());
        })
    };

    let oracle = HttpOracle::new(settings.oracle_url().clone(), settings.request_timeout())?;
    let orchestrator = Orchestrator::new(Arc::clone(&game), Arc::new(oracle), settings.pacing());

    println!("Kalah - your pits are 1-6 on the bottom row; the AI owns the top row.");
    orchestrator.start_game(first);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            notice = rx.recv() => {
                if notice.is_none() {
                    break;
                }
                render(&game);
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !handle_line(&orchestrator, &game, line.trim()) {
                    break;
                }
            }
        }
    }

    game.lock().unwrap().unsubscribe(subscription);
    orchestrator.cancel_pending();
    Ok(())
}

/// Handles one line of user input; returns false to quit.
fn handle_line(orchestrator: &Orchestrator, game: &Arc<Mutex<Game>>, line: &str) -> bool {
    if line.eq_ignore_ascii_case("q") {
        return false;
    }

    let (over, user_turn) = {
        let game = game.lock().unwrap();
        let state = game.state();
        (state.is_over(), state.current_player() == Player::User)
    };

    if over {
        match line {
            "u" => orchestrator.start_game(Player::User),
            "a" => orchestrator.start_game(Player::Ai),
            _ => println!("Play again? [u]ser first, [a]i first, or q to quit."),
        }
        return true;
    }

    if !user_turn {
        println!("Hold on - the AI is still moving.");
        return true;
    }

    match line.parse::<usize>() {
        Ok(n @ 1..=6) => {
            let pit = n - 1;
            if game.lock().unwrap().is_legal(pit, Player::User) {
                orchestrator.handle_human_move(pit);
            } else {
                println!("Pit {n} is empty - pick another.");
            }
        }
        _ => println!("Enter a pit number 1-6, or q to quit."),
    }
    true
}

/// Redraws the board and prompt for the current state.
fn render(game: &Arc<Mutex<Game>>) {
    let game = game.lock().unwrap();
    let state = game.state();

    println!("\n{}", state.board().display());
    println!("{}", state.status());

    if state.is_over() {
        println!(
            "Final score - you: {}, AI: {}.",
            state.board().slots()[USER_STORE],
            state.board().slots()[AI_STORE]
        );
        println!("Play again? [u]ser first, [a]i first, or q to quit.");
    } else if state.current_player() == Player::User {
        println!("Pick a pit [1-6], or q to quit:");
    }
}
