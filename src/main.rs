//! Tic-tac-toe server - unified CLI
//!
//! Runs the HTTP game server or talks to one as a client.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use tictactoe_server::{GameClient, GameId, GameStatus, GameView, ServerConfig};
use tracing::{info, instrument};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    initialize_tracing();

    let client = GameClient::new(&cli.server_url);
    match cli.command {
        Command::Serve {
            config,
            host,
            port,
            backend,
            database_url,
        } => {
            let mut config = ServerConfig::load(config.as_deref())?;
            if let Some(host) = host {
                config = config.with_host(host);
            }
            if let Some(port) = port {
                config = config.with_port(port);
            }
            if let Some(backend) = backend {
                config = config.with_backend(backend);
            }
            if let Some(url) = database_url {
                config = config.with_database_url(url);
            }
            tictactoe_server::run(&config).await
        }
        Command::New => {
            let game = client.new_game().await.context("Failed to start game")?;
            print_game(&game)
        }
        Command::Move { id, position } => {
            let game = client
                .make_move(GameId::from(id), position)
                .await
                .context("Move rejected")?;
            print_game(&game)
        }
        Command::Show { id } => {
            let game = client
                .get_game(GameId::from(id))
                .await
                .context("Failed to load game")?;
            print_game(&game)
        }
        Command::Delete { id } => {
            client
                .delete_game(GameId::from(id))
                .await
                .context("Failed to delete game")?;
            println!("Game {} deleted", id);
            Ok(())
        }
    }
}

#[instrument(skip(game), fields(game_id = %game.id))]
fn print_game(game: &GameView) -> Result<()> {
    let state = game.to_state().context("Server sent an inconsistent game")?;
    let status = match state.status() {
        GameStatus::InProgress => format!("Player {} to move.", state.current_player()),
        GameStatus::Won(mark) => format!("Player {} wins!", mark),
        GameStatus::Draw => "Game ended in a draw!".to_string(),
    };
    println!("Game {} (created {})", game.id, game.created_at);
    println!("{}\n\n{}", status, state.board().display());
    Ok(())
}

fn initialize_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tictactoe_server=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Tracing initialized");
}
