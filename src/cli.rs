//! Command-line interface for tictactoe_server.

use clap::{Parser, Subcommand};
use tictactoe_server::StoreBackend;

/// Tic-tac-toe game service
#[derive(Parser, Debug)]
#[command(name = "tictactoe_server")]
#[command(about = "Tic-tac-toe game server and client", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Game server URL used by the client commands
    #[arg(long, global = true, default_value = "http://127.0.0.1:3000")]
    pub server_url: String,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Serve {
        /// Path to a TOML configuration file
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,

        /// Storage backend
        #[arg(long, value_enum)]
        backend: Option<StoreBackend>,

        /// SQLite database path
        #[arg(long)]
        database_url: Option<String>,
    },

    /// Start a new game on the server
    New,

    /// Play a move for the current player
    Move {
        /// Game id
        id: i64,

        /// Board position, 0-8 left-to-right, top-to-bottom
        #[arg(allow_hyphen_values = true)]
        position: i64,
    },

    /// Show a game
    Show {
        /// Game id
        id: i64,
    },

    /// Delete a game
    Delete {
        /// Game id
        id: i64,
    },
}
