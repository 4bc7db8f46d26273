//! Tic-tac-toe game service
//!
//! A small REST service that creates games, validates moves, and
//! detects wins and draws.
//!
//! # Architecture
//!
//! - **Engine**: pure [`GameState`] transitions (no I/O, no locking)
//! - **Store**: [`GameStore`] implementations that own ids, timestamps,
//!   and per-game serialization of moves (in memory or SQLite)
//! - **API**: axum routes mapping HTTP requests onto the store
//! - **Client**: [`GameClient`] for talking to a running server
//!
//! # Example
//!
//! ```
//! use tictactoe_server::{GameState, Mark, MoveError};
//!
//! let game = GameState::new();
//! let game = game.apply_move(4)?;
//! assert_eq!(game.current_player(), Mark::O);
//! assert!(matches!(game.apply_move(4), Err(MoveError::CellOccupied(_))));
//! # Ok::<(), MoveError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod api;
mod client;
mod config;
mod games;
mod server;
mod store;

// Crate-level exports - Game engine (tic-tac-toe)
pub use games::tictactoe::{
    Board, Cell, GameState, GameStatus, Mark, MoveError, Position, apply_move, get_state,
    new_game, rules,
};

// Crate-level exports - Persistence
pub use store::{DbError, GameId, GameRecord, GameStore, MemoryStore, SqliteStore, StoreError};

// Crate-level exports - HTTP API
pub use api::{ApiError, AppState, ErrorBody, GameView, MoveRequest, router};

// Crate-level exports - Client
pub use client::{ClientError, GameClient};

// Crate-level exports - Configuration
pub use config::{ConfigError, ServerConfig, StoreBackend};

// Crate-level exports - Server
pub use server::{open_store, run, serve_on};
