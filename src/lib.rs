//! Draw-and-guess WebSocket Game Server Library
//!
//! A multiplayer drawing game server built with tokio-tungstenite using
//! the Actor pattern for state management. One player per room draws a
//! secret word while the others guess.
//!
//! # Features
//! - Rooms created on first join, deleted when the last player leaves
//! - Round-robin drawer rotation with timed rounds
//! - Stroke relay from the drawer to everyone else
//! - Exact and near-miss (one edit away) guess detection with scoring
//! - Guesses double as the room's chat
//! - Origin allow-list enforced during the WebSocket handshake
//! - `GET /health` on the same port reports the number of live rooms
//!
//! # Architecture
//! Uses the Actor pattern with `mpsc` channels:
//! - `GameServer` is the central actor managing all state
//! - Each connection has a `handler` task communicating with the server
//! - Round timers post expiry commands into the same queue
//! - No locks needed - all state access goes through message passing
//!
//! # Example
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tokio::net::TcpListener;
//! use tokio::sync::mpsc;
//! use sketch_server::{serve, GameServer, OriginPolicy};
//!
//! #[tokio::main]
//! async fn main() {
//!     let listener = TcpListener::bind("127.0.0.1:3001").await.unwrap();
//!     let (cmd_tx, cmd_rx) = mpsc::channel(256);
//!
//!     let server = GameServer::new(cmd_rx, cmd_tx.downgrade(), Duration::from_secs(90));
//!     tokio::spawn(server.run());
//!
//!     serve(listener, cmd_tx, Arc::new(OriginPolicy::AllowAll)).await;
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod guess;
pub mod handler;
pub mod health;
pub mod message;
pub mod relay;
pub mod room;
pub mod server;
pub mod types;
pub mod words;

// Re-export main types for convenience
pub use client::Client;
pub use config::{Config, OriginPolicy};
pub use error::{AppError, ConfigError, SendError};
pub use guess::{is_one_edit_away, normalize};
pub use handler::{handle_connection, serve};
pub use health::HealthReport;
pub use message::{ClientMessage, DrawSegment, PlayerView, ServerMessage};
pub use relay::Relay;
pub use room::{Player, Room};
pub use server::{GameServer, ServerCommand};
pub use types::{ClientId, EpochClock, RoomId};
pub use words::{PickedWord, WordCatalog};
