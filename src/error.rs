//! Error types for the game server
//!
//! Defines application-level errors, configuration errors and message
//! send errors. Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Application-level errors
///
/// Covers both fatal errors (connection termination) and
/// request errors (reported privately to the requesting client).
#[derive(Debug, Error)]
pub enum AppError {
    /// WebSocket protocol error (fatal)
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// JSON serialization/deserialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error (fatal)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Channel send error (fatal - internal channel broken)
    #[error("Channel send error")]
    ChannelSend,

    /// Handshake refused because the Origin header is not allow-listed
    #[error("Connection from {0} refused: origin not allowed")]
    OriginRejected(String),

    /// Request is missing required input
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Configuration errors
///
/// Raised at startup; the server refuses to start with a bad value.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Variable is not a valid number
    #[error("{key} must be a number, got '{value}'")]
    InvalidNumber { key: &'static str, value: String },

    /// Variable must be greater than zero
    #[error("{key} must be greater than zero")]
    NotPositive { key: &'static str },
}

/// Message send errors
///
/// Occurs when a message cannot be queued for a client.
#[derive(Debug, Error)]
pub enum SendError {
    /// The receiving end of the channel has been closed
    #[error("Channel closed")]
    ChannelClosed,
}
