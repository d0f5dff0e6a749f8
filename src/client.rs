//! Client struct definition
//!
//! Represents a live connection and its outbound message queue.

use tokio::sync::mpsc;

use crate::error::SendError;
use crate::message::ServerMessage;

/// Sending half of a connection's outbound queue
pub type ClientSender = mpsc::UnboundedSender<ServerMessage>;

/// Connected client information
///
/// Holds the channel feeding the connection's WebSocket writer task. The
/// queue is unbounded so game-state events are never dropped while a
/// socket is slow; it drains or the connection closes.
#[derive(Debug)]
pub struct Client {
    /// Server → Client message channel
    pub sender: ClientSender,
}

impl Client {
    /// Create a new client around its sender channel
    pub fn new(sender: ClientSender) -> Self {
        Self { sender }
    }

    /// Queue a message for this client without waiting
    ///
    /// Fails only once the client's writer task has gone away.
    pub fn send(&self, msg: ServerMessage) -> Result<(), SendError> {
        self.sender.send(msg).map_err(|_| SendError::ChannelClosed)
    }
}
