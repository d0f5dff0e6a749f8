//! Broadcast relay
//!
//! Registry of live connections with fan-out helpers. Room membership is
//! owned by the rooms themselves; callers pass the member ids to reach.

use std::collections::HashMap;

use tracing::warn;

use crate::client::{Client, ClientSender};
use crate::message::ServerMessage;
use crate::types::ClientId;

/// All live connections: ClientId -> Client
#[derive(Debug, Default)]
pub struct Relay {
    clients: HashMap<ClientId, Client>,
}

impl Relay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection's outbound queue
    pub fn register(&mut self, client_id: ClientId, sender: ClientSender) {
        self.clients.insert(client_id, Client::new(sender));
    }

    /// Forget a connection
    pub fn unregister(&mut self, client_id: ClientId) -> bool {
        self.clients.remove(&client_id).is_some()
    }

    pub fn contains(&self, client_id: ClientId) -> bool {
        self.clients.contains_key(&client_id)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Deliver to a single connection
    pub fn send_to(&self, client_id: ClientId, msg: ServerMessage) {
        let Some(client) = self.clients.get(&client_id) else {
            return;
        };
        let event = msg.event_name();
        if let Err(e) = client.send(msg) {
            warn!("Dropped {} for client {}: {}", event, client_id, e);
        }
    }

    /// Deliver to every listed member
    pub fn broadcast<I>(&self, members: I, msg: &ServerMessage)
    where
        I: IntoIterator<Item = ClientId>,
    {
        for client_id in members {
            self.send_to(client_id, msg.clone());
        }
    }

    /// Deliver to every listed member except `exclude`
    pub fn broadcast_except<I>(&self, members: I, exclude: ClientId, msg: &ServerMessage)
    where
        I: IntoIterator<Item = ClientId>,
    {
        self.broadcast(members.into_iter().filter(|id| *id != exclude), msg);
    }
}
