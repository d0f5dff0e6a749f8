//! GameServer Actor implementation
//!
//! The central actor that owns all game state: live connections, rooms and
//! connection-room mappings. Every command runs to completion before the
//! next one is received, so rooms need no locking. Round timers are tasks
//! that post `RoundExpired` back into the same command queue.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::client::ClientSender;
use crate::error::AppError;
use crate::guess::{is_one_edit_away, normalize};
use crate::health::HealthReport;
use crate::message::{DrawSegment, ServerMessage};
use crate::relay::Relay;
use crate::room::Room;
use crate::types::{ClientId, EpochClock, RoomId};
use crate::words::WordCatalog;

/// Text of the `round-timeout` announcement
pub const ROUND_TIMEOUT_MESSAGE: &str = "Time is up. Rotating drawer.";
/// Private hint for a guess one edit away from the word
pub const CLOSE_GUESS_MESSAGE: &str = "You're so close!";
/// `join-error` text for a blank name or room id
pub const JOIN_FIELDS_REQUIRED: &str = "Both name and roomId are required.";

/// Commands sent to the GameServer actor
#[derive(Debug)]
pub enum ServerCommand {
    /// New client connected
    Connect {
        client_id: ClientId,
        sender: ClientSender,
    },
    /// Client disconnected
    Disconnect { client_id: ClientId },
    /// Join (or create) a room
    JoinRoom {
        client_id: ClientId,
        name: String,
        room_id: String,
    },
    /// Stroke from a client
    Draw {
        client_id: ClientId,
        segment: DrawSegment,
    },
    /// Guess or chat line
    Guess { client_id: ClientId, guess: String },
    /// Drawer wants another word
    RequestNewWord { client_id: ClientId },
    /// A round timer fired
    RoundExpired { room_id: RoomId, generation: u64 },
    /// Health probe asking for a report
    Health { reply: oneshot::Sender<HealthReport> },
}

/// The main GameServer actor
///
/// Holds the room store, the connection registry and the broadcast relay.
pub struct GameServer {
    /// Live connections
    relay: Relay,
    /// All active rooms: RoomId -> Room
    rooms: HashMap<RoomId, Room>,
    /// Client to room mapping: ClientId -> RoomId
    client_rooms: HashMap<ClientId, RoomId>,
    /// Command receiver channel
    receiver: mpsc::Receiver<ServerCommand>,
    /// Handle for round timers to reach this actor
    timer_tx: mpsc::WeakSender<ServerCommand>,
    round_duration: Duration,
    catalog: WordCatalog,
    clock: EpochClock,
}

impl GameServer {
    /// Create a new GameServer
    ///
    /// `timer_tx` must be a weak handle to the channel `receiver` reads, so
    /// that round timers can post expiry commands without keeping the
    /// server alive on their own.
    pub fn new(
        receiver: mpsc::Receiver<ServerCommand>,
        timer_tx: mpsc::WeakSender<ServerCommand>,
        round_duration: Duration,
    ) -> Self {
        Self {
            relay: Relay::new(),
            rooms: HashMap::new(),
            client_rooms: HashMap::new(),
            receiver,
            timer_tx,
            round_duration,
            catalog: WordCatalog::builtin(),
            clock: EpochClock::new(),
        }
    }

    /// Replace the word catalog
    pub fn with_catalog(mut self, catalog: WordCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Number of rooms currently alive
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Look up a room
    pub fn room(&self, room_id: &RoomId) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    /// Run the GameServer event loop
    ///
    /// Continuously receives and processes commands until all senders are dropped.
    pub async fn run(mut self) {
        info!("GameServer started");

        while let Some(cmd) = self.receiver.recv().await {
            self.handle_command(cmd);
        }

        for room in self.rooms.values_mut() {
            room.cancel_timer();
        }
        info!("GameServer shutting down");
    }

    /// Process a single command
    pub fn handle_command(&mut self, cmd: ServerCommand) {
        match cmd {
            ServerCommand::Connect { client_id, sender } => {
                self.handle_connect(client_id, sender);
            }
            ServerCommand::Disconnect { client_id } => {
                self.handle_disconnect(client_id);
            }
            ServerCommand::JoinRoom {
                client_id,
                name,
                room_id,
            } => {
                self.handle_join_room(client_id, name, room_id);
            }
            ServerCommand::Draw { client_id, segment } => {
                self.handle_draw(client_id, segment);
            }
            ServerCommand::Guess { client_id, guess } => {
                self.handle_guess(client_id, guess);
            }
            ServerCommand::RequestNewWord { client_id } => {
                self.handle_request_new_word(client_id);
            }
            ServerCommand::RoundExpired {
                room_id,
                generation,
            } => {
                self.handle_round_expired(room_id, generation);
            }
            ServerCommand::Health { reply } => {
                let _ = reply.send(HealthReport {
                    ok: true,
                    rooms: self.rooms.len(),
                });
            }
        }
    }

    /// Handle new client connection
    fn handle_connect(&mut self, client_id: ClientId, sender: ClientSender) {
        info!("Client {} connected", client_id);
        self.relay.register(client_id, sender);
        debug!(
            "Total clients: {}, Total rooms: {}",
            self.relay.len(),
            self.rooms.len()
        );
    }

    /// Handle client disconnection
    fn handle_disconnect(&mut self, client_id: ClientId) {
        info!("Client {} disconnected", client_id);

        self.leave_room(client_id);
        self.relay.unregister(client_id);

        debug!(
            "Total clients: {}, Total rooms: {}",
            self.relay.len(),
            self.rooms.len()
        );
    }

    /// Handle room joining
    fn handle_join_room(&mut self, client_id: ClientId, name: String, room_id: String) {
        if !self.relay.contains(client_id) {
            return;
        }

        let name = name.trim().to_string();
        let Some(room_id) = RoomId::parse(&room_id).filter(|_| !name.is_empty()) else {
            debug!("Client {} sent an incomplete join", client_id);
            self.relay.send_to(
                client_id,
                AppError::InvalidRequest(JOIN_FIELDS_REQUIRED.to_string()).into(),
            );
            return;
        };

        // Always start from a clean membership, even for the same room
        self.leave_room(client_id);

        let room = self.rooms.entry(room_id.clone()).or_insert_with(|| {
            info!("Room {} created", room_id);
            Room::new(room_id.clone())
        });
        room.add_player(client_id, name.clone());
        self.client_rooms.insert(client_id, room_id.clone());

        info!("Client {} joined room {} as '{}'", client_id, room_id, name);

        self.relay.send_to(
            client_id,
            ServerMessage::JoinedRoom {
                room_id: room_id.to_string(),
                player_id: client_id.to_string(),
            },
        );
        self.relay.broadcast(
            room.member_ids(),
            &ServerMessage::SystemMessage {
                message: format!("{name} joined the room."),
            },
        );

        if room.has_drawer() {
            self.relay.broadcast(room.member_ids(), &room.state_message());
        } else {
            self.start_round(&room_id, Some(0));
        }
    }

    /// Remove a client from its room and repair the round
    fn leave_room(&mut self, client_id: ClientId) {
        let Some(room_id) = self.client_rooms.remove(&client_id) else {
            return;
        };
        let Some(room) = self.rooms.get_mut(&room_id) else {
            return;
        };
        let Some(departure) = room.remove_player(client_id) else {
            return;
        };

        info!("Client {} left room {}", client_id, room_id);

        if room.is_empty() {
            room.cancel_timer();
            self.rooms.remove(&room_id);
            info!("Room {} deleted (empty)", room_id);
            return;
        }

        self.relay.broadcast(
            room.member_ids(),
            &ServerMessage::SystemMessage {
                message: format!("{} left the room.", departure.name),
            },
        );

        if departure.was_drawer {
            // Whoever slid into the vacated slot draws next
            let next = departure.index % room.player_count();
            self.start_round(&room_id, Some(next));
        } else {
            self.relay.broadcast(room.member_ids(), &room.state_message());
        }
    }

    /// Start a new round in a room
    ///
    /// Cancels the pending timer, picks the drawer (forced index or next in
    /// rotation) and a word, announces the round and arms a new timer.
    fn start_round(&mut self, room_id: &RoomId, forced: Option<usize>) {
        let Some(room) = self.rooms.get_mut(room_id) else {
            return;
        };

        room.cancel_timer();

        let Some(index) = room.next_drawer_index(forced) else {
            return;
        };
        let Some(picked) = self.catalog.pick(&mut rand::thread_rng()) else {
            warn!("Word catalog is empty, no round for room {}", room_id);
            room.clear_round();
            return;
        };

        let ends_at = self.clock.now_millis() + self.round_duration.as_millis() as u64;
        let Some(generation) = room.begin_round(index, &picked, ends_at) else {
            return;
        };
        let Some(round_start) = room.round_start_message() else {
            return;
        };
        let drawer_id = room.players[index].id;

        info!(
            "Round {} started in room {} (drawer: {})",
            generation, room_id, drawer_id
        );

        self.relay.broadcast(room.member_ids(), &ServerMessage::ClearCanvas);
        self.relay.broadcast(room.member_ids(), &round_start);
        self.relay.send_to(
            drawer_id,
            ServerMessage::YourWord {
                secret_word: room.secret_word.clone(),
            },
        );

        room.round_timer = Some(spawn_round_timer(
            self.timer_tx.clone(),
            room_id.clone(),
            generation,
            self.round_duration,
        ));

        self.relay.broadcast(room.member_ids(), &room.state_message());
    }

    /// Handle a fired round timer
    fn handle_round_expired(&mut self, room_id: RoomId, generation: u64) {
        let Some(room) = self.rooms.get_mut(&room_id) else {
            debug!("Round timer fired for deleted room {}", room_id);
            return;
        };

        if room.generation != generation || !room.has_active_round() {
            debug!(
                "Ignoring stale round timer {} for room {} (current: {})",
                generation, room_id, room.generation
            );
            return;
        }

        room.round_timer = None;
        info!("Round {} timed out in room {}", generation, room_id);

        self.relay.broadcast(
            room.member_ids(),
            &ServerMessage::RoundTimeout {
                secret_word: room.secret_word.clone(),
                message: ROUND_TIMEOUT_MESSAGE.to_string(),
            },
        );

        self.start_round(&room_id, None);
    }

    /// Handle a stroke segment
    fn handle_draw(&mut self, client_id: ClientId, segment: DrawSegment) {
        let Some(room) = self.room_of(client_id) else {
            return;
        };

        if !room.is_drawer(client_id) {
            debug!("Ignoring stroke from non-drawer {}", client_id);
            return;
        }

        self.relay.broadcast_except(
            room.member_ids(),
            client_id,
            &ServerMessage::RenderLine(segment),
        );
    }

    /// Handle a guess (or chat line)
    fn handle_guess(&mut self, client_id: ClientId, guess: String) {
        let Some(room_id) = self.client_rooms.get(&client_id).cloned() else {
            return;
        };
        let Some(room) = self.rooms.get_mut(&room_id) else {
            return;
        };

        if !room.has_active_round() || room.is_drawer(client_id) {
            return;
        }
        let Some(guesser) = room.player(client_id).cloned() else {
            return;
        };

        let normalized = normalize(&guess);
        if normalized.is_empty() {
            return;
        }
        let secret = normalize(&room.secret_word);

        if normalized == secret {
            let Some(award) = room.award_correct_guess(client_id) else {
                return;
            };

            info!(
                "Client {} guessed '{}' in room {}",
                client_id, award.secret_word, room_id
            );

            self.relay.broadcast(
                room.member_ids(),
                &ServerMessage::CorrectGuess {
                    guesser_id: award.guesser.id.to_string(),
                    guesser_name: award.guesser.name,
                    drawer_id: award.drawer.id.to_string(),
                    drawer_name: award.drawer.name,
                    secret_word: award.secret_word,
                },
            );
            self.relay.broadcast(room.member_ids(), &room.state_message());

            self.start_round(&room_id, None);
            return;
        }

        if is_one_edit_away(&normalized, &secret) {
            self.relay.send_to(
                client_id,
                ServerMessage::GuessFeedback {
                    message: CLOSE_GUESS_MESSAGE.to_string(),
                },
            );
        }

        self.relay.broadcast(
            room.member_ids(),
            &ServerMessage::GuessMessage {
                player_id: guesser.id.to_string(),
                player_name: guesser.name,
                guess: guess.trim().to_string(),
            },
        );
    }

    /// Handle a drawer asking for a different word
    fn handle_request_new_word(&mut self, client_id: ClientId) {
        let Some(room) = self.room_of(client_id) else {
            return;
        };

        if !room.is_drawer(client_id) {
            debug!("Ignoring new word request from non-drawer {}", client_id);
            return;
        }

        let room_id = room.id.clone();
        let index = room.current_drawer_index;
        info!("Drawer {} requested a new word in room {}", client_id, room_id);

        self.start_round(&room_id, index);
    }

    /// Helper: Get the room a client is in
    fn room_of(&self, client_id: ClientId) -> Option<&Room> {
        self.client_rooms
            .get(&client_id)
            .and_then(|room_id| self.rooms.get(room_id))
    }
}

/// Spawn a task that reports round expiry after `duration`
fn spawn_round_timer(
    commands: mpsc::WeakSender<ServerCommand>,
    room_id: RoomId,
    generation: u64,
    duration: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(duration).await;

        let Some(commands) = commands.upgrade() else {
            return;
        };
        let _ = commands
            .send(ServerCommand::RoundExpired {
                room_id,
                generation,
            })
            .await;
    })
}
