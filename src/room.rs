//! Room struct definition
//!
//! A game session: ordered players, the drawer pointer, the active secret
//! and the pending round-expiry timer.

use tokio::task::JoinHandle;

use crate::message::{PlayerView, ServerMessage};
use crate::types::{ClientId, RoomId};
use crate::words::PickedWord;

/// Points for guessing the word
pub const GUESSER_POINTS: u32 = 100;
/// Points for the drawer when their word is guessed
pub const DRAWER_POINTS: u32 = 50;

/// A player in a room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: ClientId,
    pub name: String,
    pub score: u32,
}

/// Result of removing a player
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    /// Position the player held in join order
    pub index: usize,
    pub name: String,
    pub was_drawer: bool,
}

/// Names and ids involved in a correct guess, after scoring
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Award {
    pub guesser: Player,
    pub drawer: Player,
    pub secret_word: String,
}

/// Draw-and-guess room
///
/// Players are kept in join order, which is also the drawing rotation.
/// A room is never kept around with zero players.
#[derive(Debug)]
pub struct Room {
    /// Room identifier
    pub id: RoomId,
    /// Players in join order
    pub players: Vec<Player>,
    /// Index of the drawer in `players` (None before the first round)
    pub current_drawer_index: Option<usize>,
    /// Drawer's id, kept in step with `current_drawer_index`
    pub current_drawer: Option<ClientId>,
    /// Empty when no round is active
    pub secret_word: String,
    pub secret_category: Option<String>,
    /// Unix millis
    pub round_ends_at: Option<u64>,
    /// Pending round-expiry task
    pub round_timer: Option<JoinHandle<()>>,
    /// Bumped on every round start
    pub generation: u64,
}

impl Room {
    /// Create an empty room
    pub fn new(id: RoomId) -> Self {
        Self {
            id,
            players: Vec::new(),
            current_drawer_index: None,
            current_drawer: None,
            secret_word: String::new(),
            secret_category: None,
            round_ends_at: None,
            round_timer: None,
            generation: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Ids of all players, in join order
    pub fn member_ids(&self) -> impl Iterator<Item = ClientId> + '_ {
        self.players.iter().map(|p| p.id)
    }

    pub fn player(&self, client_id: ClientId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == client_id)
    }

    pub fn is_drawer(&self, client_id: ClientId) -> bool {
        self.current_drawer == Some(client_id)
    }

    pub fn has_drawer(&self) -> bool {
        self.current_drawer.is_some()
    }

    /// Whether a round is in progress
    pub fn has_active_round(&self) -> bool {
        !self.secret_word.is_empty()
    }

    /// Append a player with a zero score
    pub fn add_player(&mut self, id: ClientId, name: String) {
        self.players.push(Player { id, name, score: 0 });
    }

    /// Remove a player, keeping the drawer index pointing at the same player
    ///
    /// When the drawer leaves, the index keeps its value so the caller can
    /// hand the turn to whoever now occupies that slot.
    pub fn remove_player(&mut self, client_id: ClientId) -> Option<Departure> {
        let index = self.players.iter().position(|p| p.id == client_id)?;
        let was_drawer = self.is_drawer(client_id);
        let player = self.players.remove(index);

        if let Some(current) = self.current_drawer_index.as_mut() {
            if index < *current {
                *current -= 1;
            }
        }

        Some(Departure {
            index,
            name: player.name,
            was_drawer,
        })
    }

    /// Choose the next drawer index
    ///
    /// A forced index wraps around the player count; otherwise the turn
    /// passes to the next player in join order. None for an empty room.
    pub fn next_drawer_index(&self, forced: Option<usize>) -> Option<usize> {
        let count = self.players.len();
        if count == 0 {
            return None;
        }
        Some(match forced {
            Some(index) => index % count,
            None => self.current_drawer_index.map_or(0, |current| (current + 1) % count),
        })
    }

    /// Start a round with the player at `index` drawing `picked`
    ///
    /// Returns the new round generation, or None if `index` is out of range.
    pub fn begin_round(&mut self, index: usize, picked: &PickedWord, ends_at: u64) -> Option<u64> {
        let drawer = self.players.get(index)?.id;
        self.current_drawer_index = Some(index);
        self.current_drawer = Some(drawer);
        self.secret_word = picked.word.to_string();
        self.secret_category = picked.category.map(str::to_string);
        self.round_ends_at = Some(ends_at);
        self.generation += 1;
        Some(self.generation)
    }

    /// Drop the active round, keeping the rotation position
    pub fn clear_round(&mut self) {
        self.cancel_timer();
        self.current_drawer = None;
        self.secret_word.clear();
        self.secret_category = None;
        self.round_ends_at = None;
    }

    /// Abort the pending round-expiry task, if any
    pub fn cancel_timer(&mut self) {
        if let Some(timer) = self.round_timer.take() {
            timer.abort();
        }
    }

    /// Score a correct guess: guesser +100, drawer +50
    ///
    /// Returns None if either player is missing.
    pub fn award_correct_guess(&mut self, guesser_id: ClientId) -> Option<Award> {
        let drawer_id = self.current_drawer?;
        if drawer_id == guesser_id {
            return None;
        }
        let guesser_index = self.players.iter().position(|p| p.id == guesser_id)?;
        let drawer_index = self.players.iter().position(|p| p.id == drawer_id)?;

        let guesser = &mut self.players[guesser_index];
        guesser.score = guesser.score.saturating_add(GUESSER_POINTS);
        let guesser = guesser.clone();

        let drawer = &mut self.players[drawer_index];
        drawer.score = drawer.score.saturating_add(DRAWER_POINTS);
        let drawer = drawer.clone();

        Some(Award {
            guesser,
            drawer,
            secret_word: self.secret_word.clone(),
        })
    }

    /// Snapshot for the `room-state` event
    pub fn state_message(&self) -> ServerMessage {
        ServerMessage::RoomState {
            players: self
                .players
                .iter()
                .map(|p| PlayerView {
                    id: p.id.to_string(),
                    name: p.name.clone(),
                    score: p.score,
                })
                .collect(),
            current_drawer: self.current_drawer.map(|id| id.to_string()),
            round_ends_at: self.round_ends_at,
            word_length: self.secret_word.chars().count(),
            word_category: self.secret_category.clone(),
        }
    }

    /// Announcement for the current round, without the word
    pub fn round_start_message(&self) -> Option<ServerMessage> {
        let drawer = self.players.get(self.current_drawer_index?)?;
        Some(ServerMessage::RoundStart {
            current_drawer: drawer.id.to_string(),
            current_drawer_name: drawer.name.clone(),
            round_ends_at: self.round_ends_at?,
            word_length: self.secret_word.chars().count(),
            word_category: self.secret_category.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DRAGON: PickedWord = PickedWord {
        word: "dragon",
        category: Some("fantasy"),
    };

    fn room_with(count: usize) -> (Room, Vec<ClientId>) {
        let mut room = Room::new(RoomId::parse("R1").unwrap());
        let ids: Vec<ClientId> = (0..count).map(|_| ClientId::new()).collect();
        for (i, id) in ids.iter().enumerate() {
            room.add_player(*id, format!("player{i}"));
        }
        (room, ids)
    }

    fn assert_drawer_consistent(room: &Room) {
        let index = room.current_drawer_index.unwrap();
        assert_eq!(Some(room.players[index].id), room.current_drawer);
    }

    #[test]
    fn test_room_creation() {
        let room = Room::new(RoomId::parse("R1").unwrap());
        assert!(room.is_empty());
        assert!(!room.has_drawer());
        assert!(!room.has_active_round());
        assert_eq!(room.generation, 0);
    }

    #[test]
    fn test_add_player_starts_at_zero() {
        let (room, ids) = room_with(2);
        assert_eq!(room.player_count(), 2);
        assert_eq!(room.player(ids[1]).unwrap().score, 0);
        assert_eq!(room.member_ids().collect::<Vec<_>>(), ids);
    }

    #[test]
    fn test_next_drawer_round_robin() {
        let (mut room, _) = room_with(3);
        assert_eq!(room.next_drawer_index(None), Some(0));

        room.begin_round(2, &DRAGON, 10).unwrap();
        assert_eq!(room.next_drawer_index(None), Some(0));
        assert_eq!(room.next_drawer_index(Some(4)), Some(1));

        let empty = Room::new(RoomId::parse("E").unwrap());
        assert_eq!(empty.next_drawer_index(Some(0)), None);
    }

    #[test]
    fn test_begin_round_sets_secret_and_generation() {
        let (mut room, ids) = room_with(2);
        assert_eq!(room.begin_round(1, &DRAGON, 500), Some(1));
        assert_eq!(room.current_drawer, Some(ids[1]));
        assert_eq!(room.secret_word, "dragon");
        assert_eq!(room.secret_category.as_deref(), Some("fantasy"));
        assert_eq!(room.round_ends_at, Some(500));
        assert!(room.has_active_round());
        assert_drawer_consistent(&room);

        assert_eq!(room.begin_round(1, &DRAGON, 600), Some(2));
        assert_eq!(room.begin_round(5, &DRAGON, 700), None);
    }

    #[test]
    fn test_remove_non_drawer_before_drawer_shifts_index() {
        let (mut room, ids) = room_with(3);
        room.begin_round(2, &DRAGON, 10).unwrap();

        let departure = room.remove_player(ids[0]).unwrap();
        assert_eq!(departure.index, 0);
        assert!(!departure.was_drawer);
        assert_eq!(room.current_drawer_index, Some(1));
        assert_drawer_consistent(&room);
    }

    #[test]
    fn test_remove_non_drawer_after_drawer_keeps_index() {
        let (mut room, ids) = room_with(3);
        room.begin_round(0, &DRAGON, 10).unwrap();

        room.remove_player(ids[2]).unwrap();
        assert_eq!(room.current_drawer_index, Some(0));
        assert_drawer_consistent(&room);
        assert_eq!(room.secret_word, "dragon");
    }

    #[test]
    fn test_remove_drawer_reports_slot() {
        let (mut room, ids) = room_with(3);
        room.begin_round(1, &DRAGON, 10).unwrap();

        let departure = room.remove_player(ids[1]).unwrap();
        assert!(departure.was_drawer);
        assert_eq!(departure.index, 1);
        assert_eq!(departure.name, "player1");
        assert_eq!(room.next_drawer_index(Some(departure.index)), Some(1));
        assert_eq!(room.players[1].id, ids[2]);
    }

    #[test]
    fn test_remove_unknown_player() {
        let (mut room, _) = room_with(1);
        assert!(room.remove_player(ClientId::new()).is_none());
        assert_eq!(room.player_count(), 1);
    }

    #[test]
    fn test_award_correct_guess() {
        let (mut room, ids) = room_with(3);
        room.begin_round(0, &DRAGON, 10).unwrap();

        let award = room.award_correct_guess(ids[1]).unwrap();
        assert_eq!(award.guesser.score, GUESSER_POINTS);
        assert_eq!(award.drawer.score, DRAWER_POINTS);
        assert_eq!(award.secret_word, "dragon");
        assert_eq!(room.player(ids[2]).unwrap().score, 0);

        assert!(room.award_correct_guess(ids[0]).is_none());
        assert!(room.award_correct_guess(ClientId::new()).is_none());
    }

    #[test]
    fn test_state_message_hides_word() {
        let (mut room, ids) = room_with(1);
        room.begin_round(0, &DRAGON, 99).unwrap();

        let ServerMessage::RoomState {
            players,
            current_drawer,
            round_ends_at,
            word_length,
            word_category,
        } = room.state_message()
        else {
            panic!("Wrong variant");
        };
        assert_eq!(players.len(), 1);
        assert_eq!(current_drawer, Some(ids[0].to_string()));
        assert_eq!(round_ends_at, Some(99));
        assert_eq!(word_length, 6);
        assert_eq!(word_category.as_deref(), Some("fantasy"));
    }

    #[test]
    fn test_round_start_message() {
        let (mut room, _) = room_with(2);
        assert!(room.round_start_message().is_none());

        room.begin_round(1, &DRAGON, 99).unwrap();
        let Some(ServerMessage::RoundStart {
            current_drawer_name,
            word_length,
            ..
        }) = room.round_start_message()
        else {
            panic!("Wrong variant");
        };
        assert_eq!(current_drawer_name, "player1");
        assert_eq!(word_length, 6);
    }
}
