//! Message protocol definitions
//!
//! JSON-based bidirectional message protocol using Serde's tagged enum
//! for type-safe serialization/deserialization. Event names are kebab-case,
//! payload fields camelCase.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Stroke colour used when the client omits one
pub const DEFAULT_COLOR: &str = "#1f2937";
/// Stroke width used when the client omits one
pub const DEFAULT_LINE_WIDTH: f64 = 4.0;
/// Widest stroke accepted from a drawer
pub const MAX_LINE_WIDTH: f64 = 100.0;
/// Longest colour string accepted from a drawer
pub const MAX_COLOR_LEN: usize = 32;

/// Client → Server message
///
/// Missing text fields decode as empty strings so the game logic can
/// answer them through its own empty-input paths.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    /// Join (or create) a room under a display name
    JoinRoom {
        #[serde(default)]
        name: String,
        #[serde(default, alias = "roomID")]
        room_id: String,
    },
    /// Stroke segment from the drawer
    DrawData(DrawSegment),
    /// Guess (doubles as chat)
    SubmitGuess {
        #[serde(default)]
        guess: String,
    },
    /// Drawer asks for a different word
    RequestNewWord,
}

/// One stroke segment
///
/// Coordinates are fractions of the canvas width/height.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawSegment {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_line_width")]
    pub line_width: f64,
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

fn default_line_width() -> f64 {
    DEFAULT_LINE_WIDTH
}

impl DrawSegment {
    /// Check the segment is safe to relay
    ///
    /// Coordinates must be finite and within 0..=1, the width finite and
    /// positive (capped), the colour non-empty and short.
    pub fn is_valid(&self) -> bool {
        let in_unit = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);

        [self.x0, self.y0, self.x1, self.y1].into_iter().all(in_unit)
            && self.line_width.is_finite()
            && self.line_width > 0.0
            && self.line_width <= MAX_LINE_WIDTH
            && !self.color.is_empty()
            && self.color.len() <= MAX_COLOR_LEN
    }
}

/// Public view of a player inside `room-state`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub id: String,
    pub name: String,
    pub score: u32,
}

/// Server → Client message
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    /// Join accepted
    JoinedRoom { room_id: String, player_id: String },
    /// Join refused
    JoinError { message: String },
    /// Full room snapshot
    RoomState {
        players: Vec<PlayerView>,
        current_drawer: Option<String>,
        round_ends_at: Option<u64>,
        word_length: usize,
        word_category: Option<String>,
    },
    /// A new round began (never carries the word itself)
    RoundStart {
        current_drawer: String,
        current_drawer_name: String,
        round_ends_at: u64,
        word_length: usize,
        word_category: Option<String>,
    },
    /// Secret word, sent to the drawer only
    YourWord { secret_word: String },
    /// Stroke to paint
    RenderLine(DrawSegment),
    /// Wipe the canvas
    ClearCanvas,
    /// Someone guessed the word
    CorrectGuess {
        guesser_id: String,
        guesser_name: String,
        drawer_id: String,
        drawer_name: String,
        secret_word: String,
    },
    /// Private hint to a guesser
    GuessFeedback { message: String },
    /// Guess relayed as chat
    GuessMessage {
        player_id: String,
        player_name: String,
        guess: String,
    },
    /// Room announcement
    SystemMessage { message: String },
    /// Round ran out of time
    RoundTimeout { secret_word: String, message: String },
}

impl ServerMessage {
    /// Wire name of this event
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::JoinedRoom { .. } => "joined-room",
            Self::JoinError { .. } => "join-error",
            Self::RoomState { .. } => "room-state",
            Self::RoundStart { .. } => "round-start",
            Self::YourWord { .. } => "your-word",
            Self::RenderLine(_) => "render-line",
            Self::ClearCanvas => "clear-canvas",
            Self::CorrectGuess { .. } => "correct-guess",
            Self::GuessFeedback { .. } => "guess-feedback",
            Self::GuessMessage { .. } => "guess-message",
            Self::SystemMessage { .. } => "system-message",
            Self::RoundTimeout { .. } => "round-timeout",
        }
    }
}

/// Convert AppError to ServerMessage for client notification
impl From<AppError> for ServerMessage {
    fn from(err: AppError) -> Self {
        let message = match &err {
            AppError::InvalidRequest(reason) => reason.clone(),
            // Transport errors are not typically converted (connection closes)
            _ => "Internal error".to_string(),
        };
        ServerMessage::JoinError { message }
    }
}
