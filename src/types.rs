//! Basic type definitions for the game server
//!
//! Provides newtype wrappers for type safety:
//! - `ClientId`: UUID-based unique connection identifier
//! - `RoomId`: caller-chosen, case-sensitive room identifier
//!
//! Also provides `EpochClock`, the source of round deadlines.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::time::Instant;
use uuid::Uuid;

/// Unique client identifier (newtype pattern)
///
/// Wraps a UUID v4 for type-safe connection identification.
/// Doubles as the player id sent to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(pub Uuid);

impl ClientId {
    /// Create a new random client ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Room identifier
///
/// Supplied by the joining client. Surrounding whitespace is trimmed,
/// otherwise the identifier is kept verbatim (case-sensitive).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomId(pub String);

impl RoomId {
    /// Build a room id from raw client input
    ///
    /// Returns None if the input is blank.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How long an anchor is trusted before the system clock is read again
pub const CLOCK_REANCHOR_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Wall-clock milliseconds anchored to the tokio clock
///
/// Reads the Unix time at an anchor and then advances with
/// `tokio::time::Instant`, so deadlines move in step with round timers
/// (including paused test time). The anchor is refreshed from the system
/// clock every `CLOCK_REANCHOR_INTERVAL`, which bounds drift from NTP or
/// manual clock adjustments on long-running servers.
#[derive(Debug, Clone, Copy)]
pub struct EpochClock {
    epoch_millis: u64,
    anchor: Instant,
}

impl EpochClock {
    pub fn new() -> Self {
        Self {
            epoch_millis: system_millis(),
            anchor: Instant::now(),
        }
    }

    /// Current Unix time in milliseconds
    pub fn now_millis(&mut self) -> u64 {
        let elapsed = self.anchor.elapsed();
        if elapsed >= CLOCK_REANCHOR_INTERVAL {
            *self = Self::new();
            return self.epoch_millis;
        }
        self.epoch_millis + elapsed.as_millis() as u64
    }
}

fn system_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

impl Default for EpochClock {
    fn default() -> Self {
        Self::new()
    }
}
