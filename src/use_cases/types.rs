// Use-case level inputs/outputs for a match.

use crate::domain::Position;
use std::fmt;
use std::time::Duration;

/// Which side of the session this peer is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Created the match; generates and replicates the map.
    Host,
    /// Joined the match; waits for the host's map.
    Guest,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Host => f.write_str("host"),
            Role::Guest => f.write_str("guest"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    OpponentDisconnected,
    /// The match could not go on (bootstrap failure, repeated desyncs).
    Stopped(String),
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchError::OpponentDisconnected => f.write_str("opponent disconnected"),
            MatchError::Stopped(reason) => write!(f, "match stopped: {reason}"),
        }
    }
}

/// How the match ended for this peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    Won,
    Lost,
    Error(MatchError),
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchResult::Won => f.write_str("won"),
            MatchResult::Lost => f.write_str("lost"),
            MatchResult::Error(e) => write!(f, "error ({e})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MatchState {
    /// Waiting for local setup and the peer barrier.
    Bootstrapping,
    /// Both sides are ready; no tick has run yet.
    Initialized,
    Running,
    /// Slow-motion wind-down before the result is reported.
    Ending {
        result: MatchResult,
        remaining: Duration,
    },
    Ended(MatchResult),
}

/// Converts real elapsed time into frame units (1.0 per 60 Hz frame), scaled by speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ticker {
    pub speed: f32,
}

impl Ticker {
    pub const FRAMES_PER_SECOND: f32 = 60.0;

    pub fn delta_time(&self, elapsed: Duration) -> f32 {
        elapsed.as_secs_f32() * Self::FRAMES_PER_SECOND * self.speed
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self { speed: 1.0 }
    }
}

/// Commands for the locally controlled character.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CharacterCommand {
    StartMoveLeft,
    StopMoveLeft,
    StartMoveRight,
    StopMoveRight,
    Jump,
    /// Fire a bullet towards a point on the canvas.
    ShootAt(Position),
}
