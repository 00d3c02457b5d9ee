// Use cases layer: the match context and the task that drives it.

pub mod game;
pub mod map;
pub mod match_task;
pub mod sounds;
pub mod types;

pub use game::{Game, GameSettings, PeerLink};
pub use match_task::match_task;
pub use types::{CharacterCommand, MatchError, MatchResult, MatchState, Role, Ticker};
