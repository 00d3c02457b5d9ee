use super::entity::{EntityId, EntityType};
use std::fmt;

/// Failures raised while ticking the simulation or applying peer packets.
///
/// Blocked moves are not errors; see `systems::movement::MoveOutcome`.
#[derive(Debug, Clone, PartialEq)]
pub enum GameError {
    /// The entity has no renderable yet (it was never hooked into the match).
    NotInitialized { entity_id: EntityId },
    /// A packet addressed an entity this peer does not know.
    UnknownEntity {
        entity_id: EntityId,
        packet: &'static str,
    },
    /// A packet addressed an entity of a type that cannot handle it.
    WrongEntityKind {
        entity_id: EntityId,
        expected: EntityType,
        found: EntityType,
    },
    /// A create packet reused the id of a live or destroyed entity.
    DuplicateEntity { entity_id: EntityId },
}

impl GameError {
    /// True when the error means the two peers disagree about the world.
    pub fn is_desync(&self) -> bool {
        !matches!(self, GameError::NotInitialized { .. })
    }
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::NotInitialized { entity_id } => {
                write!(f, "entity {entity_id} is not initialized")
            }
            GameError::UnknownEntity { entity_id, packet } => {
                write!(f, "{packet} addressed unknown entity {entity_id}; peers are out of sync")
            }
            GameError::WrongEntityKind {
                entity_id,
                expected,
                found,
            } => write!(
                f,
                "entity {entity_id} is a {found}, expected a {expected}; peers are out of sync"
            ),
            GameError::DuplicateEntity { entity_id } => {
                write!(
                    f,
                    "entity {entity_id} already exists or was destroyed; peers are out of sync"
                )
            }
        }
    }
}

impl std::error::Error for GameError {}
