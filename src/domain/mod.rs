// Domain layer: entities, geometry and the rules that move them.

pub mod collisions;
pub mod entity;
pub mod errors;
pub mod geometry;
pub mod ports;
pub mod registry;
pub mod sounds;
pub mod systems;
pub mod tuning;

pub use entity::{
    Animation, Authority, Body, DamageOutcome, Entity, EntityId, EntityKind, EntityType, Facing,
    MovementStatus, ObstacleVariant,
};
pub use errors::GameError;
pub use geometry::{Aabb, Position, Size};
pub use ports::{SoundPlayer, Stage};
pub use registry::EntityRegistry;
pub use sounds::SoundName;
