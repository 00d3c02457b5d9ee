use super::movement::{MoveOutcome, try_move};
use crate::domain::collisions::Scene;
use crate::domain::entity::{Body, EntityId, EntityType};
use crate::domain::geometry::{Aabb, Position, Size};
use crate::domain::tuning::BulletTuning;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Flight {
    Flying(Position),
    Hit(Impact),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Impact {
    Character(EntityId),
    /// Obstacles, walls, and the world limits (`None`).
    Scenery(Option<EntityId>),
}

/// Advances a bullet one tick along its heading.
pub fn fly(
    scene: &Scene<'_>,
    body: &mut Body,
    heading: f32,
    tuning: &BulletTuning,
    dt: f32,
) -> Flight {
    let distance = tuning.velocity * dt;
    let target = body
        .position
        .offset(heading.cos() * distance, heading.sin() * distance);

    match try_move(scene, body, target) {
        MoveOutcome::Moved(position) => Flight::Flying(position),
        MoveOutcome::Blocked(Some(id)) if scene.entity_type(id) == Some(EntityType::Character) => {
            Flight::Hit(Impact::Character(id))
        }
        MoveOutcome::Blocked(blocker) => Flight::Hit(Impact::Scenery(blocker)),
    }
}

/// Where a new bullet starts and which way it flies.
///
/// The bullet is placed just outside the shooter's enclosing circle along the aim
/// line, so it never starts inside the shooter.
pub fn muzzle(shooter: &Aabb, aim: Position, bullet: Size) -> (Position, f32) {
    let origin = shooter.center();
    let heading = (aim.y - origin.y).atan2(aim.x - origin.x);
    let reach = Size::new(shooter.width, shooter.height).half_diagonal() + bullet.half_diagonal() + 1.0;

    let center = origin.offset(heading.cos() * reach, heading.sin() * reach);
    let top_left = center.offset(-bullet.width / 2.0, -bullet.height / 2.0);
    (top_left, heading)
}
