use crate::domain::collisions::{Blocker, Scene};
use crate::domain::entity::{Body, EntityId, Facing, MovementStatus};
use crate::domain::geometry::Position;
use crate::domain::tuning::CharacterTuning;

/// Result of asking the collision gate for a new position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveOutcome {
    Moved(Position),
    /// Blocked by an entity, or by the world limits when `None`.
    Blocked(Option<EntityId>),
}

/// What the gravity step did this tick (used for sounds and animations).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GravityOutcome {
    pub jumped: bool,
    pub landed: bool,
}

/// Single move through the collision gate. A blocked move leaves the body untouched.
pub fn try_move(scene: &Scene<'_>, body: &mut Body, target: Position) -> MoveOutcome {
    match scene.blocker(body, target) {
        None => {
            body.position = target;
            MoveOutcome::Moved(target)
        }
        Some(blocker) => MoveOutcome::Blocked(blocker.entity_id()),
    }
}

/// Moves along Y in unit steps plus the fractional remainder, stopping at the
/// first blocked step. A blocked step ends flush against the blocker when that
/// spot is free.
pub fn step_vertical(scene: &Scene<'_>, body: &mut Body, delta: f32) -> MoveOutcome {
    let direction = delta.signum();
    let distance = delta.abs();
    let whole_steps = distance.trunc() as u32;
    let remainder = distance.fract();

    let steps = (0..whole_steps)
        .map(|_| 1.0_f32)
        .chain((remainder > 0.0).then_some(remainder));

    for step in steps {
        let target = body.position.offset(0.0, direction * step);
        let Some(blocker) = scene.blocker(body, target) else {
            body.position = target;
            continue;
        };

        if let Blocker::Entity { bounds, .. } = blocker {
            let flush_y = if direction > 0.0 {
                bounds.top() - body.size.height
            } else {
                bounds.bottom()
            };
            let gap = (flush_y - body.position.y) * direction;
            let flush = Position::new(body.position.x, flush_y);
            if gap > 0.0 && gap < step && scene.blocker(body, flush).is_none() {
                body.position = flush;
            }
        }

        return MoveOutcome::Blocked(blocker.entity_id());
    }

    MoveOutcome::Moved(body.position)
}

/// One gravity step for a locally authoritative entity. `dt` is in frame units.
pub fn apply_gravity(
    scene: &Scene<'_>,
    body: &mut Body,
    status: &mut MovementStatus,
    tuning: &CharacterTuning,
    dt: f32,
) -> GravityOutcome {
    let mut outcome = GravityOutcome::default();

    if status.is_grounded {
        status.vertical_velocity = tuning.gravity_force * dt;

        if status.is_jumping {
            outcome.jumped = true;
            status.is_grounded = false;
            status.vertical_velocity = -tuning.jump_force;
            status.is_jumping = false;
        }
    } else {
        status.vertical_velocity += tuning.gravity_force * dt;
    }

    let delta = status.vertical_velocity * dt;
    match step_vertical(scene, body, delta) {
        MoveOutcome::Moved(_) => status.is_grounded = false,
        MoveOutcome::Blocked(_) => {
            if !status.is_grounded {
                outcome.landed = true;
                status.is_grounded = true;
            }
        }
    }

    outcome
}

/// Horizontal moves from the input flags: left first, then right, each through
/// the collision gate. A blocked move is absorbed. Returns the last attempt.
pub fn move_horizontally(
    scene: &Scene<'_>,
    body: &mut Body,
    status: &mut MovementStatus,
    dt: f32,
) -> Option<MoveOutcome> {
    let distance = status.horizontal_velocity * dt;
    let mut outcome = None;

    if status.is_moving_left {
        if !status.is_moving_right {
            status.facing = Facing::Left;
        }
        let target = body.position.offset(-distance, 0.0);
        outcome = Some(try_move(scene, body, target));
    }

    if status.is_moving_right {
        if !status.is_moving_left {
            status.facing = Facing::Right;
        }
        let target = body.position.offset(distance, 0.0);
        outcome = Some(try_move(scene, body, target));
    }

    outcome
}
