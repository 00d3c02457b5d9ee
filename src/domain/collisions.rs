// Collision and visibility queries over the entity registry.

use super::entity::{Body, EntityId, EntityType};
use super::geometry::{Aabb, Position};
use super::registry::EntityRegistry;
use super::tuning::MapTuning;

/// Returns the first box (in iteration order) that strictly overlaps `candidate`.
/// The excluded id is never returned.
pub fn detect_collision<I>(candidate: &Aabb, exclude: EntityId, boxes: I) -> Option<EntityId>
where
    I: IntoIterator<Item = (EntityId, Aabb)>,
{
    first_overlap(candidate, exclude, boxes).map(|(id, _)| id)
}

fn first_overlap<I>(candidate: &Aabb, exclude: EntityId, boxes: I) -> Option<(EntityId, Aabb)>
where
    I: IntoIterator<Item = (EntityId, Aabb)>,
{
    boxes
        .into_iter()
        .find(|(id, other)| *id != exclude && candidate.overlaps(other))
}

/// Both sides must accept the collision.
pub fn mutually_collidable(a: EntityType, b: EntityType) -> bool {
    a.capabilities().collidable.allows(b) && b.capabilities().collidable.allows(a)
}

/// True when no occluder cuts the segment between the two points.
pub fn has_line_of_sight<I>(from: Position, to: Position, occluders: I) -> bool
where
    I: IntoIterator<Item = Aabb>,
{
    occluders
        .into_iter()
        .all(|occluder| !occluder.intersects_segment(from, to))
}

/// What stopped a move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Blocker {
    Entity { id: EntityId, bounds: Aabb },
    /// The candidate box left the world rectangle entirely.
    WorldBounds,
}

impl Blocker {
    pub fn entity_id(&self) -> Option<EntityId> {
        match self {
            Blocker::Entity { id, .. } => Some(*id),
            Blocker::WorldBounds => None,
        }
    }
}

/// Read-only view of the world used while resolving one move.
pub struct Scene<'a> {
    registry: &'a EntityRegistry,
    world: Aabb,
}

impl<'a> Scene<'a> {
    pub fn new(registry: &'a EntityRegistry, map: &MapTuning) -> Self {
        let margin = map.world_margin;
        Self {
            registry,
            world: Aabb {
                x: -margin,
                y: -margin,
                width: map.canvas.width + margin * 2.0,
                height: map.canvas.height + margin * 2.0,
            },
        }
    }

    /// Finds what would block `body` at `position`, if anything.
    pub fn blocker(&self, body: &Body, position: Position) -> Option<Blocker> {
        let candidate = body.bounds_at(position);
        if !candidate.overlaps(&self.world) {
            return Some(Blocker::WorldBounds);
        }

        let boxes = self
            .registry
            .iter()
            .filter(|other| mutually_collidable(body.entity_type, other.entity_type()))
            .filter_map(|other| other.bounds().ok().map(|bounds| (other.id(), bounds)));

        first_overlap(&candidate, body.id, boxes).map(|(id, bounds)| Blocker::Entity { id, bounds })
    }

    pub fn entity_type(&self, id: EntityId) -> Option<EntityType> {
        self.registry.get(id).map(|entity| entity.entity_type())
    }

    /// Entities whose centre can be seen from `origin`. Obstacles and boundaries occlude.
    pub fn visible_from(&self, origin: Position, exclude: EntityId) -> Vec<EntityId> {
        self.registry
            .iter()
            .filter(|target| target.id() != exclude)
            .filter(|target| {
                !matches!(
                    target.entity_type(),
                    EntityType::Background | EntityType::PointLight
                )
            })
            .filter_map(|target| {
                let center = target.bounds().ok()?.center();
                let occluders = self
                    .registry
                    .iter()
                    .filter(|other| other.id() != target.id())
                    .filter(|other| {
                        matches!(
                            other.entity_type(),
                            EntityType::Obstacle | EntityType::Boundary
                        )
                    })
                    .filter_map(|other| other.bounds().ok());

                has_line_of_sight(origin, center, occluders).then(|| target.id())
            })
            .collect()
    }
}
