// Entity model: identity, static kind data, and the runtime state each kind carries.

use super::errors::GameError;
use super::geometry::{Aabb, Position, Size};
use super::tuning::Tuning;
use std::fmt;
use uuid::Uuid;

/// Globally unique entity id, shared verbatim between peers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for EntityId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<EntityId> for Uuid {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Closed set of entity types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    Obstacle,
    Character,
    Bullet,
    Boundary,
    Background,
    PointLight,
}

impl EntityType {
    pub const fn as_str(self) -> &'static str {
        match self {
            EntityType::Obstacle => "obstacle",
            EntityType::Character => "character",
            EntityType::Bullet => "bullet",
            EntityType::Boundary => "boundary",
            EntityType::Background => "background",
            EntityType::PointLight => "point-light",
        }
    }

    pub fn capabilities(self) -> Capabilities {
        match self {
            EntityType::Obstacle | EntityType::Boundary => Capabilities {
                collidable: Collidable::Always,
                gravity: false,
            },
            EntityType::Character => Capabilities {
                collidable: Collidable::Always,
                gravity: true,
            },
            EntityType::Bullet => Capabilities {
                collidable: Collidable::When(not_a_bullet),
                gravity: false,
            },
            EntityType::Background | EntityType::PointLight => Capabilities {
                collidable: Collidable::Never,
                gravity: false,
            },
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn not_a_bullet(other: EntityType) -> bool {
    other != EntityType::Bullet
}

/// Whether an entity takes part in collisions, possibly depending on the other side.
#[derive(Debug, Clone, Copy)]
pub enum Collidable {
    Always,
    Never,
    When(fn(EntityType) -> bool),
}

impl Collidable {
    pub fn allows(self, other: EntityType) -> bool {
        match self {
            Collidable::Always => true,
            Collidable::Never => false,
            Collidable::When(predicate) => predicate(other),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Capabilities {
    pub collidable: Collidable,
    pub gravity: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ObstacleVariant {
    #[default]
    Default,
    Unstable,
}

impl ObstacleVariant {
    pub const fn as_str(self) -> &'static str {
        match self {
            ObstacleVariant::Default => "default",
            ObstacleVariant::Unstable => "unstable",
        }
    }
}

/// Static construction data; everything a create packet carries besides id and position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntityKind {
    Obstacle { variant: ObstacleVariant, size: Size },
    Character,
    Bullet,
    Boundary { size: Size },
    Background,
    PointLight,
}

impl EntityKind {
    pub const fn entity_type(&self) -> EntityType {
        match self {
            EntityKind::Obstacle { .. } => EntityType::Obstacle,
            EntityKind::Character => EntityType::Character,
            EntityKind::Bullet => EntityType::Bullet,
            EntityKind::Boundary { .. } => EntityType::Boundary,
            EntityKind::Background => EntityType::Background,
            EntityKind::PointLight => EntityType::PointLight,
        }
    }

    pub fn size(&self, tuning: &Tuning) -> Size {
        match self {
            EntityKind::Obstacle { size, .. } | EntityKind::Boundary { size } => *size,
            EntityKind::Character => tuning.character.size,
            EntityKind::Bullet => tuning.bullet.size,
            EntityKind::Background => tuning.map.canvas,
            EntityKind::PointLight => Size::default(),
        }
    }
}

/// Which peer owns the true transform of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authority {
    /// This peer runs physics for the entity and pushes its state.
    Local,
    /// This peer mirrors state received from the other peer.
    Remote,
}

impl Authority {
    pub const fn from_is_remote(is_remote: bool) -> Self {
        if is_remote {
            Authority::Remote
        } else {
            Authority::Local
        }
    }

    pub const fn is_remote(self) -> bool {
        matches!(self, Authority::Remote)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// Character sprite animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Animation {
    StillLeft,
    StillRight,
    RunLeft,
    RunRight,
    JumpLeft,
    JumpRight,
}

impl Animation {
    pub const fn as_str(self) -> &'static str {
        match self {
            Animation::StillLeft => "still-left",
            Animation::StillRight => "still-right",
            Animation::RunLeft => "run-left",
            Animation::RunRight => "run-right",
            Animation::JumpLeft => "jump-left",
            Animation::JumpRight => "jump-right",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "still-left" => Some(Animation::StillLeft),
            "still-right" => Some(Animation::StillRight),
            "run-left" => Some(Animation::RunLeft),
            "run-right" => Some(Animation::RunRight),
            "jump-left" => Some(Animation::JumpLeft),
            "jump-right" => Some(Animation::JumpRight),
            _ => None,
        }
    }

    pub const fn still(facing: Facing) -> Self {
        match facing {
            Facing::Left => Animation::StillLeft,
            Facing::Right => Animation::StillRight,
        }
    }

    pub const fn run(facing: Facing) -> Self {
        match facing {
            Facing::Left => Animation::RunLeft,
            Facing::Right => Animation::RunRight,
        }
    }

    pub const fn jump(facing: Facing) -> Self {
        match facing {
            Facing::Left => Animation::JumpLeft,
            Facing::Right => Animation::JumpRight,
        }
    }
}

/// Movement state for entities that run the physics step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementStatus {
    pub is_moving_left: bool,
    pub is_moving_right: bool,
    pub horizontal_velocity: f32,
    pub is_jumping: bool,
    pub is_grounded: bool,
    pub vertical_velocity: f32,
    pub facing: Facing,
}

impl MovementStatus {
    pub fn new(horizontal_velocity: f32) -> Self {
        Self {
            is_moving_left: false,
            is_moving_right: false,
            horizontal_velocity,
            is_jumping: false,
            is_grounded: false,
            vertical_velocity: 0.0,
            facing: Facing::Right,
        }
    }
}

/// Handle the stage draws from. Built when the entity is hooked into the match.
#[derive(Debug, Clone, PartialEq)]
pub struct Renderable {
    pub position: Position,
    /// Heading in radians.
    pub rotation: f32,
    pub size: Size,
    pub animation: Option<Animation>,
}

impl Renderable {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.position, self.size)
    }
}

/// Copyable snapshot of what the collision queries need to know about a mover.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub id: EntityId,
    pub entity_type: EntityType,
    pub position: Position,
    pub size: Size,
}

impl Body {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.position, self.size)
    }

    pub fn bounds_at(&self, position: Position) -> Aabb {
        Aabb::new(position, self.size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageOutcome {
    pub health: u32,
    pub died: bool,
}

#[derive(Debug, Clone)]
pub struct Entity {
    id: EntityId,
    kind: EntityKind,
    initial_position: Position,
    initial_rotation: f32,
    authority: Authority,
    renderable: Option<Renderable>,
    movement: Option<MovementStatus>,
    health: Option<u32>,
}

impl Entity {
    pub fn new(kind: EntityKind, initial_position: Position, authority: Authority) -> Self {
        Self::with_id(EntityId::new(), kind, initial_position, authority)
    }

    pub fn with_id(
        id: EntityId,
        kind: EntityKind,
        initial_position: Position,
        authority: Authority,
    ) -> Self {
        Self {
            id,
            kind,
            initial_position,
            initial_rotation: 0.0,
            authority,
            renderable: None,
            movement: None,
            health: None,
        }
    }

    pub fn with_rotation(mut self, radians: f32) -> Self {
        self.initial_rotation = radians;
        self
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn kind(&self) -> &EntityKind {
        &self.kind
    }

    pub fn entity_type(&self) -> EntityType {
        self.kind.entity_type()
    }

    pub fn initial_position(&self) -> Position {
        self.initial_position
    }

    pub fn initial_rotation(&self) -> f32 {
        self.initial_rotation
    }

    pub fn authority(&self) -> Authority {
        self.authority
    }

    pub fn is_remote(&self) -> bool {
        self.authority.is_remote()
    }

    pub fn is_initialized(&self) -> bool {
        self.renderable.is_some()
    }

    /// Builds the renderable and per-kind runtime state. Calling it twice is a no-op.
    pub fn initialize(&mut self, tuning: &Tuning) {
        if self.renderable.is_some() {
            return;
        }

        let animation = match self.kind {
            EntityKind::Character => Some(Animation::StillRight),
            _ => None,
        };

        self.renderable = Some(Renderable {
            position: self.initial_position,
            rotation: self.initial_rotation,
            size: self.kind.size(tuning),
            animation,
        });

        if matches!(self.kind, EntityKind::Character) {
            self.movement = Some(MovementStatus::new(tuning.character.horizontal_velocity));
            self.health.get_or_insert(tuning.character.max_health);
        }
    }

    /// Drops the renderable once the stage let go of it.
    pub fn cleanup(&mut self) {
        self.renderable = None;
    }

    pub fn renderable(&self) -> Result<&Renderable, GameError> {
        self.renderable
            .as_ref()
            .ok_or(GameError::NotInitialized { entity_id: self.id })
    }

    fn renderable_mut(&mut self) -> Result<&mut Renderable, GameError> {
        self.renderable
            .as_mut()
            .ok_or(GameError::NotInitialized { entity_id: self.id })
    }

    pub fn position(&self) -> Result<Position, GameError> {
        self.renderable().map(|r| r.position)
    }

    pub fn rotation(&self) -> Result<f32, GameError> {
        self.renderable().map(|r| r.rotation)
    }

    pub fn bounds(&self) -> Result<Aabb, GameError> {
        self.renderable().map(Renderable::bounds)
    }

    pub fn body(&self) -> Result<Body, GameError> {
        let renderable = self.renderable()?;
        Ok(Body {
            id: self.id,
            entity_type: self.entity_type(),
            position: renderable.position,
            size: renderable.size,
        })
    }

    pub fn movement(&self) -> Option<&MovementStatus> {
        self.movement.as_ref()
    }

    pub fn health(&self) -> Option<u32> {
        self.health
    }

    pub fn animation(&self) -> Option<Animation> {
        self.renderable.as_ref().and_then(|r| r.animation)
    }

    /// Switches the sprite animation; returns whether it changed.
    pub fn set_animation(&mut self, animation: Animation) -> Result<bool, GameError> {
        let renderable = self.renderable_mut()?;
        let changed = renderable.animation != Some(animation);
        renderable.animation = Some(animation);
        Ok(changed)
    }

    /// Removes health, clamped at zero. Only characters carry health.
    pub fn damage(&mut self, points: u32) -> Result<DamageOutcome, GameError> {
        let entity_id = self.id;
        let found = self.entity_type();
        let health = self.health.as_mut().ok_or(match found {
            EntityType::Character => GameError::NotInitialized { entity_id },
            _ => GameError::WrongEntityKind {
                entity_id,
                expected: EntityType::Character,
                found,
            },
        })?;

        *health = health.saturating_sub(points);
        Ok(DamageOutcome {
            health: *health,
            died: *health == 0,
        })
    }

    /// View for the physics step; `None` for mirrors.
    pub fn as_local_mut(&mut self) -> Option<LocalEntity<'_>> {
        match self.authority {
            Authority::Local => Some(LocalEntity { entity: self }),
            Authority::Remote => None,
        }
    }

    /// View for applying received transforms; `None` for locally owned entities.
    pub fn as_mirror_mut(&mut self) -> Option<MirrorEntity<'_>> {
        match self.authority {
            Authority::Remote => Some(MirrorEntity { entity: self }),
            Authority::Local => None,
        }
    }
}

/// Mutable access to a locally authoritative entity.
pub struct LocalEntity<'a> {
    entity: &'a mut Entity,
}

impl LocalEntity<'_> {
    pub fn id(&self) -> EntityId {
        self.entity.id
    }

    pub fn body(&self) -> Result<Body, GameError> {
        self.entity.body()
    }

    pub fn movement(&self) -> Option<MovementStatus> {
        self.entity.movement
    }

    pub fn movement_mut(&mut self) -> Option<&mut MovementStatus> {
        self.entity.movement.as_mut()
    }

    /// Writes the result of a physics step.
    pub fn commit(
        &mut self,
        position: Position,
        movement: Option<MovementStatus>,
    ) -> Result<(), GameError> {
        self.entity.renderable_mut()?.position = position;
        if movement.is_some() {
            self.entity.movement = movement;
        }
        Ok(())
    }
}

/// Mutable access to an entity mirrored from the other peer.
pub struct MirrorEntity<'a> {
    entity: &'a mut Entity,
}

impl MirrorEntity<'_> {
    pub fn id(&self) -> EntityId {
        self.entity.id
    }

    /// Absent fields stay unchanged.
    pub fn apply_transform(
        &mut self,
        position: Option<Position>,
        rotation: Option<f32>,
    ) -> Result<(), GameError> {
        let renderable = self.entity.renderable_mut()?;
        if let Some(position) = position {
            renderable.position = position;
        }
        if let Some(rotation) = rotation {
            renderable.rotation = rotation;
        }
        Ok(())
    }
}
