// The match context: entity registry, tick loop body, packet dispatch and the
// bootstrap barrier between the two peers.

use crate::domain::collisions::Scene;
use crate::domain::systems::movement::{GravityOutcome, apply_gravity, move_horizontally};
use crate::domain::systems::projectiles::{Flight, Impact, fly, muzzle};
use crate::domain::tuning::Tuning;
use crate::domain::{
    Animation, Authority, DamageOutcome, Entity, EntityId, EntityKind, EntityRegistry, EntityType,
    Facing, GameError, MovementStatus, Position, SoundName, SoundPlayer, Stage,
};
use crate::interface_adapters::net::PacketSender;
use crate::interface_adapters::protocol::Packet;
use crate::interface_adapters::synchronizers::{
    EntityBindings, GameSynchronizer, MapSynchronizer, SoundSynchronizer, create_entity_from_packet,
    map::entities_from_packet, serialize_entity,
};
use crate::use_cases::map::GameMap;
use crate::use_cases::sounds::SoundManager;
use crate::use_cases::types::{
    CharacterCommand, MatchError, MatchResult, MatchState, Role, Ticker,
};

use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Desyncs tolerated before the match is stopped.
pub const MAX_PROTOCOL_ERRORS: u32 = 10;

#[derive(Debug, Clone, Copy)]
pub struct GameSettings {
    pub tuning: Tuning,
    /// Seed for the host's arena layout.
    pub map_seed: u64,
    pub max_protocol_errors: u32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            tuning: Tuning::default(),
            map_seed: rand::random(),
            max_protocol_errors: MAX_PROTOCOL_ERRORS,
        }
    }
}

/// Outbound half of a two-player session, as seen by the game.
#[derive(Debug, Clone)]
pub struct PeerLink {
    pub role: Role,
    pub sender: PacketSender,
}

struct SessionLink {
    role: Role,
    sender: PacketSender,
    game: GameSynchronizer,
    map: MapSynchronizer,
}

impl SessionLink {
    fn new(peer: PeerLink) -> Self {
        Self {
            role: peer.role,
            game: GameSynchronizer::new(peer.sender.clone()),
            map: MapSynchronizer::new(peer.sender.clone()),
            sender: peer.sender,
        }
    }
}

/// Called once when the wind-down finishes.
pub type OnEnd = Box<dyn FnOnce(MatchResult) + Send>;

pub struct Game {
    settings: GameSettings,
    registry: EntityRegistry,
    // Added before the match initialized, hooked up in insertion order later.
    pending: Vec<EntityId>,
    bindings: HashMap<EntityId, EntityBindings>,
    link: Option<SessionLink>,
    stage: Box<dyn Stage>,
    sounds: SoundManager,
    ticker: Ticker,
    state: MatchState,
    local_ready: bool,
    peer_ready: bool,
    hooked_up: bool,
    deferred: Vec<Packet>,
    protocol_errors: u32,
    on_end: Option<OnEnd>,
    torn_down: bool,
}

impl Game {
    /// A solo game when `peer` is `None`.
    pub fn new(
        settings: GameSettings,
        stage: Box<dyn Stage>,
        player: Box<dyn SoundPlayer>,
        peer: Option<PeerLink>,
    ) -> Self {
        Self {
            settings,
            registry: EntityRegistry::new(),
            pending: Vec::new(),
            bindings: HashMap::new(),
            link: peer.map(SessionLink::new),
            stage,
            sounds: SoundManager::new(player),
            ticker: Ticker::default(),
            state: MatchState::Bootstrapping,
            local_ready: false,
            peer_ready: false,
            hooked_up: false,
            deferred: Vec::new(),
            protocol_errors: 0,
            on_end: None,
            torn_down: false,
        }
    }

    pub fn on_end(&mut self, hook: impl FnOnce(MatchResult) + Send + 'static) {
        self.on_end = Some(Box::new(hook));
    }

    /// Local setup. The host (or a solo game) also generates and replicates the
    /// map, which satisfies the peer barrier on this side.
    pub fn initialize(&mut self) -> Result<(), GameError> {
        if self.local_ready {
            return Ok(());
        }

        let sound_sync = self
            .link
            .as_ref()
            .map(|link| SoundSynchronizer::new(link.sender.clone()));
        self.sounds.initialize_and_load_sounds(sound_sync);
        self.local_ready = true;

        if self.role() != Some(Role::Guest) {
            self.load_map()?;
            if let Some(link) = &self.link {
                link.game.send_initialization_completed();
            }
            self.peer_ready = true;
        }

        self.try_enter_initialized();
        Ok(())
    }

    fn load_map(&mut self) -> Result<(), GameError> {
        let roster = GameMap::new(&self.settings.tuning, self.settings.map_seed).generate();

        self.clear_entities();
        if let Some(link) = &self.link {
            link.map.sync_map_initialization(&roster);
        }

        let count = roster.len();
        for entity in roster {
            self.add_entity(entity)?;
        }
        info!(entities = count, seed = self.settings.map_seed, "map generated");
        Ok(())
    }

    fn try_enter_initialized(&mut self) {
        if self.hooked_up || !self.local_ready || !self.peer_ready {
            return;
        }

        self.hooked_up = true;
        if self.state == MatchState::Bootstrapping {
            self.state = MatchState::Initialized;
        }
        info!(
            role = ?self.role(),
            entities = self.registry.len(),
            "match initialized"
        );

        for id in std::mem::take(&mut self.pending) {
            self.hook_up(id);
        }

        let deferred = std::mem::take(&mut self.deferred);
        if !deferred.is_empty() {
            debug!(count = deferred.len(), "replaying deferred packets");
        }
        for packet in deferred {
            self.handle_packet(packet);
        }
    }

    fn hook_up(&mut self, id: EntityId) {
        let Some(entity) = self.registry.get_mut(id) else {
            return;
        };

        entity.initialize(&self.settings.tuning);
        self.stage.attach(entity);
        if let Some(link) = &self.link {
            self.bindings
                .insert(id, EntityBindings::bind(entity, &link.sender));
        }
        self.registry.subscribe(id);
    }

    /// Adds an entity. Before the match initializes it is queued instead of hooked up.
    pub fn add_entity(&mut self, entity: Entity) -> Result<EntityId, GameError> {
        let id = entity.id();
        self.registry.insert(entity)?;

        if self.hooked_up {
            self.hook_up(id);
        } else {
            debug!(entity_id = %id, "entity queued until the match initializes");
            self.pending.push(id);
        }
        Ok(id)
    }

    /// Adds an entity and tells the peer to mirror it.
    pub fn add_entity_and_replicate(&mut self, entity: Entity) -> Result<EntityId, GameError> {
        let packet = serialize_entity(&entity);
        let id = self.add_entity(entity)?;

        if let Some(link) = &self.link {
            link.game.sync_new_entity(packet);
        }
        Ok(id)
    }

    /// Removes an entity and its bindings. Unknown ids are a no-op; the id is
    /// never accepted again.
    pub fn destroy_entity(&mut self, id: EntityId, sync_with_peer: bool) -> Option<Entity> {
        let mut entity = self.registry.remove(id)?;
        self.release(&mut entity);

        if sync_with_peer && let Some(link) = &self.link {
            link.game.sync_entity_destroy(id);
        }
        debug!(entity_id = %id, entity_type = %entity.entity_type(), "entity destroyed");
        Some(entity)
    }

    fn release(&mut self, entity: &mut Entity) {
        let id = entity.id();
        self.pending.retain(|pending| *pending != id);
        self.bindings.remove(&id);
        if entity.is_initialized() {
            self.stage.detach(id);
            entity.cleanup();
        }
    }

    /// Drops the whole roster. The ids stay usable so a re-sent map can reuse them.
    fn clear_entities(&mut self) {
        let mut entities = self.registry.drain();
        for entity in &mut entities {
            self.release(entity);
        }
        if !entities.is_empty() {
            debug!(count = entities.len(), "entities cleared");
        }
    }

    /// One simulation step. `elapsed` is real time since the previous tick.
    pub fn tick(&mut self, elapsed: Duration) -> Result<(), GameError> {
        match self.state {
            MatchState::Bootstrapping | MatchState::Ended(_) => return Ok(()),
            MatchState::Initialized => self.state = MatchState::Running,
            MatchState::Running | MatchState::Ending { .. } => {}
        }

        let dt = self.ticker.delta_time(elapsed);
        let step = self.step_entities(dt);
        self.stage.frame(&self.registry);
        self.advance_wind_down(elapsed);
        step
    }

    fn step_entities(&mut self, dt: f32) -> Result<(), GameError> {
        for id in self.registry.subscribed_ids() {
            // An earlier update this tick may have destroyed it.
            if !self.registry.is_subscribed(id) {
                continue;
            }
            match self.registry.get(id).map(Entity::entity_type) {
                Some(EntityType::Character) => self.update_character(id, dt)?,
                Some(EntityType::Bullet) => self.update_bullet(id, dt)?,
                _ => {}
            }
        }
        Ok(())
    }

    fn update_character(&mut self, id: EntityId, dt: f32) -> Result<(), GameError> {
        let Some(entity) = self.registry.get(id) else {
            return Ok(());
        };
        if entity.is_remote() {
            return Ok(());
        }
        let Some(mut status) = entity.movement().copied() else {
            return Ok(());
        };
        let mut body = entity.body()?;
        let tuning = self.settings.tuning;

        let scene = Scene::new(&self.registry, &tuning.map);
        let gravity = if entity.entity_type().capabilities().gravity {
            apply_gravity(&scene, &mut body, &mut status, &tuning.character, dt)
        } else {
            GravityOutcome::default()
        };
        move_horizontally(&scene, &mut body, &mut status, dt);

        if let Some(mut local) = self.registry.get_mut(id).and_then(|e| e.as_local_mut()) {
            local.commit(body.position, Some(status))?;
        }

        if gravity.jumped {
            self.sounds.play(SoundName::Jump, true);
        }
        if gravity.landed {
            self.sounds.play(SoundName::Land, true);
            let airborne = self
                .registry
                .get(id)
                .and_then(Entity::animation)
                .is_some_and(|a| matches!(a, Animation::JumpLeft | Animation::JumpRight));
            if airborne {
                let animation = if status.is_moving_left != status.is_moving_right {
                    Animation::run(status.facing)
                } else {
                    Animation::still(status.facing)
                };
                self.play_animation(id, animation)?;
            }
        }

        self.push_transform(id)
    }

    fn update_bullet(&mut self, id: EntityId, dt: f32) -> Result<(), GameError> {
        let Some(entity) = self.registry.get(id) else {
            return Ok(());
        };
        if entity.is_remote() {
            return Ok(());
        }
        let mut body = entity.body()?;
        let heading = entity.rotation()?;
        let tuning = self.settings.tuning;

        let scene = Scene::new(&self.registry, &tuning.map);
        match fly(&scene, &mut body, heading, &tuning.bullet, dt) {
            Flight::Flying(position) => {
                if let Some(mut local) = self.registry.get_mut(id).and_then(|e| e.as_local_mut()) {
                    local.commit(position, None)?;
                }
                self.push_transform(id)
            }
            Flight::Hit(impact) => {
                self.destroy_entity(id, true);
                match impact {
                    Impact::Character(target) => {
                        self.damage_and_sync(target, tuning.bullet.damage)?;
                    }
                    Impact::Scenery(_) => {
                        self.sounds.play(SoundName::BulletObstacleHit, true);
                    }
                }
                Ok(())
            }
        }
    }

    fn push_transform(&mut self, id: EntityId) -> Result<(), GameError> {
        let Some(bindings) = self.bindings.get_mut(&id) else {
            return Ok(());
        };
        let Some(entity) = self.registry.get(id) else {
            return Ok(());
        };
        bindings
            .entity
            .sync_transform(entity.position()?, entity.rotation()?);
        Ok(())
    }

    /// Damages a character here and on the peer.
    pub fn damage_and_sync(
        &mut self,
        target: EntityId,
        points: u32,
    ) -> Result<DamageOutcome, GameError> {
        if let Some(character) = self.bindings.get(&target).and_then(|b| b.character.as_ref()) {
            character.sync_damage(points);
        }
        self.sounds.play(SoundName::Damage, true);
        self.damage(target, points)
    }

    fn damage(&mut self, target: EntityId, points: u32) -> Result<DamageOutcome, GameError> {
        let entity = self
            .registry
            .get_mut(target)
            .ok_or(GameError::UnknownEntity {
                entity_id: target,
                packet: "character/update",
            })?;
        let outcome = entity.damage(points)?;
        debug!(entity_id = %target, health = outcome.health, "character damaged");

        if outcome.died {
            self.kill(target);
        }
        Ok(outcome)
    }

    fn kill(&mut self, id: EntityId) {
        let Some(character) = self.destroy_entity(id, false) else {
            return;
        };
        self.sounds.play(SoundName::Kill, false);

        // A dead mirror means the opponent lost.
        let result = if character.is_remote() {
            MatchResult::Won
        } else {
            MatchResult::Lost
        };
        self.end(result);
    }

    /// Starts the wind-down. Only the first result counts.
    pub fn end(&mut self, result: MatchResult) {
        if matches!(self.state, MatchState::Ending { .. } | MatchState::Ended(_)) {
            debug!(%result, "match already ending; result ignored");
            return;
        }

        info!(%result, "match ending");
        self.ticker.speed = self.settings.tuning.pacing.wind_down_speed;
        self.state = MatchState::Ending {
            result,
            remaining: self.settings.tuning.pacing.wind_down,
        };
    }

    fn advance_wind_down(&mut self, elapsed: Duration) {
        let finished = match &mut self.state {
            MatchState::Ending { result, remaining } => {
                *remaining = remaining.saturating_sub(elapsed);
                remaining.is_zero().then(|| result.clone())
            }
            _ => None,
        };

        if let Some(result) = finished {
            self.finish(result);
        }
    }

    fn finish(&mut self, result: MatchResult) {
        info!(%result, "match over");
        self.state = MatchState::Ended(result.clone());
        if let Some(hook) = self.on_end.take() {
            hook(result);
        }
    }

    /// The inbound channel closed. Terminal.
    pub fn handle_peer_disconnect(&mut self) {
        if self.link.is_none() {
            return;
        }
        warn!("peer disconnected");

        let opponents: Vec<EntityId> = self
            .registry
            .iter()
            .filter(|e| e.is_remote() && e.entity_type() == EntityType::Character)
            .map(Entity::id)
            .collect();
        for id in opponents {
            if self.destroy_entity(id, false).is_some() {
                self.sounds.play(SoundName::Kill, false);
            }
        }

        self.link = None;
        self.bindings.clear();
        self.sounds.detach_peer();
        self.deferred.clear();
        self.end(MatchResult::Error(MatchError::OpponentDisconnected));
    }

    /// Applies one packet from the peer. Entity-addressed packets wait for the
    /// bootstrap barrier; desyncs are logged and counted.
    pub fn handle_packet(&mut self, packet: Packet) {
        if matches!(self.state, MatchState::Ended(_)) {
            debug!(packet = packet.name(), "match over; packet ignored");
            return;
        }

        if !self.hooked_up && packet.needs_initialized_match() {
            debug!(
                packet = packet.name(),
                entity_id = ?packet.entity_id(),
                "deferring until the match initializes"
            );
            self.deferred.push(packet);
            return;
        }

        if let Err(e) = self.apply_packet(packet) {
            self.record_error(e);
        }
    }

    fn apply_packet(&mut self, packet: Packet) -> Result<(), GameError> {
        match packet {
            Packet::CreateEntity(create) => {
                let entity = create_entity_from_packet(&create, &self.settings.tuning);
                self.add_entity(entity)?;
            }
            Packet::DestroyEntity(destroy) => {
                let id = EntityId::from_uuid(destroy.entity_id);
                if self.destroy_entity(id, false).is_none() {
                    debug!(entity_id = %id, "destroy for unknown entity ignored");
                }
            }
            Packet::InitializationCompleted => {
                if self.role() == Some(Role::Guest) {
                    self.peer_ready = true;
                    self.try_enter_initialized();
                } else {
                    warn!("initialization-completed from guest ignored");
                }
            }
            Packet::MapInitialize(map) => {
                if self.role() != Some(Role::Guest) {
                    warn!("map/initialize from guest ignored");
                    return Ok(());
                }
                self.clear_entities();
                for entity in entities_from_packet(&map, &self.settings.tuning) {
                    self.add_entity(entity)?;
                }
                info!(entities = self.registry.len(), "map received");
                self.peer_ready = true;
                self.try_enter_initialized();
            }
            Packet::EntityUpdate(update) => {
                let id = EntityId::from_uuid(update.entity_id);
                let (bindings, entity) = self.bound_entity(id, "entity/update")?;
                bindings.entity.handle(&update, entity)?;
            }
            Packet::CharacterUpdate(update) => {
                let id = EntityId::from_uuid(update.entity_id);
                let (bindings, entity) = self.bound_entity(id, "character/update")?;
                let character = bindings
                    .character
                    .as_ref()
                    .ok_or(GameError::WrongEntityKind {
                        entity_id: id,
                        expected: EntityType::Character,
                        found: entity.entity_type(),
                    })?;
                let outcome = character.handle(&update, entity)?;
                if outcome.is_some_and(|o| o.died) {
                    self.kill(id);
                }
            }
            Packet::SpriteUpdate(update) => {
                let id = EntityId::from_uuid(update.entity_id);
                let (bindings, entity) = self.bound_entity(id, "entity/sprite/update")?;
                let sprite = bindings.sprite.as_ref().ok_or(GameError::WrongEntityKind {
                    entity_id: id,
                    expected: EntityType::Character,
                    found: entity.entity_type(),
                })?;
                sprite.handle(&update, entity)?;
            }
            Packet::SoundPlay(sound) => {
                self.sounds.play(sound.sound_name.into(), false);
            }
        }
        Ok(())
    }

    fn bound_entity(
        &mut self,
        id: EntityId,
        packet: &'static str,
    ) -> Result<(&EntityBindings, &mut Entity), GameError> {
        let unknown = GameError::UnknownEntity {
            entity_id: id,
            packet,
        };
        let entity = self.registry.get_mut(id).ok_or(unknown.clone())?;
        let bindings = self.bindings.get(&id).ok_or(unknown)?;
        Ok((bindings, entity))
    }

    fn record_error(&mut self, e: GameError) {
        error!(error = %e, "packet handling failed");
        if !e.is_desync() {
            return;
        }

        self.protocol_errors += 1;
        if self.protocol_errors >= self.settings.max_protocol_errors {
            let reason = format!("{} protocol errors, last: {e}", self.protocol_errors);
            self.end(MatchResult::Error(MatchError::Stopped(reason)));
        }
    }

    /// Drives the locally controlled character.
    pub fn command_character(&mut self, command: CharacterCommand) -> Result<(), GameError> {
        if !self.hooked_up || matches!(self.state, MatchState::Ended(_)) {
            return Ok(());
        }
        let Some(id) = self.local_character() else {
            debug!(?command, "no local character; command ignored");
            return Ok(());
        };

        match command {
            CharacterCommand::StartMoveLeft => {
                self.with_movement(id, |status| {
                    status.is_moving_left = true;
                    status.facing = Facing::Left;
                })?;
                self.play_animation(id, Animation::RunLeft)?;
            }
            CharacterCommand::StartMoveRight => {
                self.with_movement(id, |status| {
                    status.is_moving_right = true;
                    status.facing = Facing::Right;
                })?;
                self.play_animation(id, Animation::RunRight)?;
            }
            CharacterCommand::StopMoveLeft => {
                let status = self.with_movement(id, |status| status.is_moving_left = false)?;
                if !status.is_moving_right {
                    self.play_animation(id, Animation::StillLeft)?;
                }
            }
            CharacterCommand::StopMoveRight => {
                let status = self.with_movement(id, |status| status.is_moving_right = false)?;
                if !status.is_moving_left {
                    self.play_animation(id, Animation::StillRight)?;
                }
            }
            CharacterCommand::Jump => {
                let status = self.with_movement(id, |status| status.is_jumping = true)?;
                self.play_animation(id, Animation::jump(status.facing))?;
            }
            CharacterCommand::ShootAt(aim) => self.shoot(id, aim)?,
        }
        Ok(())
    }

    fn with_movement(
        &mut self,
        id: EntityId,
        change: impl FnOnce(&mut MovementStatus),
    ) -> Result<MovementStatus, GameError> {
        let mut local = self
            .registry
            .get_mut(id)
            .and_then(|e| e.as_local_mut())
            .ok_or(GameError::NotInitialized { entity_id: id })?;
        let status = local
            .movement_mut()
            .ok_or(GameError::NotInitialized { entity_id: id })?;
        change(status);
        Ok(*status)
    }

    fn play_animation(&mut self, id: EntityId, animation: Animation) -> Result<(), GameError> {
        let Some(entity) = self.registry.get_mut(id) else {
            return Ok(());
        };
        if entity.set_animation(animation)?
            && let Some(sprite) = self.bindings.get(&id).and_then(|b| b.sprite.as_ref())
        {
            sprite.sync_animation(animation);
        }
        Ok(())
    }

    fn shoot(&mut self, shooter: EntityId, aim: Position) -> Result<(), GameError> {
        let Some(entity) = self.registry.get(shooter) else {
            return Ok(());
        };
        let (position, heading) = muzzle(&entity.bounds()?, aim, self.settings.tuning.bullet.size);

        self.sounds.play(SoundName::Shot, true);
        let bullet = Entity::new(EntityKind::Bullet, position, Authority::Local).with_rotation(heading);
        let id = self.add_entity_and_replicate(bullet)?;
        debug!(entity_id = %id, heading, "bullet fired");
        Ok(())
    }

    /// Entities a point light can see (no obstacle or wall in between).
    pub fn entities_lit_by(&self, light: EntityId) -> Option<Vec<EntityId>> {
        let entity = self.registry.get(light)?;
        if entity.entity_type() != EntityType::PointLight {
            return None;
        }
        let origin = entity.position().ok()?;
        let scene = Scene::new(&self.registry, &self.settings.tuning.map);
        Some(scene.visible_from(origin, light))
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.registry.get(id)
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn result(&self) -> Option<&MatchResult> {
        match &self.state {
            MatchState::Ended(result) => Some(result),
            _ => None,
        }
    }

    pub fn ticker(&self) -> Ticker {
        self.ticker
    }

    pub fn protocol_errors(&self) -> u32 {
        self.protocol_errors
    }

    pub fn role(&self) -> Option<Role> {
        self.link.as_ref().map(|link| link.role)
    }

    pub fn is_initialized(&self) -> bool {
        self.hooked_up
    }

    /// The character this peer controls.
    pub fn local_character(&self) -> Option<EntityId> {
        self.registry
            .iter()
            .find(|e| e.entity_type() == EntityType::Character && !e.is_remote())
            .map(Entity::id)
    }

    /// Tears down every entity, then the peer link. Safe to call twice.
    pub fn destroy(&mut self) {
        if self.torn_down {
            return;
        }

        self.clear_entities();
        self.pending.clear();
        self.deferred.clear();
        self.bindings.clear();
        self.sounds.detach_peer();
        self.link = None;
        self.torn_down = true;
        debug!("game destroyed");
    }
}

impl Drop for Game {
    fn drop(&mut self) {
        self.destroy();
    }
}
