// Ordered entity storage with tick subscriptions.

use super::entity::{Entity, EntityId};
use super::errors::GameError;
use indexmap::{IndexMap, IndexSet};

/// Live entities in insertion order plus the subset hooked into the tick.
///
/// Every id is either subscribed or pending initialization; removal drops both
/// the entity and its subscription together. A removed id is retired and can
/// never be inserted again.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    entities: IndexMap<EntityId, Entity>,
    subscriptions: IndexSet<EntityId>,
    retired: IndexSet<EntityId>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Stores a new entity without subscribing it to the tick.
    pub fn insert(&mut self, entity: Entity) -> Result<(), GameError> {
        let id = entity.id();
        if self.entities.contains_key(&id) || self.retired.contains(&id) {
            return Err(GameError::DuplicateEntity { entity_id: id });
        }
        self.entities.insert(id, entity);
        Ok(())
    }

    /// Hooks a stored entity into the tick. Unknown ids are ignored.
    pub fn subscribe(&mut self, id: EntityId) -> bool {
        self.entities.contains_key(&id) && self.subscriptions.insert(id)
    }

    pub fn is_subscribed(&self, id: EntityId) -> bool {
        self.subscriptions.contains(&id)
    }

    /// Removes the entity and its subscription and retires the id. Order of the
    /// rest is kept.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let entity = self.entities.shift_remove(&id)?;
        self.subscriptions.shift_remove(&id);
        self.retired.insert(id);
        Some(entity)
    }

    pub fn is_retired(&self, id: EntityId) -> bool {
        self.retired.contains(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.entities.keys().copied().collect()
    }

    /// Snapshot so the tick can add or remove entities while walking it.
    pub fn subscribed_ids(&self) -> Vec<EntityId> {
        self.subscriptions.iter().copied().collect()
    }

    /// Empties the registry in insertion order without retiring the ids, so a
    /// re-sent roster can bring them back.
    pub fn drain(&mut self) -> Vec<Entity> {
        self.subscriptions.clear();
        self.entities.drain(..).map(|(_, entity)| entity).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::{Authority, EntityKind};
    use crate::domain::geometry::Position;

    fn bullet() -> Entity {
        Entity::new(EntityKind::Bullet, Position::new(0.0, 0.0), Authority::Local)
    }

    #[test]
    fn when_entity_is_removed_then_subscription_goes_with_it() {
        let mut registry = EntityRegistry::new();
        let entity = bullet();
        let id = entity.id();
        registry.insert(entity).expect("fresh id");
        assert!(registry.subscribe(id));

        let removed = registry.remove(id).expect("entity was stored");

        assert_eq!(removed.id(), id);
        assert!(!registry.contains(id));
        assert!(!registry.is_subscribed(id));
        assert!(registry.subscribed_ids().is_empty());
    }

    #[test]
    fn when_id_is_reused_then_insert_fails() {
        let mut registry = EntityRegistry::new();
        let entity = bullet();
        let copy = entity.clone();
        registry.insert(entity).expect("fresh id");

        let err = registry.insert(copy).expect_err("duplicate id");

        assert!(matches!(err, GameError::DuplicateEntity { .. }));
    }

    #[test]
    fn when_removed_id_is_inserted_again_then_insert_fails() {
        let mut registry = EntityRegistry::new();
        let entity = bullet();
        let id = entity.id();
        let copy = entity.clone();
        registry.insert(entity).expect("fresh id");
        registry.remove(id).expect("entity was stored");

        let err = registry.insert(copy).expect_err("retired id");

        assert!(matches!(err, GameError::DuplicateEntity { entity_id } if entity_id == id));
        assert!(registry.is_retired(id));
        assert!(!registry.contains(id));
    }

    #[test]
    fn when_registry_is_drained_then_ids_can_be_stored_again() {
        let mut registry = EntityRegistry::new();
        let entity = bullet();
        let id = entity.id();
        registry.insert(entity).expect("fresh id");
        assert!(registry.subscribe(id));

        let drained = registry.drain();
        assert_eq!(drained.len(), 1);
        assert!(registry.subscribed_ids().is_empty());
        assert!(!registry.is_retired(id));

        registry
            .insert(drained.into_iter().next().expect("one entity"))
            .expect("drained id is not retired");
        assert!(registry.contains(id));
    }

    #[test]
    fn when_unknown_id_is_subscribed_then_nothing_changes() {
        let mut registry = EntityRegistry::new();

        assert!(!registry.subscribe(EntityId::new()));
        assert!(registry.subscribed_ids().is_empty());
    }

    #[test]
    fn when_middle_entity_is_removed_then_order_is_kept() {
        let mut registry = EntityRegistry::new();
        let ids: Vec<EntityId> = (0..3)
            .map(|_| {
                let entity = bullet();
                let id = entity.id();
                registry.insert(entity).expect("fresh id");
                id
            })
            .collect();

        registry.remove(ids[1]);

        assert_eq!(registry.ids(), vec![ids[0], ids[2]]);
    }
}
