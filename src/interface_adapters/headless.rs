// Stage and audio stand-ins for running a match without a window or speakers.

use crate::domain::{Entity, EntityId, EntityRegistry, SoundName, SoundPlayer, Stage};
use std::sync::{Arc, Mutex};
use tracing::{debug, trace};

/// What the headless stage currently shows.
#[derive(Debug, Default, Clone)]
pub struct StageView {
    /// Attached entities, bottom of the draw order first.
    pub attached: Vec<EntityId>,
    pub frames: u64,
}

/// Keeps a draw list instead of drawing. Clones share the same view.
#[derive(Debug, Default, Clone)]
pub struct HeadlessStage {
    view: Arc<Mutex<StageView>>,
}

impl HeadlessStage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> StageView {
        self.view.lock().map(|view| view.clone()).unwrap_or_default()
    }
}

impl Stage for HeadlessStage {
    fn attach(&mut self, entity: &Entity) {
        if let Ok(mut view) = self.view.lock() {
            // z = 0: new entities go under everything already attached.
            view.attached.insert(0, entity.id());
        }
        debug!(entity_id = %entity.id(), entity_type = %entity.entity_type(), "attached to stage");
    }

    fn detach(&mut self, entity_id: EntityId) {
        if let Ok(mut view) = self.view.lock() {
            view.attached.retain(|id| *id != entity_id);
        }
    }

    fn frame(&mut self, entities: &EntityRegistry) {
        if let Ok(mut view) = self.view.lock() {
            view.frames += 1;
            trace!(frame = view.frames, entities = entities.len(), "frame");
        }
    }
}

/// Logs sound effects instead of playing them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSoundPlayer;

impl SoundPlayer for LogSoundPlayer {
    fn play(&mut self, sound: SoundName, volume: f32) {
        debug!(%sound, volume, "sound");
    }
}
