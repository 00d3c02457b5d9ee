use crate::domain::{SoundName, SoundPlayer};
use crate::interface_adapters::synchronizers::SoundSynchronizer;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Plays sound effects and mirrors them to the peer when asked to.
pub struct SoundManager {
    player: Box<dyn SoundPlayer>,
    loaded: HashSet<SoundName>,
    synchronizer: Option<SoundSynchronizer>,
}

impl SoundManager {
    pub fn new(player: Box<dyn SoundPlayer>) -> Self {
        Self {
            player,
            loaded: HashSet::new(),
            synchronizer: None,
        }
    }

    /// Loads every sound and binds the peer link, if any.
    pub fn initialize_and_load_sounds(&mut self, synchronizer: Option<SoundSynchronizer>) {
        self.synchronizer = synchronizer;

        for sound in SoundName::ALL {
            if self.player.load(sound) {
                self.loaded.insert(sound);
            } else {
                warn!(%sound, "failed to load sound");
            }
        }
        debug!(count = self.loaded.len(), "sounds loaded");
    }

    /// Plays `sound`; with `sync` the peer plays it too. Returns whether it played.
    pub fn play(&mut self, sound: SoundName, sync: bool) -> bool {
        if !self.loaded.contains(&sound) {
            warn!(%sound, "sound played before it was loaded; skipping");
            return false;
        }

        self.player.play(sound, sound.volume());

        if sync && let Some(synchronizer) = &self.synchronizer {
            synchronizer.sync_played_sound(sound);
        }
        true
    }

    /// Stops mirroring sounds once the peer is gone.
    pub fn detach_peer(&mut self) {
        self.synchronizer = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface_adapters::net::loopback_pair;
    use crate::interface_adapters::protocol::{Packet, SoundNameDto, SoundPlayPacket};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<(SoundName, f32)>>>);

    impl SoundPlayer for Recorder {
        fn play(&mut self, sound: SoundName, volume: f32) {
            self.0.lock().expect("recorder lock").push((sound, volume));
        }
    }

    #[test]
    fn when_sounds_are_not_loaded_then_play_is_skipped() {
        let recorder = Recorder::default();
        let mut sounds = SoundManager::new(Box::new(recorder.clone()));

        assert!(!sounds.play(SoundName::Jump, false));
        assert!(recorder.0.lock().expect("recorder lock").is_empty());
    }

    #[tokio::test]
    async fn when_synced_sound_plays_then_peer_is_told() {
        let (host, mut guest) = loopback_pair(8);
        let recorder = Recorder::default();
        let mut sounds = SoundManager::new(Box::new(recorder.clone()));
        sounds.initialize_and_load_sounds(Some(SoundSynchronizer::new(host.sender.clone())));

        assert!(sounds.play(SoundName::Shot, true));
        assert!(sounds.play(SoundName::Kill, false));
        drop(sounds);
        drop(host);

        assert_eq!(
            recorder.0.lock().expect("recorder lock").as_slice(),
            &[(SoundName::Shot, 0.45), (SoundName::Kill, 1.0)]
        );
        assert_eq!(
            guest.receiver.recv().await,
            Some(Packet::SoundPlay(SoundPlayPacket {
                sound_name: SoundNameDto::Shot
            }))
        );
        assert_eq!(guest.receiver.recv().await, None);
    }
}
