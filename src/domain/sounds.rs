use std::fmt;

/// Sound effects the game can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundName {
    Jump,
    Land,
    Damage,
    BulletObstacleHit,
    Kill,
    Shot,
}

impl SoundName {
    pub const ALL: [SoundName; 6] = [
        SoundName::Jump,
        SoundName::Land,
        SoundName::Damage,
        SoundName::BulletObstacleHit,
        SoundName::Kill,
        SoundName::Shot,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            SoundName::Jump => "jump",
            SoundName::Land => "land",
            SoundName::Damage => "damage",
            SoundName::BulletObstacleHit => "bulletObstacleHit",
            SoundName::Kill => "kill",
            SoundName::Shot => "shot",
        }
    }

    /// Playback volume; values above 1.0 boost quiet recordings.
    pub const fn volume(self) -> f32 {
        match self {
            SoundName::Jump => 1.2,
            SoundName::Land => 0.2,
            SoundName::Damage => 0.7,
            SoundName::BulletObstacleHit => 0.3,
            SoundName::Kill => 1.0,
            SoundName::Shot => 0.45,
        }
    }
}

impl fmt::Display for SoundName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
