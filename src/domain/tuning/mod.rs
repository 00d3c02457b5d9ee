// Gameplay tuning.
// Keep this separate from runtime configuration (tick rates, channel sizes, addresses).

pub mod bullet;
pub mod character;
pub mod map;
pub mod pacing;

pub use bullet::BulletTuning;
pub use character::CharacterTuning;
pub use map::MapTuning;
pub use pacing::PacingTuning;

/// All gameplay tuning for one match.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tuning {
    pub character: CharacterTuning,
    pub bullet: BulletTuning,
    pub map: MapTuning,
    pub pacing: PacingTuning,
}
