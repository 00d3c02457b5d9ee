use crate::domain::geometry::Size;

/// Gameplay tuning for player characters.
///
/// Velocities and forces are expressed per frame unit (one 60 Hz frame).

#[derive(Debug, Clone, Copy)]
pub struct CharacterTuning {
    /// Sprite and collision box size in pixels.
    pub size: Size,

    /// Health a character spawns with.
    pub max_health: u32,

    /// Horizontal speed in pixels per frame unit.
    pub horizontal_velocity: f32,

    /// Downward acceleration added each frame unit.
    pub gravity_force: f32,

    /// Upward velocity applied on the tick a jump starts.
    pub jump_force: f32,
}

impl Default for CharacterTuning {
    fn default() -> Self {
        Self {
            size: Size::new(115.0, 124.0),
            max_health: 100,
            horizontal_velocity: 10.0,
            gravity_force: 0.9,
            jump_force: 20.0,
        }
    }
}
