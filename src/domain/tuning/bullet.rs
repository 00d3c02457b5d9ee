use crate::domain::geometry::Size;

/// Gameplay tuning for bullets.

#[derive(Debug, Clone, Copy)]
pub struct BulletTuning {
    /// Sprite and collision box size in pixels.
    pub size: Size,

    /// Flight speed in pixels per frame unit.
    pub velocity: f32,

    /// Health removed from a character on hit.
    pub damage: u32,
}

impl Default for BulletTuning {
    fn default() -> Self {
        Self {
            size: Size::new(40.0, 19.0),
            velocity: 60.0,
            damage: 10,
        }
    }
}
