use std::time::Duration;

/// Tuning for the end-of-match slow motion.
#[derive(Debug, Clone, Copy)]
pub struct PacingTuning {
    /// Ticker speed multiplier while the match winds down.
    pub wind_down_speed: f32,

    /// Real time between the end result and the match-over hook.
    pub wind_down: Duration,
}

impl Default for PacingTuning {
    fn default() -> Self {
        Self {
            wind_down_speed: 0.3,
            wind_down: Duration::from_millis(1000),
        }
    }
}
