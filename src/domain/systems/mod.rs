// Per-tick rules for locally authoritative entities.

pub mod movement;
pub mod projectiles;
