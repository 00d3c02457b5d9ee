// Frameworks layer: runtime bootstrap, configuration and scripted drivers.

pub mod autopilot;
pub mod config;
pub mod server;
