// Adapters between the simulation and the outside: wire protocol, transports,
// per-entity synchronizers, input and headless collaborators.

pub mod headless;
pub mod input;
pub mod net;
pub mod protocol;
pub mod synchronizers;
