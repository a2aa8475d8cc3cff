//! Component definitions for the ECS simulation.
//!
//! Collectibles live in the `hecs` world as plain data components; the
//! agent is a singleton owned by the engine. Behavior lives in systems.

mod agent;
mod collectible;
mod common;

pub use agent::*;
pub use collectible::*;
pub use common::*;
