//! Invasion Core - Arena Simulation Engine
//!
//! An ECS-based simulation of a top-down collect-and-return game: the
//! player's alien roams an arena, scoops up humans into a bounded cargo hold
//! and converts them into currency at its base. Currency buys upgrades and
//! quests reward milestones.
//!
//! # Architecture
//!
//! Collectibles live in a `hecs` world; the agent and the progression state
//! (`ResourcePool`, `UpgradeLedger`, `QuestTracker` from `invasion-logic`) are
//! owned by [`SimulationEngine`](engine::SimulationEngine) and passed to each
//! system explicitly:
//! - **Components**: Pure data (Position, Collectible, Wander, Agent)
//! - **Systems**: Free functions run in a fixed order every tick
//! - **Session**: Menu / pause / game-over state machine around the engine
//!
//! # Example
//!
//! ```rust
//! use invasion_core::prelude::*;
//!
//! let mut session = GameSession::new(GameConfig::default()).unwrap();
//! session.handle(Command::StartGame);
//!
//! for _ in 0..600 {
//!     session.update(1.0 / 60.0, &MoveInput::NONE); // 60 FPS
//!     let _frame = session.snapshot();
//!     // Events queue up until drained; consume them every frame.
//!     for _event in session.drain_events() {}
//! }
//! assert!(session.engine().pending_events().is_empty());
//! ```

pub mod components;
pub mod engine;
pub mod events;
pub mod generation;
pub mod session;
pub mod snapshot;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::engine::SimulationEngine;
    pub use crate::events::GameEvent;
    pub use crate::session::{Command, GameSession, GameState};
    pub use crate::snapshot::WorldSnapshot;
    pub use invasion_logic::config::GameConfig;
}
