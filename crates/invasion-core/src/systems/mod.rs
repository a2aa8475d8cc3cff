//! Systems - per-tick logic over the agent and collectible components

mod collection;
mod deposit;
mod movement;
mod wandering;

pub use collection::*;
pub use deposit::*;
pub use movement::*;
pub use wandering::*;
