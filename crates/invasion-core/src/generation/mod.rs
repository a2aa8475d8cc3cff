//! Generation - procedural placement of collectibles

mod spawn;

pub use spawn::*;
