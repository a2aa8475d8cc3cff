//! Common components used across entity types.

use invasion_logic::geometry::{Aabb, Vec2};
use serde::{Deserialize, Serialize};

/// Arena position component (center of the entity)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Position(pub Vec2);

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }

    /// Square collision box of side `size` around this position
    pub fn bounds(&self, size: f32) -> Aabb {
        Aabb::centered(self.0, size)
    }
}

/// Spawn index - stable ordering of collectibles for snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpawnIndex(pub u32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_bounds() {
        let pos = Position::new(10.0, 20.0);
        let bb = pos.bounds(4.0);
        assert_eq!(bb.min, Vec2::new(8.0, 18.0));
        assert_eq!(bb.max, Vec2::new(12.0, 22.0));
    }
}
