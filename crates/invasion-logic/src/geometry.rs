//! 2D arena geometry: vectors, axis-aligned boxes and arena bounds.

use serde::{Deserialize, Serialize};

/// 2D position / velocity vector (screen coordinates, y grows downward).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance_squared(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn distance(&self, other: &Self) -> f32 {
        self.distance_squared(other).sqrt()
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self {
                x: self.x / len,
                y: self.y / len,
            }
        } else {
            Self::ZERO
        }
    }

    /// Unit vector for a heading in radians.
    pub fn from_angle(radians: f32) -> Self {
        Self {
            x: radians.cos(),
            y: radians.sin(),
        }
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

/// Axis-aligned bounding box, centered on a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Square box of side `size` centered on `center`.
    pub fn centered(center: Vec2, size: f32) -> Self {
        let half = size / 2.0;
        Self {
            min: Vec2::new(center.x - half, center.y - half),
            max: Vec2::new(center.x + half, center.y + half),
        }
    }

    /// Overlap test; touching edges do not count.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    pub fn contains(&self, point: &Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }
}

/// Which walls a clamp touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallContact {
    /// Left or right wall.
    pub horizontal: bool,
    /// Top or bottom wall.
    pub vertical: bool,
}

/// The playfield, `[0, width] x [0, height]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Clamp a point so a body of `radius` stays inside.
    /// Degenerate bodies wider than the arena are pinned to its center line.
    pub fn clamp(&self, point: Vec2, radius: f32) -> (Vec2, WallContact) {
        let (x, hit_x) = clamp_axis(point.x, radius, self.width);
        let (y, hit_y) = clamp_axis(point.y, radius, self.height);
        (
            Vec2::new(x, y),
            WallContact {
                horizontal: hit_x,
                vertical: hit_y,
            },
        )
    }

    pub fn contains(&self, point: &Vec2, radius: f32) -> bool {
        point.x >= radius
            && point.x <= self.width - radius
            && point.y >= radius
            && point.y <= self.height - radius
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(1024.0, 768.0)
    }
}

fn clamp_axis(value: f32, radius: f32, extent: f32) -> (f32, bool) {
    let lo = radius;
    let hi = extent - radius;
    if lo > hi {
        return (extent / 2.0, true);
    }
    if value <= lo {
        (lo, true)
    } else if value >= hi {
        (hi, true)
    } else {
        (value, false)
    }
}
