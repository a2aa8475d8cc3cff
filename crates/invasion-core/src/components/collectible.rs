//! Collectible ("human") components: Collectible, Wander.

use invasion_logic::currency::Currency;
use invasion_logic::geometry::{Arena, Vec2};
use invasion_logic::kinds::{CollectibleKind, KindStats};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Respawn delay range in seconds (inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RespawnWindow {
    pub min: f32,
    pub max: f32,
}

impl RespawnWindow {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn draw(&self, rng: &mut impl Rng) -> f32 {
        if self.max > self.min {
            rng.gen_range(self.min..=self.max)
        } else {
            self.min
        }
    }
}

impl Default for RespawnWindow {
    fn default() -> Self {
        Self::new(1.0, 3.0)
    }
}

/// A consumable world entity. Dormant entities stay in the world and are
/// never collidable until they respawn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    pub kind: CollectibleKind,
    pub currency: Currency,
    pub size: f32,
    pub color: [u8; 3],
    value: u32,
    alive: bool,
    respawn_timer: f32,
    respawn_delay: f32,
}

impl Collectible {
    pub fn new(stats: &KindStats, respawn_delay: f32) -> Self {
        Self {
            kind: stats.kind,
            currency: stats.currency,
            size: stats.size,
            color: stats.color,
            value: stats.value,
            alive: true,
            respawn_timer: 0.0,
            respawn_delay,
        }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn respawn_delay(&self) -> f32 {
        self.respawn_delay
    }

    /// Seconds spent dormant so far.
    pub fn respawn_timer(&self) -> f32 {
        self.respawn_timer
    }

    /// Take the value and go dormant. A dormant entity yields 0 and stays
    /// dormant, so redundant calls in one pass are harmless.
    pub fn consume(&mut self) -> u32 {
        if !self.alive {
            return 0;
        }
        self.alive = false;
        self.respawn_timer = 0.0;
        self.value
    }

    /// Advance the respawn timer. Returns true on the tick the entity revives.
    pub fn update(&mut self, dt: f32, window: &RespawnWindow, rng: &mut impl Rng) -> bool {
        if self.alive {
            return false;
        }
        self.respawn_timer += dt;
        if self.respawn_timer >= self.respawn_delay {
            self.alive = true;
            self.respawn_timer = 0.0;
            self.respawn_delay = window.draw(rng);
            return true;
        }
        false
    }
}

/// Random-walk behavior for moving kinds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wander {
    pub velocity: Vec2,
    pub speed: f32,
    /// Seconds between heading changes
    pub interval: f32,
    redirect_timer: f32,
}

impl Wander {
    pub fn new(speed: f32, interval: f32, rng: &mut impl Rng) -> Self {
        Self {
            velocity: random_heading(rng) * speed,
            speed,
            interval,
            redirect_timer: 0.0,
        }
    }

    pub fn with_velocity(speed: f32, interval: f32, velocity: Vec2) -> Self {
        Self {
            velocity,
            speed,
            interval,
            redirect_timer: 0.0,
        }
    }

    /// Move `position` one tick, redirecting every `interval` seconds and
    /// bouncing off walls (the velocity component normal to the wall is
    /// mirrored).
    pub fn step(&mut self, position: &mut Vec2, radius: f32, dt: f32, arena: &Arena, rng: &mut impl Rng) {
        self.redirect_timer += dt;
        if self.redirect_timer >= self.interval {
            self.redirect_timer = 0.0;
            self.velocity = random_heading(rng) * self.speed;
        }

        let moved = *position + self.velocity * dt;
        let (clamped, contact) = arena.clamp(moved, radius);
        let center = arena.center();
        if contact.horizontal {
            self.velocity.x = if clamped.x < center.x {
                self.velocity.x.abs()
            } else {
                -self.velocity.x.abs()
            };
        }
        if contact.vertical {
            self.velocity.y = if clamped.y < center.y {
                self.velocity.y.abs()
            } else {
                -self.velocity.y.abs()
            };
        }
        *position = clamped;
    }
}

fn random_heading(rng: &mut impl Rng) -> Vec2 {
    Vec2::from_angle(rng.gen_range(0.0..std::f32::consts::TAU))
}
