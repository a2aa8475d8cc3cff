//! Collectible placement and population

use hecs::{Entity, World};
use invasion_logic::config::SpawnConfig;
use invasion_logic::geometry::{Arena, Vec2};
use invasion_logic::kinds::KindTable;
use rand::Rng;

use crate::components::{Collectible, Position, RespawnWindow, SpawnIndex, Wander};

/// Tries per phase of rejection sampling.
pub const SPAWN_ATTEMPTS: u32 = 64;

/// Points a spawn must keep clear of.
#[derive(Debug, Clone, Copy)]
pub struct Exclusions {
    pub agent: Vec2,
    pub base: Vec2,
}

/// Pick a point inside the arena margin, away from the agent and the base.
///
/// Sampling is bounded: after [`SPAWN_ATTEMPTS`] misses both distances are
/// halved for another round, and after that the last candidate is taken as is.
pub fn find_spawn_position(
    arena: &Arena,
    config: &SpawnConfig,
    avoid: &Exclusions,
    rng: &mut impl Rng,
) -> Vec2 {
    let mut candidate = random_point(arena, config.margin, rng);
    for relax in [1.0, 0.5] {
        let agent_min = config.min_distance_from_agent * relax;
        let base_min = config.min_distance_from_base * relax;
        for _ in 0..SPAWN_ATTEMPTS {
            if candidate.distance(&avoid.agent) >= agent_min && candidate.distance(&avoid.base) >= base_min {
                return candidate;
            }
            candidate = random_point(arena, config.margin, rng);
        }
        log::warn!("Spawn placement relaxed after {} attempts (x{})", SPAWN_ATTEMPTS, relax);
    }
    candidate
}

fn random_point(arena: &Arena, margin: f32, rng: &mut impl Rng) -> Vec2 {
    Vec2::new(
        axis_sample(arena.width, margin, rng),
        axis_sample(arena.height, margin, rng),
    )
}

fn axis_sample(extent: f32, margin: f32, rng: &mut impl Rng) -> f32 {
    let (lo, hi) = (margin.max(0.0), extent - margin.max(0.0));
    if lo < hi {
        rng.gen_range(lo..=hi)
    } else {
        // Margin swallows the arena; use the middle.
        extent / 2.0
    }
}

/// Populate the world with `config.count` collectibles drawn from `kinds`.
/// Returned entities are in spawn order (matching their [`SpawnIndex`]).
pub fn spawn_collectibles(
    world: &mut World,
    arena: &Arena,
    config: &SpawnConfig,
    kinds: &KindTable,
    avoid: &Exclusions,
    rng: &mut impl Rng,
) -> Vec<Entity> {
    let window = RespawnWindow::new(config.respawn_min, config.respawn_max);
    let mut entities = Vec::with_capacity(config.count);

    for i in 0..config.count {
        let Some(stats) = kinds.pick(rng) else {
            break;
        };
        let position = find_spawn_position(arena, config, avoid, rng);
        let collectible = Collectible::new(stats, window.draw(rng));
        let entity = world.spawn((Position(position), collectible, SpawnIndex(i as u32)));
        if stats.wanders() {
            let wander = Wander::new(stats.move_speed, config.wander_interval, rng);
            // Entity was spawned just above.
            let _ = world.insert_one(entity, wander);
        }
        entities.push(entity);
    }

    log::debug!("Spawned {} collectibles", entities.len());
    entities
}
