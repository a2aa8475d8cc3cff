//! Collectible update - respawn timers for dormant entities, random walk for
//! live wanderers

use hecs::World;
use invasion_logic::geometry::Arena;
use rand::Rng;

use crate::components::{Collectible, Position, RespawnWindow, SpawnIndex, Wander};

/// Advance every collectible by one tick. Returns the spawn indices that
/// revived this tick.
pub fn collectible_system(
    world: &mut World,
    delta_seconds: f32,
    arena: &Arena,
    window: &RespawnWindow,
    rng: &mut impl Rng,
) -> Vec<u32> {
    let mut revived = Vec::new();

    for (_, (pos, collectible, index, wander)) in world.query_mut::<(
        &mut Position,
        &mut Collectible,
        &SpawnIndex,
        Option<&mut Wander>,
    )>() {
        if !collectible.is_alive() {
            if collectible.update(delta_seconds, window, rng) {
                log::debug!("Collectible #{} ({}) respawned", index.0, collectible.kind.name());
                revived.push(index.0);
            }
            // Dormant bodies hold still, including the tick they revive on.
            continue;
        }

        if let Some(wander) = wander {
            wander.step(&mut pos.0, collectible.size / 2.0, delta_seconds, arena, rng);
        }
    }

    revived
}

#[cfg(test)]
mod tests {
    use super::*;
    use invasion_logic::geometry::Vec2;
    use invasion_logic::kinds::{CollectibleKind, KindTable};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn spawn(world: &mut World, kind: CollectibleKind, at: Vec2, index: u32) -> hecs::Entity {
        let table = KindTable::default();
        let stats = table.get(kind).unwrap();
        let entity = world.spawn((Position(at), Collectible::new(stats, 1.5), SpawnIndex(index)));
        if stats.wanders() {
            world
                .insert_one(entity, Wander::with_velocity(stats.move_speed, 2.0, Vec2::new(stats.move_speed, 0.0)))
                .unwrap();
        }
        entity
    }

    #[test]
    fn test_wanderer_moves_stationary_does_not() {
        let mut world = World::new();
        let mut rng = StdRng::seed_from_u64(1);
        let arena = Arena::default();
        let still = spawn(&mut world, CollectibleKind::Normal, Vec2::new(400.0, 400.0), 0);
        let fast = spawn(&mut world, CollectibleKind::Fast, Vec2::new(300.0, 300.0), 1);

        collectible_system(&mut world, 0.5, &arena, &RespawnWindow::default(), &mut rng);

        assert_eq!(world.get::<&Position>(still).unwrap().0, Vec2::new(400.0, 400.0));
        let moved = world.get::<&Position>(fast).unwrap().0;
        assert!((moved.x - 340.0).abs() < 0.01);
    }

    #[test]
    fn test_dormant_wanderer_holds_still_until_respawn() {
        let mut world = World::new();
        let mut rng = StdRng::seed_from_u64(2);
        let arena = Arena::default();
        let window = RespawnWindow::default();
        let fast = spawn(&mut world, CollectibleKind::Fast, Vec2::new(300.0, 300.0), 7);
        world.get::<&mut Collectible>(fast).unwrap().consume();

        let revived = collectible_system(&mut world, 1.0, &arena, &window, &mut rng);
        assert!(revived.is_empty());
        assert_eq!(world.get::<&Position>(fast).unwrap().0, Vec2::new(300.0, 300.0));

        let revived = collectible_system(&mut world, 1.0, &arena, &window, &mut rng);
        assert_eq!(revived, vec![7]);
        assert!(world.get::<&Collectible>(fast).unwrap().is_alive());
    }
}
