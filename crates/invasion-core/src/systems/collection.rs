//! Collision pass - the agent picks up live collectibles it overlaps

use hecs::{Entity, World};
use invasion_logic::config::ConversionMode;
use invasion_logic::kinds::KindTable;
use invasion_logic::resources::ResourcePool;
use rand::Rng;

use crate::components::{Agent, CargoItem, Collectible, Position, SpawnIndex};
use crate::events::{EventQueue, GameEvent};

/// Offer every overlapping live collectible to the agent, in spawn order.
/// The agent accepts first; only then is the collectible consumed, so a full
/// cargo leaves later entities alive. Returns the number collected.
///
/// In [`ConversionMode::Immediate`] each pickup also rolls its kind's bonus
/// drop straight into `pool`.
#[allow(clippy::too_many_arguments)]
pub fn collection_system(
    world: &mut World,
    order: &[Entity],
    agent: &mut Agent,
    kinds: &KindTable,
    mode: ConversionMode,
    pool: &mut ResourcePool,
    events: &mut EventQueue,
    rng: &mut impl Rng,
) -> u32 {
    if !agent.alive {
        return 0;
    }
    let agent_box = agent.bounds();
    let mut collected = 0;

    for &entity in order {
        let Ok((pos, collectible, index)) =
            world.query_one_mut::<(&Position, &mut Collectible, &SpawnIndex)>(entity)
        else {
            continue;
        };
        if !collectible.is_alive() || !pos.bounds(collectible.size).intersects(&agent_box) {
            continue;
        }

        let item = CargoItem {
            kind: collectible.kind,
            currency: collectible.currency,
            value: collectible.value(),
        };
        if !agent.consume(item) {
            continue;
        }
        collectible.consume();
        collected += 1;
        log::debug!(
            "Collected #{} ({}), cargo {}/{}",
            index.0,
            item.kind.name(),
            agent.cargo_count(),
            agent.max_cargo()
        );
        events.push(GameEvent::Collected {
            index: index.0,
            kind: item.kind,
            position: pos.0,
        });

        if mode == ConversionMode::Immediate {
            roll_bonus_drop(kinds, &item, pool, events, rng);
        }
    }

    collected
}

fn roll_bonus_drop(
    kinds: &KindTable,
    item: &CargoItem,
    pool: &mut ResourcePool,
    events: &mut EventQueue,
    rng: &mut impl Rng,
) {
    let Some(bonus) = kinds.get(item.kind).and_then(|stats| stats.bonus) else {
        return;
    };
    if rng.gen_bool(bonus.chance) {
        pool.add(bonus.currency, 1);
        log::debug!("Bonus drop: +1 {}", bonus.currency);
        events.push(GameEvent::BonusDrop {
            currency: bonus.currency,
            amount: 1,
        });
    }
}
