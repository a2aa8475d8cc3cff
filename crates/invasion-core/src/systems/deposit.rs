//! Base pass - converts carried cargo into currency at the drop-off point

use invasion_logic::config::{BaseConfig, BonusConfig, ConversionMode};
use invasion_logic::currency::{Currency, CurrencyBundle};
use invasion_logic::resources::ResourcePool;
use rand::Rng;

use crate::components::{Agent, CargoItem};
use crate::events::{EventQueue, GameEvent};

/// Strictly inside the base radius counts as docked.
pub fn at_base(agent: &Agent, base: &BaseConfig) -> bool {
    agent.position.distance(&base.position) < base.radius
}

/// Currency earned for a drained cargo load, before the efficiency bonus.
pub fn convert_cargo(
    items: &[CargoItem],
    mode: ConversionMode,
    bonus: &BonusConfig,
    rng: &mut impl Rng,
) -> CurrencyBundle {
    let mut gained = CurrencyBundle::ZERO;
    match mode {
        ConversionMode::Deferred => {
            for item in items {
                *gained.get_mut(item.currency) += 1;
            }
        }
        ConversionMode::Immediate => {
            *gained.get_mut(Currency::PRIMARY) = items.iter().map(|item| item.value as u64).sum();
            if rng.gen_bool(bonus.deposit_cell_chance) {
                gained.cells += 1;
            }
        }
    }
    gained
}

/// Unload the agent when it is docked with something aboard. Returns what the
/// deposit credited, or `None` when nothing happened.
pub fn deposit_system(
    agent: &mut Agent,
    base: &BaseConfig,
    mode: ConversionMode,
    bonus: &BonusConfig,
    pool: &mut ResourcePool,
    events: &mut EventQueue,
    rng: &mut impl Rng,
) -> Option<CurrencyBundle> {
    if agent.cargo_count() == 0 || !at_base(agent, base) {
        return None;
    }

    let items = agent.return_to_base();
    let mut gained = convert_cargo(&items, mode, bonus, rng);
    *gained.get_mut(Currency::PRIMARY) += agent.efficiency_bonus();
    pool.add_bundle(&gained);

    log::info!("Deposited {} units for {}", items.len(), gained);
    events.push(GameEvent::Deposited {
        units: items.len() as u32,
        gained,
    });
    Some(gained)
}
