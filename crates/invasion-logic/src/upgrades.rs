//! Leveled upgrade shop.
//!
//! Cost scales linearly: buying level `L + 1` costs `base_cost * (L + 1)` in
//! every currency. A purchase is atomic: all four costs are deducted and the
//! level increments by one, or nothing changes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::currency::CurrencyBundle;
use crate::resources::ResourcePool;

/// Agent stat an upgrade raises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    Speed,
    Cargo,
    Size,
    Efficiency,
}

/// Additive change to one stat.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatDelta {
    pub stat: StatKind,
    pub amount: f32,
}

/// Anything whose stats upgrades can raise.
pub trait StatTarget {
    fn apply_stat(&mut self, delta: StatDelta);
}

/// Static description of an upgrade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeDef {
    pub id: String,
    pub name: String,
    pub description: String,
    pub base_cost: CurrencyBundle,
    #[serde(default = "default_max_level")]
    pub max_level: u32,
    pub stat: StatKind,
    /// Added to the stat on every level bought.
    pub per_level: f32,
}

fn default_max_level() -> u32 {
    5
}

impl UpgradeDef {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        base_cost: CurrencyBundle,
        stat: StatKind,
        per_level: f32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            base_cost,
            max_level: default_max_level(),
            stat,
            per_level,
        }
    }

    pub fn with_max_level(mut self, max_level: u32) -> Self {
        self.max_level = max_level;
        self
    }
}

/// The shipped catalog: speed, cargo, size, efficiency.
pub fn default_catalog() -> Vec<UpgradeDef> {
    vec![
        UpgradeDef::new(
            "speed",
            "Alien Speed",
            "Move faster to hunt more efficiently",
            CurrencyBundle::new(5, 0, 0, 0),
            StatKind::Speed,
            50.0,
        ),
        UpgradeDef::new(
            "cargo",
            "Stomach Capacity",
            "Carry more humans before returning to base",
            CurrencyBundle::new(10, 0, 0, 0),
            StatKind::Cargo,
            2.0,
        ),
        UpgradeDef::new(
            "size",
            "Alien Growth",
            "Grow larger to consume humans more easily",
            CurrencyBundle::new(8, 2, 0, 0),
            StatKind::Size,
            3.0,
        ),
        UpgradeDef::new(
            "efficiency",
            "Feeding Efficiency",
            "Convert humans to more meat",
            CurrencyBundle::new(15, 0, 1, 0),
            StatKind::Efficiency,
            1.0,
        ),
    ]
}

/// Why a purchase was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpgradeError {
    #[error("unknown upgrade `{0}`")]
    Unknown(String),
    #[error("upgrade `{id}` is already at max level {max_level}")]
    Maxed { id: String, max_level: u32 },
    #[error("cannot afford `{id}`: needs {cost}")]
    Unaffordable { id: String, cost: CurrencyBundle },
}

/// A catalog entry plus its current level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Upgrade {
    pub def: UpgradeDef,
    pub level: u32,
}

impl Upgrade {
    pub fn new(def: UpgradeDef) -> Self {
        Self { def, level: 0 }
    }

    pub fn is_maxed(&self) -> bool {
        self.level >= self.def.max_level
    }

    /// Cost of the next level; zero once maxed.
    pub fn next_cost(&self) -> CurrencyBundle {
        if self.is_maxed() {
            CurrencyBundle::ZERO
        } else {
            self.def.base_cost.scaled(self.level as u64 + 1)
        }
    }
}

/// Presentation view of one upgrade.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpgradeInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub level: u32,
    pub max_level: u32,
    pub next_cost: CurrencyBundle,
    pub affordable: bool,
    pub maxed: bool,
}

/// Every upgrade in catalog order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpgradeLedger {
    upgrades: Vec<Upgrade>,
}

impl UpgradeLedger {
    pub fn new(catalog: Vec<UpgradeDef>) -> Self {
        Self {
            upgrades: catalog.into_iter().map(Upgrade::new).collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Upgrade> {
        self.upgrades.iter().find(|u| u.def.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Upgrade> {
        self.upgrades.iter_mut().find(|u| u.def.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Upgrade> {
        self.upgrades.iter()
    }

    /// Current level; unknown ids read as level 0.
    pub fn level(&self, id: &str) -> u32 {
        self.get(id).map(|u| u.level).unwrap_or(0)
    }

    /// Sum of all levels (drives the cosmetic evolution tier).
    pub fn total_levels(&self) -> u32 {
        self.upgrades.iter().map(|u| u.level).sum()
    }

    /// Next-level cost. All-zero for unknown or maxed upgrades.
    pub fn get_cost(&self, id: &str) -> CurrencyBundle {
        self.get(id).map(Upgrade::next_cost).unwrap_or(CurrencyBundle::ZERO)
    }

    pub fn check_purchase(&self, id: &str, pool: &ResourcePool) -> Result<CurrencyBundle, UpgradeError> {
        let upgrade = self.get(id).ok_or_else(|| UpgradeError::Unknown(id.to_string()))?;
        if upgrade.is_maxed() {
            return Err(UpgradeError::Maxed {
                id: id.to_string(),
                max_level: upgrade.def.max_level,
            });
        }
        let cost = upgrade.next_cost();
        if !pool.can_afford(&cost) {
            return Err(UpgradeError::Unaffordable {
                id: id.to_string(),
                cost,
            });
        }
        Ok(cost)
    }

    pub fn can_purchase(&self, id: &str, pool: &ResourcePool) -> bool {
        self.check_purchase(id, pool).is_ok()
    }

    /// Spend the cost and bump the level. Returns the stat change the caller
    /// must apply; on error nothing was touched.
    pub fn try_purchase(&mut self, id: &str, pool: &mut ResourcePool) -> Result<StatDelta, UpgradeError> {
        let cost = self.check_purchase(id, pool)?;
        if !pool.spend_bundle(&cost) {
            // check_purchase just verified affordability.
            return Err(UpgradeError::Unaffordable {
                id: id.to_string(),
                cost,
            });
        }
        let upgrade = self
            .get_mut(id)
            .ok_or_else(|| UpgradeError::Unknown(id.to_string()))?;
        upgrade.level += 1;
        log::info!(
            "Purchased {} level {} for {}",
            upgrade.def.id,
            upgrade.level,
            cost
        );
        Ok(StatDelta {
            stat: upgrade.def.stat,
            amount: upgrade.def.per_level,
        })
    }

    /// Boolean form of [`try_purchase`](Self::try_purchase) that also applies
    /// the stat change to `target`.
    pub fn purchase(&mut self, id: &str, pool: &mut ResourcePool, target: &mut impl StatTarget) -> bool {
        match self.try_purchase(id, pool) {
            Ok(delta) => {
                target.apply_stat(delta);
                true
            }
            Err(err) => {
                log::debug!("Purchase refused: {}", err);
                false
            }
        }
    }

    pub fn info(&self, id: &str, pool: &ResourcePool) -> Option<UpgradeInfo> {
        let upgrade = self.get(id)?;
        Some(UpgradeInfo {
            id: upgrade.def.id.clone(),
            name: upgrade.def.name.clone(),
            description: upgrade.def.description.clone(),
            level: upgrade.level,
            max_level: upgrade.def.max_level,
            next_cost: upgrade.next_cost(),
            affordable: self.can_purchase(id, pool),
            maxed: upgrade.is_maxed(),
        })
    }

    pub fn infos(&self, pool: &ResourcePool) -> Vec<UpgradeInfo> {
        self.upgrades
            .iter()
            .filter_map(|u| self.info(&u.def.id, pool))
            .collect()
    }
}

impl Default for UpgradeLedger {
    fn default() -> Self {
        Self::new(default_catalog())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::Currency;

    #[derive(Default)]
    struct Stats {
        cargo: f32,
        speed: f32,
    }

    impl StatTarget for Stats {
        fn apply_stat(&mut self, delta: StatDelta) {
            match delta.stat {
                StatKind::Cargo => self.cargo += delta.amount,
                StatKind::Speed => self.speed += delta.amount,
                _ => {}
            }
        }
    }

    #[test]
    fn test_cost_scales_linearly() {
        let mut ledger = UpgradeLedger::default();
        let mut pool = ResourcePool::with_balances(CurrencyBundle::new(1000, 100, 100, 0));
        let mut stats = Stats::default();

        for level in 0..5u64 {
            assert_eq!(ledger.get_cost("size"), CurrencyBundle::new(8, 2, 0, 0).scaled(level + 1));
            assert!(ledger.purchase("size", &mut pool, &mut stats));
        }
        assert_eq!(ledger.level("size"), 5);
        assert_eq!(ledger.get_cost("size"), CurrencyBundle::ZERO);
    }

    #[test]
    fn test_purchase_cargo_scenario() {
        let mut ledger = UpgradeLedger::default();
        let mut pool = ResourcePool::new();
        let mut stats = Stats::default();

        pool.add(Currency::Meat, 9);
        assert!(!ledger.purchase("cargo", &mut pool, &mut stats));
        assert_eq!(pool.balance(Currency::Meat), 9);
        assert_eq!(ledger.level("cargo"), 0);

        pool.add(Currency::Meat, 1);
        assert!(ledger.purchase("cargo", &mut pool, &mut stats));
        assert_eq!(pool.balance(Currency::Meat), 0);
        assert_eq!(ledger.level("cargo"), 1);
        assert_eq!(stats.cargo, 2.0);
    }

    #[test]
    fn test_refusal_reasons() {
        let mut ledger = UpgradeLedger::new(vec![UpgradeDef::new(
            "speed",
            "Speed",
            "",
            CurrencyBundle::new(1, 0, 0, 0),
            StatKind::Speed,
            10.0,
        )
        .with_max_level(1)]);
        let mut pool = ResourcePool::new();

        assert_eq!(
            ledger.try_purchase("wings", &mut pool),
            Err(UpgradeError::Unknown("wings".into()))
        );
        assert!(matches!(
            ledger.try_purchase("speed", &mut pool),
            Err(UpgradeError::Unaffordable { .. })
        ));

        pool.add(Currency::Meat, 5);
        assert!(ledger.try_purchase("speed", &mut pool).is_ok());
        assert!(matches!(
            ledger.try_purchase("speed", &mut pool),
            Err(UpgradeError::Maxed { max_level: 1, .. })
        ));
        assert_eq!(pool.balance(Currency::Meat), 4);
    }

    #[test]
    fn test_purchase_touches_only_costed_currencies() {
        let mut ledger = UpgradeLedger::default();
        let mut pool = ResourcePool::with_balances(CurrencyBundle::new(20, 5, 5, 5));
        let mut stats = Stats::default();

        assert!(ledger.purchase("efficiency", &mut pool, &mut stats));
        assert_eq!(pool.balances(), CurrencyBundle::new(5, 5, 4, 5));
    }

    #[test]
    fn test_info_reports_affordability() {
        let ledger = UpgradeLedger::default();
        let pool = ResourcePool::with_balances(CurrencyBundle::new(5, 0, 0, 0));
        let infos = ledger.infos(&pool);
        assert_eq!(infos.len(), 4);
        let speed = infos.iter().find(|i| i.id == "speed").unwrap();
        assert!(speed.affordable);
        let cargo = infos.iter().find(|i| i.id == "cargo").unwrap();
        assert!(!cargo.affordable);
        assert_eq!(cargo.next_cost, CurrencyBundle::new(10, 0, 0, 0));
        assert!(ledger.info("wings", &pool).is_none());
    }

    #[test]
    fn test_unknown_cost_is_zero() {
        let ledger = UpgradeLedger::default();
        assert_eq!(ledger.get_cost("wings"), CurrencyBundle::ZERO);
        assert_eq!(ledger.level("wings"), 0);
    }
}
