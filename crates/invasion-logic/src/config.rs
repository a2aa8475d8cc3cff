//! Session balance configuration.
//!
//! `GameConfig::default()` is the shipped balance. Every field has a default
//! so partial JSON files only need to name what they change.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::currency::{Currency, CurrencyBundle};
use crate::geometry::{Arena, Vec2};
use crate::kinds::KindTable;
use crate::quests::{follow_up_quests, starter_quests, Quest};
use crate::upgrades::{default_catalog, UpgradeDef};

/// When collected kinds turn into currency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionMode {
    /// Each deposited unit adds one of its kind's currency at the base.
    #[default]
    Deferred,
    /// Cargo collapses to its summed value, credited as meat at the base;
    /// bonus drops roll at collection time.
    Immediate,
}

/// Starting stats of the player entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub size: f32,
    pub speed: f32,
    pub max_cargo: u32,
    pub efficiency_bonus: u64,
    /// Pointer-seeking speed as a fraction of `speed`.
    pub auto_move_factor: f32,
    /// Pointer seeking stops within this distance of the target.
    pub arrive_threshold: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            size: 20.0,
            speed: 200.0,
            max_cargo: 3,
            efficiency_bonus: 0,
            auto_move_factor: 0.75,
            arrive_threshold: 5.0,
        }
    }
}

/// Fixed drop-off point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseConfig {
    pub position: Vec2,
    pub radius: f32,
}

impl Default for BaseConfig {
    fn default() -> Self {
        Self {
            position: Vec2::new(50.0, 50.0),
            radius: 40.0,
        }
    }
}

/// Collectible population and placement rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub count: usize,
    /// Keep-out margin from the arena edges.
    pub margin: f32,
    pub min_distance_from_agent: f32,
    pub min_distance_from_base: f32,
    /// Respawn delay range in seconds.
    pub respawn_min: f32,
    pub respawn_max: f32,
    /// Seconds between wander heading changes.
    pub wander_interval: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            count: 20,
            margin: 100.0,
            min_distance_from_agent: 100.0,
            min_distance_from_base: 80.0,
            respawn_min: 1.0,
            respawn_max: 3.0,
            wander_interval: 2.0,
        }
    }
}

/// Extra rolls made by the immediate-conversion economy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BonusConfig {
    /// Chance a deposit also yields one cell.
    pub deposit_cell_chance: f64,
}

impl Default for BonusConfig {
    fn default() -> Self {
        Self {
            deposit_cell_chance: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestConfig {
    pub active_capacity: usize,
    pub starters: Vec<Quest>,
    pub follow_ups: Vec<Quest>,
}

impl Default for QuestConfig {
    fn default() -> Self {
        Self {
            active_capacity: 3,
            starters: starter_quests(),
            follow_ups: follow_up_quests(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub arena: Arena,
    pub base: BaseConfig,
    pub agent: AgentConfig,
    pub spawn: SpawnConfig,
    pub kinds: KindTable,
    pub conversion: ConversionMode,
    pub bonus: BonusConfig,
    pub starting_balances: CurrencyBundle,
    /// Passive income per second for each currency.
    pub idle_income: CurrencyRates,
    pub upgrades: Vec<UpgradeDef>,
    pub quests: QuestConfig,
    /// Playing ends in game over after this many seconds, if set.
    pub session_time_limit: Option<f32>,
    /// Fixed RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            arena: Arena::default(),
            base: BaseConfig::default(),
            agent: AgentConfig::default(),
            spawn: SpawnConfig::default(),
            kinds: KindTable::default(),
            conversion: ConversionMode::default(),
            bonus: BonusConfig::default(),
            starting_balances: CurrencyBundle::ZERO,
            idle_income: CurrencyRates::default(),
            upgrades: default_catalog(),
            quests: QuestConfig::default(),
            session_time_limit: None,
            seed: None,
        }
    }
}

/// Per-second income rates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyRates {
    pub meat: f64,
    pub eggs: f64,
    pub dna: f64,
    pub cells: f64,
}

impl CurrencyRates {
    pub fn get(&self, currency: Currency) -> f64 {
        match currency {
            Currency::Meat => self.meat,
            Currency::Eggs => self.eggs,
            Currency::Dna => self.dna,
            Currency::Cells => self.cells,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("arena must have positive size, got {width}x{height}")]
    EmptyArena { width: f32, height: f32 },
    #[error("agent {field} must be positive")]
    NonPositiveAgentStat { field: &'static str },
    #[error("respawn range [{min}, {max}] is invalid")]
    BadRespawnRange { min: f32, max: f32 },
    #[error("kind table is empty but {count} collectibles are requested")]
    NoKinds { count: usize },
    #[error("spawn weight {weight} for {what} must be finite and non-negative")]
    BadSpawnWeight { what: String, weight: f32 },
    #[error("upgrade id `{0}` appears more than once")]
    DuplicateUpgrade(String),
    #[error("chance {value} for {what} is outside [0, 1]")]
    BadChance { what: String, value: f64 },
    #[error("quest `{0}` has a zero target")]
    ZeroTarget(String),
}

impl GameConfig {
    /// Check invariants the simulation relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.arena.width > 0.0 && self.arena.height > 0.0) {
            return Err(ConfigError::EmptyArena {
                width: self.arena.width,
                height: self.arena.height,
            });
        }
        if !(self.agent.size > 0.0) {
            return Err(ConfigError::NonPositiveAgentStat { field: "size" });
        }
        if !(self.agent.speed > 0.0) {
            return Err(ConfigError::NonPositiveAgentStat { field: "speed" });
        }
        let (min, max) = (self.spawn.respawn_min, self.spawn.respawn_max);
        if !(min >= 0.0 && max >= min) {
            return Err(ConfigError::BadRespawnRange { min, max });
        }
        if self.spawn.count > 0 && self.kinds.is_empty() {
            return Err(ConfigError::NoKinds {
                count: self.spawn.count,
            });
        }
        let mut total_weight = 0.0f32;
        for stats in self.kinds.entries() {
            let weight = stats.spawn_weight;
            if !(weight.is_finite() && weight >= 0.0) {
                return Err(ConfigError::BadSpawnWeight {
                    what: stats.kind.name().to_string(),
                    weight,
                });
            }
            total_weight += weight;
        }
        if !total_weight.is_finite() {
            return Err(ConfigError::BadSpawnWeight {
                what: "all kinds".to_string(),
                weight: total_weight,
            });
        }
        for (i, def) in self.upgrades.iter().enumerate() {
            if self.upgrades[..i].iter().any(|d| d.id == def.id) {
                return Err(ConfigError::DuplicateUpgrade(def.id.clone()));
            }
        }
        check_chance("deposit cells", self.bonus.deposit_cell_chance)?;
        for stats in self.kinds.entries() {
            if let Some(bonus) = stats.bonus {
                check_chance(stats.kind.name(), bonus.chance)?;
            }
        }
        for quest in self.quests.starters.iter().chain(&self.quests.follow_ups) {
            if quest.target == 0 {
                return Err(ConfigError::ZeroTarget(quest.title.clone()));
            }
        }
        Ok(())
    }
}

fn check_chance(what: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::BadChance {
            what: what.to_string(),
            value,
        })
    }
}
