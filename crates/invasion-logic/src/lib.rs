//! Pure progression logic for Invasion.
//!
//! This crate holds the economy and balancing rules that do not depend on
//! the ECS world: functions and types take plain data and return results,
//! making them unit-testable and reusable by the simulation engine and the
//! headless harness alike.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | Session balance (`GameConfig`), conversion modes, validation |
//! | [`currency`] | The four currencies and `CurrencyBundle` |
//! | [`geometry`] | `Vec2`, `Aabb`, arena bounds and clamping |
//! | [`kinds`] | Collectible kinds and their attribute table |
//! | [`quests`] | Quest goals, lifecycle and the `QuestTracker` |
//! | [`resources`] | `ResourcePool` balances and idle income |
//! | [`upgrades`] | Leveled upgrade catalog and the `UpgradeLedger` |

pub mod config;
pub mod currency;
pub mod geometry;
pub mod kinds;
pub mod quests;
pub mod resources;
pub mod upgrades;

pub use config::{ConfigError, ConversionMode, GameConfig};
pub use currency::{Currency, CurrencyBundle};
pub use geometry::{Aabb, Arena, Vec2};
pub use kinds::{CollectibleKind, KindStats, KindTable};
pub use quests::{Quest, QuestError, QuestGoal, QuestStatus, QuestTracker};
pub use resources::ResourcePool;
pub use upgrades::{StatDelta, StatKind, StatTarget, UpgradeError, UpgradeLedger};
