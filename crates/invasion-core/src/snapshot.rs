//! Read-only view of a session for the presentation layer

use invasion_logic::currency::CurrencyBundle;
use invasion_logic::geometry::Vec2;
use invasion_logic::kinds::CollectibleKind;
use invasion_logic::quests::QuestStatus;
use invasion_logic::upgrades::UpgradeInfo;
use serde::Serialize;

use crate::components::{Collectible, EvolutionTier, Position};
use crate::engine::SimulationEngine;
use crate::session::GameState;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentView {
    pub position: Vec2,
    pub size: f32,
    pub cargo: u32,
    pub max_cargo: u32,
    pub speed: f32,
    pub efficiency_bonus: u64,
    pub tier: EvolutionTier,
    pub color: [u8; 3],
    pub spikes: u32,
    pub pointer_target: Option<Vec2>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaseView {
    pub position: Vec2,
    pub radius: f32,
    pub docked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectibleView {
    pub index: u32,
    pub position: Vec2,
    pub size: f32,
    pub alive: bool,
    pub kind: CollectibleKind,
    pub color: [u8; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestView {
    pub title: String,
    pub description: String,
    pub progress: u64,
    pub target: u64,
    pub status: QuestStatus,
    pub reward: CurrencyBundle,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldSnapshot {
    pub state: GameState,
    pub upgrade_panel_open: bool,
    /// Simulated seconds
    pub elapsed: f64,
    pub frame: u64,
    pub agent: AgentView,
    pub balances: CurrencyBundle,
    pub base: BaseView,
    pub collectibles: Vec<CollectibleView>,
    pub upgrades: Vec<UpgradeInfo>,
    pub quests: Vec<QuestView>,
}

impl WorldSnapshot {
    pub fn capture(engine: &SimulationEngine, state: GameState, upgrade_panel_open: bool) -> Self {
        let agent = engine.agent();
        let total_levels = engine.upgrades().total_levels();
        let tier = agent.evolution_tier(total_levels);
        let base = &engine.config().base;

        let collectibles = engine
            .collectibles()
            .iter()
            .enumerate()
            .filter_map(|(i, &entity)| {
                let mut query = engine
                    .world
                    .query_one::<(&Position, &Collectible)>(entity)
                    .ok()?;
                let (pos, c) = query.get()?;
                Some(CollectibleView {
                    index: i as u32,
                    position: pos.0,
                    size: c.size,
                    alive: c.is_alive(),
                    kind: c.kind,
                    color: c.color,
                })
            })
            .collect();

        let quests = engine
            .quests()
            .active()
            .iter()
            .map(|q| QuestView {
                title: q.title.clone(),
                description: q.description.clone(),
                progress: q.progress(),
                target: q.target,
                status: q.status(),
                reward: q.reward,
            })
            .collect();

        Self {
            state,
            upgrade_panel_open,
            elapsed: engine.sim_time(),
            frame: engine.frame(),
            agent: AgentView {
                position: agent.position,
                size: agent.size(),
                cargo: agent.cargo_count(),
                max_cargo: agent.max_cargo(),
                speed: agent.speed(),
                efficiency_bonus: agent.efficiency_bonus(),
                tier,
                color: tier.color(),
                spikes: EvolutionTier::spikes(total_levels),
                pointer_target: agent.pointer_target(),
            },
            balances: engine.resources().balances(),
            base: BaseView {
                position: base.position,
                radius: base.radius,
                docked: engine.agent_at_base(),
            },
            collectibles,
            upgrades: engine.upgrades().infos(engine.resources()),
            quests,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use invasion_logic::config::GameConfig;

    #[test]
    fn test_capture_fresh_session() {
        let engine = SimulationEngine::new(GameConfig {
            seed: Some(5),
            ..GameConfig::default()
        })
        .unwrap();
        let snap = WorldSnapshot::capture(&engine, GameState::Menu, false);

        assert_eq!(snap.collectibles.len(), 20);
        assert!(snap.collectibles.iter().all(|c| c.alive));
        assert_eq!(snap.upgrades.len(), 4);
        assert_eq!(snap.quests.len(), 3);
        assert_eq!(snap.agent.cargo, 0);
        assert_eq!(snap.agent.max_cargo, 3);
        assert_eq!(snap.agent.tier, EvolutionTier::Base);
        assert_eq!(snap.agent.spikes, 0);
        assert!(!snap.base.docked);
    }

    #[test]
    fn test_snapshot_json() {
        let engine = SimulationEngine::new(GameConfig {
            seed: Some(5),
            ..GameConfig::default()
        })
        .unwrap();
        let json = WorldSnapshot::capture(&engine, GameState::Playing, true)
            .to_json()
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["state"], "playing");
        assert_eq!(value["upgrade_panel_open"], true);
        assert_eq!(value["balances"]["meat"], 0);
        assert_eq!(value["collectibles"].as_array().unwrap().len(), 20);
    }
}
