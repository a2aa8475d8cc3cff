//! Simulation engine - owns the world and runs the per-frame tick

use hecs::{Entity, World};
use invasion_logic::config::{ConfigError, GameConfig};
use invasion_logic::currency::{Currency, CurrencyBundle};
use invasion_logic::geometry::{Arena, Vec2};
use invasion_logic::quests::{QuestError, QuestTracker};
use invasion_logic::resources::ResourcePool;
use invasion_logic::upgrades::{StatTarget, UpgradeError, UpgradeLedger};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::components::*;
use crate::events::{EventQueue, GameEvent};
use crate::generation::{spawn_collectibles, Exclusions};
use crate::systems::*;

/// Main simulation engine
///
/// Everything the tick touches lives here and is handed to each system
/// explicitly; there is no shared global state.
pub struct SimulationEngine {
    /// ECS world holding the collectibles
    pub world: World,
    agent: Agent,
    resources: ResourcePool,
    upgrades: UpgradeLedger,
    quests: QuestTracker,
    /// Collectible entities in spawn order
    collectibles: Vec<Entity>,
    config: GameConfig,
    respawn_window: RespawnWindow,
    rng: StdRng,
    events: EventQueue,
    /// Seconds simulated since creation
    sim_time: f64,
    frame: u64,
    time_scale: f32,
}

impl SimulationEngine {
    /// Build a fresh session from a validated config
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let agent = Agent::new(config.arena.center(), &config.agent);

        let mut resources = ResourcePool::with_balances(config.starting_balances);
        for currency in Currency::ALL {
            resources.set_rate(currency, config.idle_income.get(currency));
        }

        let upgrades = UpgradeLedger::new(config.upgrades.clone());
        let quests = QuestTracker::new(
            config.quests.starters.clone(),
            config.quests.follow_ups.clone(),
            config.quests.active_capacity,
        );

        let mut world = World::new();
        let avoid = Exclusions {
            agent: agent.position,
            base: config.base.position,
        };
        let collectibles = spawn_collectibles(
            &mut world,
            &config.arena,
            &config.spawn,
            &config.kinds,
            &avoid,
            &mut rng,
        );

        log::info!(
            "Session ready: {} collectibles, {:?} conversion, arena {}x{}",
            collectibles.len(),
            config.conversion,
            config.arena.width,
            config.arena.height
        );

        Ok(Self {
            world,
            agent,
            resources,
            upgrades,
            quests,
            collectibles,
            respawn_window: RespawnWindow::new(config.spawn.respawn_min, config.spawn.respawn_max),
            config,
            rng,
            events: EventQueue::new(),
            sim_time: 0.0,
            frame: 0,
            time_scale: 1.0,
        })
    }

    /// Advance the simulation by one frame.
    ///
    /// Order: agent movement, collectible update, collision, base deposit,
    /// idle income, quest refresh.
    pub fn tick(&mut self, delta_seconds: f32, input: &MoveInput) {
        let dt = if delta_seconds.is_finite() {
            delta_seconds.max(0.0) * self.time_scale
        } else {
            0.0
        };
        self.sim_time += dt as f64;
        self.frame += 1;

        agent_movement_system(&mut self.agent, input, &self.config.arena, dt);

        collectible_system(
            &mut self.world,
            dt,
            &self.config.arena,
            &self.respawn_window,
            &mut self.rng,
        );

        collection_system(
            &mut self.world,
            &self.collectibles,
            &mut self.agent,
            &self.config.kinds,
            self.config.conversion,
            &mut self.resources,
            &mut self.events,
            &mut self.rng,
        );

        deposit_system(
            &mut self.agent,
            &self.config.base,
            self.config.conversion,
            &self.config.bonus,
            &mut self.resources,
            &mut self.events,
            &mut self.rng,
        );

        self.resources.tick(dt);

        for title in self.quests.refresh(&self.resources, &self.upgrades) {
            self.events.push(GameEvent::QuestCompleted { title });
        }
    }

    /// Buy the next level of an upgrade and apply it to the agent.
    /// Returns the new level.
    pub fn try_purchase_upgrade(&mut self, id: &str) -> Result<u32, UpgradeError> {
        let delta = self.upgrades.try_purchase(id, &mut self.resources)?;
        self.agent.apply_stat(delta);
        let level = self.upgrades.level(id);
        self.events.push(GameEvent::UpgradePurchased {
            id: id.to_string(),
            level,
        });
        Ok(level)
    }

    pub fn purchase_upgrade(&mut self, id: &str) -> bool {
        match self.try_purchase_upgrade(id) {
            Ok(_) => true,
            Err(err) => {
                log::warn!("Upgrade refused: {}", err);
                false
            }
        }
    }

    /// Claim the active quest at `index`, crediting its reward.
    pub fn try_claim_quest(&mut self, index: usize) -> Result<CurrencyBundle, QuestError> {
        let title = self
            .quests
            .active()
            .get(index)
            .map(|quest| quest.title.clone())
            .ok_or(QuestError::NoSuchQuest(index))?;
        let reward = self.quests.try_claim(index, &mut self.resources, &mut self.rng)?;
        self.events.push(GameEvent::QuestClaimed { title, reward });
        Ok(reward)
    }

    pub fn claim_quest(&mut self, index: usize) -> bool {
        match self.try_claim_quest(index) {
            Ok(_) => true,
            Err(err) => {
                log::warn!("Claim refused: {}", err);
                false
            }
        }
    }

    /// Start seeking toward a point (click/tap). Keyboard input cancels it.
    pub fn set_pointer_target(&mut self, target: Vec2) {
        self.agent.set_pointer_target(target);
    }

    /// Take every event pushed since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    pub fn pending_events(&self) -> &EventQueue {
        &self.events
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Set time scale (1.0 = real-time, 2.0 = 2x speed, etc.)
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = if scale.is_finite() { scale.max(0.0) } else { 1.0 };
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Seconds simulated so far
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    /// Ticks run so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn arena(&self) -> &Arena {
        &self.config.arena
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn agent_mut(&mut self) -> &mut Agent {
        &mut self.agent
    }

    pub fn resources(&self) -> &ResourcePool {
        &self.resources
    }

    pub fn resources_mut(&mut self) -> &mut ResourcePool {
        &mut self.resources
    }

    pub fn upgrades(&self) -> &UpgradeLedger {
        &self.upgrades
    }

    pub fn quests(&self) -> &QuestTracker {
        &self.quests
    }

    /// Collectible entities in spawn order
    pub fn collectibles(&self) -> &[Entity] {
        &self.collectibles
    }

    /// Count collectibles that can currently be picked up
    pub fn alive_collectible_count(&self) -> usize {
        self.world
            .query::<&Collectible>()
            .iter()
            .filter(|(_, c)| c.is_alive())
            .count()
    }

    /// Whether the agent is docked at the base this frame
    pub fn agent_at_base(&self) -> bool {
        at_base(&self.agent, &self.config.base)
    }

    /// Cosmetic tier from the total upgrade level
    pub fn evolution_tier(&self) -> EvolutionTier {
        self.agent.evolution_tier(self.upgrades.total_levels())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use invasion_logic::kinds::KindTable;

    fn config() -> GameConfig {
        GameConfig {
            seed: Some(7),
            ..GameConfig::default()
        }
    }

    #[test]
    fn test_engine_creation() {
        let engine = SimulationEngine::new(config()).unwrap();
        assert_eq!(engine.collectibles().len(), 20);
        assert_eq!(engine.alive_collectible_count(), 20);
        assert_eq!(engine.agent().position, Vec2::new(512.0, 384.0));
        assert!(engine.resources().balances().is_zero());
        assert_eq!(engine.quests().active().len(), 3);
        assert_eq!(engine.sim_time(), 0.0);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let bad = GameConfig {
            kinds: KindTable::new(Vec::new()),
            ..config()
        };
        assert!(matches!(
            SimulationEngine::new(bad),
            Err(ConfigError::NoKinds { .. })
        ));
    }

    #[test]
    fn test_engine_update() {
        let mut engine = SimulationEngine::new(config()).unwrap();
        for _ in 0..60 {
            engine.tick(1.0 / 60.0, &MoveInput::NONE);
        }
        assert!((engine.sim_time() - 1.0).abs() < 0.001);
        assert_eq!(engine.frame(), 60);
    }

    #[test]
    fn test_time_scale() {
        let mut engine = SimulationEngine::new(config()).unwrap();
        engine.set_time_scale(2.0);
        engine.tick(1.0, &MoveInput::NONE);
        assert!((engine.sim_time() - 2.0).abs() < 0.0001);
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = SimulationEngine::new(config()).unwrap();
        let b = SimulationEngine::new(config()).unwrap();
        for (&ea, &eb) in a.collectibles().iter().zip(b.collectibles()) {
            let pa = a.world.get::<&Position>(ea).unwrap().0;
            let pb = b.world.get::<&Position>(eb).unwrap().0;
            assert_eq!(pa, pb);
        }
    }

    #[test]
    fn test_purchase_applies_to_agent() {
        let mut engine = SimulationEngine::new(config()).unwrap();
        assert!(!engine.purchase_upgrade("cargo"));
        engine.resources_mut().add(Currency::Meat, 10);
        assert!(engine.purchase_upgrade("cargo"));
        assert_eq!(engine.agent().max_cargo(), 5);
        assert!(engine
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::UpgradePurchased { level: 1, .. })));
    }

    #[test]
    fn test_idle_income_ticks() {
        let mut cfg = config();
        cfg.idle_income.meat = 2.0;
        let mut engine = SimulationEngine::new(cfg).unwrap();
        for _ in 0..4 {
            engine.tick(0.5, &MoveInput::NONE);
        }
        assert_eq!(engine.resources().balance(Currency::Meat), 4);
    }
}
