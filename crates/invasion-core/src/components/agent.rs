//! The player-controlled alien.
//!
//! The agent owns its motion and its cargo buffer. It never touches the
//! resource pool: `return_to_base` only hands the drained cargo back to the
//! caller, which decides what it is worth.

use invasion_logic::config::AgentConfig;
use invasion_logic::currency::Currency;
use invasion_logic::geometry::{Aabb, Arena, Vec2};
use invasion_logic::kinds::CollectibleKind;
use invasion_logic::upgrades::{StatDelta, StatKind, StatTarget};
use serde::{Deserialize, Serialize};

/// Diagonal keyboard movement scales each axis by this factor.
pub const DIAGONAL_FACTOR: f32 = 0.707;

/// Keyboard movement intent for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveInput {
    pub const NONE: Self = Self {
        up: false,
        down: false,
        left: false,
        right: false,
    };

    /// Axis intent in `{-1, 0, 1}`; opposite keys cancel.
    pub fn axes(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| match (neg, pos) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        };
        Vec2::new(axis(self.left, self.right), axis(self.up, self.down))
    }

    pub fn is_idle(&self) -> bool {
        self.axes() == Vec2::ZERO
    }
}

/// One collected unit in transit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CargoItem {
    pub kind: CollectibleKind,
    /// Currency this unit converts into at a deferred deposit.
    pub currency: Currency,
    pub value: u32,
}

/// Cosmetic stage derived from the total upgrade level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvolutionTier {
    Base,
    Budding,
    Evolved,
    Apex,
    Legendary,
}

impl EvolutionTier {
    pub fn from_total_levels(total: u32) -> Self {
        match total {
            0 => EvolutionTier::Base,
            1..=4 => EvolutionTier::Budding,
            5..=9 => EvolutionTier::Evolved,
            10..=14 => EvolutionTier::Apex,
            _ => EvolutionTier::Legendary,
        }
    }

    /// Body color for the tier.
    pub fn color(&self) -> [u8; 3] {
        match self {
            EvolutionTier::Base => [128, 0, 128],
            EvolutionTier::Budding => [150, 0, 200],
            EvolutionTier::Evolved => [200, 50, 150],
            EvolutionTier::Apex => [255, 100, 100],
            EvolutionTier::Legendary => [255, 200, 0],
        }
    }

    /// Spikes drawn around the body; none below 5 total levels.
    pub fn spikes(total: u32) -> u32 {
        if total >= 5 {
            (total / 2).min(8)
        } else {
            0
        }
    }
}

/// Player entity (singleton, owned by the engine)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub position: Vec2,
    pub velocity: Vec2,
    size: f32,
    speed: f32,
    max_cargo: u32,
    efficiency_bonus: u64,
    cargo: Vec<CargoItem>,
    pub alive: bool,
    pointer_target: Option<Vec2>,
    auto_move_factor: f32,
    arrive_threshold: f32,
}

impl Agent {
    pub fn new(position: Vec2, config: &AgentConfig) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            size: config.size,
            speed: config.speed,
            max_cargo: config.max_cargo,
            efficiency_bonus: config.efficiency_bonus,
            cargo: Vec::with_capacity(config.max_cargo as usize),
            alive: true,
            pointer_target: None,
            auto_move_factor: config.auto_move_factor,
            arrive_threshold: config.arrive_threshold,
        }
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Pointer-seeking speed.
    pub fn auto_move_speed(&self) -> f32 {
        self.speed * self.auto_move_factor
    }

    pub fn max_cargo(&self) -> u32 {
        self.max_cargo
    }

    pub fn efficiency_bonus(&self) -> u64 {
        self.efficiency_bonus
    }

    pub fn cargo_count(&self) -> u32 {
        self.cargo.len() as u32
    }

    pub fn cargo(&self) -> &[CargoItem] {
        &self.cargo
    }

    pub fn is_full(&self) -> bool {
        self.cargo_count() >= self.max_cargo
    }

    /// Summed value of everything carried.
    pub fn cargo_value(&self) -> u64 {
        self.cargo.iter().map(|item| item.value as u64).sum()
    }

    pub fn pointer_target(&self) -> Option<Vec2> {
        self.pointer_target
    }

    pub fn set_pointer_target(&mut self, target: Vec2) {
        self.pointer_target = Some(target);
    }

    pub fn cancel_pointer_target(&mut self) {
        self.pointer_target = None;
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::centered(self.position, self.size)
    }

    /// Advance one tick. Keyboard intent wins over (and cancels) a pointer
    /// target; the result is clamped so the whole body stays in the arena.
    pub fn update(&mut self, dt: f32, input: &MoveInput, arena: &Arena) {
        if !self.alive {
            return;
        }

        let mut axes = input.axes();
        if axes != Vec2::ZERO {
            self.pointer_target = None;
            if axes.x != 0.0 && axes.y != 0.0 {
                axes = axes * DIAGONAL_FACTOR;
            }
            self.velocity = axes * self.speed;
            self.position = self.position + axes * (self.speed * dt);
        } else if let Some(target) = self.pointer_target {
            // Seek the nearest point the body can occupy.
            let (target, _) = arena.clamp(target, self.size / 2.0);
            let to_target = target - self.position;
            let distance = to_target.length();
            if distance <= self.arrive_threshold {
                self.pointer_target = None;
                self.velocity = Vec2::ZERO;
            } else {
                let speed = self.auto_move_speed();
                let direction = to_target.normalize();
                self.velocity = direction * speed;
                // Do not overshoot the target on a long frame.
                let step = (speed * dt).min(distance);
                self.position = self.position + direction * step;
                if self.position.distance(&target) <= self.arrive_threshold {
                    self.pointer_target = None;
                }
            }
        } else {
            self.velocity = Vec2::ZERO;
        }

        let (clamped, _) = arena.clamp(self.position, self.size / 2.0);
        self.position = clamped;
    }

    /// Take one unit aboard. Refused (no change) when the cargo is full.
    pub fn consume(&mut self, item: CargoItem) -> bool {
        if self.is_full() {
            return false;
        }
        self.cargo.push(item);
        true
    }

    /// Drain the cargo and hand it to the caller. Empty cargo yields an
    /// empty list and changes nothing.
    pub fn return_to_base(&mut self) -> Vec<CargoItem> {
        std::mem::take(&mut self.cargo)
    }

    /// Cosmetic tier for a given total upgrade level.
    pub fn evolution_tier(&self, total_upgrade_levels: u32) -> EvolutionTier {
        EvolutionTier::from_total_levels(total_upgrade_levels)
    }
}

impl StatTarget for Agent {
    /// Stats only grow; negative deltas are ignored.
    fn apply_stat(&mut self, delta: StatDelta) {
        let amount = delta.amount.max(0.0);
        match delta.stat {
            StatKind::Speed => self.speed += amount,
            StatKind::Size => self.size += amount,
            StatKind::Cargo => self.max_cargo = self.max_cargo.saturating_add(amount.round() as u32),
            StatKind::Efficiency => {
                self.efficiency_bonus = self.efficiency_bonus.saturating_add(amount.round() as u64)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meat() -> CargoItem {
        CargoItem {
            kind: CollectibleKind::Normal,
            currency: Currency::Meat,
            value: 1,
        }
    }

    fn agent_at(x: f32, y: f32) -> Agent {
        Agent::new(Vec2::new(x, y), &AgentConfig::default())
    }

    #[test]
    fn test_straight_movement() {
        let arena = Arena::new(1000.0, 1000.0);
        let mut agent = agent_at(500.0, 500.0);
        let input = MoveInput {
            right: true,
            ..MoveInput::NONE
        };
        agent.update(0.5, &input, &arena);
        assert!((agent.position.x - 600.0).abs() < 0.01);
        assert_eq!(agent.position.y, 500.0);
    }

    #[test]
    fn test_diagonal_is_scaled() {
        let arena = Arena::new(1000.0, 1000.0);
        let mut agent = agent_at(500.0, 500.0);
        let input = MoveInput {
            up: true,
            left: true,
            ..MoveInput::NONE
        };
        agent.update(1.0, &input, &arena);
        let expected = 200.0 * DIAGONAL_FACTOR;
        assert!((agent.position.x - (500.0 - expected)).abs() < 0.01);
        assert!((agent.position.y - (500.0 - expected)).abs() < 0.01);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let input = MoveInput {
            up: true,
            down: true,
            ..MoveInput::NONE
        };
        assert!(input.is_idle());
    }

    #[test]
    fn test_clamped_to_half_size() {
        let arena = Arena::new(300.0, 300.0);
        let mut agent = agent_at(15.0, 15.0);
        let input = MoveInput {
            up: true,
            left: true,
            ..MoveInput::NONE
        };
        agent.update(1.0, &input, &arena);
        assert_eq!(agent.position, Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_pointer_seek_and_arrive() {
        let arena = Arena::new(1000.0, 1000.0);
        let mut agent = agent_at(100.0, 100.0);
        agent.set_pointer_target(Vec2::new(200.0, 100.0));

        agent.update(0.2, &MoveInput::NONE, &arena);
        // 200 * 0.75 * 0.2 = 30 units.
        assert!((agent.position.x - 130.0).abs() < 0.01);
        assert!(agent.pointer_target().is_some());

        agent.update(1.0, &MoveInput::NONE, &arena);
        assert!((agent.position.x - 200.0).abs() < 0.01);
        assert!(agent.pointer_target().is_none());
    }

    #[test]
    fn test_pointer_past_wall_arrives_at_edge() {
        let arena = Arena::new(1000.0, 1000.0);
        let mut agent = agent_at(100.0, 100.0);
        agent.set_pointer_target(Vec2::ZERO);

        agent.update(1.0, &MoveInput::NONE, &arena);
        assert!(agent.position.distance(&Vec2::new(10.0, 10.0)) < 0.01);
        assert!(agent.pointer_target().is_none());

        agent.update(1.0, &MoveInput::NONE, &arena);
        assert!(agent.position.distance(&Vec2::new(10.0, 10.0)) < 0.01);
        assert_eq!(agent.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_keyboard_cancels_pointer() {
        let arena = Arena::new(1000.0, 1000.0);
        let mut agent = agent_at(100.0, 100.0);
        agent.set_pointer_target(Vec2::new(500.0, 500.0));
        let input = MoveInput {
            down: true,
            ..MoveInput::NONE
        };
        agent.update(0.1, &input, &arena);
        assert!(agent.pointer_target().is_none());
        assert_eq!(agent.position.x, 100.0);
    }

    #[test]
    fn test_cargo_bound() {
        let mut agent = agent_at(0.0, 0.0);
        for _ in 0..3 {
            assert!(agent.consume(meat()));
        }
        assert!(!agent.consume(meat()));
        assert_eq!(agent.cargo_count(), 3);
    }

    #[test]
    fn test_return_to_base_drains() {
        let mut agent = agent_at(0.0, 0.0);
        assert!(agent.return_to_base().is_empty());

        agent.consume(meat());
        agent.consume(meat());
        let drained = agent.return_to_base();
        assert_eq!(drained.len(), 2);
        assert_eq!(agent.cargo_count(), 0);
        assert!(agent.return_to_base().is_empty());
    }

    #[test]
    fn test_stats_only_grow() {
        let mut agent = agent_at(0.0, 0.0);
        agent.apply_stat(StatDelta {
            stat: StatKind::Cargo,
            amount: 2.0,
        });
        agent.apply_stat(StatDelta {
            stat: StatKind::Speed,
            amount: -50.0,
        });
        assert_eq!(agent.max_cargo(), 5);
        assert_eq!(agent.speed(), 200.0);
    }

    #[test]
    fn test_evolution_tiers() {
        assert_eq!(EvolutionTier::from_total_levels(0), EvolutionTier::Base);
        assert_eq!(EvolutionTier::from_total_levels(4), EvolutionTier::Budding);
        assert_eq!(EvolutionTier::from_total_levels(5), EvolutionTier::Evolved);
        assert_eq!(EvolutionTier::from_total_levels(14), EvolutionTier::Apex);
        assert_eq!(EvolutionTier::from_total_levels(20), EvolutionTier::Legendary);
        assert_eq!(EvolutionTier::spikes(4), 0);
        assert_eq!(EvolutionTier::spikes(7), 3);
        assert_eq!(EvolutionTier::spikes(20), 8);
    }
}
