//! Quest tracker: milestones over live counters, claimed by hand.
//!
//! Progress is never tallied independently: every refresh re-reads the
//! tracked balance or upgrade level and clamps it to the target.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::currency::{Currency, CurrencyBundle};
use crate::resources::ResourcePool;
use crate::upgrades::UpgradeLedger;

/// What a quest measures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "target")]
pub enum QuestGoal {
    /// Current balance of a currency.
    Resource(Currency),
    /// Current level of an upgrade, by id.
    UpgradeLevel(String),
}

/// One-way lifecycle: `Active -> Completed -> Claimed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestStatus {
    Active,
    Completed,
    Claimed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    pub title: String,
    pub description: String,
    pub goal: QuestGoal,
    pub target: u64,
    #[serde(default)]
    pub reward: CurrencyBundle,
    #[serde(skip, default)]
    progress: u64,
    #[serde(skip, default = "initial_status")]
    status: QuestStatus,
}

fn initial_status() -> QuestStatus {
    QuestStatus::Active
}

impl Quest {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        goal: QuestGoal,
        target: u64,
        reward: CurrencyBundle,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            goal,
            target,
            reward,
            progress: 0,
            status: QuestStatus::Active,
        }
    }

    pub fn progress(&self) -> u64 {
        self.progress
    }

    pub fn status(&self) -> QuestStatus {
        self.status
    }

    /// Record the live value. Only active quests move; returns true on the
    /// call that completes the quest.
    pub fn update_progress(&mut self, value: u64) -> bool {
        if self.status != QuestStatus::Active {
            return false;
        }
        self.progress = value.min(self.target);
        if self.progress >= self.target {
            self.status = QuestStatus::Completed;
            return true;
        }
        false
    }

    fn mark_claimed(&mut self) -> Option<CurrencyBundle> {
        if self.status != QuestStatus::Completed {
            return None;
        }
        self.status = QuestStatus::Claimed;
        Some(self.reward)
    }

    fn read_value(&self, pool: &ResourcePool, ledger: &UpgradeLedger) -> Option<u64> {
        match &self.goal {
            QuestGoal::Resource(currency) => Some(pool.balance(*currency)),
            QuestGoal::UpgradeLevel(id) => ledger.get(id).map(|u| u.level as u64),
        }
    }
}

/// Starter quests; the first `capacity` become active, the rest join the reserve.
pub fn starter_quests() -> Vec<Quest> {
    vec![
        Quest::new(
            "First Harvest",
            "Collect 5 meat",
            QuestGoal::Resource(Currency::Meat),
            5,
            CurrencyBundle::new(0, 2, 0, 0),
        ),
        Quest::new(
            "Golden Hunter",
            "Collect 3 eggs",
            QuestGoal::Resource(Currency::Eggs),
            3,
            CurrencyBundle::new(0, 0, 1, 0),
        ),
        Quest::new(
            "Speed Demon",
            "Upgrade speed to level 2",
            QuestGoal::UpgradeLevel("speed".into()),
            2,
            CurrencyBundle::new(10, 0, 0, 0),
        ),
        Quest::new(
            "Cargo Master",
            "Upgrade cargo capacity to level 1",
            QuestGoal::UpgradeLevel("cargo".into()),
            1,
            CurrencyBundle::new(0, 3, 0, 0),
        ),
        Quest::new(
            "DNA Collector",
            "Collect 2 DNA",
            QuestGoal::Resource(Currency::Dna),
            2,
            CurrencyBundle::new(0, 0, 0, 1),
        ),
    ]
}

/// Follow-up quests drawn after a claim.
pub fn follow_up_quests() -> Vec<Quest> {
    vec![
        Quest::new(
            "Evolution Path",
            "Collect 10 DNA",
            QuestGoal::Resource(Currency::Dna),
            10,
            CurrencyBundle::new(20, 0, 0, 0),
        ),
        Quest::new(
            "Size Matters",
            "Upgrade size to level 3",
            QuestGoal::UpgradeLevel("size".into()),
            3,
            CurrencyBundle::new(0, 5, 0, 0),
        ),
        Quest::new(
            "Efficiency Expert",
            "Upgrade efficiency to level 1",
            QuestGoal::UpgradeLevel("efficiency".into()),
            1,
            CurrencyBundle::new(0, 0, 3, 0),
        ),
        Quest::new(
            "Resource Hoarder",
            "Collect 50 meat",
            QuestGoal::Resource(Currency::Meat),
            50,
            CurrencyBundle::new(0, 0, 0, 5),
        ),
        Quest::new(
            "Cell Division",
            "Collect 5 cells",
            QuestGoal::Resource(Currency::Cells),
            5,
            CurrencyBundle::new(30, 0, 0, 0),
        ),
    ]
}

/// Why a claim was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestError {
    #[error("no active quest at index {0}")]
    NoSuchQuest(usize),
    #[error("quest `{0}` is not completed yet")]
    NotCompleted(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestTracker {
    active: Vec<Quest>,
    history: Vec<Quest>,
    reserve: Vec<Quest>,
    capacity: usize,
}

impl QuestTracker {
    /// Seed the active set from `starters`; surplus starters go to the reserve
    /// ahead of `follow_ups`.
    pub fn new(starters: Vec<Quest>, follow_ups: Vec<Quest>, capacity: usize) -> Self {
        let mut active = starters;
        let mut reserve = if active.len() > capacity {
            active.split_off(capacity)
        } else {
            Vec::new()
        };
        reserve.extend(follow_ups);
        Self {
            active,
            history: Vec::new(),
            reserve,
            capacity,
        }
    }

    pub fn active(&self) -> &[Quest] {
        &self.active
    }

    /// Claimed quests, oldest first.
    pub fn history(&self) -> &[Quest] {
        &self.history
    }

    pub fn reserve_len(&self) -> usize {
        self.reserve.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Re-derive progress from live state. Returns titles completed by this call.
    pub fn refresh(&mut self, pool: &ResourcePool, ledger: &UpgradeLedger) -> Vec<String> {
        let mut completed = Vec::new();
        for quest in self.active.iter_mut() {
            let Some(value) = quest.read_value(pool, ledger) else {
                continue;
            };
            if quest.update_progress(value) {
                log::info!("Quest completed: {}", quest.title);
                completed.push(quest.title.clone());
            }
        }
        completed
    }

    /// Claim a completed quest, credit its reward and backfill the active set
    /// from the reserve. On error nothing changes.
    pub fn try_claim(
        &mut self,
        index: usize,
        pool: &mut ResourcePool,
        rng: &mut impl Rng,
    ) -> Result<CurrencyBundle, QuestError> {
        let quest = self.active.get_mut(index).ok_or(QuestError::NoSuchQuest(index))?;
        let reward = quest
            .mark_claimed()
            .ok_or_else(|| QuestError::NotCompleted(quest.title.clone()))?;
        pool.add_bundle(&reward);

        let claimed = self.active.remove(index);
        log::info!("Quest claimed: {} (+{})", claimed.title, reward);
        self.history.push(claimed);
        self.backfill(rng);
        Ok(reward)
    }

    pub fn claim(&mut self, index: usize, pool: &mut ResourcePool, rng: &mut impl Rng) -> bool {
        match self.try_claim(index, pool, rng) {
            Ok(_) => true,
            Err(err) => {
                log::debug!("Claim refused: {}", err);
                false
            }
        }
    }

    fn backfill(&mut self, rng: &mut impl Rng) {
        while self.active.len() < self.capacity && !self.reserve.is_empty() {
            let pick = rng.gen_range(0..self.reserve.len());
            let quest = self.reserve.swap_remove(pick);
            log::debug!("New quest: {}", quest.title);
            self.active.push(quest);
        }
    }
}

impl Default for QuestTracker {
    fn default() -> Self {
        Self::new(starter_quests(), follow_up_quests(), 3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_seeds_three_active() {
        let tracker = QuestTracker::default();
        assert_eq!(tracker.active().len(), 3);
        assert_eq!(tracker.active()[0].title, "First Harvest");
        // Two surplus starters plus five follow-ups.
        assert_eq!(tracker.reserve_len(), 7);
    }

    #[test]
    fn test_progress_is_live_value_clamped() {
        let mut tracker = QuestTracker::default();
        let ledger = UpgradeLedger::default();
        let mut pool = ResourcePool::new();

        pool.add(Currency::Meat, 3);
        tracker.refresh(&pool, &ledger);
        assert_eq!(tracker.active()[0].progress(), 3);
        assert_eq!(tracker.active()[0].status(), QuestStatus::Active);

        // Spending lowers progress again while still active.
        pool.spend(Currency::Meat, 2);
        tracker.refresh(&pool, &ledger);
        assert_eq!(tracker.active()[0].progress(), 1);

        pool.add(Currency::Meat, 100);
        let done = tracker.refresh(&pool, &ledger);
        assert_eq!(done, vec!["First Harvest".to_string()]);
        assert_eq!(tracker.active()[0].progress(), 5);
        assert_eq!(tracker.active()[0].status(), QuestStatus::Completed);
    }

    #[test]
    fn test_completed_never_regresses() {
        let mut tracker = QuestTracker::default();
        let ledger = UpgradeLedger::default();
        let mut pool = ResourcePool::new();

        pool.add(Currency::Meat, 5);
        tracker.refresh(&pool, &ledger);
        pool.spend(Currency::Meat, 5);
        let done = tracker.refresh(&pool, &ledger);
        assert!(done.is_empty());
        assert_eq!(tracker.active()[0].status(), QuestStatus::Completed);
        assert_eq!(tracker.active()[0].progress(), 5);
    }

    #[test]
    fn test_claim_requires_completion() {
        let mut tracker = QuestTracker::default();
        let mut pool = ResourcePool::new();
        let mut rng = rng();

        assert_eq!(
            tracker.try_claim(0, &mut pool, &mut rng),
            Err(QuestError::NotCompleted("First Harvest".into()))
        );
        assert_eq!(tracker.try_claim(9, &mut pool, &mut rng), Err(QuestError::NoSuchQuest(9)));
        assert_eq!(pool.balances(), CurrencyBundle::ZERO);
    }

    #[test]
    fn test_claim_rewards_once_and_backfills() {
        let mut tracker = QuestTracker::default();
        let ledger = UpgradeLedger::default();
        let mut pool = ResourcePool::new();
        let mut rng = rng();

        pool.add(Currency::Meat, 5);
        tracker.refresh(&pool, &ledger);
        assert!(tracker.claim(0, &mut pool, &mut rng));
        assert_eq!(pool.balance(Currency::Eggs), 2);

        assert_eq!(tracker.active().len(), 3);
        assert_eq!(tracker.reserve_len(), 6);
        assert_eq!(tracker.history().len(), 1);
        assert_eq!(tracker.history()[0].status(), QuestStatus::Claimed);
        assert!(tracker.active().iter().all(|q| q.title != "First Harvest"));
    }

    #[test]
    fn test_upgrade_goal_reads_level() {
        let mut tracker = QuestTracker::new(
            vec![Quest::new(
                "Cargo",
                "",
                QuestGoal::UpgradeLevel("cargo".into()),
                1,
                CurrencyBundle::ZERO,
            )],
            Vec::new(),
            1,
        );
        let mut ledger = UpgradeLedger::default();
        let mut pool = ResourcePool::with_balances(CurrencyBundle::new(10, 0, 0, 0));

        tracker.refresh(&pool, &ledger);
        assert_eq!(tracker.active()[0].status(), QuestStatus::Active);

        ledger.try_purchase("cargo", &mut pool).unwrap();
        tracker.refresh(&pool, &ledger);
        assert_eq!(tracker.active()[0].status(), QuestStatus::Completed);
    }

    #[test]
    fn test_exhausted_reserve_shrinks_active_set() {
        let mut tracker = QuestTracker::new(
            vec![Quest::new(
                "Only",
                "",
                QuestGoal::Resource(Currency::Meat),
                1,
                CurrencyBundle::ZERO,
            )],
            Vec::new(),
            1,
        );
        let ledger = UpgradeLedger::default();
        let mut pool = ResourcePool::with_balances(CurrencyBundle::new(1, 0, 0, 0));
        let mut rng = rng();

        tracker.refresh(&pool, &ledger);
        assert!(tracker.claim(0, &mut pool, &mut rng));
        assert!(tracker.active().is_empty());
        assert!(!tracker.claim(0, &mut pool, &mut rng));
    }
}
