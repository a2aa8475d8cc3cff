//! Game events - cosmetic notifications for the presentation layer
//!
//! The simulation pushes events while it ticks; the presentation layer
//! drains them once per frame to spawn particles, play feedback, etc.
//! Nothing in the core reads them back.

use invasion_logic::currency::{Currency, CurrencyBundle};
use invasion_logic::geometry::Vec2;
use invasion_logic::kinds::CollectibleKind;
use serde::{Deserialize, Serialize};

use crate::session::GameState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// A collectible was taken aboard
    Collected {
        index: u32,
        kind: CollectibleKind,
        position: Vec2,
    },
    /// Chance-based extra currency from a collection
    BonusDrop { currency: Currency, amount: u64 },
    /// Cargo converted at the base
    Deposited { units: u32, gained: CurrencyBundle },
    UpgradePurchased { id: String, level: u32 },
    QuestCompleted { title: String },
    QuestClaimed { title: String, reward: CurrencyBundle },
    StateChanged { from: GameState, to: GameState },
}

/// FIFO buffer of events since the last drain
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }

    /// Take every pending event, oldest first
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_empties_queue() {
        let mut queue = EventQueue::new();
        queue.push(GameEvent::QuestCompleted {
            title: "First Harvest".into(),
        });
        queue.push(GameEvent::BonusDrop {
            currency: Currency::Eggs,
            amount: 1,
        });
        assert_eq!(queue.len(), 2);

        let drained = queue.drain();
        assert_eq!(drained.len(), 2);
        assert!(matches!(drained[0], GameEvent::QuestCompleted { .. }));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_event_json_shape() {
        let event = GameEvent::UpgradePurchased {
            id: "cargo".into(),
            level: 1,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "upgrade_purchased");
        assert_eq!(json["level"], 1);
    }
}
