//! Collectible kinds and their attribute table.
//!
//! All per-kind behavior (value, size, wander speed, which currency a kind
//! converts into, bonus drops) is looked up here. Callers never branch on
//! the kind itself.

use serde::{Deserialize, Serialize};

use crate::currency::Currency;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectibleKind {
    Normal,
    Fast,
    Valuable,
    Large,
}

impl CollectibleKind {
    pub const ALL: [CollectibleKind; 4] = [
        CollectibleKind::Normal,
        CollectibleKind::Fast,
        CollectibleKind::Valuable,
        CollectibleKind::Large,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CollectibleKind::Normal => "normal",
            CollectibleKind::Fast => "fast",
            CollectibleKind::Valuable => "valuable",
            CollectibleKind::Large => "large",
        }
    }
}

/// Chance-based extra currency rolled when a kind is collected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BonusDrop {
    pub currency: Currency,
    /// Probability in `[0, 1]`.
    pub chance: f64,
}

/// Attributes shared by every collectible of one kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KindStats {
    pub kind: CollectibleKind,
    /// Scalar value (immediate conversion sums these).
    pub value: u32,
    /// Side of the collision box.
    pub size: f32,
    /// RGB tag for the presentation layer.
    pub color: [u8; 3],
    /// Wander speed in units per second, 0 for stationary kinds.
    pub move_speed: f32,
    /// Currency one unit converts into at a deferred deposit.
    pub currency: Currency,
    /// Relative spawn weight.
    pub spawn_weight: f32,
    #[serde(default)]
    pub bonus: Option<BonusDrop>,
}

impl KindStats {
    pub fn wanders(&self) -> bool {
        self.move_speed > 0.0
    }
}

/// Lookup table from kind to attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KindTable {
    entries: Vec<KindStats>,
}

impl KindTable {
    pub fn new(entries: Vec<KindStats>) -> Self {
        Self { entries }
    }

    /// Every collectible is stationary meat worth 1 (the plain balancing).
    pub fn uniform() -> Self {
        Self::new(vec![KindStats {
            kind: CollectibleKind::Normal,
            value: 1,
            size: 10.0,
            color: [0, 255, 0],
            move_speed: 0.0,
            currency: Currency::Meat,
            spawn_weight: 1.0,
            bonus: None,
        }])
    }

    pub fn get(&self, kind: CollectibleKind) -> Option<&KindStats> {
        self.entries.iter().find(|e| e.kind == kind)
    }

    pub fn entries(&self) -> &[KindStats] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut [KindStats] {
        &mut self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Weighted pick. Falls back to the first entry when the weights do not
    /// form a usable range (zero, NaN or overflowing sum).
    pub fn pick(&self, rng: &mut impl rand::Rng) -> Option<&KindStats> {
        let total: f32 = self.entries.iter().map(|e| e.spawn_weight.max(0.0)).sum();
        if !(total > 0.0 && total.is_finite()) {
            return self.entries.first();
        }
        let mut roll = rng.gen_range(0.0..total);
        for entry in &self.entries {
            let weight = entry.spawn_weight.max(0.0);
            if roll < weight {
                return Some(entry);
            }
            roll -= weight;
        }
        self.entries.last()
    }
}

impl Default for KindTable {
    fn default() -> Self {
        Self::new(vec![
            KindStats {
                kind: CollectibleKind::Normal,
                value: 1,
                size: 10.0,
                color: [0, 255, 0],
                move_speed: 0.0,
                currency: Currency::Meat,
                spawn_weight: 0.6,
                bonus: None,
            },
            KindStats {
                kind: CollectibleKind::Fast,
                value: 1,
                size: 8.0,
                color: [0, 200, 255],
                move_speed: 80.0,
                currency: Currency::Meat,
                spawn_weight: 0.2,
                bonus: None,
            },
            KindStats {
                kind: CollectibleKind::Valuable,
                value: 3,
                size: 10.0,
                color: [255, 215, 0],
                move_speed: 30.0,
                currency: Currency::Eggs,
                spawn_weight: 0.1,
                bonus: Some(BonusDrop {
                    currency: Currency::Eggs,
                    chance: 0.3,
                }),
            },
            KindStats {
                kind: CollectibleKind::Large,
                value: 2,
                size: 16.0,
                color: [200, 80, 80],
                move_speed: 20.0,
                currency: Currency::Dna,
                spawn_weight: 0.1,
                bonus: Some(BonusDrop {
                    currency: Currency::Dna,
                    chance: 0.2,
                }),
            },
        ])
    }
}
