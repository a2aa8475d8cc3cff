//! The four persistent currencies and fixed-size bundles of them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four persistent counters. Meat is the primary currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Currency {
    Meat,
    Eggs,
    Dna,
    Cells,
}

impl Currency {
    pub const ALL: [Currency; 4] = [Currency::Meat, Currency::Eggs, Currency::Dna, Currency::Cells];

    /// Currency credited for the efficiency bonus and for immediate-mode deposits.
    pub const PRIMARY: Currency = Currency::Meat;

    pub fn index(self) -> usize {
        match self {
            Currency::Meat => 0,
            Currency::Eggs => 1,
            Currency::Dna => 2,
            Currency::Cells => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Currency::Meat => "meat",
            Currency::Eggs => "eggs",
            Currency::Dna => "dna",
            Currency::Cells => "cells",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An amount of each currency. Used for balances, costs and rewards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyBundle {
    pub meat: u64,
    pub eggs: u64,
    pub dna: u64,
    pub cells: u64,
}

impl CurrencyBundle {
    pub const ZERO: Self = Self {
        meat: 0,
        eggs: 0,
        dna: 0,
        cells: 0,
    };

    pub fn new(meat: u64, eggs: u64, dna: u64, cells: u64) -> Self {
        Self {
            meat,
            eggs,
            dna,
            cells,
        }
    }

    /// Bundle holding `amount` of a single currency.
    pub fn single(currency: Currency, amount: u64) -> Self {
        let mut bundle = Self::ZERO;
        *bundle.get_mut(currency) = amount;
        bundle
    }

    pub fn get(&self, currency: Currency) -> u64 {
        match currency {
            Currency::Meat => self.meat,
            Currency::Eggs => self.eggs,
            Currency::Dna => self.dna,
            Currency::Cells => self.cells,
        }
    }

    pub fn get_mut(&mut self, currency: Currency) -> &mut u64 {
        match currency {
            Currency::Meat => &mut self.meat,
            Currency::Eggs => &mut self.eggs,
            Currency::Dna => &mut self.dna,
            Currency::Cells => &mut self.cells,
        }
    }

    /// Every component multiplied by `factor` (saturating).
    pub fn scaled(&self, factor: u64) -> Self {
        Self {
            meat: self.meat.saturating_mul(factor),
            eggs: self.eggs.saturating_mul(factor),
            dna: self.dna.saturating_mul(factor),
            cells: self.cells.saturating_mul(factor),
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Non-zero entries in currency order.
    pub fn iter(&self) -> impl Iterator<Item = (Currency, u64)> + '_ {
        Currency::ALL
            .into_iter()
            .map(move |c| (c, self.get(c)))
            .filter(|(_, amount)| *amount > 0)
    }
}

impl std::ops::Add for CurrencyBundle {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            meat: self.meat.saturating_add(other.meat),
            eggs: self.eggs.saturating_add(other.eggs),
            dna: self.dna.saturating_add(other.dna),
            cells: self.cells.saturating_add(other.cells),
        }
    }
}

impl std::ops::AddAssign for CurrencyBundle {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl fmt::Display for CurrencyBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("nothing");
        }
        let parts: Vec<String> = self.iter().map(|(c, n)| format!("{} {}", n, c)).collect();
        f.write_str(&parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_scaling() {
        let cost = CurrencyBundle::new(8, 2, 0, 0);
        assert_eq!(cost.scaled(3), CurrencyBundle::new(24, 6, 0, 0));
        assert_eq!(cost.scaled(0), CurrencyBundle::ZERO);
    }

    #[test]
    fn test_bundle_single_and_iter() {
        let b = CurrencyBundle::single(Currency::Dna, 4);
        assert_eq!(b.get(Currency::Dna), 4);
        let entries: Vec<_> = b.iter().collect();
        assert_eq!(entries, vec![(Currency::Dna, 4)]);
    }

    #[test]
    fn test_bundle_display() {
        assert_eq!(CurrencyBundle::ZERO.to_string(), "nothing");
        assert_eq!(CurrencyBundle::new(10, 0, 3, 0).to_string(), "10 meat, 3 dna");
    }
}
