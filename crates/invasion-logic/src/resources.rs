//! Resource pool: the four persistent counters plus idle income.
//!
//! Every operation is total: spending more than a balance is refused and
//! leaves the pool untouched, it never goes negative.

use serde::{Deserialize, Serialize};

use crate::currency::{Currency, CurrencyBundle};

/// Session-wide currency balances (singleton owned by the simulation).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourcePool {
    balances: CurrencyBundle,
    /// Everything ever credited, for statistics.
    earned: CurrencyBundle,
    /// Passive income per second, indexed by `Currency::index`.
    rates: [f64; 4],
    /// Fractional income not yet paid out, indexed by `Currency::index`.
    carry: [f64; 4],
    /// Seconds accumulated toward the next payout.
    idle_timer: f64,
}

impl ResourcePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pool starting with the given balances and no income.
    pub fn with_balances(balances: CurrencyBundle) -> Self {
        Self {
            balances,
            ..Self::default()
        }
    }

    pub fn balance(&self, currency: Currency) -> u64 {
        self.balances.get(currency)
    }

    pub fn balances(&self) -> CurrencyBundle {
        self.balances
    }

    pub fn total_earned(&self) -> CurrencyBundle {
        self.earned
    }

    pub fn add(&mut self, currency: Currency, amount: u64) {
        if amount == 0 {
            return;
        }
        let slot = self.balances.get_mut(currency);
        *slot = slot.saturating_add(amount);
        let total = self.earned.get_mut(currency);
        *total = total.saturating_add(amount);
    }

    pub fn add_bundle(&mut self, bundle: &CurrencyBundle) {
        for (currency, amount) in bundle.iter() {
            self.add(currency, amount);
        }
    }

    /// Spend from a single counter. Refused without side effects when short.
    pub fn spend(&mut self, currency: Currency, amount: u64) -> bool {
        let slot = self.balances.get_mut(currency);
        if *slot < amount {
            return false;
        }
        *slot -= amount;
        true
    }

    /// True when every component of `cost` is covered at once.
    pub fn can_afford(&self, cost: &CurrencyBundle) -> bool {
        Currency::ALL
            .iter()
            .all(|&c| self.balances.get(c) >= cost.get(c))
    }

    /// All-or-nothing spend across the four counters.
    pub fn spend_bundle(&mut self, cost: &CurrencyBundle) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        for currency in Currency::ALL {
            *self.balances.get_mut(currency) -= cost.get(currency);
        }
        true
    }

    pub fn rate(&self, currency: Currency) -> f64 {
        self.rates[currency.index()]
    }

    /// Set passive income for a currency. Negative or NaN rates count as zero.
    pub fn set_rate(&mut self, currency: Currency, per_second: f64) {
        self.rates[currency.index()] = if per_second.is_finite() {
            per_second.max(0.0)
        } else {
            0.0
        };
    }

    /// Seconds banked toward the next payout, always in `[0, 1)`.
    pub fn idle_timer(&self) -> f64 {
        self.idle_timer
    }

    /// Advance idle income. Whole units are paid for every elapsed second;
    /// the sub-second remainder stays in the timer and fractional income
    /// stays in the carry. Constant time in `dt`; payouts saturate.
    pub fn tick(&mut self, dt: f32) {
        if dt <= 0.0 || !dt.is_finite() {
            return;
        }
        self.idle_timer += dt as f64;
        let seconds = self.idle_timer.floor();
        if seconds < 1.0 {
            return;
        }
        self.idle_timer -= seconds;
        for currency in Currency::ALL {
            let i = currency.index();
            self.carry[i] += self.rates[i] * seconds;
            let whole = self.carry[i].floor();
            if whole >= 1.0 {
                self.carry[i] -= whole;
                // `as` saturates at u64::MAX.
                self.add(currency, whole as u64);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spend_refused_when_short() {
        let mut pool = ResourcePool::new();
        pool.add(Currency::Meat, 9);
        assert!(!pool.spend(Currency::Meat, 10));
        assert_eq!(pool.balance(Currency::Meat), 9);
        assert!(pool.spend(Currency::Meat, 9));
        assert_eq!(pool.balance(Currency::Meat), 0);
    }

    #[test]
    fn test_spend_bundle_is_atomic() {
        let mut pool = ResourcePool::with_balances(CurrencyBundle::new(20, 1, 0, 0));
        // Enough meat, not enough eggs: nothing may be deducted.
        assert!(!pool.spend_bundle(&CurrencyBundle::new(8, 2, 0, 0)));
        assert_eq!(pool.balances(), CurrencyBundle::new(20, 1, 0, 0));

        assert!(pool.spend_bundle(&CurrencyBundle::new(8, 1, 0, 0)));
        assert_eq!(pool.balances(), CurrencyBundle::new(12, 0, 0, 0));
    }

    #[test]
    fn test_can_afford_requires_all_four() {
        let pool = ResourcePool::with_balances(CurrencyBundle::new(15, 0, 1, 0));
        assert!(pool.can_afford(&CurrencyBundle::new(15, 0, 1, 0)));
        assert!(!pool.can_afford(&CurrencyBundle::new(15, 0, 1, 1)));
        assert!(pool.can_afford(&CurrencyBundle::ZERO));
    }

    #[test]
    fn test_idle_income_pays_whole_seconds() {
        let mut pool = ResourcePool::new();
        pool.set_rate(Currency::Meat, 2.0);

        pool.tick(0.6);
        assert_eq!(pool.balance(Currency::Meat), 0);

        pool.tick(0.6);
        assert_eq!(pool.balance(Currency::Meat), 2);
        // The 0.2 s overshoot is banked, not dropped.
        assert!((pool.idle_timer() - 0.2).abs() < 1e-6);

        pool.tick(0.8);
        assert_eq!(pool.balance(Currency::Meat), 4);
    }

    #[test]
    fn test_fractional_rate_accumulates() {
        let mut pool = ResourcePool::new();
        pool.set_rate(Currency::Eggs, 0.5);
        pool.tick(1.0);
        assert_eq!(pool.balance(Currency::Eggs), 0);
        pool.tick(1.0);
        assert_eq!(pool.balance(Currency::Eggs), 1);
    }

    #[test]
    fn test_large_step_pays_every_second() {
        let mut pool = ResourcePool::new();
        pool.set_rate(Currency::Cells, 1.0);
        pool.tick(3.5);
        assert_eq!(pool.balance(Currency::Cells), 3);
    }

    #[test]
    fn test_huge_step_returns_and_saturates() {
        let mut pool = ResourcePool::new();
        pool.set_rate(Currency::Meat, 1.0);
        pool.tick(1.0e17);
        assert_eq!(pool.balance(Currency::Meat), 1.0e17f32 as f64 as u64);
        assert!(pool.idle_timer() >= 0.0 && pool.idle_timer() < 1.0);

        pool.set_rate(Currency::Cells, 1.0e30);
        pool.tick(f32::MAX);
        assert_eq!(pool.balance(Currency::Meat), u64::MAX);
        assert_eq!(pool.balance(Currency::Cells), u64::MAX);
    }

    #[test]
    fn test_negative_rate_ignored() {
        let mut pool = ResourcePool::new();
        pool.set_rate(Currency::Dna, -4.0);
        assert_eq!(pool.rate(Currency::Dna), 0.0);
    }

    #[test]
    fn test_earned_tracks_credits_only() {
        let mut pool = ResourcePool::new();
        pool.add(Currency::Meat, 10);
        pool.spend(Currency::Meat, 4);
        assert_eq!(pool.total_earned().meat, 10);
        assert_eq!(pool.balance(Currency::Meat), 6);
    }
}
