//! Behavioural traits drawn once per passenger
//!
//! Every flag is an independent Bernoulli trial against its configured rate.
//! The draw order is fixed so that a seeded run replays identically.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::engine::sampling;
use crate::types::SimulationConfig;

/// Rates used to draw passenger traits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BehaviorRates {
    /// Probability of having checked in online
    pub online_checkin: f64,
    /// Probability of travelling with carry-on only
    pub carry_on_only: f64,
    /// Probability of connecting, `None` when connecting passengers are disabled
    pub connecting: Option<f64>,
    /// Probability of priority status
    pub priority: f64,
    /// Probability of holding an e-gate eligible passport
    pub egate_eligible: f64,
    /// Mean checked bags of a passenger with hold luggage
    pub average_bags: f64,
}

impl BehaviorRates {
    /// Rates taken from a run configuration
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            online_checkin: config.online_checkin_rate,
            carry_on_only: config.carry_on_only_rate,
            connecting: config.connecting_enabled.then_some(config.connecting_rate),
            priority: config.priority_rate,
            egate_eligible: config.egate_eligible_rate,
            average_bags: config.average_bags,
        }
    }

    /// Rates with every probability at zero and no checked bags
    pub fn none() -> Self {
        Self {
            online_checkin: 0.0,
            carry_on_only: 0.0,
            connecting: None,
            priority: 0.0,
            egate_eligible: 0.0,
            average_bags: 0.0,
        }
    }

    /// Draw the traits of one passenger
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Traits {
        let online_checkin = sampling::bernoulli(rng, self.online_checkin);
        let carry_on_only = sampling::bernoulli(rng, self.carry_on_only);
        let connecting = match self.connecting {
            Some(rate) => sampling::bernoulli(rng, rate),
            None => false,
        };
        let priority = sampling::bernoulli(rng, self.priority);
        let egate_eligible = sampling::bernoulli(rng, self.egate_eligible);
        let bags = if carry_on_only { 0 } else { sampling::poisson(rng, self.average_bags) };

        Traits { online_checkin, carry_on_only, connecting, priority, egate_eligible, bags }
    }
}

/// Traits of a passenger, fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Traits {
    /// Checked in online before arriving
    pub online_checkin: bool,
    /// No hold luggage
    pub carry_on_only: bool,
    /// Transferring from another flight, already airside
    pub connecting: bool,
    /// Priority status (fast track, priority desks, priority boarding)
    pub priority: bool,
    /// May use the automated passport gates
    pub egate_eligible: bool,
    /// Checked bags
    pub bags: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_zero_rates_draw_plain_traits() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let rates = BehaviorRates::none();
        for _ in 0..100 {
            assert_eq!(rates.draw(&mut rng), Traits::default());
        }
    }

    #[test]
    fn test_carry_on_only_has_no_bags() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let rates = BehaviorRates { carry_on_only: 1.0, average_bags: 5.0, ..BehaviorRates::none() };
        for _ in 0..100 {
            let traits = rates.draw(&mut rng);
            assert!(traits.carry_on_only);
            assert_eq!(traits.bags, 0);
        }
    }

    #[test]
    fn test_connecting_disabled_by_config() {
        let mut config = SimulationConfig::default();
        config.connecting_rate = 1.0;
        config.connecting_enabled = false;
        let rates = BehaviorRates::from_config(&config);
        assert_eq!(rates.connecting, None);

        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert!((0..50).all(|_| !rates.draw(&mut rng).connecting));

        config.connecting_enabled = true;
        let rates = BehaviorRates::from_config(&config);
        assert!((0..50).all(|_| rates.draw(&mut rng).connecting));
    }

    #[test]
    fn test_rates_are_respected_on_average() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let rates = BehaviorRates::from_config(&SimulationConfig::default());
        let draws: Vec<Traits> = (0..10_000).map(|_| rates.draw(&mut rng)).collect();
        let share = |f: fn(&Traits) -> bool| draws.iter().filter(|t| f(t)).count() as f64 / 10_000.0;

        assert!((share(|t| t.online_checkin) - 0.5).abs() < 0.03);
        assert!((share(|t| t.carry_on_only) - 0.45).abs() < 0.03);
        assert!((share(|t| t.priority) - 0.15).abs() < 0.02);
        assert!((share(|t| t.egate_eligible) - 0.7).abs() < 0.03);
    }
}
