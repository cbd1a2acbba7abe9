//! Run-scoped passenger factory

use rand::Rng;

use crate::passenger::{BehaviorRates, Passenger};
use crate::types::{FlightKey, IdSequence, PassengerKey, SimulationConfig};

/// Creates passengers with traits drawn from the configured rates
///
/// The factory owns the id sequence of its run, so two runs in the same
/// process never share passenger ids.
#[derive(Debug, Clone)]
pub struct PassengerFactory {
    rates: BehaviorRates,
    ids: IdSequence,
}

impl PassengerFactory {
    /// Create a factory for one run
    pub fn new(config: &SimulationConfig) -> Self {
        Self::with_rates(BehaviorRates::from_config(config))
    }

    /// Create a factory with explicit rates
    pub fn with_rates(rates: BehaviorRates) -> Self {
        Self { rates, ids: IdSequence::new() }
    }

    /// Generate the passenger list of one flight
    pub fn generate<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        flight: FlightKey,
        count: u32,
    ) -> Vec<Passenger> {
        (0..count as usize)
            .map(|slot| {
                let traits = self.rates.draw(&mut *rng);
                Passenger::new(self.ids.next_passenger(), PassengerKey::new(flight, slot), traits)
            })
            .collect()
    }

    /// Rates in use
    pub fn rates(&self) -> &BehaviorRates {
        &self.rates
    }

    /// Passengers created so far
    pub fn issued(&self) -> u64 {
        self.ids.issued()
    }
}
