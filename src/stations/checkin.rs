//! Check-in desks

use rand::Rng;
use std::collections::BTreeMap;

use super::{PassengerPool, StationLoad, StationStats};
use crate::engine::sampling;
use crate::types::{priority_split, ServiceTimeParams, SimulationConfig};

/// One bank of check-in desks
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeskBank {
    /// Desks of the distinguished carrier rather than the general desks
    pub carrier: bool,
    /// Priority tier of the bank
    pub priority: bool,
}

/// Check-in station
///
/// Desks are partitioned by airline (the distinguished carrier against every
/// other airline) and, when a priority share is configured, by priority tier
/// inside each partition.
#[derive(Debug, Clone)]
pub struct CheckIn {
    carrier: String,
    banks: BTreeMap<DeskBank, PassengerPool>,
    service: ServiceTimeParams,
    per_bag: f64,
    /// Per-call observations
    pub stats: StationStats,
}

impl CheckIn {
    /// Build the desk banks
    pub fn new(config: &SimulationConfig) -> Self {
        let mut banks = BTreeMap::new();
        for (carrier, desks) in [(true, config.carrier_desks), (false, config.general_desks())] {
            let (regular, priority) = priority_split(desks, config.priority_desk_share);
            let owner = if carrier { config.distinguished_carrier.as_str() } else { "general" };
            banks.insert(
                DeskBank { carrier, priority: false },
                PassengerPool::new(format!("checkin/{}", owner), regular),
            );
            if priority > 0 {
                banks.insert(
                    DeskBank { carrier, priority: true },
                    PassengerPool::new(format!("checkin/{}/priority", owner), priority),
                );
            }
        }

        Self {
            carrier: config.distinguished_carrier.clone(),
            banks,
            service: config.service_times.checkin,
            per_bag: config.service_times.checkin_per_bag,
            stats: StationStats::default(),
        }
    }

    /// Bank a passenger of `airline` queues at
    pub fn desk_for(&self, airline: &str, priority: bool) -> DeskBank {
        let carrier = airline == self.carrier;
        let bank = DeskBank { carrier, priority };
        if self.banks.contains_key(&bank) {
            bank
        } else {
            DeskBank { carrier, priority: false }
        }
    }

    /// Pool of one bank
    pub fn pool_mut(&mut self, bank: DeskBank) -> Option<&mut PassengerPool> {
        self.banks.get_mut(&bank)
    }

    /// All banks with their pools
    pub fn banks(&self) -> impl Iterator<Item = (&DeskBank, &PassengerPool)> {
        self.banks.iter()
    }

    /// Desk service time, growing linearly with the checked bags
    pub fn service_time<R: Rng + ?Sized>(&self, rng: &mut R, bags: u32) -> f64 {
        let mean = self.service.mean + self.per_bag * bags as f64;
        sampling::floored_normal(rng, mean, self.service.stddev, self.service.min)
    }

    /// Load summed over every bank
    pub fn load(&self) -> StationLoad {
        self.banks.values().fold(StationLoad::default(), StationLoad::add)
    }
}
