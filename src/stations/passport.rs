//! Passport control

use rand::Rng;

use super::{PassengerPool, PoolId, StationLoad, StationStats};
use crate::engine::sampling;
use crate::types::{ServiceTimeParams, SimulationConfig};

/// Kind of passport checkpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Checkpoint {
    /// Automated gate
    EGate,
    /// Manual booth
    Booth,
}

impl Checkpoint {
    /// Checkpoint for a passenger, decided once from the eligibility trait
    pub fn for_passenger(egate_eligible: bool) -> Self {
        if egate_eligible {
            Checkpoint::EGate
        } else {
            Checkpoint::Booth
        }
    }

    /// Pool address of the checkpoint
    pub fn pool_id(self) -> PoolId {
        match self {
            Checkpoint::EGate => PoolId::EGate,
            Checkpoint::Booth => PoolId::Booth,
        }
    }
}

/// Passport control station
#[derive(Debug, Clone)]
pub struct PassportControl {
    egates: PassengerPool,
    booths: PassengerPool,
    egate: ServiceTimeParams,
    booth: ServiceTimeParams,
    /// Per-call observations
    pub stats: StationStats,
    /// Passengers cleared at an e-gate
    pub egate_passengers: u64,
    /// Passengers cleared at a booth
    pub booth_passengers: u64,
}

impl PassportControl {
    /// Build the gates and booths
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            egates: PassengerPool::new("passport/egates", config.passport_egates),
            booths: PassengerPool::new("passport/booths", config.passport_booths),
            egate: config.service_times.egate,
            booth: config.service_times.booth,
            stats: StationStats::default(),
            egate_passengers: 0,
            booth_passengers: 0,
        }
    }

    /// Pool of one checkpoint kind
    pub fn pool_mut(&mut self, checkpoint: Checkpoint) -> &mut PassengerPool {
        match checkpoint {
            Checkpoint::EGate => &mut self.egates,
            Checkpoint::Booth => &mut self.booths,
        }
    }

    /// Document check time at the given checkpoint
    pub fn service_time<R: Rng + ?Sized>(&self, rng: &mut R, checkpoint: Checkpoint) -> f64 {
        let params = match checkpoint {
            Checkpoint::EGate => &self.egate,
            Checkpoint::Booth => &self.booth,
        };
        sampling::service_time(rng, params)
    }

    /// Record a cleared passenger
    pub fn record_clearance(&mut self, checkpoint: Checkpoint, wait: f64, service: f64) {
        self.stats.record_service(wait, service);
        match checkpoint {
            Checkpoint::EGate => self.egate_passengers += 1,
            Checkpoint::Booth => self.booth_passengers += 1,
        }
    }

    /// Load over gates and booths
    pub fn load(&self) -> StationLoad {
        StationLoad::default().add(&self.egates).add(&self.booths)
    }
}
