//! Service stations of the departure process
//!
//! Each station owns its resource pools, its service-time distributions and
//! the per-call statistics it emits. Stations do not drive passengers; the
//! pipeline asks a station which pool to queue at and how long service takes,
//! and reports back waits, services and reneges.
//!
//! # Overview
//!
//! - **CheckIn**: desk banks split by carrier and by priority tier
//! - **BaggageSecurity**: hold-baggage scanners, one draw per bag
//! - **SecurityScreening**: regular lanes plus fast track, with jockeying
//! - **PassportControl**: e-gates and manual booths
//! - **Boarding**: per-flight agent pools, created lazily and torn down
//!
//! # Usage Example
//!
//! ```rust
//! use airport_departure_sim::stations::*;
//! use airport_departure_sim::types::*;
//!
//! let config = SimulationConfig::default();
//! let mut stations = Stations::new(&config);
//!
//! let bank = stations.checkin.desk_for("Iberia", false);
//! let pool = stations.pool_mut(PoolId::CheckIn(bank)).unwrap();
//! assert_eq!(pool.capacity(), 80);
//! assert_eq!(stations.load(StationKind::CheckIn).queue, 0);
//! ```

pub mod baggage;
pub mod boarding;
pub mod checkin;
pub mod passport;
pub mod security;

pub use baggage::*;
pub use boarding::*;
pub use checkin::*;
pub use passport::*;
pub use security::*;

use serde::{Deserialize, Serialize};

use crate::engine::ResourcePool;
use crate::simulation::{SimulationError, SimulationResult};
use crate::types::{FlightKey, PassengerKey, SimulationConfig, StationKind};

/// Resource pool whose requests are made on behalf of passengers
pub type PassengerPool = ResourcePool<PassengerKey>;

/// Address of one resource pool across all stations
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PoolId {
    /// A check-in desk bank
    CheckIn(DeskBank),
    /// Hold-baggage scanners
    BagScan,
    /// Regular security lanes
    SecurityLane,
    /// Fast-track security lane
    FastTrack,
    /// Automated passport gates
    EGate,
    /// Manual passport booths
    Booth,
    /// Boarding agents of one flight
    Boarding(FlightKey),
}

impl PoolId {
    /// Station that owns the pool
    pub fn station(self) -> StationKind {
        match self {
            PoolId::CheckIn(_) => StationKind::CheckIn,
            PoolId::BagScan => StationKind::BaggageSecurity,
            PoolId::SecurityLane | PoolId::FastTrack => StationKind::Security,
            PoolId::EGate | PoolId::Booth => StationKind::Passport,
            PoolId::Boarding(_) => StationKind::Boarding,
        }
    }
}

/// Per-call observations of one station
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StationStats {
    /// Queue wait of every served passenger
    pub waits: Vec<f64>,
    /// Service time of every served passenger
    pub services: Vec<f64>,
    /// Passengers served
    pub processed: u64,
    /// Passengers that gave up waiting
    pub reneged: u64,
}

impl StationStats {
    /// Record a completed service
    pub fn record_service(&mut self, wait: f64, service: f64) {
        self.waits.push(wait);
        self.services.push(service);
        self.processed += 1;
    }

    /// Record a renege
    pub fn record_renege(&mut self) {
        self.reneged += 1;
    }
}

/// Instantaneous load of a station, summed over its pools
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StationLoad {
    /// Requests waiting
    pub queue: usize,
    /// Slots held
    pub in_use: u32,
    /// Slots in total
    pub capacity: u32,
}

impl StationLoad {
    /// Add the load of one pool
    pub fn add(mut self, pool: &PassengerPool) -> Self {
        self.queue += pool.queue_length();
        self.in_use += pool.in_use();
        self.capacity += pool.capacity();
        self
    }

    /// Fraction of slots held; zero for a station without pools
    pub fn utilization(&self) -> f64 {
        if self.capacity == 0 {
            0.0
        } else {
            self.in_use as f64 / self.capacity as f64
        }
    }
}

/// All stations of the terminal
#[derive(Debug, Clone)]
pub struct Stations {
    /// Check-in desks
    pub checkin: CheckIn,
    /// Hold-baggage scanners
    pub baggage: BaggageSecurity,
    /// Security lanes
    pub security: SecurityScreening,
    /// Passport control
    pub passport: PassportControl,
    /// Per-flight boarding
    pub boarding: Boarding,
}

impl Stations {
    /// Build every station from a validated configuration
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            checkin: CheckIn::new(config),
            baggage: BaggageSecurity::new(config),
            security: SecurityScreening::new(config),
            passport: PassportControl::new(config),
            boarding: Boarding::new(config),
        }
    }

    /// Pool behind an id; boarding pools must already exist
    pub fn pool_mut(&mut self, id: PoolId) -> SimulationResult<&mut PassengerPool> {
        let pool = match id {
            PoolId::CheckIn(bank) => self.checkin.pool_mut(bank),
            PoolId::BagScan => Some(self.baggage.pool_mut()),
            PoolId::SecurityLane => Some(self.security.pool_mut(Lane::Regular)),
            PoolId::FastTrack => Some(self.security.pool_mut(Lane::FastTrack)),
            PoolId::EGate => Some(self.passport.pool_mut(Checkpoint::EGate)),
            PoolId::Booth => Some(self.passport.pool_mut(Checkpoint::Booth)),
            PoolId::Boarding(flight) => {
                return self.boarding.pool_mut(flight).ok_or(SimulationError::MissingFlight(flight))
            }
        };
        pool.ok_or_else(|| SimulationError::resource_error(format!("no pool for {:?}", id)))
    }

    /// Per-call statistics of a station
    pub fn stats(&self, station: StationKind) -> &StationStats {
        match station {
            StationKind::CheckIn => &self.checkin.stats,
            StationKind::BaggageSecurity => &self.baggage.stats,
            StationKind::Security => &self.security.stats,
            StationKind::Passport => &self.passport.stats,
            StationKind::Boarding => &self.boarding.stats,
        }
    }

    /// Per-call statistics of a station, mutably
    pub fn stats_mut(&mut self, station: StationKind) -> &mut StationStats {
        match station {
            StationKind::CheckIn => &mut self.checkin.stats,
            StationKind::BaggageSecurity => &mut self.baggage.stats,
            StationKind::Security => &mut self.security.stats,
            StationKind::Passport => &mut self.passport.stats,
            StationKind::Boarding => &mut self.boarding.stats,
        }
    }

    /// Current load of a station
    pub fn load(&self, station: StationKind) -> StationLoad {
        match station {
            StationKind::CheckIn => self.checkin.load(),
            StationKind::BaggageSecurity => self.baggage.load(),
            StationKind::Security => self.security.load(),
            StationKind::Passport => self.passport.load(),
            StationKind::Boarding => self.boarding.load(),
        }
    }

    /// Whether every pool satisfies `in_use <= capacity`
    pub fn within_capacity(&self) -> bool {
        StationKind::ALL.iter().all(|station| {
            let load = self.load(*station);
            load.in_use <= load.capacity
        }) && self.boarding.pools().all(|(_, pool)| pool.in_use() <= pool.capacity())
    }
}
