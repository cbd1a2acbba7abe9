//! Per-flight boarding agents

use rand::Rng;
use std::collections::BTreeMap;
use tracing::trace;

use super::{PassengerPool, StationLoad, StationStats};
use crate::engine::sampling;
use crate::simulation::{SimulationError, SimulationResult};
use crate::types::{FlightKey, ServiceTimeParams, SimulationConfig};

/// Queue priority of priority passengers at the gate
pub const PRIORITY_BOARDING: i32 = 0;
/// Queue priority of everyone else at the gate
pub const REGULAR_BOARDING: i32 = 1;

/// Boarding station
///
/// Holds one agent pool per flight that currently has passengers at the gate.
/// Pools are created the first time a passenger of the flight needs one and
/// are torn down once every passenger of the flight is done.
#[derive(Debug, Clone)]
pub struct Boarding {
    agents: u32,
    priority_ordered: bool,
    pools: BTreeMap<FlightKey, PassengerPool>,
    service: ServiceTimeParams,
    /// Per-call observations
    pub stats: StationStats,
    /// Gate waits of priority passengers
    pub priority_waits: Vec<f64>,
    /// Gate waits of regular passengers
    pub regular_waits: Vec<f64>,
    /// Priority passengers boarded
    pub priority_boarded: u64,
    /// Pools created over the run
    pub pools_created: u64,
    /// Pools torn down over the run
    pub pools_torn_down: u64,
}

impl Boarding {
    /// Build the station with no active pools
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            agents: config.boarding_agents,
            priority_ordered: config.priority_boarding,
            pools: BTreeMap::new(),
            service: config.service_times.boarding,
            stats: StationStats::default(),
            priority_waits: Vec::new(),
            regular_waits: Vec::new(),
            priority_boarded: 0,
            pools_created: 0,
            pools_torn_down: 0,
        }
    }

    /// Pool of a flight, creating it on first use
    pub fn open_pool(&mut self, flight: FlightKey) -> &mut PassengerPool {
        let agents = self.agents;
        let priority_ordered = self.priority_ordered;
        let created = &mut self.pools_created;
        self.pools.entry(flight).or_insert_with(|| {
            *created += 1;
            trace!(%flight, agents, "Opening boarding pool");
            let name = format!("boarding/{}", flight);
            if priority_ordered {
                PassengerPool::with_priority(name, agents)
            } else {
                PassengerPool::new(name, agents)
            }
        })
    }

    /// Existing pool of a flight
    pub fn pool_mut(&mut self, flight: FlightKey) -> Option<&mut PassengerPool> {
        self.pools.get_mut(&flight)
    }

    /// Active pools
    pub fn pools(&self) -> impl Iterator<Item = (&FlightKey, &PassengerPool)> {
        self.pools.iter()
    }

    /// Number of flights with an active pool
    pub fn active_pools(&self) -> usize {
        self.pools.len()
    }

    /// Tear down the pool of a flight; returns false when it had none
    ///
    /// A pool that still has holders or waiters is not torn down.
    pub fn teardown(&mut self, flight: FlightKey) -> SimulationResult<bool> {
        match self.pools.get(&flight) {
            None => Ok(false),
            Some(pool) if !pool.is_idle() => Err(SimulationError::resource_error(format!(
                "{} still has {} holders and {} waiters",
                pool.name(),
                pool.in_use(),
                pool.queue_length()
            ))),
            Some(_) => {
                self.pools.remove(&flight);
                self.pools_torn_down += 1;
                trace!(%flight, "Boarding pool torn down");
                Ok(true)
            }
        }
    }

    /// Gate queue priority of a passenger
    pub fn queue_priority(&self, priority: bool) -> i32 {
        if priority {
            PRIORITY_BOARDING
        } else {
            REGULAR_BOARDING
        }
    }

    /// Boarding pass scan time
    pub fn service_time<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        sampling::service_time(rng, &self.service)
    }

    /// Record a boarded passenger
    pub fn record_boarding(&mut self, wait: f64, service: f64, priority: bool) {
        self.stats.record_service(wait, service);
        if priority {
            self.priority_waits.push(wait);
            self.priority_boarded += 1;
        } else {
            self.regular_waits.push(wait);
        }
    }

    /// Load summed over active pools; zero capacity when none are active
    pub fn load(&self) -> StationLoad {
        self.pools.values().fold(StationLoad::default(), StationLoad::add)
    }
}
