//! Periodic station load sampling

use tracing::trace;

use crate::stations::{StationLoad, Stations};
use crate::types::StationKind;

/// Load of every station at one instant
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorSample {
    /// Simulated time of the sample
    pub time: f64,
    /// Load per station in pipeline order
    pub loads: Vec<(StationKind, StationLoad)>,
}

impl MonitorSample {
    /// Load of one station in this sample
    pub fn load(&self, station: StationKind) -> Option<StationLoad> {
        self.loads.iter().find(|(kind, _)| *kind == station).map(|(_, load)| *load)
    }
}

/// Samples queue lengths and utilization at a fixed interval
///
/// The monitor only reads the stations; the run reschedules it every
/// `interval` minutes until the horizon.
#[derive(Debug, Clone)]
pub struct Monitor {
    interval: f64,
    samples: u64,
}

impl Monitor {
    /// Create a monitor sampling every `interval` minutes
    pub fn new(interval: f64) -> Self {
        Self { interval, samples: 0 }
    }

    /// Sampling interval in minutes
    pub fn interval(&self) -> f64 {
        self.interval
    }

    /// Samples taken so far
    pub fn samples(&self) -> u64 {
        self.samples
    }

    /// Take a sample of every station
    pub fn sample(&mut self, now: f64, stations: &Stations) -> MonitorSample {
        self.samples += 1;
        let loads = StationKind::ALL.iter().map(|station| (*station, stations.load(*station))).collect();
        trace!(time = now, boarding_pools = stations.boarding.active_pools(), "Station loads sampled");
        MonitorSample { time: now, loads }
    }
}
