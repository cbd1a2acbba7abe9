//! Hold-baggage scanning

use rand::Rng;

use super::{PassengerPool, StationLoad, StationStats};
use crate::engine::sampling;
use crate::types::{ServiceTimeParams, SimulationConfig};

/// Bank of hold-baggage scanners
///
/// Scan time is the sum of one floored normal draw per bag. Used either as a
/// station of its own or from inside security, depending on the configured
/// screening mode; the scanners and their statistics are the same in both.
#[derive(Debug, Clone)]
pub struct BaggageSecurity {
    scanners: PassengerPool,
    scan: ServiceTimeParams,
    /// Per-call observations
    pub stats: StationStats,
    /// Bags that went through a scanner
    pub bags_scanned: u64,
}

impl BaggageSecurity {
    /// Build the scanner bank
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            scanners: PassengerPool::new("baggage/scanners", config.bag_scanners),
            scan: config.service_times.bag_scan,
            stats: StationStats::default(),
            bags_scanned: 0,
        }
    }

    /// Scanner pool
    pub fn pool_mut(&mut self) -> &mut PassengerPool {
        &mut self.scanners
    }

    /// Total scan time of `bags` bags
    pub fn scan_time<R: Rng + ?Sized>(&self, rng: &mut R, bags: u32) -> f64 {
        sampling::summed_service_time(rng, &self.scan, bags)
    }

    /// Record a finished scan
    pub fn record_scan(&mut self, wait: f64, service: f64, bags: u32) {
        self.stats.record_service(wait, service);
        self.bags_scanned += bags as u64;
    }

    /// Scanner load
    pub fn load(&self) -> StationLoad {
        StationLoad::default().add(&self.scanners)
    }
}
