//! Security screening lanes

use rand::Rng;

use super::{PassengerPool, PoolId, StationLoad, StationStats};
use crate::engine::sampling;
use crate::types::{ServiceTimeParams, SimulationConfig};

/// Kind of security lane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lane {
    /// Regular lanes
    Regular,
    /// Fast-track lane
    FastTrack,
}

impl Lane {
    /// Pool address of the lane
    pub fn pool_id(self) -> PoolId {
        match self {
            Lane::Regular => PoolId::SecurityLane,
            Lane::FastTrack => PoolId::FastTrack,
        }
    }
}

/// Whether a passenger switches to fast track at entry
///
/// Only priority passengers may switch, and only when the regular queue is
/// longer than the fast-track queue by more than `threshold`.
pub fn should_jockey(priority: bool, regular_queue: usize, fast_track_queue: usize, threshold: u32) -> bool {
    priority && regular_queue.saturating_sub(fast_track_queue) > threshold as usize
}

/// Security screening station
#[derive(Debug, Clone)]
pub struct SecurityScreening {
    lanes: PassengerPool,
    fast_track: PassengerPool,
    service: ServiceTimeParams,
    priority_factor: f64,
    jockey_threshold: u32,
    /// Per-call observations
    pub stats: StationStats,
    /// Priority passengers redirected to fast track
    pub jockeyed: u64,
}

impl SecurityScreening {
    /// Build the lanes
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            lanes: PassengerPool::new("security/lanes", config.security_lanes),
            fast_track: PassengerPool::new("security/fast-track", config.fast_track_lanes),
            service: config.service_times.security,
            priority_factor: config.service_times.security_priority_factor,
            jockey_threshold: config.jockey_threshold,
            stats: StationStats::default(),
            jockeyed: 0,
        }
    }

    /// Pick the lane at entry; the decision is never revisited while queued
    pub fn choose_lane(&mut self, priority: bool) -> Lane {
        let jockey = should_jockey(
            priority,
            self.lanes.queue_length(),
            self.fast_track.queue_length(),
            self.jockey_threshold,
        );
        if jockey {
            self.jockeyed += 1;
            Lane::FastTrack
        } else {
            Lane::Regular
        }
    }

    /// Pool of one lane kind
    pub fn pool_mut(&mut self, lane: Lane) -> &mut PassengerPool {
        match lane {
            Lane::Regular => &mut self.lanes,
            Lane::FastTrack => &mut self.fast_track,
        }
    }

    /// Screening time; priority passengers carry less and are a little faster
    pub fn service_time<R: Rng + ?Sized>(&self, rng: &mut R, priority: bool) -> f64 {
        let mean = if priority { self.service.mean * self.priority_factor } else { self.service.mean };
        sampling::floored_normal(rng, mean, self.service.stddev, self.service.min)
    }

    /// Load over regular and fast-track lanes
    pub fn load(&self) -> StationLoad {
        StationLoad::default().add(&self.lanes).add(&self.fast_track)
    }
}
