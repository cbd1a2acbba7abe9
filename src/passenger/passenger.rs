//! Passenger entity and routing predicates

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::passenger::Traits;
use crate::simulation::{SimulationError, SimulationResult};
use crate::types::{PassengerId, PassengerKey, PassengerOutcome, PassengerState, StationKind};

/// Timing recorded when a station finishes with a passenger
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StationTiming {
    /// Minutes spent queueing
    pub wait: f64,
    /// Minutes spent being served
    pub service: f64,
    /// Simulated time the station released the passenger
    pub completed_at: f64,
}

/// A departing passenger
///
/// Owned by its flight. Station timings are write-once: a second record for
/// the same station, or any record after the passenger reached a terminal
/// state, is rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passenger {
    /// Run-unique identifier
    pub id: PassengerId,
    /// Address inside the owning flight
    pub key: PassengerKey,
    /// Traits drawn at creation
    pub traits: Traits,
    /// Current stage
    pub state: PassengerState,
    /// Terminal observation, once known
    pub outcome: Option<PassengerOutcome>,
    /// Time the passenger entered the terminal
    pub arrival_time: Option<f64>,
    /// Time the passenger left the pipeline
    pub completed_at: Option<f64>,
    /// Holds a boarding pass (online check-in, connecting, or after the desk)
    pub has_boarding_pass: bool,
    /// Hold bags have been scanned
    pub bags_scanned: bool,
    /// Passed personal screening
    pub cleared_security: bool,
    /// Passed passport control
    pub cleared_passport: bool,
    /// Redirected to the fast-track lane
    pub jockeyed: bool,
    timings: BTreeMap<StationKind, StationTiming>,
}

impl Passenger {
    /// Create a passenger that has not yet arrived
    pub fn new(id: PassengerId, key: PassengerKey, traits: Traits) -> Self {
        Self {
            id,
            key,
            traits,
            state: PassengerState::Created,
            outcome: None,
            arrival_time: None,
            completed_at: None,
            has_boarding_pass: traits.online_checkin || traits.connecting,
            bags_scanned: false,
            cleared_security: false,
            cleared_passport: false,
            jockeyed: false,
            timings: BTreeMap::new(),
        }
    }

    /// Whether the passenger has to visit a check-in desk
    pub fn needs_checkin(&self) -> bool {
        !(self.traits.connecting || (self.traits.online_checkin && self.traits.carry_on_only))
    }

    /// Whether the passenger drops hold luggage
    pub fn needs_bag_drop(&self) -> bool {
        !(self.traits.carry_on_only || self.traits.connecting)
    }

    /// Whether hold bags still have to go through a scanner
    pub fn needs_bag_scan(&self) -> bool {
        self.needs_bag_drop() && !self.bags_scanned
    }

    /// Whether the passenger goes through security screening
    pub fn needs_security(&self) -> bool {
        !self.traits.connecting
    }

    /// Whether the passenger goes through passport control
    pub fn needs_passport_control(&self, is_schengen: bool) -> bool {
        !is_schengen
    }

    /// Whether every station the routing requires has been cleared
    pub fn ready_to_board(&self, is_schengen: bool) -> bool {
        self.has_boarding_pass
            && (!self.needs_security() || self.cleared_security)
            && (!self.needs_passport_control(is_schengen) || self.cleared_passport)
    }

    /// Mark arrival at the terminal
    pub fn arrive(&mut self, now: f64) {
        self.arrival_time = Some(now);
        self.state = PassengerState::ArrivedAtAirport;
    }

    /// Record the timing of a completed station
    pub fn record_station(
        &mut self,
        station: StationKind,
        wait: f64,
        service: f64,
        now: f64,
    ) -> SimulationResult<()> {
        if self.is_terminal() {
            return Err(SimulationError::passenger_fault(
                self.key,
                format!("{} recorded after terminal state {}", station, self.state),
            ));
        }
        if self.timings.contains_key(&station) {
            return Err(SimulationError::passenger_fault(
                self.key,
                format!("{} timing recorded twice", station),
            ));
        }
        self.timings.insert(station, StationTiming { wait, service, completed_at: now });
        Ok(())
    }

    /// Timing of one station, if it was completed
    pub fn timing(&self, station: StationKind) -> Option<&StationTiming> {
        self.timings.get(&station)
    }

    /// All completed stations in pipeline order
    pub fn timings(&self) -> impl Iterator<Item = (StationKind, &StationTiming)> {
        self.timings.iter().map(|(station, timing)| (*station, timing))
    }

    /// Leave the pipeline with the given outcome
    pub fn finish(&mut self, outcome: PassengerOutcome, now: f64) -> SimulationResult<()> {
        if self.outcome.is_some() {
            return Err(SimulationError::passenger_fault(
                self.key,
                format!("already finished as {}", self.state),
            ));
        }
        self.state = match outcome {
            PassengerOutcome::Boarded => PassengerState::Boarded,
            PassengerOutcome::Reneged { .. } => PassengerState::Reneged,
            PassengerOutcome::MissedFlight => PassengerState::MissedFlight,
            PassengerOutcome::Faulted => PassengerState::Faulted,
            PassengerOutcome::Abandoned => self.state,
        };
        self.outcome = Some(outcome);
        self.completed_at = Some(now);
        Ok(())
    }

    /// Force-complete after a fault, keeping whatever was recorded so far
    pub fn force_fault(&mut self, now: f64) {
        self.state = PassengerState::Faulted;
        self.outcome = Some(PassengerOutcome::Faulted);
        self.completed_at.get_or_insert(now);
        self.arrival_time.get_or_insert(now);
    }

    /// Whether the passenger has an outcome
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    /// Whether the passenger reneged at any station
    pub fn reneged(&self) -> bool {
        matches!(self.outcome, Some(PassengerOutcome::Reneged { .. }))
    }

    /// Time in the system, from arrival to leaving the pipeline
    pub fn total_time(&self) -> Option<f64> {
        match (self.arrival_time, self.completed_at) {
            (Some(arrival), Some(completed)) => Some(completed - arrival),
            _ => None,
        }
    }

    /// Sum of queueing time across completed stations
    pub fn sum_waits(&self) -> f64 {
        self.timings.values().map(|timing| timing.wait).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FlightKey;

    fn passenger(traits: Traits) -> Passenger {
        Passenger::new(PassengerId(1), PassengerKey::new(FlightKey(0), 0), traits)
    }

    #[test]
    fn test_routing_of_plain_passenger() {
        let p = passenger(Traits::default());
        assert!(p.needs_checkin());
        assert!(p.needs_bag_drop());
        assert!(p.needs_security());
        assert!(p.needs_passport_control(false));
        assert!(!p.needs_passport_control(true));
        assert!(!p.has_boarding_pass);
    }

    #[test]
    fn test_online_carry_on_skips_checkin() {
        let p = passenger(Traits { online_checkin: true, carry_on_only: true, ..Traits::default() });
        assert!(!p.needs_checkin());
        assert!(!p.needs_bag_drop());
        assert!(p.has_boarding_pass);

        // Online check-in with hold luggage still visits the desk
        let p = passenger(Traits { online_checkin: true, bags: 2, ..Traits::default() });
        assert!(p.needs_checkin());
        assert!(p.needs_bag_drop());
    }

    #[test]
    fn test_connecting_passenger_skips_landside() {
        let p = passenger(Traits { connecting: true, bags: 1, ..Traits::default() });
        assert!(!p.needs_checkin());
        assert!(!p.needs_bag_drop());
        assert!(!p.needs_security());
        assert!(p.ready_to_board(true));
        assert!(!p.ready_to_board(false));
    }

    #[test]
    fn test_bag_scan_predicate_follows_progress() {
        let mut p = passenger(Traits { bags: 2, ..Traits::default() });
        assert!(p.needs_bag_scan());
        p.bags_scanned = true;
        assert!(!p.needs_bag_scan());
    }

    #[test]
    fn test_station_timing_is_write_once() {
        let mut p = passenger(Traits::default());
        p.arrive(10.0);
        p.record_station(StationKind::CheckIn, 1.5, 2.0, 13.5).unwrap();
        assert!(p.record_station(StationKind::CheckIn, 0.0, 1.0, 14.0).is_err());
        assert_eq!(p.timing(StationKind::CheckIn).unwrap().wait, 1.5);
    }

    #[test]
    fn test_no_records_after_renege() {
        let mut p = passenger(Traits::default());
        p.arrive(0.0);
        p.finish(PassengerOutcome::Reneged { station: StationKind::CheckIn }, 60.0).unwrap();
        assert!(p.reneged());
        assert_eq!(p.state, PassengerState::Reneged);
        assert!(p.record_station(StationKind::Security, 0.0, 0.5, 61.0).is_err());
        assert!(p.finish(PassengerOutcome::Boarded, 70.0).is_err());
        assert_eq!(p.timings().count(), 0);
    }

    #[test]
    fn test_total_time_and_waits() {
        let mut p = passenger(Traits::default());
        assert_eq!(p.total_time(), None);
        p.arrive(100.0);
        p.record_station(StationKind::CheckIn, 3.0, 2.0, 105.0).unwrap();
        p.record_station(StationKind::Security, 4.0, 0.5, 109.5).unwrap();
        p.finish(PassengerOutcome::Boarded, 150.0).unwrap();

        assert_eq!(p.total_time(), Some(50.0));
        assert_eq!(p.sum_waits(), 7.0);
        assert!(p.sum_waits() <= p.total_time().unwrap());
    }

    #[test]
    fn test_force_fault_fills_timestamps() {
        let mut p = passenger(Traits::default());
        p.force_fault(42.0);
        assert_eq!(p.state, PassengerState::Faulted);
        assert_eq!(p.total_time(), Some(0.0));
    }
}
