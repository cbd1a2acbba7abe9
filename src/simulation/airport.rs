//! Departure simulation run
//!
//! [`AirportSimulation`] owns everything one run needs: the scheduler, the
//! random source, the stations, the active flights with their passengers and
//! the statistics collector. Every event is an [`Action`] dispatched from a
//! single loop, so no two handlers ever interleave.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, trace, warn};

use crate::engine::Scheduler;
use crate::flight::{Flight, FlightGenerator, FlightSchedule, ScheduledFlight};
use crate::passenger::{Passenger, PassengerFactory};
use crate::simulation::monitor::Monitor;
use crate::simulation::pipeline::{Journey, Wake};
use crate::simulation::statistics::{FlightObservation, PassengerRecord, SimulationSummary, StatisticsCollector};
use crate::simulation::{SimulationError, SimulationResult};
use crate::stations::{PoolId, Stations};
use crate::types::{FlightKey, PassengerKey, PassengerOutcome, RunId, SimulationConfig};

/// Event handled by the run loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// The schedule row at this timeline index is processed
    FlightArrives(usize),
    /// A flight opens its gate
    BoardingOpens(FlightKey),
    /// A flight closes its doors
    Departure(FlightKey),
    /// The monitor samples every station
    Sample,
    /// A pool that defers its grants hands out its free slots
    FillPool(PoolId),
    /// A passenger resumes its pipeline
    Passenger(PassengerKey, Wake),
}

/// One departure-day simulation
#[derive(Debug)]
pub struct AirportSimulation {
    pub(super) config: SimulationConfig,
    run_id: RunId,
    pub(super) scheduler: Scheduler<Action>,
    pub(super) rng: ChaCha8Rng,
    factory: PassengerFactory,
    flight_generator: FlightGenerator,
    timeline: Vec<ScheduledFlight>,
    pub(super) flights: BTreeMap<FlightKey, Flight>,
    pub(super) journeys: BTreeMap<PassengerKey, Journey>,
    pub(super) stations: Stations,
    monitor: Monitor,
    pub(super) collector: StatisticsCollector,
    check_capacity: bool,
    capacity_violations: u64,
    finished: bool,
}

impl AirportSimulation {
    /// Prepare a run over a flight schedule
    ///
    /// The configuration is validated first; an invalid configuration is the
    /// only error that prevents a run.
    #[instrument(skip(config, schedule), fields(flights = schedule.len(), seed = ?config.seed))]
    pub fn new(config: SimulationConfig, schedule: &FlightSchedule) -> SimulationResult<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let timeline = schedule.timeline();
        if timeline.len() < schedule.len() {
            warn!(
                skipped = schedule.len() - timeline.len(),
                "Schedule rows before the base time were skipped"
            );
        }

        Ok(Self {
            run_id: RunId::new(),
            scheduler: Scheduler::new(),
            rng,
            factory: PassengerFactory::new(&config),
            flight_generator: FlightGenerator::new(config.flights.clone()),
            timeline,
            flights: BTreeMap::new(),
            journeys: BTreeMap::new(),
            stations: Stations::new(&config),
            monitor: Monitor::new(config.monitor_interval),
            collector: StatisticsCollector::new(),
            check_capacity: false,
            capacity_violations: 0,
            finished: false,
            config,
        })
    }

    /// Check every pool against its capacity after each event
    pub fn with_capacity_checks(mut self, enabled: bool) -> Self {
        self.check_capacity = enabled;
        self
    }

    /// Run until the horizon and summarize
    ///
    /// Passengers still in the system at the horizon are recorded as
    /// abandoned. A simulation can only be run once.
    #[instrument(skip(self), fields(run_id = %self.run_id))]
    pub fn run(&mut self) -> SimulationResult<SimulationSummary> {
        if self.finished {
            return Err(SimulationError::schedule_error(format!("{} has already run", self.run_id)));
        }
        let horizon = self.config.horizon;
        info!(
            seed = ?self.config.seed,
            flights = self.timeline.len(),
            horizon,
            "Starting departure simulation"
        );

        self.scheduler.schedule_at(0.0, Action::Sample);
        for (index, scheduled) in self.timeline.iter().enumerate() {
            self.scheduler.schedule_at(scheduled.offset, Action::FlightArrives(index));
        }

        while let Some((_, action)) = self.scheduler.next_until(horizon) {
            if let Err(error) = self.dispatch(action) {
                if !error.is_recoverable() {
                    return Err(error);
                }
                warn!(?action, category = error.category(), %error, "Event failed, continuing");
            }
            if self.check_capacity && !self.stations.within_capacity() {
                self.capacity_violations += 1;
                warn!(time = self.scheduler.now(), ?action, "Pool holds more slots than its capacity");
            }
        }

        self.abandon_remaining(horizon);
        self.finished = true;

        let summary = self.collector.summarize(&self.stations, self.config.seed, horizon);
        info!(
            events = self.scheduler.fired(),
            passengers = summary.total_passengers,
            boarded = summary.boarded_passengers,
            reneged = summary.reneged_passengers,
            missed = summary.missed_flight_passengers,
            abandoned = summary.abandoned_passengers,
            "Departure simulation complete"
        );
        Ok(summary)
    }

    pub(super) fn dispatch(&mut self, action: Action) -> SimulationResult<()> {
        match action {
            Action::FlightArrives(index) => self.flight_arrives(index),
            Action::BoardingOpens(key) => {
                let now = self.scheduler.now();
                let flight = self.flight_mut(key)?;
                flight.open_boarding()?;
                let departure = flight.departure_time;
                crate::sim_event!(
                    debug,
                    now,
                    "Boarding opened",
                    flight = flight.flight_number.as_str(),
                    departure = departure,
                );
                self.scheduler.schedule_at(departure, Action::Departure(key));
                Ok(())
            }
            Action::Departure(flight) => self.departure(flight),
            Action::Sample => {
                let sample = self.monitor.sample(self.scheduler.now(), &self.stations);
                self.collector.record_sample(&sample);
                self.scheduler.schedule_in(self.monitor.interval(), Action::Sample);
                Ok(())
            }
            Action::FillPool(pool) => {
                self.fill_pool(pool);
                Ok(())
            }
            Action::Passenger(key, wake) => {
                self.wake_passenger(key, wake);
                Ok(())
            }
        }
    }

    /// Generate the passengers of a flight and launch their pipelines
    fn flight_arrives(&mut self, index: usize) -> SimulationResult<()> {
        let scheduled = self
            .timeline
            .get(index)
            .ok_or_else(|| SimulationError::schedule_error(format!("no schedule row at index {}", index)))?;
        let key = FlightKey(index as u32);
        let now = self.scheduler.now();

        let mut flight = Flight::from_record(key, &scheduled.record, &self.config);
        let delay = self.flight_generator.draw_delay(&mut self.rng, &flight.airline);
        flight.set_timeline(now, delay, &self.config);
        self.flight_generator.populate(&mut self.rng, &mut flight, &mut self.factory);
        self.collector.record_flight(&flight);

        debug!(
            flight = %flight.flight_number,
            key = %key,
            passengers = flight.passenger_count(),
            delay,
            boarding_opens = flight.boarding_opens,
            departure = flight.departure_time,
            "Flight processed"
        );

        self.scheduler.schedule_at(flight.boarding_opens, Action::BoardingOpens(key));
        for slot in 0..flight.passengers.len() {
            let passenger = PassengerKey::new(key, slot);
            self.journeys.insert(passenger, Journey::new());
            self.scheduler.schedule_in(0.0, Action::Passenger(passenger, Wake::Arrive));
        }
        self.flights.insert(key, flight);
        Ok(())
    }

    fn departure(&mut self, key: FlightKey) -> SimulationResult<()> {
        let flight = self.flight_mut(key)?;
        flight.depart()?;
        let outstanding = flight.outstanding();
        crate::sim_event!(
            debug,
            flight.departure_time,
            "Flight departed",
            flight = flight.flight_number.as_str(),
            boarded = flight.boarded,
            outstanding = outstanding,
        );
        if outstanding == 0 {
            self.retire_flight(key, true);
        }
        Ok(())
    }

    /// Tear down the boarding pool of a flight with no outstanding passengers,
    /// dropping the flight itself once it has departed
    pub(super) fn retire_flight(&mut self, key: FlightKey, departed: bool) {
        if let Err(error) = self.stations.boarding.teardown(key) {
            warn!(flight = %key, %error, "Boarding pool could not be torn down");
        }
        if departed && self.flights.remove(&key).is_some() {
            trace!(flight = %key, "Flight retired");
        }
    }

    /// Record every passenger still in the pipeline as abandoned
    fn abandon_remaining(&mut self, horizon: f64) {
        let remaining = std::mem::take(&mut self.journeys);
        if !remaining.is_empty() {
            info!(passengers = remaining.len(), "Passengers still in the system at the horizon");
        }
        for key in remaining.into_keys() {
            let Some(flight) = self.flights.get_mut(&key.flight) else {
                warn!(passenger = %key, "Abandoned passenger belongs to no active flight");
                continue;
            };
            let recorded = flight.passenger_mut(key).and_then(|passenger| {
                passenger.finish(PassengerOutcome::Abandoned, horizon)?;
                self.collector.record_passenger(passenger)
            });
            if let Err(error) = recorded {
                warn!(passenger = %key, %error, "Could not record abandoned passenger");
            }
        }
    }

    pub(super) fn flight(&self, key: FlightKey) -> SimulationResult<&Flight> {
        self.flights.get(&key).ok_or(SimulationError::MissingFlight(key))
    }

    pub(super) fn flight_mut(&mut self, key: FlightKey) -> SimulationResult<&mut Flight> {
        self.flights.get_mut(&key).ok_or(SimulationError::MissingFlight(key))
    }

    pub(super) fn passenger(&self, key: PassengerKey) -> SimulationResult<&Passenger> {
        self.flight(key.flight)?.passenger(key)
    }

    pub(super) fn passenger_mut(&mut self, key: PassengerKey) -> SimulationResult<&mut Passenger> {
        self.flight_mut(key.flight)?.passenger_mut(key)
    }

    /// Run identifier
    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Configuration of the run
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Current simulated time
    pub fn now(&self) -> f64 {
        self.scheduler.now()
    }

    /// Events fired so far
    pub fn events_fired(&self) -> u64 {
        self.scheduler.fired()
    }

    /// Stations and their statistics
    pub fn stations(&self) -> &Stations {
        &self.stations
    }

    /// Terminal observations in the order passengers left the pipeline
    pub fn passenger_records(&self) -> &[PassengerRecord] {
        self.collector.passengers()
    }

    /// Flight observations in processing order
    pub fn flight_records(&self) -> &[FlightObservation] {
        self.collector.flights()
    }

    /// Flights not yet retired
    pub fn active_flights(&self) -> usize {
        self.flights.len()
    }

    /// Events after which some pool held more slots than its capacity
    pub fn capacity_violations(&self) -> u64 {
        self.capacity_violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flight::FlightRecord;
    use crate::types::StationKind;
    use chrono::NaiveDateTime;

    fn record(time: &str, flight: &str, destination: &str, aircraft: &str, airline: &str) -> FlightRecord {
        FlightRecord {
            scheduled_time: NaiveDateTime::parse_from_str(time, "%Y-%m-%d %H:%M").unwrap(),
            flight: flight.to_string(),
            destination: destination.to_string(),
            aircraft: aircraft.to_string(),
            airline: airline.to_string(),
        }
    }

    fn small_schedule() -> FlightSchedule {
        FlightSchedule::new(vec![
            record("2024-06-03 06:00", "IB3100", "Barcelona (BCN)", "A320", "Iberia"),
            record("2024-06-03 06:20", "BA0461", "London Heathrow (LHR)", "A321", "British Airways"),
            record("2024-06-03 07:10", "IB6253", "New York JFK (JFK)", "A333", "Iberia"),
        ])
    }

    fn config() -> SimulationConfig {
        SimulationConfig { horizon: 8.0 * 60.0, seed: Some(7), ..Default::default() }
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = SimulationConfig { security_lanes: 0, ..Default::default() };
        let error = AirportSimulation::new(config, &small_schedule()).unwrap_err();
        assert!(!error.is_recoverable());
    }

    #[test]
    fn test_run_accounts_for_every_passenger() {
        let mut sim = AirportSimulation::new(config(), &small_schedule()).unwrap().with_capacity_checks(true);
        let summary = sim.run().unwrap();

        assert_eq!(summary.total_flights, 3);
        assert!(summary.total_passengers > 0);
        assert_eq!(summary.processed_passengers, summary.total_passengers);
        assert_eq!(sim.passenger_records().len() as u64, summary.total_passengers);
        assert_eq!(sim.capacity_violations(), 0);
        assert_eq!(summary.faulted_passengers, 0);
        assert!(summary.boarded_passengers > 0);
        // Every flight departed long before the horizon
        assert_eq!(sim.active_flights(), 0);
        assert_eq!(summary.counters.boarding_pools_created, summary.counters.boarding_pools_torn_down);
    }

    #[test]
    fn test_monitor_samples_every_interval() {
        let mut sim = AirportSimulation::new(config(), &small_schedule()).unwrap();
        let summary = sim.run().unwrap();
        // Samples at 0, 5, ..., 480
        assert_eq!(summary.timestamps.len(), 97);
        assert_eq!(summary.station(StationKind::CheckIn).unwrap().queue_lengths.len(), 97);
        assert_eq!(summary.timestamps[1], 5.0);
    }

    #[test]
    fn test_horizon_truncation_abandons_passengers() {
        let config = SimulationConfig { horizon: 10.0, ..config() };
        let mut sim = AirportSimulation::new(config, &small_schedule()).unwrap();
        let summary = sim.run().unwrap();

        assert_eq!(summary.boarded_passengers, 0);
        assert!(summary.abandoned_passengers > 0);
        assert_eq!(sim.now(), 10.0);
        assert!(sim
            .passenger_records()
            .iter()
            .filter(|record| record.outcome == PassengerOutcome::Abandoned)
            .all(|record| record.completed_at == Some(10.0)));
    }

    #[test]
    fn test_run_only_once() {
        let mut sim = AirportSimulation::new(config(), &small_schedule()).unwrap();
        sim.run().unwrap();
        assert!(sim.run().is_err());
    }

    #[test]
    fn test_empty_schedule_still_samples() {
        let config = SimulationConfig { horizon: 20.0, ..config() };
        let mut sim = AirportSimulation::new(config, &FlightSchedule::new(Vec::new())).unwrap();
        let summary = sim.run().unwrap();
        assert_eq!(summary.total_passengers, 0);
        assert_eq!(summary.timestamps, vec![0.0, 5.0, 10.0, 15.0, 20.0]);
    }
}
