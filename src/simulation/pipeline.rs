//! Per-passenger pipeline state machine
//!
//! Every passenger walks check-in, baggage scanning, security, passport
//! control and boarding in that order, skipping the steps its routing does
//! not need. A passenger is suspended in exactly one of four ways: queued for
//! a pool (optionally raced against its renege timer), being served, polling
//! a closed gate, or not yet arrived. Each wake-up resumes it from the
//! [`Journey`] it left behind.
//!
//! Errors returned by a step never reach the engine. The passenger is
//! force-completed as `Faulted` after its timers are cancelled and every
//! request it made is withdrawn or released.

use tracing::{debug, trace, warn};

use crate::engine::{Contest, EventKey, Grant, Ticket, TimeoutResolution};
use crate::passenger::{Passenger, StationTiming};
use crate::simulation::airport::{Action, AirportSimulation};
use crate::simulation::{SimulationError, SimulationResult};
use crate::stations::{Checkpoint, Lane, PoolId};
use crate::types::{
    BaggageScreening, FlightStatus, PassengerKey, PassengerOutcome, PassengerState, StationKind,
};

/// Position of a passenger in the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Not yet arrived
    Start,
    /// Check-in desk
    CheckIn,
    /// Separate hold-baggage scanning
    BaggageScan,
    /// Personal screening
    Security,
    /// Hold-baggage scanning while the security lane is still held
    InlineBagScan,
    /// Passport control
    Passport,
    /// At the gate, waiting for it to open
    Gate,
    /// Queued for or being served by the boarding agents
    Boarding,
}

impl Step {
    /// Station a step belongs to
    pub fn station(self) -> Option<StationKind> {
        match self {
            Step::Start => None,
            Step::CheckIn => Some(StationKind::CheckIn),
            Step::BaggageScan | Step::InlineBagScan => Some(StationKind::BaggageSecurity),
            Step::Security => Some(StationKind::Security),
            Step::Passport => Some(StationKind::Passport),
            Step::Gate | Step::Boarding => Some(StationKind::Boarding),
        }
    }

    /// Candidate that follows a completed step
    fn next(self) -> Option<Step> {
        match self {
            Step::Start => Some(Step::CheckIn),
            Step::CheckIn => Some(Step::BaggageScan),
            Step::BaggageScan => Some(Step::Security),
            Step::Security | Step::InlineBagScan => Some(Step::Passport),
            Step::Passport => Some(Step::Gate),
            Step::Gate | Step::Boarding => None,
        }
    }
}

/// What resumed a passenger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    /// Arrival at the terminal
    Arrive,
    /// A queued request was promoted to holder
    Granted(PoolId, Ticket),
    /// The renege timer of a request fired
    Timeout(Ticket),
    /// The current service finished
    ServiceDone,
    /// Re-check of a gate that was still closed
    GatePoll,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    Queued,
    Serving { wait: f64, service: f64 },
    Polling,
}

/// Suspended pipeline of one passenger
#[derive(Debug, Clone)]
pub struct Journey {
    step: Step,
    phase: Phase,
    contest: Option<Contest<PoolId>>,
    held: Vec<(PoolId, Ticket)>,
    timer: Option<EventKey>,
    checkpoint: Option<Checkpoint>,
    screening: Option<StationTiming>,
}

impl Default for Journey {
    fn default() -> Self {
        Self::new()
    }
}

impl Journey {
    /// A passenger that has not arrived yet
    pub fn new() -> Self {
        Self {
            step: Step::Start,
            phase: Phase::Idle,
            contest: None,
            held: Vec::new(),
            timer: None,
            checkpoint: None,
            screening: None,
        }
    }

    /// Current step
    pub fn step(&self) -> Step {
        self.step
    }

    /// Pools currently held
    pub fn held(&self) -> &[(PoolId, Ticket)] {
        &self.held
    }

    /// Whether a request is queued
    pub fn is_queued(&self) -> bool {
        self.phase == Phase::Queued
    }
}

impl AirportSimulation {
    /// Resume a passenger; stale wake-ups for finished passengers are dropped
    pub(super) fn wake_passenger(&mut self, key: PassengerKey, wake: Wake) {
        let Some(mut journey) = self.journeys.remove(&key) else {
            if let Wake::Granted(pool, ticket) = wake {
                self.release_stray(pool, ticket, &[]);
            }
            trace!(passenger = %key, ?wake, "Wake-up for a passenger no longer in the pipeline");
            return;
        };

        match self.advance(key, &mut journey, wake) {
            Ok(true) => {
                self.journeys.insert(key, journey);
            }
            Ok(false) => self.passenger_done(key),
            Err(error) => self.fault(key, journey, error),
        }
    }

    /// Run one wake-up; `Ok(false)` once the passenger left the pipeline
    fn advance(&mut self, key: PassengerKey, journey: &mut Journey, wake: Wake) -> SimulationResult<bool> {
        match wake {
            Wake::Arrive => {
                let now = self.scheduler.now();
                self.passenger_mut(key)?.arrive(now);
                trace!(passenger = %key, time = now, "Passenger arrived");
                self.proceed(key, journey, Step::Start)
            }
            Wake::Granted(pool, ticket) => {
                let accepted = match journey.contest.as_mut() {
                    Some(contest) if contest.pool == pool => contest.accept_grant(ticket, &mut self.scheduler),
                    _ => false,
                };
                if !accepted {
                    self.release_stray(pool, ticket, &journey.held);
                    return Ok(true);
                }
                self.begin_service(key, journey)
            }
            Wake::Timeout(ticket) => self.resolve_timeout(key, journey, ticket),
            Wake::ServiceDone => self.finish_service(key, journey),
            Wake::GatePoll => {
                if journey.phase != Phase::Polling {
                    return Ok(true);
                }
                journey.timer = None;
                self.at_gate(key, journey)
            }
        }
    }

    /// Move on to the first step after `completed` that the passenger needs
    fn proceed(&mut self, key: PassengerKey, journey: &mut Journey, completed: Step) -> SimulationResult<bool> {
        journey.phase = Phase::Idle;
        let mut step = completed;
        loop {
            step = step
                .next()
                .ok_or_else(|| SimulationError::passenger_fault(key, "pipeline ran past boarding"))?;

            let is_schengen = self.flight(key.flight)?.is_schengen;
            let passenger = self.passenger(key)?;
            let enter = match step {
                Step::CheckIn => passenger.needs_checkin(),
                Step::BaggageScan => {
                    self.config.baggage_screening == BaggageScreening::Separate && scans_bags(passenger)
                }
                Step::Security => passenger.needs_security(),
                Step::Passport => passenger.needs_passport_control(is_schengen),
                Step::Gate => return self.at_gate(key, journey),
                Step::Start | Step::InlineBagScan | Step::Boarding => {
                    return Err(SimulationError::passenger_fault(key, format!("{:?} is not a routing step", step)))
                }
            };
            if enter {
                return self.enter_station(key, journey, step);
            }
        }
    }

    /// Queue at the pool of a station step
    fn enter_station(&mut self, key: PassengerKey, journey: &mut Journey, step: Step) -> SimulationResult<bool> {
        let traits = self.passenger(key)?.traits;
        let tolerance = Some(self.config.max_wait_tolerance);

        let (pool, priority, tolerance, state) = match step {
            Step::CheckIn => {
                let bank = self.stations.checkin.desk_for(&self.flight(key.flight)?.airline, traits.priority);
                (PoolId::CheckIn(bank), 0, tolerance, PassengerState::WaitingForCheckIn)
            }
            Step::BaggageScan | Step::InlineBagScan => (PoolId::BagScan, 0, None, PassengerState::WaitingForBaggageScan),
            Step::Security => {
                let lane = self.stations.security.choose_lane(traits.priority);
                if lane == Lane::FastTrack {
                    self.passenger_mut(key)?.jockeyed = true;
                    debug!(passenger = %key, "Priority passenger redirected to fast track");
                }
                (lane.pool_id(), 0, tolerance, PassengerState::WaitingForSecurity)
            }
            Step::Passport => {
                let checkpoint = Checkpoint::for_passenger(traits.egate_eligible);
                journey.checkpoint = Some(checkpoint);
                (checkpoint.pool_id(), 0, tolerance, PassengerState::WaitingForPassport)
            }
            Step::Boarding => {
                let priority = self.stations.boarding.queue_priority(traits.priority);
                (PoolId::Boarding(key.flight), priority, None, PassengerState::WaitingToBoard)
            }
            Step::Start | Step::Gate => {
                return Err(SimulationError::passenger_fault(key, format!("{:?} has no pool", step)))
            }
        };

        journey.step = step;
        self.passenger_mut(key)?.state = state;

        let contest = Contest::enter(
            pool,
            self.stations.pool_mut(pool)?,
            key,
            priority,
            tolerance,
            &mut self.scheduler,
            |ticket| Action::Passenger(key, Wake::Timeout(ticket)),
        );
        let granted = contest.granted;
        journey.contest = Some(contest);
        if granted {
            self.begin_service(key, journey)
        } else {
            journey.phase = Phase::Queued;
            self.schedule_fill(pool)?;
            Ok(true)
        }
    }

    /// Schedule one fill for a pool that defers its grants
    ///
    /// The fill runs after every event already queued for this instant, so
    /// all passengers reaching the pool at the same time compete for it by
    /// priority rather than by dequeue order.
    fn schedule_fill(&mut self, pool: PoolId) -> SimulationResult<()> {
        if self.stations.pool_mut(pool)?.claim_fill() {
            self.scheduler.schedule_in(0.0, Action::FillPool(pool));
        }
        Ok(())
    }

    /// Hand the free slots of a pool to its best waiters
    pub(super) fn fill_pool(&mut self, pool: PoolId) {
        let grants = match self.stations.pool_mut(pool) {
            Ok(resource) => resource.fill(),
            Err(_) => {
                trace!(?pool, "Pool was retired before its fill ran");
                return;
            }
        };
        for grant in grants {
            self.deliver(pool, Some(grant));
        }
    }

    fn begin_service(&mut self, key: PassengerKey, journey: &mut Journey) -> SimulationResult<bool> {
        let now = self.scheduler.now();
        let contest = journey
            .contest
            .take()
            .ok_or_else(|| SimulationError::passenger_fault(key, "service started without a request"))?;
        let wait = contest.waited(now);
        journey.held.push((contest.pool, contest.ticket));

        let traits = self.passenger(key)?.traits;
        let rng = &mut self.rng;
        let (service, state) = match journey.step {
            Step::CheckIn => (self.stations.checkin.service_time(rng, traits.bags), PassengerState::CheckingIn),
            Step::BaggageScan | Step::InlineBagScan => {
                (self.stations.baggage.scan_time(rng, traits.bags), PassengerState::BaggageScan)
            }
            Step::Security => {
                (self.stations.security.service_time(rng, traits.priority), PassengerState::SecurityScreening)
            }
            Step::Passport => {
                let checkpoint = journey
                    .checkpoint
                    .ok_or_else(|| SimulationError::passenger_fault(key, "passport checkpoint not chosen"))?;
                (self.stations.passport.service_time(rng, checkpoint), PassengerState::PassportControl)
            }
            Step::Boarding => (self.stations.boarding.service_time(rng), PassengerState::Boarding),
            Step::Start | Step::Gate => {
                return Err(SimulationError::passenger_fault(key, "granted a pool outside a station"))
            }
        };

        self.passenger_mut(key)?.state = state;
        journey.phase = Phase::Serving { wait, service };
        journey.timer = Some(self.scheduler.schedule_in(service, Action::Passenger(key, Wake::ServiceDone)));
        Ok(true)
    }

    fn finish_service(&mut self, key: PassengerKey, journey: &mut Journey) -> SimulationResult<bool> {
        let Phase::Serving { wait, service } = journey.phase else {
            return Err(SimulationError::passenger_fault(key, "service finished while not being served"));
        };
        let now = self.scheduler.now();
        journey.timer = None;
        journey.phase = Phase::Idle;
        let bags = self.passenger(key)?.traits.bags;

        match journey.step {
            Step::CheckIn => {
                self.release_held(journey)?;
                self.stations.checkin.stats.record_service(wait, service);
                let passenger = self.passenger_mut(key)?;
                passenger.record_station(StationKind::CheckIn, wait, service, now)?;
                passenger.has_boarding_pass = true;
                self.proceed(key, journey, Step::CheckIn)
            }
            Step::BaggageScan => {
                self.release_held(journey)?;
                self.stations.baggage.record_scan(wait, service, bags);
                let passenger = self.passenger_mut(key)?;
                passenger.record_station(StationKind::BaggageSecurity, wait, service, now)?;
                passenger.bags_scanned = true;
                self.proceed(key, journey, Step::BaggageScan)
            }
            Step::Security => {
                let inline = self.config.baggage_screening == BaggageScreening::Inline
                    && scans_bags(self.passenger(key)?);
                if inline {
                    journey.screening = Some(StationTiming { wait, service, completed_at: now });
                    return self.enter_station(key, journey, Step::InlineBagScan);
                }
                self.release_held(journey)?;
                self.stations.security.stats.record_service(wait, service);
                let passenger = self.passenger_mut(key)?;
                passenger.record_station(StationKind::Security, wait, service, now)?;
                passenger.cleared_security = true;
                self.proceed(key, journey, Step::Security)
            }
            Step::InlineBagScan => {
                let screening = journey
                    .screening
                    .take()
                    .ok_or_else(|| SimulationError::passenger_fault(key, "bag scan without a screening"))?;
                self.release_held(journey)?;
                self.stations.security.stats.record_service(screening.wait, screening.service);
                self.stations.baggage.record_scan(wait, service, bags);
                let passenger = self.passenger_mut(key)?;
                passenger.record_station(
                    StationKind::Security,
                    screening.wait,
                    screening.service,
                    screening.completed_at,
                )?;
                passenger.record_station(StationKind::BaggageSecurity, wait, service, now)?;
                passenger.cleared_security = true;
                passenger.bags_scanned = true;
                self.proceed(key, journey, Step::InlineBagScan)
            }
            Step::Passport => {
                let checkpoint = journey
                    .checkpoint
                    .ok_or_else(|| SimulationError::passenger_fault(key, "passport checkpoint not chosen"))?;
                self.release_held(journey)?;
                self.stations.passport.record_clearance(checkpoint, wait, service);
                let passenger = self.passenger_mut(key)?;
                passenger.record_station(StationKind::Passport, wait, service, now)?;
                passenger.cleared_passport = true;
                self.proceed(key, journey, Step::Passport)
            }
            Step::Boarding => {
                self.release_held(journey)?;
                let priority = self.passenger(key)?.traits.priority;
                self.stations.boarding.record_boarding(wait, service, priority);
                let passenger = self.passenger_mut(key)?;
                passenger.record_station(StationKind::Boarding, wait, service, now)?;
                passenger.finish(PassengerOutcome::Boarded, now)?;
                self.flight_mut(key.flight)?.boarded += 1;
                Ok(false)
            }
            Step::Start | Step::Gate => {
                Err(SimulationError::passenger_fault(key, "service finished outside a station"))
            }
        }
    }

    fn resolve_timeout(&mut self, key: PassengerKey, journey: &mut Journey, ticket: Ticket) -> SimulationResult<bool> {
        let Some(contest) = journey.contest.as_mut() else {
            return Ok(true);
        };
        let pool = contest.pool;
        let resolution = contest.resolve_timeout(ticket, self.stations.pool_mut(pool)?)?;

        match resolution {
            TimeoutResolution::Stale => Ok(true),
            TimeoutResolution::Withdrawn => self.renege(key, journey),
            TimeoutResolution::LateGrant(next) => {
                debug!(passenger = %key, ?pool, "Grant raced the renege timer and was released");
                self.deliver(pool, next);
                self.renege(key, journey)
            }
        }
    }

    fn renege(&mut self, key: PassengerKey, journey: &mut Journey) -> SimulationResult<bool> {
        let now = self.scheduler.now();
        let station = journey
            .step
            .station()
            .ok_or_else(|| SimulationError::passenger_fault(key, "reneged outside a station"))?;
        let waited = journey.contest.take().map(|contest| contest.waited(now)).unwrap_or(0.0);
        journey.phase = Phase::Idle;
        self.release_held(journey)?;

        self.stations.stats_mut(station).record_renege();
        debug!(passenger = %key, %station, waited, "Passenger reneged");
        self.passenger_mut(key)?.finish(PassengerOutcome::Reneged { station }, now)?;
        Ok(false)
    }

    /// Board, wait for the gate to open, or miss the flight
    fn at_gate(&mut self, key: PassengerKey, journey: &mut Journey) -> SimulationResult<bool> {
        journey.step = Step::Gate;
        let (status, is_schengen) = {
            let flight = self.flight(key.flight)?;
            (flight.status, flight.is_schengen)
        };
        if !self.passenger(key)?.ready_to_board(is_schengen) {
            return Err(SimulationError::passenger_fault(
                key,
                "reached the gate without clearing every required station",
            ));
        }

        match status {
            FlightStatus::Boarding => {
                self.stations.boarding.open_pool(key.flight);
                self.enter_station(key, journey, Step::Boarding)
            }
            FlightStatus::Scheduled => {
                self.passenger_mut(key)?.state = PassengerState::WaitingAtGate;
                journey.phase = Phase::Polling;
                let poll = self.config.gate_poll_interval;
                journey.timer = Some(self.scheduler.schedule_in(poll, Action::Passenger(key, Wake::GatePoll)));
                Ok(true)
            }
            FlightStatus::Departed => {
                let now = self.scheduler.now();
                debug!(passenger = %key, flight = %key.flight, "Passenger reached the gate after departure");
                self.passenger_mut(key)?.finish(PassengerOutcome::MissedFlight, now)?;
                Ok(false)
            }
        }
    }

    /// Release every held slot, newest first, handing each freed slot on
    fn release_held(&mut self, journey: &mut Journey) -> SimulationResult<()> {
        while let Some((pool, ticket)) = journey.held.pop() {
            let next = self.stations.pool_mut(pool)?.release(ticket)?;
            self.deliver(pool, next);
        }
        Ok(())
    }

    /// Schedule delivery of a grant to the waiter it promoted
    pub(super) fn deliver(&mut self, pool: PoolId, grant: Option<Grant<PassengerKey>>) {
        if let Some(grant) = grant {
            trace!(passenger = %grant.owner, ?pool, "Slot handed to next waiter");
            self.scheduler.schedule_in(0.0, Action::Passenger(grant.owner, Wake::Granted(pool, grant.ticket)));
        }
    }

    /// Give back a slot granted to a request nobody is waiting on any more
    fn release_stray(&mut self, pool: PoolId, ticket: Ticket, held: &[(PoolId, Ticket)]) {
        if held.contains(&(pool, ticket)) {
            return;
        }
        let released = match self.stations.pool_mut(pool) {
            Ok(resource) if resource.is_holding(ticket) => resource.release(ticket),
            _ => return,
        };
        match released {
            Ok(next) => {
                debug!(?pool, ticket = ticket.sequence(), "Released a grant nobody was waiting for");
                self.deliver(pool, next);
            }
            Err(error) => warn!(?pool, %error, "Could not release stray grant"),
        }
    }

    /// Force-complete a passenger whose pipeline failed
    fn fault(&mut self, key: PassengerKey, mut journey: Journey, error: SimulationError) {
        let now = self.scheduler.now();
        warn!(
            passenger = %key,
            step = ?journey.step,
            category = error.category(),
            %error,
            "Passenger pipeline fault, force-completing"
        );

        if let Some(timer) = journey.timer.take() {
            self.scheduler.cancel(timer);
        }
        if let Some(mut contest) = journey.contest.take() {
            let abandoned = match self.stations.pool_mut(contest.pool) {
                Ok(pool) => contest.abandon(pool, &mut self.scheduler),
                Err(error) => Err(error),
            };
            match abandoned {
                Ok(next) => self.deliver(contest.pool, next),
                Err(error) => warn!(passenger = %key, %error, "Could not withdraw request of faulted passenger"),
            }
        }
        if let Err(error) = self.release_held(&mut journey) {
            warn!(passenger = %key, %error, "Could not release slots of faulted passenger");
        }

        match self.passenger_mut(key) {
            Ok(passenger) => {
                if !passenger.is_terminal() {
                    passenger.force_fault(now);
                }
            }
            Err(error) => {
                warn!(passenger = %key, %error, "Faulted passenger is not booked on an active flight");
                return;
            }
        }
        self.passenger_done(key);
    }

    /// Record a passenger that left the pipeline and retire its flight's
    /// resources once every passenger of the flight is done
    pub(super) fn passenger_done(&mut self, key: PassengerKey) {
        let Some(flight) = self.flights.get(&key.flight) else {
            warn!(passenger = %key, "Finished passenger belongs to no active flight");
            return;
        };
        let recorded = flight.passenger(key).and_then(|passenger| self.collector.record_passenger(passenger));
        if let Err(error) = recorded {
            warn!(passenger = %key, %error, "Could not record passenger outcome");
        }
        if flight.outstanding() == 0 {
            let departed = flight.status == FlightStatus::Departed;
            self.retire_flight(key.flight, departed);
        }
    }
}

/// Whether a passenger still has hold bags to put through a scanner
fn scans_bags(passenger: &Passenger) -> bool {
    passenger.needs_bag_scan() && passenger.traits.bags > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flight::{parse_timestamp, FlightRecord, FlightSchedule};
    use crate::simulation::statistics::PassengerRecord;
    use crate::types::{FlightKey, FlightParameters, SimulationConfig};

    const HORIZON: f64 = 600.0;

    /// Three Iberia passengers sharing a single carrier desk
    fn single_desk() -> AirportSimulation {
        let mut config = SimulationConfig {
            seed: Some(11),
            horizon: HORIZON,
            checkin_desks: 2,
            carrier_desks: 1,
            priority_desk_share: 0.0,
            max_wait_tolerance: 1000.0,
            online_checkin_rate: 0.0,
            carry_on_only_rate: 0.0,
            egate_eligible_rate: 0.0,
            priority_rate: 0.0,
            flights: FlightParameters {
                load_factor_mean: 1.0,
                load_factor_stddev: 0.0,
                load_factor_min: 0.5,
                load_factor_max: 1.0,
                passenger_count_spread: 0.0,
                passenger_count_min_stddev: 0.0,
                overbooking_chance: 0.0,
                ..Default::default()
            },
            ..Default::default()
        };
        config.aircraft_capacities.insert("TRIO".to_string(), 3);
        let schedule = FlightSchedule::new(vec![FlightRecord {
            scheduled_time: parse_timestamp("2024-06-03 10:00").unwrap(),
            flight: "IB0001".to_string(),
            destination: "London Heathrow (LHR)".to_string(),
            aircraft: "TRIO".to_string(),
            airline: "Iberia".to_string(),
        }]);

        let mut sim = AirportSimulation::new(config, &schedule).unwrap();
        sim.scheduler.schedule_at(0.0, Action::FlightArrives(0));
        sim
    }

    fn slot(index: usize) -> PassengerKey {
        PassengerKey::new(FlightKey(0), index)
    }

    fn dispatch_next(sim: &mut AirportSimulation) -> bool {
        match sim.scheduler.next_until(HORIZON) {
            Some((_, action)) => {
                sim.dispatch(action).unwrap();
                assert!(sim.stations.within_capacity());
                true
            }
            None => false,
        }
    }

    /// Dispatch until the last passenger is queued behind the other two
    fn until_desk_queue(sim: &mut AirportSimulation) {
        while !sim.journeys.get(&slot(2)).is_some_and(Journey::is_queued) {
            assert!(dispatch_next(sim), "queue never formed");
        }
        assert!(sim.journeys[&slot(1)].is_queued());
    }

    fn record(sim: &AirportSimulation, key: PassengerKey) -> &PassengerRecord {
        let mut matching = sim.passenger_records().iter().filter(|r| r.key == key);
        let found = matching.next().unwrap();
        assert!(matching.next().is_none(), "{} recorded twice", key);
        found
    }

    #[test]
    fn test_step_order() {
        let mut order = vec![Step::Start];
        while let Some(next) = order.last().and_then(|step| step.next()) {
            order.push(next);
        }
        assert_eq!(
            order,
            vec![Step::Start, Step::CheckIn, Step::BaggageScan, Step::Security, Step::Passport, Step::Gate]
        );
        assert_eq!(Step::InlineBagScan.next(), Some(Step::Passport));
        assert_eq!(Step::Boarding.next(), None);
    }

    #[test]
    fn test_step_stations() {
        assert_eq!(Step::Start.station(), None);
        assert_eq!(Step::InlineBagScan.station(), Some(StationKind::BaggageSecurity));
        assert_eq!(Step::Gate.station(), Some(StationKind::Boarding));
    }

    #[test]
    fn test_new_journey_is_idle() {
        let journey = Journey::new();
        assert_eq!(journey.step(), Step::Start);
        assert!(journey.held().is_empty());
        assert!(!journey.is_queued());
    }

    #[test]
    fn test_fault_while_queued_withdraws_request() {
        let mut sim = single_desk();
        until_desk_queue(&mut sim);

        let contest = sim.journeys[&slot(1)].contest.unwrap();
        let renege_timer = contest.timer.unwrap();
        assert!(sim.scheduler.is_pending(renege_timer));

        // A service completion for a passenger still in the queue is a pipeline fault
        sim.wake_passenger(slot(1), Wake::ServiceDone);
        assert!(!sim.journeys.contains_key(&slot(1)));
        assert!(!sim.scheduler.is_pending(renege_timer));
        let desk = sim.stations.pool_mut(contest.pool).unwrap();
        assert_eq!(desk.queue_length(), 1);
        assert!(!desk.is_waiting(contest.ticket));

        while dispatch_next(&mut sim) {}

        assert!(sim.stations.pool_mut(contest.pool).unwrap().is_idle());
        assert_eq!(record(&sim, slot(1)).outcome, PassengerOutcome::Faulted);
        assert!(record(&sim, slot(1)).waits.is_empty());

        // The passenger behind moved up and waited only for the first one
        let first = record(&sim, slot(0));
        let third = record(&sim, slot(2));
        assert_ne!(third.outcome, PassengerOutcome::Faulted);
        let first_service = first.services[&StationKind::CheckIn];
        assert!((third.waits[&StationKind::CheckIn] - first_service).abs() < 1e-9);
        assert_eq!(sim.passenger_records().len(), 3);
    }

    #[test]
    fn test_fault_while_served_hands_slot_on() {
        let mut sim = single_desk();
        until_desk_queue(&mut sim);

        let journey = sim.journeys.remove(&slot(0)).unwrap();
        let (pool, ticket) = journey.held()[0];
        let service_timer = journey.timer.unwrap();
        let faulted_at = sim.scheduler.now();
        sim.fault(slot(0), journey, SimulationError::passenger_fault(slot(0), "lost boarding pass"));

        assert!(!sim.scheduler.is_pending(service_timer));
        let desk = sim.stations.pool_mut(pool).unwrap();
        assert!(!desk.is_holding(ticket));
        // The desk went straight to the next waiter
        assert_eq!(desk.in_use(), 1);
        assert_eq!(desk.queue_length(), 1);

        while dispatch_next(&mut sim) {}

        assert!(sim.stations.pool_mut(pool).unwrap().is_idle());
        let faulted = record(&sim, slot(0));
        assert_eq!(faulted.outcome, PassengerOutcome::Faulted);
        assert_eq!(faulted.completed_at, Some(faulted_at));
        assert!(faulted.services.is_empty());

        let second = record(&sim, slot(1));
        assert!((second.waits[&StationKind::CheckIn] - faulted_at).abs() < 1e-9);
        let faults = sim.passenger_records().iter().filter(|r| r.outcome == PassengerOutcome::Faulted).count();
        assert_eq!(faults, 1);
    }
}
