//! Whole-run properties of the departure simulation
//!
//! These tests run a morning bank of departures and check the properties
//! every run must keep: pools never exceed capacity, per-passenger timings are
//! consistent, outcomes are final, and a fixed seed replays exactly.

use airport_departure_sim::flight::{parse_timestamp, FlightRecord, FlightSchedule};
use airport_departure_sim::simulation::{AirportSimulation, SimulationSummary};
use airport_departure_sim::types::{PassengerOutcome, SimulationConfig, StationKind};

fn row(time: &str, flight: &str, destination: &str, aircraft: &str, airline: &str) -> FlightRecord {
    FlightRecord {
        scheduled_time: parse_timestamp(time).unwrap(),
        flight: flight.to_string(),
        destination: destination.to_string(),
        aircraft: aircraft.to_string(),
        airline: airline.to_string(),
    }
}

fn morning_bank() -> FlightSchedule {
    FlightSchedule::new(vec![
        row("2024-06-03 07:00", "IB3166", "London Heathrow (LHR)", "A321", "Iberia"),
        row("2024-06-03 07:05", "IB0031", "Barcelona (BCN)", "A320", "Iberia"),
        row("2024-06-03 07:15", "BA0459", "London Heathrow (LHR)", "A320", "British Airways"),
        row("2024-06-03 07:30", "IB6251", "New York (JFK)", "A332", "Iberia"),
        row("2024-06-03 07:40", "UX1095", "Paris (CDG)", "B738", "Air Europa"),
        row("2024-06-03 08:10", "IB3402", "Rome (FCO)", "A320", "Iberia"),
    ])
}

fn config(seed: u64) -> SimulationConfig {
    SimulationConfig { seed: Some(seed), horizon: 420.0, ..Default::default() }
}

fn run(config: SimulationConfig) -> (AirportSimulation, SimulationSummary) {
    let mut simulation = AirportSimulation::new(config, &morning_bank()).unwrap().with_capacity_checks(true);
    let summary = simulation.run().unwrap();
    (simulation, summary)
}

/// Test that no pool ever holds more slots than its capacity
#[test]
fn test_pools_stay_within_capacity() {
    // Tight capacities make queues form at every station
    let tight = SimulationConfig {
        checkin_desks: 6,
        carrier_desks: 3,
        bag_scanners: 2,
        security_lanes: 2,
        passport_booths: 1,
        passport_egates: 1,
        boarding_agents: 1,
        max_wait_tolerance: 20.0,
        ..config(5)
    };
    let (simulation, summary) = run(tight);
    assert_eq!(simulation.capacity_violations(), 0);
    assert!(summary.reneged_passengers > 0);
    assert!(simulation.stations().within_capacity());
}

/// Test that every generated passenger is recorded exactly once
#[test]
fn test_every_passenger_accounted_for() {
    let (simulation, summary) = run(config(1));
    assert_eq!(summary.total_flights, 6);
    assert_eq!(summary.processed_passengers, summary.total_passengers);
    assert_eq!(
        summary.boarded_passengers
            + summary.reneged_passengers
            + summary.missed_flight_passengers
            + summary.abandoned_passengers
            + summary.faulted_passengers,
        summary.total_passengers
    );
    assert_eq!(summary.faulted_passengers, 0);

    let mut ids: Vec<_> = simulation.passenger_records().iter().map(|r| r.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len() as u64, summary.total_passengers);

    // Every boarding pool is gone once all flights are done
    assert_eq!(simulation.active_flights(), 0);
    assert_eq!(summary.counters.boarding_pools_created, summary.counters.boarding_pools_torn_down);
}

/// Test the timing consistency of boarded passengers
#[test]
fn test_boarded_passenger_timings() {
    let (simulation, _) = run(config(2));
    let boarded: Vec<_> = simulation
        .passenger_records()
        .iter()
        .filter(|r| r.outcome == PassengerOutcome::Boarded)
        .collect();
    assert!(!boarded.is_empty());

    for r in boarded {
        let arrival = r.arrival_time.unwrap();
        let completed = r.completed_at.unwrap();
        let total = r.total_time().unwrap();
        assert!((total - (completed - arrival)).abs() < 1e-9);
        assert!(r.sum_waits() <= total + 1e-9, "{} waited longer than it stayed", r.key);
        assert!(r.waits.contains_key(&StationKind::Boarding));
        assert!(r.waits.contains_key(&StationKind::Security));
        assert!(r.waits.values().all(|w| *w >= 0.0));
        assert!(r.services.values().all(|s| *s > 0.0));
    }
}

/// Test that reneged passengers have no records past the station they left
#[test]
fn test_reneged_passengers_stop_at_their_station() {
    let impatient = SimulationConfig {
        security_lanes: 2,
        passport_booths: 1,
        max_wait_tolerance: 10.0,
        ..config(3)
    };
    let (simulation, summary) = run(impatient);
    assert!(summary.reneged_passengers > 0);

    for r in simulation.passenger_records() {
        if let PassengerOutcome::Reneged { station } = r.outcome {
            assert_ne!(station, StationKind::Boarding);
            assert!(!r.waits.contains_key(&station));
            assert!(r.waits.keys().all(|visited| *visited < station), "{} has records after {}", r.key, station);
        }
    }
}

/// Test that a fixed seed reproduces the whole run
#[test]
fn test_seed_determinism() {
    let (first, first_summary) = run(config(17));
    let (second, second_summary) = run(config(17));
    assert_eq!(first.passenger_records(), second.passenger_records());
    assert_eq!(first.flight_records(), second.flight_records());
    assert_eq!(first_summary, second_summary);
    assert_eq!(first.events_fired(), second.events_fired());

    let (_, other_summary) = run(config(18));
    assert_ne!(first_summary, other_summary);
}

/// Test that priority passengers wait less at the gate on average
#[test]
fn test_priority_boarding_wait() {
    let mut priority_waits = 0.0;
    let mut regular_waits = 0.0;
    for seed in 0..5 {
        let busy_gates = SimulationConfig {
            boarding_agents: 1,
            priority_boarding: true,
            priority_rate: 0.3,
            ..config(seed)
        };
        let (_, summary) = run(busy_gates);
        assert!(summary.counters.priority_boarded > 0);
        priority_waits += summary.priority_boarding_avg_wait;
        regular_waits += summary.regular_boarding_avg_wait;
    }
    assert!(
        priority_waits <= regular_waits,
        "priority {} > regular {}",
        priority_waits / 5.0,
        regular_waits / 5.0
    );
}

/// Test that a short horizon leaves passengers abandoned in the system
#[test]
fn test_horizon_cuts_the_run() {
    let (simulation, summary) = run(SimulationConfig { horizon: 30.0, ..config(4) });
    assert!(summary.abandoned_passengers > 0);
    assert_eq!(summary.boarded_passengers, 0);
    assert!(simulation.now() <= 30.0);
    for r in simulation.passenger_records() {
        assert!(r.completed_at.unwrap() <= 30.0);
    }
}
