//! Airport Departure Simulator
//!
//! A discrete-event simulation of the departure side of an airport terminal:
//! passengers of scheduled flights pass check-in, hold-baggage scanning,
//! security, passport control and boarding, competing for fixed-capacity
//! desks, lanes, booths and gate agents.
//!
//! # Overview
//!
//! One run owns a single logical clock. Every flight of the schedule is
//! processed at its offset from the first departure: its passengers are
//! generated and each walks its own pipeline, skipping the stations its
//! traits do not need. Passengers give up on a queue after a wait tolerance,
//! priority passengers may jockey to fast track, and each flight's gate has
//! its own pool of agents that exists only while the flight needs it.
//!
//! ## Key Features
//!
//! - **Deterministic Replay**: a fixed seed reproduces every draw and every outcome
//! - **Renege and Jockey Policies**: timeout races with late-grant release
//! - **Per-Flight Boarding**: lazily created, priority-ordered agent pools
//! - **Flight Generation**: load factor, overbooking and an optional delay model
//! - **Statistics**: per-station wait, queue and utilization series and a JSON summary
//! - **Scenario Comparison**: configuration variants run against one schedule
//!
//! ## Quick Start
//!
//! ```rust
//! use airport_departure_sim::*;
//! use airport_departure_sim::flight::{parse_timestamp, FlightSchedule};
//!
//! let schedule = FlightSchedule::new(vec![FlightRecord {
//!     scheduled_time: parse_timestamp("2024-06-03 07:00").unwrap(),
//!     flight: "BA0461".to_string(),
//!     destination: "London Heathrow (LHR)".to_string(),
//!     aircraft: "A321".to_string(),
//!     airline: "British Airways".to_string(),
//! }]);
//!
//! let config = SimulationConfig { horizon: 300.0, ..Default::default() };
//! let summary = AirportSimulation::new(config, &schedule)?.run()?;
//! println!("{} of {} passengers boarded", summary.boarded_passengers, summary.total_passengers);
//! # Ok::<(), SimulationError>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`types`]: configuration, enums, identifiers and static lookup tables
//! - [`engine`]: scheduler, resource pools, timeout races and random draws
//! - [`passenger`]: passenger entity, traits and routing predicates
//! - [`flight`]: flight entity, passenger generation and schedules
//! - [`stations`]: the five service stations
//! - [`simulation`]: run orchestration, pipeline, statistics and scenarios
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │   Types     │    │   Engine    │    │  Passenger  │
//! │             │    │             │    │             │
//! │ Config      │◄───┤ Scheduler   │    │ Traits      │
//! │ Enums       │    │ Pools       │    │ Routing     │
//! │ Tables      │    │ Contests    │    │             │
//! └─────────────┘    └─────────────┘    └─────────────┘
//!        ▲                  ▲                  ▲
//!        │                  │                  │
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │   Flight    │    │  Stations   │    │ Simulation  │
//! │             │    │             │    │             │
//! │ Generation  │◄───┤ Pools       │◄───┤ Pipeline    │
//! │ Schedule    │    │ Statistics  │    │ Summary     │
//! └─────────────┘    └─────────────┘    └─────────────┘
//! ```
#![warn(missing_docs, missing_debug_implementations, unreachable_pub)]

// Module declarations
pub mod engine;
pub mod flight;
pub mod passenger;
pub mod simulation;
pub mod stations;
pub mod types;

// Core types and configuration
pub use types::{
    BaggageScreening, ConfigValidationError, FlightKey, PassengerId, PassengerKey, PassengerOutcome,
    SimulationConfig, StationKind,
};

// Schedule input
pub use flight::{FlightRecord, FlightSchedule};

// Simulation types and functionality
pub use simulation::{AirportSimulation, ScenarioManager, SimulationError, SimulationSummary};
