//! Simulation runs, statistics and error handling
//!
//! # Overview
//!
//! - **AirportSimulation**: owns one run and dispatches every event from a
//!   single loop until the horizon
//! - **Pipeline**: per-passenger state machine through the stations
//! - **Monitor**: samples queue lengths and utilization at a fixed interval
//! - **StatisticsCollector**: terminal passenger records, flight records and
//!   samples, reduced into a [`SimulationSummary`]
//! - **ScenarioManager**: runs configuration variants against one schedule
//! - **SimulationError**: error taxonomy of a run
//!
//! # Usage Example
//!
//! ```rust
//! use airport_departure_sim::flight::*;
//! use airport_departure_sim::simulation::*;
//! use airport_departure_sim::types::*;
//!
//! let schedule = FlightSchedule::new(vec![FlightRecord {
//!     scheduled_time: parse_timestamp("2024-06-03 08:30").unwrap(),
//!     flight: "IB3100".to_string(),
//!     destination: "Barcelona (BCN)".to_string(),
//!     aircraft: "A320".to_string(),
//!     airline: "Iberia".to_string(),
//! }]);
//!
//! let config = SimulationConfig { horizon: 240.0, seed: Some(1), ..Default::default() };
//! let mut simulation = AirportSimulation::new(config, &schedule)?;
//! let summary = simulation.run()?;
//!
//! assert_eq!(summary.total_flights, 1);
//! assert_eq!(summary.processed_passengers, summary.total_passengers);
//! # Ok::<(), SimulationError>(())
//! ```

pub mod airport;
pub mod error;
pub mod logging;
pub mod monitor;
pub mod pipeline;
pub mod scenarios;
pub mod statistics;

// Re-export all public types for convenience
pub use airport::*;
pub use error::*;
pub use logging::*;
pub use monitor::*;
pub use pipeline::*;
pub use scenarios::*;
pub use statistics::*;
