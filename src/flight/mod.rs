//! Flights, their passenger populations and the departure schedule
//!
//! # Overview
//!
//! - **Flight**: schedule data resolved against the static tables, the gate
//!   state machine (Scheduled → Boarding → Departed) and the passengers it owns
//! - **FlightGenerator**: overbooking, load factor and passenger count draws,
//!   plus the optional airline delay model
//! - **FlightSchedule**: JSON loader, base-time offsets and a synthetic
//!   schedule generator
//!
//! # Usage Example
//!
//! ```rust
//! use airport_departure_sim::flight::*;
//! use airport_departure_sim::types::*;
//!
//! let record = FlightRecord {
//!     scheduled_time: parse_timestamp("2024-06-03 08:30:00").unwrap(),
//!     flight: "IB3100".to_string(),
//!     destination: "London (LHR)".to_string(),
//!     aircraft: "A321".to_string(),
//!     airline: "Iberia".to_string(),
//! };
//!
//! let config = SimulationConfig::default();
//! let flight = Flight::from_record(FlightKey(0), &record, &config);
//! assert!(!flight.is_schengen);
//! assert_eq!(flight.capacity, 220);
//! ```

#[allow(clippy::module_inception)]
pub mod flight;
pub mod generator;
pub mod schedule;

pub use flight::*;
pub use generator::*;
pub use schedule::*;
