//! Core types and identifiers for the departure simulation
//!
//! This module contains fundamental types, identifiers, static reference tables
//! and configuration structures used throughout the simulation.
//!
//! # Overview
//!
//! - **Identifiers**: run-local passenger ids, flight keys and passenger addresses
//! - **Enums**: passenger and flight state machines, station kinds, outcomes
//! - **Tables**: aircraft capacities, wide-body types, Schengen airports, airline delays
//! - **Configuration**: run parameters with validation and CLI support
//!
//! # Usage Example
//!
//! ```rust
//! use airport_departure_sim::types::*;
//!
//! let mut ids = IdSequence::new();
//! let first = ids.next_passenger();
//! assert_eq!(first, PassengerId(1));
//!
//! let config = SimulationConfig {
//!     security_lanes: 20,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! assert!(is_schengen_airport(airport_code("Paris (CDG)")));
//! ```

pub mod config;
pub mod enums;
pub mod identifiers;
pub mod tables;

// Re-export all public types for convenience
pub use config::*;
pub use enums::*;
pub use identifiers::*;
pub use tables::*;
