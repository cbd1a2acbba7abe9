//! Passenger modeling and routing
//!
//! This module contains the passenger entity, the behavioural rates its traits
//! are drawn from, and the run-scoped factory that creates passengers for a
//! flight.
//!
//! # Overview
//!
//! - **Passenger**: traits, pipeline state, write-once station timings
//! - **BehaviorRates / Traits**: independent Bernoulli draws plus a Poisson bag count
//! - **PassengerFactory**: owns the id sequence of one run
//!
//! Routing predicates are evaluated fresh at each station entry:
//!
//! ```rust
//! use airport_departure_sim::passenger::*;
//! use airport_departure_sim::types::*;
//!
//! let traits = Traits { online_checkin: true, carry_on_only: true, ..Traits::default() };
//! let passenger = Passenger::new(PassengerId(1), PassengerKey::new(FlightKey(0), 0), traits);
//!
//! assert!(!passenger.needs_checkin());
//! assert!(passenger.needs_security());
//! assert!(passenger.needs_passport_control(false));
//! ```

pub mod behavior;
pub mod generator;
#[allow(clippy::module_inception)]
pub mod passenger;

pub use behavior::*;
pub use generator::*;
pub use passenger::*;
