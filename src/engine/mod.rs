//! Discrete-event engine
//!
//! The engine is domain-agnostic: a clock with an ordered event queue, fixed
//! capacity resource pools, a contest primitive that races a pool request
//! against a renege timer, and the random draws used by the model.
//!
//! # Overview
//!
//! - **Scheduler**: single logical clock; events fire by (time, insertion order)
//! - **ResourcePool**: FIFO or priority-ordered mutual-exclusion counters
//! - **Contest**: acquire-versus-timeout race with late-grant handling
//! - **Sampling**: floored normal, Poisson, Bernoulli and Gamma draws
//!
//! # Usage Example
//!
//! ```rust
//! use airport_departure_sim::engine::*;
//!
//! let mut scheduler: Scheduler<&str> = Scheduler::new();
//! let mut pool = ResourcePool::new("desks", 1);
//!
//! assert!(pool.request(1u32, 0).is_granted());
//! let queued = pool.request(2u32, 0);
//! assert!(!queued.is_granted());
//!
//! scheduler.schedule_in(3.0, "service complete");
//! let (time, _) = scheduler.next_until(60.0).unwrap();
//! assert_eq!(time, 3.0);
//! ```

pub mod race;
pub mod resource;
pub mod sampling;
pub mod scheduler;

// Re-export all public types for convenience
pub use race::*;
pub use resource::*;
pub use scheduler::*;
