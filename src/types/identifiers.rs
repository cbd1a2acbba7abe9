//! Identifier types for the departure simulation
//!
//! Passengers and flights are addressed by dense, run-local sequence numbers so
//! that two runs with the same seed produce identical identifiers. Each run
//! also carries a random [`RunId`] used to tag logs and report envelopes.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a passenger within one simulation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PassengerId(pub u64);

impl fmt::Display for PassengerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PAX_{:06}", self.0)
    }
}

/// Run-unique key of a flight, assigned when its schedule row is consumed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlightKey(pub u32);

impl FlightKey {
    /// Position of the flight in schedule order
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for FlightKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FLT_{:04}", self.0)
    }
}

/// Address of a passenger inside the flight that owns it
///
/// Flights own their passengers; everything else refers to a passenger through
/// this key, never through a pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PassengerKey {
    /// Owning flight
    pub flight: FlightKey,
    /// Slot in the flight's passenger list
    pub slot: u32,
}

impl PassengerKey {
    /// Create a key for the given flight slot
    pub fn new(flight: FlightKey, slot: usize) -> Self {
        Self { flight, slot: slot as u32 }
    }
}

impl fmt::Display for PassengerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.flight, self.slot)
    }
}

/// Monotonic id generator owned by a single simulation run
#[derive(Debug, Clone, Default)]
pub struct IdSequence {
    last: u64,
}

impl IdSequence {
    /// Create a sequence whose first id is 1
    pub fn new() -> Self {
        Self::default()
    }

    /// Next passenger id
    pub fn next_passenger(&mut self) -> PassengerId {
        self.last += 1;
        PassengerId(self.last)
    }

    /// Number of ids handed out so far
    pub fn issued(&self) -> u64 {
        self.last
    }
}

/// Random identifier of a simulation run (logs and report envelopes only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Create a new random run ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RUN_{}", self.0.simple())
    }
}

impl Serialize for RunId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("RUN_{}", self.0.simple()))
    }
}

impl<'de> Deserialize<'de> for RunId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let raw = s.strip_prefix("RUN_").unwrap_or(&s);
        let uuid = Uuid::parse_str(raw).map_err(serde::de::Error::custom)?;
        Ok(RunId(uuid))
    }
}
