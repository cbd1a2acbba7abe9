//! Enumeration types for the departure simulation
//!
//! This module contains the state machines and classification enums shared by
//! the entities, stations and statistics collector.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stage of a passenger in the departure process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PassengerState {
    /// Generated by its flight, not yet in the terminal
    Created,
    /// Entered the terminal
    ArrivedAtAirport,
    /// Queued for a check-in desk
    WaitingForCheckIn,
    /// Being served at a check-in desk
    CheckingIn,
    /// Queued for a baggage scanner
    WaitingForBaggageScan,
    /// Bags being scanned
    BaggageScan,
    /// Queued for a security lane
    WaitingForSecurity,
    /// Being screened
    SecurityScreening,
    /// Queued for an e-gate or booth
    WaitingForPassport,
    /// Passport being checked
    PassportControl,
    /// Airside, waiting for the gate to open
    WaitingAtGate,
    /// Queued for a boarding agent
    WaitingToBoard,
    /// Boarding pass being scanned
    Boarding,
    /// On the aircraft
    Boarded,
    /// Gave up waiting in a queue
    Reneged,
    /// Reached the gate after departure
    MissedFlight,
    /// Force-completed after an unexpected fault
    Faulted,
}

impl PassengerState {
    /// Whether the passenger has left the pipeline for good
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            PassengerState::Boarded
                | PassengerState::Reneged
                | PassengerState::MissedFlight
                | PassengerState::Faulted
        )
    }
}

impl fmt::Display for PassengerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PassengerState::Created => "Created",
            PassengerState::ArrivedAtAirport => "Arrived At Airport",
            PassengerState::WaitingForCheckIn => "Waiting For Check-In",
            PassengerState::CheckingIn => "Checking In",
            PassengerState::WaitingForBaggageScan => "Waiting For Baggage Scan",
            PassengerState::BaggageScan => "Baggage Scan",
            PassengerState::WaitingForSecurity => "Waiting For Security",
            PassengerState::SecurityScreening => "Security Screening",
            PassengerState::WaitingForPassport => "Waiting For Passport",
            PassengerState::PassportControl => "Passport Control",
            PassengerState::WaitingAtGate => "Waiting At Gate",
            PassengerState::WaitingToBoard => "Waiting To Board",
            PassengerState::Boarding => "Boarding",
            PassengerState::Boarded => "Boarded",
            PassengerState::Reneged => "Reneged",
            PassengerState::MissedFlight => "Missed Flight",
            PassengerState::Faulted => "Faulted",
        };
        write!(f, "{}", label)
    }
}

/// Gate state of a flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlightStatus {
    /// Gate not yet open
    Scheduled,
    /// Boarding window open
    Boarding,
    /// Doors closed
    Departed,
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlightStatus::Scheduled => write!(f, "Scheduled"),
            FlightStatus::Boarding => write!(f, "Boarding"),
            FlightStatus::Departed => write!(f, "Departed"),
        }
    }
}

/// Service stations in pipeline order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StationKind {
    /// Check-in desks
    CheckIn,
    /// Separate hold-baggage scanning
    BaggageSecurity,
    /// Security lanes and fast track
    Security,
    /// E-gates and manual booths
    Passport,
    /// Per-flight boarding agents
    Boarding,
}

impl StationKind {
    /// All stations in pipeline order
    pub const ALL: [StationKind; 5] = [
        StationKind::CheckIn,
        StationKind::BaggageSecurity,
        StationKind::Security,
        StationKind::Passport,
        StationKind::Boarding,
    ];

    /// Stable key used in summaries
    pub fn key(self) -> &'static str {
        match self {
            StationKind::CheckIn => "checkin",
            StationKind::BaggageSecurity => "baggage",
            StationKind::Security => "security",
            StationKind::Passport => "passport",
            StationKind::Boarding => "boarding",
        }
    }
}

impl fmt::Display for StationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StationKind::CheckIn => write!(f, "Check-In"),
            StationKind::BaggageSecurity => write!(f, "Baggage Security"),
            StationKind::Security => write!(f, "Security Screening"),
            StationKind::Passport => write!(f, "Passport Control"),
            StationKind::Boarding => write!(f, "Boarding"),
        }
    }
}

/// Terminal observation recorded once per passenger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PassengerOutcome {
    /// Boarded the aircraft
    Boarded,
    /// Abandoned a queue at the given station
    Reneged {
        /// Station where the passenger gave up
        station: StationKind,
    },
    /// Reached the gate after departure
    MissedFlight,
    /// Still in the system when the horizon was reached
    Abandoned,
    /// Force-completed after an unexpected fault
    Faulted,
}

impl fmt::Display for PassengerOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassengerOutcome::Boarded => write!(f, "Boarded"),
            PassengerOutcome::Reneged { station } => write!(f, "Reneged at {}", station),
            PassengerOutcome::MissedFlight => write!(f, "Missed Flight"),
            PassengerOutcome::Abandoned => write!(f, "Abandoned at horizon"),
            PassengerOutcome::Faulted => write!(f, "Faulted"),
        }
    }
}

/// Where hold baggage is scanned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BaggageScreening {
    /// Dedicated scanning station between check-in and security
    #[default]
    Separate,
    /// Scanner acquired inside security, after personal screening
    Inline,
}

impl fmt::Display for BaggageScreening {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaggageScreening::Separate => write!(f, "separate"),
            BaggageScreening::Inline => write!(f, "inline"),
        }
    }
}

impl FromStr for BaggageScreening {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "separate" | "station" => Ok(BaggageScreening::Separate),
            "inline" => Ok(BaggageScreening::Inline),
            _ => Err(format!("Unknown baggage screening mode: {}", s)),
        }
    }
}

/// Aircraft body class, which drives the boarding window length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyType {
    /// Single-aisle aircraft
    NarrowBody,
    /// Twin-aisle aircraft
    WideBody,
}

impl fmt::Display for BodyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodyType::NarrowBody => write!(f, "Narrow-body"),
            BodyType::WideBody => write!(f, "Wide-body"),
        }
    }
}
