//! Static lookup tables
//!
//! Default reference data for aircraft seating, body classification, Schengen
//! membership and airline punctuality. The aircraft table can be overridden
//! through [`SimulationConfig`](super::SimulationConfig); the other tables are
//! fixed reference data.

use super::BodyType;
use std::collections::BTreeMap;

/// Seating capacity used when an aircraft type is not in the table
pub const DEFAULT_AIRCRAFT_CAPACITY: u32 = 180;

/// Carrier that owns a dedicated bank of check-in desks
pub const DISTINGUISHED_CARRIER: &str = "Iberia";

/// Delay probability for airlines without an entry in [`AIRLINE_DELAY_PROBABILITIES`]
pub const DEFAULT_DELAY_PROBABILITY: f64 = 0.21;

/// Mean delay in minutes for a flight that is delayed
pub const AVERAGE_DELAY_MINUTES: f64 = 27.0;

/// Aircraft type code to seating capacity
pub const AIRCRAFT_CAPACITY: &[(&str, u32)] = &[
    ("A319", 141),
    ("A320", 180),
    ("A321", 220),
    ("A20N", 180),
    ("A21N", 220),
    ("B738", 189),
    ("B38M", 189),
    ("B788", 330),
    ("B789", 360),
    ("B77L", 300),
    ("CRJX", 90),
    ("ATZ", 70),
    ("ATF", 50),
    ("E290", 114),
    ("A332", 330),
];

/// Twin-aisle aircraft types
pub const WIDE_BODY_TYPES: &[&str] = &["B788", "B789", "B77L", "A332"];

/// Schengen airport codes and their country
pub const SCHENGEN_AIRPORTS: &[(&str, &str)] = &[
    ("VIE", "Austria"),
    ("GRZ", "Austria"),
    ("INN", "Austria"),
    ("SZG", "Austria"),
    ("BRU", "Belgium"),
    ("CRL", "Belgium"),
    ("ANR", "Belgium"),
    ("CDG", "France"),
    ("ORY", "France"),
    ("NCE", "France"),
    ("LYS", "France"),
    ("FRA", "Germany"),
    ("MUC", "Germany"),
    ("DUS", "Germany"),
    ("TXL", "Germany"),
    ("FCO", "Italy"),
    ("MXP", "Italy"),
    ("LIN", "Italy"),
    ("VCE", "Italy"),
    ("MAD", "Spain"),
    ("BCN", "Spain"),
    ("AGP", "Spain"),
    ("PMI", "Spain"),
    ("AMS", "Netherlands"),
    ("LIS", "Portugal"),
];

/// Probability that a departure of the given airline is delayed
pub const AIRLINE_DELAY_PROBABILITIES: &[(&str, f64)] = &[
    ("Iberia", 0.16),
    ("Vueling", 0.15),
    ("British Airways", 0.24),
];

/// Default aircraft capacity table as an owned map
pub fn default_aircraft_capacities() -> BTreeMap<String, u32> {
    AIRCRAFT_CAPACITY.iter().map(|(code, seats)| (code.to_string(), *seats)).collect()
}

/// Body class of an aircraft type code
pub fn body_type(aircraft_type: &str) -> BodyType {
    if WIDE_BODY_TYPES.contains(&aircraft_type) {
        BodyType::WideBody
    } else {
        BodyType::NarrowBody
    }
}

/// Whether an airport code belongs to the Schengen area
pub fn is_schengen_airport(code: &str) -> bool {
    SCHENGEN_AIRPORTS.iter().any(|(airport, _)| *airport == code)
}

/// Delay probability for an airline, falling back to the default
pub fn delay_probability(airline: &str) -> f64 {
    AIRLINE_DELAY_PROBABILITIES
        .iter()
        .find(|(name, _)| *name == airline)
        .map(|(_, p)| *p)
        .unwrap_or(DEFAULT_DELAY_PROBABILITY)
}

/// Extract the airport code from a destination such as `"Barcelona (BCN)"`
///
/// A destination without parentheses is treated as a bare code.
pub fn airport_code(destination: &str) -> &str {
    let tail = destination.rsplit('(').next().unwrap_or(destination);
    tail.trim().trim_end_matches(')').trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_airport_code_extraction() {
        assert_eq!(airport_code("Barcelona (BCN)"), "BCN");
        assert_eq!(airport_code("London Heathrow (LHR)"), "LHR");
        assert_eq!(airport_code("BCN"), "BCN");
        assert_eq!(airport_code("Weird (Name) (FRA)"), "FRA");
    }

    #[test]
    fn test_schengen_membership() {
        assert!(is_schengen_airport("BCN"));
        assert!(is_schengen_airport("CDG"));
        assert!(!is_schengen_airport("LHR"));
        assert!(!is_schengen_airport("JFK"));
    }

    #[test]
    fn test_body_type_lookup() {
        assert_eq!(body_type("B789"), BodyType::WideBody);
        assert_eq!(body_type("A332"), BodyType::WideBody);
        assert_eq!(body_type("A320"), BodyType::NarrowBody);
        assert_eq!(body_type("UNKNOWN"), BodyType::NarrowBody);
    }

    #[test]
    fn test_delay_probability_fallback() {
        assert_eq!(delay_probability("Iberia"), 0.16);
        assert_eq!(delay_probability("British Airways"), 0.24);
        assert_eq!(delay_probability("Ryanair"), DEFAULT_DELAY_PROBABILITY);
    }

    #[test]
    fn test_default_capacity_table() {
        let table = default_aircraft_capacities();
        assert_eq!(table.len(), AIRCRAFT_CAPACITY.len());
        assert_eq!(table.get("A319"), Some(&141));
        assert_eq!(table.get("B789"), Some(&360));
    }
}
