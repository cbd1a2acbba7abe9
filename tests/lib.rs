// Integration tests test your crate's public API. They only have access to items
// in your crate that are marked pub. See the Cargo Targets page of the Cargo Book
// for more information.
//
//   https://doc.rust-lang.org/cargo/reference/cargo-targets.html#integration-tests
//

use airport_departure_sim::*;

// Engine and routing
mod engine_ordering_tests;

mod simulation_property_tests;

#[test]
fn test_core_id_types() {
    let flight = FlightKey(4);
    let passenger = PassengerKey::new(flight, 12);

    assert_eq!(passenger.flight, flight);
    assert_eq!(passenger.slot, 12);
    assert_ne!(passenger, PassengerKey::new(flight, 13));
    assert!(PassengerKey::new(FlightKey(3), 99) < passenger);

    assert!(!flight.to_string().is_empty());
    assert!(!passenger.to_string().is_empty());
    assert!(!PassengerId(7).to_string().is_empty());
}

#[test]
fn test_enum_types() {
    for station in StationKind::ALL {
        assert!(!station.to_string().is_empty());
        assert!(!station.key().is_empty());
    }

    let outcomes = [
        PassengerOutcome::Boarded,
        PassengerOutcome::Reneged { station: StationKind::Security },
        PassengerOutcome::MissedFlight,
        PassengerOutcome::Abandoned,
        PassengerOutcome::Faulted,
    ];
    for outcome in &outcomes {
        assert!(!outcome.to_string().is_empty());
    }

    assert_eq!("inline".parse::<BaggageScreening>().unwrap(), BaggageScreening::Inline);
    assert_eq!(BaggageScreening::default(), BaggageScreening::Separate);
}

#[test]
fn test_serialization_roundtrip() {
    let key = PassengerKey::new(FlightKey(1), 2);
    let json = serde_json::to_string(&key).unwrap();
    let deserialized: PassengerKey = serde_json::from_str(&json).unwrap();
    assert_eq!(key, deserialized);

    let outcome = PassengerOutcome::Reneged { station: StationKind::Passport };
    let json = serde_json::to_string(&outcome).unwrap();
    assert!(json.contains("reneged"));
    assert!(json.contains("passport"));
    let deserialized: PassengerOutcome = serde_json::from_str(&json).unwrap();
    assert_eq!(outcome, deserialized);
}

#[test]
fn test_default_configuration_is_valid() {
    let config = SimulationConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.general_desks(), 74);

    let invalid = SimulationConfig { carrier_desks: 174, ..Default::default() };
    assert!(matches!(
        invalid.validate(),
        Err(ConfigValidationError::InvalidCarrierDesks { carrier: 174, total: 174 })
    ));
}
