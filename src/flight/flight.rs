//! Flight entity and gate state machine

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::flight::FlightRecord;
use crate::passenger::Passenger;
use crate::simulation::{SimulationError, SimulationResult};
use crate::types::{
    airport_code, body_type, is_schengen_airport, BodyType, FlightKey, FlightStatus,
    PassengerKey, SimulationConfig,
};

/// A departing flight and the passengers it owns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flight {
    /// Run-unique key
    pub key: FlightKey,
    /// Flight number as published
    pub flight_number: String,
    /// Operating airline
    pub airline: String,
    /// Destination as published, e.g. `"Barcelona (BCN)"`
    pub destination: String,
    /// Destination airport code
    pub airport_code: String,
    /// Published departure time
    pub scheduled_time: NaiveDateTime,
    /// Aircraft type code
    pub aircraft_type: String,
    /// Seats on the aircraft
    pub capacity: u32,
    /// Whether the aircraft type was found in the capacity table
    pub capacity_known: bool,
    /// Body class of the aircraft
    pub body_type: BodyType,
    /// Destination in the Schengen area (no passport control)
    pub is_schengen: bool,
    /// Gate state
    pub status: FlightStatus,
    /// Sold above capacity
    pub is_overbooked: bool,
    /// Target passengers over capacity, 1.0 when not overbooked
    pub overbooking_factor: f64,
    /// Load factor drawn for this departure
    pub load_factor: f64,
    /// Operational delay in minutes
    pub delay: f64,
    /// Simulated time the flight's passengers arrive at the terminal
    pub arrival_time: f64,
    /// Simulated time the gate opens
    pub boarding_opens: f64,
    /// Simulated time the doors close
    pub departure_time: f64,
    /// Passengers booked on the flight
    pub passengers: Vec<Passenger>,
    /// Passengers on board
    pub boarded: u32,
}

impl Flight {
    /// Build a flight from a schedule row
    ///
    /// Unknown aircraft types fall back to the configured default capacity.
    pub fn from_record(key: FlightKey, record: &FlightRecord, config: &SimulationConfig) -> Self {
        let code = airport_code(&record.destination).to_string();
        let (capacity, capacity_known) = match config.aircraft_capacity(&record.aircraft) {
            Some(seats) => (seats, true),
            None => {
                warn!(
                    flight = %record.flight,
                    aircraft = %record.aircraft,
                    fallback = config.default_aircraft_capacity,
                    "Unknown aircraft type, using default capacity"
                );
                (config.default_aircraft_capacity, false)
            }
        };

        Self {
            key,
            flight_number: record.flight.clone(),
            airline: record.airline.clone(),
            destination: record.destination.clone(),
            is_schengen: is_schengen_airport(&code),
            airport_code: code,
            scheduled_time: record.scheduled_time,
            aircraft_type: record.aircraft.clone(),
            capacity,
            capacity_known,
            body_type: body_type(&record.aircraft),
            status: FlightStatus::Scheduled,
            is_overbooked: false,
            overbooking_factor: 1.0,
            load_factor: 0.0,
            delay: 0.0,
            arrival_time: 0.0,
            boarding_opens: 0.0,
            departure_time: 0.0,
            passengers: Vec::new(),
            boarded: 0,
        }
    }

    /// Place the flight on the simulated timeline
    ///
    /// Passengers arrive at `arrival_time`; the gate opens the configured
    /// offset before the (possibly delayed) departure and stays open for the
    /// body-type boarding window.
    pub fn set_timeline(&mut self, arrival_time: f64, delay: f64, config: &SimulationConfig) {
        let params = &config.flights;
        let window = match self.body_type {
            BodyType::WideBody => params.wide_body_boarding,
            BodyType::NarrowBody => params.narrow_body_boarding,
        };
        self.arrival_time = arrival_time;
        self.delay = delay.max(0.0);
        self.boarding_opens =
            (arrival_time + params.passenger_lead_time + self.delay - params.boarding_open_offset)
                .max(arrival_time);
        self.departure_time = self.boarding_opens + window;
    }

    /// Open the gate
    pub fn open_boarding(&mut self) -> SimulationResult<()> {
        match self.status {
            FlightStatus::Scheduled => {
                self.status = FlightStatus::Boarding;
                Ok(())
            }
            other => Err(SimulationError::schedule_error(format!(
                "{} ({}) cannot open boarding while {}",
                self.flight_number, self.key, other
            ))),
        }
    }

    /// Close the doors
    pub fn depart(&mut self) -> SimulationResult<()> {
        match self.status {
            FlightStatus::Boarding => {
                self.status = FlightStatus::Departed;
                Ok(())
            }
            other => Err(SimulationError::schedule_error(format!(
                "{} ({}) cannot depart while {}",
                self.flight_number, self.key, other
            ))),
        }
    }

    /// Passengers booked
    pub fn passenger_count(&self) -> u32 {
        self.passengers.len() as u32
    }

    /// Look up a passenger of this flight
    pub fn passenger(&self, key: PassengerKey) -> SimulationResult<&Passenger> {
        self.passengers
            .get(key.slot as usize)
            .filter(|_| key.flight == self.key)
            .ok_or_else(|| SimulationError::passenger_fault(key, "not booked on this flight"))
    }

    /// Look up a passenger of this flight mutably
    pub fn passenger_mut(&mut self, key: PassengerKey) -> SimulationResult<&mut Passenger> {
        if key.flight != self.key {
            return Err(SimulationError::passenger_fault(key, "not booked on this flight"));
        }
        self.passengers
            .get_mut(key.slot as usize)
            .ok_or_else(|| SimulationError::passenger_fault(key, "not booked on this flight"))
    }

    /// Passengers that have not reached a terminal state
    pub fn outstanding(&self) -> usize {
        self.passengers.iter().filter(|p| !p.is_terminal()).count()
    }

    /// Departed with every passenger accounted for
    pub fn is_complete(&self) -> bool {
        self.status == FlightStatus::Departed && self.outstanding() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passenger::Traits;
    use crate::types::{PassengerId, PassengerOutcome};

    fn record(destination: &str, aircraft: &str) -> FlightRecord {
        FlightRecord {
            scheduled_time: NaiveDateTime::parse_from_str("2024-06-03 08:30:00", "%Y-%m-%d %H:%M:%S")
                .unwrap(),
            flight: "IB3100".to_string(),
            destination: destination.to_string(),
            aircraft: aircraft.to_string(),
            airline: "Iberia".to_string(),
        }
    }

    #[test]
    fn test_from_record_resolves_tables() {
        let config = SimulationConfig::default();
        let flight = Flight::from_record(FlightKey(0), &record("Paris (CDG)", "B789"), &config);
        assert_eq!(flight.airport_code, "CDG");
        assert!(flight.is_schengen);
        assert_eq!(flight.capacity, 360);
        assert!(flight.capacity_known);
        assert_eq!(flight.body_type, BodyType::WideBody);
        assert_eq!(flight.status, FlightStatus::Scheduled);

        let flight = Flight::from_record(FlightKey(1), &record("London (LHR)", "X999"), &config);
        assert!(!flight.is_schengen);
        assert_eq!(flight.capacity, config.default_aircraft_capacity);
        assert!(!flight.capacity_known);
    }

    #[test]
    fn test_timeline_depends_on_body_type() {
        let config = SimulationConfig::default();
        let mut narrow = Flight::from_record(FlightKey(0), &record("Lisbon (LIS)", "A320"), &config);
        narrow.set_timeline(10.0, 0.0, &config);
        assert_eq!(narrow.boarding_opens, 100.0);
        assert_eq!(narrow.departure_time, 125.0);

        let mut wide = Flight::from_record(FlightKey(1), &record("Bogota (BOG)", "A332"), &config);
        wide.set_timeline(10.0, 15.0, &config);
        assert_eq!(wide.boarding_opens, 115.0);
        assert_eq!(wide.departure_time, 160.0);
    }

    #[test]
    fn test_status_machine() {
        let config = SimulationConfig::default();
        let mut flight = Flight::from_record(FlightKey(0), &record("Madrid (MAD)", "A320"), &config);
        assert!(flight.depart().is_err());
        flight.open_boarding().unwrap();
        assert!(flight.open_boarding().is_err());
        flight.depart().unwrap();
        assert_eq!(flight.status, FlightStatus::Departed);
    }

    #[test]
    fn test_completion_tracks_outstanding_passengers() {
        let config = SimulationConfig::default();
        let mut flight = Flight::from_record(FlightKey(3), &record("Madrid (MAD)", "A320"), &config);
        for slot in 0..2 {
            flight.passengers.push(Passenger::new(
                PassengerId(slot as u64 + 1),
                PassengerKey::new(FlightKey(3), slot),
                Traits::default(),
            ));
        }
        flight.open_boarding().unwrap();
        flight.depart().unwrap();
        assert_eq!(flight.outstanding(), 2);
        assert!(!flight.is_complete());

        for slot in 0..2 {
            let key = PassengerKey::new(FlightKey(3), slot);
            flight.passenger_mut(key).unwrap().finish(PassengerOutcome::MissedFlight, 200.0).unwrap();
        }
        assert!(flight.is_complete());
        assert!(flight.passenger(PassengerKey::new(FlightKey(4), 0)).is_err());
        assert!(flight.passenger(PassengerKey::new(FlightKey(3), 9)).is_err());
    }
}
