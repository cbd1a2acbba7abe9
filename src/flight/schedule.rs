//! Flight schedule input
//!
//! A schedule is an ordered list of [`FlightRecord`]s. It is either read from
//! a JSON array or synthesised from hourly Poisson departure counts. The
//! earliest departure defines simulated time zero.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::distributions::{Distribution, WeightedIndex};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::engine::sampling;
use crate::simulation::{SimulationError, SimulationResult};
use crate::types::ScheduleParameters;

const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"];

/// One row of the departure schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightRecord {
    /// Published departure time
    #[serde(serialize_with = "serialize_timestamp", deserialize_with = "deserialize_timestamp")]
    pub scheduled_time: NaiveDateTime,
    /// Flight number
    pub flight: String,
    /// Destination, e.g. `"Barcelona (BCN)"`
    pub destination: String,
    /// Aircraft type code
    pub aircraft: String,
    /// Operating airline
    pub airline: String,
}

fn serialize_timestamp<S: Serializer>(time: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&time.format("%Y-%m-%dT%H:%M:%S").to_string())
}

fn deserialize_timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw)))
}

/// Parse a schedule timestamp in ISO (`T`) or space-separated form
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw.trim(), format).ok())
}

/// A schedule row placed on the simulated timeline
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledFlight {
    /// Minutes after the base time
    pub offset: f64,
    /// The schedule row
    pub record: FlightRecord,
}

/// Departure schedule sorted by scheduled time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlightSchedule {
    records: Vec<FlightRecord>,
    base_time: Option<NaiveDateTime>,
}

impl FlightSchedule {
    /// Build a schedule, sorting rows by scheduled time
    ///
    /// Rows without a flight number are dropped with a warning. The sort is
    /// stable, so rows sharing a timestamp keep their input order.
    pub fn new(records: Vec<FlightRecord>) -> Self {
        let mut records: Vec<FlightRecord> = records
            .into_iter()
            .filter(|record| {
                let valid = !record.flight.trim().is_empty();
                if !valid {
                    warn!(destination = %record.destination, "Skipping schedule row without flight number");
                }
                valid
            })
            .collect();
        records.sort_by_key(|record| record.scheduled_time);
        Self { records, base_time: None }
    }

    /// Load a JSON array of flight records
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> SimulationResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SimulationError::schedule_error(format!(
                "schedule file not found: {}",
                path.display()
            )));
        }
        let content = fs::read_to_string(path)?;
        let records: Vec<FlightRecord> = serde_json::from_str(&content).map_err(|e| {
            SimulationError::schedule_error(format!("{}: {}", path.display(), e))
        })?;
        info!(path = %path.display(), flights = records.len(), "Loaded flight schedule");
        Ok(Self::new(records))
    }

    /// Write the schedule as a JSON array
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> SimulationResult<()> {
        fs::write(path, serde_json::to_string_pretty(&self.records)?)?;
        Ok(())
    }

    /// Use an explicit base time instead of the earliest departure
    pub fn with_base_time(mut self, base: NaiveDateTime) -> Self {
        self.base_time = Some(base);
        self
    }

    /// Time that maps to simulated minute zero
    pub fn base_time(&self) -> Option<NaiveDateTime> {
        self.base_time.or_else(|| self.records.first().map(|record| record.scheduled_time))
    }

    /// Rows in scheduled order
    pub fn records(&self) -> &[FlightRecord] {
        &self.records
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the schedule has no rows
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows with their offset from the base time; rows before the base are skipped
    pub fn timeline(&self) -> Vec<ScheduledFlight> {
        let Some(base) = self.base_time() else {
            return Vec::new();
        };
        self.records
            .iter()
            .filter_map(|record| {
                let offset = (record.scheduled_time - base).num_seconds() as f64 / 60.0;
                if offset < 0.0 {
                    debug!(flight = %record.flight, offset, "Skipping flight before base time");
                    return None;
                }
                Some(ScheduledFlight { offset, record: record.clone() })
            })
            .collect()
    }
}

/// Aircraft mix of the synthetic schedule
pub const AIRCRAFT_MIX: &[(&str, f64)] = &[
    ("B738", 0.224),
    ("A320", 0.181),
    ("CRJX", 0.134),
    ("A20N", 0.130),
    ("A321", 0.122),
    ("B38M", 0.051),
    ("A21N", 0.051),
    ("A319", 0.024),
    ("B789", 0.012),
    ("ATZ", 0.071),
];

/// Schengen destinations of the synthetic schedule with their weight
pub const SCHENGEN_DESTINATIONS: &[(&str, f64)] = &[
    ("Barcelona (BCN)", 0.28),
    ("Palma de Mallorca (PMI)", 0.09),
    ("Frankfurt (FRA)", 0.08),
    ("Paris (CDG)", 0.16),
    ("Amsterdam (AMS)", 0.04),
    ("Malaga (AGP)", 0.15),
    ("Brussels (BRU)", 0.06),
    ("Lisbon (LIS)", 0.09),
    ("Vienna (VIE)", 0.05),
];

/// Non-Schengen destinations of the synthetic schedule, drawn uniformly
pub const NON_SCHENGEN_DESTINATIONS: &[&str] = &[
    "London (LHR)",
    "New York (JFK)",
    "Mexico City (MEX)",
    "Bogota (BOG)",
    "Buenos Aires (EZE)",
    "Lima (LIM)",
    "Miami (MIA)",
    "Casablanca (CMN)",
];

/// Airlines other than the distinguished carrier, with their flight number prefix
pub const OTHER_AIRLINES: &[(&str, &str)] = &[
    ("Air Europa", "UX"),
    ("Vueling", "VY"),
    ("British Airways", "BA"),
    ("Iberia Express", "I2"),
    ("Ryanair", "FR"),
];

/// Synthesises a day of departures
#[derive(Debug, Clone)]
pub struct ScheduleGenerator {
    params: ScheduleParameters,
    carrier: String,
    rng: ChaCha8Rng,
}

impl ScheduleGenerator {
    /// Create a generator; the schedule has its own random stream
    pub fn new(params: ScheduleParameters, carrier: impl Into<String>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self { params, carrier: carrier.into(), rng }
    }

    /// Mean departures in the given hour
    pub fn hourly_rate(&self, hour: u32) -> f64 {
        let multiplier = if self.params.peak_hours.contains(&hour) {
            self.params.peak_multiplier
        } else {
            self.params.off_peak_multiplier
        };
        self.params.flights_per_hour * multiplier
    }

    /// Generate the departures of one day
    pub fn generate(&mut self, date: NaiveDate) -> SimulationResult<FlightSchedule> {
        let aircraft = WeightedIndex::new(AIRCRAFT_MIX.iter().map(|(_, w)| *w))
            .map_err(|e| SimulationError::schedule_error(format!("aircraft mix: {}", e)))?;
        let destinations = WeightedIndex::new(SCHENGEN_DESTINATIONS.iter().map(|(_, w)| *w))
            .map_err(|e| SimulationError::schedule_error(format!("destination mix: {}", e)))?;
        let midnight = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| SimulationError::schedule_error("invalid schedule date"))?;

        let carrier_prefix = carrier_prefix(&self.carrier);
        let mut records = Vec::new();
        for hour in 0..24u32 {
            let rate = self.hourly_rate(hour);
            let count = sampling::poisson(&mut self.rng, rate);
            for _ in 0..count {
                let minute: i64 = self.rng.gen_range(0..60);
                let scheduled_time = midnight + Duration::minutes(hour as i64 * 60 + minute);

                let (airline, prefix) = if sampling::bernoulli(&mut self.rng, self.params.carrier_share) {
                    (self.carrier.clone(), carrier_prefix.clone())
                } else {
                    let (name, prefix) = OTHER_AIRLINES[self.rng.gen_range(0..OTHER_AIRLINES.len())];
                    (name.to_string(), prefix.to_string())
                };
                let destination = if sampling::bernoulli(&mut self.rng, self.params.schengen_share) {
                    SCHENGEN_DESTINATIONS[destinations.sample(&mut self.rng)].0
                } else {
                    NON_SCHENGEN_DESTINATIONS[self.rng.gen_range(0..NON_SCHENGEN_DESTINATIONS.len())]
                };

                records.push(FlightRecord {
                    scheduled_time,
                    flight: format!("{}{}", prefix, 1000 + records.len()),
                    destination: destination.to_string(),
                    aircraft: AIRCRAFT_MIX[aircraft.sample(&mut self.rng)].0.to_string(),
                    airline,
                });
            }
        }

        info!(%date, flights = records.len(), "Generated synthetic schedule");
        Ok(FlightSchedule::new(records))
    }
}

fn carrier_prefix(carrier: &str) -> String {
    let prefix: String = carrier.chars().filter(|c| c.is_ascii_alphabetic()).take(2).collect();
    prefix.to_ascii_uppercase()
}
