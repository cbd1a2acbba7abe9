//! Statistics collection and the run summary
//!
//! The collector receives three kinds of observation: one terminal record per
//! passenger, one record per flight when its passengers are generated, and a
//! periodic sample of every station's queue length and utilization. The
//! summary reduces them together with the stations' per-call series. Empty
//! series reduce to zero rather than failing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::flight::Flight;
use crate::passenger::Passenger;
use crate::simulation::monitor::MonitorSample;
use crate::simulation::{SimulationError, SimulationResult};
use crate::stations::Stations;
use crate::types::{FlightKey, PassengerId, PassengerKey, PassengerOutcome, StationKind};

/// Terminal observation of one passenger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassengerRecord {
    /// Passenger id
    pub id: PassengerId,
    /// Flight slot
    pub key: PassengerKey,
    /// Priority status
    pub priority: bool,
    /// Checked bags
    pub bags: u32,
    /// Redirected to fast track
    pub jockeyed: bool,
    /// How the passenger left the pipeline
    #[serde(flatten)]
    pub outcome: PassengerOutcome,
    /// Terminal entry time
    pub arrival_time: Option<f64>,
    /// Pipeline exit time
    pub completed_at: Option<f64>,
    /// Queue wait per completed station
    pub waits: BTreeMap<StationKind, f64>,
    /// Service time per completed station
    pub services: BTreeMap<StationKind, f64>,
}

impl PassengerRecord {
    /// Snapshot a passenger that has reached an outcome
    pub fn from_passenger(passenger: &Passenger) -> SimulationResult<Self> {
        let outcome = passenger.outcome.ok_or_else(|| {
            SimulationError::statistics_error(format!("{} recorded without an outcome", passenger.key))
        })?;
        Ok(Self {
            id: passenger.id,
            key: passenger.key,
            priority: passenger.traits.priority,
            bags: passenger.traits.bags,
            jockeyed: passenger.jockeyed,
            outcome,
            arrival_time: passenger.arrival_time,
            completed_at: passenger.completed_at,
            waits: passenger.timings().map(|(station, t)| (station, t.wait)).collect(),
            services: passenger.timings().map(|(station, t)| (station, t.service)).collect(),
        })
    }

    /// Time in the system
    pub fn total_time(&self) -> Option<f64> {
        Some(self.completed_at? - self.arrival_time?)
    }

    /// Sum of queue waits
    pub fn sum_waits(&self) -> f64 {
        self.waits.values().sum()
    }
}

/// Observation of one flight, taken when its passengers are generated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightObservation {
    /// Run-unique key
    pub key: FlightKey,
    /// Flight number
    pub flight_number: String,
    /// Operating airline
    pub airline: String,
    /// Aircraft type code
    pub aircraft_type: String,
    /// Schengen destination
    pub is_schengen: bool,
    /// Seats
    pub capacity: u32,
    /// Passengers generated
    pub passenger_count: u32,
    /// Sold above capacity
    pub is_overbooked: bool,
    /// Overbooking factor
    pub overbooking_factor: f64,
    /// Load factor drawn
    pub load_factor: f64,
    /// Operational delay in minutes
    pub delay: f64,
}

impl From<&Flight> for FlightObservation {
    fn from(flight: &Flight) -> Self {
        Self {
            key: flight.key,
            flight_number: flight.flight_number.clone(),
            airline: flight.airline.clone(),
            aircraft_type: flight.aircraft_type.clone(),
            is_schengen: flight.is_schengen,
            capacity: flight.capacity,
            passenger_count: flight.passenger_count(),
            is_overbooked: flight.is_overbooked,
            overbooking_factor: flight.overbooking_factor,
            load_factor: flight.load_factor,
            delay: flight.delay,
        }
    }
}

/// Distribution of passenger counts across flights
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PassengerDistribution {
    /// Mean passengers per flight
    pub avg_per_flight: f64,
    /// Smallest flight
    pub min_passengers: u32,
    /// Largest flight
    pub max_passengers: u32,
    /// Population standard deviation
    pub std_dev: f64,
}

/// Reduced statistics of one station
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StationSummary {
    /// Mean queue wait of served passengers
    pub avg_wait: f64,
    /// Longest queue wait
    pub max_wait: f64,
    /// Mean service time
    pub avg_service: f64,
    /// Passengers served
    pub processed: u64,
    /// Passengers that reneged
    pub reneged: u64,
    /// Mean sampled queue length
    pub queue_length: f64,
    /// Longest sampled queue
    pub max_queue: usize,
    /// Mean sampled utilization
    pub avg_utilization: f64,
    /// Sampled queue lengths, aligned with the summary timestamps
    pub queue_lengths: Vec<usize>,
    /// Sampled utilization, aligned with the summary timestamps
    pub utilization: Vec<f64>,
}

/// Station-specific counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StationCounters {
    /// Bags that went through a scanner
    pub bags_processed: u64,
    /// Priority passengers redirected to fast track
    pub security_jockeyed: u64,
    /// Passengers cleared at e-gates
    pub passport_egate: u64,
    /// Passengers cleared at booths
    pub passport_booth: u64,
    /// Priority passengers boarded
    pub priority_boarded: u64,
    /// Boarding pools created
    pub boarding_pools_created: u64,
    /// Boarding pools torn down
    pub boarding_pools_torn_down: u64,
}

/// Summary of one run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    /// Seed of the run, when fixed
    pub seed: Option<u64>,
    /// Horizon in minutes
    pub horizon: f64,
    /// Passengers generated
    pub total_passengers: u64,
    /// Passengers with a terminal observation
    pub processed_passengers: u64,
    /// Passengers that boarded
    pub boarded_passengers: u64,
    /// Passengers that reneged somewhere
    pub reneged_passengers: u64,
    /// Share of processed passengers that reneged, in percent
    pub reneged_percentage: f64,
    /// Passengers that reached the gate too late
    pub missed_flight_passengers: u64,
    /// Passengers still in the system at the horizon
    pub abandoned_passengers: u64,
    /// Passengers force-completed after a fault
    pub faulted_passengers: u64,
    /// Priority passengers among the processed
    pub priority_passengers: u64,
    /// Share of priority passengers, in percent
    pub priority_percentage: f64,
    /// Mean time in the system of passengers that left the pipeline
    pub avg_total_time: f64,
    /// Longest time in the system
    pub max_total_time: f64,
    /// Shortest time in the system
    pub min_total_time: f64,
    /// Mean time in the system of priority passengers
    pub avg_priority_time: f64,
    /// Mean time in the system of regular passengers
    pub avg_regular_time: f64,
    /// Flights whose passengers were generated
    pub total_flights: u64,
    /// Overbooked flights
    pub overbooked_flights: u64,
    /// Share of overbooked flights, in percent
    pub overbooked_percentage: f64,
    /// Mean overbooking factor of overbooked flights (1.0 when none)
    pub avg_overbooking_factor: f64,
    /// Flights with a non-zero delay
    pub delayed_flights: u64,
    /// Mean delay of delayed flights
    pub avg_delay: f64,
    /// Passenger count distribution across flights
    pub passenger_distribution: PassengerDistribution,
    /// Per-station reductions keyed by station key
    pub stations: BTreeMap<String, StationSummary>,
    /// Station-specific counters
    pub counters: StationCounters,
    /// Mean boarding wait of priority passengers
    pub priority_boarding_avg_wait: f64,
    /// Mean boarding wait of regular passengers
    pub regular_boarding_avg_wait: f64,
    /// Regular minus priority boarding wait, zero unless both groups boarded
    pub boarding_time_savings: f64,
    /// Monitor sample times
    pub timestamps: Vec<f64>,
}

impl SimulationSummary {
    /// Reduction of one station, if present
    pub fn station(&self, station: StationKind) -> Option<&StationSummary> {
        self.stations.get(station.key())
    }

    /// Pretty JSON rendering
    pub fn to_json(&self) -> SimulationResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for SimulationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Departure Simulation Summary ===")?;
        writeln!(f, "Flights: {} ({} overbooked, {} delayed)", self.total_flights, self.overbooked_flights, self.delayed_flights)?;
        writeln!(
            f,
            "Passengers: {} generated, {} boarded, {} reneged ({:.1}%), {} missed, {} in system at horizon",
            self.total_passengers,
            self.boarded_passengers,
            self.reneged_passengers,
            self.reneged_percentage,
            self.missed_flight_passengers,
            self.abandoned_passengers
        )?;
        writeln!(
            f,
            "Time in system: avg {:.1} min (priority {:.1}, regular {:.1}), min {:.1}, max {:.1}",
            self.avg_total_time, self.avg_priority_time, self.avg_regular_time, self.min_total_time, self.max_total_time
        )?;
        writeln!(f)?;
        writeln!(f, "{:<10} {:>10} {:>10} {:>10} {:>10} {:>9} {:>8}", "station", "avg wait", "max wait", "avg queue", "max queue", "util %", "reneged")?;
        for station in StationKind::ALL {
            if let Some(s) = self.station(station) {
                writeln!(
                    f,
                    "{:<10} {:>10.2} {:>10.2} {:>10.2} {:>10} {:>9.1} {:>8}",
                    station.key(),
                    s.avg_wait,
                    s.max_wait,
                    s.queue_length,
                    s.max_queue,
                    s.avg_utilization * 100.0,
                    s.reneged
                )?;
            }
        }
        writeln!(f)?;
        write!(
            f,
            "Boarding wait: priority {:.2} min, regular {:.2} min (saves {:.2})",
            self.priority_boarding_avg_wait, self.regular_boarding_avg_wait, self.boarding_time_savings
        )
    }
}

/// Mean of a series, zero when empty
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Largest value of a series, zero when empty
pub fn max_or_zero(values: &[f64]) -> f64 {
    values.iter().copied().reduce(f64::max).unwrap_or(0.0)
}

/// Smallest value of a series, zero when empty
pub fn min_or_zero(values: &[f64]) -> f64 {
    values.iter().copied().reduce(f64::min).unwrap_or(0.0)
}

/// Population standard deviation, zero when empty
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    (values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64).sqrt()
}

fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Accumulates observations over a run
#[derive(Debug, Clone, Default)]
pub struct StatisticsCollector {
    passengers: Vec<PassengerRecord>,
    flights: Vec<FlightObservation>,
    timestamps: Vec<f64>,
    queue_lengths: BTreeMap<StationKind, Vec<usize>>,
    utilization: BTreeMap<StationKind, Vec<f64>>,
}

impl StatisticsCollector {
    /// Create an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a flight once its passengers exist
    pub fn record_flight(&mut self, flight: &Flight) {
        self.flights.push(FlightObservation::from(flight));
    }

    /// Record the terminal observation of a passenger
    pub fn record_passenger(&mut self, passenger: &Passenger) -> SimulationResult<()> {
        self.passengers.push(PassengerRecord::from_passenger(passenger)?);
        Ok(())
    }

    /// Record one monitor sample
    pub fn record_sample(&mut self, sample: &MonitorSample) {
        self.timestamps.push(sample.time);
        for (station, load) in &sample.loads {
            self.queue_lengths.entry(*station).or_default().push(load.queue);
            self.utilization.entry(*station).or_default().push(load.utilization());
        }
    }

    /// Terminal observations in the order they were recorded
    pub fn passengers(&self) -> &[PassengerRecord] {
        &self.passengers
    }

    /// Flight observations in generation order
    pub fn flights(&self) -> &[FlightObservation] {
        &self.flights
    }

    /// Monitor sample times
    pub fn timestamps(&self) -> &[f64] {
        &self.timestamps
    }

    /// Reduce everything into a summary
    pub fn summarize(&self, stations: &Stations, seed: Option<u64>, horizon: f64) -> SimulationSummary {
        let count = |pred: fn(&PassengerOutcome) -> bool| {
            self.passengers.iter().filter(|p| pred(&p.outcome)).count() as u64
        };
        let processed = self.passengers.len() as u64;
        let reneged = count(|o| matches!(o, PassengerOutcome::Reneged { .. }));
        let priority = self.passengers.iter().filter(|p| p.priority).count() as u64;

        let mut total_times = Vec::new();
        let mut priority_times = Vec::new();
        let mut regular_times = Vec::new();
        for record in &self.passengers {
            if matches!(record.outcome, PassengerOutcome::Abandoned | PassengerOutcome::Faulted) {
                continue;
            }
            match record.total_time() {
                Some(time) if time > 0.0 => {
                    total_times.push(time);
                    if record.priority {
                        priority_times.push(time);
                    } else {
                        regular_times.push(time);
                    }
                }
                _ => {}
            }
        }

        let overbooking: Vec<f64> =
            self.flights.iter().filter(|f| f.is_overbooked).map(|f| f.overbooking_factor).collect();
        let delays: Vec<f64> = self.flights.iter().map(|f| f.delay).filter(|d| *d > 0.0).collect();
        let counts: Vec<f64> = self.flights.iter().map(|f| f.passenger_count as f64).collect();

        let boarding = &stations.boarding;
        let priority_boarding_avg_wait = mean(&boarding.priority_waits);
        let regular_boarding_avg_wait = mean(&boarding.regular_waits);
        let boarding_time_savings = if boarding.priority_waits.is_empty() || boarding.regular_waits.is_empty() {
            0.0
        } else {
            regular_boarding_avg_wait - priority_boarding_avg_wait
        };

        SimulationSummary {
            seed,
            horizon,
            total_passengers: self.flights.iter().map(|f| f.passenger_count as u64).sum(),
            processed_passengers: processed,
            boarded_passengers: count(|o| matches!(o, PassengerOutcome::Boarded)),
            reneged_passengers: reneged,
            reneged_percentage: percentage(reneged, processed),
            missed_flight_passengers: count(|o| matches!(o, PassengerOutcome::MissedFlight)),
            abandoned_passengers: count(|o| matches!(o, PassengerOutcome::Abandoned)),
            faulted_passengers: count(|o| matches!(o, PassengerOutcome::Faulted)),
            priority_passengers: priority,
            priority_percentage: percentage(priority, processed),
            avg_total_time: mean(&total_times),
            max_total_time: max_or_zero(&total_times),
            min_total_time: min_or_zero(&total_times),
            avg_priority_time: mean(&priority_times),
            avg_regular_time: mean(&regular_times),
            total_flights: self.flights.len() as u64,
            overbooked_flights: overbooking.len() as u64,
            overbooked_percentage: percentage(overbooking.len() as u64, self.flights.len() as u64),
            avg_overbooking_factor: if overbooking.is_empty() { 1.0 } else { mean(&overbooking) },
            delayed_flights: delays.len() as u64,
            avg_delay: mean(&delays),
            passenger_distribution: PassengerDistribution {
                avg_per_flight: mean(&counts),
                min_passengers: min_or_zero(&counts) as u32,
                max_passengers: max_or_zero(&counts) as u32,
                std_dev: population_std_dev(&counts),
            },
            stations: StationKind::ALL
                .iter()
                .map(|station| (station.key().to_string(), self.station_summary(stations, *station)))
                .collect(),
            counters: StationCounters {
                bags_processed: stations.baggage.bags_scanned,
                security_jockeyed: stations.security.jockeyed,
                passport_egate: stations.passport.egate_passengers,
                passport_booth: stations.passport.booth_passengers,
                priority_boarded: boarding.priority_boarded,
                boarding_pools_created: boarding.pools_created,
                boarding_pools_torn_down: boarding.pools_torn_down,
            },
            priority_boarding_avg_wait,
            regular_boarding_avg_wait,
            boarding_time_savings,
            timestamps: self.timestamps.clone(),
        }
    }

    fn station_summary(&self, stations: &Stations, station: StationKind) -> StationSummary {
        let stats = stations.stats(station);
        let queue_lengths = self.queue_lengths.get(&station).cloned().unwrap_or_default();
        let utilization = self.utilization.get(&station).cloned().unwrap_or_default();
        let queue_f64: Vec<f64> = queue_lengths.iter().map(|q| *q as f64).collect();

        StationSummary {
            avg_wait: mean(&stats.waits),
            max_wait: max_or_zero(&stats.waits),
            avg_service: mean(&stats.services),
            processed: stats.processed,
            reneged: stats.reneged,
            queue_length: mean(&queue_f64),
            max_queue: queue_lengths.iter().copied().max().unwrap_or(0),
            avg_utilization: mean(&utilization),
            queue_lengths,
            utilization,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SimulationConfig;

    #[test]
    fn test_empty_series_reduce_to_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(max_or_zero(&[]), 0.0);
        assert_eq!(min_or_zero(&[]), 0.0);
        assert_eq!(population_std_dev(&[]), 0.0);
        assert_eq!(percentage(3, 0), 0.0);
    }

    #[test]
    fn test_series_helpers() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&values), 5.0);
        assert_eq!(population_std_dev(&values), 2.0);
        assert_eq!(max_or_zero(&values), 9.0);
        assert_eq!(min_or_zero(&values), 2.0);
    }

    #[test]
    fn test_empty_collector_summary() {
        let config = SimulationConfig::default();
        let stations = Stations::new(&config);
        let summary = StatisticsCollector::new().summarize(&stations, Some(1), 60.0);

        assert_eq!(summary.total_passengers, 0);
        assert_eq!(summary.avg_total_time, 0.0);
        assert_eq!(summary.priority_percentage, 0.0);
        assert_eq!(summary.avg_overbooking_factor, 1.0);
        assert_eq!(summary.passenger_distribution, PassengerDistribution::default());
        assert_eq!(summary.boarding_time_savings, 0.0);
        assert_eq!(summary.stations.len(), StationKind::ALL.len());
        let checkin = summary.station(StationKind::CheckIn).unwrap();
        assert_eq!(checkin.avg_wait, 0.0);
        assert_eq!(checkin.max_queue, 0);
        assert!(checkin.utilization.is_empty());
    }

    #[test]
    fn test_summary_serializes_stable_field_names() {
        let config = SimulationConfig::default();
        let summary = StatisticsCollector::new().summarize(&Stations::new(&config), None, 60.0);
        let json: serde_json::Value = serde_json::from_str(&summary.to_json().unwrap()).unwrap();
        for field in [
            "total_passengers",
            "processed_passengers",
            "priority_percentage",
            "avg_total_time",
            "overbooked_percentage",
            "avg_overbooking_factor",
            "passenger_distribution",
            "priority_boarding_avg_wait",
            "regular_boarding_avg_wait",
            "boarding_time_savings",
            "timestamps",
        ] {
            assert!(json.get(field).is_some(), "missing {}", field);
        }
        assert!(json["stations"]["checkin"].get("avg_wait").is_some());
        assert!(json["stations"]["boarding"].get("utilization").is_some());
    }
}
