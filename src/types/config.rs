//! Configuration structures for the departure simulation
//!
//! This module contains the run parameters, their validation rules, the
//! command line interface and the partial configuration file format. Values
//! are resolved with the precedence CLI > configuration file > defaults.

use super::tables::{default_aircraft_capacities, DEFAULT_AIRCRAFT_CAPACITY, DISTINGUISHED_CARRIER};
use super::BaggageScreening;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Command line arguments structure
#[derive(Debug, Clone, Parser)]
#[command(
    name = "airport-departure-sim",
    version = "0.1.0",
    about = "Airport Departure Simulator - Discrete-event model of passenger flow through a departure terminal",
    long_about = "Simulates passengers moving through check-in, baggage screening, security, passport control and boarding for a day of departures, and reports queue lengths, waits, utilization and throughput for capacity planning.

EXAMPLES:
    # Run with default settings and a synthetic schedule
    airport-departure-sim

    # Use a configuration file and a flight schedule
    airport-departure-sim --config config.json --schedule flights.json

    # Override specific settings
    airport-departure-sim --security-lanes 20 --online-checkin-rate 0.7

    # Compare the built-in scenarios against the same schedule
    airport-departure-sim --compare-scenarios

    # Generate configuration template
    airport-departure-sim --print-config > my-config.json

    # Validate configuration without running
    airport-departure-sim --config my-config.json --dry-run

CONFIGURATION:
    Configuration can be provided via:
    1. Command line arguments (highest priority)
    2. Configuration file (--config flag)
    3. Default values (lowest priority)

    Supported configuration file formats: JSON (.json)

    Use --print-config to generate a template configuration file."
)]
pub struct CliArgs {
    /// Configuration file path (JSON format)
    #[arg(
        short,
        long,
        help = "Configuration file path (JSON format)",
        long_help = "Path to a JSON configuration file. CLI arguments will override file settings."
    )]
    pub config: Option<String>,

    /// Flight schedule path (JSON array of flight records)
    #[arg(
        long,
        help = "Flight schedule file (JSON)",
        long_help = "Path to a JSON array of flight records {scheduled_time, flight, destination, aircraft, airline}. A synthetic schedule is generated when omitted."
    )]
    pub schedule: Option<String>,

    /// Summary output path
    #[arg(long, help = "Write the JSON summary to this file instead of stdout")]
    pub output: Option<String>,

    /// Random seed for reproducible results
    #[arg(long, help = "Random seed for reproducible results")]
    pub seed: Option<u64>,

    /// Simulation horizon in minutes
    #[arg(
        long,
        help = "Simulation horizon in minutes",
        long_help = "Simulated time at which the run stops regardless of pending work. Must be greater than 0. Default: 1440 (24 hours)"
    )]
    pub horizon: Option<f64>,

    /// Total check-in desks
    #[arg(long, help = "Total check-in desks")]
    pub checkin_desks: Option<u32>,

    /// Check-in desks dedicated to the distinguished carrier
    #[arg(long, help = "Check-in desks dedicated to the distinguished carrier")]
    pub carrier_desks: Option<u32>,

    /// Hold-baggage scanners
    #[arg(long, help = "Hold-baggage scanners")]
    pub bag_scanners: Option<u32>,

    /// Regular security lanes
    #[arg(long, help = "Regular security lanes")]
    pub security_lanes: Option<u32>,

    /// Fast-track security lanes
    #[arg(long, help = "Fast-track security lanes")]
    pub fast_track_lanes: Option<u32>,

    /// Manual passport booths
    #[arg(long, help = "Manual passport booths")]
    pub passport_booths: Option<u32>,

    /// Automated passport e-gates
    #[arg(long, help = "Automated passport e-gates")]
    pub passport_egates: Option<u32>,

    /// Boarding agents per flight
    #[arg(long, help = "Boarding agents per flight")]
    pub boarding_agents: Option<u32>,

    /// Share of passengers checking in online (0.0-1.0)
    #[arg(long, help = "Online check-in rate (0.0-1.0)")]
    pub online_checkin_rate: Option<f64>,

    /// Share of priority passengers (0.0-1.0)
    #[arg(long, help = "Priority passenger rate (0.0-1.0)")]
    pub priority_rate: Option<f64>,

    /// Maximum queue wait before a passenger reneges, in minutes
    #[arg(
        long,
        help = "Maximum wait tolerance in minutes",
        long_help = "Time a passenger waits in a check-in, security or passport queue before giving up. Default: 60"
    )]
    pub max_wait_tolerance: Option<f64>,

    /// Where hold baggage is scanned
    #[arg(long, help = "Baggage screening mode (separate or inline)")]
    pub baggage_screening: Option<BaggageScreening>,

    /// Enable the airline flight delay model
    #[arg(long, help = "Apply per-airline flight delays")]
    pub flight_delays: bool,

    /// Run the built-in scenarios and print a comparison table
    #[arg(long, help = "Run the built-in scenarios and compare them")]
    pub compare_scenarios: bool,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, help = "Enable debug logging")]
    pub debug: bool,

    /// Emit logs as JSON
    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    /// Directory for daily-rolling JSON log files
    #[arg(long, help = "Also write JSON logs to daily-rolling files in this directory")]
    pub log_dir: Option<String>,

    /// Tracing filter directive, overriding the verbosity flags
    #[arg(
        long,
        help = "Log filter directive (e.g. airport_departure_sim=trace)",
        long_help = "A tracing-subscriber filter directive. Takes precedence over --verbose, --debug and RUST_LOG."
    )]
    pub log_filter: Option<String>,

    /// Disable ANSI colors on the console
    #[arg(long, help = "Disable colored console logs")]
    pub no_color: bool,

    /// Dry run mode - validate configuration without running simulation
    #[arg(long, help = "Validate configuration without running simulation")]
    pub dry_run: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in JSON format and exit")]
    pub print_config: bool,
}

/// Distribution parameters of one service time, in minutes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ServiceTimeParams {
    /// Mean of the normal draw
    pub mean: f64,
    /// Standard deviation of the normal draw
    pub stddev: f64,
    /// Floor applied to every draw
    pub min: f64,
}

impl ServiceTimeParams {
    /// Create a new parameter set
    pub const fn new(mean: f64, stddev: f64, min: f64) -> Self {
        Self { mean, stddev, min }
    }
}

/// Service time distributions of every station
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceTimes {
    /// Check-in desk service, before the per-bag increment
    pub checkin: ServiceTimeParams,
    /// Minutes added to the check-in mean for each checked bag
    pub checkin_per_bag: f64,
    /// Scan time of a single bag
    pub bag_scan: ServiceTimeParams,
    /// Personal security screening
    pub security: ServiceTimeParams,
    /// Multiplier on the security mean for priority passengers
    pub security_priority_factor: f64,
    /// Automated e-gate
    pub egate: ServiceTimeParams,
    /// Manual passport booth
    pub booth: ServiceTimeParams,
    /// Boarding pass scan at the gate
    pub boarding: ServiceTimeParams,
}

impl Default for ServiceTimes {
    fn default() -> Self {
        Self {
            checkin: ServiceTimeParams::new(2.0, 0.5, 0.5),
            checkin_per_bag: 0.5,
            bag_scan: ServiceTimeParams::new(8.5 / 60.0, 1.5 / 60.0, 0.05),
            security: ServiceTimeParams::new(25.0 / 60.0, 5.0 / 60.0, 0.25),
            security_priority_factor: 0.9,
            egate: ServiceTimeParams::new(12.5 / 60.0, 12.5 / 60.0 / 5.0, 0.1),
            booth: ServiceTimeParams::new(45.0 / 60.0, 45.0 / 60.0 / 4.0, 0.1),
            boarding: ServiceTimeParams::new(6.0 / 60.0, 6.0 / 60.0 / 3.0, 0.05),
        }
    }
}

/// Flight-level generation and timing parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlightParameters {
    /// Mean load factor
    pub load_factor_mean: f64,
    /// Load factor standard deviation
    pub load_factor_stddev: f64,
    /// Lower clip of the load factor
    pub load_factor_min: f64,
    /// Upper clip of the load factor
    pub load_factor_max: f64,
    /// Passenger count spread as a fraction of the expected count
    pub passenger_count_spread: f64,
    /// Lower bound on the passenger count standard deviation
    pub passenger_count_min_stddev: f64,
    /// Probability that a flight is overbooked
    pub overbooking_chance: f64,
    /// Upper bound of the overbooking factor
    pub max_overbooking_factor: f64,
    /// Minutes between passenger arrival and scheduled departure
    pub passenger_lead_time: f64,
    /// Minutes before departure at which the gate opens
    pub boarding_open_offset: f64,
    /// Boarding window of narrow-body aircraft, in minutes
    pub narrow_body_boarding: f64,
    /// Boarding window of wide-body aircraft, in minutes
    pub wide_body_boarding: f64,
    /// Apply the per-airline delay model
    pub delays_enabled: bool,
    /// Mean delay of a delayed flight, in minutes
    pub average_delay: f64,
}

impl Default for FlightParameters {
    fn default() -> Self {
        Self {
            load_factor_mean: 0.92,
            load_factor_stddev: 0.05,
            load_factor_min: 0.6,
            load_factor_max: 0.98,
            passenger_count_spread: 0.05,
            passenger_count_min_stddev: 2.0,
            overbooking_chance: 0.02,
            max_overbooking_factor: 1.10,
            passenger_lead_time: 120.0,
            boarding_open_offset: 30.0,
            narrow_body_boarding: 25.0,
            wide_body_boarding: 45.0,
            delays_enabled: false,
            average_delay: super::tables::AVERAGE_DELAY_MINUTES,
        }
    }
}

/// Parameters of the synthetic schedule used when no schedule file is given
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduleParameters {
    /// Mean departures per hour before peak scaling
    pub flights_per_hour: f64,
    /// Hours of the day with peak traffic
    pub peak_hours: Vec<u32>,
    /// Multiplier applied to the hourly mean at peak hours
    pub peak_multiplier: f64,
    /// Multiplier applied to the hourly mean outside peak hours
    pub off_peak_multiplier: f64,
    /// Share of departures operated by the distinguished carrier
    pub carrier_share: f64,
    /// Share of departures to Schengen destinations
    pub schengen_share: f64,
}

impl Default for ScheduleParameters {
    fn default() -> Self {
        Self {
            flights_per_hour: 13.5,
            peak_hours: vec![7, 10, 15, 19],
            peak_multiplier: 1.5,
            off_peak_multiplier: 0.7,
            carrier_share: 0.8,
            schengen_share: 0.7,
        }
    }
}

/// Configuration file structure (allows partial configuration)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    /// Simulation horizon in minutes
    pub horizon: Option<f64>,
    /// Random seed for reproducible results
    pub seed: Option<u64>,
    /// Carrier with dedicated check-in desks
    pub distinguished_carrier: Option<String>,
    /// Total check-in desks
    pub checkin_desks: Option<u32>,
    /// Desks dedicated to the distinguished carrier
    pub carrier_desks: Option<u32>,
    /// Share of each desk bank reserved for priority passengers
    pub priority_desk_share: Option<f64>,
    /// Hold-baggage scanners
    pub bag_scanners: Option<u32>,
    /// Regular security lanes
    pub security_lanes: Option<u32>,
    /// Fast-track security lanes
    pub fast_track_lanes: Option<u32>,
    /// Manual passport booths
    pub passport_booths: Option<u32>,
    /// Automated passport e-gates
    pub passport_egates: Option<u32>,
    /// Boarding agents per flight
    pub boarding_agents: Option<u32>,
    /// Serve priority passengers first at the gate
    pub priority_boarding: Option<bool>,
    /// Maximum queue wait before reneging
    pub max_wait_tolerance: Option<f64>,
    /// Queue length difference that triggers jockeying
    pub jockey_threshold: Option<u32>,
    /// Online check-in rate
    pub online_checkin_rate: Option<f64>,
    /// Carry-on-only rate
    pub carry_on_only_rate: Option<f64>,
    /// E-gate eligibility rate
    pub egate_eligible_rate: Option<f64>,
    /// Priority passenger rate
    pub priority_rate: Option<f64>,
    /// Connecting passenger rate
    pub connecting_rate: Option<f64>,
    /// Whether connecting passengers are generated
    pub connecting_enabled: Option<bool>,
    /// Mean checked bags per passenger
    pub average_bags: Option<f64>,
    /// Baggage screening mode
    pub baggage_screening: Option<BaggageScreening>,
    /// Service time distributions
    pub service_times: Option<ServiceTimes>,
    /// Flight parameters
    pub flights: Option<FlightParameters>,
    /// Synthetic schedule parameters
    pub synthetic_schedule: Option<ScheduleParameters>,
    /// Aircraft type to seat count overrides
    pub aircraft_capacities: Option<BTreeMap<String, u32>>,
    /// Seat count for unknown aircraft types
    pub default_aircraft_capacity: Option<u32>,
    /// Monitor sampling interval in minutes
    pub monitor_interval: Option<f64>,
    /// Gate polling interval in minutes
    pub gate_poll_interval: Option<f64>,
    /// Flight schedule path
    pub schedule_path: Option<String>,
    /// Summary output path
    pub output_path: Option<String>,
}

/// Configuration for the departure simulation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationConfig {
    /// Simulation horizon in minutes
    pub horizon: f64,

    /// Random seed for reproducible results
    pub seed: Option<u64>,

    /// Carrier with dedicated check-in desks
    pub distinguished_carrier: String,

    /// Total check-in desks
    pub checkin_desks: u32,

    /// Desks dedicated to the distinguished carrier (taken from the total)
    pub carrier_desks: u32,

    /// Share of each desk bank reserved for priority passengers (0 disables the tier)
    pub priority_desk_share: f64,

    /// Hold-baggage scanners
    pub bag_scanners: u32,

    /// Regular security lanes
    pub security_lanes: u32,

    /// Fast-track security lanes
    pub fast_track_lanes: u32,

    /// Manual passport booths
    pub passport_booths: u32,

    /// Automated passport e-gates
    pub passport_egates: u32,

    /// Boarding agents per flight
    pub boarding_agents: u32,

    /// Serve priority passengers first at the gate
    pub priority_boarding: bool,

    /// Maximum queue wait before reneging, in minutes
    pub max_wait_tolerance: f64,

    /// Regular minus fast-track queue length above which priority passengers jockey
    pub jockey_threshold: u32,

    /// Share of passengers checking in online (0.0-1.0)
    pub online_checkin_rate: f64,

    /// Share of passengers travelling with carry-on only (0.0-1.0)
    pub carry_on_only_rate: f64,

    /// Share of passengers eligible for e-gates (0.0-1.0)
    pub egate_eligible_rate: f64,

    /// Share of priority passengers (0.0-1.0)
    pub priority_rate: f64,

    /// Share of connecting passengers when enabled (0.0-1.0)
    pub connecting_rate: f64,

    /// Whether connecting passengers are generated at all
    pub connecting_enabled: bool,

    /// Mean checked bags per passenger without carry-on only
    pub average_bags: f64,

    /// Where hold baggage is scanned
    pub baggage_screening: BaggageScreening,

    /// Service time distributions
    pub service_times: ServiceTimes,

    /// Flight generation and timing parameters
    pub flights: FlightParameters,

    /// Synthetic schedule parameters
    pub synthetic_schedule: ScheduleParameters,

    /// Aircraft type to seat count
    pub aircraft_capacities: BTreeMap<String, u32>,

    /// Seat count for unknown aircraft types
    pub default_aircraft_capacity: u32,

    /// Monitor sampling interval in minutes
    pub monitor_interval: f64,

    /// Gate polling interval in minutes
    pub gate_poll_interval: f64,

    /// Flight schedule path (synthetic schedule when absent)
    pub schedule_path: Option<String>,

    /// Summary output path (stdout when absent)
    pub output_path: Option<String>,
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Configuration file read error
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    /// JSON parsing error
    #[error("Failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Unsupported configuration file format
    #[error("Unsupported configuration file format: {0} (supported: .json)")]
    UnsupportedFormat(String),
}

/// Validation errors for simulation configuration
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigValidationError {
    /// Horizon is zero, negative or not finite
    #[error("Simulation horizon must be a positive number of minutes, got {0}")]
    InvalidHorizon(f64),

    /// A resource pool would have no capacity
    #[error("Capacity of {field} must be greater than 0")]
    ZeroCapacity {
        /// Name of the capacity field
        field: String,
    },

    /// Carrier desks must leave at least one general desk
    #[error("Carrier desks ({carrier}) must be fewer than total check-in desks ({total})")]
    InvalidCarrierDesks {
        /// Desks reserved for the carrier
        carrier: u32,
        /// Total desks
        total: u32,
    },

    /// Priority tier leaves a desk bank without regular desks
    #[error("Priority desk share {share} leaves the {bank} desks without regular capacity")]
    InvalidPriorityTier {
        /// Desk bank name
        bank: String,
        /// Configured share
        share: f64,
    },

    /// Probability outside [0, 1]
    #[error("Invalid probability for {field}: {value} (must be between 0.0 and 1.0)")]
    InvalidProbability {
        /// Name of the field with invalid probability
        field: String,
        /// The invalid value
        value: f64,
    },

    /// Distribution parameter not positive or not finite
    #[error("Invalid distribution parameter {field}: {value}")]
    InvalidDistributionParameter {
        /// Name of the parameter
        field: String,
        /// The invalid value
        value: f64,
    },

    /// Load factor clip range is not ordered inside (0, ∞)
    #[error("Invalid load factor range: min ({0}) must be > 0 and <= max ({1})")]
    InvalidLoadFactorRange(f64, f64),

    /// Sampling or polling interval not positive
    #[error("Interval {field} must be positive, got {value}")]
    InvalidInterval {
        /// Name of the interval
        field: String,
        /// The invalid value
        value: f64,
    },
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            horizon: 24.0 * 60.0,
            seed: Some(42),
            distinguished_carrier: DISTINGUISHED_CARRIER.to_string(),
            checkin_desks: 174,
            carrier_desks: 100,
            priority_desk_share: 0.2,
            bag_scanners: 31,
            security_lanes: 25,
            fast_track_lanes: 1,
            passport_booths: 15,
            passport_egates: 10,
            boarding_agents: 2,
            priority_boarding: true,
            max_wait_tolerance: 60.0,
            jockey_threshold: 3,
            online_checkin_rate: 0.5,
            carry_on_only_rate: 0.45,
            egate_eligible_rate: 0.7,
            priority_rate: 0.15,
            connecting_rate: 0.3,
            connecting_enabled: false,
            average_bags: 0.8,
            baggage_screening: BaggageScreening::Separate,
            service_times: ServiceTimes::default(),
            flights: FlightParameters::default(),
            synthetic_schedule: ScheduleParameters::default(),
            aircraft_capacities: default_aircraft_capacities(),
            default_aircraft_capacity: DEFAULT_AIRCRAFT_CAPACITY,
            monitor_interval: 5.0,
            gate_poll_interval: 5.0,
            schedule_path: None,
            output_path: None,
        }
    }
}

/// Split of one desk bank into (regular, priority) desks
///
/// A share of zero disables the priority tier. Otherwise at least one desk is
/// reserved, and the split may leave zero regular desks, which validation rejects.
pub fn priority_split(desks: u32, share: f64) -> (u32, u32) {
    if share <= 0.0 {
        return (desks, 0);
    }
    let priority = ((desks as f64 * share).round() as u32).max(1).min(desks);
    (desks - priority, priority)
}

impl SimulationConfig {
    /// Create a new configuration from command line arguments and optional config file
    pub fn from_args() -> Result<Self, ConfigError> {
        let args = CliArgs::parse();
        Self::from_cli_args(args)
    }

    /// Create configuration from parsed CLI arguments
    pub fn from_cli_args(args: CliArgs) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(config_path) = &args.config {
            config = Self::from_file(config_path)?;
        }

        // CLI takes precedence over the file
        Self::apply_cli_overrides(&mut config, args);

        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let content = fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => {
                let config_file: ConfigFile = serde_json::from_str(&content)?;
                Ok(Self::from_config_file(config_file))
            }
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => Err(ConfigError::UnsupportedFormat("no extension".to_string())),
        }
    }

    /// Create configuration from a config file, merging with defaults
    pub fn from_config_file(file: ConfigFile) -> Self {
        let defaults = Self::default();

        let mut aircraft_capacities = defaults.aircraft_capacities;
        if let Some(overrides) = file.aircraft_capacities {
            aircraft_capacities.extend(overrides);
        }

        Self {
            horizon: file.horizon.unwrap_or(defaults.horizon),
            seed: file.seed.or(defaults.seed),
            distinguished_carrier: file
                .distinguished_carrier
                .unwrap_or(defaults.distinguished_carrier),
            checkin_desks: file.checkin_desks.unwrap_or(defaults.checkin_desks),
            carrier_desks: file.carrier_desks.unwrap_or(defaults.carrier_desks),
            priority_desk_share: file.priority_desk_share.unwrap_or(defaults.priority_desk_share),
            bag_scanners: file.bag_scanners.unwrap_or(defaults.bag_scanners),
            security_lanes: file.security_lanes.unwrap_or(defaults.security_lanes),
            fast_track_lanes: file.fast_track_lanes.unwrap_or(defaults.fast_track_lanes),
            passport_booths: file.passport_booths.unwrap_or(defaults.passport_booths),
            passport_egates: file.passport_egates.unwrap_or(defaults.passport_egates),
            boarding_agents: file.boarding_agents.unwrap_or(defaults.boarding_agents),
            priority_boarding: file.priority_boarding.unwrap_or(defaults.priority_boarding),
            max_wait_tolerance: file.max_wait_tolerance.unwrap_or(defaults.max_wait_tolerance),
            jockey_threshold: file.jockey_threshold.unwrap_or(defaults.jockey_threshold),
            online_checkin_rate: file.online_checkin_rate.unwrap_or(defaults.online_checkin_rate),
            carry_on_only_rate: file.carry_on_only_rate.unwrap_or(defaults.carry_on_only_rate),
            egate_eligible_rate: file.egate_eligible_rate.unwrap_or(defaults.egate_eligible_rate),
            priority_rate: file.priority_rate.unwrap_or(defaults.priority_rate),
            connecting_rate: file.connecting_rate.unwrap_or(defaults.connecting_rate),
            connecting_enabled: file.connecting_enabled.unwrap_or(defaults.connecting_enabled),
            average_bags: file.average_bags.unwrap_or(defaults.average_bags),
            baggage_screening: file.baggage_screening.unwrap_or(defaults.baggage_screening),
            service_times: file.service_times.unwrap_or(defaults.service_times),
            flights: file.flights.unwrap_or(defaults.flights),
            synthetic_schedule: file.synthetic_schedule.unwrap_or(defaults.synthetic_schedule),
            aircraft_capacities,
            default_aircraft_capacity: file
                .default_aircraft_capacity
                .unwrap_or(defaults.default_aircraft_capacity),
            monitor_interval: file.monitor_interval.unwrap_or(defaults.monitor_interval),
            gate_poll_interval: file.gate_poll_interval.unwrap_or(defaults.gate_poll_interval),
            schedule_path: file.schedule_path.or(defaults.schedule_path),
            output_path: file.output_path.or(defaults.output_path),
        }
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(config: &mut Self, args: CliArgs) {
        if let Some(value) = args.schedule {
            config.schedule_path = Some(value);
        }
        if let Some(value) = args.output {
            config.output_path = Some(value);
        }
        if let Some(value) = args.seed {
            config.seed = Some(value);
        }
        if let Some(value) = args.horizon {
            config.horizon = value;
        }
        if let Some(value) = args.checkin_desks {
            config.checkin_desks = value;
        }
        if let Some(value) = args.carrier_desks {
            config.carrier_desks = value;
        }
        if let Some(value) = args.bag_scanners {
            config.bag_scanners = value;
        }
        if let Some(value) = args.security_lanes {
            config.security_lanes = value;
        }
        if let Some(value) = args.fast_track_lanes {
            config.fast_track_lanes = value;
        }
        if let Some(value) = args.passport_booths {
            config.passport_booths = value;
        }
        if let Some(value) = args.passport_egates {
            config.passport_egates = value;
        }
        if let Some(value) = args.boarding_agents {
            config.boarding_agents = value;
        }
        if let Some(value) = args.online_checkin_rate {
            config.online_checkin_rate = value;
        }
        if let Some(value) = args.priority_rate {
            config.priority_rate = value;
        }
        if let Some(value) = args.max_wait_tolerance {
            config.max_wait_tolerance = value;
        }
        if let Some(value) = args.baggage_screening {
            config.baggage_screening = value;
        }
        if args.flight_delays {
            config.flights.delays_enabled = true;
        }
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Print configuration as JSON
    pub fn print_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Seat count of an aircraft type, falling back to the default capacity
    pub fn aircraft_capacity(&self, aircraft_type: &str) -> Option<u32> {
        self.aircraft_capacities.get(aircraft_type).copied()
    }

    /// Desks available to carriers other than the distinguished one
    pub fn general_desks(&self) -> u32 {
        self.checkin_desks.saturating_sub(self.carrier_desks)
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !self.horizon.is_finite() || self.horizon <= 0.0 {
            return Err(ConfigValidationError::InvalidHorizon(self.horizon));
        }

        let capacities = [
            ("checkin_desks", self.checkin_desks),
            ("carrier_desks", self.carrier_desks),
            ("bag_scanners", self.bag_scanners),
            ("security_lanes", self.security_lanes),
            ("fast_track_lanes", self.fast_track_lanes),
            ("passport_booths", self.passport_booths),
            ("passport_egates", self.passport_egates),
            ("boarding_agents", self.boarding_agents),
            ("default_aircraft_capacity", self.default_aircraft_capacity),
        ];
        for (field, value) in capacities {
            if value == 0 {
                return Err(ConfigValidationError::ZeroCapacity { field: field.to_string() });
            }
        }
        for (aircraft, seats) in &self.aircraft_capacities {
            if *seats == 0 {
                return Err(ConfigValidationError::ZeroCapacity {
                    field: format!("aircraft_capacities.{}", aircraft),
                });
            }
        }

        if self.carrier_desks >= self.checkin_desks {
            return Err(ConfigValidationError::InvalidCarrierDesks {
                carrier: self.carrier_desks,
                total: self.checkin_desks,
            });
        }

        self.validate_probability("priority_desk_share", self.priority_desk_share)?;
        for (bank, desks) in [("carrier", self.carrier_desks), ("general", self.general_desks())] {
            let (regular, _) = priority_split(desks, self.priority_desk_share);
            if regular == 0 {
                return Err(ConfigValidationError::InvalidPriorityTier {
                    bank: bank.to_string(),
                    share: self.priority_desk_share,
                });
            }
        }

        self.validate_probability("online_checkin_rate", self.online_checkin_rate)?;
        self.validate_probability("carry_on_only_rate", self.carry_on_only_rate)?;
        self.validate_probability("egate_eligible_rate", self.egate_eligible_rate)?;
        self.validate_probability("priority_rate", self.priority_rate)?;
        self.validate_probability("connecting_rate", self.connecting_rate)?;
        self.validate_probability("flights.overbooking_chance", self.flights.overbooking_chance)?;
        self.validate_probability("synthetic_schedule.carrier_share", self.synthetic_schedule.carrier_share)?;
        self.validate_probability(
            "synthetic_schedule.schengen_share",
            self.synthetic_schedule.schengen_share,
        )?;

        // Zero tolerance is a legitimate "never wait" policy
        self.validate_non_negative("max_wait_tolerance", self.max_wait_tolerance)?;
        self.validate_non_negative("average_bags", self.average_bags)?;

        let services = [
            ("service_times.checkin", self.service_times.checkin),
            ("service_times.bag_scan", self.service_times.bag_scan),
            ("service_times.security", self.service_times.security),
            ("service_times.egate", self.service_times.egate),
            ("service_times.booth", self.service_times.booth),
            ("service_times.boarding", self.service_times.boarding),
        ];
        for (name, params) in services {
            self.validate_service(name, params)?;
        }
        self.validate_non_negative("service_times.checkin_per_bag", self.service_times.checkin_per_bag)?;
        self.validate_positive(
            "service_times.security_priority_factor",
            self.service_times.security_priority_factor,
        )?;

        let flights = &self.flights;
        if !(flights.load_factor_min > 0.0 && flights.load_factor_min <= flights.load_factor_max)
            || !flights.load_factor_max.is_finite()
        {
            return Err(ConfigValidationError::InvalidLoadFactorRange(
                flights.load_factor_min,
                flights.load_factor_max,
            ));
        }
        self.validate_positive("flights.load_factor_mean", flights.load_factor_mean)?;
        self.validate_non_negative("flights.load_factor_stddev", flights.load_factor_stddev)?;
        self.validate_non_negative("flights.passenger_count_spread", flights.passenger_count_spread)?;
        self.validate_non_negative(
            "flights.passenger_count_min_stddev",
            flights.passenger_count_min_stddev,
        )?;
        if !flights.max_overbooking_factor.is_finite() || flights.max_overbooking_factor < 1.0 {
            return Err(ConfigValidationError::InvalidDistributionParameter {
                field: "flights.max_overbooking_factor".to_string(),
                value: flights.max_overbooking_factor,
            });
        }
        self.validate_non_negative("flights.passenger_lead_time", flights.passenger_lead_time)?;
        self.validate_non_negative("flights.boarding_open_offset", flights.boarding_open_offset)?;
        self.validate_positive("flights.narrow_body_boarding", flights.narrow_body_boarding)?;
        self.validate_positive("flights.wide_body_boarding", flights.wide_body_boarding)?;
        self.validate_positive("flights.average_delay", flights.average_delay)?;

        self.validate_non_negative(
            "synthetic_schedule.flights_per_hour",
            self.synthetic_schedule.flights_per_hour,
        )?;

        for (field, value) in [
            ("monitor_interval", self.monitor_interval),
            ("gate_poll_interval", self.gate_poll_interval),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigValidationError::InvalidInterval { field: field.to_string(), value });
            }
        }

        Ok(())
    }

    fn validate_probability(&self, field: &str, value: f64) -> Result<(), ConfigValidationError> {
        if !(0.0..=1.0).contains(&value) {
            return Err(ConfigValidationError::InvalidProbability {
                field: field.to_string(),
                value,
            });
        }
        Ok(())
    }

    fn validate_positive(&self, field: &str, value: f64) -> Result<(), ConfigValidationError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(ConfigValidationError::InvalidDistributionParameter {
                field: field.to_string(),
                value,
            });
        }
        Ok(())
    }

    fn validate_non_negative(&self, field: &str, value: f64) -> Result<(), ConfigValidationError> {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigValidationError::InvalidDistributionParameter {
                field: field.to_string(),
                value,
            });
        }
        Ok(())
    }

    fn validate_service(
        &self,
        field: &str,
        params: ServiceTimeParams,
    ) -> Result<(), ConfigValidationError> {
        self.validate_positive(&format!("{}.mean", field), params.mean)?;
        self.validate_non_negative(&format!("{}.stddev", field), params.stddev)?;
        self.validate_non_negative(&format!("{}.min", field), params.min)
    }
}
