// Airport Departure Simulator - Main Entry Point
//
// You can run it via Cargo:
//
// ```console
// $ cargo build --release
// $ ./target/release/airport-departure-sim
// ```
//
// Or with a schedule and custom configuration:
//
// ```console
// $ ./target/release/airport-departure-sim --schedule flights.json --security-lanes 20 --verbose
// ```

use airport_departure_sim::flight::{FlightSchedule, ScheduleGenerator};
use airport_departure_sim::simulation::{AirportSimulation, LoggingConfig, ScenarioManager, SimulationSummary};
use airport_departure_sim::types::config::CliArgs;
use airport_departure_sim::types::SimulationConfig;
use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::process;
use tracing::{error, info};

fn main() {
    // Parse CLI arguments first to check for special flags
    let args = CliArgs::parse();

    if args.print_config {
        match SimulationConfig::default().print_json() {
            Ok(json) => {
                println!("{}", json);
                return;
            }
            Err(e) => {
                eprintln!("Failed to serialize default configuration: {}", e);
                process::exit(1);
            }
        }
    }

    let logging = LoggingConfig::from_cli_args(&args);
    let _log_guard = match logging.init() {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run(args) {
        error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(args: CliArgs) -> Result<()> {
    let config =
        SimulationConfig::from_cli_args(args.clone()).context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;
    info!("Configuration loaded and validated successfully");

    if args.dry_run {
        eprintln!("Configuration validation successful!");
        eprintln!("Dry run mode - simulation will not be executed.");
        print_configuration_summary(&config);
        return Ok(());
    }

    print_configuration_summary(&config);
    let schedule = load_schedule(&config)?;
    eprintln!("Flights in schedule: {}", schedule.len());

    if args.compare_scenarios {
        let comparison = ScenarioManager::with_builtin(config.clone())
            .compare(&schedule)
            .context("Scenario comparison failed")?;
        eprintln!();
        eprintln!("{}", comparison);
        let json = serde_json::to_string_pretty(&comparison).context("Failed to serialize comparison")?;
        return write_output(&config, &json);
    }

    let summary = AirportSimulation::new(config.clone(), &schedule)
        .context("Failed to initialize simulation")?
        .run()
        .context("Simulation failed")?;

    print_report(&summary);
    let json = summary.to_json().context("Failed to serialize summary")?;
    write_output(&config, &json)
}

/// Load the configured schedule, or synthesize one for today
fn load_schedule(config: &SimulationConfig) -> Result<FlightSchedule> {
    match &config.schedule_path {
        Some(path) => FlightSchedule::from_json_file(path)
            .with_context(|| format!("Failed to load flight schedule from {}", path)),
        None => {
            let date = chrono::Local::now().date_naive();
            info!(%date, "No schedule given, generating a synthetic one");
            ScheduleGenerator::new(
                config.synthetic_schedule.clone(),
                config.distinguished_carrier.clone(),
                config.seed,
            )
            .generate(date)
            .context("Failed to generate synthetic schedule")
        }
    }
}

fn write_output(config: &SimulationConfig, json: &str) -> Result<()> {
    match &config.output_path {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("Failed to write summary to {}", path))?;
            eprintln!("Summary written to: {}", path);
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn print_configuration_summary(config: &SimulationConfig) {
    eprintln!("Configuration Summary:");
    eprintln!("  Horizon: {} minutes", config.horizon);
    eprintln!(
        "  Check-in desks: {} ({} {}, {} others)",
        config.checkin_desks,
        config.carrier_desks,
        config.distinguished_carrier,
        config.general_desks()
    );
    eprintln!("  Bag scanners: {} ({})", config.bag_scanners, config.baggage_screening);
    eprintln!("  Security lanes: {} + {} fast track", config.security_lanes, config.fast_track_lanes);
    eprintln!("  Passport: {} booths, {} e-gates", config.passport_booths, config.passport_egates);
    eprintln!("  Boarding agents per flight: {}", config.boarding_agents);
    eprintln!("  Wait tolerance: {} minutes", config.max_wait_tolerance);
    if let Some(seed) = config.seed {
        eprintln!("  Random seed: {}", seed);
    }
    eprintln!();
}

fn print_report(summary: &SimulationSummary) {
    eprintln!();
    eprintln!("{}", summary);
    eprintln!();
}
