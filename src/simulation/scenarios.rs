//! Scenario comparison
//!
//! A scenario is a named transform over a base configuration. The manager
//! runs every scenario against the same flight schedule and lines the
//! summaries up in a comparison table.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, instrument};

use crate::flight::FlightSchedule;
use crate::simulation::airport::AirportSimulation;
use crate::simulation::statistics::SimulationSummary;
use crate::simulation::SimulationResult;
use crate::types::{SimulationConfig, StationKind};

type Transform = Box<dyn Fn(&mut SimulationConfig) + Send + Sync>;

/// A named configuration variant
pub struct Scenario {
    /// Short name used in the comparison table
    pub name: String,
    /// What the variant changes
    pub description: String,
    transform: Transform,
}

impl Scenario {
    /// Create a scenario from a configuration transform
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        transform: impl Fn(&mut SimulationConfig) + Send + Sync + 'static,
    ) -> Self {
        Self { name: name.into(), description: description.into(), transform: Box::new(transform) }
    }

    /// Configuration of this scenario derived from `base`
    pub fn configure(&self, base: &SimulationConfig) -> SimulationConfig {
        let mut config = base.clone();
        (self.transform)(&mut config);
        config
    }
}

impl fmt::Debug for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scenario")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Summary of one scenario run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    /// Scenario name
    pub name: String,
    /// Scenario description
    pub description: String,
    /// Summary of the run
    pub summary: SimulationSummary,
}

/// One row of the comparison table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    /// Scenario name
    pub name: String,
    /// Mean time in the system
    pub avg_total_time: f64,
    /// Mean queue wait per station, in pipeline order
    pub avg_waits: Vec<(StationKind, f64)>,
    /// Share of passengers that reneged, in percent
    pub reneged_percentage: f64,
    /// Passengers boarded
    pub boarded: u64,
}

/// Side-by-side comparison of scenario runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioComparison {
    /// One row per scenario, in run order
    pub rows: Vec<ComparisonRow>,
}

impl ScenarioComparison {
    /// Build the table from finished runs
    pub fn from_results(results: &[ScenarioResult]) -> Self {
        let rows = results
            .iter()
            .map(|result| {
                let summary = &result.summary;
                ComparisonRow {
                    name: result.name.clone(),
                    avg_total_time: summary.avg_total_time,
                    avg_waits: StationKind::ALL
                        .iter()
                        .map(|station| (*station, summary.station(*station).map_or(0.0, |s| s.avg_wait)))
                        .collect(),
                    reneged_percentage: summary.reneged_percentage,
                    boarded: summary.boarded_passengers,
                }
            })
            .collect();
        Self { rows }
    }

    /// Row of a scenario
    pub fn row(&self, name: &str) -> Option<&ComparisonRow> {
        self.rows.iter().find(|row| row.name == name)
    }
}

impl fmt::Display for ScenarioComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<22} {:>10}", "scenario", "total")?;
        for station in StationKind::ALL {
            write!(f, " {:>9}", station.key())?;
        }
        writeln!(f, " {:>9} {:>9}", "reneged%", "boarded")?;

        for row in &self.rows {
            write!(f, "{:<22} {:>10.2}", row.name, row.avg_total_time)?;
            for (_, wait) in &row.avg_waits {
                write!(f, " {:>9.2}", wait)?;
            }
            writeln!(f, " {:>9.2} {:>9}", row.reneged_percentage, row.boarded)?;
        }
        Ok(())
    }
}

/// Runs configuration variants against one schedule
#[derive(Debug)]
pub struct ScenarioManager {
    base: SimulationConfig,
    scenarios: Vec<Scenario>,
}

impl ScenarioManager {
    /// Manager with no scenarios
    pub fn new(base: SimulationConfig) -> Self {
        Self { base, scenarios: Vec::new() }
    }

    /// Manager with the built-in variants
    pub fn with_builtin(base: SimulationConfig) -> Self {
        let online_rate = (base.online_checkin_rate + 0.2).min(1.0);
        let fewer_lanes = base.security_lanes.saturating_sub(5).max(1);
        let more_egates = base.passport_egates + 5;

        Self::new(base)
            .add(Scenario::new("baseline", "Base configuration", |_| {}))
            .add(Scenario::new(
                "more_online_checkin",
                format!("Online check-in rate raised to {:.2}", online_rate),
                move |config| config.online_checkin_rate = online_rate,
            ))
            .add(Scenario::new(
                "fewer_security_lanes",
                format!("{} regular security lanes", fewer_lanes),
                move |config| config.security_lanes = fewer_lanes,
            ))
            .add(Scenario::new(
                "more_egates",
                format!("{} passport e-gates", more_egates),
                move |config| config.passport_egates = more_egates,
            ))
    }

    /// Append a scenario
    pub fn add(mut self, scenario: Scenario) -> Self {
        self.scenarios.push(scenario);
        self
    }

    /// Registered scenarios
    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    /// Run every scenario against the same schedule
    ///
    /// Each variant's configuration is validated before its run; an invalid
    /// variant stops the comparison.
    #[instrument(skip(self, schedule), fields(scenarios = self.scenarios.len()))]
    pub fn run_all(&self, schedule: &FlightSchedule) -> SimulationResult<Vec<ScenarioResult>> {
        let mut results = Vec::with_capacity(self.scenarios.len());
        for scenario in &self.scenarios {
            info!(scenario = %scenario.name, "Running scenario");
            let config = scenario.configure(&self.base);
            let summary = AirportSimulation::new(config, schedule)?.run()?;
            results.push(ScenarioResult {
                name: scenario.name.clone(),
                description: scenario.description.clone(),
                summary,
            });
        }
        Ok(results)
    }

    /// Run every scenario and tabulate
    pub fn compare(&self, schedule: &FlightSchedule) -> SimulationResult<ScenarioComparison> {
        Ok(ScenarioComparison::from_results(&self.run_all(schedule)?))
    }
}
