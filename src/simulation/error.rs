//! Error types and handling
//!
//! This module contains error types and error handling for the simulation.
//! Only configuration errors are fatal; every other error is confined to the
//! passenger, flight or record it concerns and the run carries on.

use crate::types::{ConfigError, ConfigValidationError, FlightKey, PassengerKey};
use thiserror::Error;

/// Errors that can occur during simulation
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ConfigurationError(String),

    /// Flight schedule could not be read or contains an invalid row
    #[error("Schedule error: {0}")]
    ScheduleError(String),

    /// A passenger pipeline step failed
    #[error("Passenger {passenger} fault: {message}")]
    PassengerFault {
        /// Passenger whose pipeline failed
        passenger: PassengerKey,
        /// Description of the failure
        message: String,
    },

    /// A passenger or pool referenced a flight that is no longer active
    #[error("Flight {0} is not active")]
    MissingFlight(FlightKey),

    /// A resource pool was used against its protocol
    #[error("Resource error: {0}")]
    ResourceError(String),

    /// Statistics error
    #[error("Statistics error: {0}")]
    StatisticsError(String),

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl From<ConfigValidationError> for SimulationError {
    fn from(error: ConfigValidationError) -> Self {
        SimulationError::ConfigurationError(error.to_string())
    }
}

impl From<ConfigError> for SimulationError {
    fn from(error: ConfigError) -> Self {
        SimulationError::ConfigurationError(error.to_string())
    }
}

impl SimulationError {
    /// Create a configuration error
    pub fn configuration_error(msg: impl Into<String>) -> Self {
        Self::ConfigurationError(msg.into())
    }

    /// Create a schedule error
    pub fn schedule_error(msg: impl Into<String>) -> Self {
        Self::ScheduleError(msg.into())
    }

    /// Create a passenger fault
    pub fn passenger_fault(passenger: PassengerKey, msg: impl Into<String>) -> Self {
        Self::PassengerFault { passenger, message: msg.into() }
    }

    /// Create a resource protocol error
    pub fn resource_error(msg: impl Into<String>) -> Self {
        Self::ResourceError(msg.into())
    }

    /// Create a statistics error
    pub fn statistics_error(msg: impl Into<String>) -> Self {
        Self::StatisticsError(msg.into())
    }

    /// Check if this is a recoverable error
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, SimulationError::ConfigurationError(_))
    }

    /// Get the error category
    pub fn category(&self) -> &'static str {
        match self {
            SimulationError::ConfigurationError(_) => "Configuration",
            SimulationError::ScheduleError(_) => "Schedule",
            SimulationError::PassengerFault { .. } => "Passenger",
            SimulationError::MissingFlight(_) => "Flight Reference",
            SimulationError::ResourceError(_) => "Resource",
            SimulationError::StatisticsError(_) => "Statistics",
            SimulationError::IoError(_) => "IO",
            SimulationError::SerializationError(_) => "Serialization",
        }
    }
}

/// Result type for simulation operations
pub type SimulationResult<T> = Result<T, SimulationError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_creation() {
        let config_error = SimulationError::configuration_error("Invalid config");
        assert!(matches!(config_error, SimulationError::ConfigurationError(_)));
        assert_eq!(config_error.to_string(), "Configuration validation failed: Invalid config");

        let fault = SimulationError::passenger_fault(PassengerKey::new(FlightKey(2), 5), "boom");
        assert_eq!(fault.to_string(), "Passenger FLT_0002/5 fault: boom");

        let missing = SimulationError::MissingFlight(FlightKey(9));
        assert_eq!(missing.to_string(), "Flight FLT_0009 is not active");
    }

    #[test]
    fn test_error_from_validation_error() {
        let error: SimulationError = ConfigValidationError::InvalidHorizon(-1.0).into();
        assert!(matches!(error, SimulationError::ConfigurationError(_)));
        assert!(!error.is_recoverable());
    }

    #[test]
    fn test_error_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let sim_error: SimulationError = io_error.into();
        assert!(matches!(sim_error, SimulationError::IoError(_)));
        assert!(sim_error.is_recoverable());
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(SimulationError::configuration_error("x").category(), "Configuration");
        assert_eq!(SimulationError::schedule_error("x").category(), "Schedule");
        assert_eq!(SimulationError::resource_error("x").category(), "Resource");
        assert_eq!(SimulationError::statistics_error("x").category(), "Statistics");
        assert_eq!(SimulationError::MissingFlight(FlightKey(0)).category(), "Flight Reference");
    }

    #[test]
    fn test_only_configuration_errors_are_fatal() {
        assert!(SimulationError::schedule_error("bad row").is_recoverable());
        assert!(SimulationError::resource_error("double release").is_recoverable());
        assert!(!SimulationError::configuration_error("bad").is_recoverable());
    }
}
