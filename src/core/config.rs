/*!
 * Kernel Configuration
 * Machine parameters loaded from JSON, validated before the kernel is built
 */

use super::errors::ConfigError;
use super::limits::{
    DEFAULT_IO_DURATION, DEFAULT_IO_PROBABILITY, DEFAULT_PROCESS_SIZE, DEFAULT_PROGRAM_LENGTH,
    DEFAULT_QUANTUM_LENGTH, DEFAULT_SPEED_HZ, FALLBACK_MAX_PROCESSES, FALLBACK_MEMORY,
    MAX_SPEED_HZ, MIN_SPEED_HZ,
};
use super::types::Size;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Simulated machine configuration
///
/// `memory` and `max_processes` are required; everything else has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct KernelConfig {
    /// Total memory capacity in abstract units
    pub memory: Size,
    /// Process table capacity
    pub max_processes: usize,
    #[serde(default = "default_speed_hz")]
    pub initial_speed_hz: f64,
    #[serde(default = "default_process_size")]
    pub default_process_size: Size,
    #[serde(default = "default_quantum_length")]
    pub quantum_length: u32,
    #[serde(default = "default_program_length")]
    pub program_length: u64,
    #[serde(default = "default_io_probability")]
    pub io_command_probability: f64,
    #[serde(default = "default_io_duration")]
    pub io_duration: u32,
    /// Fixed seed for the instruction mix; entropy when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_speed_hz() -> f64 {
    DEFAULT_SPEED_HZ
}

fn default_process_size() -> Size {
    DEFAULT_PROCESS_SIZE
}

fn default_quantum_length() -> u32 {
    DEFAULT_QUANTUM_LENGTH
}

fn default_program_length() -> u64 {
    DEFAULT_PROGRAM_LENGTH
}

fn default_io_probability() -> f64 {
    DEFAULT_IO_PROBABILITY
}

fn default_io_duration() -> u32 {
    DEFAULT_IO_DURATION
}

impl KernelConfig {
    /// Configuration with the given capacities and defaults for the rest
    pub fn new(memory: Size, max_processes: usize) -> Self {
        Self {
            memory,
            max_processes,
            initial_speed_hz: DEFAULT_SPEED_HZ,
            default_process_size: DEFAULT_PROCESS_SIZE,
            quantum_length: DEFAULT_QUANTUM_LENGTH,
            program_length: DEFAULT_PROGRAM_LENGTH,
            io_command_probability: DEFAULT_IO_PROBABILITY,
            io_duration: DEFAULT_IO_DURATION,
            seed: None,
        }
    }

    /// Machine used when no configuration file is available
    pub fn fallback() -> Self {
        Self::new(FALLBACK_MEMORY, FALLBACK_MAX_PROCESSES)
    }

    pub fn with_speed_hz(mut self, speed_hz: f64) -> Self {
        self.initial_speed_hz = speed_hz;
        self
    }

    pub fn with_default_process_size(mut self, size: Size) -> Self {
        self.default_process_size = size;
        self
    }

    pub fn with_quantum_length(mut self, quantum_length: u32) -> Self {
        self.quantum_length = quantum_length;
        self
    }

    pub fn with_program_length(mut self, program_length: u64) -> Self {
        self.program_length = program_length;
        self
    }

    pub fn with_io_probability(mut self, probability: f64) -> Self {
        self.io_command_probability = probability;
        self
    }

    pub fn with_io_duration(mut self, io_duration: u32) -> Self {
        self.io_duration = io_duration;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json_str(&contents)?;
        info!("Loaded kernel configuration from {}", path.display());
        Ok(config)
    }

    /// Check every field against its allowed range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.memory == 0 {
            return Err(ConfigError::invalid("memory", "must be greater than zero"));
        }
        if self.max_processes == 0 {
            return Err(ConfigError::invalid(
                "max_processes",
                "must be greater than zero",
            ));
        }
        if !self.initial_speed_hz.is_finite() || self.initial_speed_hz <= 0.0 {
            return Err(ConfigError::invalid(
                "initial_speed_hz",
                format!("must be a positive number, got {}", self.initial_speed_hz),
            ));
        }
        if self.quantum_length == 0 {
            return Err(ConfigError::invalid(
                "quantum_length",
                "must be at least one tick",
            ));
        }
        if !(0.0..=1.0).contains(&self.io_command_probability) {
            return Err(ConfigError::invalid(
                "io_command_probability",
                format!("must be within [0, 1], got {}", self.io_command_probability),
            ));
        }
        Ok(())
    }

    /// Initial rate, clamped to the supported clock range
    pub fn clamped_speed_hz(&self) -> f64 {
        self.initial_speed_hz.clamp(MIN_SPEED_HZ, MAX_SPEED_HZ)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let config = KernelConfig::from_json_str(r#"{"memory": 1024, "max_processes": 10}"#)
            .unwrap();
        assert_eq!(config, KernelConfig::new(1024, 10));
        assert_eq!(config.quantum_length, 5);
        assert_eq!(config.program_length, 30);
        assert_eq!(config.io_duration, 15);
        assert_eq!(config.default_process_size, 128);
    }

    #[test]
    fn test_missing_required_field() {
        let result = KernelConfig::from_json_str(r#"{"memory": 1024}"#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_probability_out_of_range() {
        let result = KernelConfig::from_json_str(
            r#"{"memory": 1024, "max_processes": 2, "io_command_probability": 1.5}"#,
        );
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                field: "io_command_probability",
                ..
            })
        ));
    }

    #[test]
    fn test_zero_quantum_rejected() {
        let config = KernelConfig::new(64, 1).with_quantum_length(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_speed_is_clamped() {
        let config = KernelConfig::new(64, 1).with_speed_hz(5000.0);
        assert!(config.validate().is_ok());
        assert_eq!(config.clamped_speed_hz(), MAX_SPEED_HZ);
    }
}
