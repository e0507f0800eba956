/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use crate::core::types::{Pid, Size};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export MemoryError from memory module
pub use crate::memory::MemoryError;

/// Admission errors, reported back to whoever asked for a new process.
/// None of them affect the running engine.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum AdmissionError {
    #[error("Process table is full ({capacity} processes)")]
    #[diagnostic(
        code(admission::table_full),
        help("Wait for a running process to finish or raise max_processes.")
    )]
    TableFull { capacity: usize },

    #[error("Not enough memory: requested {requested}, available {available}")]
    #[diagnostic(
        code(admission::out_of_memory),
        help("Request a smaller process or wait for memory to be released.")
    )]
    OutOfMemory { requested: Size, available: Size },

    #[error("Memory allocation for PID {pid} ({size} units) failed after registration")]
    #[diagnostic(
        code(admission::allocation_failed),
        help("The process table entry was rolled back. Retry the request.")
    )]
    AllocationFailed { pid: Pid, size: Size },
}

/// Configuration errors
#[derive(Error, Debug, Diagnostic)]
pub enum ConfigError {
    #[error("Failed to read configuration file {path}: {source}")]
    #[diagnostic(
        code(config::read_failed),
        help("Check that the file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    #[diagnostic(
        code(config::parse_failed),
        help("The configuration must be a JSON object with snake_case keys.")
    )]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration value for `{field}`: {reason}")]
    #[diagnostic(code(config::invalid_value))]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Unified kernel error type with miette diagnostics
#[derive(Error, Debug, Diagnostic)]
pub enum KernelError {
    #[error("Admission error: {0}")]
    #[diagnostic(transparent)]
    Admission(#[from] AdmissionError),

    #[error("Memory error: {0}")]
    #[diagnostic(transparent)]
    Memory(#[from] MemoryError),

    #[error("Configuration error: {0}")]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("Internal error: {0}")]
    #[diagnostic(
        code(kernel::internal_error),
        help("An unexpected internal error occurred. Please report this issue.")
    )]
    Internal(String),
}
