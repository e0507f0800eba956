/*!
 * Memory Types
 * Common types for memory accounting
 */

use crate::core::limits::{MEMORY_PRESSURE_CRITICAL, MEMORY_PRESSURE_HIGH, MEMORY_PRESSURE_MEDIUM};
use crate::core::types::{Pid, Size};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Memory operation result
pub type MemoryResult<T> = Result<T, MemoryError>;

/// Memory errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum MemoryError {
    #[error("Out of memory: requested {requested} units, available {available} units")]
    #[diagnostic(code(memory::out_of_memory))]
    OutOfMemory { requested: Size, available: Size },

    #[error("PID {0} already holds an allocation")]
    #[diagnostic(code(memory::already_allocated))]
    AlreadyAllocated(Pid),

    #[error("PID {0} holds no allocation")]
    #[diagnostic(code(memory::not_allocated))]
    NotAllocated(Pid),
}

/// Memory statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryStats {
    pub total_memory: Size,
    pub used_memory: Size,
    pub available_memory: Size,
    pub usage_percentage: f64,
    pub allocation_count: usize,
}

impl MemoryStats {
    pub fn memory_pressure(&self) -> MemoryPressure {
        MemoryPressure::from_ratio(self.usage_percentage / 100.0)
    }
}

/// Memory pressure levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MemoryPressure {
    Low,
    Medium,
    High,
    Critical,
}

impl MemoryPressure {
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio >= MEMORY_PRESSURE_CRITICAL {
            MemoryPressure::Critical
        } else if ratio >= MEMORY_PRESSURE_HIGH {
            MemoryPressure::High
        } else if ratio >= MEMORY_PRESSURE_MEDIUM {
            MemoryPressure::Medium
        } else {
            MemoryPressure::Low
        }
    }
}

impl std::fmt::Display for MemoryPressure {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            MemoryPressure::Low => write!(f, "LOW"),
            MemoryPressure::Medium => write!(f, "MEDIUM"),
            MemoryPressure::High => write!(f, "HIGH"),
            MemoryPressure::Critical => write!(f, "CRITICAL"),
        }
    }
}
