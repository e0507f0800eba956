/*!
 * System Limits and Constants
 *
 * Defaults and bounds for the simulated machine, grouped by domain.
 */

use std::time::Duration;

// =============================================================================
// CLOCK
// =============================================================================

/// Slowest allowed tick rate (ticks per second)
pub const MIN_SPEED_HZ: f64 = 0.1;

/// Fastest allowed tick rate (ticks per second)
pub const MAX_SPEED_HZ: f64 = 1000.0;

/// Tick rate used when the configuration does not name one
pub const DEFAULT_SPEED_HZ: f64 = 1.0;

/// Pause between ticks when the rate is not a usable positive number
pub const FALLBACK_TICK_INTERVAL: Duration = Duration::from_millis(100);

// =============================================================================
// PROCESS DEFAULTS
// =============================================================================

/// Memory footprint of processes generated at boot or by `create` without a size
pub const DEFAULT_PROCESS_SIZE: usize = 128;

/// Instructions each process retires before it may exit
pub const DEFAULT_PROGRAM_LENGTH: u64 = 30;

/// Consecutive ticks a process may hold the CPU
pub const DEFAULT_QUANTUM_LENGTH: u32 = 5;

/// Chance that a fetched instruction is an I/O request
pub const DEFAULT_IO_PROBABILITY: f64 = 0.2;

/// Ticks an I/O request keeps a process blocked
pub const DEFAULT_IO_DURATION: u32 = 15;

// =============================================================================
// FALLBACK MACHINE
// =============================================================================

/// Memory capacity used when no configuration file can be read
pub const FALLBACK_MEMORY: usize = 1024;

/// Process table capacity used when no configuration file can be read
pub const FALLBACK_MAX_PROCESSES: usize = 10;

// =============================================================================
// MEMORY PRESSURE
// =============================================================================

/// Usage ratio at which pressure is reported as medium
pub const MEMORY_PRESSURE_MEDIUM: f64 = 0.60;

/// Usage ratio at which pressure is reported as high [warns]
pub const MEMORY_PRESSURE_HIGH: f64 = 0.80;

/// Usage ratio at which pressure is reported as critical [warns]
pub const MEMORY_PRESSURE_CRITICAL: f64 = 0.95;
