/*!
 * Round-Robin Kernel Simulator Library
 * Discrete-time scheduler, memory admission and I/O blocking exposed as a library
 */

pub mod console;
pub mod core;
pub mod cpu;
pub mod kernel;
pub mod memory;
pub mod monitoring;
pub mod process;

// Re-exports
pub use crate::core::{AdmissionError, ConfigError, KernelConfig, KernelError, KernelResult, Pid, Size, Tick};
pub use console::{render, ConsoleCommand};
pub use cpu::{CommandKind, RandomSource, ScriptedSource, SeededSource};
pub use kernel::{Kernel, KernelBuilder, KernelSnapshot, KernelStats, PacingMode, TickOutcome, TickReport};
pub use memory::{MemoryError, MemoryLedger, MemoryStats};
pub use monitoring::init_tracing;
pub use process::{ProcessInfo, ProcessState};
