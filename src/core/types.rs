/*!
 * Core Types
 * Common types used across the kernel
 */

/// Process ID type
pub type Pid = u32;

/// Size type for memory accounting (abstract units)
pub type Size = usize;

/// Simulated time, counted in ticks since boot
pub type Tick = u64;

/// Common result type for kernel operations
pub type KernelResult<T> = Result<T, super::errors::KernelError>;
