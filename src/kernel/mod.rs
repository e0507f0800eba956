/*!
 * Kernel
 *
 * Public face of the simulator. Owns the shared engine state and the
 * background tick task, and exposes the control-surface operations:
 * admission requests, clock-rate changes, pause/resume and snapshots.
 *
 * Every operation takes the same state lock the tick loop uses, so each
 * one is atomic with respect to a tick.
 */

mod admission;
pub mod builder;
pub mod pacing;
pub mod snapshot;
pub mod state;
pub mod stats;
pub mod task;

pub use builder::KernelBuilder;
pub use pacing::PacingMode;
pub use snapshot::KernelSnapshot;
pub use state::{KernelState, TickOutcome, TickReport};
pub use stats::{AtomicKernelStats, KernelStats};
pub use task::{EngineCommand, EngineTask};

use crate::core::config::KernelConfig;
use crate::core::errors::{AdmissionError, KernelError};
use crate::core::types::{KernelResult, Pid, Size};
use log::{info, warn};
use parking_lot::Mutex;
use std::sync::Arc;

pub struct Kernel {
    state: Arc<Mutex<KernelState>>,
    stats: Arc<AtomicKernelStats>,
    task: Mutex<Option<EngineTask>>,
    pacing: PacingMode,
}

impl Kernel {
    pub fn builder(config: KernelConfig) -> KernelBuilder {
        KernelBuilder::new(config)
    }

    /// Build with an entropy-seeded (or config-seeded) instruction mix
    pub fn new(config: KernelConfig) -> KernelResult<Self> {
        KernelBuilder::new(config).build()
    }

    /// Fill the machine with default-size processes. Returns how many were
    /// admitted.
    pub fn boot(&self) -> usize {
        self.state.lock().preload()
    }

    /// Start the tick loop. Must be called inside a tokio runtime.
    /// A second call while running is a no-op.
    pub fn start(&self) {
        let mut task = self.task.lock();
        if task.is_some() {
            warn!("Engine already running");
            return;
        }
        *task = Some(EngineTask::spawn(Arc::clone(&self.state), self.pacing));
    }

    /// Stop the tick loop and wait for it to exit. The tick in progress
    /// finishes first.
    pub async fn stop(&self) {
        let task = self.task.lock().take();
        if let Some(task) = task {
            task.shutdown().await;
            info!("Kernel stopped at tick {}", self.state.lock().current_tick());
        }
    }

    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .as_ref()
            .map_or(false, |task| !task.is_finished())
    }

    pub fn pause(&self) {
        if let Some(task) = self.task.lock().as_ref() {
            task.pause();
        }
    }

    pub fn resume(&self) {
        if let Some(task) = self.task.lock().as_ref() {
            task.resume();
        }
    }

    /// Admit a process of `size` units
    pub fn request_new_process(&self, size: Size) -> Result<Pid, AdmissionError> {
        self.state.lock().admit(size)
    }

    /// Admit a process of the configured default size
    pub fn request_default_process(&self) -> Result<Pid, AdmissionError> {
        self.state.lock().admit_default()
    }

    /// Multiply the clock rate by `factor`; returns the new rate.
    /// The running loop picks it up immediately.
    pub fn set_speed(&self, factor: f64) -> f64 {
        let speed = self.state.lock().change_speed(factor);
        if let Some(task) = self.task.lock().as_ref() {
            task.notify_speed_change();
        }
        speed
    }

    pub fn snapshot(&self) -> KernelSnapshot {
        self.state.lock().snapshot()
    }

    /// Run one tick synchronously. Used for stepping the machine without
    /// the engine task.
    pub fn tick(&self) -> TickReport {
        self.state.lock().tick()
    }

    pub fn stats(&self) -> KernelStats {
        self.stats.snapshot()
    }

    #[inline]
    pub fn pacing(&self) -> PacingMode {
        self.pacing
    }

    /// Verify state/membership agreement and memory accounting
    pub fn check_invariants(&self) -> KernelResult<()> {
        let violations = self.state.lock().invariant_violations();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(KernelError::Internal(violations.join("; ")))
        }
    }
}

impl std::fmt::Debug for Kernel {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Kernel")
            .field("state", &*self.state.lock())
            .field("pacing", &self.pacing)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::ScriptedSource;

    fn kernel(config: KernelConfig) -> Kernel {
        Kernel::builder(config)
            .with_random_source(ScriptedSource::constant(0.9))
            .with_pacing(PacingMode::Immediate)
            .build()
            .unwrap()
    }

    #[test]
    fn test_boot_fills_table() {
        let kernel = kernel(KernelConfig::new(1024, 10));
        assert_eq!(kernel.boot(), 8);
        let snapshot = kernel.snapshot();
        assert_eq!(snapshot.used_memory, 1024);
        assert_eq!(snapshot.process_count, 8);
        assert!(kernel.check_invariants().is_ok());
    }

    #[test]
    fn test_admission_counts_in_stats() {
        let kernel = kernel(KernelConfig::new(100, 2));
        kernel.request_new_process(60).unwrap();
        assert!(kernel.request_new_process(60).is_err());
        let stats = kernel.stats();
        assert_eq!(stats.admissions, 1);
        assert_eq!(stats.rejected_admissions, 1);
    }

    #[tokio::test]
    async fn test_start_is_idempotent() {
        let kernel = kernel(KernelConfig::new(256, 2));
        kernel.start();
        kernel.start();
        assert!(kernel.is_running());
        kernel.stop().await;
        assert!(!kernel.is_running());
    }

    #[test]
    fn test_check_invariants_reports_stray_allocation() {
        let kernel = kernel(KernelConfig::new(256, 2));
        kernel.request_new_process(16).unwrap();
        kernel.state.lock().memory.allocate(99, 8).unwrap();

        match kernel.check_invariants() {
            Err(KernelError::Internal(msg)) => assert!(msg.contains("2 allocations for 1 processes")),
            other => panic!("expected invariant violation, got {:?}", other),
        }
    }

    #[test]
    fn test_set_speed_without_engine() {
        let kernel = kernel(KernelConfig::new(256, 2));
        assert_eq!(kernel.set_speed(1.5), 1.5);
        assert_eq!(kernel.snapshot().speed_hz, 1.5);
    }
}
