/*!
 * Lock-Free Kernel Statistics
 * Atomic counters readable without taking the engine lock
 */

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Kernel counters snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct KernelStats {
    pub ticks: u64,
    pub dispatches: u64,
    pub preemptions: u64,
    pub io_blocks: u64,
    pub unblocks: u64,
    pub terminations: u64,
    pub admissions: u64,
    pub rejected_admissions: u64,
}

/// Atomic kernel statistics for lock-free updates
///
/// # Performance
/// - Cache-line aligned to prevent false sharing
/// - All operations use relaxed ordering; counters are independent
#[repr(C, align(64))]
#[derive(Debug, Default)]
pub struct AtomicKernelStats {
    ticks: AtomicU64,
    dispatches: AtomicU64,
    preemptions: AtomicU64,
    io_blocks: AtomicU64,
    unblocks: AtomicU64,
    terminations: AtomicU64,
    admissions: AtomicU64,
    rejected_admissions: AtomicU64,
}

impl AtomicKernelStats {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Performance
    /// Hot path - called once per tick
    #[inline(always)]
    pub fn inc_ticks(&self) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_dispatches(&self) {
        self.dispatches.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_preemptions(&self) {
        self.preemptions.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_io_blocks(&self) {
        self.io_blocks.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn add_unblocks(&self, count: u64) {
        self.unblocks.fetch_add(count, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_terminations(&self) {
        self.terminations.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn inc_admissions(&self) {
        self.admissions.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn inc_rejected_admissions(&self) {
        self.rejected_admissions.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of current stats
    ///
    /// # Note
    /// Counters are read one by one and may be mutually off by a tick.
    /// Use the kernel snapshot for a consistent view of the machine.
    #[inline]
    pub fn snapshot(&self) -> KernelStats {
        KernelStats {
            ticks: self.ticks.load(Ordering::Relaxed),
            dispatches: self.dispatches.load(Ordering::Relaxed),
            preemptions: self.preemptions.load(Ordering::Relaxed),
            io_blocks: self.io_blocks.load(Ordering::Relaxed),
            unblocks: self.unblocks.load(Ordering::Relaxed),
            terminations: self.terminations.load(Ordering::Relaxed),
            admissions: self.admissions.load(Ordering::Relaxed),
            rejected_admissions: self.rejected_admissions.load(Ordering::Relaxed),
        }
    }
}
