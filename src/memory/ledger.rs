/*!
 * Memory Ledger
 * Capacity accounting with one allocation per process
 */

use super::types::{MemoryError, MemoryPressure, MemoryResult, MemoryStats};
use crate::core::types::{Pid, Size};
use ahash::AHashMap;
use log::{debug, warn};

/// Tracks total and used capacity plus each process's allocation.
///
/// `used` always equals the sum of the recorded allocations and never
/// exceeds `total`.
#[derive(Debug, Clone)]
pub struct MemoryLedger {
    total: Size,
    used: Size,
    allocations: AHashMap<Pid, Size>,
}

impl MemoryLedger {
    pub fn new(total: Size) -> Self {
        debug!("Memory ledger initialized with {} units", total);
        Self {
            total,
            used: 0,
            allocations: AHashMap::new(),
        }
    }

    #[inline]
    pub fn has_space(&self, size: Size) -> bool {
        self.available() >= size
    }

    /// Record an allocation for `pid`. Nothing changes on failure.
    pub fn allocate(&mut self, pid: Pid, size: Size) -> MemoryResult<()> {
        if self.allocations.contains_key(&pid) {
            return Err(MemoryError::AlreadyAllocated(pid));
        }
        if !self.has_space(size) {
            return Err(MemoryError::OutOfMemory {
                requested: size,
                available: self.available(),
            });
        }

        let before = self.pressure();
        self.allocations.insert(pid, size);
        self.used += size;

        let after = self.pressure();
        if after >= MemoryPressure::High && after > before {
            warn!(
                "Memory pressure {}: PID {} took {} units ({} / {})",
                after, pid, size, self.used, self.total
            );
        } else {
            debug!("Allocated {} units for PID {}", size, pid);
        }
        Ok(())
    }

    /// Release the allocation held by `pid`, returning its size.
    /// A second call for the same pid fails and changes nothing.
    pub fn free(&mut self, pid: Pid) -> MemoryResult<Size> {
        let size = self
            .allocations
            .remove(&pid)
            .ok_or(MemoryError::NotAllocated(pid))?;
        self.used -= size;
        debug!("Freed {} units from PID {}", size, pid);
        Ok(size)
    }

    #[inline]
    pub fn total(&self) -> Size {
        self.total
    }

    #[inline]
    pub fn used(&self) -> Size {
        self.used
    }

    #[inline]
    pub fn available(&self) -> Size {
        self.total - self.used
    }

    pub fn allocation(&self, pid: Pid) -> Option<Size> {
        self.allocations.get(&pid).copied()
    }

    pub fn allocation_count(&self) -> usize {
        self.allocations.len()
    }

    /// Sum of the recorded allocations; equal to `used()` in a consistent ledger
    pub fn recorded_total(&self) -> Size {
        self.allocations.values().sum()
    }

    fn pressure(&self) -> MemoryPressure {
        MemoryPressure::from_ratio(self.usage_ratio())
    }

    fn usage_ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.used as f64 / self.total as f64
    }

    pub fn stats(&self) -> MemoryStats {
        MemoryStats {
            total_memory: self.total,
            used_memory: self.used,
            available_memory: self.available(),
            usage_percentage: self.usage_ratio() * 100.0,
            allocation_count: self.allocations.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_and_free() {
        let mut ledger = MemoryLedger::new(1024);
        ledger.allocate(1, 100).unwrap();
        assert_eq!(ledger.used(), 100);
        assert_eq!(ledger.allocation(1), Some(100));

        assert_eq!(ledger.free(1), Ok(100));
        assert_eq!(ledger.used(), 0);
        assert_eq!(ledger.allocation(1), None);
    }

    #[test]
    fn test_duplicate_pid_rejected() {
        let mut ledger = MemoryLedger::new(1024);
        ledger.allocate(7, 10).unwrap();
        assert_eq!(ledger.allocate(7, 10), Err(MemoryError::AlreadyAllocated(7)));
        assert_eq!(ledger.used(), 10);
    }

    #[test]
    fn test_exact_fit() {
        let mut ledger = MemoryLedger::new(256);
        assert!(ledger.has_space(256));
        ledger.allocate(1, 256).unwrap();
        assert!(!ledger.has_space(1));
        assert!(ledger.has_space(0));
    }

    #[test]
    fn test_pressure_levels() {
        let mut ledger = MemoryLedger::new(100);
        ledger.allocate(1, 85).unwrap();
        assert_eq!(ledger.stats().memory_pressure(), MemoryPressure::High);
        ledger.allocate(2, 10).unwrap();
        assert_eq!(ledger.stats().memory_pressure(), MemoryPressure::Critical);
    }
}
