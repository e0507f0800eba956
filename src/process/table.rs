/*!
 * Process Table
 * Owns every live process and the PID sequence
 */

use super::types::{Process, ProcessInfo};
use crate::core::errors::AdmissionError;
use crate::core::types::{Pid, Size};
use ahash::AHashMap;
use log::{debug, info};

/// Bounded pid → process map.
///
/// PIDs come from a sequence owned by the table and are never handed out
/// twice, even after the process leaves.
#[derive(Debug)]
pub struct ProcessTable {
    processes: AHashMap<Pid, Process>,
    next_pid: Pid,
    max_processes: usize,
}

impl ProcessTable {
    pub fn new(max_processes: usize) -> Self {
        Self {
            processes: AHashMap::with_capacity(max_processes),
            next_pid: 1,
            max_processes,
        }
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.processes.len() >= self.max_processes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.processes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.max_processes
    }

    /// Create a process in the `New` state and register it
    pub fn create_and_register(
        &mut self,
        size: Size,
        program_length: u64,
    ) -> Result<Pid, AdmissionError> {
        if self.is_full() {
            return Err(AdmissionError::TableFull {
                capacity: self.max_processes,
            });
        }

        let pid = self.next_pid;
        self.next_pid += 1;
        self.processes
            .insert(pid, Process::new(pid, size, program_length));

        info!(
            "Registered PID {} (size: {}, program length: {})",
            pid, size, program_length
        );
        Ok(pid)
    }

    /// Drop a process from the table for good
    pub fn remove(&mut self, pid: Pid) -> Option<Process> {
        let removed = self.processes.remove(&pid);
        if removed.is_some() {
            debug!("PID {} removed from process table", pid);
        }
        removed
    }

    pub fn get(&self, pid: Pid) -> Option<&Process> {
        self.processes.get(&pid)
    }

    pub(crate) fn get_mut(&mut self, pid: Pid) -> Option<&mut Process> {
        self.processes.get_mut(&pid)
    }

    pub fn contains(&self, pid: Pid) -> bool {
        self.processes.contains_key(&pid)
    }

    /// Snapshot of every process, sorted by PID
    pub fn infos(&self) -> Vec<ProcessInfo> {
        let mut infos: Vec<ProcessInfo> = self.processes.values().map(Process::info).collect();
        infos.sort_by_key(|info| info.pid);
        infos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::types::ProcessState;

    #[test]
    fn test_pids_are_sequential() {
        let mut table = ProcessTable::new(4);
        assert_eq!(table.create_and_register(10, 5), Ok(1));
        assert_eq!(table.create_and_register(10, 5), Ok(2));
        assert_eq!(table.get(2).map(|p| p.state()), Some(ProcessState::New));
    }

    #[test]
    fn test_pids_never_reused() {
        let mut table = ProcessTable::new(1);
        let first = table.create_and_register(1, 1).unwrap();
        assert!(table.remove(first).is_some());
        let second = table.create_and_register(1, 1).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_table_full() {
        let mut table = ProcessTable::new(1);
        table.create_and_register(1, 1).unwrap();
        assert!(table.is_full());
        assert_eq!(
            table.create_and_register(1, 1),
            Err(AdmissionError::TableFull { capacity: 1 })
        );
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_remove_missing() {
        let mut table = ProcessTable::new(1);
        assert!(table.remove(42).is_none());
    }
}
