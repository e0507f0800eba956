/*!
 * Admission Coordinator
 * All-or-nothing process creation across the table, the ledger and the queue
 */

use super::state::KernelState;
use crate::core::errors::AdmissionError;
use crate::core::types::{Pid, Size};
use log::{info, warn};

impl KernelState {
    /// Admit a new process of `size` units.
    ///
    /// Checks table capacity, then free memory. If the ledger still refuses
    /// the allocation after registration, the table entry is rolled back.
    /// On error neither the table nor the ledger has changed.
    pub fn admit(&mut self, size: Size) -> Result<Pid, AdmissionError> {
        let result = self.try_admit(size);
        match &result {
            Ok(pid) => {
                self.stats.inc_admissions();
                info!(
                    "Admitted PID {} ({} units, memory {}/{})",
                    pid,
                    size,
                    self.memory.used(),
                    self.memory.total()
                );
            }
            Err(e) => {
                self.stats.inc_rejected_admissions();
                warn!("Admission of {} units rejected: {}", size, e);
            }
        }
        result
    }

    fn try_admit(&mut self, size: Size) -> Result<Pid, AdmissionError> {
        if self.table.is_full() {
            return Err(AdmissionError::TableFull {
                capacity: self.table.capacity(),
            });
        }
        if !self.memory.has_space(size) {
            return Err(AdmissionError::OutOfMemory {
                requested: size,
                available: self.memory.available(),
            });
        }

        let pid = self.table.create_and_register(size, self.program_length)?;

        if let Err(e) = self.memory.allocate(pid, size) {
            self.table.remove(pid);
            warn!("Rolled back PID {} after allocation failure: {}", pid, e);
            return Err(AdmissionError::AllocationFailed { pid, size });
        }

        if let Some(process) = self.table.get_mut(pid) {
            self.scheduler.enqueue(process);
        }
        Ok(pid)
    }

    /// Admit a process of the configured default size
    pub fn admit_default(&mut self) -> Result<Pid, AdmissionError> {
        self.admit(self.default_process_size)
    }

    /// Size of the candidate that would be loaded next; `None` while the
    /// table is full
    pub fn next_task_size(&self) -> Option<Size> {
        if self.table.is_full() {
            None
        } else {
            Some(self.default_process_size)
        }
    }

    /// Boot-time loading: admit default-size processes until the table or
    /// memory runs out. Returns how many were loaded.
    pub fn preload(&mut self) -> usize {
        let mut loaded = 0;
        while let Some(size) = self.next_task_size() {
            if !self.memory.has_space(size) {
                break;
            }
            if self.admit(size).is_err() {
                break;
            }
            loaded += 1;
        }
        info!(
            "Boot preload complete: {} processes, memory {}/{}",
            loaded,
            self.memory.used(),
            self.memory.total()
        );
        loaded
    }
}
