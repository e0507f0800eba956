/*!
 * Scheduler Core Operations
 * Enqueue, dequeue and remove operations
 */

use super::Scheduler;
use crate::core::types::Pid;
use crate::process::types::{Process, ProcessState};
use log::{debug, warn};

impl Scheduler {
    /// Append a process at the tail of the ready queue.
    ///
    /// Only processes that are new, running or already ready may join; the
    /// process is moved to `Ready`. Returns `false` (and changes nothing) for
    /// blocked or terminated processes and for PIDs already queued.
    pub fn enqueue(&mut self, process: &mut Process) -> bool {
        let pid = process.pid();
        if !process.state().can_be_scheduled() {
            warn!(
                "Refusing to queue PID {} in state {}",
                pid,
                process.state()
            );
            return false;
        }
        if !self.queued.insert(pid) {
            warn!("PID {} is already in the ready queue", pid);
            return false;
        }

        process.set_state(ProcessState::Ready);
        self.rr_queue.push_back(pid);
        debug!("PID {} queued (ready: {})", pid, self.rr_queue.len());
        true
    }

    /// Pop the head of the ready queue. The caller moves it onward.
    pub fn dequeue_next(&mut self) -> Option<Pid> {
        let pid = self.rr_queue.pop_front()?;
        self.queued.remove(&pid);
        Some(pid)
    }

    /// Remove a queued PID if present - O(1) check + O(n) scan
    pub fn remove(&mut self, pid: Pid) -> bool {
        if !self.queued.remove(&pid) {
            return false;
        }
        if let Some(pos) = self.rr_queue.iter().position(|&p| p == pid) {
            self.rr_queue.remove(pos);
        }
        debug!("PID {} removed from ready queue", pid);
        true
    }

    #[inline]
    pub fn has_ready(&self) -> bool {
        !self.rr_queue.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rr_queue.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rr_queue.is_empty()
    }

    #[inline]
    pub fn contains(&self, pid: Pid) -> bool {
        self.queued.contains(&pid)
    }

    /// Queued PIDs in dispatch order
    pub fn pids(&self) -> Vec<Pid> {
        self.rr_queue.iter().copied().collect()
    }
}
