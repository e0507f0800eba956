/*!
 * Blocked Set
 * Processes waiting out an I/O countdown
 */

use super::table::ProcessTable;
use super::types::Process;
use crate::core::types::Pid;
use log::{debug, trace};

/// PIDs of processes in `IoWait`, kept in blocking order so that
/// processes unblocked on the same tick requeue in a stable order.
#[derive(Debug, Default)]
pub struct BlockedSet {
    waiting: Vec<Pid>,
}

impl BlockedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move a process into `IoWait` for `io_duration` ticks
    pub fn block(&mut self, process: &mut Process, io_duration: u32) {
        let pid = process.pid();
        process.start_io(io_duration);
        if !self.waiting.contains(&pid) {
            self.waiting.push(pid);
        }
        debug!("PID {} blocked on I/O for {} ticks", pid, io_duration);
    }

    /// Count one tick off every timer and release the expired ones.
    ///
    /// A countdown at or below zero, including a malformed negative one,
    /// means the process is ready now. PIDs the table no longer knows are
    /// dropped.
    pub fn age(&mut self, table: &mut ProcessTable) -> Vec<Pid> {
        let mut expired = Vec::new();
        self.waiting.retain(|&pid| match table.get_mut(pid) {
            Some(process) => {
                let remaining = process.age_io();
                trace!("PID {} I/O remaining: {}", pid, remaining);
                if remaining <= 0 {
                    expired.push(pid);
                    false
                } else {
                    true
                }
            }
            None => false,
        });
        expired
    }

    pub fn remove(&mut self, pid: Pid) -> bool {
        let before = self.waiting.len();
        self.waiting.retain(|&p| p != pid);
        self.waiting.len() < before
    }

    #[inline]
    pub fn contains(&self, pid: Pid) -> bool {
        self.waiting.contains(&pid)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.waiting.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.waiting.is_empty()
    }

    pub fn pids(&self) -> Vec<Pid> {
        self.waiting.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::types::ProcessState;

    fn table_with(count: usize) -> (ProcessTable, Vec<Pid>) {
        let mut table = ProcessTable::new(count);
        let pids = (0..count)
            .map(|_| table.create_and_register(1, 10).unwrap())
            .collect();
        (table, pids)
    }

    #[test]
    fn test_countdown_expires() {
        let (mut table, pids) = table_with(1);
        let mut blocked = BlockedSet::new();
        blocked.block(table.get_mut(pids[0]).unwrap(), 2);
        assert_eq!(table.get(pids[0]).unwrap().state(), ProcessState::IoWait);

        assert!(blocked.age(&mut table).is_empty());
        assert_eq!(table.get(pids[0]).unwrap().io_time_remaining(), 1);
        assert_eq!(blocked.age(&mut table), vec![pids[0]]);
        assert!(blocked.is_empty());
    }

    #[test]
    fn test_negative_countdown_unblocks_immediately() {
        let (mut table, pids) = table_with(1);
        let mut blocked = BlockedSet::new();
        let process = table.get_mut(pids[0]).unwrap();
        blocked.block(process, 5);
        process.set_io_time_remaining(-4);

        assert_eq!(blocked.age(&mut table), vec![pids[0]]);
    }

    #[test]
    fn test_release_order_follows_blocking_order() {
        let (mut table, pids) = table_with(3);
        let mut blocked = BlockedSet::new();
        blocked.block(table.get_mut(pids[2]).unwrap(), 1);
        blocked.block(table.get_mut(pids[0]).unwrap(), 1);
        blocked.block(table.get_mut(pids[1]).unwrap(), 3);

        assert_eq!(blocked.age(&mut table), vec![pids[2], pids[0]]);
        assert_eq!(blocked.pids(), vec![pids[1]]);
    }

    #[test]
    fn test_missing_process_dropped() {
        let (mut table, pids) = table_with(1);
        let mut blocked = BlockedSet::new();
        blocked.block(table.get_mut(pids[0]).unwrap(), 5);
        table.remove(pids[0]);

        assert!(blocked.age(&mut table).is_empty());
        assert!(blocked.is_empty());
    }
}
