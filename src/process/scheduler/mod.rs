/*!
 * CPU Scheduler
 * Round-robin ready queue: enqueue at the tail, dispatch from the head
 */

use crate::core::types::Pid;
use ahash::AHashSet;
use std::collections::VecDeque;

mod operations;

/// Ready queue
///
/// Holds PIDs (references into the process table), never the processes
/// themselves. A PID is queued at most once.
#[derive(Debug, Default)]
pub struct Scheduler {
    // Round-robin queue
    rr_queue: VecDeque<Pid>,

    // Membership index for O(1) duplicate checks
    queued: AHashSet<Pid>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::types::{Process, ProcessState};

    fn process(pid: Pid) -> Process {
        Process::new(pid, 1, 10)
    }

    #[test]
    fn test_round_robin_basic() {
        let mut scheduler = Scheduler::new();
        let mut p1 = process(1);
        let mut p2 = process(2);
        let mut p3 = process(3);

        assert!(scheduler.enqueue(&mut p1));
        assert!(scheduler.enqueue(&mut p2));
        assert!(scheduler.enqueue(&mut p3));
        assert_eq!(scheduler.len(), 3);

        // Should dispatch in FIFO order
        assert_eq!(scheduler.dequeue_next(), Some(1));
        assert_eq!(scheduler.dequeue_next(), Some(2));
        assert_eq!(scheduler.dequeue_next(), Some(3));
        assert_eq!(scheduler.dequeue_next(), None);
    }

    #[test]
    fn test_requeue_goes_to_tail() {
        let mut scheduler = Scheduler::new();
        let mut p1 = process(1);
        let mut p2 = process(2);
        scheduler.enqueue(&mut p1);
        scheduler.enqueue(&mut p2);

        assert_eq!(scheduler.dequeue_next(), Some(1));
        p1.dispatch();
        assert!(scheduler.enqueue(&mut p1));
        assert_eq!(p1.state(), ProcessState::Ready);
        assert_eq!(scheduler.pids(), vec![2, 1]);
    }

    #[test]
    fn test_blocked_process_rejected() {
        let mut scheduler = Scheduler::new();
        let mut p1 = process(1);
        p1.start_io(3);

        assert!(!scheduler.enqueue(&mut p1));
        assert_eq!(p1.state(), ProcessState::IoWait);
        assert!(!scheduler.has_ready());
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut scheduler = Scheduler::new();
        let mut p1 = process(1);
        assert!(scheduler.enqueue(&mut p1));
        assert!(!scheduler.enqueue(&mut p1));
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn test_remove_process() {
        let mut scheduler = Scheduler::new();
        let mut p1 = process(1);
        let mut p2 = process(2);
        scheduler.enqueue(&mut p1);
        scheduler.enqueue(&mut p2);

        assert!(scheduler.remove(1));
        assert_eq!(scheduler.len(), 1);
        assert!(!scheduler.contains(1));

        assert!(!scheduler.remove(999)); // Non-existent
    }

    #[test]
    fn test_empty_scheduler() {
        let mut scheduler = Scheduler::new();
        assert!(scheduler.is_empty());
        assert!(!scheduler.has_ready());
        assert_eq!(scheduler.dequeue_next(), None);
    }
}
