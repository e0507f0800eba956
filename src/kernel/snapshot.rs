/*!
 * Kernel Snapshot
 * Read-only, tick-consistent view of the machine for rendering
 */

use super::state::KernelState;
use crate::core::types::{Pid, Size, Tick};
use crate::cpu::CommandKind;
use crate::process::ProcessInfo;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct KernelSnapshot {
    pub tick: Tick,
    pub speed_hz: f64,
    pub used_memory: Size,
    pub total_memory: Size,
    pub process_count: usize,
    pub max_processes: usize,
    pub active_process: Option<ProcessInfo>,
    pub ready_pids: Vec<Pid>,
    pub blocked_pids: Vec<Pid>,
    pub blocked_count: usize,
    pub last_command: Option<CommandKind>,
    /// Size of the candidate the loader would admit next
    pub next_task_size: Option<Size>,
    /// Every process in the table, sorted by PID
    pub processes: Vec<ProcessInfo>,
}

impl KernelSnapshot {
    #[inline]
    pub fn cpu_busy(&self) -> bool {
        self.active_process.is_some()
    }

    pub fn process(&self, pid: Pid) -> Option<&ProcessInfo> {
        self.processes.iter().find(|p| p.pid == pid)
    }

    pub fn free_memory(&self) -> Size {
        self.total_memory - self.used_memory
    }
}

impl KernelState {
    pub fn snapshot(&self) -> KernelSnapshot {
        let blocked_pids = self.blocked.pids();
        KernelSnapshot {
            tick: self.tick,
            speed_hz: self.speed_hz,
            used_memory: self.memory.used(),
            total_memory: self.memory.total(),
            process_count: self.table.len(),
            max_processes: self.table.capacity(),
            active_process: self
                .active
                .and_then(|pid| self.table.get(pid))
                .map(|p| p.info()),
            ready_pids: self.scheduler.pids(),
            blocked_count: blocked_pids.len(),
            blocked_pids,
            last_command: self.cpu.last_command(),
            next_task_size: self.next_task_size(),
            processes: self.table.infos(),
        }
    }
}
