/*!
 * Engine State
 *
 * Everything the tick loop and the control surface share: the memory
 * ledger, the process table, the ready queue, the blocked set, the CPU and
 * the active slot. The kernel keeps one `KernelState` behind a single mutex,
 * so a tick, an admission or a snapshot always sees the whole machine at one
 * point in time.
 */

use super::pacing::{is_valid_factor, scale_speed};
use super::stats::AtomicKernelStats;
use crate::core::config::KernelConfig;
use crate::core::types::{Pid, Size, Tick};
use crate::cpu::{CommandKind, Cpu, RandomSource};
use crate::memory::MemoryLedger;
use crate::process::{BlockedSet, ProcessState, ProcessTable, Scheduler};
use log::{debug, info, trace, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// What happened to the active process during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickOutcome {
    /// Nothing was runnable
    Idle,
    /// The active process keeps the CPU
    Continued,
    /// Quantum used up; back to the tail of the ready queue
    Preempted,
    /// Issued I/O; moved to the blocked set
    Blocked,
    /// Reached the end of its program; removed
    Terminated,
}

/// Transitions applied by one tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    pub tick: Tick,
    /// Processes whose I/O finished, in requeue order
    pub unblocked: Vec<Pid>,
    /// Process put on the CPU this tick, if the CPU was idle
    pub dispatched: Option<Pid>,
    /// Process that retired an instruction
    pub ran: Option<Pid>,
    pub command: Option<CommandKind>,
    pub outcome: TickOutcome,
}

/// Shared simulation state
pub struct KernelState {
    pub(super) memory: MemoryLedger,
    pub(super) table: ProcessTable,
    pub(super) scheduler: Scheduler,
    pub(super) blocked: BlockedSet,
    pub(super) cpu: Cpu,
    pub(super) active: Option<Pid>,
    pub(super) speed_hz: f64,
    pub(super) quantum_length: u32,
    pub(super) io_duration: u32,
    pub(super) program_length: u64,
    pub(super) default_process_size: Size,
    pub(super) tick: Tick,
    pub(super) stats: Arc<AtomicKernelStats>,
}

impl KernelState {
    pub fn new(
        config: &KernelConfig,
        source: Box<dyn RandomSource>,
        stats: Arc<AtomicKernelStats>,
    ) -> Self {
        Self {
            memory: MemoryLedger::new(config.memory),
            table: ProcessTable::new(config.max_processes),
            scheduler: Scheduler::new(),
            blocked: BlockedSet::new(),
            cpu: Cpu::new(config.io_command_probability, source),
            active: None,
            speed_hz: config.clamped_speed_hz(),
            quantum_length: config.quantum_length,
            io_duration: config.io_duration,
            program_length: config.program_length,
            default_process_size: config.default_process_size,
            tick: 0,
            stats,
        }
    }

    /// Advance simulated time by one tick.
    ///
    /// Order: age the blocked set, dispatch if idle, retire one instruction,
    /// then route the result to terminate, block, preempt or continue.
    pub fn tick(&mut self) -> TickReport {
        self.tick += 1;
        self.stats.inc_ticks();

        let unblocked = self.release_blocked();
        let dispatched = if self.active.is_none() {
            self.dispatch_next()
        } else {
            None
        };

        let mut report = TickReport {
            tick: self.tick,
            unblocked,
            dispatched,
            ran: None,
            command: None,
            outcome: TickOutcome::Idle,
        };

        let Some(pid) = self.active else {
            return report;
        };
        let Some(process) = self.table.get_mut(pid) else {
            warn!("Active PID {} missing from process table, idling CPU", pid);
            self.active = None;
            return report;
        };

        let command = self.cpu.execute(process);
        let quantum_spent = process.ticks_in_quantum() >= self.quantum_length;
        report.ran = Some(pid);
        report.command = Some(command);

        report.outcome = match command {
            CommandKind::Exit => {
                self.terminate(pid);
                TickOutcome::Terminated
            }
            CommandKind::Io => {
                self.block_active(pid);
                TickOutcome::Blocked
            }
            CommandKind::Compute if quantum_spent => {
                self.preempt_active(pid);
                TickOutcome::Preempted
            }
            CommandKind::Compute => TickOutcome::Continued,
        };

        trace!(
            "Tick {}: PID {} {} -> {:?}",
            report.tick,
            pid,
            command,
            report.outcome
        );
        report
    }

    /// Step 1: count down I/O timers and requeue the finished ones
    fn release_blocked(&mut self) -> Vec<Pid> {
        let expired = self.blocked.age(&mut self.table);
        for &pid in &expired {
            if let Some(process) = self.table.get_mut(pid) {
                process.set_state(ProcessState::Ready);
                self.scheduler.enqueue(process);
                debug!("PID {} finished I/O", pid);
            }
        }
        if !expired.is_empty() {
            self.stats.add_unblocks(expired.len() as u64);
        }
        expired
    }

    /// Step 2: put the head of the ready queue on the CPU
    fn dispatch_next(&mut self) -> Option<Pid> {
        while let Some(pid) = self.scheduler.dequeue_next() {
            match self.table.get_mut(pid) {
                Some(process) => {
                    process.dispatch();
                    self.active = Some(pid);
                    self.stats.inc_dispatches();
                    debug!("Dispatched PID {}", pid);
                    return Some(pid);
                }
                None => warn!("Dropping stale PID {} from ready queue", pid),
            }
        }
        None
    }

    fn terminate(&mut self, pid: Pid) {
        if let Err(e) = self.memory.free(pid) {
            warn!("Terminating PID {}: {}", pid, e);
        }
        self.scheduler.remove(pid);
        self.blocked.remove(pid);
        if let Some(mut process) = self.table.remove(pid) {
            process.set_state(ProcessState::Terminated);
            info!(
                "PID {} terminated after {} instructions, {} units released",
                pid,
                process.program_counter(),
                process.size()
            );
        }
        if self.active == Some(pid) {
            self.active = None;
        }
        self.stats.inc_terminations();
    }

    /// The unused part of the quantum is discarded, not carried over.
    fn block_active(&mut self, pid: Pid) {
        if let Some(process) = self.table.get_mut(pid) {
            self.blocked.block(process, self.io_duration);
        }
        self.active = None;
        self.stats.inc_io_blocks();
    }

    fn preempt_active(&mut self, pid: Pid) {
        if let Some(process) = self.table.get_mut(pid) {
            self.scheduler.enqueue(process);
        }
        self.active = None;
        self.stats.inc_preemptions();
        debug!("PID {} preempted after {} ticks", pid, self.quantum_length);
    }

    /// Multiply the clock rate, clamped to the supported range
    pub fn change_speed(&mut self, factor: f64) -> f64 {
        if !is_valid_factor(factor) {
            warn!("Invalid speed factor {}, clamping", factor);
        }
        self.speed_hz = scale_speed(self.speed_hz, factor);
        info!("Clock rate set to {:.2} ticks/s", self.speed_hz);
        self.speed_hz
    }

    #[inline]
    pub fn speed_hz(&self) -> f64 {
        self.speed_hz
    }

    #[inline]
    pub fn current_tick(&self) -> Tick {
        self.tick
    }

    #[inline]
    pub fn active_pid(&self) -> Option<Pid> {
        self.active
    }

    /// List every broken state/membership or memory accounting rule.
    /// Empty when the machine is consistent.
    pub fn invariant_violations(&self) -> Vec<String> {
        let mut violations = Vec::new();

        if self.memory.used() > self.memory.total() {
            violations.push(format!(
                "used memory {} exceeds total {}",
                self.memory.used(),
                self.memory.total()
            ));
        }
        if self.memory.used() != self.memory.recorded_total() {
            violations.push(format!(
                "used memory {} differs from recorded allocations {}",
                self.memory.used(),
                self.memory.recorded_total()
            ));
        }
        if self.memory.allocation_count() != self.table.len() {
            violations.push(format!(
                "{} allocations for {} processes",
                self.memory.allocation_count(),
                self.table.len()
            ));
        }

        for info in self.table.infos() {
            let pid = info.pid;
            let queued = self.scheduler.contains(pid);
            let blocked = self.blocked.contains(pid);
            let active = self.active == Some(pid);

            if usize::from(queued) + usize::from(blocked) + usize::from(active) > 1 {
                violations.push(format!("PID {} is in more than one place", pid));
            }
            let consistent = match info.state {
                ProcessState::Ready => queued && !blocked && !active,
                ProcessState::IoWait => blocked && !queued && !active,
                ProcessState::Running => active && !queued && !blocked,
                ProcessState::New | ProcessState::Terminated => !queued && !blocked && !active,
            };
            if !consistent {
                violations.push(format!(
                    "PID {} in state {} (queued: {}, blocked: {}, active: {})",
                    pid, info.state, queued, blocked, active
                ));
            }
            if self.memory.allocation(pid) != Some(info.size) {
                violations.push(format!("PID {} has no matching allocation", pid));
            }
        }

        for pid in self.scheduler.pids().into_iter().chain(self.blocked.pids()) {
            if !self.table.contains(pid) {
                violations.push(format!("PID {} queued but not in table", pid));
            }
        }

        violations
    }
}

impl std::fmt::Debug for KernelState {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("KernelState")
            .field("tick", &self.tick)
            .field("active", &self.active)
            .field("ready", &self.scheduler.pids())
            .field("blocked", &self.blocked.pids())
            .field("processes", &self.table.len())
            .field("used_memory", &self.memory.used())
            .field("speed_hz", &self.speed_hz)
            .finish()
    }
}
