/*!
 * Process Types
 * The simulated process entity and its read-only view
 */

use crate::core::types::{Pid, Size};
use serde::{Deserialize, Serialize};

/// Process state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    /// Registered but never queued
    New,
    /// Waiting in the ready queue
    Ready,
    /// Holding the CPU
    Running,
    /// Waiting out an I/O countdown in the blocked set
    IoWait,
    /// Finished its program; about to leave the table
    Terminated,
}

impl ProcessState {
    /// States from which a process may (re)join the ready queue
    #[inline(always)]
    pub const fn can_be_scheduled(&self) -> bool {
        matches!(
            self,
            ProcessState::New | ProcessState::Running | ProcessState::Ready
        )
    }
}

impl std::fmt::Display for ProcessState {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let label = match self {
            ProcessState::New => "NEW",
            ProcessState::Ready => "READY",
            ProcessState::Running => "RUNNING",
            ProcessState::IoWait => "IO_WAIT",
            ProcessState::Terminated => "TERMINATED",
        };
        f.pad(label)
    }
}

/// One simulated task, owned by the process table.
///
/// The state is private: it only moves through the crate-internal
/// transitions driven by the scheduler, the blocked set and the engine tick.
#[derive(Debug, Clone)]
pub struct Process {
    pid: Pid,
    size: Size,
    program_counter: u64,
    program_length: u64,
    state: ProcessState,
    ticks_in_quantum: u32,
    io_time_remaining: i64,
}

impl Process {
    pub(crate) fn new(pid: Pid, size: Size, program_length: u64) -> Self {
        Self {
            pid,
            size,
            program_counter: 0,
            program_length,
            state: ProcessState::New,
            ticks_in_quantum: 0,
            io_time_remaining: 0,
        }
    }

    #[inline]
    pub fn pid(&self) -> Pid {
        self.pid
    }

    #[inline]
    pub fn size(&self) -> Size {
        self.size
    }

    #[inline]
    pub fn program_counter(&self) -> u64 {
        self.program_counter
    }

    #[inline]
    pub fn program_length(&self) -> u64 {
        self.program_length
    }

    #[inline]
    pub fn state(&self) -> ProcessState {
        self.state
    }

    #[inline]
    pub fn ticks_in_quantum(&self) -> u32 {
        self.ticks_in_quantum
    }

    #[inline]
    pub fn io_time_remaining(&self) -> i64 {
        self.io_time_remaining
    }

    /// Whether the next fetch will see the end of the program
    #[inline]
    pub fn program_finished(&self) -> bool {
        self.program_counter >= self.program_length
    }

    pub(crate) fn set_state(&mut self, state: ProcessState) {
        self.state = state;
    }

    /// Put the process on the CPU with a fresh quantum
    pub(crate) fn dispatch(&mut self) {
        self.state = ProcessState::Running;
        self.ticks_in_quantum = 0;
    }

    /// Account one retired instruction
    pub(crate) fn retire_instruction(&mut self) {
        self.program_counter += 1;
        self.ticks_in_quantum += 1;
    }

    pub(crate) fn start_io(&mut self, duration: u32) {
        self.state = ProcessState::IoWait;
        self.io_time_remaining = i64::from(duration);
    }

    /// Count one tick off the I/O timer, returning what is left
    pub(crate) fn age_io(&mut self) -> i64 {
        self.io_time_remaining = self.io_time_remaining.saturating_sub(1);
        self.io_time_remaining
    }

    #[cfg(test)]
    pub(crate) fn set_io_time_remaining(&mut self, remaining: i64) {
        self.io_time_remaining = remaining;
    }

    pub fn info(&self) -> ProcessInfo {
        ProcessInfo {
            pid: self.pid,
            state: self.state,
            size: self.size,
            program_counter: self.program_counter,
            program_length: self.program_length,
            ticks_in_quantum: self.ticks_in_quantum,
            io_time_remaining: self.io_time_remaining,
        }
    }
}

/// Point-in-time copy of a process for display and inspection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProcessInfo {
    pub pid: Pid,
    pub state: ProcessState,
    pub size: Size,
    pub program_counter: u64,
    pub program_length: u64,
    pub ticks_in_quantum: u32,
    pub io_time_remaining: i64,
}
