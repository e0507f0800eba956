/*!
 * Instruction Unit
 *
 * Retires one instruction per call for the process on the CPU. There is no
 * real instruction stream: each fetch is classified as compute, I/O or exit,
 * the first two drawn from an injected random source.
 */

pub mod command;
pub mod source;

pub use command::CommandKind;
pub use source::{RandomSource, ScriptedSource, SeededSource};

use crate::process::Process;
use log::trace;

/// Simulated CPU
pub struct Cpu {
    io_probability: f64,
    source: Box<dyn RandomSource>,
    last_command: Option<CommandKind>,
}

impl Cpu {
    pub fn new(io_probability: f64, source: Box<dyn RandomSource>) -> Self {
        Self {
            io_probability,
            source,
            last_command: None,
        }
    }

    /// Classify the next instruction of `process` without retiring it
    pub fn fetch(&mut self, process: &Process) -> CommandKind {
        if process.program_finished() {
            return CommandKind::Exit;
        }
        if self.source.next_unit() < self.io_probability {
            CommandKind::Io
        } else {
            CommandKind::Compute
        }
    }

    /// Fetch and retire one instruction.
    ///
    /// The program counter and quantum tick count advance by exactly one
    /// whatever the instruction kind.
    pub fn execute(&mut self, process: &mut Process) -> CommandKind {
        let command = self.fetch(process);
        process.retire_instruction();
        self.last_command = Some(command);
        trace!(
            "PID {} executed {} (pc: {}/{})",
            process.pid(),
            command,
            process.program_counter(),
            process.program_length()
        );
        command
    }

    pub fn last_command(&self) -> Option<CommandKind> {
        self.last_command
    }
}

impl std::fmt::Debug for Cpu {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Cpu")
            .field("io_probability", &self.io_probability)
            .field("last_command", &self.last_command)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_when_program_finished() {
        let mut cpu = Cpu::new(1.0, Box::new(ScriptedSource::constant(0.0)));
        let mut process = Process::new(1, 1, 0);
        assert_eq!(cpu.execute(&mut process), CommandKind::Exit);
        assert_eq!(process.program_counter(), 1);
        assert_eq!(cpu.last_command(), Some(CommandKind::Exit));
    }

    #[test]
    fn test_draw_below_probability_is_io() {
        let mut cpu = Cpu::new(0.5, Box::new(ScriptedSource::new([0.2, 0.7])));
        let mut process = Process::new(1, 1, 10);
        assert_eq!(cpu.execute(&mut process), CommandKind::Io);
        assert_eq!(cpu.execute(&mut process), CommandKind::Compute);
        assert_eq!(process.program_counter(), 2);
        assert_eq!(process.ticks_in_quantum(), 2);
    }

    #[test]
    fn test_zero_probability_never_blocks() {
        let mut cpu = Cpu::new(0.0, Box::new(SeededSource::from_seed(7)));
        let mut process = Process::new(1, 1, 100);
        for _ in 0..100 {
            assert_eq!(cpu.execute(&mut process), CommandKind::Compute);
        }
        assert_eq!(cpu.execute(&mut process), CommandKind::Exit);
    }

    #[test]
    fn test_full_probability_always_blocks() {
        let mut cpu = Cpu::new(1.0, Box::new(SeededSource::from_seed(7)));
        let process = Process::new(1, 1, 5);
        for _ in 0..20 {
            assert_eq!(cpu.fetch(&process), CommandKind::Io);
        }
    }
}
