/*!
 * Instruction Kinds
 */

use serde::{Deserialize, Serialize};

/// Outcome class of one fetched instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    /// Pure computation; the process keeps the CPU
    Compute,
    /// I/O request; the process blocks
    Io,
    /// End of program; the process terminates
    Exit,
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let label = match self {
            CommandKind::Compute => "COMPUTE",
            CommandKind::Io => "IO",
            CommandKind::Exit => "EXIT",
        };
        f.pad(label)
    }
}
