/*!
 * Process Module
 * Process entity, process table, ready queue and blocked set
 */

pub mod blocked;
pub mod scheduler;
pub mod table;
pub mod types;

// Re-export for convenience
pub use blocked::BlockedSet;
pub use scheduler::Scheduler;
pub use table::ProcessTable;
pub use types::{Process, ProcessInfo, ProcessState};
