/*!
 * Memory Module
 * Memory admission accounting
 */

pub mod ledger;
pub mod types;

// Re-export for convenience
pub use ledger::MemoryLedger;
pub use types::*;
