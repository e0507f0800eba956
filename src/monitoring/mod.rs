/*!
 * Monitoring
 * Tracing setup for the simulator binary
 */

mod tracer;

pub use tracer::{init_tracing, CommandSpan};
