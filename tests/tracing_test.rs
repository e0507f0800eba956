/*!
 * Tracing Setup Tests
 * Kept in a binary of its own: installing the global subscriber would
 * route every other test's log records to stderr.
 */

use rr_kernel_sim::monitoring::{init_tracing, CommandSpan};

#[test]
fn test_init_twice_is_harmless() {
    init_tracing();
    init_tracing();

    let span = CommandSpan::new("refresh");
    let _entered = span.enter();
    log::info!("bridged through tracing-log");
    span.record_result(true);
}
