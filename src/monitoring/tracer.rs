/*!
 * Structured Tracing
 * Subscriber setup and console-command spans using the tracing crate
 *
 * Output goes to stderr so it never interleaves with the rendered
 * snapshots on stdout. Library code logs through the `log` facade, which
 * the `tracing-log` bridge forwards into the same subscriber.
 */

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, info, span, warn, Level};
use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static COMMAND_SEQ: AtomicU64 = AtomicU64::new(1);

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - KERNEL_TRACE_JSON: Enable JSON output (default: false)
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var("KERNEL_TRACE_JSON")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_names(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_span_events(FmtSpan::NONE)
                    .compact(),
            )
            .try_init()
    };

    match result {
        Ok(()) => info!(json = use_json, "Structured tracing initialized"),
        Err(e) => debug!("Tracing subscriber already installed: {}", e),
    }
}

/// Span covering one console command from parse to render
pub struct CommandSpan {
    span: tracing::Span,
    start: Instant,
    seq: u64,
}

impl CommandSpan {
    pub fn new(command: &str) -> Self {
        let seq = COMMAND_SEQ.fetch_add(1, Ordering::Relaxed);
        let span = span!(
            Level::DEBUG,
            "console_command",
            seq = seq,
            command = command,
            result = tracing::field::Empty,
            duration_us = tracing::field::Empty,
        );

        debug!(parent: &span, seq = seq, command = command, "command received");

        Self {
            span,
            start: Instant::now(),
            seq,
        }
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn record_result(&self, success: bool) {
        self.span
            .record("result", if success { "success" } else { "error" });
    }

    pub fn record_error(&self, error: &str) {
        self.span.record("result", "error");
        warn!(parent: &self.span, seq = self.seq, error = error, "command failed");
    }

    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }
}

impl Drop for CommandSpan {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        self.span.record("duration_us", elapsed.as_micros() as u64);
        debug!(
            parent: &self.span,
            seq = self.seq,
            duration_us = elapsed.as_micros() as u64,
            "command completed"
        );
    }
}
