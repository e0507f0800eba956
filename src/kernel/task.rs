/*!
 * Engine Task - Autonomous Tick Loop
 *
 * Background tokio task that advances simulated time. Each iteration takes
 * the state lock, runs exactly one tick and releases it, so admissions and
 * snapshots from the control surface land between ticks, never inside one.
 *
 * # Graceful-with-Fallback Shutdown
 *
 * 1. **Preferred:** `shutdown().await` sends `Shutdown` and awaits the join
 *    handle. The tick in progress (if any) completes first because ticks
 *    never await while holding the lock.
 * 2. **Fallback:** dropping the handle without `shutdown()` aborts the task
 *    and logs a warning.
 */

use super::pacing::{pacing_interval, PacingMode};
use super::state::KernelState;
use log::{info, trace, warn};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::time::Instant;

/// Control messages for the engine task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineCommand {
    /// Stop ticking until resumed
    Pause,
    /// Resume ticking
    Resume,
    /// The clock rate changed; recompute the next tick deadline
    SpeedChanged,
    /// Leave the loop
    Shutdown,
}

/// Handle to the engine background task
pub struct EngineTask {
    command_tx: mpsc::UnboundedSender<EngineCommand>,
    handle: Option<tokio::task::JoinHandle<()>>,
    /// Tracks whether graceful shutdown was initiated (lock-free)
    shutdown_initiated: Arc<AtomicBool>,
}

impl EngineTask {
    /// Spawn the tick loop on the current tokio runtime
    pub fn spawn(state: Arc<Mutex<KernelState>>, pacing: PacingMode) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let shutdown_initiated = Arc::new(AtomicBool::new(false));

        let handle = tokio::spawn(async move {
            run_engine_loop(state, pacing, command_rx).await;
        });

        info!("Engine task spawned ({:?} pacing)", pacing);

        Self {
            command_tx,
            handle: Some(handle),
            shutdown_initiated,
        }
    }

    pub fn pause(&self) {
        let _ = self.command_tx.send(EngineCommand::Pause);
    }

    pub fn resume(&self) {
        let _ = self.command_tx.send(EngineCommand::Resume);
    }

    /// Wake the loop so the next wait uses the new clock rate
    pub fn notify_speed_change(&self) {
        let _ = self.command_tx.send(EngineCommand::SpeedChanged);
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    /// Stop the loop and wait for it to exit.
    /// Consumes self to prevent use-after-shutdown.
    pub async fn shutdown(mut self) {
        self.shutdown_initiated.store(true, Ordering::SeqCst);

        let _ = self.command_tx.send(EngineCommand::Shutdown);

        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                warn!("Engine task shutdown error: {}", e);
            } else {
                info!("Engine task shutdown complete");
            }
        }
    }
}

/// Core tick loop.
///
/// The next tick is due one pacing interval after the previous one, measured
/// at the current rate. A command that interrupts the wait is handled and
/// the wait resumes toward that deadline, so a rate change only moves the
/// deadline and a deadline already in the past ticks at once.
async fn run_engine_loop(
    state: Arc<Mutex<KernelState>>,
    pacing: PacingMode,
    mut command_rx: mpsc::UnboundedReceiver<EngineCommand>,
) {
    let mut active = true;
    let mut tick_due = true;
    let mut last_tick = Instant::now();

    info!(
        "Engine loop started at {:.2} ticks/s",
        state.lock().speed_hz()
    );

    loop {
        if active && tick_due {
            let report = state.lock().tick();
            last_tick = Instant::now();
            trace!("Engine tick {} -> {:?}", report.tick, report.outcome);
        }

        let command = if !active {
            Some(command_rx.recv().await.unwrap_or(EngineCommand::Shutdown))
        } else {
            match pacing {
                PacingMode::Immediate => {
                    tokio::task::yield_now().await;
                    match command_rx.try_recv() {
                        Ok(cmd) => Some(cmd),
                        Err(TryRecvError::Empty) => None,
                        Err(TryRecvError::Disconnected) => Some(EngineCommand::Shutdown),
                    }
                }
                PacingMode::RealTime => {
                    let deadline = last_tick + pacing_interval(state.lock().speed_hz());
                    tokio::select! {
                        _ = tokio::time::sleep_until(deadline) => None,
                        cmd = command_rx.recv() => Some(cmd.unwrap_or(EngineCommand::Shutdown)),
                    }
                }
            }
        };

        tick_due = command.is_none();

        match command {
            None => {}
            Some(EngineCommand::Pause) => {
                info!("Engine paused");
                active = false;
            }
            Some(EngineCommand::Resume) => {
                info!("Engine resumed");
                active = true;
            }
            Some(EngineCommand::SpeedChanged) => {
                trace!("Engine deadline moved after rate change");
            }
            Some(EngineCommand::Shutdown) => {
                info!("Engine loop shutting down");
                break;
            }
        }
    }
}

impl Drop for EngineTask {
    fn drop(&mut self) {
        if self.shutdown_initiated.load(Ordering::SeqCst) {
            return;
        }

        if let Some(handle) = self.handle.take() {
            warn!(
                "EngineTask dropped without calling shutdown() - aborting task immediately. \
                 Use `task.shutdown().await` for graceful cleanup."
            );
            handle.abort();
        }
    }
}
