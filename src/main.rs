/*!
 * Round-Robin Kernel Simulator - Main Entry Point
 *
 * Loads the configuration, boots the machine with default-size processes,
 * starts the tick loop and serves the operator console on stdin/stdout.
 */

use anyhow::Context;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

use rr_kernel_sim::console::{render, ConsoleCommand, HELP_TEXT};
use rr_kernel_sim::monitoring::{init_tracing, CommandSpan};
use rr_kernel_sim::{Kernel, KernelConfig};

const DEFAULT_CONFIG_PATH: &str = "config.json";
const CLEAR_SCREEN: &str = "\x1B[2J\x1B[H";

fn config_path() -> PathBuf {
    std::env::args()
        .nth(1)
        .or_else(|| std::env::var("KERNEL_CONFIG").ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
        .into()
}

fn load_config() -> KernelConfig {
    let path = config_path();
    match KernelConfig::from_file(&path) {
        Ok(config) => config,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Using fallback configuration");
            KernelConfig::fallback()
        }
    }
}

fn show(kernel: &Kernel) {
    print!("{}{}", CLEAR_SCREEN, render(&kernel.snapshot()));
}

/// Apply one console line. Returns `false` when the console should close.
fn handle_line(kernel: &Kernel, line: &str) -> bool {
    let span = CommandSpan::new(line.trim());
    let _entered = span.enter();

    let command = match ConsoleCommand::parse(line) {
        Ok(command) => command,
        Err(e) => {
            span.record_error(&e.to_string());
            show(kernel);
            println!("\n> Error: {}", e);
            return true;
        }
    };

    let message = match command {
        ConsoleCommand::Exit => {
            span.record_result(true);
            return false;
        }
        ConsoleCommand::Help => Some(HELP_TEXT.to_string()),
        ConsoleCommand::Create(size) => match kernel.request_new_process(size) {
            Ok(pid) => Some(format!("Process {} created ({} units)", pid, size)),
            Err(e) => {
                span.record_error(&e.to_string());
                Some(format!("Error: {}", e))
            }
        },
        ConsoleCommand::Speed(factor) => {
            let speed = kernel.set_speed(factor);
            Some(format!("Clock rate is now {:.2} ticks/s", speed))
        }
        ConsoleCommand::Refresh => None,
    };

    span.record_result(true);
    show(kernel);
    if let Some(message) = message {
        println!("\n> {}", message);
    }
    true
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    info!("Round-robin kernel simulator starting...");

    let config = load_config();
    let kernel = Kernel::new(config).context("Failed to build kernel")?;

    let loaded = kernel.boot();
    info!(loaded, "Boot complete");

    kernel.start();
    show(&kernel);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if !handle_line(&kernel, &line) {
                        break;
                    }
                }
                Ok(None) => {
                    info!("Console input closed");
                    break;
                }
                Err(e) => {
                    error!(error = %e, "Failed to read console input");
                    break;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupt received");
                break;
            }
        }
    }

    kernel.stop().await;

    let stats = kernel.stats();
    info!(
        ticks = stats.ticks,
        terminations = stats.terminations,
        preemptions = stats.preemptions,
        io_blocks = stats.io_blocks,
        "Kernel shut down"
    );

    kernel
        .check_invariants()
        .context("Kernel state inconsistent at shutdown")?;
    Ok(())
}
