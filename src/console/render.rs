/*!
 * Console Renderer
 * Text view of a kernel snapshot
 */

use crate::kernel::KernelSnapshot;
use std::fmt::Write;

const RULE_WIDTH: usize = 63;

/// Render the status header and the process table, sorted by PID
pub fn render(snapshot: &KernelSnapshot) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_view(&mut out, snapshot);
    out
}

fn write_view(out: &mut String, s: &KernelSnapshot) -> std::fmt::Result {
    let cpu_state = if s.cpu_busy() { "BUSY" } else { "IDLE" };
    let active = s
        .active_process
        .as_ref()
        .map_or_else(|| "-".to_string(), |p| p.pid.to_string());
    let last_command = s
        .last_command
        .map_or_else(|| "-".to_string(), |c| c.to_string());

    writeln!(out, "--- Round-Robin Kernel Simulator --- tick {}", s.tick)?;
    writeln!(
        out,
        "CPU: {} | Active PID: {} | Last command: {}",
        cpu_state, active, last_command
    )?;
    writeln!(
        out,
        "Speed: {:.2} ticks/s | Processes: {}/{} | Blocked: {}",
        s.speed_hz, s.process_count, s.max_processes, s.blocked_count
    )?;
    writeln!(out, "Memory: {}/{} used", s.used_memory, s.total_memory)?;
    match s.next_task_size {
        Some(size) => writeln!(out, "Next task: {} units", size)?,
        None => writeln!(out, "Next task: - (table full)")?,
    }

    writeln!(out)?;
    writeln!(out, "--- Process Table ---")?;
    writeln!(
        out,
        "{:<5} | {:<12} | {:<7} | {:<5} | {:<5} | {:<7}",
        "PID", "State", "PC", "Ticks", "I/O", "Size"
    )?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;

    if s.processes.is_empty() {
        writeln!(out, "No processes in the system.")?;
    } else {
        let mut processes: Vec<_> = s.processes.iter().collect();
        processes.sort_by_key(|p| p.pid);
        for p in processes {
            writeln!(
                out,
                "{:<5} | {:<12} | {:<7} | {:<5} | {:<5} | {:<7}",
                p.pid,
                p.state.to_string(),
                format!("{}/{}", p.program_counter, p.program_length),
                p.ticks_in_quantum,
                p.io_time_remaining,
                p.size
            )?;
        }
    }

    writeln!(out, "{}", "-".repeat(RULE_WIDTH))
}
