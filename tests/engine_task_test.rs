/*!
 * Engine Task Tests
 * Background tick loop lifecycle, pacing and concurrent control
 */

use pretty_assertions::assert_eq;
use rr_kernel_sim::{Kernel, KernelConfig, PacingMode, ScriptedSource};
use std::sync::Arc;
use std::time::Duration;
use tokio_test::assert_ok;

fn immediate_kernel(config: KernelConfig) -> Kernel {
    Kernel::builder(config)
        .with_random_source(ScriptedSource::new([0.1, 0.7, 0.9, 0.3]))
        .with_pacing(PacingMode::Immediate)
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_start_stop_lifecycle() {
    let kernel = immediate_kernel(KernelConfig::new(1024, 10).with_io_probability(0.0));
    assert!(!kernel.is_running());

    kernel.start();
    assert!(kernel.is_running());
    tokio::time::sleep(Duration::from_millis(20)).await;

    kernel.stop().await;
    assert!(!kernel.is_running());

    let stopped_at = kernel.snapshot().tick;
    assert!(stopped_at > 0);
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(kernel.snapshot().tick, stopped_at);
}

#[tokio::test]
async fn test_workload_drains_while_running() {
    let kernel = immediate_kernel(
        KernelConfig::new(1024, 10)
            .with_io_probability(0.2)
            .with_io_duration(2)
            .with_program_length(20),
    );
    assert_eq!(kernel.boot(), 8);

    kernel.start();
    for _ in 0..200 {
        if kernel.snapshot().process_count == 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    kernel.stop().await;

    let snapshot = kernel.snapshot();
    assert_eq!(snapshot.process_count, 0);
    assert_eq!(snapshot.used_memory, 0);
    assert_eq!(kernel.stats().terminations, 8);
    assert_ok!(kernel.check_invariants());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_admissions_race_with_ticks() {
    let kernel = Arc::new(immediate_kernel(
        KernelConfig::new(4096, 16)
            .with_io_probability(0.3)
            .with_io_duration(1)
            .with_program_length(8),
    ));
    kernel.start();

    let admitter = {
        let kernel = Arc::clone(&kernel);
        tokio::spawn(async move {
            let mut admitted: u64 = 0;
            for _ in 0..100 {
                if kernel.request_new_process(64).is_ok() {
                    admitted += 1;
                }
                assert_ok!(kernel.check_invariants());
                tokio::task::yield_now().await;
            }
            admitted
        })
    };

    let admitted = admitter.await.unwrap();
    assert!(admitted > 0);

    kernel.stop().await;
    assert_ok!(kernel.check_invariants());
    assert_eq!(kernel.stats().admissions, admitted);
}

#[tokio::test]
async fn test_pause_holds_the_clock() {
    let kernel = immediate_kernel(KernelConfig::new(1024, 10).with_io_probability(0.0));
    kernel.start();
    kernel.pause();
    tokio::time::sleep(Duration::from_millis(10)).await;

    let paused_at = kernel.snapshot().tick;
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(kernel.snapshot().tick, paused_at);

    kernel.resume();
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(kernel.snapshot().tick > paused_at);
    kernel.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_real_time_pacing_follows_speed() {
    let kernel = Kernel::builder(KernelConfig::new(1024, 10).with_speed_hz(10.0))
        .with_random_source(ScriptedSource::constant(0.9))
        .build()
        .unwrap();
    kernel.start();

    // The first tick runs immediately; then one tick every 100ms.
    tokio::time::sleep(Duration::from_millis(350)).await;
    assert_eq!(kernel.snapshot().tick, 4);

    // At 100 Hz the next tick was due at 310ms, so it runs at once; then
    // one every 10ms.
    kernel.set_speed(10.0);
    tokio::time::sleep(Duration::from_millis(55)).await;
    assert_eq!(kernel.snapshot().tick, 10);

    kernel.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_frequent_rate_changes_keep_the_clock_running() {
    let kernel = Kernel::builder(KernelConfig::new(1024, 10).with_speed_hz(1.0))
        .with_random_source(ScriptedSource::constant(0.9))
        .build()
        .unwrap();
    kernel.start();

    // A rate command every half interval for 15 simulated seconds.
    for _ in 0..30 {
        tokio::time::sleep(Duration::from_millis(500)).await;
        kernel.set_speed(1.0);
    }

    assert!(kernel.snapshot().tick >= 15, "tick {}", kernel.snapshot().tick);
    kernel.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_lowering_rate_moves_the_deadline_out() {
    let kernel = Kernel::builder(KernelConfig::new(1024, 10).with_speed_hz(10.0))
        .with_random_source(ScriptedSource::constant(0.9))
        .build()
        .unwrap();
    kernel.start();

    // Ticks at 0ms and 100ms; the next is due at 200ms.
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(kernel.snapshot().tick, 2);

    // At 5 Hz the next tick is due 200ms after the last one, at 300ms.
    kernel.set_speed(0.5);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(kernel.snapshot().tick, 2);
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(kernel.snapshot().tick, 3);

    kernel.stop().await;
}
