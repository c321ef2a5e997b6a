use std::time::{Duration, Instant};

use resmon::core::system_monitor::{BatteryMetrics, ProcessSort, SystemMonitor};
use resmon::ResmonError;

use super::support::{process, Reading, ScriptedSource};

fn monitor_at(script: Vec<Reading>, history: usize, t0: Instant) -> SystemMonitor<ScriptedSource> {
    SystemMonitor::new_at(ScriptedSource::new(script), history, "/", t0).unwrap()
}

#[test]
fn test_construction_primes_baseline() {
    let t0 = Instant::now();
    let monitor = monitor_at(vec![Reading::counters(0, 0, 0, 0)], 10, t0);

    assert_eq!(monitor.source().refreshes, 1);
    assert!(monitor.history().cpu.is_empty());
}

#[test]
fn test_first_poll_has_rates_from_baseline() {
    let t0 = Instant::now();
    let mut monitor = monitor_at(
        vec![
            Reading::counters(1_000, 2_000, 10_000, 0),
            Reading::counters(3_000, 6_000, 14_000, 500),
        ],
        10,
        t0,
    );

    let snapshot = monitor.poll_at(t0 + Duration::from_secs(2), ProcessSort::Cpu, 10);

    assert_eq!(snapshot.network.sent_bytes_per_sec, 1_000.0);
    assert_eq!(snapshot.network.recv_bytes_per_sec, 2_000.0);
    assert_eq!(snapshot.disk.read_bytes_per_sec, 2_000.0);
    assert_eq!(snapshot.disk.write_bytes_per_sec, 250.0);
    assert_eq!(snapshot.network.bytes_sent, 3_000);
    assert_eq!(snapshot.network.packets_recv, 60);
}

#[test]
fn test_counter_reset_yields_zero_rate() {
    let t0 = Instant::now();
    let mut monitor = monitor_at(
        vec![
            Reading::counters(50_000, 50_000, 0, 0),
            Reading::counters(100, 60_000, 0, 0),
            Reading::counters(1_100, 61_000, 0, 0),
        ],
        10,
        t0,
    );

    let first = monitor.poll_at(t0 + Duration::from_secs(1), ProcessSort::Cpu, 10);
    assert_eq!(first.network.sent_bytes_per_sec, 0.0);
    assert_eq!(first.network.recv_bytes_per_sec, 10_000.0);

    // The post-reset reading is the new baseline
    let second = monitor.poll_at(t0 + Duration::from_secs(2), ProcessSort::Cpu, 10);
    assert_eq!(second.network.sent_bytes_per_sec, 1_000.0);
}

#[test]
fn test_zero_elapsed_yields_zero_rate() {
    let t0 = Instant::now();
    let mut monitor = monitor_at(
        vec![
            Reading::counters(0, 0, 0, 0),
            Reading::counters(5_000, 5_000, 5_000, 5_000),
        ],
        10,
        t0,
    );

    let snapshot = monitor.poll_at(t0, ProcessSort::Cpu, 10);
    assert_eq!(snapshot.network.sent_bytes_per_sec, 0.0);
    assert_eq!(snapshot.disk.read_bytes_per_sec, 0.0);
}

#[test]
fn test_missing_counters_leave_zero_fields() {
    let t0 = Instant::now();
    let unreadable = Reading {
        cpu: 12.0,
        ..Default::default()
    };
    let mut monitor = monitor_at(vec![unreadable.clone(), unreadable], 10, t0);

    let snapshot = monitor.poll_at(t0 + Duration::from_secs(1), ProcessSort::Cpu, 10);

    assert_eq!(snapshot.cpu.percent, 12.0);
    assert_eq!(snapshot.network.bytes_sent, 0);
    assert_eq!(snapshot.network.sent_bytes_per_sec, 0.0);
    assert_eq!(snapshot.disk.read_bytes_per_sec, 0.0);
    assert_eq!(monitor.history().cpu.len(), 1);
}

#[test]
fn test_percentages_are_clamped() {
    let t0 = Instant::now();
    let mut monitor = monitor_at(
        vec![Reading::default(), Reading::usage(150.0, f32::NAN, -3.0)],
        10,
        t0,
    );

    let snapshot = monitor.poll_at(t0 + Duration::from_secs(1), ProcessSort::Cpu, 10);

    assert_eq!(snapshot.cpu.percent, 100.0);
    assert!(snapshot.cpu.per_core.iter().all(|&c| c == 100.0));
    assert_eq!(snapshot.memory.percent, 0.0);
    assert_eq!(snapshot.disk.percent, 0.0);
}

#[test]
fn test_battery_absent_and_present() {
    let t0 = Instant::now();
    let on_battery = Reading {
        battery: Some(BatteryMetrics {
            percent: 42.0,
            plugged: false,
            time_left_secs: Some(5400),
        }),
        ..Reading::usage(1.0, 1.0, 1.0)
    };
    let mut monitor = monitor_at(
        vec![Reading::usage(1.0, 1.0, 1.0), Reading::usage(1.0, 1.0, 1.0), on_battery],
        10,
        t0,
    );

    let without = monitor.poll_at(t0 + Duration::from_secs(1), ProcessSort::Cpu, 10);
    assert!(without.battery.is_none());

    let with = monitor.poll_at(t0 + Duration::from_secs(2), ProcessSort::Cpu, 10);
    let battery = with.battery.unwrap();
    assert_eq!(battery.percent, 42.0);
    assert_eq!(battery.time_left_secs, Some(5400));
}

#[test]
fn test_processes_sorted_and_limited() {
    let t0 = Instant::now();
    let busy = Reading {
        processes: vec![
            process(1, "init", 0.5, 1.0),
            process(20, "browser", 30.0, 25.0),
            process(31, "Editor", 30.0, 5.0),
            process(40, "daemon", 2.0, 40.0),
        ],
        ..Reading::usage(10.0, 10.0, 10.0)
    };
    let mut monitor = monitor_at(vec![busy.clone(), busy], 10, t0);
    let later = t0 + Duration::from_secs(1);

    let by_cpu = monitor.poll_at(later, ProcessSort::Cpu, 2);
    let pids: Vec<u32> = by_cpu.processes.iter().map(|p| p.pid).collect();
    // Equal cpu keeps enumeration order
    assert_eq!(pids, vec![20, 31]);

    let by_memory = monitor.poll_at(later, ProcessSort::Memory, 10);
    let pids: Vec<u32> = by_memory.processes.iter().map(|p| p.pid).collect();
    assert_eq!(pids, vec![40, 20, 31, 1]);

    let by_name = monitor.poll_at(later, ProcessSort::Name, 10);
    let names: Vec<&str> = by_name.processes.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["browser", "daemon", "Editor", "init"]);

    let unsorted = monitor.poll_at(later, "bogus".parse().unwrap(), 3);
    let pids: Vec<u32> = unsorted.processes.iter().map(|p| p.pid).collect();
    assert_eq!(pids, vec![1, 20, 31]);
}

#[test]
fn test_history_keeps_latest_values() {
    let t0 = Instant::now();
    let script = vec![
        Reading::usage(0.0, 0.0, 0.0),
        Reading::usage(10.0, 50.0, 0.0),
        Reading::usage(20.0, 55.0, 0.0),
        Reading::usage(30.0, 60.0, 0.0),
    ];
    let mut monitor = monitor_at(script, 2, t0);

    for secs in 1..=3 {
        monitor.poll_at(t0 + Duration::from_secs(secs), ProcessSort::Cpu, 5);
    }

    assert_eq!(monitor.history().cpu.snapshot(), vec![20.0, 30.0]);
    assert_eq!(monitor.history().memory.snapshot(), vec![55.0, 60.0]);
    assert_eq!(monitor.history().network.len(), 2);
}

#[test]
fn test_zero_history_size_is_rejected() {
    let result = SystemMonitor::new(ScriptedSource::new(vec![]), 0, "/");
    assert!(matches!(result, Err(ResmonError::InvalidCapacity(0))));
}

#[test]
fn test_disk_path_is_reported() {
    let t0 = Instant::now();
    let mut monitor = SystemMonitor::new_at(
        ScriptedSource::new(vec![Reading::usage(1.0, 1.0, 40.0)]),
        5,
        "/data",
        t0,
    )
    .unwrap();

    let snapshot = monitor.poll_at(t0 + Duration::from_secs(1), ProcessSort::Cpu, 5);
    assert_eq!(monitor.disk_path(), "/data");
    assert_eq!(snapshot.disk.mount_point, "/data");
    assert_eq!(snapshot.disk.percent, 40.0);
}
