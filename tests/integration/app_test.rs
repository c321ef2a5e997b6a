use std::fs;

use resmon::core::config::Config;
use resmon::core::system_monitor::{AlertMetric, ProcessSort, SystemMonitor};
use resmon::core::DataExporter;
use resmon::ui::monitor_tui::{MonitorApp, MonitorEvent, Tab, MAX_PROCESS_LIMIT, MIN_PROCESS_LIMIT};
use tempfile::TempDir;

use super::support::{process, Reading, ScriptedSource};

fn busy_reading() -> Reading {
    Reading {
        processes: vec![
            process(1, "zsh", 1.0, 30.0),
            process(2, "build", 80.0, 10.0),
            process(3, "Agent", 5.0, 20.0),
        ],
        ..Reading::usage(99.0, 40.0, 20.0)
    }
}

fn app_with(config: &Config, temp_dir: &TempDir) -> MonitorApp<ScriptedSource> {
    let source = ScriptedSource::new(vec![busy_reading()]);
    let monitor = SystemMonitor::new(source, config.history_size, "/").unwrap();
    let mut app = MonitorApp::new(monitor, config);
    app.exporter = DataExporter::with_dir(temp_dir.path().join("exports"));
    app.log_dir = temp_dir.path().join("logs");
    app
}

#[test]
fn test_update_metrics_records_alerts() {
    let temp_dir = TempDir::new().unwrap();
    let mut app = app_with(&Config::default(), &temp_dir);

    app.update_metrics();

    assert_eq!(app.snapshot.cpu.percent, 99.0);
    assert_eq!(app.system_info.hostname, "test-host");
    assert_eq!(app.recent_alerts.len(), 1);
    assert_eq!(app.recent_alerts[0].metric, AlertMetric::Cpu);

    // Still cooling down
    app.update_metrics();
    assert_eq!(app.recent_alerts.len(), 1);
    assert_eq!(app.monitor.history().cpu.len(), 2);
}

#[test]
fn test_disabled_alerts_skip_evaluation() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config {
        alert_enabled: false,
        ..Config::default()
    };
    let mut app = app_with(&config, &temp_dir);

    app.update_metrics();

    assert!(app.evaluator.is_none());
    assert!(app.recent_alerts.is_empty());
}

#[test]
fn test_help_closes_on_any_key() {
    let temp_dir = TempDir::new().unwrap();
    let mut app = app_with(&Config::default(), &temp_dir);

    app.handle_event(MonitorEvent::ToggleHelp);
    assert!(app.show_help);

    app.handle_event(MonitorEvent::NextTab);
    assert!(!app.show_help);
    assert_eq!(app.tab, Tab::Overview);

    app.handle_event(MonitorEvent::NextTab);
    assert_eq!(app.tab, Tab::Processes);

    app.handle_event(MonitorEvent::Quit);
    assert!(app.should_quit);
}

#[test]
fn test_sort_cycle_reranks_current_processes() {
    let temp_dir = TempDir::new().unwrap();
    let mut app = app_with(&Config::default(), &temp_dir);
    app.update_metrics();

    assert_eq!(app.sort, ProcessSort::Cpu);
    assert_eq!(app.snapshot.processes[0].name, "build");

    app.handle_event(MonitorEvent::CycleSort);
    assert_eq!(app.sort, ProcessSort::Memory);
    assert_eq!(app.snapshot.processes[0].name, "zsh");

    app.handle_event(MonitorEvent::CycleSort);
    assert_eq!(app.sort, ProcessSort::Name);
    let names: Vec<&str> = app.snapshot.processes.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Agent", "build", "zsh"]);
}

#[test]
fn test_process_limit_stays_in_bounds() {
    let temp_dir = TempDir::new().unwrap();
    let mut app = app_with(&Config::default(), &temp_dir);

    for _ in 0..50 {
        app.handle_event(MonitorEvent::IncreaseLimit);
    }
    assert_eq!(app.process_limit, MAX_PROCESS_LIMIT);

    for _ in 0..50 {
        app.handle_event(MonitorEvent::DecreaseLimit);
    }
    assert_eq!(app.process_limit, MIN_PROCESS_LIMIT);
}

#[test]
fn test_export_key_writes_snapshot() {
    let temp_dir = TempDir::new().unwrap();
    let mut app = app_with(&Config::default(), &temp_dir);
    app.update_metrics();

    app.handle_event(MonitorEvent::Export);

    let exported: Vec<_> = fs::read_dir(temp_dir.path().join("exports"))
        .unwrap()
        .collect();
    assert_eq!(exported.len(), 1);
    assert!(app
        .status_message
        .as_deref()
        .unwrap()
        .starts_with("Snapshot exported"));
}

#[test]
fn test_logging_toggle_flushes_rows() {
    let temp_dir = TempDir::new().unwrap();
    let mut app = app_with(&Config::default(), &temp_dir);
    assert!(app.logger.is_none());

    app.handle_event(MonitorEvent::ToggleLogging);
    app.update_metrics();
    app.update_metrics();
    assert_eq!(app.logger.as_ref().unwrap().log_count(), 2);

    app.handle_event(MonitorEvent::ToggleLogging);
    assert!(app.logger.is_none());

    let logs: Vec<_> = fs::read_dir(temp_dir.path().join("logs"))
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(logs.len(), 1);
    let content = fs::read_to_string(&logs[0]).unwrap();
    assert_eq!(content.lines().count(), 3);
}
