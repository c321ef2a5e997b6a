use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use resmon::core::system_monitor::{
    AlertEvaluator, AlertEvent, AlertMetric, AlertSeverity, AlertSink, BatteryMetrics,
    MetricSnapshot, ThresholdConfig,
};
use resmon::{ResmonError, Result};

struct Recorder(Rc<RefCell<Vec<AlertEvent>>>);

impl AlertSink for Recorder {
    fn handle(&self, event: &AlertEvent) -> Result<()> {
        self.0.borrow_mut().push(event.clone());
        Ok(())
    }
}

struct Broken;

impl AlertSink for Broken {
    fn handle(&self, _event: &AlertEvent) -> Result<()> {
        Err(ResmonError::alert_sink("notification service down"))
    }
}

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

fn snapshot(cpu: f32, memory: f32, disk: f32) -> MetricSnapshot {
    let mut snapshot = MetricSnapshot::default();
    snapshot.cpu.percent = cpu;
    snapshot.memory.percent = memory;
    snapshot.disk.percent = disk;
    snapshot
}

fn with_battery(percent: f32, plugged: bool) -> MetricSnapshot {
    let mut snapshot = snapshot(0.0, 0.0, 0.0);
    snapshot.battery = Some(BatteryMetrics {
        percent,
        plugged,
        time_left_secs: None,
    });
    snapshot
}

#[test]
fn test_sustained_breach_fires_once_per_cooldown() {
    let received = Rc::new(RefCell::new(Vec::new()));
    let mut evaluator = AlertEvaluator::new(ThresholdConfig::default(), 300);
    evaluator.register_sink(Box::new(Recorder(received.clone())));

    let hot = snapshot(90.0, 10.0, 10.0);
    for second in 0..700 {
        evaluator.evaluate_at(&hot, start() + Duration::seconds(second));
    }

    let events = received.borrow();
    assert_eq!(events.len(), 3);
    let offsets: Vec<i64> = events
        .iter()
        .map(|e| (e.timestamp - start()).num_seconds())
        .collect();
    assert_eq!(offsets, vec![0, 300, 600]);
    assert!(events.iter().all(|e| e.metric == AlertMetric::Cpu));
    assert_eq!(events[0].title, "High CPU Usage");
    assert_eq!(events[0].threshold, 85.0);
}

#[test]
fn test_value_equal_to_threshold_does_not_fire() {
    let mut evaluator = AlertEvaluator::default();
    let events = evaluator.evaluate_at(&snapshot(85.0, 90.0, 95.0), start());
    assert!(events.is_empty());
}

#[test]
fn test_cpu_severity_boundary() {
    let mut evaluator = AlertEvaluator::default();
    let events = evaluator.evaluate_at(&snapshot(94.9, 10.0, 10.0), start());
    assert_eq!(events[0].severity, AlertSeverity::Warning);

    let mut evaluator = AlertEvaluator::default();
    let events = evaluator.evaluate_at(&snapshot(95.0, 10.0, 10.0), start());
    assert_eq!(events[0].severity, AlertSeverity::Critical);
}

#[test]
fn test_disk_is_always_critical() {
    let mut thresholds = ThresholdConfig::default();
    thresholds.disk = 50.0;
    let mut evaluator = AlertEvaluator::new(thresholds, 300);

    let events = evaluator.evaluate_at(&snapshot(0.0, 0.0, 60.0), start());
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].metric, AlertMetric::Disk);
    assert_eq!(events[0].severity, AlertSeverity::Critical);
}

#[test]
fn test_battery_alerts_only_when_unplugged() {
    let mut evaluator = AlertEvaluator::default();
    assert!(evaluator
        .evaluate_at(&with_battery(10.0, true), start())
        .is_empty());

    let events = evaluator.evaluate_at(&with_battery(10.0, false), start());
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].metric, AlertMetric::Battery);
    assert_eq!(events[0].severity, AlertSeverity::Warning);

    // Exactly at the threshold is not low
    let mut evaluator = AlertEvaluator::default();
    assert!(evaluator
        .evaluate_at(&with_battery(15.0, false), start())
        .is_empty());
}

#[test]
fn test_cooldowns_are_per_metric() {
    let mut evaluator = AlertEvaluator::new(ThresholdConfig::default(), 300);

    let first = evaluator.evaluate_at(&snapshot(90.0, 10.0, 10.0), start());
    assert_eq!(first.len(), 1);

    // CPU is cooling down, memory has not fired yet
    let second =
        evaluator.evaluate_at(&snapshot(90.0, 95.0, 10.0), start() + Duration::seconds(10));
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].metric, AlertMetric::Memory);
    assert!(evaluator.is_cooling_down(AlertMetric::Cpu, start() + Duration::seconds(10)));
}

#[test]
fn test_cooldown_elapses_even_after_recovery() {
    let mut evaluator = AlertEvaluator::new(ThresholdConfig::default(), 300);

    evaluator.evaluate_at(&snapshot(90.0, 0.0, 0.0), start());
    evaluator.evaluate_at(&snapshot(10.0, 0.0, 0.0), start() + Duration::seconds(100));

    // Back above within the cooldown window: suppressed
    let events = evaluator.evaluate_at(&snapshot(90.0, 0.0, 0.0), start() + Duration::seconds(200));
    assert!(events.is_empty());

    let events = evaluator.evaluate_at(&snapshot(90.0, 0.0, 0.0), start() + Duration::seconds(300));
    assert_eq!(events.len(), 1);
}

#[test]
fn test_reset_cooldown_rearms_metric() {
    let mut evaluator = AlertEvaluator::new(ThresholdConfig::default(), 300);
    let hot = snapshot(90.0, 0.0, 0.0);

    evaluator.evaluate_at(&hot, start());
    assert!(evaluator
        .evaluate_at(&hot, start() + Duration::seconds(1))
        .is_empty());

    evaluator.reset_cooldown(Some(AlertMetric::Cpu));
    assert_eq!(evaluator.evaluate_at(&hot, start() + Duration::seconds(2)).len(), 1);
}

#[test]
fn test_set_threshold_changes_evaluation() {
    let mut evaluator = AlertEvaluator::default();
    evaluator.set_threshold(AlertMetric::Cpu, 50.0);
    assert_eq!(evaluator.threshold(AlertMetric::Cpu), 50.0);

    let events = evaluator.evaluate_at(&snapshot(60.0, 0.0, 0.0), start());
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].threshold, 50.0);
}

#[test]
fn test_failing_sink_does_not_block_others() {
    let received = Rc::new(RefCell::new(Vec::new()));
    let mut evaluator = AlertEvaluator::default();
    evaluator.register_sink(Box::new(Broken));
    evaluator.register_sink(Box::new(Recorder(received.clone())));

    let events = evaluator.evaluate_at(&snapshot(99.0, 99.0, 99.0), start());

    assert_eq!(events.len(), 3);
    assert_eq!(received.borrow().len(), 3);
}
