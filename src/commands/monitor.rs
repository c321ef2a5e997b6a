//! Monitor command handler.
//!
//! Runs the real-time dashboard, or streams one JSON snapshot per line.

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::ArgMatches;

use crate::core::system_monitor::{LogSink, ProcessSort, SystemMonitor};
use crate::core::Config;
use crate::ui::monitor_tui::run_monitor_app;

/// Execute the monitor command
pub fn execute(matches: &ArgMatches) -> Result<()> {
    let mut config = super::load_config(matches);

    if let Some(sort) = matches.get_one::<String>("sort") {
        // Unknown keys fall back to enumeration order
        config.process_sort = sort.parse().unwrap_or(ProcessSort::Unsorted);
    }
    if let Some(limit) = matches.get_one::<usize>("limit") {
        config.process_limit = (*limit).max(1);
    }
    if matches.get_flag("no-alerts") {
        config.alert_enabled = false;
    }

    if matches.get_flag("json") {
        return run_json_output(&config);
    }

    run_monitor_app(&config).context("Failed to run system monitor")
}

/// Run in JSON output mode (for scripting)
fn run_json_output(config: &Config) -> Result<()> {
    let mut monitor = SystemMonitor::from_config(config)?;
    let mut evaluator = config.alert_enabled.then(|| {
        let mut evaluator = config.alert_evaluator();
        evaluator.register_sink(Box::new(LogSink));
        evaluator
    });

    // Wait for CPU measurement interval
    std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);

    let stdout = io::stdout();
    loop {
        let snapshot = monitor.poll(config.process_sort, config.process_limit);
        if let Some(evaluator) = evaluator.as_mut() {
            evaluator.evaluate(&snapshot);
        }

        let mut out = stdout.lock();
        if let Err(e) = writeln!(out, "{}", serde_json::to_string(&snapshot)?) {
            // Reader went away (e.g. `| head`)
            if e.kind() == io::ErrorKind::BrokenPipe {
                return Ok(());
            }
            return Err(e.into());
        }
        out.flush()?;
        drop(out);

        std::thread::sleep(config.update_interval());
    }
}
