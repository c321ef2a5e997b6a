//! Compact status-bar view.
//!
//! Redraws a single summary line in place and reacts to single keys.
//! The full dashboard runs as a separate child process that owns the
//! terminal until it exits; the two processes share nothing.

use std::io::{self, Write};
use std::process::Command;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use crossterm::{
    cursor,
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{self, disable_raw_mode, enable_raw_mode, ClearType},
};

use crate::core::system_monitor::{AlertEvaluator, LogSink, MetricSnapshot, SystemMonitor};
use crate::core::{Config, DataExporter};
use crate::ui::status_bar::{summary_line, BarAction};

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let config = super::load_config(matches);
    let mut monitor = SystemMonitor::from_config(&config)?;
    let mut evaluator = config.alert_enabled.then(|| {
        let mut evaluator = config.alert_evaluator();
        evaluator.register_sink(Box::new(LogSink));
        evaluator
    });
    let exporter = DataExporter::new();

    println!(
        "{}",
        "d: dashboard │ e: export │ p: preferences │ q: quit".dimmed()
    );
    std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);

    enable_raw_mode().context("Failed to enable raw mode")?;
    let result = run_bar(&config, &mut monitor, evaluator.as_mut(), &exporter);
    disable_raw_mode().context("Failed to disable raw mode")?;
    println!();
    result
}

fn run_bar(
    config: &Config,
    monitor: &mut SystemMonitor,
    mut evaluator: Option<&mut AlertEvaluator>,
    exporter: &DataExporter,
) -> Result<()> {
    let mut stdout = io::stdout();
    let mut snapshot = MetricSnapshot::default();
    let mut last_tick: Option<Instant> = None;

    loop {
        if last_tick.map_or(true, |t| t.elapsed() >= config.update_interval()) {
            snapshot = monitor.poll(config.process_sort, config.process_limit);
            if let Some(evaluator) = evaluator.as_deref_mut() {
                evaluator.evaluate(&snapshot);
            }
            last_tick = Some(Instant::now());

            let line = summary_line(&snapshot, &config.thresholds);
            execute!(
                stdout,
                cursor::MoveToColumn(0),
                terminal::Clear(ClearType::CurrentLine)
            )?;
            write!(stdout, "{}", line)?;
            stdout.flush()?;
        }

        let timeout = last_tick
            .map(|t| config.update_interval().saturating_sub(t.elapsed()))
            .unwrap_or(Duration::ZERO);

        if !event::poll(timeout).context("Event poll failed")? {
            continue;
        }
        let Event::Key(key) = event::read().context("Event read failed")? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match BarAction::from_key(key.code) {
            BarAction::Quit => return Ok(()),
            BarAction::OpenDashboard => with_cooked_terminal(open_dashboard)?,
            BarAction::Export => with_cooked_terminal(|| {
                let path = exporter.create_snapshot(&snapshot, &monitor.system_info())?;
                println!("{} {}", "✓ Snapshot saved to:".green(), path.display());
                Ok(())
            })?,
            BarAction::ShowPreferences => with_cooked_terminal(|| print_preferences(config))?,
            BarAction::None => continue,
        }
        // Redraw right away after an action printed something
        last_tick = None;
    }
}

/// Run `f` with raw mode off so it can print normally
fn with_cooked_terminal<F>(f: F) -> Result<()>
where
    F: FnOnce() -> Result<()>,
{
    disable_raw_mode().context("Failed to disable raw mode")?;
    println!();
    let result = f();
    enable_raw_mode().context("Failed to enable raw mode")?;
    result
}

/// Launch `resmon monitor` as a child process and wait for it
fn open_dashboard() -> Result<()> {
    let exe = std::env::current_exe().context("Cannot locate the resmon executable")?;
    log::info!("Launching dashboard: {} monitor", exe.display());

    let status = Command::new(&exe)
        .arg("monitor")
        .status()
        .with_context(|| format!("Failed to launch {}", exe.display()))?;

    if !status.success() {
        println!("{} {}", "⚠ Dashboard exited with".yellow(), status);
    }
    Ok(())
}

fn print_preferences(config: &Config) -> Result<()> {
    println!("{}", "Preferences".bold());
    println!("  Update interval: {}s", config.update_interval);
    println!(
        "  Alerts:          {}",
        if config.alert_enabled { "on" } else { "off" }
    );
    println!(
        "  Thresholds:      CPU {:.0}% │ Memory {:.0}% │ Disk {:.0}% │ Battery {:.0}%",
        config.thresholds.cpu,
        config.thresholds.memory,
        config.thresholds.disk,
        config.thresholds.battery
    );
    println!("  Alert cooldown:  {}s", config.alert_cooldown);
    println!("  Disk path:       {}", config.disk_path);
    if let Ok(path) = Config::config_path() {
        println!(
            "{}",
            format!("  Edit with 'resmon config set <key> <value>' ({})", path.display()).dimmed()
        );
    }
    Ok(())
}
