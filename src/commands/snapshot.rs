use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;

use crate::core::system_monitor::SystemMonitor;
use crate::core::DataExporter;

/// Write one full-state JSON snapshot
pub fn execute(matches: &ArgMatches) -> Result<()> {
    let config = super::load_config(matches);
    let exporter = match matches.get_one::<PathBuf>("output") {
        Some(dir) => DataExporter::with_dir(dir),
        None => DataExporter::new(),
    };

    let mut monitor = SystemMonitor::from_config(&config)?;

    // Rates need a measurement window after the baseline read
    std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
    let snapshot = monitor.poll(config.process_sort, config.process_limit);

    let path = exporter
        .create_snapshot(&snapshot, &monitor.system_info())
        .context("Failed to write snapshot")?;

    println!("{} {}", "✓ Snapshot saved to:".green(), path.display());
    Ok(())
}
