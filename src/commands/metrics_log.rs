//! Headless CSV metric logger.
//!
//! Polls at the configured interval and buffers one row per poll; the
//! buffer is flushed when full, when `--count` polls are done and on Ctrl+C.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::ArgMatches;
use colored::Colorize;

use crate::core::export::{MetricsLogger, DEFAULT_MAX_ENTRIES};
use crate::core::system_monitor::SystemMonitor;

const STOP_CHECK_STEP: Duration = Duration::from_millis(100);

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let config = super::load_config(matches);
    let max_entries = matches
        .get_one::<u64>("max-entries")
        .map(|n| *n as usize)
        .unwrap_or(DEFAULT_MAX_ENTRIES);
    let count = matches.get_one::<u64>("count").copied();

    let mut logger = match matches.get_one::<PathBuf>("output") {
        Some(dir) => MetricsLogger::with_dir(dir, max_entries),
        None => MetricsLogger::with_dir(MetricsLogger::default_dir(), max_entries),
    };

    let cancel_flag = Arc::new(AtomicBool::new(false));
    let cancel_flag_clone = cancel_flag.clone();

    ctrlc::set_handler(move || {
        cancel_flag_clone.store(true, Ordering::Relaxed);
    })
    .map_err(|e| anyhow::anyhow!("Failed to set Ctrl+C handler: {}", e))?;

    let mut monitor = SystemMonitor::from_config(&config)?;

    println!(
        "{} {} {}",
        "Logging metrics every".cyan(),
        format!("{}s", config.update_interval).bold(),
        format!("to {}", logger.log_dir().display()).cyan()
    );
    println!("{}", "Press Ctrl+C to stop".dimmed());

    std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);

    let mut polls = 0u64;
    while !cancel_flag.load(Ordering::Relaxed) {
        let snapshot = monitor.poll(config.process_sort, config.process_limit);
        if let Some(path) = logger.log_snapshot(&snapshot)? {
            println!("{} {}", "✓ Saved".green(), path.display());
        }

        polls += 1;
        if count.is_some_and(|n| polls >= n) {
            break;
        }

        let started = Instant::now();
        while started.elapsed() < config.update_interval() && !cancel_flag.load(Ordering::Relaxed)
        {
            std::thread::sleep(STOP_CHECK_STEP);
        }
    }

    if cancel_flag.load(Ordering::Relaxed) {
        println!();
        println!("{}", "Stopping, flushing buffered rows...".yellow());
    }

    match logger.save_log()? {
        Some(path) => println!("{} {}", "✓ Saved".green(), path.display()),
        None => println!("{}", "No rows left to save".dimmed()),
    }

    Ok(())
}
