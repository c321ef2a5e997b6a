// Resmon Library - Public API

// Re-export error types
pub mod error;
pub use error::{ResmonError, Result};

// Module declarations
pub mod commands;
pub mod core;
pub mod ui;

// Re-export commonly used types
pub use core::config::Config;

use std::fs::{self, OpenOptions};
use std::path::PathBuf;

/// Where log records go
#[derive(Debug, Clone)]
pub enum LogTarget {
    Stderr,
    /// Append to a file; used while a full-screen view owns the terminal
    File(PathBuf),
}

impl LogTarget {
    /// `<cache_dir>/resmon/resmon.log`
    pub fn default_file() -> Self {
        let dir = dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("resmon");
        LogTarget::File(dir.join("resmon.log"))
    }
}

// Initialize logging
pub fn init_logging(verbosity: u8, target: LogTarget) {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).parse_default_env();

    if let LogTarget::File(path) = target {
        let opened = path
            .parent()
            .map_or(Ok(()), fs::create_dir_all)
            .and_then(|_| OpenOptions::new().create(true).append(true).open(&path));
        match opened {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => eprintln!("Could not open log file {}: {}", path.display(), e),
        }
    }

    // A second init (e.g. from tests) is harmless
    let _ = builder.try_init();
}
