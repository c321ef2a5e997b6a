// Command handlers module
pub mod bar;
pub mod completions;
pub mod config;
pub mod metrics_log;
pub mod monitor;
pub mod snapshot;

use clap::ArgMatches;

use crate::core::Config;

/// Load the stored configuration and apply the shared `--interval` override
pub(crate) fn load_config(matches: &ArgMatches) -> Config {
    let mut config = Config::load();
    if let Ok(Some(interval)) = matches.try_get_one::<u64>("interval") {
        config.update_interval = *interval;
    }
    config.normalized()
}
