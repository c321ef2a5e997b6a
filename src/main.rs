use anyhow::Result;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use colored::Colorize;
use std::path::PathBuf;

use resmon::commands;
use resmon::{init_logging, LogTarget};

fn interval_arg() -> Arg {
    Arg::new("interval")
        .short('i')
        .long("interval")
        .value_name("SECONDS")
        .help("Seconds between updates (1-60, defaults to the configured value)")
        .value_parser(value_parser!(u64).range(1..=60))
}

fn output_arg(help: &'static str) -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .value_name("DIR")
        .help(help)
        .value_parser(value_parser!(PathBuf))
}

fn build_cli() -> Command {
    Command::new("resmon")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Host resource monitor: live dashboard, status bar, alerts and metric export")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase log verbosity (-v info, -vv debug)")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new("monitor")
                .about("Open the live dashboard")
                .arg(interval_arg())
                .arg(
                    Arg::new("sort")
                        .short('s')
                        .long("sort")
                        .value_name("KEY")
                        .help("Process sort key: cpu, memory or name"),
                )
                .arg(
                    Arg::new("limit")
                        .short('n')
                        .long("limit")
                        .value_name("N")
                        .help("Number of processes to show")
                        .value_parser(value_parser!(usize)),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print one JSON snapshot per line instead of the dashboard")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("no-alerts")
                        .long("no-alerts")
                        .help("Disable threshold alerts")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("bar")
                .about("Show a compact one-line summary (d: dashboard, e: export, p: preferences, q: quit)")
                .arg(interval_arg()),
        )
        .subcommand(
            Command::new("snapshot")
                .about("Export the current state as a JSON snapshot")
                .arg(output_arg("Directory for the snapshot file")),
        )
        .subcommand(
            Command::new("log")
                .about("Log metrics to CSV until Ctrl+C")
                .arg(interval_arg())
                .arg(output_arg("Directory for the CSV log files"))
                .arg(
                    Arg::new("max-entries")
                        .long("max-entries")
                        .value_name("N")
                        .help("Rows per CSV file before it is written (default 1000)")
                        .value_parser(value_parser!(u64).range(1..)),
                )
                .arg(
                    Arg::new("count")
                        .short('c')
                        .long("count")
                        .value_name("N")
                        .help("Stop after N polls")
                        .value_parser(value_parser!(u64).range(1..)),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Manage configuration (use 'resmon config --help' for subcommands)")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(
                    Command::new("get")
                        .about("Print a value by dotted key, e.g. thresholds.cpu")
                        .arg(Arg::new("key").required(true).index(1)),
                )
                .subcommand(
                    Command::new("set")
                        .about("Set a value by dotted key")
                        .arg(Arg::new("key").required(true).index(1))
                        .arg(Arg::new("value").required(true).index(2)),
                )
                .subcommand(Command::new("reset").about("Reset every key to its default"))
                .subcommand(Command::new("path").about("Print the configuration file path"))
                .subcommand(Command::new("show").about("Print the full configuration")),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .help("Shell to generate for: bash, zsh, fish, powershell, elvish")
                        .required(true)
                        .index(1),
                ),
        )
}

/// Full-screen and in-place views log to a file instead of the terminal
fn log_target(matches: &ArgMatches) -> LogTarget {
    match matches.subcommand() {
        Some(("monitor", sub)) if !sub.get_flag("json") => LogTarget::default_file(),
        Some(("bar", _)) => LogTarget::default_file(),
        _ => LogTarget::Stderr,
    }
}

fn run(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("monitor", sub_matches)) => commands::monitor::execute(sub_matches),
        Some(("bar", sub_matches)) => commands::bar::execute(sub_matches),
        Some(("snapshot", sub_matches)) => commands::snapshot::execute(sub_matches),
        Some(("log", sub_matches)) => commands::metrics_log::execute(sub_matches),
        Some(("config", sub_matches)) => commands::config::execute(sub_matches),
        Some(("completions", sub_matches)) => {
            commands::completions::execute(sub_matches, &mut build_cli())
        }
        _ => {
            println!("Use 'resmon --help' for more information.");
            Ok(())
        }
    }
}

fn main() {
    let matches = build_cli().get_matches();

    init_logging(matches.get_count("verbose"), log_target(&matches));

    if let Err(e) = run(&matches) {
        log::error!("{:#}", e);
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
