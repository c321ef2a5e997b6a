use std::collections::VecDeque;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::core::config::Config;
use crate::core::export::{DataExporter, MetricsLogger, DEFAULT_MAX_ENTRIES};
use crate::core::system_monitor::{
    rank_processes, AlertEvaluator, AlertEvent, CounterSource, LogSink, MetricSnapshot,
    ProcessSort, SysinfoSource, SystemInfo, SystemMonitor,
};

use super::event_handler::MonitorEvent;
use super::render::render_ui;

pub const MIN_PROCESS_LIMIT: usize = 5;
pub const MAX_PROCESS_LIMIT: usize = 100;
const PROCESS_LIMIT_STEP: usize = 5;
const MAX_RECENT_ALERTS: usize = 5;

/// Dashboard tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Overview,
    Processes,
    System,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Overview, Tab::Processes, Tab::System];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Processes => "Processes",
            Tab::System => "System",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Overview => 0,
            Tab::Processes => 1,
            Tab::System => 2,
        }
    }

    pub fn next(self) -> Self {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

/// Monitor application state
pub struct MonitorApp<S: CounterSource = SysinfoSource> {
    pub monitor: SystemMonitor<S>,
    /// None when alerts are disabled
    pub evaluator: Option<AlertEvaluator>,
    pub snapshot: MetricSnapshot,
    pub system_info: SystemInfo,
    /// Newest first
    pub recent_alerts: VecDeque<AlertEvent>,
    pub sort: ProcessSort,
    pub process_limit: usize,
    pub tab: Tab,
    pub show_help: bool,
    pub should_quit: bool,
    pub interval: Duration,
    pub exporter: DataExporter,
    /// Active CSV logger, if logging is on
    pub logger: Option<MetricsLogger>,
    pub log_dir: PathBuf,
    pub status_message: Option<String>,
    auto_export: Option<Duration>,
    last_export: Instant,
}

impl<S: CounterSource> MonitorApp<S> {
    pub fn new(monitor: SystemMonitor<S>, config: &Config) -> Self {
        let evaluator = config.alert_enabled.then(|| {
            let mut evaluator = config.alert_evaluator();
            evaluator.register_sink(Box::new(LogSink));
            evaluator
        });

        let log_dir = MetricsLogger::default_dir();
        let logger = config
            .logging_enabled
            .then(|| MetricsLogger::with_dir(log_dir.clone(), DEFAULT_MAX_ENTRIES));

        let system_info = monitor.system_info();

        Self {
            monitor,
            evaluator,
            snapshot: MetricSnapshot::default(),
            system_info,
            recent_alerts: VecDeque::new(),
            sort: config.process_sort,
            process_limit: config.process_limit.clamp(MIN_PROCESS_LIMIT, MAX_PROCESS_LIMIT),
            tab: Tab::Overview,
            show_help: false,
            should_quit: false,
            interval: config.update_interval(),
            exporter: DataExporter::new(),
            logger,
            log_dir,
            status_message: None,
            auto_export: config
                .auto_export
                .then(|| Duration::from_secs(config.export_interval.max(1))),
            last_export: Instant::now(),
        }
    }

    /// One poll-evaluate pass
    pub fn update_metrics(&mut self) {
        self.snapshot = self.monitor.poll(self.sort, self.process_limit);
        self.system_info = self.monitor.system_info();

        if let Some(evaluator) = self.evaluator.as_mut() {
            for event in evaluator.evaluate(&self.snapshot) {
                self.recent_alerts.push_front(event);
            }
            self.recent_alerts.truncate(MAX_RECENT_ALERTS);
        }

        if let Some(logger) = self.logger.as_mut() {
            match logger.log_snapshot(&self.snapshot) {
                Ok(Some(path)) => {
                    self.status_message = Some(format!("Log saved to {}", path.display()));
                }
                Ok(None) => {}
                Err(e) => {
                    log::error!("Metric logging failed: {}", e);
                    self.status_message = Some(format!("Logging failed: {}", e));
                }
            }
        }

        if let Some(every) = self.auto_export {
            if self.last_export.elapsed() >= every {
                self.export_snapshot();
            }
        }
    }

    /// Handle keyboard events
    pub fn handle_event(&mut self, event: MonitorEvent) {
        // Any key closes the help overlay
        if self.show_help && event != MonitorEvent::Quit {
            self.show_help = false;
            return;
        }

        match event {
            MonitorEvent::Quit => self.should_quit = true,
            MonitorEvent::ToggleHelp => self.show_help = true,
            MonitorEvent::NextTab => self.tab = self.tab.next(),
            MonitorEvent::PrevTab => self.tab = self.tab.prev(),
            MonitorEvent::CycleSort => {
                self.sort = self.sort.next();
                let processes = std::mem::take(&mut self.snapshot.processes);
                self.snapshot.processes = rank_processes(processes, self.sort, self.process_limit);
            }
            MonitorEvent::IncreaseLimit => {
                self.process_limit =
                    (self.process_limit + PROCESS_LIMIT_STEP).min(MAX_PROCESS_LIMIT);
            }
            MonitorEvent::DecreaseLimit => {
                self.process_limit = self
                    .process_limit
                    .saturating_sub(PROCESS_LIMIT_STEP)
                    .max(MIN_PROCESS_LIMIT);
                self.snapshot.processes.truncate(self.process_limit);
            }
            MonitorEvent::Export => self.export_snapshot(),
            MonitorEvent::ToggleLogging => self.toggle_logging(),
            MonitorEvent::None => {}
        }
    }

    pub fn export_snapshot(&mut self) {
        self.last_export = Instant::now();
        self.status_message = Some(
            match self
                .exporter
                .create_snapshot(&self.snapshot, &self.system_info)
            {
                Ok(path) => format!("Snapshot exported to {}", path.display()),
                Err(e) => {
                    log::error!("Snapshot export failed: {}", e);
                    format!("Export failed: {}", e)
                }
            },
        );
    }

    pub fn toggle_logging(&mut self) {
        match self.logger.take() {
            Some(mut logger) => {
                self.status_message = Some(match logger.save_log() {
                    Ok(Some(path)) => format!("Logging stopped, saved {}", path.display()),
                    Ok(None) => "Logging stopped".to_string(),
                    Err(e) => format!("Logging stopped, save failed: {}", e),
                });
            }
            None => {
                self.logger = Some(MetricsLogger::with_dir(
                    self.log_dir.clone(),
                    DEFAULT_MAX_ENTRIES,
                ));
                self.status_message = Some(format!("Logging to {}", self.log_dir.display()));
            }
        }
    }

    /// Flush any buffered log rows
    pub fn shutdown(&mut self) {
        if let Some(logger) = self.logger.as_mut() {
            match logger.save_log() {
                Ok(Some(path)) => log::info!("Saved metric log {}", path.display()),
                Ok(None) => {}
                Err(e) => log::error!("Failed to save metric log: {}", e),
            }
        }
    }
}

/// Run the monitor TUI application
pub fn run_monitor_app(config: &Config) -> Result<()> {
    let monitor = SystemMonitor::from_config(config).context("Failed to start monitor")?;
    let mut app = MonitorApp::new(monitor, config);

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let result = run_loop(&mut terminal, &mut app);
    app.shutdown();

    // Restore terminal
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut MonitorApp,
) -> Result<()> {
    // Wait for CPU measurement interval
    std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
    app.update_metrics();

    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| render_ui(frame, app))?;

        let timeout = app
            .interval
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout).context("Event poll failed")? {
            if let Event::Key(key) = event::read().context("Event read failed")? {
                if key.kind == KeyEventKind::Press {
                    app.handle_event(MonitorEvent::from_key(key.code));
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }

        // Polls never overlap: the next one starts only after this pass
        if last_tick.elapsed() >= app.interval {
            app.update_metrics();
            last_tick = Instant::now();
        }
    }
}
