use ratatui::{
    prelude::*,
    widgets::{BarChart, Block, Borders, Cell, Clear, Paragraph, Row, Sparkline, Table, Tabs},
};

use super::app::{MonitorApp, Tab};
use super::widgets::{battery_color, colored_gauge, severity_style};
use crate::core::system_monitor::CounterSource;
use crate::ui::formatters::{
    format_bytes, format_clock, format_duration, format_speed, format_timestamp,
};

/// Main render function
pub fn render_ui<S: CounterSource>(frame: &mut Frame, app: &MonitorApp<S>) {
    let area = frame.area();

    let has_alerts = !app.recent_alerts.is_empty();
    let alert_height = if has_alerts {
        // 1 line per alert + 2 for borders
        (app.recent_alerts.len().min(3) + 2) as u16
    } else {
        0
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),            // Tabs + host header
            Constraint::Length(alert_height), // Alerts banner
            Constraint::Min(0),               // Tab body
            Constraint::Length(1),            // Footer
        ])
        .split(area);

    render_header(frame, chunks[0], app);
    if has_alerts {
        render_alerts_banner(frame, chunks[1], app);
    }
    match app.tab {
        Tab::Overview => render_overview(frame, chunks[2], app),
        Tab::Processes => render_processes(frame, chunks[2], app),
        Tab::System => render_system(frame, chunks[2], app),
    }
    render_footer(frame, chunks[3], app);

    if app.show_help {
        render_help_overlay(frame, area);
    }
}

fn render_header<S: CounterSource>(frame: &mut Frame, area: Rect, app: &MonitorApp<S>) {
    let logging = if app.logger.is_some() { " │ ● REC" } else { "" };
    let title = format!(
        " {} │ Uptime: {} │ Refresh: {}s{} ",
        app.system_info.hostname,
        format_duration(app.system_info.uptime_secs),
        app.interval.as_secs(),
        logging
    );

    let titles: Vec<&str> = Tab::ALL.iter().map(|t| t.title()).collect();
    let tabs = Tabs::new(titles)
        .select(app.tab.index())
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

fn render_alerts_banner<S: CounterSource>(frame: &mut Frame, area: Rect, app: &MonitorApp<S>) {
    let block = Block::default()
        .title(" ⚠ ALERTS ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = app
        .recent_alerts
        .iter()
        .take(3)
        .map(|alert| {
            let (icon, color) = severity_style(alert.severity);
            Line::styled(
                format!(
                    "{} [{}] {}: {}",
                    icon,
                    format_clock(&alert.timestamp),
                    alert.title,
                    alert.message
                ),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_overview<S: CounterSource>(frame: &mut Frame, area: Rect, app: &MonitorApp<S>) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),      // Gauges
            Constraint::Percentage(55), // CPU + memory history
            Constraint::Min(4),         // Network + disk I/O
        ])
        .split(area);

    render_gauges(frame, rows[0], app);

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);
    render_history_chart(
        frame,
        charts[0],
        &app.monitor.history().cpu_as_u64(),
        format!(" CPU History ({:.1}%) ", app.snapshot.cpu.percent),
        Color::Cyan,
    );
    render_history_chart(
        frame,
        charts[1],
        &app.monitor.history().memory_as_u64(),
        format!(" Memory History ({:.1}%) ", app.snapshot.memory.percent),
        Color::Magenta,
    );

    render_io_section(frame, rows[2], app);
}

fn render_gauges<S: CounterSource>(frame: &mut Frame, area: Rect, app: &MonitorApp<S>) {
    let snapshot = &app.snapshot;
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    let cpu_label = format!("{:.1}%", snapshot.cpu.percent);
    frame.render_widget(
        colored_gauge(snapshot.cpu.percent as f64, &cpu_label)
            .block(Block::default().title(" CPU ").borders(Borders::ALL)),
        columns[0],
    );

    let mem_label = format!(
        "{:.1}% ({} / {})",
        snapshot.memory.percent,
        format_bytes(snapshot.memory.used_bytes),
        format_bytes(snapshot.memory.total_bytes)
    );
    frame.render_widget(
        colored_gauge(snapshot.memory.percent as f64, &mem_label)
            .block(Block::default().title(" Memory ").borders(Borders::ALL)),
        columns[1],
    );

    let disk_label = format!(
        "{:.1}% ({} free)",
        snapshot.disk.percent,
        format_bytes(snapshot.disk.free_bytes)
    );
    frame.render_widget(
        colored_gauge(snapshot.disk.percent as f64, &disk_label).block(
            Block::default()
                .title(format!(" Disk {} ", snapshot.disk.mount_point))
                .borders(Borders::ALL),
        ),
        columns[2],
    );

    let battery_block = Block::default().title(" Battery ").borders(Borders::ALL);
    match &snapshot.battery {
        Some(battery) => {
            let state = if battery.plugged { "⚡" } else { "🔋" };
            let time_left = battery
                .time_left_secs
                .map(|s| format!(" {}", format_duration(s)))
                .unwrap_or_default();
            let label = format!("{} {:.0}%{}", state, battery.percent, time_left);
            let gauge = colored_gauge(battery.percent as f64, &label)
                .gauge_style(
                    Style::default()
                        .fg(battery_color(battery.percent, battery.plugged))
                        .bg(Color::Black),
                )
                .block(battery_block);
            frame.render_widget(gauge, columns[3]);
        }
        None => {
            let para = Paragraph::new("No battery")
                .style(Style::default().fg(Color::DarkGray))
                .block(battery_block);
            frame.render_widget(para, columns[3]);
        }
    }
}

/// Bar chart of a percentage history scaled by 10 (0-1000)
fn render_history_chart(
    frame: &mut Frame,
    area: Rect,
    history: &[u64],
    title: String,
    color: Color,
) {
    let block = Block::default().title(title).borders(Borders::ALL);

    // Each bar needs one column plus a gap
    let inner_width = area.width.saturating_sub(2) as usize;
    let max_bars = (inner_width / 2).min(history.len());
    if max_bars == 0 {
        frame.render_widget(block, area);
        return;
    }

    let start_idx = history.len() - max_bars;
    let data: Vec<(&str, u64)> = history[start_idx..].iter().map(|&v| ("", v)).collect();

    let chart = BarChart::default()
        .block(block)
        .direction(Direction::Vertical)
        .bar_width(1)
        .bar_gap(1)
        .bar_style(Style::default().fg(color))
        .value_style(Style::default().fg(Color::Black).bg(color))
        .data(&data)
        .max(1000);

    frame.render_widget(chart, area);
}

fn render_io_section<S: CounterSource>(frame: &mut Frame, area: Rect, app: &MonitorApp<S>) {
    let network = &app.snapshot.network;
    let disk = &app.snapshot.disk;
    let (sent_history, recv_history) = app.monitor.history().network_as_u64();

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Percentage(35),
            Constraint::Percentage(30),
        ])
        .split(area);

    let download = Sparkline::default()
        .block(
            Block::default()
                .title(format!(" ↓ {} ", format_speed(network.recv_bytes_per_sec)))
                .borders(Borders::ALL),
        )
        .data(&recv_history)
        .style(Style::default().fg(Color::Green));
    frame.render_widget(download, columns[0]);

    let upload = Sparkline::default()
        .block(
            Block::default()
                .title(format!(" ↑ {} ", format_speed(network.sent_bytes_per_sec)))
                .borders(Borders::ALL),
        )
        .data(&sent_history)
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(upload, columns[1]);

    let lines = vec![
        Line::from(format!("Read:  {}", format_speed(disk.read_bytes_per_sec))),
        Line::from(format!("Write: {}", format_speed(disk.write_bytes_per_sec))),
        Line::from(format!(
            "Net:   {} sent / {} recv",
            format_bytes(network.bytes_sent),
            format_bytes(network.bytes_recv)
        )),
    ];
    let para = Paragraph::new(lines).block(Block::default().title(" I/O ").borders(Borders::ALL));
    frame.render_widget(para, columns[2]);
}

fn render_processes<S: CounterSource>(frame: &mut Frame, area: Rect, app: &MonitorApp<S>) {
    let block = Block::default()
        .title(format!(
            " Processes │ sort: {} │ limit: {} [s:sort +/-:limit] ",
            app.sort, app.process_limit
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height < 2 {
        return;
    }

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let header = Row::new(vec![
        Cell::from("PID").style(bold),
        Cell::from("Name").style(bold),
        Cell::from("CPU %").style(bold),
        Cell::from("Mem %").style(bold),
        Cell::from("Status").style(bold),
    ])
    .height(1);

    let rows: Vec<Row> = app
        .snapshot
        .processes
        .iter()
        .map(|proc| {
            Row::new(vec![
                Cell::from(proc.pid.to_string()),
                Cell::from(proc.name.clone()),
                Cell::from(format!("{:.1}", proc.cpu_percent)),
                Cell::from(format!("{:.1}", proc.memory_percent)),
                Cell::from(proc.status.clone()),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Percentage(45),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Min(8),
        ],
    )
    .header(header);

    frame.render_widget(table, inner);
}

fn render_system<S: CounterSource>(frame: &mut Frame, area: Rect, app: &MonitorApp<S>) {
    let info = &app.system_info;
    let snapshot = &app.snapshot;

    let field = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(
                format!("{:<14}", label),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw(value),
        ])
    };

    let lines = vec![
        field("Hostname", info.hostname.clone()),
        field("OS", format!("{} {}", info.os_name, info.os_version)),
        field("Kernel", info.kernel_version.clone()),
        field("Architecture", info.architecture.clone()),
        field("CPU", info.cpu_brand.clone()),
        field(
            "Cores",
            format!(
                "{} physical, {} logical @ {} MHz",
                snapshot.cpu.physical_cores, snapshot.cpu.threads, snapshot.cpu.frequency_mhz
            ),
        ),
        field("Memory", format_bytes(snapshot.memory.total_bytes)),
        field(
            "Swap",
            format!(
                "{} / {} ({:.1}%)",
                format_bytes(snapshot.memory.swap_used_bytes),
                format_bytes(snapshot.memory.swap_total_bytes),
                snapshot.memory.swap_percent
            ),
        ),
        field(
            "Disk",
            format!(
                "{} total on {}",
                format_bytes(snapshot.disk.total_bytes),
                snapshot.disk.mount_point
            ),
        ),
        field("Boot time", format_timestamp(info.boot_time)),
        field("Uptime", format_duration(info.uptime_secs)),
    ];

    let para = Paragraph::new(lines).block(
        Block::default()
            .title(" System Information ")
            .borders(Borders::ALL),
    );
    frame.render_widget(para, area);
}

fn render_footer<S: CounterSource>(frame: &mut Frame, area: Rect, app: &MonitorApp<S>) {
    let text = match &app.status_message {
        Some(message) => format!(" {} ", message),
        None => " q: Quit │ ?: Help │ Tab: Switch tab │ s: Sort │ e: Export │ l: Log ".to_string(),
    };
    let para = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(para, area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let help_text = r#"
    Resource Monitor - Help

    Keyboard Shortcuts:
    ─────────────────────────────────────
    q / Esc     Quit the application
    ? / h       Toggle this help screen
    Tab         Next tab
    Shift+Tab   Previous tab
    s           Cycle process sort (CPU/Memory/Name)
    + / -       Show more / fewer processes
    e           Export a snapshot (JSON)
    l           Start / stop CSV logging

    Press any key to close this help
    "#;

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::DarkGray));

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .alignment(Alignment::Left);

    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);
    frame.render_widget(paragraph, popup_area);
}

/// Helper function to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
