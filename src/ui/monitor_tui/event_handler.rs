use crossterm::event::KeyCode;

/// Events that can occur in the monitor TUI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorEvent {
    /// Quit the application
    Quit,
    /// Toggle help overlay
    ToggleHelp,
    /// Switch to next tab
    NextTab,
    /// Switch to previous tab
    PrevTab,
    /// Cycle process sort (cpu, memory, name)
    CycleSort,
    /// Show more processes
    IncreaseLimit,
    /// Show fewer processes
    DecreaseLimit,
    /// Export a full snapshot to JSON
    Export,
    /// Start or stop CSV metric logging
    ToggleLogging,
    /// No action
    None,
}

impl MonitorEvent {
    pub fn from_key(code: KeyCode) -> Self {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => MonitorEvent::Quit,
            KeyCode::Char('?') | KeyCode::Char('h') => MonitorEvent::ToggleHelp,
            KeyCode::Tab | KeyCode::Right => MonitorEvent::NextTab,
            KeyCode::BackTab | KeyCode::Left => MonitorEvent::PrevTab,
            KeyCode::Char('s') => MonitorEvent::CycleSort,
            KeyCode::Char('+') | KeyCode::Char('=') => MonitorEvent::IncreaseLimit,
            KeyCode::Char('-') => MonitorEvent::DecreaseLimit,
            KeyCode::Char('e') => MonitorEvent::Export,
            KeyCode::Char('l') => MonitorEvent::ToggleLogging,
            _ => MonitorEvent::None,
        }
    }
}
