use crossterm::event::{KeyCode, KeyEvent};

/// Events that can occur in the monitor TUI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorEvent {
    /// Quit the application
    Quit,
    /// Toggle help overlay
    ToggleHelp,
    /// Pause or resume sampling
    TogglePause,
    /// Export every metric to CSV
    ExportAllCsv,
    /// Export every metric to JSON
    ExportAllJson,
    /// Export the selected metric to CSV
    ExportSelected,
    /// Select the next chart
    NextMetric,
    /// Select the previous chart
    PrevMetric,
    /// Toggle process sort mode
    ToggleProcessSort,
    /// Shorten the refresh interval
    FasterRefresh,
    /// Lengthen the refresh interval
    SlowerRefresh,
    /// No action
    None,
}

impl MonitorEvent {
    pub fn from_key(key: KeyEvent) -> Self {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => MonitorEvent::Quit,
            KeyCode::Char('?') | KeyCode::Char('h') => MonitorEvent::ToggleHelp,
            KeyCode::Char('p') | KeyCode::Char(' ') => MonitorEvent::TogglePause,
            KeyCode::Char('e') => MonitorEvent::ExportAllCsv,
            KeyCode::Char('E') => MonitorEvent::ExportAllJson,
            KeyCode::Char('x') => MonitorEvent::ExportSelected,
            KeyCode::Tab | KeyCode::Right => MonitorEvent::NextMetric,
            KeyCode::BackTab | KeyCode::Left => MonitorEvent::PrevMetric,
            KeyCode::Char('s') => MonitorEvent::ToggleProcessSort,
            KeyCode::Char('+') | KeyCode::Char('=') => MonitorEvent::FasterRefresh,
            KeyCode::Char('-') => MonitorEvent::SlowerRefresh,
            _ => MonitorEvent::None,
        }
    }
}
