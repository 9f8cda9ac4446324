use ratatui::prelude::*;

use crate::core::system_monitor::{MetricKey, MetricKind};

/// Line color for a metric, warmer as the latest value climbs
pub fn usage_color(key: &MetricKey, latest: Option<f64>) -> Color {
    if !key.is_percent() {
        return match key.as_str() {
            crate::core::system_monitor::NET_UP_KEY => Color::Magenta,
            _ => Color::LightBlue,
        };
    }

    match latest {
        Some(v) if v >= 90.0 => Color::Red,
        Some(v) if v >= 75.0 => Color::LightRed,
        Some(v) if v >= 50.0 => Color::LightYellow,
        _ => base_color(key.kind()),
    }
}

fn base_color(kind: MetricKind) -> Color {
    match kind {
        MetricKind::Cpu => Color::Cyan,
        MetricKind::Memory => Color::Green,
        MetricKind::Disk => Color::Yellow,
        MetricKind::Gpu => Color::LightMagenta,
        MetricKind::Network => Color::LightBlue,
    }
}

/// Rows x columns for `count` charts, as square as possible
pub fn grid_shape(count: usize) -> (usize, usize) {
    if count == 0 {
        return (0, 0);
    }
    let cols = (count as f64).sqrt().ceil() as usize;
    let rows = count.div_ceil(cols);
    (rows, cols)
}

/// Helper function to create a centered rect
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
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
