use ratatui::{
    prelude::*,
    symbols,
    widgets::{Axis, Block, Borders, Cell, Chart, Clear, Dataset, GraphType, Paragraph, Row, Table},
};

use super::app::{MonitorApp, StatusKind};
use super::widgets::{centered_rect, grid_shape, usage_color};
use crate::core::system_monitor::{AlertSeverity, MetricKey, ProcessSort};
use crate::ui::formatters::{format_percent, format_rate, format_size};

/// Main render function
pub fn render_ui(frame: &mut Frame, app: &MonitorApp) {
    let area = frame.area();

    let has_alerts = !app.alerts.is_empty();
    let alert_height = if has_alerts {
        // 1 line per alert + 2 for borders
        (app.alerts.len() + 2) as u16
    } else {
        0
    };
    let process_height = (app.sampler.latest_processes().len() as u16 + 3).max(4);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),              // Header
            Constraint::Length(alert_height),   // Alerts banner
            Constraint::Min(8),                 // Charts
            Constraint::Length(process_height), // Processes
            Constraint::Length(1),              // Status
            Constraint::Length(1),              // Footer
        ])
        .split(area);

    render_header(frame, chunks[0], app);
    if has_alerts {
        render_alerts_banner(frame, chunks[1], app);
    }
    render_charts(frame, chunks[2], app);
    render_processes_section(frame, chunks[3], app);
    render_status(frame, chunks[4], app);
    render_footer(frame, chunks[5]);

    if app.show_help {
        render_help_overlay(frame, area);
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &MonitorApp) {
    let (state, color) = if app.sampler.is_paused() {
        ("PAUSED", Color::Yellow)
    } else {
        ("RUNNING", Color::Green)
    };

    let line = Line::from(vec![
        Span::styled(" resmon ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(state, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::raw(format!(
            " │ interval {} ms │ tick {} │ history {}",
            app.config.update_interval_ms,
            app.sampler.history().tick_count(),
            app.sampler.history().retention()
        )),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_alerts_banner(frame: &mut Frame, area: Rect, app: &MonitorApp) {
    let block = Block::default()
        .title(" ⚠ ALERTS ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let lines: Vec<Line> = app
        .alerts
        .iter()
        .map(|alert| {
            let (icon, color) = match alert.severity {
                AlertSeverity::Critical => ("🔴", Color::Red),
                AlertSeverity::Warning => ("⚠ ", Color::Yellow),
            };
            Line::styled(
                format!("{} {}", icon, alert.message),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_charts(frame: &mut Frame, area: Rect, app: &MonitorApp) {
    let keys = app.metric_keys();
    if keys.is_empty() {
        let para = Paragraph::new("No metrics available")
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        frame.render_widget(para, area);
        return;
    }

    let (rows, cols) = grid_shape(keys.len());
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, rows as u32); rows])
        .split(area);

    for (row, row_area) in row_areas.iter().enumerate() {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, cols as u32); cols])
            .split(*row_area);

        for (col, cell) in cells.iter().enumerate() {
            let index = row * cols + col;
            if let Some(key) = keys.get(index) {
                render_metric_chart(frame, *cell, app, key, index == app.selected_metric);
            }
        }
    }
}

fn render_metric_chart(frame: &mut Frame, area: Rect, app: &MonitorApp, key: &MetricKey, selected: bool) {
    let history = app.sampler.history();
    let latest = history.latest(key);
    let color = usage_color(key, latest);

    let latest_str = match latest {
        Some(v) if key.is_percent() => match app.sampler.latest_bytes(key) {
            Some((used, total)) => format!(
                "{} ({} / {})",
                format_percent(v),
                format_size(used),
                format_size(total)
            ),
            None => format_percent(v),
        },
        Some(v) => format_rate(v),
        None => "--".to_string(),
    };

    let border_style = if selected {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let block = Block::default()
        .title(format!(" {} {} ", key.label(), latest_str))
        .borders(Borders::ALL)
        .border_style(border_style);

    // Skipped ticks leave a buffer short until the axis saturates
    let points = history.points(key);
    if points.is_empty() {
        let para = Paragraph::new("waiting for data...")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(para, area);
        return;
    }

    let x_min = points.first().map(|p| p.0).unwrap_or(0.0);
    let x_max = points.last().map(|p| p.0).unwrap_or(0.0).max(x_min + 1.0);
    let y_max = if key.is_percent() {
        100.0
    } else {
        points.iter().map(|p| p.1).fold(1.0_f64, f64::max) * 1.1
    };

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(&points);

    let y_labels = if key.is_percent() {
        vec!["0".to_string(), "50".to_string(), "100".to_string()]
    } else {
        vec!["0".to_string(), format!("{:.0}", y_max)]
    };

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([x_min, x_max])
                .labels(vec![format!("{:.0}", x_min), format!("{:.0}", x_max)]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, y_max])
                .labels(y_labels),
        );

    frame.render_widget(chart, area);
}

fn render_processes_section(frame: &mut Frame, area: Rect, app: &MonitorApp) {
    let sort = app.sort_handle.get();
    let block = Block::default()
        .title(format!(" Top processes (by {}) [s:sort] ", sort))
        .borders(Borders::ALL);

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let highlight = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let (cpu_style, mem_style) = match sort {
        ProcessSort::Cpu => (highlight, bold),
        ProcessSort::Memory => (bold, highlight),
    };

    let header = Row::new(vec![
        Cell::from("PID").style(bold),
        Cell::from("Name").style(bold),
        Cell::from("CPU %").style(cpu_style),
        Cell::from("MEM %").style(mem_style),
    ])
    .height(1);

    let rows: Vec<Row> = app
        .sampler
        .latest_processes()
        .iter()
        .map(|p| {
            Row::new(vec![
                Cell::from(p.pid.to_string()),
                Cell::from(p.name.clone()),
                Cell::from(format!("{:.1}", p.cpu_percent)),
                Cell::from(format!("{:.1}", p.memory_percent)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Percentage(50),
            Constraint::Length(8),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .block(block);

    frame.render_widget(table, area);
}

fn render_status(frame: &mut Frame, area: Rect, app: &MonitorApp) {
    let failures = &app.last_report.failures;

    let line = match &app.status {
        Some(status) => {
            let color = match status.kind {
                StatusKind::Info => Color::Cyan,
                StatusKind::Success => Color::Green,
                StatusKind::Error => Color::Red,
            };
            Line::styled(format!(" {}", status.text), Style::default().fg(color))
        }
        None if !failures.is_empty() => {
            let names: Vec<&str> = failures.iter().map(|f| f.monitor.as_str()).collect();
            Line::styled(
                format!(" skipped this tick: {}", names.join(", ")),
                Style::default().fg(Color::DarkGray),
            )
        }
        None => Line::default(),
    };

    frame.render_widget(Paragraph::new(line), area);
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let help = " q: Quit │ p: Pause │ e/E: Export CSV/JSON │ x: Export selected │ Tab: Select │ s: Sort │ +/-: Interval │ ?: Help ";
    let para = Paragraph::new(help).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(para, area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let help_text = r#"
    resmon - Help

    Keyboard Shortcuts:
    ─────────────────────────────────────
    q / Esc       Quit the application
    p / Space     Pause or resume sampling
    e             Export all metrics (CSV)
    E             Export all metrics (JSON)
    x             Export selected metric (CSV)
    Tab / →       Select next chart
    Shift+Tab / ← Select previous chart
    s             Toggle process sort (CPU/Memory)
    + / -         Faster / slower refresh
    ? / h         Toggle this help screen

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
