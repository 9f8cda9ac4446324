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

use crate::core::config::AppConfig;
use crate::core::system_monitor::{
    default_export_path, default_monitors, export_snapshot, Alert, ExportFormat, MetricKey,
    Monitor, ProcessSort, Sampler, SortHandle, TickReport,
};

use super::event_handler::MonitorEvent;
use super::render::render_ui;

/// Step applied by `+`/`-`, also the shortest interval allowed.
pub const INTERVAL_STEP_MS: u64 = 250;

/// Ticks a status message stays on screen.
pub const STATUS_TTL_TICKS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

/// One line of feedback shown under the charts.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    fn new(kind: StatusKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Monitor application state
pub struct MonitorApp {
    pub sampler: Sampler,
    pub sort_handle: SortHandle,
    pub config: AppConfig,
    pub config_path: Option<PathBuf>,
    pub export_dir: PathBuf,
    pub alerts: Vec<Alert>,
    pub last_report: TickReport,
    pub selected_metric: usize,
    pub should_quit: bool,
    pub show_help: bool,
    pub status: Option<StatusMessage>,
    status_ticks_left: u32,
}

impl MonitorApp {
    pub fn new(config: MonitorAppConfig) -> Self {
        let (monitors, sort_handle) = default_monitors(config.top_processes, config.sort);
        Self::with_monitors(monitors, sort_handle, config)
    }

    /// Build the app around an explicit monitor set.
    pub fn with_monitors(
        monitors: Vec<Box<dyn Monitor>>,
        sort_handle: SortHandle,
        config: MonitorAppConfig,
    ) -> Self {
        let sampler = Sampler::new(monitors, &config.app_config);

        Self {
            sampler,
            sort_handle,
            config: config.app_config,
            config_path: config.config_path,
            export_dir: config.export_dir,
            alerts: Vec::new(),
            last_report: TickReport::default(),
            selected_metric: 0,
            should_quit: false,
            show_help: false,
            status: None,
            status_ticks_left: 0,
        }
    }

    /// Sample once. Alerts are replaced only when the tick actually sampled.
    pub fn tick(&mut self) {
        let report = self.sampler.tick();
        if report.sampled {
            self.alerts = report.alerts.clone();
        }
        self.last_report = report;

        if self.status.is_some() {
            self.status_ticks_left = self.status_ticks_left.saturating_sub(1);
            if self.status_ticks_left == 0 {
                self.status = None;
            }
        }
    }

    fn set_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.status = Some(StatusMessage::new(kind, text));
        self.status_ticks_left = STATUS_TTL_TICKS;
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.config.update_interval_ms)
    }

    pub fn metric_keys(&self) -> &[MetricKey] {
        self.sampler.history().keys()
    }

    pub fn selected_key(&self) -> Option<&MetricKey> {
        self.metric_keys().get(self.selected_metric)
    }

    /// Handle keyboard events
    pub fn handle_event(&mut self, event: MonitorEvent) {
        match event {
            MonitorEvent::Quit => self.should_quit = true,
            MonitorEvent::ToggleHelp => self.show_help = !self.show_help,
            MonitorEvent::TogglePause => {
                let paused = self.sampler.toggle_pause();
                let text = if paused { "Sampling paused" } else { "Sampling resumed" };
                self.set_status(StatusKind::Info, text);
            }
            MonitorEvent::ExportAllCsv => self.export(false, ExportFormat::Csv),
            MonitorEvent::ExportAllJson => self.export(false, ExportFormat::Json),
            MonitorEvent::ExportSelected => self.export(true, ExportFormat::Csv),
            MonitorEvent::NextMetric => {
                let count = self.metric_keys().len();
                if count > 0 {
                    self.selected_metric = (self.selected_metric + 1) % count;
                }
            }
            MonitorEvent::PrevMetric => {
                let count = self.metric_keys().len();
                if count > 0 {
                    self.selected_metric = if self.selected_metric == 0 {
                        count - 1
                    } else {
                        self.selected_metric - 1
                    };
                }
            }
            MonitorEvent::ToggleProcessSort => {
                let sort = self.sort_handle.toggle();
                self.set_status(StatusKind::Info, format!("Processes sorted by {}", sort));
            }
            MonitorEvent::FasterRefresh => {
                self.config.update_interval_ms = self
                    .config
                    .update_interval_ms
                    .saturating_sub(INTERVAL_STEP_MS)
                    .max(INTERVAL_STEP_MS);
                self.announce_interval();
            }
            MonitorEvent::SlowerRefresh => {
                self.config.update_interval_ms =
                    self.config.update_interval_ms.saturating_add(INTERVAL_STEP_MS);
                self.announce_interval();
            }
            MonitorEvent::None => {}
        }
    }

    fn announce_interval(&mut self) {
        let text = format!("Refresh interval: {} ms", self.config.update_interval_ms);
        self.set_status(StatusKind::Info, text);
    }

    fn export(&mut self, selected_only: bool, format: ExportFormat) {
        let key = if selected_only {
            match self.selected_key() {
                Some(key) => Some(key.clone()),
                None => {
                    self.set_status(StatusKind::Error, "No metric selected");
                    return;
                }
            }
        } else {
            None
        };

        let scope = key.as_ref().map(|k| k.as_str()).unwrap_or("all");
        let path = default_export_path(&self.export_dir, scope, format);
        let snapshot = self.sampler.history().snapshot();

        match export_snapshot(&snapshot, key.as_ref(), &path, format) {
            Ok(()) => self.set_status(StatusKind::Success, format!("Exported to {}", path.display())),
            Err(e) => {
                log::error!("Export failed: {}", e);
                self.set_status(StatusKind::Error, format!("Export failed: {}", e));
            }
        }
    }

    /// Persist the in-memory configuration, if a path was given.
    pub fn save_config(&self) -> crate::Result<()> {
        match &self.config_path {
            Some(path) => self.config.save(path),
            None => Ok(()),
        }
    }
}

/// Configuration for the monitor app
#[derive(Debug, Clone)]
pub struct MonitorAppConfig {
    pub app_config: AppConfig,
    pub config_path: Option<PathBuf>,
    /// Where `e`/`E`/`x` exports land
    pub export_dir: PathBuf,
    pub top_processes: usize,
    pub sort: ProcessSort,
}

impl Default for MonitorAppConfig {
    fn default() -> Self {
        Self {
            app_config: AppConfig::default(),
            config_path: None,
            export_dir: PathBuf::from("."),
            top_processes: crate::core::system_monitor::monitors::DEFAULT_TOP_PROCESSES,
            sort: ProcessSort::Cpu,
        }
    }
}

/// Run the monitor TUI application
pub fn run_monitor_app(config: MonitorAppConfig) -> Result<()> {
    let mut app = MonitorApp::new(config);

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(e).context("Failed to enter alternate screen");
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = match Terminal::new(backend) {
        Ok(terminal) => terminal,
        Err(e) => {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            return Err(e).context("Failed to create terminal");
        }
    };

    let result = event_loop(&mut terminal, &mut app);

    // Restore terminal even if the loop failed
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    if let Err(e) = app.save_config() {
        log::warn!("Failed to save configuration: {}", e);
    }

    result
}

fn event_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut MonitorApp) -> Result<()> {
    // First CPU reading needs a measurement window
    std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
    app.tick();

    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| render_ui(frame, app))?;

        let timeout = app
            .interval()
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout).context("Event poll failed")? {
            if let Event::Key(key) = event::read().context("Event read failed")? {
                if key.kind == KeyEventKind::Press {
                    // Any key closes the help overlay
                    if app.show_help {
                        app.show_help = false;
                    } else {
                        app.handle_event(MonitorEvent::from_key(key));
                    }
                }
            }
        }

        if app.should_quit {
            break;
        }

        if last_tick.elapsed() >= app.interval() {
            app.tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}
