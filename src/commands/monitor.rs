//! Monitor command handler.
//!
//! Runs the live TUI dashboard.

use anyhow::{Context, Result};
use clap::ArgMatches;
use std::path::Path;

use crate::core::config::AppConfig;
use crate::core::system_monitor::monitors::DEFAULT_TOP_PROCESSES;
use crate::core::system_monitor::ProcessSort;
use crate::ui::monitor_tui::{run_monitor_app, MonitorAppConfig};

/// Execute the monitor command. `matches` is `None` when `resmon` runs bare.
pub fn execute(matches: Option<&ArgMatches>, config_path: &Path) -> Result<()> {
    let mut config = AppConfig::load(config_path);

    if let Some(matches) = matches {
        if let Some(interval) = matches.get_one::<u64>("interval") {
            config.update_interval_ms = *interval;
        }
        if let Some(history) = matches.get_one::<u64>("history") {
            config.history_length = usize::try_from(*history).unwrap_or(usize::MAX);
        }
        config.sanitize();
    }

    log::info!(
        "Starting monitor: interval {} ms, history {}",
        config.update_interval_ms,
        config.history_length
    );

    let export_dir = std::env::current_dir().context("Failed to resolve current directory")?;
    let app_config = MonitorAppConfig {
        app_config: config,
        config_path: Some(config_path.to_path_buf()),
        export_dir,
        top_processes: DEFAULT_TOP_PROCESSES,
        sort: ProcessSort::Cpu,
    };

    run_monitor_app(app_config).context("Failed to run resource monitor")
}
