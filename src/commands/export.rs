//! Headless export: sample for a number of ticks, then write a snapshot.

use anyhow::{bail, Context, Result};
use clap::ArgMatches;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::config::AppConfig;
use crate::core::system_monitor::{
    export_snapshot, metric_monitors, ExportFormat, MetricKey, Monitor, Sampler,
};
use crate::ui::prompts;

pub const DEFAULT_EXPORT_TICKS: usize = 5;

pub fn execute(matches: &ArgMatches, config_path: &Path) -> Result<()> {
    let output = matches
        .get_one::<PathBuf>("output")
        .context("Output path is required")?;

    let format = match matches.get_one::<String>("format") {
        Some(raw) => match ExportFormat::parse(raw) {
            Some(format) => format,
            None => bail!("Unsupported export format '{}' (expected csv or json)", raw),
        },
        None => ExportFormat::from_path(output),
    };

    let mut config = AppConfig::load(config_path);
    let ticks = matches
        .get_one::<u64>("ticks")
        .map(|t| usize::try_from(*t).unwrap_or(usize::MAX))
        .unwrap_or(DEFAULT_EXPORT_TICKS);
    if let Some(interval) = matches.get_one::<u64>("interval") {
        config.update_interval_ms = *interval;
    }
    // Keep every sampled tick
    config.history_length = ticks;
    config.sanitize();
    let ticks = config.history_length;

    let metric = matches.get_one::<String>("metric").map(|m| MetricKey::new(m.as_str()));

    prompts::info(&format!(
        "Sampling {} ticks every {} ms...",
        ticks, config.update_interval_ms
    ));
    let sampler = sample(metric_monitors(), &config, ticks);

    if let Some(key) = &metric {
        if !sampler.history().contains(key) {
            let known: Vec<&str> = sampler.history().keys().iter().map(|k| k.as_str()).collect();
            bail!("Unknown metric '{}' (available: {})", key, known.join(", "));
        }
    }

    let snapshot = sampler.history().snapshot();
    export_snapshot(&snapshot, metric.as_ref(), output, format)
        .with_context(|| format!("Failed to export to {}", output.display()))?;

    prompts::success(&format!("✓ Exported {} ticks to {}", ticks, output.display()));
    Ok(())
}

/// Run `ticks` sampling rounds, `update_interval_ms` apart.
pub fn sample(monitors: Vec<Box<dyn Monitor>>, config: &AppConfig, ticks: usize) -> Sampler {
    let mut sampler = Sampler::new(monitors, config);
    let interval = Duration::from_millis(config.update_interval_ms);

    // First CPU reading needs a measurement window
    std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);

    for tick in 0..ticks {
        if tick > 0 {
            std::thread::sleep(interval);
        }
        let report = sampler.tick();
        for failure in &report.failures {
            log::debug!("Tick {}: {} skipped ({})", tick, failure.monitor, failure.message);
        }
    }

    sampler
}
