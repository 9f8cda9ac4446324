//! Per-tick sampling: query every monitor, feed the history, evaluate alerts.

use std::collections::HashMap;

use super::alerts::{evaluate_alerts, Alert, AlertConfig};
use super::history::HistoryBuffers;
use super::metrics::{MetricKey, ProcessUsage, SampleDetail};
use super::monitors::Monitor;
use crate::core::config::AppConfig;

/// A monitor that failed during a tick.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorFailure {
    pub monitor: String,
    pub message: String,
}

/// Outcome of one call to [`Sampler::tick`].
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    /// False when the sampler was paused and nothing was touched
    pub sampled: bool,
    pub timestamp: Option<u64>,
    pub failures: Vec<MonitorFailure>,
    pub alerts: Vec<Alert>,
}

/// Owns the monitors and the history they feed.
pub struct Sampler {
    monitors: Vec<Box<dyn Monitor>>,
    history: HistoryBuffers,
    alert_config: AlertConfig,
    processes: Vec<ProcessUsage>,
    /// Last (used, total) bytes per key, for monitors that report them
    byte_details: HashMap<MetricKey, (u64, u64)>,
    paused: bool,
}

impl Sampler {
    /// Resolve the key set from `monitors` and size the history from `config`.
    pub fn new(monitors: Vec<Box<dyn Monitor>>, config: &AppConfig) -> Self {
        let keys: Vec<MetricKey> = monitors.iter().flat_map(|m| m.metric_keys()).collect();
        log::info!(
            "Sampling {} monitors, {} metrics: {}",
            monitors.len(),
            keys.len(),
            keys.iter().map(|k| k.as_str()).collect::<Vec<_>>().join(", ")
        );

        Self {
            monitors,
            history: HistoryBuffers::with_capacity(keys, config.history_length),
            alert_config: AlertConfig::from(config),
            processes: Vec::new(),
            byte_details: HashMap::new(),
            paused: false,
        }
    }

    /// Run one tick. Failed monitors are skipped for this tick only.
    pub fn tick(&mut self) -> TickReport {
        if self.paused {
            return TickReport::default();
        }

        let mut report = TickReport {
            sampled: true,
            ..Default::default()
        };
        let mut appended: Vec<(MetricKey, f64)> = Vec::new();
        let mut processes = None;

        for monitor in self.monitors.iter_mut() {
            match monitor.get_usage() {
                Ok(samples) => {
                    if monitor.ranks_processes() {
                        processes.get_or_insert_with(Vec::new);
                    }
                    for sample in &samples {
                        if let SampleDetail::Process(p) = &sample.detail {
                            processes.get_or_insert_with(Vec::new).push(p.clone());
                            continue;
                        }
                        if let SampleDetail::Bytes { used, total } = sample.detail {
                            self.byte_details.insert(sample.key.clone(), (used, total));
                        }
                        for (key, value) in sample.points() {
                            if self.history.append(&key, value) {
                                appended.push((key, value));
                            }
                        }
                    }
                }
                Err(e) => {
                    log::warn!("Monitor '{}' failed: {}", monitor.name(), e);
                    report.failures.push(MonitorFailure {
                        monitor: monitor.name().to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        report.timestamp = Some(self.history.tick_complete());
        if let Some(processes) = processes {
            self.processes = processes;
        }

        report.alerts = evaluate_alerts(&appended, &self.alert_config);
        for alert in &report.alerts {
            log::warn!("{}", alert.message);
        }

        report
    }

    pub fn history(&self) -> &HistoryBuffers {
        &self.history
    }

    /// Latest top-process ranking, kept from the last successful process read.
    pub fn latest_processes(&self) -> &[ProcessUsage] {
        &self.processes
    }

    pub fn latest_bytes(&self, key: &MetricKey) -> Option<(u64, u64)> {
        self.byte_details.get(key).copied()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    pub fn set_thresholds(&mut self, config: AlertConfig) {
        self.alert_config = config;
    }

    pub fn alert_config(&self) -> AlertConfig {
        self.alert_config
    }

    pub fn set_retention(&mut self, retention: usize) {
        self.history.set_retention(retention);
    }
}
