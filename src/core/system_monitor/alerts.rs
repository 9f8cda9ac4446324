//! Threshold alerts for CPU and RAM.
//!
//! Evaluated once per sampled tick against that tick's values; the result
//! replaces the previous tick's alerts.

use serde::{Deserialize, Serialize};

use super::metrics::{MetricKey, CPU_KEY, RAM_KEY};
use crate::core::config::AppConfig;

/// Points over the threshold at which a warning becomes critical.
const CRITICAL_MARGIN: f64 = 10.0;

/// Alert configuration with thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertConfig {
    pub cpu_threshold: f64, // (%)
    pub ram_threshold: f64, // (%)
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for AlertConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            cpu_threshold: f64::from(config.cpu_threshold),
            ram_threshold: f64::from(config.ram_threshold),
        }
    }
}

/// An individual alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub severity: AlertSeverity,
    pub category: AlertCategory,
    pub message: String,
    pub value: f64,
    pub threshold: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertSeverity {
    Warning,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertCategory {
    Cpu,
    Memory,
}

impl AlertCategory {
    fn label(&self) -> &'static str {
        match self {
            AlertCategory::Cpu => "CPU",
            AlertCategory::Memory => "RAM",
        }
    }
}

/// Evaluate the values appended during one tick.
///
/// At most one alert per category; a category absent from `values` (its
/// monitor failed) never alerts.
pub fn evaluate_alerts(values: &[(MetricKey, f64)], config: &AlertConfig) -> Vec<Alert> {
    let mut alerts = Vec::new();

    for (category, key, threshold) in [
        (AlertCategory::Cpu, CPU_KEY, config.cpu_threshold),
        (AlertCategory::Memory, RAM_KEY, config.ram_threshold),
    ] {
        let Some(value) = values
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| *v)
        else {
            continue;
        };

        if value < threshold {
            continue;
        }

        let severity = if value >= 100.0 || value >= threshold + CRITICAL_MARGIN {
            AlertSeverity::Critical
        } else {
            AlertSeverity::Warning
        };

        alerts.push(Alert {
            severity,
            category,
            message: format!(
                "{} usage at {:.1}% (threshold: {:.0}%)",
                category.label(),
                value,
                threshold
            ),
            value,
            threshold,
        });
    }

    alerts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AlertConfig {
        AlertConfig {
            cpu_threshold: 80.0,
            ram_threshold: 90.0,
        }
    }

    #[test]
    fn test_cpu_warning() {
        let alerts = evaluate_alerts(&[(MetricKey::cpu(), 85.0), (MetricKey::ram(), 10.0)], &config());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].category, AlertCategory::Cpu);
        assert_eq!(alerts[0].severity, AlertSeverity::Warning);
    }

    #[test]
    fn test_critical_margin_and_ceiling() {
        let alerts = evaluate_alerts(&[(MetricKey::cpu(), 95.0), (MetricKey::ram(), 100.0)], &config());
        assert_eq!(alerts.len(), 2);
        assert!(alerts.iter().all(|a| a.severity == AlertSeverity::Critical));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let alerts = evaluate_alerts(&[(MetricKey::ram(), 90.0)], &config());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].category, AlertCategory::Memory);
    }

    #[test]
    fn test_no_alerts() {
        assert!(evaluate_alerts(&[(MetricKey::cpu(), 10.0)], &config()).is_empty());
        assert!(evaluate_alerts(&[], &config()).is_empty());
    }
}
