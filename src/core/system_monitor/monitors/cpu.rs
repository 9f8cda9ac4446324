use sysinfo::{CpuRefreshKind, RefreshKind, System};

use super::Monitor;
use crate::core::system_monitor::metrics::{MetricKey, Sample};
use crate::error::{ResmonError, Result};

/// Global CPU utilisation.
///
/// Usage is the delta between two refreshes, so the first meaningful reading
/// needs `sysinfo::MINIMUM_CPU_UPDATE_INTERVAL` to pass after construction.
pub struct CpuMonitor {
    system: System,
}

impl CpuMonitor {
    pub fn new() -> Self {
        let mut system = System::new_with_specifics(
            RefreshKind::nothing().with_cpu(CpuRefreshKind::nothing().with_cpu_usage()),
        );
        system.refresh_cpu_usage();
        Self { system }
    }
}

impl Default for CpuMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl Monitor for CpuMonitor {
    fn name(&self) -> &str {
        "cpu"
    }

    fn metric_keys(&self) -> Vec<MetricKey> {
        vec![MetricKey::cpu()]
    }

    fn get_usage(&mut self) -> Result<Vec<Sample>> {
        self.system.refresh_cpu_usage();

        if self.system.cpus().is_empty() {
            return Err(ResmonError::metric_collection("no CPUs reported"));
        }

        let usage = f64::from(self.system.global_cpu_usage());
        if !usage.is_finite() {
            return Err(ResmonError::metric_collection(format!(
                "invalid CPU usage reading: {}",
                usage
            )));
        }

        Ok(vec![Sample::percent(MetricKey::cpu(), usage.clamp(0.0, 100.0))])
    }
}
