use sysinfo::{MemoryRefreshKind, RefreshKind, System};

use super::Monitor;
use crate::core::system_monitor::metrics::{MetricKey, Sample};
use crate::error::Result;

/// Physical memory usage (RAM, swap excluded)
pub struct MemoryMonitor {
    system: System,
}

impl MemoryMonitor {
    pub fn new() -> Self {
        let system = System::new_with_specifics(
            RefreshKind::nothing().with_memory(MemoryRefreshKind::nothing().with_ram()),
        );
        Self { system }
    }
}

impl Default for MemoryMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl Monitor for MemoryMonitor {
    fn name(&self) -> &str {
        "memory"
    }

    fn metric_keys(&self) -> Vec<MetricKey> {
        vec![MetricKey::ram()]
    }

    fn get_usage(&mut self) -> Result<Vec<Sample>> {
        self.system
            .refresh_memory_specifics(MemoryRefreshKind::nothing().with_ram());

        let total = self.system.total_memory();
        let used = self.system.used_memory();

        Ok(vec![Sample::bytes(MetricKey::ram(), used, total)])
    }
}
