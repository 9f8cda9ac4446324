//! Resource monitors.
//!
//! Every monitor answers `get_usage` with zero or more samples and reports
//! failures through `Result`; the sampler decides what a failure means for
//! the current tick.

mod cpu;
mod disk;
mod gpu;
mod memory;
mod network;
mod process;

pub use cpu::CpuMonitor;
pub use disk::{is_excluded_partition, DiskMonitor, DiskSource, DiskSpace, Partition, SysinfoDiskSource};
pub use gpu::{GpuMonitor, GpuProvider, GpuReading, GpuVendor};
pub use memory::MemoryMonitor;
pub use network::{NetReading, NetSource, NetworkMonitor, SysinfoNetSource, NETWORK_SAMPLE_KEY};
pub use process::{
    rank_processes, ProcessReadError, ProcessMonitor, ProcessRead, ProcessSort, ProcessSource,
    SortHandle, SysinfoProcessSource, DEFAULT_TOP_PROCESSES,
};

use crate::error::Result;

use super::metrics::{MetricKey, Sample};

/// A single resource source polled once per tick.
pub trait Monitor {
    /// Short name used in logs and failure reports
    fn name(&self) -> &str;

    /// History keys this monitor feeds. Resolved once, at construction.
    fn metric_keys(&self) -> Vec<MetricKey>;

    /// Read the current usage.
    fn get_usage(&mut self) -> Result<Vec<Sample>>;

    /// True when a successful reading replaces the process table, even if empty.
    fn ranks_processes(&self) -> bool {
        false
    }
}

/// Host monitors that feed the history, without the process ranking.
pub fn metric_monitors() -> Vec<Box<dyn Monitor>> {
    vec![
        Box::new(CpuMonitor::new()),
        Box::new(MemoryMonitor::new()),
        Box::new(DiskMonitor::new(Box::new(SysinfoDiskSource::new()))),
        Box::new(GpuMonitor::detect()),
        Box::new(NetworkMonitor::new(Box::new(SysinfoNetSource::new()))),
    ]
}

/// The standard monitor set backed by the host, plus the process sort handle.
pub fn default_monitors(top_processes: usize, sort: ProcessSort) -> (Vec<Box<dyn Monitor>>, SortHandle) {
    let processes = ProcessMonitor::new(Box::new(SysinfoProcessSource::new()), top_processes, sort);
    let sort_handle = processes.sort_handle();

    let mut monitors = metric_monitors();
    monitors.push(Box::new(processes));

    (monitors, sort_handle)
}
