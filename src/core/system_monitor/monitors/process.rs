use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use sysinfo::{MemoryRefreshKind, ProcessRefreshKind, ProcessesToUpdate, RefreshKind, System};

use super::Monitor;
use crate::core::system_monitor::metrics::{percent_of, MetricKey, ProcessUsage, Sample, SampleDetail};
use crate::error::Result;

pub const DEFAULT_TOP_PROCESSES: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProcessSort {
    #[default]
    Cpu,
    Memory,
}

impl ProcessSort {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "cpu" => Some(ProcessSort::Cpu),
            "memory" | "mem" | "ram" => Some(ProcessSort::Memory),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ProcessSort::Cpu => ProcessSort::Memory,
            ProcessSort::Memory => ProcessSort::Cpu,
        }
    }
}

impl fmt::Display for ProcessSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessSort::Cpu => f.write_str("CPU"),
            ProcessSort::Memory => f.write_str("memory"),
        }
    }
}

/// Why a process could not be read during enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessReadError {
    /// Exited between the refresh and the read
    Vanished(u32),
}

pub type ProcessRead = std::result::Result<ProcessUsage, ProcessReadError>;

/// Host access needed by [`ProcessMonitor`].
pub trait ProcessSource {
    fn processes(&mut self) -> Vec<ProcessRead>;
}

/// Keep readable processes, sort descending by `sort`, take `top_n`.
pub fn rank_processes(reads: Vec<ProcessRead>, top_n: usize, sort: ProcessSort) -> Vec<ProcessUsage> {
    let mut processes: Vec<ProcessUsage> = reads
        .into_iter()
        .filter_map(|read| match read {
            Ok(usage) => Some(usage),
            Err(e) => {
                log::trace!("Skipping process: {:?}", e);
                None
            }
        })
        .collect();

    let key = |p: &ProcessUsage| match sort {
        ProcessSort::Cpu => p.cpu_percent,
        ProcessSort::Memory => p.memory_percent,
    };
    processes.sort_by(|a, b| key(b).total_cmp(&key(a)));
    processes.truncate(top_n);
    processes
}

/// Shared sort key, so the UI can flip it while the monitor sits in the sampler.
#[derive(Debug, Clone, Default)]
pub struct SortHandle(Rc<Cell<ProcessSort>>);

impl SortHandle {
    pub fn get(&self) -> ProcessSort {
        self.0.get()
    }

    pub fn set(&self, sort: ProcessSort) {
        self.0.set(sort);
    }

    pub fn toggle(&self) -> ProcessSort {
        let next = self.get().toggled();
        self.set(next);
        next
    }
}

/// Top-N processes by CPU or memory. Feeds the process table, not the history.
pub struct ProcessMonitor {
    source: Box<dyn ProcessSource>,
    top_n: usize,
    sort: SortHandle,
}

impl ProcessMonitor {
    pub fn new(source: Box<dyn ProcessSource>, top_n: usize, sort: ProcessSort) -> Self {
        let handle = SortHandle::default();
        handle.set(sort);
        Self {
            source,
            top_n,
            sort: handle,
        }
    }

    pub fn sort(&self) -> ProcessSort {
        self.sort.get()
    }

    pub fn sort_handle(&self) -> SortHandle {
        self.sort.clone()
    }

    pub fn top(&mut self) -> Vec<ProcessUsage> {
        rank_processes(self.source.processes(), self.top_n, self.sort.get())
    }
}

impl Monitor for ProcessMonitor {
    fn name(&self) -> &str {
        "process"
    }

    fn metric_keys(&self) -> Vec<MetricKey> {
        Vec::new()
    }

    fn ranks_processes(&self) -> bool {
        true
    }

    fn get_usage(&mut self) -> Result<Vec<Sample>> {
        let sort = self.sort.get();
        Ok(self
            .top()
            .into_iter()
            .map(|p| Sample {
                key: MetricKey::new(p.name.clone()),
                percent: match sort {
                    ProcessSort::Cpu => p.cpu_percent,
                    ProcessSort::Memory => p.memory_percent,
                },
                detail: SampleDetail::Process(p),
            })
            .collect())
    }
}

/// [`ProcessSource`] backed by `sysinfo::System`.
pub struct SysinfoProcessSource {
    system: System,
}

impl SysinfoProcessSource {
    pub fn new() -> Self {
        let system = System::new_with_specifics(
            RefreshKind::nothing()
                .with_memory(MemoryRefreshKind::nothing().with_ram())
                .with_processes(ProcessRefreshKind::nothing().with_cpu().with_memory()),
        );
        Self { system }
    }
}

impl Default for SysinfoProcessSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessSource for SysinfoProcessSource {
    fn processes(&mut self) -> Vec<ProcessRead> {
        self.system
            .refresh_memory_specifics(MemoryRefreshKind::nothing().with_ram());
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing().with_cpu().with_memory(),
        );

        let total_memory = self.system.total_memory();
        self.system
            .processes()
            .values()
            .map(|process| {
                let pid = process.pid().as_u32();
                if !process.exists() {
                    return Err(ProcessReadError::Vanished(pid));
                }
                Ok(ProcessUsage {
                    pid,
                    name: process.name().to_string_lossy().to_string(),
                    cpu_percent: f64::from(process.cpu_usage()),
                    memory_percent: percent_of(process.memory(), total_memory),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usage(pid: u32, cpu: f64, mem: f64) -> ProcessRead {
        Ok(ProcessUsage {
            pid,
            name: format!("proc{}", pid),
            cpu_percent: cpu,
            memory_percent: mem,
        })
    }

    #[test]
    fn test_rank_by_cpu_skips_vanished() {
        let reads = vec![
            usage(1, 5.0, 50.0),
            Err(ProcessReadError::Vanished(2)),
            usage(3, 40.0, 1.0),
            Err(ProcessReadError::Vanished(4)),
            usage(5, 20.0, 10.0),
        ];
        let ranked = rank_processes(reads, 2, ProcessSort::Cpu);
        let pids: Vec<u32> = ranked.iter().map(|p| p.pid).collect();
        assert_eq!(pids, vec![3, 5]);
    }

    #[test]
    fn test_rank_by_memory() {
        let reads = vec![usage(1, 5.0, 50.0), usage(3, 40.0, 1.0), usage(5, 20.0, 10.0)];
        let ranked = rank_processes(reads, 10, ProcessSort::Memory);
        let pids: Vec<u32> = ranked.iter().map(|p| p.pid).collect();
        assert_eq!(pids, vec![1, 5, 3]);
    }

    struct FixedSource;

    impl ProcessSource for FixedSource {
        fn processes(&mut self) -> Vec<ProcessRead> {
            vec![usage(7, 1.0, 2.0)]
        }
    }

    #[test]
    fn test_process_samples_feed_no_history() {
        let mut monitor = ProcessMonitor::new(Box::new(FixedSource), 5, ProcessSort::Memory);
        assert!(monitor.metric_keys().is_empty());
        let samples = monitor.get_usage().unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].percent, 2.0);
        assert!(samples[0].points().is_empty());
    }

    #[test]
    fn test_sort_handle_is_shared() {
        let mut monitor = ProcessMonitor::new(Box::new(FixedSource), 5, ProcessSort::Cpu);
        let handle = monitor.sort_handle();
        assert_eq!(handle.toggle(), ProcessSort::Memory);
        assert_eq!(monitor.sort(), ProcessSort::Memory);
        assert_eq!(monitor.get_usage().unwrap()[0].percent, 2.0);
    }

    #[test]
    fn test_sort_parse() {
        assert_eq!(ProcessSort::parse("MEM"), Some(ProcessSort::Memory));
        assert_eq!(ProcessSort::parse("cpu"), Some(ProcessSort::Cpu));
        assert_eq!(ProcessSort::parse("io"), None);
        assert_eq!(ProcessSort::Cpu.toggled(), ProcessSort::Memory);
    }
}
