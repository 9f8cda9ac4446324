use serde::{Deserialize, Serialize};
use std::fmt;

pub const CPU_KEY: &str = "CPU";
pub const RAM_KEY: &str = "RAM";
pub const NET_UP_KEY: &str = "NET_UP";
pub const NET_DOWN_KEY: &str = "NET_DOWN";

/// Identifier of one scalar time series ("CPU", "RAM", a mount path, a GPU name...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MetricKey(String);

/// What a metric measures, used for labels and chart scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Cpu,
    Memory,
    Disk,
    Gpu,
    /// Throughput in KB/s, not bounded to 0-100
    Network,
}

impl MetricKey {
    pub fn new<S: Into<String>>(key: S) -> Self {
        MetricKey(key.into())
    }

    pub fn cpu() -> Self {
        Self::new(CPU_KEY)
    }

    pub fn ram() -> Self {
        Self::new(RAM_KEY)
    }

    pub fn net_up() -> Self {
        Self::new(NET_UP_KEY)
    }

    pub fn net_down() -> Self {
        Self::new(NET_DOWN_KEY)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Best-effort classification from the key text alone.
    pub fn kind(&self) -> MetricKind {
        match self.0.as_str() {
            CPU_KEY => MetricKind::Cpu,
            RAM_KEY => MetricKind::Memory,
            NET_UP_KEY | NET_DOWN_KEY => MetricKind::Network,
            k if looks_like_mount(k) => MetricKind::Disk,
            _ => MetricKind::Gpu,
        }
    }

    /// Column/axis label, e.g. `CPU (%)`, `Disk /home (%)`, `NET_UP (KB/s)`.
    pub fn label(&self) -> String {
        match self.kind() {
            MetricKind::Cpu | MetricKind::Memory => format!("{} (%)", self.0),
            MetricKind::Disk => format!("Disk {} (%)", self.0),
            MetricKind::Gpu => format!("GPU {} (%)", self.0),
            MetricKind::Network => format!("{} (KB/s)", self.0),
        }
    }

    pub fn is_percent(&self) -> bool {
        self.kind() != MetricKind::Network
    }
}

fn looks_like_mount(key: &str) -> bool {
    key.starts_with('/')
        || key.starts_with('\\')
        || (key.len() >= 2 && key.as_bytes()[1] == b':' && key.as_bytes()[0].is_ascii_alphabetic())
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MetricKey {
    fn from(value: &str) -> Self {
        MetricKey::new(value)
    }
}

/// Source-specific payload carried next to the percent value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SampleDetail {
    None,
    Bytes { used: u64, total: u64 },
    Network { upload_kbps: f64, download_kbps: f64 },
    Process(ProcessUsage),
}

/// One reading returned by a monitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub key: MetricKey,
    pub percent: f64,
    pub detail: SampleDetail,
}

impl Sample {
    pub fn percent(key: MetricKey, percent: f64) -> Self {
        Self {
            key,
            percent,
            detail: SampleDetail::None,
        }
    }

    pub fn bytes(key: MetricKey, used: u64, total: u64) -> Self {
        Self {
            key,
            percent: percent_of(used, total),
            detail: SampleDetail::Bytes { used, total },
        }
    }

    /// Scalar points this sample contributes to the history buffers.
    ///
    /// Network samples fan out into upload and download series; process
    /// samples feed the process table only.
    pub fn points(&self) -> Vec<(MetricKey, f64)> {
        match &self.detail {
            SampleDetail::Network {
                upload_kbps,
                download_kbps,
            } => vec![
                (MetricKey::net_up(), *upload_kbps),
                (MetricKey::net_down(), *download_kbps),
            ],
            SampleDetail::Process(_) => Vec::new(),
            SampleDetail::None | SampleDetail::Bytes { .. } => {
                vec![(self.key.clone(), self.percent)]
            }
        }
    }
}

/// Snapshot of a single process for the top-N table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessUsage {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f64,
    pub memory_percent: f64,
}

/// `used / total` as a percentage, 0 when total is 0.
pub fn percent_of(used: u64, total: u64) -> f64 {
    if total > 0 {
        (used as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(MetricKey::cpu().label(), "CPU (%)");
        assert_eq!(MetricKey::new("/home").label(), "Disk /home (%)");
        assert_eq!(MetricKey::new("C:\\").label(), "Disk C:\\ (%)");
        assert_eq!(MetricKey::new("RTX 3080").label(), "GPU RTX 3080 (%)");
        assert_eq!(MetricKey::net_down().label(), "NET_DOWN (KB/s)");
    }

    #[test]
    fn test_network_sample_fans_out() {
        let sample = Sample {
            key: MetricKey::new("NET"),
            percent: 1.0,
            detail: SampleDetail::Network {
                upload_kbps: 2.0,
                download_kbps: 3.0,
            },
        };
        assert_eq!(
            sample.points(),
            vec![(MetricKey::net_up(), 2.0), (MetricKey::net_down(), 3.0)]
        );
    }

    #[test]
    fn test_percent_of_zero_total() {
        assert_eq!(percent_of(10, 0), 0.0);
        assert_eq!(percent_of(50, 200), 25.0);
        assert_eq!(Sample::bytes(MetricKey::ram(), 1, 4).percent, 25.0);
    }
}
