//! Resource monitoring core.
//!
//! Monitors produce samples, the sampler appends them to a rolling history
//! shared by every metric, and the exporter writes snapshots of that history
//! to CSV or JSON.

pub mod alerts;
pub mod export;
mod history;
mod metrics;
pub mod monitors;
mod sampler;

pub use alerts::{evaluate_alerts, Alert, AlertCategory, AlertConfig, AlertSeverity};
pub use export::{
    default_export_path, export_snapshot, CsvExporter, ExportData, ExportFormat, ExportPayload,
    Exporter, JsonExporter, MetricSeries,
};
pub use history::{HistoryBuffers, DEFAULT_HISTORY_SIZE};
pub use metrics::{
    percent_of, MetricKey, MetricKind, ProcessUsage, Sample, SampleDetail, CPU_KEY, NET_DOWN_KEY,
    NET_UP_KEY, RAM_KEY,
};
pub use monitors::{default_monitors, metric_monitors, Monitor, ProcessSort, SortHandle};
pub use sampler::{MonitorFailure, Sampler, TickReport};
