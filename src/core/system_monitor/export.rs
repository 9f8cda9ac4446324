//! CSV and JSON export of buffered series.
//!
//! Exports always operate on an owned snapshot, never on the live buffers.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{ResmonError, Result};

use super::metrics::MetricKey;

pub const TIME_LABEL: &str = "Time (s)";

/// Ordered mapping of metric name to series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricSeries(Vec<(String, Vec<f64>)>);

impl MetricSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a series, keeping first-insertion order.
    pub fn push<S: Into<String>>(&mut self, name: S, values: Vec<f64>) {
        let name = name.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = values,
            None => self.0.push((name, values)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }

    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, Vec<f64>)> for MetricSeries {
    fn from_iter<I: IntoIterator<Item = (S, Vec<f64>)>>(iter: I) -> Self {
        let mut series = MetricSeries::new();
        for (name, values) in iter {
            series.push(name, values);
        }
        series
    }
}

impl Serialize for MetricSeries {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, values) in &self.0 {
            map.serialize_entry(name, values)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for MetricSeries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct SeriesVisitor;

        impl<'de> Visitor<'de> for SeriesVisitor {
            type Value = MetricSeries;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of metric name to numeric series")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Self::Value, A::Error> {
                let mut series = MetricSeries::new();
                while let Some((name, values)) = access.next_entry::<String, Vec<f64>>()? {
                    series.push(name, values);
                }
                Ok(series)
            }
        }

        deserializer.deserialize_map(SeriesVisitor)
    }
}

/// JSON document layout: `{"x_data": [...], "metrics": {...}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportPayload {
    pub x_data: Vec<u64>,
    pub metrics: MetricSeries,
}

/// What to export: one named series or a set of them.
#[derive(Debug, Clone, Copy)]
pub enum ExportData<'a> {
    Single { key: &'a MetricKey, values: &'a [f64] },
    Multi(&'a MetricSeries),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "csv" => Some(ExportFormat::Csv),
            "json" => Some(ExportFormat::Json),
            _ => None,
        }
    }

    /// Infer from the destination's extension, defaulting to CSV.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::parse)
            .unwrap_or(ExportFormat::Csv)
    }

    pub fn exporter(&self) -> Box<dyn Exporter> {
        match self {
            ExportFormat::Csv => Box::new(CsvExporter),
            ExportFormat::Json => Box::new(JsonExporter),
        }
    }
}

/// Writes series to a destination file.
pub trait Exporter {
    fn export(&self, destination: &Path, timestamps: &[u64], data: ExportData<'_>) -> Result<()>;
}

pub struct CsvExporter;

impl CsvExporter {
    fn write_rows<W: Write>(out: &mut W, timestamps: &[u64], data: ExportData<'_>) -> io::Result<()> {
        match data {
            ExportData::Single { key, values } => {
                write_record(out, &[TIME_LABEL.to_string(), key.label()])?;
                for (t, v) in timestamps.iter().zip(values.iter()) {
                    write_record(out, &[t.to_string(), format_value(*v)])?;
                }
            }
            ExportData::Multi(series) => {
                let mut header = Vec::with_capacity(series.len() + 1);
                header.push(TIME_LABEL.to_string());
                header.extend(series.names().into_iter().map(str::to_string));
                write_record(out, &header)?;

                for (i, t) in timestamps.iter().enumerate() {
                    let mut row = Vec::with_capacity(series.len() + 1);
                    row.push(t.to_string());
                    for (_, values) in series.iter() {
                        row.push(values.get(i).map(|v| format_value(*v)).unwrap_or_default());
                    }
                    write_record(out, &row)?;
                }
            }
        }
        out.flush()
    }
}

impl Exporter for CsvExporter {
    fn export(&self, destination: &Path, timestamps: &[u64], data: ExportData<'_>) -> Result<()> {
        let file = File::create(destination).map_err(|e| ResmonError::export(destination, e))?;
        let mut out = BufWriter::new(file);
        Self::write_rows(&mut out, timestamps, data).map_err(|e| ResmonError::export(destination, e))?;
        log::info!("Exported CSV to {:?}", destination);
        Ok(())
    }
}

pub struct JsonExporter;

impl Exporter for JsonExporter {
    fn export(&self, destination: &Path, timestamps: &[u64], data: ExportData<'_>) -> Result<()> {
        let metrics = match data {
            ExportData::Single { key, values } => {
                let mut series = MetricSeries::new();
                series.push(key.as_str(), values.to_vec());
                series
            }
            ExportData::Multi(series) => series.clone(),
        };
        let payload = ExportPayload {
            x_data: timestamps.to_vec(),
            metrics,
        };

        let file = File::create(destination).map_err(|e| ResmonError::export(destination, e))?;
        let mut out = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut out, &payload).map_err(|e| {
            if e.is_io() {
                ResmonError::export(destination, io::Error::from(e))
            } else {
                ResmonError::Serialization(e)
            }
        })?;
        out.flush().map_err(|e| ResmonError::export(destination, e))?;
        log::info!("Exported JSON to {:?}", destination);
        Ok(())
    }
}

/// Export the full snapshot or a single metric from it.
pub fn export_snapshot(
    snapshot: &ExportPayload,
    metric: Option<&MetricKey>,
    destination: &Path,
    format: ExportFormat,
) -> Result<()> {
    let exporter = format.exporter();
    match metric {
        Some(key) => {
            let values = snapshot
                .metrics
                .get(key.as_str())
                .ok_or_else(|| ResmonError::unknown_metric(key.as_str()))?;
            exporter.export(destination, &snapshot.x_data, ExportData::Single { key, values })
        }
        None => exporter.export(destination, &snapshot.x_data, ExportData::Multi(&snapshot.metrics)),
    }
}

/// `<dir>/resmon-<scope>-<YYYYmmdd-HHMMSS>.<ext>`
pub fn default_export_path(dir: &Path, scope: &str, format: ExportFormat) -> PathBuf {
    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let scope: String = scope
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    let scope = scope.trim_matches('_');
    let scope = if scope.is_empty() { "metric" } else { scope };
    dir.join(format!("resmon-{}-{}.{}", scope, stamp, format.extension()))
}

/// Default decimal form, always with a fractional part (`2.0`, `0.29296875`).
pub fn format_value(value: f64) -> String {
    format!("{:?}", value)
}

fn write_record<W: Write>(out: &mut W, fields: &[String]) -> io::Result<()> {
    let line: Vec<String> = fields.iter().map(|f| escape_field(f)).collect();
    writeln!(out, "{}", line.join(","))
}

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_single_series_csv() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cpu.csv");
        let key = MetricKey::cpu();
        CsvExporter
            .export(&path, &[0, 1, 2], ExportData::Single { key: &key, values: &[10.0, 20.0, 30.0] })
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let rows: Vec<&str> = content.lines().collect();
        assert_eq!(rows, vec!["Time (s),CPU (%)", "0,10.0", "1,20.0", "2,30.0"]);
    }

    #[test]
    fn test_escape_field() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_format_value_keeps_fraction() {
        assert_eq!(format_value(2.0), "2.0");
        assert_eq!(format_value(50.5), "50.5");
        assert_eq!(format_value(-1.0), "-1.0");
    }

    #[test]
    fn test_format_inference() {
        assert_eq!(ExportFormat::from_path(Path::new("a.JSON")), ExportFormat::Json);
        assert_eq!(ExportFormat::from_path(Path::new("a.csv")), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_path(Path::new("a")), ExportFormat::Csv);
        assert_eq!(ExportFormat::parse("xml"), None);
    }

    #[test]
    fn test_default_export_path_sanitizes_scope() {
        let path = default_export_path(Path::new("/tmp"), "/home", ExportFormat::Json);
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("resmon-home-"));
        assert!(name.ends_with(".json"));
    }

    #[test]
    fn test_unknown_metric_in_snapshot() {
        let dir = TempDir::new().unwrap();
        let snapshot = ExportPayload::default();
        let err = export_snapshot(
            &snapshot,
            Some(&MetricKey::cpu()),
            &dir.path().join("x.csv"),
            ExportFormat::Csv,
        )
        .unwrap_err();
        assert!(matches!(err, ResmonError::UnknownMetric(_)));
    }
}
