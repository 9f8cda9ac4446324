use resmon::core::system_monitor::{
    export_snapshot, CsvExporter, ExportData, ExportFormat, ExportPayload, Exporter, JsonExporter,
    MetricKey, MetricSeries,
};
use resmon::ResmonError;
use tempfile::TempDir;

fn ragged_series() -> MetricSeries {
    let mut series = MetricSeries::new();
    series.push("CPU", vec![1.0, 2.0]);
    series.push("RAM", vec![50.0]);
    series
}

#[test]
fn test_csv_ragged_rows_are_padded() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("all.csv");

    CsvExporter
        .export(&path, &[0, 1, 2], ExportData::Multi(&ragged_series()))
        .unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let rows: Vec<&str> = content.lines().collect();
    assert_eq!(
        rows,
        vec!["Time (s),CPU,RAM", "0,1.0,50.0", "1,2.0,", "2,,"]
    );
}

#[test]
fn test_json_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("all.json");
    let series = ragged_series();

    JsonExporter
        .export(&path, &[0, 1], ExportData::Multi(&series))
        .unwrap();

    let payload: ExportPayload =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(payload.x_data, vec![0, 1]);
    assert_eq!(payload.metrics, series);
    assert_eq!(payload.metrics.names(), vec!["CPU", "RAM"]);
}

#[test]
fn test_export_single_metric_from_snapshot() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ram.json");
    let snapshot = ExportPayload {
        x_data: vec![4, 5],
        metrics: {
            let mut s = MetricSeries::new();
            s.push("CPU", vec![3.0, 4.0]);
            s.push("RAM", vec![10.5, 11.5]);
            s
        },
    };

    export_snapshot(&snapshot, Some(&MetricKey::ram()), &path, ExportFormat::Json).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["x_data"], serde_json::json!([4, 5]));
    assert_eq!(value["metrics"]["RAM"], serde_json::json!([10.5, 11.5]));
    assert!(value["metrics"].get("CPU").is_none());
}

#[test]
fn test_export_unknown_metric() {
    let temp_dir = TempDir::new().unwrap();
    let err = export_snapshot(
        &ExportPayload::default(),
        Some(&MetricKey::new("/mnt/gone")),
        &temp_dir.path().join("x.csv"),
        ExportFormat::Csv,
    )
    .unwrap_err();
    assert!(matches!(err, ResmonError::UnknownMetric(_)));
}

#[test]
fn test_export_to_missing_directory_fails() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("missing").join("out.csv");

    for format in [ExportFormat::Csv, ExportFormat::Json] {
        let err = export_snapshot(&ExportPayload::default(), None, &path, format).unwrap_err();
        assert!(err.is_export(), "unexpected error: {}", err);
    }
    assert!(!path.exists());
}
