use resmon::core::config::AppConfig;
use resmon::core::system_monitor::{MetricKey, Monitor, Sample, SampleDetail, Sampler};
use resmon::{ResmonError, Result};

/// Counts up by one each call.
struct Counter {
    key: &'static str,
    next: f64,
}

impl Monitor for Counter {
    fn name(&self) -> &str {
        self.key
    }

    fn metric_keys(&self) -> Vec<MetricKey> {
        vec![MetricKey::new(self.key)]
    }

    fn get_usage(&mut self) -> Result<Vec<Sample>> {
        self.next += 1.0;
        Ok(vec![Sample::percent(MetricKey::new(self.key), self.next)])
    }
}

/// Fails on the listed call numbers (0-based).
struct Flaky {
    calls: usize,
    fail_on: Vec<usize>,
}

impl Monitor for Flaky {
    fn name(&self) -> &str {
        "flaky"
    }

    fn metric_keys(&self) -> Vec<MetricKey> {
        vec![MetricKey::new("/data")]
    }

    fn get_usage(&mut self) -> Result<Vec<Sample>> {
        let call = self.calls;
        self.calls += 1;
        if self.fail_on.contains(&call) {
            return Err(ResmonError::metric_collection("disk went away"));
        }
        Ok(vec![Sample::bytes(MetricKey::new("/data"), 1, 4)])
    }
}

struct Network;

impl Monitor for Network {
    fn name(&self) -> &str {
        "network"
    }

    fn metric_keys(&self) -> Vec<MetricKey> {
        vec![MetricKey::net_up(), MetricKey::net_down()]
    }

    fn get_usage(&mut self) -> Result<Vec<Sample>> {
        Ok(vec![Sample {
            key: MetricKey::new("NET"),
            percent: 1.0,
            detail: SampleDetail::Network {
                upload_kbps: 3.0,
                download_kbps: 7.0,
            },
        }])
    }
}

fn config(history_length: usize) -> AppConfig {
    AppConfig {
        history_length,
        ..Default::default()
    }
}

#[test]
fn test_lengths_after_n_ticks() {
    for (ticks, retention) in [(3, 5), (5, 5), (9, 5)] {
        let monitors: Vec<Box<dyn Monitor>> = vec![
            Box::new(Counter { key: "CPU", next: 0.0 }),
            Box::new(Network),
        ];
        let mut sampler = Sampler::new(monitors, &config(retention));
        for _ in 0..ticks {
            sampler.tick();
        }

        let expected = ticks.min(retention);
        let history = sampler.history();
        assert_eq!(history.timestamps().len(), expected);
        for key in history.keys() {
            assert_eq!(history.buffer(key).unwrap().len(), expected, "{}", key);
            assert!(history.is_aligned(key));
        }
    }
}

#[test]
fn test_fifo_trim_drops_oldest() {
    let monitors: Vec<Box<dyn Monitor>> = vec![Box::new(Counter { key: "CPU", next: 0.0 })];
    let mut sampler = Sampler::new(monitors, &config(3));
    for _ in 0..5 {
        sampler.tick();
    }

    let (x, values) = sampler.history().series(&MetricKey::cpu()).unwrap();
    assert_eq!(x, vec![2, 3, 4]);
    assert_eq!(values, vec![3.0, 4.0, 5.0]);
}

#[test]
fn test_failing_monitor_does_not_block_others() {
    let monitors: Vec<Box<dyn Monitor>> = vec![
        Box::new(Flaky {
            calls: 0,
            fail_on: vec![1],
        }),
        Box::new(Counter { key: "CPU", next: 0.0 }),
    ];
    let mut sampler = Sampler::new(monitors, &config(3));
    let disk = MetricKey::new("/data");

    sampler.tick();
    let report = sampler.tick();
    assert_eq!(report.failures.len(), 1);
    assert_eq!(sampler.history().buffer(&MetricKey::cpu()).unwrap().len(), 2);
    assert_eq!(sampler.history().buffer(&disk).unwrap().len(), 1);
    assert!(!sampler.history().is_aligned(&disk));
    assert!(sampler.history().points(&disk).is_empty());

    // Once the axis saturates the short buffer lines up again
    sampler.tick();
    sampler.tick();
    sampler.tick();
    assert!(sampler.history().is_aligned(&disk));
    assert_eq!(sampler.history().points(&disk).len(), 3);
}

#[test]
fn test_snapshot_keeps_monitor_order() {
    let monitors: Vec<Box<dyn Monitor>> = vec![
        Box::new(Counter { key: "RAM", next: 0.0 }),
        Box::new(Network),
        Box::new(Counter { key: "CPU", next: 10.0 }),
    ];
    let mut sampler = Sampler::new(monitors, &config(10));
    sampler.tick();

    let snapshot = sampler.history().snapshot();
    assert_eq!(snapshot.x_data, vec![0]);
    assert_eq!(snapshot.metrics.names(), vec!["RAM", "NET_UP", "NET_DOWN", "CPU"]);
    assert_eq!(snapshot.metrics.get("NET_DOWN"), Some(&[7.0][..]));
    assert_eq!(snapshot.metrics.get("CPU"), Some(&[11.0][..]));
}

#[test]
fn test_oversized_history_config_still_samples() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    std::fs::write(&path, r#"{"history_length": 1e15}"#).unwrap();

    let config = AppConfig::load(&path);
    assert_eq!(config.history_length, resmon::core::config::MAX_HISTORY_LENGTH);

    let monitors: Vec<Box<dyn Monitor>> = vec![Box::new(Counter { key: "CPU", next: 0.0 })];
    let mut sampler = Sampler::new(monitors, &config);
    sampler.tick();
    assert_eq!(sampler.history().latest(&MetricKey::cpu()), Some(1.0));
}
