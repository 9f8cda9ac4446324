use std::time::Instant;

use sysinfo::Networks;

use super::Monitor;
use crate::core::system_monitor::metrics::{MetricKey, Sample, SampleDetail};
use crate::error::Result;
use crate::platform::net;

pub const NETWORK_SAMPLE_KEY: &str = "NET";

/// Link speed in Mbps expressed in KB/s.
const KBPS_PER_MBPS: f64 = 128.0;

/// Cumulative byte counters across all interfaces at a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetReading {
    pub bytes_sent: u64,
    pub bytes_recv: u64,
    /// Seconds on a monotonic clock
    pub at_secs: f64,
}

/// Host access needed by [`NetworkMonitor`].
pub trait NetSource {
    fn read(&mut self) -> Result<NetReading>;

    /// Speeds of every interface that reports one, in Mbps.
    fn link_speeds_mbps(&mut self) -> Vec<f64>;
}

/// Upload/download throughput derived from successive counter readings.
pub struct NetworkMonitor {
    source: Box<dyn NetSource>,
    last: Option<NetReading>,
}

impl NetworkMonitor {
    pub fn new(mut source: Box<dyn NetSource>) -> Self {
        let last = match source.read() {
            Ok(reading) => Some(reading),
            Err(e) => {
                log::warn!("Initial network reading failed: {}", e);
                None
            }
        };
        Self { source, last }
    }

    fn zero_sample() -> Sample {
        Self::sample(0.0, 0.0, 0.0)
    }

    fn sample(percent: f64, upload_kbps: f64, download_kbps: f64) -> Sample {
        Sample {
            key: MetricKey::new(NETWORK_SAMPLE_KEY),
            percent,
            detail: SampleDetail::Network {
                upload_kbps,
                download_kbps,
            },
        }
    }

    /// Share of the combined link capacity in use, 0 when no link reports a speed.
    fn utilization(&mut self, upload_kbps: f64, download_kbps: f64) -> f64 {
        let total_speed_mbps: f64 = self
            .source
            .link_speeds_mbps()
            .into_iter()
            .filter(|s| *s > 0.0)
            .sum();

        if total_speed_mbps <= 0.0 {
            return 0.0;
        }

        let max_kbps = total_speed_mbps * KBPS_PER_MBPS;
        let current_kbps = upload_kbps + download_kbps;
        (current_kbps / max_kbps) * 100.0
    }
}

impl Monitor for NetworkMonitor {
    fn name(&self) -> &str {
        "network"
    }

    fn metric_keys(&self) -> Vec<MetricKey> {
        vec![MetricKey::net_up(), MetricKey::net_down()]
    }

    fn get_usage(&mut self) -> Result<Vec<Sample>> {
        let current = self.source.read()?;

        let Some(previous) = self.last else {
            self.last = Some(current);
            return Ok(vec![Self::zero_sample()]);
        };

        let elapsed = current.at_secs - previous.at_secs;
        if elapsed <= 0.0 {
            return Ok(vec![Self::zero_sample()]);
        }

        let sent = current.bytes_sent.saturating_sub(previous.bytes_sent);
        let recv = current.bytes_recv.saturating_sub(previous.bytes_recv);
        let upload_kbps = sent as f64 / elapsed / 1024.0;
        let download_kbps = recv as f64 / elapsed / 1024.0;

        self.last = Some(current);

        let percent = self.utilization(upload_kbps, download_kbps);
        Ok(vec![Self::sample(percent, upload_kbps, download_kbps)])
    }
}

/// [`NetSource`] backed by `sysinfo::Networks`.
pub struct SysinfoNetSource {
    networks: Networks,
    started: Instant,
}

impl SysinfoNetSource {
    pub fn new() -> Self {
        Self {
            networks: Networks::new_with_refreshed_list(),
            started: Instant::now(),
        }
    }
}

impl Default for SysinfoNetSource {
    fn default() -> Self {
        Self::new()
    }
}

impl NetSource for SysinfoNetSource {
    fn read(&mut self) -> Result<NetReading> {
        self.networks.refresh(true);

        let (bytes_recv, bytes_sent) = self
            .networks
            .values()
            .fold((0u64, 0u64), |(rx, tx), data| {
                (
                    rx.saturating_add(data.total_received()),
                    tx.saturating_add(data.total_transmitted()),
                )
            });

        Ok(NetReading {
            bytes_sent,
            bytes_recv,
            at_secs: self.started.elapsed().as_secs_f64(),
        })
    }

    fn link_speeds_mbps(&mut self) -> Vec<f64> {
        self.networks
            .keys()
            .filter_map(|name| net::link_speed_mbps(name))
            .collect()
    }
}
