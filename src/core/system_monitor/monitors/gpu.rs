use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::Monitor;
use crate::core::system_monitor::metrics::{MetricKey, Sample, SampleDetail};
use crate::error::Result;
use crate::platform::gpu::get_gpu_provider;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub enum GpuVendor {
    Nvidia,
    Amd,
    Intel,
    #[default]
    Unknown,
}

/// One device's utilisation as reported by a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct GpuReading {
    pub index: u32,
    pub name: String,
    pub utilization_percent: f64,
    pub memory_used_bytes: u64,
    pub memory_total_bytes: u64,
}

/// Trait for GPU metrics providers
///
/// This trait abstracts GPU monitoring across different vendors.
/// Implementations are provided in the platform layer.
pub trait GpuProvider {
    /// Get the vendor of the GPUs handled by this provider
    fn vendor(&self) -> GpuVendor;

    /// Collect current readings for every device
    fn collect_metrics(&mut self) -> Result<Vec<GpuReading>>;

    /// Check if the GPU provider is available and functional
    fn is_available(&self) -> bool;
}

/// Per-device GPU load. Without a provider it reports nothing.
pub struct GpuMonitor {
    provider: Option<Box<dyn GpuProvider>>,
    /// Device index -> metric key, fixed at construction
    keys: Vec<(u32, MetricKey)>,
}

impl GpuMonitor {
    /// Use the first provider the platform layer can initialise.
    pub fn detect() -> Self {
        let provider = match get_gpu_provider() {
            Ok(provider) => Some(provider),
            Err(e) => {
                log::info!("GPU monitoring disabled: {}", e);
                None
            }
        };
        Self::with_provider(provider)
    }

    pub fn with_provider(mut provider: Option<Box<dyn GpuProvider>>) -> Self {
        let readings = match provider.as_mut() {
            Some(p) => p.collect_metrics().unwrap_or_else(|e| {
                log::warn!("GPU enumeration failed: {}", e);
                Vec::new()
            }),
            None => Vec::new(),
        };

        Self {
            provider,
            keys: Self::device_keys(&readings),
        }
    }

    /// Device names, suffixed with the index when several share one name.
    fn device_keys(readings: &[GpuReading]) -> Vec<(u32, MetricKey)> {
        let mut name_counts: HashMap<&str, usize> = HashMap::new();
        for reading in readings {
            *name_counts.entry(reading.name.as_str()).or_default() += 1;
        }

        readings
            .iter()
            .map(|r| {
                let key = if name_counts.get(r.name.as_str()).copied().unwrap_or(0) > 1 {
                    format!("{} #{}", r.name, r.index)
                } else {
                    r.name.clone()
                };
                (r.index, MetricKey::new(key))
            })
            .collect()
    }

    pub fn is_available(&self) -> bool {
        self.provider.as_ref().is_some_and(|p| p.is_available())
    }

    pub fn vendor(&self) -> Option<GpuVendor> {
        self.provider.as_ref().map(|p| p.vendor())
    }
}

impl Monitor for GpuMonitor {
    fn name(&self) -> &str {
        "gpu"
    }

    fn metric_keys(&self) -> Vec<MetricKey> {
        self.keys.iter().map(|(_, k)| k.clone()).collect()
    }

    fn get_usage(&mut self) -> Result<Vec<Sample>> {
        let Some(provider) = self.provider.as_mut() else {
            return Ok(Vec::new());
        };

        let readings = provider.collect_metrics()?;
        Ok(readings
            .into_iter()
            .filter_map(|r| {
                let key = self
                    .keys
                    .iter()
                    .find(|(index, _)| *index == r.index)
                    .map(|(_, key)| key.clone());
                if key.is_none() {
                    log::debug!("Ignoring GPU {} discovered after startup", r.index);
                }
                key.map(|key| Sample {
                    key,
                    percent: r.utilization_percent,
                    detail: SampleDetail::Bytes {
                        used: r.memory_used_bytes,
                        total: r.memory_total_bytes,
                    },
                })
            })
            .collect())
    }
}
