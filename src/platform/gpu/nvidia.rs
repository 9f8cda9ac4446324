#[cfg(feature = "nvml")]
use nvml_wrapper::Nvml;

use crate::core::system_monitor::monitors::{GpuProvider, GpuReading, GpuVendor};
use crate::error::{ResmonError, Result};

/// NVIDIA GPU provider using NVML, covering every device the driver reports
pub struct NvidiaGpuProvider {
    #[cfg(feature = "nvml")]
    nvml: Nvml,
    device_count: u32,
}

impl NvidiaGpuProvider {
    /// Create a new NVIDIA GPU provider
    ///
    /// Initializes NVML and fails when no device is present.
    pub fn new() -> Result<Self> {
        #[cfg(feature = "nvml")]
        {
            let nvml = Nvml::init()
                .map_err(|e| ResmonError::gpu_not_available(format!("Failed to init NVML: {}", e)))?;

            let device_count = nvml.device_count().map_err(|e| {
                ResmonError::gpu_not_available(format!("Failed to count GPUs: {}", e))
            })?;
            if device_count == 0 {
                return Err(ResmonError::gpu_not_available("NVML reports no devices"));
            }

            Ok(Self { nvml, device_count })
        }
        #[cfg(not(feature = "nvml"))]
        {
            Err(ResmonError::gpu_not_available(
                "NVIDIA GPU support not enabled",
            ))
        }
    }

    pub fn device_count(&self) -> u32 {
        self.device_count
    }
}

impl GpuProvider for NvidiaGpuProvider {
    fn vendor(&self) -> GpuVendor {
        GpuVendor::Nvidia
    }

    fn is_available(&self) -> bool {
        #[cfg(feature = "nvml")]
        {
            self.nvml.device_by_index(0).is_ok()
        }
        #[cfg(not(feature = "nvml"))]
        {
            false
        }
    }

    fn collect_metrics(&mut self) -> Result<Vec<GpuReading>> {
        #[cfg(feature = "nvml")]
        {
            let mut readings = Vec::with_capacity(self.device_count as usize);

            for index in 0..self.device_count {
                let device = self.nvml.device_by_index(index).map_err(|e| {
                    ResmonError::metric_collection(format!("Failed to get GPU {}: {}", index, e))
                })?;

                let name = device
                    .name()
                    .unwrap_or_else(|_| format!("NVIDIA GPU {}", index));

                let utilization = device.utilization_rates().map_err(|e| {
                    ResmonError::metric_collection(format!("Failed to read utilization of {}: {}", name, e))
                })?;

                let (memory_used, memory_total) = device
                    .memory_info()
                    .map(|m| (m.used, m.total))
                    .unwrap_or((0, 0));

                readings.push(GpuReading {
                    index,
                    name,
                    utilization_percent: f64::from(utilization.gpu),
                    memory_used_bytes: memory_used,
                    memory_total_bytes: memory_total,
                });
            }

            Ok(readings)
        }
        #[cfg(not(feature = "nvml"))]
        {
            Err(ResmonError::gpu_not_available(
                "NVIDIA GPU support not enabled",
            ))
        }
    }
}
