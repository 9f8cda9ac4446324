//! GPU-specific platform code.
//!
//! Provides GPU readings for supported vendors. NVIDIA is supported via
//! NVML when the `nvml` feature is enabled.

mod nvidia;

pub use nvidia::NvidiaGpuProvider;

use crate::core::system_monitor::monitors::GpuProvider;
use crate::error::{ResmonError, Result};

/// Attempt to get an available GPU provider
///
/// Returns error if no GPU is available.
pub fn get_gpu_provider() -> Result<Box<dyn GpuProvider>> {
    if let Ok(provider) = NvidiaGpuProvider::new() {
        return Ok(Box::new(provider));
    }

    Err(ResmonError::gpu_not_available("No supported GPU found"))
}
