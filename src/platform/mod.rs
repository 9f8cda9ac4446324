// Platform-specific code module

pub mod gpu;
pub mod mounts;
pub mod net;

// Re-exports for cleaner imports
pub use gpu::get_gpu_provider;
