// resmon library - public API

// Re-export error types
pub mod error;
pub use error::{ResmonError, Result};

// Module declarations
pub mod commands;
pub mod core;
pub mod platform;
pub mod ui;

// Re-export commonly used types
pub use core::config::AppConfig;

use std::fs::OpenOptions;
use std::path::PathBuf;

/// Where log records are written.
#[derive(Debug, Clone)]
pub enum LogTarget {
    Stderr,
    /// Appended to a file, so the TUI's alternate screen stays clean
    File(PathBuf),
}

impl LogTarget {
    /// `<config dir>/resmon/resmon.log`
    pub fn default_file() -> Result<Self> {
        Ok(LogTarget::File(AppConfig::config_dir()?.join("resmon.log")))
    }
}

// Initialize logging
pub fn init_logging(target: LogTarget) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    if let LogTarget::File(path) = &target {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder
        .try_init()
        .map_err(|e| ResmonError::other(format!("Failed to initialize logger: {}", e)))
}
