//! Terminal User Interface for resource monitoring.
//!
//! One live chart per metric plus a top-process table, using ratatui.

mod app;
mod event_handler;
mod render;
mod widgets;

pub use app::{run_monitor_app, MonitorApp, MonitorAppConfig, StatusKind, StatusMessage};
pub use event_handler::MonitorEvent;
