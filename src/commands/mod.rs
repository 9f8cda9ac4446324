// Command handlers module
pub mod completions;
pub mod config;
pub mod export;
pub mod monitor;
pub mod top;

use anyhow::Result;
use clap::ArgMatches;
use std::path::PathBuf;

use crate::core::config::AppConfig;

/// `--config <PATH>` if given at any subcommand level, otherwise the
/// per-user default location.
pub fn resolve_config_path(matches: &ArgMatches) -> Result<PathBuf> {
    let mut found = matches.get_one::<PathBuf>("config");
    let mut current = matches;
    while let Some((_, sub)) = current.subcommand() {
        if let Some(path) = sub.get_one::<PathBuf>("config") {
            found = Some(path);
        }
        current = sub;
    }

    match found {
        Some(path) => Ok(path.clone()),
        None => Ok(AppConfig::default_path()?),
    }
}
