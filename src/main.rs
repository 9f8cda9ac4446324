use anyhow::Result;
use clap::{Arg, ArgMatches, Command};
use std::path::PathBuf;

use resmon::commands;
use resmon::core::config::MAX_HISTORY_LENGTH;
use resmon::LogTarget;

fn build_cli() -> Command {
    Command::new("resmon")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Terminal resource monitor with CSV/JSON export")
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Configuration file (defaults to <config dir>/resmon/config.json)")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true)
        )
        .subcommand(
            Command::new("monitor")
                .about("Live dashboard with one chart per metric (default)")
                .arg(
                    Arg::new("interval")
                        .short('i')
                        .long("interval")
                        .value_name("MS")
                        .help("Sampling interval in milliseconds")
                        .value_parser(clap::value_parser!(u64).range(1..))
                )
                .arg(
                    Arg::new("history")
                        .short('n')
                        .long("history")
                        .value_name("N")
                        .help("Samples kept per metric")
                        .value_parser(clap::value_parser!(u64).range(1..=MAX_HISTORY_LENGTH as u64))
                )
        )
        .subcommand(
            Command::new("export")
                .about("Sample for a few ticks without the TUI, then export")
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("PATH")
                        .help("Destination file")
                        .value_parser(clap::value_parser!(PathBuf))
                        .required(true)
                )
                .arg(
                    Arg::new("format")
                        .short('f')
                        .long("format")
                        .help("csv or json (inferred from the extension when omitted)")
                        .value_parser(["csv", "json"])
                )
                .arg(
                    Arg::new("metric")
                        .short('m')
                        .long("metric")
                        .value_name("KEY")
                        .help("Export a single metric, e.g. CPU, RAM, NET_UP or a mount point")
                )
                .arg(
                    Arg::new("ticks")
                        .short('t')
                        .long("ticks")
                        .value_name("N")
                        .help("Number of samples to take")
                        .value_parser(clap::value_parser!(u64).range(1..=MAX_HISTORY_LENGTH as u64))
                        .default_value("5")
                )
                .arg(
                    Arg::new("interval")
                        .short('i')
                        .long("interval")
                        .value_name("MS")
                        .help("Sampling interval in milliseconds")
                        .value_parser(clap::value_parser!(u64).range(1..))
                )
        )
        .subcommand(
            Command::new("top")
                .about("Print the busiest processes once")
                .arg(
                    Arg::new("count")
                        .short('c')
                        .long("count")
                        .value_name("N")
                        .help("Number of processes to show")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("5")
                )
                .arg(
                    Arg::new("sort")
                        .short('s')
                        .long("sort")
                        .help("Sort key")
                        .value_parser(["cpu", "memory"])
                        .default_value("cpu")
                )
        )
        .subcommand(
            Command::new("config")
                .about("Manage the configuration file (use 'resmon config --help' for subcommands)")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(Command::new("show").about("Show current values"))
                .subcommand(Command::new("path").about("Print the configuration file path"))
                .subcommand(Command::new("reset").about("Write the default configuration"))
                .subcommand(
                    Command::new("set")
                        .about("Set a single value")
                        .arg(
                            Arg::new("key")
                                .help("update_interval_ms, history_length, cpu_threshold or ram_threshold")
                                .required(true)
                                .index(1)
                        )
                        .arg(
                            Arg::new("value")
                                .help("New value")
                                .required(true)
                                .index(2)
                        )
                )
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completions")
                .arg(
                    Arg::new("shell")
                        .help("bash, zsh, fish, powershell or elvish")
                        .required(true)
                        .index(1)
                )
        )
}

fn main() -> Result<()> {
    let matches = build_cli().get_matches();

    init_logging(&matches);

    let config_path = commands::resolve_config_path(&matches)?;

    match matches.subcommand() {
        Some(("monitor", sub_matches)) => commands::monitor::execute(Some(sub_matches), &config_path),
        Some(("export", sub_matches)) => commands::export::execute(sub_matches, &config_path),
        Some(("top", sub_matches)) => commands::top::execute(sub_matches),
        Some(("config", sub_matches)) => commands::config::execute(sub_matches, &config_path),
        Some(("completions", sub_matches)) => {
            let mut cli = build_cli();
            commands::completions::execute(sub_matches, &mut cli)
        }
        _ => commands::monitor::execute(None, &config_path),
    }
}

/// The TUI owns the terminal, so its logs go to a file.
fn init_logging(matches: &ArgMatches) {
    let tui = matches!(matches.subcommand_name(), None | Some("monitor"));
    let target = if tui {
        LogTarget::default_file().unwrap_or(LogTarget::Stderr)
    } else {
        LogTarget::Stderr
    };

    if let Err(e) = resmon::init_logging(target) {
        eprintln!("Warning: {}", e);
    }
}
