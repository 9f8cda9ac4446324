//! One-shot top-process listing.

use anyhow::Result;
use clap::ArgMatches;
use colored::Colorize;

use crate::core::system_monitor::monitors::{
    ProcessMonitor, ProcessSort, SysinfoProcessSource, DEFAULT_TOP_PROCESSES,
};
use crate::core::system_monitor::ProcessUsage;

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let count = matches
        .get_one::<usize>("count")
        .copied()
        .unwrap_or(DEFAULT_TOP_PROCESSES);
    let sort = matches
        .get_one::<String>("sort")
        .and_then(|s| ProcessSort::parse(s))
        .unwrap_or_default();

    let mut monitor = ProcessMonitor::new(Box::new(SysinfoProcessSource::new()), count, sort);

    // CPU usage is a delta between two refreshes
    monitor.top();
    std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
    let processes = monitor.top();

    print!("{}", render_table(&processes, sort));
    Ok(())
}

fn render_table(processes: &[ProcessUsage], sort: ProcessSort) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}\n",
        format!("Top {} processes by {}", processes.len(), sort).cyan().bold()
    ));
    out.push_str(&format!(
        "{}\n",
        format!("{:>8}  {:<32} {:>7} {:>7}", "PID", "NAME", "CPU %", "MEM %").bold()
    ));

    for p in processes {
        let cpu = format!("{:>7.1}", p.cpu_percent);
        let mem = format!("{:>7.1}", p.memory_percent);
        let (cpu, mem) = match sort {
            ProcessSort::Cpu => (cpu.green().to_string(), mem.normal().to_string()),
            ProcessSort::Memory => (cpu.normal().to_string(), mem.green().to_string()),
        };
        out.push_str(&format!("{:>8}  {:<32} {} {}\n", p.pid, truncate(&p.name, 32), cpu, mem));
    }

    if processes.is_empty() {
        out.push_str(&format!("{}\n", "No readable processes".dimmed()));
    }
    out
}

fn truncate(name: &str, width: usize) -> String {
    if name.chars().count() <= width {
        name.to_string()
    } else {
        let mut short: String = name.chars().take(width.saturating_sub(1)).collect();
        short.push('…');
        short
    }
}
