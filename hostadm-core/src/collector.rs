use crate::metrics::{Metric, MetricKind};
use crate::parsers;
use std::fs;
use std::process::Command;
use std::thread;
use sysinfo::{CpuRefreshKind, MemoryRefreshKind, RefreshKind, System};
use tracing::{debug, warn};

/// One way of obtaining a reading. Providers in a chain are tried in order;
/// the first to return data wins.
pub trait MetricProvider {
    fn name(&self) -> &str;
    fn collect(&self) -> Vec<Metric>;
}

/// Gathers health metrics through ordered fallback chains. A chain with no
/// working provider omits its metric; the snapshot itself never fails.
pub struct MetricCollector {
    cpu: Vec<Box<dyn MetricProvider>>,
    memory: Vec<Box<dyn MetricProvider>>,
    disk: Vec<Box<dyn MetricProvider>>,
}

impl MetricCollector {
    pub fn new() -> Self {
        Self {
            cpu: vec![Box::new(MpstatCpu), Box::new(TopCpu), Box::new(SysinfoCpu)],
            memory: vec![
                Box::new(FreeMemory),
                Box::new(MeminfoMemory),
                Box::new(SysinfoMemory),
            ],
            disk: vec![Box::new(DfDisk), Box::new(LsblkDisk)],
        }
    }

    /// Collector with explicit provider chains; tests use this to substitute
    /// canned data for real commands.
    pub fn with_providers(
        cpu: Vec<Box<dyn MetricProvider>>,
        memory: Vec<Box<dyn MetricProvider>>,
        disk: Vec<Box<dyn MetricProvider>>,
    ) -> Self {
        Self { cpu, memory, disk }
    }

    /// Snapshot all available metrics: CPU, then memory, then one entry per
    /// device-backed mount in the order the disk query reported them.
    pub fn collect(&self) -> Vec<Metric> {
        let mut metrics = Vec::new();
        metrics.extend(run_chain("cpu", &self.cpu));
        metrics.extend(run_chain("memory", &self.memory));
        metrics.extend(run_chain("disk", &self.disk));
        metrics
    }
}

impl Default for MetricCollector {
    fn default() -> Self {
        Self::new()
    }
}

fn run_chain(label: &str, providers: &[Box<dyn MetricProvider>]) -> Vec<Metric> {
    for provider in providers {
        let metrics = provider.collect();
        if !metrics.is_empty() {
            debug!(label, provider = provider.name(), count = metrics.len(), "collected");
            return metrics;
        }
        debug!(label, provider = provider.name(), "no data, falling through");
    }
    warn!(label, "no provider produced data; metric omitted");
    Vec::new()
}

/// Run a command and capture stdout. A missing binary and a non-zero exit
/// look the same to the chain: no data.
fn run_capture(program: &str, args: &[&str]) -> Option<String> {
    match Command::new(program).args(args).output() {
        Ok(output) if output.status.success() => {
            Some(String::from_utf8_lossy(&output.stdout).into_owned())
        }
        Ok(output) => {
            debug!(program, status = %output.status, "command failed");
            None
        }
        Err(err) => {
            debug!(program, %err, "command unavailable");
            None
        }
    }
}

fn memory_metric(used: u64, total: u64) -> Option<Metric> {
    let pct = parsers::percent_round_half_up(used, total)?;
    Metric::new(MetricKind::Memory, pct as f32)
}

fn disk_metrics(mounts: Vec<(String, f32)>) -> Vec<Metric> {
    mounts
        .into_iter()
        .filter_map(|(mount, pct)| Metric::new(MetricKind::Disk { mount }, pct))
        .collect()
}

struct MpstatCpu;

impl MetricProvider for MpstatCpu {
    fn name(&self) -> &str {
        "mpstat"
    }

    fn collect(&self) -> Vec<Metric> {
        run_capture("mpstat", &["1", "1"])
            .and_then(|out| parsers::parse_mpstat_idle(&out))
            .and_then(|idle| Metric::new(MetricKind::Cpu, 100.0 - idle))
            .into_iter()
            .collect()
    }
}

struct TopCpu;

impl MetricProvider for TopCpu {
    fn name(&self) -> &str {
        "top"
    }

    fn collect(&self) -> Vec<Metric> {
        run_capture("top", &["-bn1"])
            .and_then(|out| parsers::parse_top_idle(&out))
            .and_then(|idle| Metric::new(MetricKind::Cpu, 100.0 - idle))
            .into_iter()
            .collect()
    }
}

/// Last-resort CPU sampling. Usage needs two refreshes separated by the
/// minimum interval, so this provider blocks briefly.
struct SysinfoCpu;

impl MetricProvider for SysinfoCpu {
    fn name(&self) -> &str {
        "sysinfo-cpu"
    }

    fn collect(&self) -> Vec<Metric> {
        let mut system =
            System::new_with_specifics(RefreshKind::new().with_cpu(CpuRefreshKind::everything()));
        thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
        system.refresh_cpu_usage();
        Metric::new(MetricKind::Cpu, system.global_cpu_usage())
            .into_iter()
            .collect()
    }
}

struct FreeMemory;

impl MetricProvider for FreeMemory {
    fn name(&self) -> &str {
        "free"
    }

    fn collect(&self) -> Vec<Metric> {
        run_capture("free", &["-b"])
            .and_then(|out| parsers::parse_free(&out))
            .and_then(|(total, used)| memory_metric(used, total))
            .into_iter()
            .collect()
    }
}

struct MeminfoMemory;

impl MetricProvider for MeminfoMemory {
    fn name(&self) -> &str {
        "meminfo"
    }

    fn collect(&self) -> Vec<Metric> {
        fs::read_to_string("/proc/meminfo")
            .ok()
            .and_then(|text| parsers::parse_meminfo(&text))
            .and_then(|(total, used)| memory_metric(used, total))
            .into_iter()
            .collect()
    }
}

struct SysinfoMemory;

impl MetricProvider for SysinfoMemory {
    fn name(&self) -> &str {
        "sysinfo-memory"
    }

    fn collect(&self) -> Vec<Metric> {
        let system = System::new_with_specifics(
            RefreshKind::new().with_memory(MemoryRefreshKind::everything()),
        );
        memory_metric(system.used_memory(), system.total_memory())
            .into_iter()
            .collect()
    }
}

struct DfDisk;

impl MetricProvider for DfDisk {
    fn name(&self) -> &str {
        "df"
    }

    fn collect(&self) -> Vec<Metric> {
        run_capture("df", &["-P"])
            .map(|out| disk_metrics(parsers::parse_df(&out)))
            .unwrap_or_default()
    }
}

struct LsblkDisk;

impl MetricProvider for LsblkDisk {
    fn name(&self) -> &str {
        "lsblk"
    }

    fn collect(&self) -> Vec<Metric> {
        run_capture("lsblk", &["-J", "-o", "NAME,MOUNTPOINT,FSUSE%"])
            .map(|out| disk_metrics(parsers::parse_lsblk_json(&out)))
            .unwrap_or_default()
    }
}
