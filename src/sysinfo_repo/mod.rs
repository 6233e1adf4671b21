// Host counters via sysinfo: CPU, memory, disks, network, processes.

mod linux;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use sysinfo::{Disks, Networks, ProcessRefreshKind, ProcessesToUpdate, System};
use tracing::instrument;

use crate::models::{
    DiskUsage, InterfaceInfo, LoadAverage, MemoryUsage, ProcessSample, gib, round_to,
};
use crate::rates::{CounterSample, RateCalculator, RateSample};

/// Device reported when no filesystem is mounted at `/`.
pub const DEFAULT_DISK_DEVICE: &str = "/dev/root";
/// Interfaces tried first, in order, when picking the primary one.
pub const PREFERRED_INTERFACES: [&str; 4] = ["eth0", "wlan0", "end0", "wlan1"];
pub const DEFAULT_INTERFACE: &str = "eth0";
const LOOPBACK: &str = "lo";

/// Inputs to the static system info that come from the OS rather than the board.
#[derive(Debug, Clone, Copy)]
pub struct HostTotals {
    pub memory_bytes: u64,
    pub logical_cpus: usize,
}

pub struct SysinfoRepo {
    sys: Arc<Mutex<System>>,
    // Separate instance so per-process CPU is measured between process-list requests.
    procs: Arc<Mutex<System>>,
    disks: Arc<Mutex<Disks>>,
    networks: Arc<Mutex<Networks>>,
}

impl Default for SysinfoRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoRepo {
    pub fn new() -> Self {
        let mut sys = System::new_all();
        sys.refresh_all();
        let mut procs = System::new();
        procs.refresh_processes_specifics(ProcessesToUpdate::All, true, process_refresh_kind());
        let disks = Disks::new_with_refreshed_list();
        let networks = Networks::new_with_refreshed_list();
        Self {
            sys: Arc::new(Mutex::new(sys)),
            procs: Arc::new(Mutex::new(procs)),
            disks: Arc::new(Mutex::new(disks)),
            networks: Arc::new(Mutex::new(networks)),
        }
    }

    /// Global CPU usage over a blocking sample window, 1 decimal.
    #[instrument(skip(self), fields(repo = "sysinfo", operation = "cpu_usage"))]
    pub async fn cpu_usage(&self, window: Duration) -> anyhow::Result<f64> {
        let sys = self.sys.clone();
        tokio::task::spawn_blocking(move || {
            let mut sys = sys
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo lock poisoned: {}", e))?;
            sys.refresh_cpu_usage();
            std::thread::sleep(window);
            sys.refresh_cpu_usage();
            let usage = f64::from(sys.global_cpu_usage()).clamp(0.0, 100.0);
            Ok(round_to(usage, 1))
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }

    /// Mean current frequency across cores in MHz; None when the kernel reports 0 everywhere.
    #[instrument(skip(self), fields(repo = "sysinfo", operation = "cpu_frequency"))]
    pub async fn cpu_frequency(&self) -> anyhow::Result<Option<f64>> {
        let sys = self.sys.clone();
        tokio::task::spawn_blocking(move || {
            let mut sys = sys
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo lock poisoned: {}", e))?;
            sys.refresh_cpu_frequency();
            let per_core: Vec<u64> = sys.cpus().iter().map(|c| c.frequency()).collect();
            Ok(mean_frequency(&per_core))
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }

    #[instrument(skip(self), fields(repo = "sysinfo", operation = "memory"))]
    pub async fn memory(&self) -> anyhow::Result<MemoryUsage> {
        let sys = self.sys.clone();
        tokio::task::spawn_blocking(move || {
            let mut sys = sys
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo lock poisoned: {}", e))?;
            sys.refresh_memory();

            let total = sys.total_memory();
            let available = sys.available_memory();
            let usage_percent = if total > 0 {
                (total.saturating_sub(available) as f64 / total as f64) * 100.0
            } else {
                0.0
            };

            Ok(MemoryUsage {
                usage_percent: round_to(usage_percent, 1),
                total_gb: round_to(gib(total), 2),
                used_gb: round_to(gib(sys.used_memory()), 2),
                available_gb: round_to(gib(available), 2),
            })
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }

    pub async fn host_totals(&self) -> anyhow::Result<HostTotals> {
        let sys = self.sys.clone();
        tokio::task::spawn_blocking(move || {
            let sys = sys
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo lock poisoned: {}", e))?;
            Ok(HostTotals {
                memory_bytes: sys.total_memory(),
                logical_cpus: sys.cpus().len(),
            })
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }

    /// Usage of the filesystem holding `path`; None when the path does not exist or no mount covers it.
    #[instrument(skip(self), fields(repo = "sysinfo", operation = "disk_usage"))]
    pub async fn disk_usage(&self, path: &str) -> anyhow::Result<Option<DiskUsage>> {
        let disks = self.disks.clone();
        let path = PathBuf::from(path);
        tokio::task::spawn_blocking(move || {
            let Ok(target) = std::fs::canonicalize(&path) else {
                tracing::debug!(path = %path.display(), "disk path does not exist");
                return Ok(None);
            };
            let mut disks = disks
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo disks lock poisoned: {}", e))?;
            disks.refresh(true);
            let usage = disks
                .list()
                .iter()
                .filter(|d| target.starts_with(d.mount_point()))
                .max_by_key(|d| d.mount_point().as_os_str().len())
                .map(|d| disk_usage_from(d.total_space(), d.available_space()));
            Ok(usage)
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }

    /// Device mounted at `/`.
    pub async fn disk_device(&self) -> anyhow::Result<String> {
        let disks = self.disks.clone();
        tokio::task::spawn_blocking(move || {
            let disks = disks
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo disks lock poisoned: {}", e))?;
            Ok(disks
                .list()
                .iter()
                .find(|d| d.mount_point() == Path::new("/"))
                .map(|d| d.name().to_string_lossy().into_owned())
                .unwrap_or_else(|| DEFAULT_DISK_DEVICE.into()))
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }

    /// Throughput since the previous call. The counter read and the baseline update happen
    /// under the networks lock, so concurrent callers see samples in capture order.
    #[instrument(skip(self, rates), fields(repo = "sysinfo", operation = "network_rates"))]
    pub async fn network_rates(&self, rates: Arc<RateCalculator>) -> anyhow::Result<RateSample> {
        let networks = self.networks.clone();
        tokio::task::spawn_blocking(move || {
            let mut networks = networks
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo networks lock poisoned: {}", e))?;
            networks.refresh(true);
            Ok(rates.compute(counters_from(&networks)))
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }

    /// Non-loopback interfaces sorted by name.
    #[instrument(skip(self), fields(repo = "sysinfo", operation = "interfaces"))]
    pub async fn interfaces(&self) -> anyhow::Result<Vec<InterfaceInfo>> {
        let networks = self.networks.clone();
        tokio::task::spawn_blocking(move || {
            let mut networks = networks
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo networks lock poisoned: {}", e))?;
            networks.refresh(true);
            let mut interfaces: Vec<InterfaceInfo> = networks
                .list()
                .iter()
                .filter(|(name, _)| name.as_str() != LOOPBACK)
                .map(|(name, data)| InterfaceInfo {
                    name: name.clone(),
                    is_up: linux::interface_is_up(name),
                    speed: linux::get_interface_speed(name),
                    mtu: data.mtu(),
                    ipv4: data
                        .ip_networks()
                        .iter()
                        .find(|n| n.addr.is_ipv4())
                        .map(|n| n.addr.to_string()),
                    ipv6: data
                        .ip_networks()
                        .iter()
                        .find(|n| n.addr.is_ipv6())
                        .map(|n| n.addr.to_string()),
                    bytes_sent: Some(data.total_transmitted()),
                    bytes_recv: Some(data.total_received()),
                })
                .collect();
            interfaces.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(interfaces)
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }

    /// Top `limit` processes by CPU usage, highest first.
    #[instrument(skip(self), fields(repo = "sysinfo", operation = "top_processes"))]
    pub async fn top_processes(&self, limit: usize) -> anyhow::Result<Vec<ProcessSample>> {
        let procs = self.procs.clone();
        tokio::task::spawn_blocking(move || {
            let mut procs = procs
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo lock poisoned: {}", e))?;
            procs.refresh_processes_specifics(ProcessesToUpdate::All, true, process_refresh_kind());
            let samples: Vec<ProcessSample> = procs
                .processes()
                .iter()
                .filter(|(_, p)| p.thread_kind().is_none())
                .map(|(pid, p)| {
                    let name = p.name().to_string_lossy();
                    ProcessSample {
                        pid: pid.as_u32(),
                        name: if name.is_empty() {
                            "Unknown".into()
                        } else {
                            name.into_owned()
                        },
                        cpu: round_to(f64::from(p.cpu_usage()), 1),
                        mem_mb: round_to(p.memory() as f64 / (1024.0 * 1024.0), 1),
                    }
                })
                .collect();
            Ok(top_by_cpu(samples, limit))
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }

    /// Formatted time since boot.
    pub fn uptime() -> String {
        format_uptime(System::uptime())
    }

    /// 1/5/15 minute load, 2 decimals. None where the OS has no load average.
    pub fn load_average() -> Option<LoadAverage> {
        if !cfg!(unix) {
            return None;
        }
        let load = System::load_average();
        Some(LoadAverage {
            load1: round_to(load.one, 2),
            load5: round_to(load.five, 2),
            load15: round_to(load.fifteen, 2),
        })
    }

    pub fn hostname() -> String {
        System::host_name().unwrap_or_default()
    }

    pub fn kernel() -> String {
        System::kernel_version().unwrap_or_default()
    }
}

// Linux lists every thread as a task of its process; only whole processes are reported.
fn process_refresh_kind() -> ProcessRefreshKind {
    ProcessRefreshKind::nothing()
        .with_cpu()
        .with_memory()
        .without_tasks()
}

/// Byte totals summed over every interface, stamped with the read time.
fn counters_from(networks: &Networks) -> CounterSample {
    let (sent, received) = networks
        .list()
        .values()
        .fold((0u64, 0u64), |(s, r), data| {
            (
                s.saturating_add(data.total_transmitted()),
                r.saturating_add(data.total_received()),
            )
        });
    CounterSample {
        bytes_sent: sent,
        bytes_received: received,
        captured_at: Instant::now(),
    }
}

/// Whole-MHz mean of the cores that report a frequency.
fn mean_frequency(per_core: &[u64]) -> Option<f64> {
    let reporting: Vec<u64> = per_core.iter().copied().filter(|mhz| *mhz > 0).collect();
    if reporting.is_empty() {
        return None;
    }
    let sum: u64 = reporting.iter().sum();
    Some(round_to(sum as f64 / reporting.len() as f64, 0))
}

fn disk_usage_from(total: u64, available: u64) -> DiskUsage {
    let used = total.saturating_sub(available);
    let usage_percent = if total > 0 {
        (used as f64 / total as f64) * 100.0
    } else {
        0.0
    };
    DiskUsage {
        usage_percent: round_to(usage_percent, 1),
        total_gb: round_to(gib(total), 1),
        used_gb: round_to(gib(used), 1),
        free_gb: round_to(gib(available), 1),
    }
}

/// Sort descending by CPU and keep the first `limit`.
pub fn top_by_cpu(mut samples: Vec<ProcessSample>, limit: usize) -> Vec<ProcessSample> {
    samples.sort_by(|a, b| b.cpu.total_cmp(&a.cpu));
    samples.truncate(limit);
    samples
}

/// Preferred interface that is up, else the first up non-loopback one, else `eth0`.
pub fn select_primary(interfaces: &[InterfaceInfo]) -> String {
    let up = |name: &str| interfaces.iter().any(|i| i.name == name && i.is_up);
    PREFERRED_INTERFACES
        .iter()
        .find(|name| up(name))
        .map(|name| name.to_string())
        .or_else(|| {
            interfaces
                .iter()
                .find(|i| i.is_up && i.name != LOOPBACK)
                .map(|i| i.name.clone())
        })
        .unwrap_or_else(|| DEFAULT_INTERFACE.into())
}

/// `3d 4h 5m`, `4h 5m` or `5m`.
pub fn format_uptime(secs: u64) -> String {
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;
    if days > 0 {
        format!("{}d {}h {}m", days, hours, minutes)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}
