// Poll cycle: sensors + sysinfo counters + rate calculator + power estimate -> one snapshot,
// which is also recorded in the chart history.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::instrument;

use crate::config::MonitoringConfig;
use crate::history::HistoryBuffer;
use crate::models::{
    DiskReport, HistoryEntry, MetricsSnapshot, NetworkReport, ProcessEntry, StaticSystemInfo,
    SystemReport, ThermalReport, epoch_seconds,
};
use crate::power;
use crate::rates::RateCalculator;
use crate::sensors::SensorReader;
use crate::sysinfo_repo::{self, SysinfoRepo};

/// Shared state injected into the aggregator; one instance of each per process.
pub struct AggregatorDeps {
    pub sysinfo_repo: Arc<SysinfoRepo>,
    pub sensors: Arc<SensorReader>,
    pub rates: Arc<RateCalculator>,
    pub history: Arc<HistoryBuffer>,
}

pub struct MetricsAggregator {
    sysinfo_repo: Arc<SysinfoRepo>,
    sensors: Arc<SensorReader>,
    rates: Arc<RateCalculator>,
    history: Arc<HistoryBuffer>,
    cpu_window: Duration,
    disk_path: String,
}

impl MetricsAggregator {
    pub fn new(deps: AggregatorDeps, config: &MonitoringConfig) -> Self {
        let AggregatorDeps {
            sysinfo_repo,
            sensors,
            rates,
            history,
        } = deps;
        Self {
            sysinfo_repo,
            sensors,
            rates,
            history,
            cpu_window: Duration::from_millis(config.cpu_sample_interval_ms),
            disk_path: config.disk_path.clone(),
        }
    }

    /// One full poll. Missing sensors and an unreadable disk are normal and leave fields empty;
    /// only collector faults (poisoned locks, failed blocking tasks) abort the poll.
    #[instrument(skip(self), fields(operation = "poll"))]
    pub async fn poll(&self) -> anyhow::Result<MetricsSnapshot> {
        let repo = &self.sysinfo_repo;

        let cpu_usage = repo
            .cpu_usage(self.cpu_window)
            .await
            .context("sampling CPU usage")?;
        let (temperature, fan_speed) = self.read_board_sensors().await?;
        let cpu_frequency = repo.cpu_frequency().await.context("reading CPU frequency")?;
        let memory = repo.memory().await.context("reading memory")?;
        let disk = repo
            .disk_usage(&self.disk_path)
            .await
            .context("reading disk usage")?;
        let disk_device = repo.disk_device().await.context("reading disk device")?;
        let network = repo
            .network_rates(self.rates.clone())
            .await
            .context("reading network rates")?;
        let interfaces = repo.interfaces().await.context("listing interfaces")?;

        let snapshot = MetricsSnapshot {
            cpu_usage_percent: cpu_usage,
            cpu_temperature_c: temperature,
            cpu_frequency_mhz: cpu_frequency,
            memory,
            disk,
            disk_device,
            network,
            network_interface: sysinfo_repo::select_primary(&interfaces),
            uptime: SysinfoRepo::uptime(),
            fan_speed_rpm: fan_speed,
            power_draw_watts: Some(power::estimate(cpu_usage, temperature)),
            load_average: SysinfoRepo::load_average(),
            timestamp: epoch_seconds(),
        };

        let time = chrono::Local::now().format("%H:%M:%S").to_string();
        self.history.push(HistoryEntry::from_snapshot(&snapshot, time));
        tracing::debug!(
            cpu = snapshot.cpu_usage_percent,
            history_len = self.history.len(),
            "poll complete"
        );
        Ok(snapshot)
    }

    /// Chart history, oldest first.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.history.snapshot()
    }

    #[instrument(skip(self), fields(operation = "thermal"))]
    pub async fn thermal(&self) -> anyhow::Result<ThermalReport> {
        let (temperature, fan_speed) = self.read_board_sensors().await?;
        let cpu_usage = self
            .sysinfo_repo
            .cpu_usage(self.cpu_window)
            .await
            .context("sampling CPU usage")?;
        let throttle_status = self.sensors.throttle_status().await;
        Ok(ThermalReport {
            cpu_temp: temperature,
            fan_speed,
            power_draw: Some(power::estimate(cpu_usage, temperature)),
            throttle_status,
        })
    }

    pub async fn static_info(&self) -> anyhow::Result<StaticSystemInfo> {
        let totals = self.sysinfo_repo.host_totals().await?;
        let sensors = self.sensors.clone();
        tokio::task::spawn_blocking(move || sensors.static_info(totals))
            .await
            .map_err(|e| anyhow::anyhow!("sensor task join: {}", e))
    }

    pub async fn system_report(&self) -> anyhow::Result<SystemReport> {
        let info = self.static_info().await?;
        let sensors = self.sensors.clone();
        let is_raspberry_pi = tokio::task::spawn_blocking(move || sensors.is_target_platform())
            .await
            .map_err(|e| anyhow::anyhow!("sensor task join: {}", e))?;
        Ok(SystemReport {
            info,
            is_raspberry_pi,
            hostname: SysinfoRepo::hostname(),
            kernel: SysinfoRepo::kernel(),
        })
    }

    pub async fn network_report(&self) -> anyhow::Result<NetworkReport> {
        let interfaces = self.sysinfo_repo.interfaces().await?;
        let primary = sysinfo_repo::select_primary(&interfaces);
        Ok(NetworkReport {
            interfaces,
            primary,
        })
    }

    /// None when the path does not resolve to a mounted filesystem.
    pub async fn disk_report(&self, path: &str) -> anyhow::Result<Option<DiskReport>> {
        let Some(usage) = self.sysinfo_repo.disk_usage(path).await? else {
            return Ok(None);
        };
        Ok(Some(DiskReport {
            usage,
            device: self.sysinfo_repo.disk_device().await?,
            path: path.to_string(),
        }))
    }

    pub async fn top_processes(&self, limit: usize) -> anyhow::Result<Vec<ProcessEntry>> {
        let samples = self.sysinfo_repo.top_processes(limit).await?;
        Ok(samples.into_iter().map(ProcessEntry::from).collect())
    }

    async fn read_board_sensors(&self) -> anyhow::Result<(Option<f64>, Option<u32>)> {
        let sensors = self.sensors.clone();
        tokio::task::spawn_blocking(move || (sensors.temperature(), sensors.fan_speed_rpm()))
            .await
            .map_err(|e| anyhow::anyhow!("sensor task join: {}", e))
    }
}
