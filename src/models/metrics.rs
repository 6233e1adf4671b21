// Per-poll metrics snapshot and its flattened wire shape

use serde::{Deserialize, Serialize};

use super::DiskUsage;
use crate::rates::RateSample;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryUsage {
    pub usage_percent: f64,
    pub total_gb: f64,
    pub used_gb: f64,
    pub available_gb: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadAverage {
    pub load1: f64,
    pub load5: f64,
    pub load15: f64,
}

/// One poll of the host. Optional fields are sensors that may be missing on this board.
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub cpu_usage_percent: f64,
    pub cpu_temperature_c: Option<f64>,
    pub cpu_frequency_mhz: Option<f64>,
    pub memory: MemoryUsage,
    pub disk: Option<DiskUsage>,
    pub disk_device: String,
    pub network: RateSample,
    pub network_interface: String,
    pub uptime: String,
    pub fan_speed_rpm: Option<u32>,
    pub power_draw_watts: Option<f64>,
    pub load_average: Option<LoadAverage>,
    pub timestamp: f64,
}

/// GET /api/metrics body. Missing temperature, fan, power and disk read as 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsResponse {
    pub cpu_usage: f64,
    pub cpu_temp: f64,
    pub cpu_freq: Option<f64>,
    pub memory_usage: f64,
    pub memory_total: f64,
    pub memory_used_gb: f64,
    pub memory_available_gb: f64,
    pub disk_used: f64,
    pub disk_total: f64,
    pub disk_used_gb: f64,
    pub disk_free_gb: f64,
    pub disk_device: String,
    /// MB/s, for display.
    pub network_up: f64,
    pub network_down: f64,
    /// KB/s, for charts.
    pub network_in_kbps: f64,
    pub network_out_kbps: f64,
    pub uptime: String,
    pub fan_speed: u32,
    pub power_draw: f64,
    pub network_interface: String,
    pub load_average: Option<LoadAverage>,
    pub timestamp: f64,
}

impl From<&MetricsSnapshot> for MetricsResponse {
    fn from(s: &MetricsSnapshot) -> Self {
        let disk = s.disk.as_ref();
        Self {
            cpu_usage: s.cpu_usage_percent,
            cpu_temp: s.cpu_temperature_c.unwrap_or(0.0),
            cpu_freq: s.cpu_frequency_mhz,
            memory_usage: s.memory.usage_percent,
            memory_total: s.memory.total_gb,
            memory_used_gb: s.memory.used_gb,
            memory_available_gb: s.memory.available_gb,
            disk_used: disk.map_or(0.0, |d| d.usage_percent),
            disk_total: disk.map_or(0.0, |d| d.total_gb),
            disk_used_gb: disk.map_or(0.0, |d| d.used_gb),
            disk_free_gb: disk.map_or(0.0, |d| d.free_gb),
            disk_device: s.disk_device.clone(),
            network_up: s.network.upload_mbps(),
            network_down: s.network.download_mbps(),
            network_in_kbps: s.network.download_kbps(),
            network_out_kbps: s.network.upload_kbps(),
            uptime: s.uptime.clone(),
            fan_speed: s.fan_speed_rpm.unwrap_or(0),
            power_draw: s.power_draw_watts.unwrap_or(0.0),
            network_interface: s.network_interface.clone(),
            load_average: s.load_average,
            timestamp: s.timestamp,
        }
    }
}
