// Board sensors: thermal zones, fan, throttle flags, static identity.
// Every accessor walks an ordered list of sources and returns None when all fail.

mod linux;
pub mod throttle;

use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

use sysinfo::Components;
use tracing::instrument;

use crate::config::SensorsConfig;
use crate::models::{StaticSystemInfo, ThrottleStatus, gib, round_to};
use crate::sysinfo_repo::HostTotals;

const UNKNOWN: &str = "Unknown";

pub struct SensorReader {
    config: SensorsConfig,
    static_info: OnceLock<StaticSystemInfo>,
}

impl Default for SensorReader {
    fn default() -> Self {
        Self::new(SensorsConfig::default())
    }
}

impl SensorReader {
    pub fn new(config: SensorsConfig) -> Self {
        Self {
            config,
            static_info: OnceLock::new(),
        }
    }

    /// CPU temperature in °C (1 decimal): thermal-zone files first, then sysinfo components.
    #[instrument(skip(self), fields(repo = "sensors", operation = "temperature"))]
    pub fn temperature(&self) -> Option<f64> {
        self.config
            .thermal_paths
            .iter()
            .find_map(|p| linux::read_millidegrees(Path::new(p)))
            .or_else(|| {
                if self.config.component_fallback {
                    component_temperature(&self.config.preferred_sensors)
                } else {
                    None
                }
            })
    }

    /// Fan speed in RPM: configured paths first, then any `fan1_input` under the hwmon dir.
    #[instrument(skip(self), fields(repo = "sensors", operation = "fan_speed"))]
    pub fn fan_speed_rpm(&self) -> Option<u32> {
        self.config
            .fan_paths
            .iter()
            .find_map(|p| linux::read_rpm(Path::new(p)))
            .or_else(|| linux::scan_hwmon_fans(Path::new(&self.config.hwmon_dir)))
    }

    #[instrument(skip(self), fields(repo = "sensors", operation = "throttle_status"))]
    pub async fn throttle_status(&self) -> Option<ThrottleStatus> {
        throttle::query(
            &self.config.throttle_command,
            Duration::from_millis(self.config.command_timeout_ms),
        )
        .await
    }

    /// Board identity. Computed on first call and never refreshed; partial results are cached too.
    pub fn static_info(&self, host: HostTotals) -> StaticSystemInfo {
        self.static_info
            .get_or_init(|| self.read_static_info(host))
            .clone()
    }

    fn read_static_info(&self, host: HostTotals) -> StaticSystemInfo {
        let model = self
            .config
            .model_paths
            .iter()
            .find_map(|p| linux::read_model(Path::new(p)))
            .unwrap_or_else(|| UNKNOWN.into());
        let cpuinfo = std::fs::read_to_string(&self.config.cpuinfo_path).unwrap_or_default();
        let field = |prefix: &str| {
            linux::cpuinfo_field(&cpuinfo, prefix).unwrap_or_else(|| UNKNOWN.into())
        };
        StaticSystemInfo {
            model,
            serial: field("Serial"),
            revision: field("Revision"),
            memory_gb: round_to(gib(host.memory_bytes), 1),
            cpu_count: host.logical_cpus,
        }
    }

    /// True when the device-tree model or cpuinfo mentions one of the platform markers.
    pub fn is_target_platform(&self) -> bool {
        let model = self
            .config
            .model_paths
            .first()
            .and_then(|p| std::fs::read(p).ok())
            .map(|b| String::from_utf8_lossy(&b).to_lowercase());
        let cpuinfo = std::fs::read_to_string(&self.config.cpuinfo_path)
            .ok()
            .map(|s| s.to_lowercase());
        [model, cpuinfo].iter().flatten().any(|text| {
            self.config
                .platform_markers
                .iter()
                .any(|m| text.contains(&m.to_lowercase()))
        })
    }
}

/// Pick a reading from `(label, °C)` pairs: first preferred sensor name present, else the first entry.
pub fn pick_component_reading(readings: &[(String, f32)], preferred: &[String]) -> Option<f64> {
    let matches = |label: &str, name: &str| label.to_lowercase().contains(&name.to_lowercase());
    preferred
        .iter()
        .find_map(|name| readings.iter().find(|(label, _)| matches(label, name)))
        .or_else(|| readings.first())
        .map(|(_, t)| round_to(f64::from(*t), 1))
}

fn component_temperature(preferred: &[String]) -> Option<f64> {
    let components = Components::new_with_refreshed_list();
    let readings: Vec<(String, f32)> = components
        .list()
        .iter()
        .filter_map(|c| {
            c.temperature()
                .filter(|t| t.is_finite())
                .map(|t| (c.label().to_string(), t))
        })
        .collect();
    pick_component_reading(&readings, preferred)
}
