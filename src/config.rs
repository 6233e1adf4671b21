use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub monitoring: MonitoringConfig,
    pub sensors: SensorsConfig,
    pub frontend: FrontendConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            host: "0.0.0.0".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    /// Blocking window for one CPU usage sample; every metrics request pays it.
    pub cpu_sample_interval_ms: u64,
    /// Number of polls kept for the history chart.
    pub history_capacity: usize,
    /// Filesystem reported in /api/metrics.
    pub disk_path: String,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            cpu_sample_interval_ms: 100,
            history_capacity: 60,
            disk_path: "/".into(),
        }
    }
}

/// Probe lists for the sensor reader. Order matters: first readable source wins.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SensorsConfig {
    /// Files holding a temperature in millidegrees Celsius.
    pub thermal_paths: Vec<String>,
    /// Files holding a fan speed in RPM.
    pub fan_paths: Vec<String>,
    /// Directory scanned for `*/fan1_input` when no fan path matched.
    pub hwmon_dir: String,
    /// Sensor labels preferred when falling back to sysinfo components.
    pub preferred_sensors: Vec<String>,
    pub component_fallback: bool,
    /// Device-tree model files.
    pub model_paths: Vec<String>,
    pub cpuinfo_path: String,
    /// Case-insensitive substrings that identify the target board.
    pub platform_markers: Vec<String>,
    /// Program + args printing `throttled=0xNN`.
    pub throttle_command: Vec<String>,
    pub command_timeout_ms: u64,
}

impl Default for SensorsConfig {
    fn default() -> Self {
        Self {
            thermal_paths: vec![
                "/sys/class/thermal/thermal_zone0/temp".into(),
                "/sys/devices/virtual/thermal/thermal_zone0/temp".into(),
            ],
            fan_paths: vec![
                "/sys/devices/platform/cooling_fan/hwmon/hwmon2/fan1_input".into(),
                "/sys/devices/platform/cooling_fan/hwmon/hwmon3/fan1_input".into(),
                "/sys/class/hwmon/hwmon2/fan1_input".into(),
                "/sys/class/hwmon/hwmon3/fan1_input".into(),
                "/sys/class/hwmon/hwmon1/fan1_input".into(),
                "/sys/devices/platform/cooling_fan/hwmon/hwmon1/fan1_input".into(),
            ],
            hwmon_dir: "/sys/class/hwmon".into(),
            preferred_sensors: vec![
                "cpu_thermal".into(),
                "cpu-thermal".into(),
                "coretemp".into(),
                "k10temp".into(),
            ],
            component_fallback: true,
            model_paths: vec![
                "/proc/device-tree/model".into(),
                "/sys/firmware/devicetree/base/model".into(),
            ],
            cpuinfo_path: "/proc/cpuinfo".into(),
            platform_markers: vec!["raspberry".into(), "bcm".into()],
            throttle_command: vec!["vcgencmd".into(), "get_throttled".into()],
            command_timeout_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FrontendConfig {
    /// Directory with the built dashboard; served for non-API paths when set.
    pub static_dir: Option<String>,
}

impl AppConfig {
    /// Load from `CONFIG_FILE` (default `config.toml`). A missing file means built-in defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        match std::fs::read_to_string(&path) {
            Ok(s) => Self::load_from_str(&s),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path, "config file not found, using defaults");
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
            Err(e) => Err(anyhow::anyhow!("reading {}: {}", path, e)),
        }
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            self.monitoring.cpu_sample_interval_ms > 0,
            "monitoring.cpu_sample_interval_ms must be > 0, got {}",
            self.monitoring.cpu_sample_interval_ms
        );
        anyhow::ensure!(
            self.monitoring.history_capacity > 0,
            "monitoring.history_capacity must be > 0, got {}",
            self.monitoring.history_capacity
        );
        anyhow::ensure!(
            !self.monitoring.disk_path.is_empty(),
            "monitoring.disk_path must be non-empty"
        );
        anyhow::ensure!(
            !self.sensors.throttle_command.is_empty(),
            "sensors.throttle_command must name a program"
        );
        anyhow::ensure!(
            self.sensors.command_timeout_ms > 0,
            "sensors.command_timeout_ms must be > 0, got {}",
            self.sensors.command_timeout_ms
        );
        Ok(())
    }
}
