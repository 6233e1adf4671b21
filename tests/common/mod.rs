// Shared test helpers: a fake sysfs/procfs tree for the sensor reader.

#![allow(dead_code)]

use rpi5_monitor::aggregator::{AggregatorDeps, MetricsAggregator};
use rpi5_monitor::history::HistoryBuffer;
use rpi5_monitor::rates::RateCalculator;
use rpi5_monitor::sysinfo_repo::SysinfoRepo;
use rpi5_monitor::config::{MonitoringConfig, SensorsConfig};
use rpi5_monitor::sensors::SensorReader;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

pub const PI_MODEL: &str = "Raspberry Pi 5 Model B Rev 1.0";
pub const PI_CPUINFO: &str = "processor\t: 0\nBogoMIPS\t: 108.00\n\nRevision\t: d04170\nSerial\t\t: 10000000abcdef01\nModel\t\t: Raspberry Pi 5 Model B Rev 1.0\n";

pub struct FakeBoard {
    pub dir: TempDir,
}

impl FakeBoard {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    pub fn write(&self, rel: &str, contents: &[u8]) {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, contents).unwrap();
    }

    pub fn remove(&self, rel: &str) {
        std::fs::remove_file(self.path(rel)).unwrap();
    }

    fn p(&self, rel: &str) -> String {
        self.path(rel).to_string_lossy().into_owned()
    }

    /// Paths under the temp dir; nothing exists until written. Throttle command echoes a fixed mask.
    pub fn sensors_config(&self) -> SensorsConfig {
        SensorsConfig {
            thermal_paths: vec![self.p("thermal_zone0/temp"), self.p("virtual/thermal_zone0/temp")],
            fan_paths: vec![self.p("cooling_fan/hwmon2/fan1_input")],
            hwmon_dir: self.p("hwmon"),
            preferred_sensors: vec!["cpu_thermal".into()],
            component_fallback: false,
            model_paths: vec![self.p("device-tree/model"), self.p("devicetree/base/model")],
            cpuinfo_path: self.p("cpuinfo"),
            platform_markers: vec!["raspberry".into(), "bcm".into()],
            throttle_command: vec![
                "sh".into(),
                "-c".into(),
                "echo throttled=0x50005".into(),
            ],
            command_timeout_ms: 2000,
        }
    }

    pub fn reader(&self) -> SensorReader {
        SensorReader::new(self.sensors_config())
    }
}

pub fn fast_monitoring(history_capacity: usize) -> MonitoringConfig {
    MonitoringConfig {
        cpu_sample_interval_ms: 10,
        history_capacity,
        disk_path: "/".into(),
    }
}

pub fn aggregator(board: &FakeBoard, history_capacity: usize) -> MetricsAggregator {
    let config = fast_monitoring(history_capacity);
    MetricsAggregator::new(
        AggregatorDeps {
            sysinfo_repo: Arc::new(SysinfoRepo::new()),
            sensors: Arc::new(board.reader()),
            rates: Arc::new(RateCalculator::new()),
            history: Arc::new(HistoryBuffer::new(config.history_capacity)),
        },
        &config,
    )
}
