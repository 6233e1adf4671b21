// Wire models for the HTTP API

mod disk;
mod history;
mod metrics;
mod network;
mod process;
mod system;
mod thermal;

pub use disk::{DiskReport, DiskUsage};
pub use history::HistoryEntry;
pub use metrics::{LoadAverage, MemoryUsage, MetricsResponse, MetricsSnapshot};
pub use network::{InterfaceInfo, NetworkReport};
pub use process::{ProcessEntry, ProcessSample};
pub use system::{HealthReport, StaticSystemInfo, SystemReport};
pub use thermal::{ThermalReport, ThrottleStatus};

/// Round to a fixed number of decimals (half away from zero).
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Bytes to GiB.
pub fn gib(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0 * 1024.0)
}

/// Current wall-clock time as float epoch seconds.
pub fn epoch_seconds() -> f64 {
    chrono::Utc::now().timestamp_millis() as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_to_one_and_two_decimals() {
        assert_eq!(round_to(13.455, 1), 13.5);
        assert_eq!(round_to(0.126, 2), 0.13);
        assert_eq!(round_to(42.0, 1), 42.0);
    }

    #[test]
    fn gib_converts_binary_gigabytes() {
        assert_eq!(gib(4 * 1024 * 1024 * 1024), 4.0);
        assert_eq!(gib(0), 0.0);
    }
}
