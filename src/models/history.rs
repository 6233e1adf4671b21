// Chart history entry

use serde::{Deserialize, Serialize};

use super::MetricsSnapshot;

/// Condensed projection of one poll, kept in the history ring buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub timestamp: f64,
    /// Local wall-clock time, `HH:MM:SS`.
    pub time: String,
    pub cpu: f64,
    pub temp: f64,
    pub mem: f64,
    pub net_in: f64,
    pub net_out: f64,
}

impl HistoryEntry {
    pub fn from_snapshot(snapshot: &MetricsSnapshot, time: String) -> Self {
        Self {
            timestamp: snapshot.timestamp,
            time,
            cpu: snapshot.cpu_usage_percent,
            temp: snapshot.cpu_temperature_c.unwrap_or(0.0),
            mem: snapshot.memory.usage_percent,
            net_in: snapshot.network.download_kbps(),
            net_out: snapshot.network.upload_kbps(),
        }
    }
}
