// Disk usage models

use serde::{Deserialize, Serialize};

/// Usage of one mounted filesystem; percent and sizes rounded to 1 decimal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiskUsage {
    pub usage_percent: f64,
    pub total_gb: f64,
    pub used_gb: f64,
    pub free_gb: f64,
}

/// GET /api/disk body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiskReport {
    #[serde(flatten)]
    pub usage: DiskUsage,
    pub device: String,
    pub path: String,
}
