// Static system identity and health models

use serde::{Deserialize, Serialize};

/// Board identity; computed once per process and cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticSystemInfo {
    pub model: String,
    pub serial: String,
    pub revision: String,
    pub memory_gb: f64,
    pub cpu_count: usize,
}

/// GET /api/system body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemReport {
    #[serde(flatten)]
    pub info: StaticSystemInfo,
    pub is_raspberry_pi: bool,
    pub hostname: String,
    pub kernel: String,
}

/// GET /api/health body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: f64,
}
