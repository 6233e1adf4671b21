// Process list models

use serde::{Deserialize, Serialize};

/// Raw per-process reading; `cpu` is percent of one core, `mem_mb` resident size.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessSample {
    pub pid: u32,
    pub name: String,
    pub cpu: f64,
    pub mem_mb: f64,
}

/// GET /api/processes element: display strings plus the raw numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessEntry {
    pub pid: u32,
    pub name: String,
    pub cpu: String,
    pub mem: String,
    pub cpu_raw: f64,
    pub mem_raw: f64,
}

impl From<ProcessSample> for ProcessEntry {
    fn from(p: ProcessSample) -> Self {
        Self {
            pid: p.pid,
            cpu: format!("{:.1}%", p.cpu),
            mem: format!("{:.0} MB", p.mem_mb),
            cpu_raw: p.cpu,
            mem_raw: p.mem_mb,
            name: p.name,
        }
    }
}
