// Network interface models

use serde::{Deserialize, Serialize};

/// One non-loopback interface as reported by GET /api/network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterfaceInfo {
    pub name: String,
    pub is_up: bool,
    /// Link speed in Mbps; 0 when the driver does not report one.
    pub speed: u64,
    pub mtu: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv4: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes_sent: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes_recv: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkReport {
    pub interfaces: Vec<InterfaceInfo>,
    pub primary: String,
}
