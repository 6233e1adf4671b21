// Thermal, fan, power and throttle models

use serde::{Deserialize, Serialize};

/// Decoded `get_throttled` bitmask. Low bits are current state, bits 16..19 are sticky since boot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThrottleStatus {
    pub raw: String,
    pub under_voltage: bool,
    pub freq_capped: bool,
    pub throttled: bool,
    pub soft_temp_limit: bool,
    pub under_voltage_occurred: bool,
    pub freq_capped_occurred: bool,
    pub throttled_occurred: bool,
    pub soft_temp_limit_occurred: bool,
}

impl ThrottleStatus {
    pub fn from_bits(raw: impl Into<String>, bits: u32) -> Self {
        let set = |mask: u32| bits & mask != 0;
        Self {
            raw: raw.into(),
            under_voltage: set(0x1),
            freq_capped: set(0x2),
            throttled: set(0x4),
            soft_temp_limit: set(0x8),
            under_voltage_occurred: set(0x1_0000),
            freq_capped_occurred: set(0x2_0000),
            throttled_occurred: set(0x4_0000),
            soft_temp_limit_occurred: set(0x8_0000),
        }
    }
}

/// GET /api/thermal body; `null` for anything this board does not expose.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThermalReport {
    pub cpu_temp: Option<f64>,
    pub fan_speed: Option<u32>,
    pub power_draw: Option<f64>,
    pub throttle_status: Option<ThrottleStatus>,
}
