// Heuristic power draw for the Raspberry Pi 5.
//
// The PMIC does not expose a usable power reading to userspace, so this is an
// estimate from CPU load and temperature, not a measurement. Rough profile:
// idle 2.5-3W, light load 4-5W, full load 8-12W, up to 15W with peripherals.

use crate::models::round_to;

const BASE_WATTS: f64 = 2.7;
const CPU_FULL_LOAD_WATTS: f64 = 9.0;
const MIN_WATTS: f64 = 2.5;
const MAX_WATTS: f64 = 15.0;

/// Estimated watts, rounded to 1 decimal, always within [2.5, 15.0].
pub fn estimate(cpu_usage_percent: f64, temperature_c: Option<f64>) -> f64 {
    let cpu_watts = (cpu_usage_percent / 100.0) * CPU_FULL_LOAD_WATTS;
    let watts = (BASE_WATTS + cpu_watts) * temperature_factor(temperature_c);
    round_to(watts.clamp(MIN_WATTS, MAX_WATTS), 1)
}

fn temperature_factor(temperature_c: Option<f64>) -> f64 {
    match temperature_c {
        Some(t) if t > 70.0 => 1.15,
        Some(t) if t > 60.0 => 1.08,
        Some(t) if t > 50.0 => 1.02,
        _ => 1.0,
    }
}
