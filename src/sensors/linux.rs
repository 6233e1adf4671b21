// sysfs / procfs readers: thermal zones, hwmon fans, device-tree model, /proc/cpuinfo.

use std::path::Path;

/// Thermal-zone file (millidegrees) to degrees Celsius, 1 decimal.
pub(super) fn read_millidegrees(path: &Path) -> Option<f64> {
    let raw = std::fs::read_to_string(path).ok()?;
    let milli = raw.trim().parse::<f64>().ok()?;
    Some(crate::models::round_to(milli / 1000.0, 1))
}

/// hwmon `fanN_input` file to RPM.
pub(super) fn read_rpm(path: &Path) -> Option<u32> {
    std::fs::read_to_string(path).ok()?.trim().parse().ok()
}

/// First `<hwmon_dir>/*/fan1_input` that parses. Directory order is sorted for stable results.
pub(super) fn scan_hwmon_fans(hwmon_dir: &Path) -> Option<u32> {
    let mut dirs: Vec<_> = std::fs::read_dir(hwmon_dir)
        .ok()?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .collect();
    dirs.sort();
    dirs.iter().find_map(|d| read_rpm(&d.join("fan1_input")))
}

/// Device-tree model string without the trailing NUL.
pub(super) fn read_model(path: &Path) -> Option<String> {
    let bytes = std::fs::read(path).ok()?;
    let s = String::from_utf8_lossy(&bytes);
    let model = s.trim().trim_end_matches('\0').trim();
    if model.is_empty() {
        None
    } else {
        Some(model.to_string())
    }
}

/// Value of the first `key : value` line whose key starts with `prefix`.
pub(super) fn cpuinfo_field(content: &str, prefix: &str) -> Option<String> {
    content
        .lines()
        .filter(|line| line.starts_with(prefix))
        .find_map(|line| line.split_once(':'))
        .map(|(_, v)| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CPUINFO: &str = "processor\t: 0\nBogoMIPS\t: 108.00\n\nHardware\t: BCM2835\nRevision\t: d04170\nSerial\t\t: 10000000abcdef01\nModel\t\t: Raspberry Pi 5 Model B Rev 1.0\n";

    #[test]
    fn cpuinfo_prefix_lookup() {
        assert_eq!(cpuinfo_field(CPUINFO, "Serial").as_deref(), Some("10000000abcdef01"));
        assert_eq!(cpuinfo_field(CPUINFO, "Revision").as_deref(), Some("d04170"));
        assert_eq!(cpuinfo_field(CPUINFO, "Missing"), None);
    }

    #[test]
    fn model_strips_nul() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model");
        std::fs::write(&path, b"Raspberry Pi 5 Model B Rev 1.0\0").unwrap();
        assert_eq!(read_model(&path).as_deref(), Some("Raspberry Pi 5 Model B Rev 1.0"));
    }

    #[test]
    fn millidegrees_and_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("temp");
        std::fs::write(&good, "48312\n").unwrap();
        assert_eq!(read_millidegrees(&good), Some(48.3));
        let bad = dir.path().join("bad");
        std::fs::write(&bad, "n/a\n").unwrap();
        assert_eq!(read_millidegrees(&bad), None);
        assert_eq!(read_millidegrees(&dir.path().join("missing")), None);
    }

    #[test]
    fn hwmon_scan_skips_dirs_without_fan() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("hwmon0")).unwrap();
        std::fs::create_dir(dir.path().join("hwmon1")).unwrap();
        std::fs::write(dir.path().join("hwmon1/fan1_input"), "2875\n").unwrap();
        assert_eq!(scan_hwmon_fans(dir.path()), Some(2875));
        assert_eq!(scan_hwmon_fans(&dir.path().join("nope")), None);
    }
}
