// Model serialization tests (wire key names and absent-value handling)

use rpi5_monitor::models::*;
use rpi5_monitor::rates::RateSample;

fn snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        cpu_usage_percent: 12.5,
        cpu_temperature_c: None,
        cpu_frequency_mhz: Some(2400.0),
        memory: MemoryUsage {
            usage_percent: 31.2,
            total_gb: 7.87,
            used_gb: 2.1,
            available_gb: 5.41,
        },
        disk: None,
        disk_device: "/dev/mmcblk0p2".into(),
        network: RateSample {
            upload_bytes_per_sec: 2048.0,
            download_bytes_per_sec: 3_145_728.0,
        },
        network_interface: "eth0".into(),
        uptime: "1h 2m".into(),
        fan_speed_rpm: None,
        power_draw_watts: None,
        load_average: None,
        timestamp: 1_700_000_000.5,
    }
}

#[test]
fn test_metrics_response_absent_fields_read_as_zero() {
    let json = serde_json::to_value(MetricsResponse::from(&snapshot())).unwrap();
    assert_eq!(json["cpuTemp"], serde_json::json!(0.0));
    assert_eq!(json["fanSpeed"], serde_json::json!(0));
    assert_eq!(json["powerDraw"], serde_json::json!(0.0));
    assert_eq!(json["diskUsed"], serde_json::json!(0.0));
    assert_eq!(json["diskTotal"], serde_json::json!(0.0));
    assert!(json["loadAverage"].is_null());
    assert_eq!(json["cpuFreq"], serde_json::json!(2400.0));
}

#[test]
fn test_metrics_response_network_units() {
    let json = serde_json::to_value(MetricsResponse::from(&snapshot())).unwrap();
    assert_eq!(json["networkDown"], serde_json::json!(3.0));
    assert_eq!(json["networkUp"], serde_json::json!(0.0));
    assert_eq!(json["networkInKbps"], serde_json::json!(3072.0));
    assert_eq!(json["networkOutKbps"], serde_json::json!(2.0));
}

#[test]
fn test_metrics_response_with_disk_and_load() {
    let mut s = snapshot();
    s.disk = Some(DiskUsage {
        usage_percent: 41.0,
        total_gb: 58.3,
        used_gb: 23.9,
        free_gb: 31.4,
    });
    s.load_average = Some(LoadAverage {
        load1: 0.52,
        load5: 0.31,
        load15: 0.2,
    });
    let json = serde_json::to_value(MetricsResponse::from(&s)).unwrap();
    assert_eq!(json["diskUsed"], serde_json::json!(41.0));
    assert_eq!(json["diskFreeGb"], serde_json::json!(31.4));
    assert_eq!(json["loadAverage"]["load5"], serde_json::json!(0.31));
}

#[test]
fn test_history_entry_keys() {
    let entry = HistoryEntry::from_snapshot(&snapshot(), "12:34:56".into());
    let json = serde_json::to_value(&entry).unwrap();
    assert_eq!(json["time"], "12:34:56");
    assert_eq!(json["temp"], serde_json::json!(0.0));
    assert_eq!(json["netIn"], serde_json::json!(3072.0));
    assert_eq!(json["netOut"], serde_json::json!(2.0));
    assert_eq!(json["mem"], serde_json::json!(31.2));
}

#[test]
fn test_system_report_is_flat() {
    let report = SystemReport {
        info: StaticSystemInfo {
            model: "Raspberry Pi 5 Model B Rev 1.0".into(),
            serial: "Unknown".into(),
            revision: "d04170".into(),
            memory_gb: 7.9,
            cpu_count: 4,
        },
        is_raspberry_pi: true,
        hostname: "pi".into(),
        kernel: "6.6.31+rpt-rpi-2712".into(),
    };
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["model"], "Raspberry Pi 5 Model B Rev 1.0");
    assert_eq!(json["memory_gb"], serde_json::json!(7.9));
    assert_eq!(json["cpu_count"], 4);
    assert!(json.get("info").is_none());
}

#[test]
fn test_interface_optional_fields_omitted() {
    let iface = InterfaceInfo {
        name: "wlan0".into(),
        is_up: false,
        speed: 0,
        mtu: 1500,
        ipv4: None,
        ipv6: None,
        bytes_sent: Some(10),
        bytes_recv: None,
    };
    let json = serde_json::to_value(&iface).unwrap();
    assert!(json.get("ipv4").is_none());
    assert!(json.get("bytes_recv").is_none());
    assert_eq!(json["bytes_sent"], 10);
}

#[test]
fn test_thermal_report_nulls_and_throttle_keys() {
    let report = ThermalReport {
        cpu_temp: None,
        fan_speed: None,
        power_draw: Some(2.7),
        throttle_status: Some(ThrottleStatus::from_bits("0x80008", 0x80008)),
    };
    let json = serde_json::to_value(&report).unwrap();
    assert!(json["cpu_temp"].is_null());
    assert!(json["fan_speed"].is_null());
    assert_eq!(json["throttle_status"]["raw"], "0x80008");
    assert_eq!(json["throttle_status"]["soft_temp_limit"], true);
    assert_eq!(json["throttle_status"]["soft_temp_limit_occurred"], true);
    assert_eq!(json["throttle_status"]["under_voltage"], false);
}

#[test]
fn test_disk_report_is_flat() {
    let report = DiskReport {
        usage: DiskUsage {
            usage_percent: 50.0,
            total_gb: 10.0,
            used_gb: 5.0,
            free_gb: 5.0,
        },
        device: "/dev/root".into(),
        path: "/".into(),
    };
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["usage_percent"], serde_json::json!(50.0));
    assert_eq!(json["device"], "/dev/root");
    assert_eq!(json["path"], "/");
}
