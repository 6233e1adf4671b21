// Linux-specific helpers: interface flags and link speed from /sys/class/net.

const IFF_UP: u32 = 0x1;

/// Administrative up state: IFF_UP from `flags`, falling back to `operstate`.
pub(super) fn interface_is_up(interface_name: &str) -> bool {
    #[cfg(target_os = "linux")]
    {
        let base = format!("/sys/class/net/{}", interface_name);
        if let Ok(flags) = std::fs::read_to_string(format!("{}/flags", base))
            && let Some(bits) = parse_hex_flags(&flags)
        {
            return bits & IFF_UP != 0;
        }
        if let Ok(state) = std::fs::read_to_string(format!("{}/operstate", base)) {
            return state.trim() == "up";
        }
    }
    let _ = interface_name;
    false
}

pub(super) fn parse_hex_flags(s: &str) -> Option<u32> {
    let s = s.trim();
    u32::from_str_radix(s.strip_prefix("0x").unwrap_or(s), 16).ok()
}

/// Link speed from /sys/class/net/<interface>/speed in Mbps, or 0 if unavailable.
pub(super) fn get_interface_speed(interface_name: &str) -> u64 {
    #[cfg(target_os = "linux")]
    {
        let path = format!("/sys/class/net/{}/speed", interface_name);
        if let Ok(content) = std::fs::read_to_string(&path)
            && let Ok(mbps) = content.trim().parse::<i64>()
            && mbps > 0
        {
            return mbps as u64;
        }
    }
    let _ = interface_name;
    0
}
