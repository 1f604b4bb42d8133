// Linux-specific readers: /sys/class/net statistics and /proc/uptime.

/// Read rx/tx byte counters from /sys/class/net/<interface>/statistics (Linux).
pub(super) fn read_interface_bytes_linux(interface_name: &str) -> Option<(u64, u64)> {
    #[cfg(target_os = "linux")]
    {
        let base = format!("/sys/class/net/{}/statistics", interface_name);
        let rx = read_counter(&format!("{}/rx_bytes", base))?;
        let tx = read_counter(&format!("{}/tx_bytes", base))?;
        return Some((rx, tx));
    }
    #[cfg(not(target_os = "linux"))]
    {
        let _ = interface_name;
        None
    }
}

#[cfg(target_os = "linux")]
fn read_counter(path: &str) -> Option<u64> {
    std::fs::read_to_string(path).ok()?.trim().parse().ok()
}

/// Seconds since boot from /proc/uptime (Linux), with sub-second precision.
pub(super) fn read_uptime_linux() -> Option<f64> {
    #[cfg(target_os = "linux")]
    {
        let content = std::fs::read_to_string("/proc/uptime").ok()?;
        return parse_proc_uptime(&content);
    }
    #[cfg(not(target_os = "linux"))]
    None
}

/// First field of /proc/uptime; the second is aggregate idle time.
pub(super) fn parse_proc_uptime(content: &str) -> Option<f64> {
    let secs: f64 = content.split_whitespace().next()?.parse().ok()?;
    (secs.is_finite() && secs >= 0.0).then_some(secs)
}
