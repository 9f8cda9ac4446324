//! Network interface link speeds.
//!
//! sysinfo exposes byte counters but not link capacity, so speeds come from
//! the OS directly. Interfaces that do not report a speed are omitted.

/// Negotiated link speed of `interface` in Mbps.
#[cfg(target_os = "linux")]
pub fn link_speed_mbps(interface: &str) -> Option<f64> {
    let path = std::path::Path::new("/sys/class/net").join(interface).join("speed");
    let raw = std::fs::read_to_string(path).ok()?;
    parse_speed(&raw)
}

#[cfg(not(target_os = "linux"))]
pub fn link_speed_mbps(_interface: &str) -> Option<f64> {
    None
}

/// The kernel reports -1 (or fails the read) for links without a speed.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_speed(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|s| *s > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_speed() {
        assert_eq!(parse_speed("1000\n"), Some(1000.0));
        assert_eq!(parse_speed("-1\n"), None);
        assert_eq!(parse_speed(""), None);
    }
}
