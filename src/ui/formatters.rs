use humansize::{format_size as human_format_size, BINARY};

/// Format a byte count in human-readable form (`1.5 GiB`)
pub fn format_size(bytes: u64) -> String {
    human_format_size(bytes, BINARY)
}

/// Format a throughput given in KB/s
pub fn format_rate(kbps: f64) -> String {
    if !kbps.is_finite() || kbps < 0.0 {
        return "-".to_string();
    }
    if kbps >= 1024.0 * 1024.0 {
        format!("{:.2} GB/s", kbps / (1024.0 * 1024.0))
    } else if kbps >= 1024.0 {
        format!("{:.2} MB/s", kbps / 1024.0)
    } else {
        format!("{:.1} KB/s", kbps)
    }
}

pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(0.5), "0.5 KB/s");
        assert_eq!(format_rate(2048.0), "2.00 MB/s");
        assert_eq!(format_rate(-1.0), "-");
    }

    #[test]
    fn test_format_size() {
        assert!(format_size(1024).contains("KiB"));
    }
}
