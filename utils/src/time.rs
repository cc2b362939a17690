//! Time formatting helpers.

/// Format a duration in milliseconds to a short human-readable string.
pub fn format_millis(millis: u64) -> String {
    if millis < 1_000 {
        format!("{millis}ms")
    } else if millis < 60_000 {
        format!("{}.{:03}s", millis / 1_000, millis % 1_000)
    } else if millis < 3_600_000 {
        format!("{}m {}s", millis / 60_000, (millis % 60_000) / 1_000)
    } else {
        format!("{}h {}m", millis / 3_600_000, (millis % 3_600_000) / 60_000)
    }
}
