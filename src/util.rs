/// Format remaining milliseconds as MM:SS, rounding partial seconds up so
/// the display never shows 00:00 while time is still on the clock.
pub fn format_mm_ss(remaining_ms: u64) -> String {
    let total_seconds = remaining_ms.div_ceil(1000);
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// Fraction of the time budget still available, in [0, 1].
pub fn remaining_fraction(remaining_ms: u64, total_ms: u64) -> f64 {
    if total_ms == 0 {
        return 0.0;
    }
    (remaining_ms as f64 / total_ms as f64).clamp(0.0, 1.0)
}
