//! Display helpers for the view layer

use super::WARNING_THRESHOLD_MS;

/// Format milliseconds as `MM:SS`, rounding up to the next whole second.
///
/// Minutes are padded to two digits but are otherwise unbounded.
pub fn format_clock(ms: u64) -> String {
    let total_seconds = ms.div_ceil(1000);
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// Low-time signal for the standard timer; dark again at exactly zero
pub fn is_low_time_standard(ms: u64) -> bool {
    ms > 0 && ms < WARNING_THRESHOLD_MS
}

/// Low-time signal for a chess clock face; stays lit at zero
pub fn is_low_time_chess(ms: u64) -> bool {
    ms < WARNING_THRESHOLD_MS
}
