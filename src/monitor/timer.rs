//! `MM:SS` formatting for the quiet-streak display.

use std::time::Duration;

/// Format an elapsed duration as zero-padded `MM:SS`.
///
/// Minutes are not capped at 59 — a class that stays quiet for two hours
/// earns a `120:00`.
pub fn format_mm_ss(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    format!("{:02}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_00_00() {
        assert_eq!(format_mm_ss(Duration::ZERO), "00:00");
    }

    #[test]
    fn seconds_are_zero_padded() {
        assert_eq!(format_mm_ss(Duration::from_secs(5)), "00:05");
        assert_eq!(format_mm_ss(Duration::from_secs(65)), "01:05");
    }

    #[test]
    fn sub_second_remainder_truncates() {
        assert_eq!(format_mm_ss(Duration::from_millis(59_999)), "00:59");
    }

    #[test]
    fn minutes_run_past_an_hour() {
        assert_eq!(format_mm_ss(Duration::from_secs(2 * 60 * 60)), "120:00");
    }
}
