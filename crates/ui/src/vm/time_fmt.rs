use chrono::{DateTime, Utc};

pub use quiz_core::time::format_countdown;

#[must_use]
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Renders marks without a trailing `.0`: `4.0 → "4"`, `2.5 → "2.5"`.
#[must_use]
pub fn format_marks(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

/// Renders an elapsed duration in seconds as `MM:SS`.
#[must_use]
pub fn format_elapsed(seconds: i64) -> String {
    format_countdown(u32::try_from(seconds.max(0)).unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;

    #[test]
    fn marks_drop_trailing_zero() {
        assert_eq!(format_marks(4.0), "4");
        assert_eq!(format_marks(0.0), "0");
        assert_eq!(format_marks(2.5), "2.5");
        assert_eq!(format_marks(0.25), "0.25");
    }

    #[test]
    fn datetime_is_utc_stamp() {
        assert_eq!(format_datetime(fixed_now()), "2023-11-14 22:13:20 UTC");
    }

    #[test]
    fn elapsed_clamps_negative() {
        assert_eq!(format_elapsed(-5), "00:00");
        assert_eq!(format_elapsed(125), "02:05");
    }
}
