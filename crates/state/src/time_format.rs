/// Formats seconds as `m:ss`, or `h:mm:ss` once an hour is reached.
pub fn format_clock(total_seconds: f64) -> String {
    let secs = if total_seconds.is_finite() {
        total_seconds.round().max(0.0) as u64
    } else {
        0
    };
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_hours() {
        assert_eq!(format_clock(0.0), "0:00");
        assert_eq!(format_clock(61.0), "1:01");
        assert_eq!(format_clock(3661.0), "1:01:01");
        assert_eq!(format_clock(600.0), "10:00");
        assert_eq!(format_clock(36000.0), "10:00:00");
    }

    #[test]
    fn rounds_to_nearest_second() {
        assert_eq!(format_clock(59.5), "1:00");
        assert_eq!(format_clock(4.4), "0:04");
    }

    #[test]
    fn degenerate_inputs_format_as_zero() {
        assert_eq!(format_clock(-3.0), "0:00");
        assert_eq!(format_clock(f64::NAN), "0:00");
    }
}
