/// Shown in place of a best time that has never been set
pub const NO_TIME: &str = "--:--";

/// Zero-padded `mm:ss`. Minutes keep counting past 59.
pub fn format_time(seconds: u64) -> String {
    let minutes = seconds / 60;
    let remaining_seconds = seconds % 60;
    format!("{minutes:02}:{remaining_seconds:02}")
}

pub fn format_best_time(best: Option<u64>) -> String {
    best.map(format_time).unwrap_or_else(|| NO_TIME.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(47), "00:47");
        assert_eq!(format_time(60), "01:00");
        assert_eq!(format_time(61), "01:01");
        assert_eq!(format_time(599), "09:59");
    }

    #[test]
    fn test_format_time_past_an_hour() {
        assert_eq!(format_time(3600), "60:00");
        assert_eq!(format_time(6000 * 60 + 5), "6000:05");
    }

    #[test]
    fn test_format_best_time() {
        assert_eq!(format_best_time(None), "--:--");
        assert_eq!(format_best_time(Some(30)), "00:30");
    }
}
