pub mod error;
pub mod timestamp;
pub mod timeunit;

use std::time::Duration;

/// Renders a timeout the way progress notices show it, e.g. `20 minutes 0 seconds`.
pub fn minutes_and_seconds(duration: Duration) -> String {
    let total = duration.as_secs();
    let (minutes, seconds) = (total / 60, total % 60);
    match minutes {
        0 => format!("{} seconds", seconds),
        1 => format!("1 minute {} seconds", seconds),
        _ => format!("{} minutes {} seconds", minutes, seconds),
    }
}

#[cfg(test)]
mod tests {
    use super::minutes_and_seconds;
    use std::time::Duration;

    #[test]
    fn test_timeout_rendering() {
        assert_eq!(minutes_and_seconds(Duration::from_secs(10)), "10 seconds");
        assert_eq!(minutes_and_seconds(Duration::from_secs(61)), "1 minute 1 seconds");
        assert_eq!(
            minutes_and_seconds(Duration::from_secs(1200)),
            "20 minutes 0 seconds"
        );
    }
}
