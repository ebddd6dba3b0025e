use chrono::Utc;

pub fn current_timestamp_utc() -> u64 {
    Utc::now().timestamp_millis() as u64
}

// Venues publish rates as decimal strings. Empty, unparsable or non-finite
// values mean there is no usable rate, never zero.
pub fn parse_rate(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|rate| rate.is_finite())
}

#[cfg(test)]
mod test {
    use super::parse_rate;

    #[test]
    fn test_parse_rate() {
        assert_eq!(parse_rate("0.0001"), Some(0.0001));
        assert_eq!(parse_rate(" -0.00022196 "), Some(-0.00022196));
        assert_eq!(parse_rate("0"), Some(0.0));
        assert_eq!(parse_rate(""), None);
        assert_eq!(parse_rate("n/a"), None);
        assert_eq!(parse_rate("NaN"), None);
        assert_eq!(parse_rate("inf"), None);
    }
}
