use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::constants::defaults;

const NEVER: &str = "never";

// Longest suffixes first so "ms" is not read as "s"
const UNITS: &[(&str, f64)] = &[
    ("min", 60_000.0),
    ("ms", 1.0),
    ("us", 0.001),
    ("s", 1_000.0),
    ("h", 3_600_000.0),
    ("d", 86_400_000.0),
];

/// A positive interval in milliseconds, or no interval at all
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimePeriod {
    Millis(u32),
    Never,
}

impl TimePeriod {
    /// Parse a raw configuration value; bare integers are milliseconds
    pub fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Number(n) => match n.as_u64() {
                Some(ms) => Self::from_millis(ms as f64),
                None => Err("bare numbers must be whole milliseconds".to_string()),
            },
            Value::String(s) => Self::parse(s),
            _ => Err("expected a string such as '60s' or 'never'".to_string()),
        }
    }

    pub fn parse(raw: &str) -> Result<Self, String> {
        let text = raw.trim();
        if text.eq_ignore_ascii_case(NEVER) {
            return Ok(TimePeriod::Never);
        }
        let (number, factor) = UNITS
            .iter()
            .find_map(|(suffix, factor)| text.strip_suffix(suffix).map(|n| (n, *factor)))
            .unwrap_or((text, 1.0));
        let amount: f64 = number
            .trim()
            .parse()
            .map_err(|_| format!("'{}' is not a number", number.trim()))?;
        Self::from_millis(amount * factor)
    }

    fn from_millis(ms: f64) -> Result<Self, String> {
        if !ms.is_finite() || ms <= 0.0 {
            return Err("interval must be positive".to_string());
        }
        let rounded = ms.round();
        if (ms - rounded).abs() > 1e-6 {
            return Err("interval must be a whole number of milliseconds".to_string());
        }
        if rounded >= f64::from(defaults::SCHEDULER_DONT_RUN) {
            return Err("interval is too long".to_string());
        }
        Ok(TimePeriod::Millis(rounded as u32))
    }

    /// Value handed to the scheduler
    pub fn as_scheduler_millis(self) -> u32 {
        match self {
            TimePeriod::Millis(ms) => ms,
            TimePeriod::Never => defaults::SCHEDULER_DONT_RUN,
        }
    }
}

impl Serialize for TimePeriod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TimePeriod::Millis(ms) => serializer.serialize_u32(*ms),
            TimePeriod::Never => serializer.serialize_str(NEVER),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_units() {
        assert_eq!(TimePeriod::parse("60s"), Ok(TimePeriod::Millis(60_000)));
        assert_eq!(TimePeriod::parse("500ms"), Ok(TimePeriod::Millis(500)));
        assert_eq!(TimePeriod::parse("1min"), Ok(TimePeriod::Millis(60_000)));
        assert_eq!(TimePeriod::parse("1.5s"), Ok(TimePeriod::Millis(1_500)));
        assert_eq!(TimePeriod::parse("2 h"), Ok(TimePeriod::Millis(7_200_000)));
        assert_eq!(TimePeriod::parse("2000us"), Ok(TimePeriod::Millis(2)));
        assert_eq!(TimePeriod::parse("never"), Ok(TimePeriod::Never));
    }

    #[test]
    fn bare_numbers_are_milliseconds() {
        assert_eq!(TimePeriod::from_value(&json!(250)), Ok(TimePeriod::Millis(250)));
        assert_eq!(TimePeriod::parse("250"), Ok(TimePeriod::Millis(250)));
    }

    #[test]
    fn rejects_invalid_periods() {
        for raw in ["0s", "-1s", "abc", "1.5ms", "60 fortnights", "100d"] {
            assert!(TimePeriod::parse(raw).is_err(), "'{raw}' should be rejected");
        }
        assert!(TimePeriod::from_value(&json!(true)).is_err());
        assert!(TimePeriod::from_value(&json!(-5)).is_err());
    }

    #[test]
    fn never_maps_to_scheduler_sentinel() {
        assert_eq!(TimePeriod::Never.as_scheduler_millis(), u32::MAX);
        assert_eq!(serde_json::to_value(TimePeriod::Never).unwrap(), json!("never"));
        assert_eq!(serde_json::to_value(TimePeriod::Millis(5)).unwrap(), json!(5));
    }
}
