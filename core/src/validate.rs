use serde_json::Value;

use crate::error::ValidationError;

pub const MAX_SHIFT_HOURS: f64 = 24.0;

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Shift lengths and single extra-hours additions: finite, in (0, 24].
pub fn shift_hours(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() || value <= 0.0 || value > MAX_SHIFT_HOURS {
        return Err(ValidationError::Hours {
            field,
            value: value.to_string(),
        });
    }
    Ok(value)
}

pub fn hour_rate(value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::HourRate(value.to_string()));
    }
    Ok(value)
}

pub fn parse_shift_hours(field: &'static str, raw: &str) -> Result<f64, ValidationError> {
    let value: f64 = raw.trim().parse().map_err(|_| ValidationError::Hours {
        field,
        value: raw.to_string(),
    })?;
    shift_hours(field, value)
}

pub fn parse_hour_rate(raw: &str) -> Result<f64, ValidationError> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ValidationError::HourRate(raw.to_string()))?;
    hour_rate(value)
}

pub fn parse_shift_count(raw: &str) -> Result<u32, ValidationError> {
    raw.trim()
        .parse()
        .map_err(|_| ValidationError::ShiftCount(raw.to_string()))
}

/// Reads a stored number that may have been saved either as a JSON number
/// or as the raw text of a form field.
pub fn loose_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_shift_hours_bounds() {
        assert_eq!(shift_hours("hours per shift", 12.0).unwrap(), 12.0);
        assert_eq!(shift_hours("hours per shift", 24.0).unwrap(), 24.0);
        assert_eq!(shift_hours("hours per shift", 7.999).unwrap(), 7.999);
        assert!(shift_hours("hours per shift", 0.0).is_err());
        assert!(shift_hours("hours per shift", -3.0).is_err());
        assert!(shift_hours("hours per shift", 24.5).is_err());
        assert!(shift_hours("hours per shift", f64::NAN).is_err());
    }

    #[test]
    fn test_hour_rate() {
        assert_eq!(hour_rate(0.0).unwrap(), 0.0);
        assert_eq!(parse_hour_rate(" 200 ").unwrap(), 200.0);
        assert!(parse_hour_rate("-1").is_err());
        assert!(parse_hour_rate("inf").is_err());
        assert!(parse_hour_rate("abc").is_err());
    }

    #[test]
    fn test_loose_number() {
        assert_eq!(loose_number(&json!(3)), Some(3.0));
        assert_eq!(loose_number(&json!("2.5")), Some(2.5));
        assert_eq!(loose_number(&json!("abc")), None);
        assert_eq!(loose_number(&json!(true)), None);
        assert_eq!(loose_number(&Value::Null), None);
    }
}
