//! Text and numeric cell helpers.

/// Parses a string as `f64`, returning `None` for invalid or empty strings.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Parses a string as `i64`, returning `None` for invalid or empty strings.
///
/// Accepts a plain integer or a float rendering with a zero fraction
/// (`"45.0"` parses as 45), which is how age and day counts show up after
/// the source system's own exports round-trip through spreadsheets.
pub fn parse_i64(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(v) = trimmed.parse::<i64>() {
        return Some(v);
    }
    let float = trimmed.parse::<f64>().ok()?;
    if float.fract() == 0.0 && float.is_finite() {
        Some(float as i64)
    } else {
        None
    }
}

/// Formats a floating-point number as a string without trailing zeros.
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Returns true when the value is empty or whitespace only.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Keeps only ASCII digits, dropping everything else.
///
/// Tax ids and municipality codes arrive with stray punctuation or a
/// trailing `.0` from float round-trips.
pub fn strip_digits(value: &str) -> String {
    let trimmed = value.trim();
    // A float rendering keeps digits after the dot; cut the fraction first.
    let integral = trimmed.split('.').next().unwrap_or(trimmed);
    integral.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_f64() {
        assert_eq!(parse_f64(""), None);
        assert_eq!(parse_f64("  "), None);
        assert_eq!(parse_f64("3.14"), Some(3.14));
        assert_eq!(parse_f64("  3.14  "), Some(3.14));
        assert_eq!(parse_f64("invalid"), None);
    }

    #[test]
    fn test_parse_i64() {
        assert_eq!(parse_i64("42"), Some(42));
        assert_eq!(parse_i64("45.0"), Some(45));
        assert_eq!(parse_i64("45.5"), None);
        assert_eq!(parse_i64(" -3 "), Some(-3));
        assert_eq!(parse_i64(""), None);
        assert_eq!(parse_i64("abc"), None);
    }

    #[test]
    fn test_format_numeric() {
        assert_eq!(format_numeric(1.0), "1");
        assert_eq!(format_numeric(1.5), "1.5");
        assert_eq!(format_numeric(1.50), "1.5");
        assert_eq!(format_numeric(0.0), "0");
    }

    #[test]
    fn test_strip_digits() {
        assert_eq!(strip_digits("78143153000185.0"), "78143153000185");
        assert_eq!(strip_digits("78143153-000185"), "78143153000185");
        assert_eq!(strip_digits("4106902.0"), "4106902");
        assert_eq!(strip_digits("  410690  "), "410690");
        assert_eq!(strip_digits(""), "");
    }
}
