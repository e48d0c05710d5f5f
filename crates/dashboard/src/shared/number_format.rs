//! Number formatting on the Indian magnitude scale (thousand / lakh / crore)

pub const CRORE: f64 = 10_000_000.0;
pub const LAKH: f64 = 100_000.0;
pub const THOUSAND: f64 = 1_000.0;

/// Shown instead of a value when the source has no data
pub const NO_DATA: &str = "—";

const SCALE: [(f64, &str); 3] = [(CRORE, "Cr"), (LAKH, "L"), (THOUSAND, "K")];

/// Formats a count or amount with a magnitude suffix and two decimals.
///
/// Values below one thousand are rendered as a whole number. Negative and
/// non-finite values are passed through as-is.
///
/// # Examples
///
/// ```
/// use dashboard::shared::number_format::format_magnitude;
/// assert_eq!(format_magnitude(1500.0), "1.50 K");
/// assert_eq!(format_magnitude(15_000_000.0), "1.50 Cr");
/// ```
pub fn format_magnitude(value: f64) -> String {
    if !value.is_finite() || value < 0.0 {
        return value.to_string();
    }

    // Whole numbers below a thousand; 999.5 rounds up into the K tier
    let value = if value < THOUSAND { value.round() } else { value };

    for (divisor, suffix) in SCALE {
        if value >= divisor {
            return format!("{:.2} {}", round_scaled(value, divisor, 2), suffix);
        }
    }

    if value == 0.0 {
        return "0".to_string();
    }
    format!("{:.0}", value)
}

/// `₹` prefixed magnitude
pub fn format_currency(value: f64) -> String {
    format!("₹{}", format_magnitude(value))
}

/// Magnitude or the no-data placeholder
pub fn format_optional(value: Option<f64>) -> String {
    value
        .map(format_magnitude)
        .unwrap_or_else(|| NO_DATA.to_string())
}

pub fn format_optional_currency(value: Option<f64>) -> String {
    value
        .map(format_currency)
        .unwrap_or_else(|| NO_DATA.to_string())
}

/// Percentage with one decimal, e.g. "87.4%"
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", round_scaled(value, 1.0, 1))
}

/// `value / divisor` rounded half away from zero to `decimals`.
///
/// Scales before dividing: `1005 * 100 / 1000` is exactly 100.5, while
/// `1005 / 1000 * 100` lands just below it.
fn round_scaled(value: f64, divisor: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor / divisor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_magnitude_scale() {
        assert_eq!(format_magnitude(0.0), "0");
        assert_eq!(format_magnitude(999.0), "999");
        assert_eq!(format_magnitude(1500.0), "1.50 K");
        assert_eq!(format_magnitude(150_000.0), "1.50 L");
        assert_eq!(format_magnitude(15_000_000.0), "1.50 Cr");
    }

    #[test]
    fn test_format_magnitude_breakpoints() {
        assert_eq!(format_magnitude(1_000.0), "1.00 K");
        assert_eq!(format_magnitude(99_999.0), "100.00 K");
        assert_eq!(format_magnitude(100_000.0), "1.00 L");
        assert_eq!(format_magnitude(10_000_000.0), "1.00 Cr");
        assert_eq!(format_magnitude(250_000_000.0), "25.00 Cr");
    }

    #[test]
    fn test_format_magnitude_rounding() {
        assert_eq!(format_magnitude(1_235.0), "1.24 K");
        assert_eq!(format_magnitude(12.4), "12");
        assert_eq!(format_magnitude(12.5), "13");
        assert_eq!(format_magnitude(-0.0), "0");
    }

    #[test]
    fn test_format_magnitude_exact_halves_round_up() {
        assert_eq!(format_magnitude(1_005.0), "1.01 K");
        assert_eq!(format_magnitude(1_015.0), "1.02 K");
        assert_eq!(format_magnitude(100_500.0), "1.01 L");
        assert_eq!(format_magnitude(10_050_000.0), "1.01 Cr");
        assert_eq!(format_percent(87.25), "87.3%");
    }

    #[test]
    fn test_sub_thousand_rounding_into_thousands() {
        assert_eq!(format_magnitude(999.4), "999");
        assert_eq!(format_magnitude(999.5), "1.00 K");
        assert_eq!(format_magnitude(0.4), "0");
    }

    #[test]
    fn test_format_magnitude_passthrough() {
        assert_eq!(format_magnitude(-1500.0), "-1500");
        assert_eq!(format_magnitude(f64::NAN), "NaN");
        assert_eq!(format_magnitude(f64::INFINITY), "inf");
    }

    #[test]
    fn test_currency_and_placeholders() {
        assert_eq!(format_currency(24_000_000.0), "₹2.40 Cr");
        assert_eq!(format_optional_currency(None), NO_DATA);
        assert_eq!(format_optional(Some(5_000.0)), "5.00 K");
        assert_eq!(format_percent(87.36), "87.4%");
        assert_eq!(format_percent(90.0), "90.0%");
    }
}
