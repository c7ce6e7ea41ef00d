// src/services/numeric.rs
//
// Cell-level number handling. Nothing in here fails: a malformed cell
// degrades to zero (or to the input text when formatting) so one bad value
// cannot abort a refresh.
use num_format::{CustomFormat, Grouping, ToFormattedString};

const CURRENCY_SYMBOLS: &[char] = &['₹', '$', '€', '£', '¥'];

/// Values at or below this magnitude are read as fractions (0.88 => 88%).
pub const FRACTION_THRESHOLD: f64 = 5.0;

/// Rejection rates live in the 0-5% band, so only true fractions are scaled.
pub const REJECTION_FRACTION_THRESHOLD: f64 = 1.0;

fn strip_decorations(text: &str) -> String {
    text.chars()
        .filter(|c| *c != ',' && *c != '%' && !CURRENCY_SYMBOLS.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Parse free-form cell text such as `"₹ 1,23,456"` or `"88%"`.
///
/// Empty or unparsable text yields `0.0`.
pub fn parse_number(text: &str) -> f64 {
    parse_strict(text).unwrap_or(0.0)
}

/// Like [`parse_number`] but keeps "blank" and "not a number" apart from zero.
pub fn parse_optional_number(text: &str) -> Option<f64> {
    parse_strict(text)
}

fn parse_strict(text: &str) -> Option<f64> {
    let cleaned = strip_decorations(text);
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Bring a percentage onto the 0-100 scale.
///
/// Magnitudes up to [`FRACTION_THRESHOLD`] are multiplied by 100, anything
/// larger is assumed to already be a percent. The threshold is 5, not 1:
/// `0.88` becomes `88.0`, `88` stays `88.0`.
pub fn normalize_percent(raw: &str) -> f64 {
    normalize_percent_value(parse_number(raw))
}

pub fn normalize_percent_value(value: f64) -> f64 {
    normalize_percent_with(value, FRACTION_THRESHOLD)
}

/// Rejection % variant: `0.016` becomes `1.6`, while `1.6` and `1.2` stay put.
pub fn normalize_rejection_pct(value: f64) -> f64 {
    normalize_percent_with(value, REJECTION_FRACTION_THRESHOLD)
}

pub fn normalize_percent_with(value: f64, threshold: f64) -> f64 {
    if value.abs() <= threshold {
        value * 100.0
    } else {
        value
    }
}

/// Format an amount with Indian digit grouping (`10,11,52,874`).
///
/// Text that is not a number after removing commas comes back unchanged, and
/// so does a number too large to group exactly.
pub fn format_amount(input: &str) -> String {
    match input.replace(',', "").trim().parse::<f64>() {
        Ok(n) if n.is_finite() && fits_i64(n) => format_amount_value(n),
        _ => input.to_string(),
    }
}

// 2^63 itself is out of range, hence the strict bound.
fn fits_i64(n: f64) -> bool {
    n.abs() < i64::MAX as f64
}

/// Truncates toward zero; no decimals are emitted.
pub fn format_amount_value(n: f64) -> String {
    if !n.is_finite() || !fits_i64(n) {
        return n.to_string();
    }
    let whole = n.trunc() as i64;
    match CustomFormat::builder()
        .grouping(Grouping::Indian)
        .separator(",")
        .minus_sign("-")
        .build()
    {
        Ok(format) => whole.to_formatted_string(&format),
        Err(_) => whole.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_strips_decorations() {
        assert_eq!(parse_number("1,000"), 1000.0);
        assert_eq!(parse_number("₹1,23,456"), 123456.0);
        assert_eq!(parse_number(" $2,500.50 "), 2500.5);
        assert_eq!(parse_number("88%"), 88.0);
        assert_eq!(parse_number("0.016"), 0.016);
    }

    #[test]
    fn test_parse_number_fail_soft() {
        assert_eq!(parse_number(""), 0.0);
        assert_eq!(parse_number("   "), 0.0);
        assert_eq!(parse_number("N/A"), 0.0);
        assert_eq!(parse_number("#REF!"), 0.0);
        assert_eq!(parse_number("NaN"), 0.0);
    }

    #[test]
    fn test_parse_optional_number() {
        assert_eq!(parse_optional_number(""), None);
        assert_eq!(parse_optional_number("-"), None);
        assert_eq!(parse_optional_number("1,02,000"), Some(102000.0));
        assert_eq!(parse_optional_number("0"), Some(0.0));
    }

    #[test]
    fn test_normalize_percent_threshold() {
        assert_eq!(normalize_percent("0.88"), 88.0);
        assert_eq!(normalize_percent("88"), 88.0);
        assert_eq!(normalize_percent("88%"), 88.0);
        assert_eq!(normalize_percent("5.1"), 5.1);
        assert!((normalize_percent("4.9") - 490.0).abs() < 1e-9);
        assert_eq!(normalize_percent("5"), 500.0);
        assert_eq!(normalize_percent(""), 0.0);
    }

    #[test]
    fn test_normalize_rejection_pct() {
        assert_eq!(normalize_rejection_pct(1.6), 1.6);
        assert_eq!(normalize_rejection_pct(1.2), 1.2);
        assert!((normalize_rejection_pct(0.016) - 1.6).abs() < 1e-9);
        assert_eq!(normalize_rejection_pct(0.0), 0.0);
    }

    #[test]
    fn test_normalize_percent_is_idempotent() {
        for raw in [0.88, 88.0, 5.1, 4.9, 92.0] {
            let once = normalize_percent_value(raw);
            assert_eq!(normalize_percent_value(once), once);
        }
    }

    #[test]
    fn test_format_amount_indian_grouping() {
        assert_eq!(format_amount("101152874"), "10,11,52,874");
        assert_eq!(format_amount("874"), "874");
        assert_eq!(format_amount("1000"), "1,000");
        assert_eq!(format_amount("100000"), "1,00,000");
        assert_eq!(format_amount("1,00,000.75"), "1,00,000");
        assert_eq!(format_amount_value(199200000.0), "19,92,00,000");
    }

    #[test]
    fn test_format_amount_negative_and_garbage() {
        assert_eq!(format_amount("-1"), "-1");
        assert_eq!(format_amount_value(-1.9), "-1");
        assert_eq!(format_amount_value(-1234567.0), "-12,34,567");
        assert_eq!(format_amount("n/a"), "n/a");
        assert_eq!(format_amount(""), "");
    }

    #[test]
    fn test_format_amount_out_of_i64_range() {
        assert_eq!(format_amount("1e20"), "1e20");
        assert_eq!(format_amount("-1e20"), "-1e20");
        assert_eq!(format_amount_value(1e20), "100000000000000000000");
        assert_eq!(format_amount_value(9.0e15), "9,00,00,00,00,00,00,000");
    }
}
