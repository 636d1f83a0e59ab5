// Brazilian number handling: "." groups thousands, "," marks the decimal part.
//
// Three parsing routines live here on purpose. They disagree on what a lone
// dot means ("12.5"), and each one is applied to a different set of columns:
//   - clean_number: a lone dot is a decimal point (ratings, percentages)
//   - convert_brazilian_number: every dot is a thousands separator (money, areas, counts)
//   - fix_population: every dot is a thousands separator, no comma handling at all
use anyhow::{anyhow, Result};
use std::str::FromStr;

/// Returns true for the textual markers the dataset uses for "no value".
fn is_missing_marker(s: &str) -> bool {
    matches!(s.trim(), "" | "nan" | "NaN")
}

fn strip_quotes(s: &str) -> String {
    s.replace('"', "").trim().to_string()
}

fn parse_finite(s: &str) -> Result<f64> {
    let value = f64::from_str(s).map_err(|e| anyhow!("Failed to parse decimal '{}': {}", s, e))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(anyhow!("Non-finite value '{}'", s))
    }
}

// Splits on the last comma: everything before is the integer part (dots removed),
// everything after is the decimal fraction.
fn comma_to_canonical(s: &str) -> Option<String> {
    let (integer_part, decimal_part) = s.rsplit_once(',')?;
    Some(format!("{}.{}", integer_part.replace('.', ""), decimal_part))
}

// Parses decimals like "1.234,56", "123,45" or "2.708.600" into f64.
// A single dot with no comma ("20.79") is read as a decimal point.
pub fn parse_decimal(s: &str) -> Result<f64> {
    if is_missing_marker(s) {
        return Err(anyhow!("Missing value"));
    }
    let cleaned = strip_quotes(s);

    if let Ok(value) = parse_finite(&cleaned) {
        return Ok(value);
    }

    let canonical = match comma_to_canonical(&cleaned) {
        Some(c) => c,
        None if cleaned.matches('.').count() > 1 => cleaned.replace('.', ""),
        None => cleaned.clone(),
    };

    parse_finite(&canonical).map_err(|e| anyhow!("Failed to parse decimal '{}': {}", s, e))
}

// Strict variant for columns known to be Brazilian-formatted. Without a comma
// every dot is a thousands separator and the rest must be an integer.
pub fn parse_strict(s: &str) -> Result<f64> {
    if is_missing_marker(s) {
        return Err(anyhow!("Missing value"));
    }
    let cleaned = strip_quotes(s);

    match comma_to_canonical(&cleaned) {
        Some(canonical) => parse_finite(&canonical),
        None => {
            let digits = cleaned.replace('.', "");
            i64::from_str(&digits)
                .map(|v| v as f64)
                .map_err(|e| anyhow!("Failed to parse integer '{}': {}", s, e))
        }
    }
}

/// General-purpose normalizer. Never fails: anything unparseable is NaN.
///
/// ```
/// use shared::brazilian_format::clean_number;
/// assert_eq!(clean_number("20.553.313.781,77"), 20553313781.77);
/// assert_eq!(clean_number("2.708.600"), 2708600.0);
/// assert_eq!(clean_number("20.79"), 20.79);
/// assert!(clean_number("abc").is_nan());
/// ```
pub fn clean_number(s: &str) -> f64 {
    parse_decimal(s).unwrap_or(f64::NAN)
}

/// Strict normalizer for known Brazilian columns. Returns 0 on failure so that
/// totals stay numeric.
pub fn convert_brazilian_number(s: &str) -> f64 {
    parse_strict(s).unwrap_or(0.0)
}

/// Population counts never carry decimals, so every dot is a thousands
/// separator, including a single one ("953.326" is 953326 people).
pub fn fix_population(s: &str) -> u64 {
    let trimmed = s.trim();
    if let Ok(count) = u64::from_str(&trimmed.replace('.', "")) {
        return count;
    }
    // Plain numeric fallback, anything else degrades to zero.
    match f64::from_str(trimmed) {
        Ok(v) if v.is_finite() && v >= 0.0 => v.trunc() as u64,
        _ => 0,
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}

// Formats a value as "1.234.567,89".
pub fn format_decimal(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.decimals$}", value.abs(), decimals = decimals);
    let (integer_part, decimal_part) = match formatted.split_once('.') {
        Some((i, d)) => (i, Some(d)),
        None => (formatted.as_str(), None),
    };
    let sign = if value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    match decimal_part {
        Some(d) => format!("{}{},{}", sign, group_thousands(integer_part), d),
        None => format!("{}{}", sign, group_thousands(integer_part)),
    }
}

// Formats an integer count as "1.234.567". Fractions are truncated.
pub fn format_integer(value: f64) -> String {
    if !value.is_finite() {
        return "N/A".to_string();
    }
    format_decimal(value.trunc(), 0)
}

// Monetary values: "R$ 1.234.567,89" from a thousand up, "R$ 12,50" below.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return "N/A".to_string();
    }
    format!("R$ {}", format_decimal(value, 2))
}

/// Compact form for large magnitudes using K, M and B suffixes
/// (1.500.000 becomes "R$ 1,5M").
pub fn format_compact(value: f64, with_currency: bool) -> String {
    let prefix = if with_currency { "R$ " } else { "" };
    if value.is_nan() || value == 0.0 {
        return format!("{}0", prefix);
    }

    let body = if value >= 1_000_000_000.0 {
        format!("{:.1}B", value / 1_000_000_000.0)
    } else if value >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("{:.0}K", value / 1_000.0)
    } else {
        format!("{:.0}", value)
    };
    format!("{}{}", prefix, body.replace('.', ","))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_number_monetary() {
        assert_eq!(clean_number("20.553.313.781,77"), 20553313781.77);
        assert_eq!(clean_number("343.700.899,36"), 343700899.36);
        assert_eq!(clean_number("1.234,56"), 1234.56);
        assert_eq!(clean_number("123,45"), 123.45);
    }

    #[test]
    fn test_clean_number_thousands_only() {
        assert_eq!(clean_number("2.708.600"), 2708600.0);
    }

    #[test]
    fn test_clean_number_single_dot_is_decimal() {
        assert_eq!(clean_number("20.79"), 20.79);
        assert_eq!(clean_number("953.326"), 953.326);
    }

    #[test]
    fn test_clean_number_plain_and_quoted() {
        assert_eq!(clean_number("163"), 163.0);
        assert_eq!(clean_number("\"1.234,5\""), 1234.5);
        assert_eq!(clean_number("  42  "), 42.0);
    }

    #[test]
    fn test_clean_number_splits_on_last_comma() {
        // "1,234,5" -> integer "1,234" keeps its comma and fails to parse
        assert!(clean_number("1,234,5").is_nan());
        assert_eq!(clean_number("7,"), 7.0);
    }

    #[test]
    fn test_clean_number_missing_values() {
        assert!(clean_number("").is_nan());
        assert!(clean_number("nan").is_nan());
        assert!(clean_number("NaN").is_nan());
        assert!(clean_number("abc").is_nan());
        assert!(clean_number("inf").is_nan());
        assert!(clean_number("R$ 10,00").is_nan());
    }

    #[test]
    fn test_clean_number_is_idempotent_on_canonical_text() {
        for value in [0.0, 12.5, 343700899.36, 2708600.0, 20553313781.77] {
            let once = clean_number(&value.to_string());
            assert_eq!(clean_number(&once.to_string()), once);
            assert_eq!(once, value);
        }
    }

    #[test]
    fn test_convert_brazilian_number() {
        assert_eq!(convert_brazilian_number("20.553.313.781,77"), 20553313781.77);
        assert_eq!(convert_brazilian_number("2.708.600"), 2708600.0);
        assert_eq!(convert_brazilian_number("163"), 163.0);
        assert_eq!(convert_brazilian_number("7,25"), 7.25);
    }

    #[test]
    fn test_convert_brazilian_number_failures_are_zero() {
        assert_eq!(convert_brazilian_number(""), 0.0);
        assert_eq!(convert_brazilian_number("nan"), 0.0);
        assert_eq!(convert_brazilian_number("n/a"), 0.0);
        assert_eq!(convert_brazilian_number("1e5"), 0.0);
    }

    #[test]
    fn test_convert_brazilian_number_single_dot_is_thousands() {
        assert_eq!(convert_brazilian_number("953.326"), 953326.0);
    }

    #[test]
    fn test_fix_population() {
        assert_eq!(fix_population("953.326"), 953326);
        assert_eq!(fix_population("1.025.360"), 1025360);
        assert_eq!(fix_population("8450"), 8450);
        assert_eq!(fix_population(" 12.001 "), 12001);
    }

    #[test]
    fn test_fix_population_failures() {
        assert_eq!(fix_population(""), 0);
        assert_eq!(fix_population("nan"), 0);
        assert_eq!(fix_population("1,5"), 0);
        assert_eq!(fix_population("-300"), 0);
        assert_eq!(fix_population("1e3"), 1000);
    }

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(1234567.891, 2), "1.234.567,89");
        assert_eq!(format_decimal(12.5, 2), "12,50");
        assert_eq!(format_decimal(999.0, 0), "999");
        assert_eq!(format_decimal(-1234.5, 1), "-1.234,5");
        assert_eq!(format_decimal(-0.001, 2), "0,00");
    }

    #[test]
    fn test_format_decimal_round_trips_through_clean_number() {
        for value in [343700899.36, 20553313781.77, 0.5, 12.0, 1000.25] {
            assert_eq!(clean_number(&format_decimal(value, 2)), value);
        }
        assert_eq!(clean_number(&format_decimal(2708600.0, 0)), 2708600.0);
    }

    #[test]
    fn test_integer_output_reads_back_through_strict_routines() {
        // A single thousands group looks like a decimal point to clean_number.
        assert_eq!(format_decimal(1234.0, 0), "1.234");
        assert_eq!(clean_number("1.234"), 1.234);
        assert_eq!(convert_brazilian_number(&format_decimal(1234.0, 0)), 1234.0);

        assert_eq!(format_integer(953326.0), "953.326");
        assert_eq!(clean_number("953.326"), 953.326);
        assert_eq!(fix_population(&format_integer(953326.0)), 953326);
        assert_eq!(convert_brazilian_number(&format_integer(953326.0)), 953326.0);
    }

    #[test]
    fn test_format_integer_and_currency() {
        assert_eq!(format_integer(953326.0), "953.326");
        assert_eq!(format_integer(12.9), "12");
        assert_eq!(format_integer(f64::NAN), "N/A");
        assert_eq!(format_currency(1234567.891), "R$ 1.234.567,89");
        assert_eq!(format_currency(12.5), "R$ 12,50");
    }

    #[test]
    fn test_format_compact() {
        assert_eq!(format_compact(1_500_000.0, true), "R$ 1,5M");
        assert_eq!(format_compact(20_553_313_781.77, true), "R$ 20,6B");
        assert_eq!(format_compact(15_200.0, false), "15K");
        assert_eq!(format_compact(950.0, true), "R$ 950");
        assert_eq!(format_compact(0.0, true), "R$ 0");
        assert_eq!(format_compact(f64::NAN, false), "0");
    }
}
