// Utility helpers for parsing and formatting.
//
// This module centralizes all the "dirty" spreadsheet text handling so the
// rest of the code can assume clean, typed values.
use num_format::{Locale, ToFormattedString};

/// Clean a population cell read as text and parse it as an integer.
///
/// Spreadsheet exports write populations like `"1.234.567"` or
/// `"1.234.567 (est.)"` with a footnote in parentheses. We:
/// - cut everything from the first `(` onwards,
/// - strip `.` and `,` thousands separators,
/// - trim whitespace,
/// - and coerce anything still unparsable to `0` rather than failing the
///   whole load.
///
/// A population can never be negative, so signed text is treated as
/// malformed and clamped to `0` like any other garbage.
pub fn clean_population(raw: &str) -> i64 {
    let head = match raw.find('(') {
        Some(pos) => &raw[..pos],
        None => raw,
    };
    let digits: String = head
        .trim()
        .chars()
        .filter(|c| *c != '.' && *c != ',' && !c.is_whitespace())
        .collect();
    digits.parse::<i64>().unwrap_or(0).max(0)
}

/// Parse an emissions cell as `f64`, tolerating comma separators and blank
/// cells. Blank or non-numeric cells count as `0.0` toward the aggregation.
pub fn parse_value(raw: &str) -> f64 {
    let s = raw.trim();
    if s.is_empty() {
        return 0.0;
    }
    s.replace(',', "").parse::<f64>().unwrap_or(0.0)
}

/// Elementwise division of `numerators` by `denominators`, with positions
/// where the denominator is zero overwritten with `0.0` instead of producing
/// NaN or infinity.
pub fn guarded_div(numerators: &[f64], denominators: &[f64]) -> Vec<f64> {
    numerators
        .iter()
        .zip(denominators)
        .map(|(n, d)| if *d == 0.0 { 0.0 } else { n / d })
        .collect()
}

/// Scalar form of the same guard, for single derived values.
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// A column label is a year column when it is exactly four ASCII digits.
pub fn is_year_label(label: &str) -> bool {
    label.len() == 4 && label.chars().all(|c| c.is_ascii_digit())
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Format a floating-point value with:
    // - a fixed number of decimal places, and
    // - locale-aware thousands separators (e.g., `1,234,567.89`).
    let neg = n.is_sign_negative();
    let abs_n = n.abs();
    let s = format!("{:.*}", decimals, abs_n);
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    // Use `num-format` to insert commas into the integer portion.
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    } else if decimals > 0 {
        res.push('.');
        res.push_str(&"0".repeat(decimals));
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Thin wrapper around `num-format` for integer-like values, used for
    // counts in console messages and for chart axis labels.
    n.to_formatted_string(&Locale::en)
}
