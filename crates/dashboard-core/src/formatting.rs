//! Display helpers for the presentation layer.
//!
//! Amounts use a space as thousands separator and a decimal comma, with the
//! currency symbol appended (`1 234,56 €`). Nothing in the pipeline calls
//! these; aggregates stay raw `f64` values.

/// Format a number with space-grouped thousands and a decimal comma.
///
/// # Examples
///
/// ```
/// use dashboard_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5, 1), "1 234,5");
/// assert_eq!(format_number(1234567.0, 0), "1 234 567");
/// assert_eq!(format_number(0.0, 2), "0,00");
/// assert_eq!(format_number(-9876.5, 1), "-9 876,5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let negative = value < 0.0;
    let abs_value = value.abs();

    // Nudge by a relative epsilon so exact midpoints round away from zero.
    let factor = 10_f64.powi(decimals as i32);
    let epsilon = f64::EPSILON * abs_value * factor;
    let rounded = ((abs_value * factor) + epsilon).round() / factor;

    let integer_part = rounded.trunc() as u64;
    let frac_part = rounded - rounded.trunc();

    let grouped = group_thousands(&integer_part.to_string(), ' ');

    let result = if decimals == 0 {
        grouped
    } else {
        // "0.50" → ",50"
        let frac_str = format!("{:.prec$}", frac_part, prec = decimals as usize);
        format!("{},{}", grouped, &frac_str[2..])
    };

    if negative && rounded != 0.0 {
        format!("-{}", result)
    } else {
        result
    }
}

/// Format a monetary amount with two decimals and a trailing currency symbol.
///
/// # Examples
///
/// ```
/// use dashboard_core::formatting::format_money;
///
/// assert_eq!(format_money(1234.56, "€"), "1 234,56 €");
/// assert_eq!(format_money(0.0, "$"), "0,00 $");
/// ```
pub fn format_money(amount: f64, currency: &str) -> String {
    format!("{} {}", format_number(amount, 2), currency)
}

/// Format an integer count with space-grouped thousands.
pub fn format_count(count: usize) -> String {
    group_thousands(&count.to_string(), ' ')
}

/// Calculate `(part / whole) * 100`, rounded to `decimal_places`.
///
/// Returns `0.0` if `whole` is zero.
///
/// # Examples
///
/// ```
/// use dashboard_core::formatting::percentage;
///
/// assert!((percentage(50.0, 200.0, 1) - 25.0).abs() < 1e-9);
/// assert_eq!(percentage(0.0, 0.0, 2), 0.0);
/// ```
pub fn percentage(part: f64, whole: f64, decimal_places: u32) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    let raw = (part / whole) * 100.0;
    let factor = 10_f64.powi(decimal_places as i32);
    (raw * factor).round() / factor
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert `sep` every three digits from the right of an integer string.
fn group_thousands(s: &str, sep: char) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(sep);
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
