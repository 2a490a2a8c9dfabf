//! Currency rounding and display.

/// Round to whole cents. Non-finite values become zero.
#[must_use]
pub fn round_cents(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value * 100.0).round() / 100.0
}

/// Format a dollar amount with thousands separators, e.g. `$1,618.29`.
#[must_use]
pub fn format_currency(value: f64) -> String {
    let rounded = round_cents(value);
    let negative = rounded < 0.0;
    let cents_total = (rounded.abs() * 100.0).round() as u64;
    let dollars = cents_total / 100;
    let cents = cents_total % 100;

    let digits = dollars.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}${grouped}.{cents:02}")
}
