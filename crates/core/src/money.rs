//! Display formatting for prices: `.` groups thousands, `,` separates cents.

/// `8000.0` -> `8.000,00`.
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let cents = (value.abs() * 100.0).round() as u64;
    let units = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (i, ch) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}{grouped},{frac:02}")
}

pub fn currency_symbol(currency: &str) -> &str {
    match currency {
        "BRL" => "R$",
        "USD" => "US$",
        "EUR" => "€",
        "GBP" => "£",
        other => other,
    }
}

/// `("BRL", 8000.0)` -> `R$ 8.000,00`.
pub fn format_price(currency: &str, value: f64) -> String {
    format!("{} {}", currency_symbol(currency), format_amount(value))
}
