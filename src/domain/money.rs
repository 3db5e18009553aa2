use rust_decimal::{Decimal, RoundingStrategy};

/// Money is represented as an exact decimal to avoid floating-point precision issues.
/// Stored values keep whatever scale they were entered with; rounding only happens
/// when an amount is rendered.
pub type Amount = Decimal;

/// Format an amount as a human-readable string with two fractional digits.
/// Example: 150 -> "150.00", 12.345 -> "12.35", -0.004 -> "0.00"
pub fn format_amount(amount: Amount) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        return "0.00".to_string();
    }
    format!("{:.2}", rounded)
}

/// Format an amount prefixed with a currency symbol.
/// Example: ("S/", 50) -> "S/ 50.00"
pub fn format_money(symbol: &str, amount: Amount) -> String {
    format!("{} {}", symbol, format_amount(amount))
}
