//! Input validation rules shared by the registry and the ledger.
//!
//! All functions are pure: they inspect raw input and answer yes/no, or produce a
//! parsed value. Nothing here touches ledger state.

use rust_decimal::Decimal;

use super::Amount;

/// Number of digits in a user identifier.
pub const IDENTIFIER_LEN: usize = 8;

/// Minimum number of characters in a trimmed display name.
pub const MIN_NAME_LEN: usize = 2;

/// True iff `s` is exactly eight ASCII digits.
pub fn is_valid_identifier(s: &str) -> bool {
    s.len() == IDENTIFIER_LEN && s.bytes().all(|b| b.is_ascii_digit())
}

/// True iff the trimmed name has at least two characters and contains only
/// letters (including accented Latin letters) and ASCII whitespace.
pub fn is_valid_name(s: &str) -> bool {
    let trimmed = s.trim_matches(|c: char| c.is_ascii_whitespace());
    trimmed.chars().count() >= MIN_NAME_LEN
        && s.chars().all(|c| c.is_ascii_whitespace() || is_name_letter(c))
}

/// ASCII letters plus the Latin-1 letter block (À..ÿ, excluding × and ÷).
fn is_name_letter(c: char) -> bool {
    c.is_ascii_alphabetic() || (('\u{C0}'..='\u{FF}').contains(&c) && c != '×' && c != '÷')
}

/// True iff an amount is present and strictly greater than zero.
pub fn is_positive_amount(amount: Option<Amount>) -> bool {
    amount.is_some_and(|a| a > Decimal::ZERO)
}

/// True iff `balance` covers `amount`.
pub fn has_sufficient_balance(balance: Amount, amount: Amount) -> bool {
    balance >= amount
}

/// Parse user-entered text into an exact decimal.
/// Accepts plain ("50", "12.5", "-3") and scientific ("1e3") notation.
/// Returns `None` for empty or malformed input, and for input with more
/// precision than a decimal can hold exactly.
pub fn parse_amount(text: &str) -> Option<Amount> {
    let text = text.trim();
    if text.is_empty() || text.contains('_') {
        return None;
    }

    Decimal::from_str_exact(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}
