//! Lenient parsing of amounts typed by hand.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Parses a user-entered amount, accepting a decimal comma (`"12,50"`).
///
/// Like the spreadsheet it feeds, parsing reads the longest numeric prefix and
/// ignores the rest (`"12.5 Bs"` is 12.5). Input with no numeric prefix yields 0.
#[must_use]
pub fn parse_amount(text: &str) -> Decimal {
    let normalized = text.trim().replace(',', ".");
    let prefix = numeric_prefix(&normalized);
    Decimal::from_str(prefix).unwrap_or(Decimal::ZERO)
}

fn numeric_prefix(s: &str) -> &str {
    let mut end = 0;
    let mut seen_dot = false;
    for (i, c) in s.char_indices() {
        match c {
            '+' | '-' if i == 0 => {}
            '0'..='9' => {}
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }
    let prefix = &s[..end];
    prefix.strip_suffix('.').unwrap_or(prefix)
}
