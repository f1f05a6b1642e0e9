//! Locale-sensitive number parsing and formatting for numeric functions

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal separator configuration
///
/// With a separator other than `.`, operands containing `.` do not parse,
/// so "1.000" is never silently read as one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormat {
    decimal_separator: char,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            decimal_separator: '.',
        }
    }
}

impl NumberFormat {
    pub fn new(decimal_separator: char) -> Self {
        Self { decimal_separator }
    }

    pub fn decimal_separator(&self) -> char {
        self.decimal_separator
    }

    /// Parses an operand; `None` if it is not a number
    pub fn parse(&self, text: &str) -> Option<Decimal> {
        let sep = self.decimal_separator;
        if sep != '.' && text.contains('.') {
            return None;
        }
        if text.is_empty() || text.contains('_') || text.chars().any(char::is_whitespace) {
            return None;
        }

        let mut canonical = text.replace(sep, ".");
        if let Some(rest) = canonical.strip_prefix('+') {
            canonical = rest.to_string();
        }
        if canonical.starts_with('.') {
            canonical.insert(0, '0');
        } else if canonical.starts_with("-.") {
            canonical.insert(1, '0');
        }
        if canonical.ends_with('.') {
            canonical.push('0');
        }

        if canonical.contains(['e', 'E']) {
            Decimal::from_scientific(&canonical).ok()
        } else {
            Decimal::from_str(&canonical).ok()
        }
    }

    /// Plain rendering without trailing zeros; zero is "0"
    pub fn format(&self, value: Decimal) -> String {
        if value.is_zero() {
            return "0".to_string();
        }
        self.localize(value.normalize().to_string())
    }

    /// DIVIDE/FORMAT rendering: rounded half-up to at most `max_digits`
    /// decimals, then padded to at least `min_digits`
    pub fn format_scaled(&self, value: Decimal, min_digits: usize, max_digits: Option<u32>) -> String {
        let rounded = match max_digits {
            Some(max) => value.round_dp_with_strategy(max, RoundingStrategy::MidpointAwayFromZero),
            None => value,
        };

        let mut text = if rounded.is_zero() {
            "0".to_string()
        } else {
            rounded.normalize().to_string()
        };

        let dot = match text.find('.') {
            Some(idx) => Some(idx),
            None if min_digits > 0 => {
                text.push_str(".0");
                Some(text.len() - 2)
            }
            None => None,
        };
        let decimals = dot.map_or(0, |idx| text.len() - idx - 1);
        for _ in decimals..min_digits {
            text.push('0');
        }

        self.localize(text)
    }

    fn localize(&self, text: String) -> String {
        if self.decimal_separator == '.' {
            text
        } else {
            text.replace('.', &self.decimal_separator.to_string())
        }
    }
}
