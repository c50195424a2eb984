// src/table/number.rs

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::{RatesError, Result};

/// Explicit decimal notation used by a publisher.
///
/// Prices are parsed with this rule instead of the process locale, so
/// `"3,9112"` is always `3.9112` no matter where the binary runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberStyle {
    decimal_separator: char,
    grouping_separator: Option<char>,
}

impl NumberStyle {
    /// The publisher's convention: comma before the fraction, no grouping.
    pub const COMMA_DECIMAL: NumberStyle = NumberStyle {
        decimal_separator: ',',
        grouping_separator: None,
    };

    pub fn new(decimal_separator: char, grouping_separator: Option<char>) -> Result<Self> {
        let bad = |c: char| c.is_ascii_digit() || c == '-' || c == '+';
        if bad(decimal_separator) {
            return Err(RatesError::Init(format!(
                "{decimal_separator:?} cannot be a decimal separator"
            )));
        }
        if let Some(g) = grouping_separator {
            if bad(g) || g == decimal_separator {
                return Err(RatesError::Init(format!(
                    "{g:?} cannot be a grouping separator next to {decimal_separator:?}"
                )));
            }
        }
        Ok(Self {
            decimal_separator,
            grouping_separator,
        })
    }

    /// Parse `text` into an exact decimal, keeping the written scale.
    pub fn parse(&self, text: &str) -> std::result::Result<Decimal, String> {
        let text = text.trim();
        if text.is_empty() {
            return Err("empty number".to_string());
        }

        let mut canonical = String::with_capacity(text.len());
        for (i, c) in text.chars().enumerate() {
            match c {
                '0'..='9' => canonical.push(c),
                '-' | '+' if i == 0 => canonical.push(c),
                c if c == self.decimal_separator => canonical.push('.'),
                c if Some(c) == self.grouping_separator => {}
                other => return Err(format!("unexpected {other:?} in number {text:?}")),
            }
        }

        Decimal::from_str(&canonical).map_err(|e| format!("{text:?}: {e}"))
    }
}

impl Default for NumberStyle {
    fn default() -> Self {
        Self::COMMA_DECIMAL
    }
}
