use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::transaction::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(Decimal);

impl Money {
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::from(cents) / Decimal::from(100))
    }

    pub fn to_cents(self) -> Option<i64> {
        (self.0 * Decimal::from(100)).round().to_i64()
    }

    pub fn from_decimal(decimal: Decimal) -> Self {
        Money(decimal.round_dp(2))
    }

    pub fn is_negative(self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn abs(self) -> Self {
        Money(self.0.abs())
    }

    /// Parses an amount as exported by personal-finance apps: optional sign,
    /// thousands separators, a leading currency symbol, or accounting parens.
    pub fn parse(text: &str) -> Result<Money, DomainError> {
        let s = text.trim();
        let (negative, s) = if s.starts_with('(') && s.ends_with(')') && s.len() >= 2 {
            (true, &s[1..s.len() - 1])
        } else {
            (false, s)
        };
        let cleaned: String = s
            .chars()
            .filter(|c| !matches!(c, ',' | ' ' | '$' | '¥' | '￥' | '€' | '£'))
            .collect();
        let dec = Decimal::from_str(&cleaned)
            .map_err(|_| DomainError::InvalidAmount(text.to_string()))?;
        let dec = if negative { -dec } else { dec };
        Ok(Money::from_decimal(dec))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
