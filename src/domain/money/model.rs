//! Currency and money value objects

use std::fmt;
use std::ops::Mul;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::{DomainError, DomainResult};

/// Longest currency code the catalog schema can hold.
pub const MAX_CURRENCY_CODE_LEN: usize = 5;

/// Currency identified by its code (ISO 4217, e.g. "USD", "EUR")
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Currency {
    code: String,
}

impl Currency {
    /// Build a currency from a trusted code (upper-cased, not validated).
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into().to_uppercase(),
        }
    }

    /// Parse a code coming from outside the process.
    pub fn parse(code: &str) -> DomainResult<Self> {
        let code = code.trim();
        if code.is_empty() {
            return Err(DomainError::Validation(
                "currency code must not be empty".to_string(),
            ));
        }
        if code.chars().count() > MAX_CURRENCY_CODE_LEN {
            return Err(DomainError::Validation(format!(
                "currency code '{}' is longer than {} characters",
                code, MAX_CURRENCY_CODE_LEN
            )));
        }
        if !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(DomainError::Validation(format!(
                "currency code '{}' must be alphabetic",
                code
            )));
        }
        Ok(Self::new(code))
    }

    pub fn usd() -> Self {
        Self::new("USD")
    }

    pub fn code(&self) -> &str {
        &self.code
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

/// An amount of money in a given currency.
///
/// Immutable: every operation returns a new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    /// Same amount, different currency. No rate is applied.
    pub fn with_currency(&self, currency: Currency) -> Self {
        Self::new(self.amount, currency)
    }

    /// Amount rounded to cents, halves away from zero.
    pub fn rounded_amount(&self) -> Decimal {
        self.amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }
}

impl Mul<Decimal> for Money {
    type Output = Money;

    fn mul(self, factor: Decimal) -> Money {
        Money::new(self.amount * factor, self.currency)
    }
}

impl Mul<Decimal> for &Money {
    type Output = Money;

    fn mul(self, factor: Decimal) -> Money {
        Money::new(self.amount * factor, self.currency.clone())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}{}", self.rounded_amount(), self.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_currency_equality_by_code() {
        assert_eq!(Currency::new("usd"), Currency::new("USD"));
        assert_ne!(Currency::new("USD"), Currency::new("EUR"));
    }

    #[test]
    fn test_currency_parse_rejects_bad_codes() {
        assert!(Currency::parse("").is_err());
        assert!(Currency::parse("TOOLONG").is_err());
        assert!(Currency::parse("U$D").is_err());
        assert_eq!(Currency::parse(" eur ").unwrap().code(), "EUR");
    }

    #[test]
    fn test_money_display() {
        let money = Money::new(dec("10"), Currency::usd());
        assert_eq!(money.to_string(), "10.00USD");

        let money = Money::new(dec("9.5"), Currency::new("EUR"));
        assert_eq!(money.to_string(), "9.50EUR");
    }

    #[test]
    fn test_display_rounds_halves_away_from_zero() {
        let money = Money::new(dec("0.485"), Currency::usd());
        assert_eq!(money.rounded_amount(), dec("0.49"));
        assert_eq!(money.to_string(), "0.49USD");

        let money = Money::new(dec("9.4949"), Currency::new("EUR"));
        assert_eq!(money.to_string(), "9.49EUR");
    }

    #[test]
    fn test_multiplication_returns_new_value() {
        let price = Money::new(dec("10.00"), Currency::usd());
        let discounted = &price * dec("0.95");

        assert_eq!(discounted.amount(), dec("9.50"));
        assert_eq!(discounted.currency(), &Currency::usd());
        assert_eq!(price.amount(), dec("10.00"));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: scaling multiplies the amount and keeps the currency.
            #[test]
            fn scaling_keeps_currency(
                cents in 0i64..10_000_000,
                factor_bp in 0i64..20_000,
                code in "[A-Z]{3}"
            ) {
                let amount = Decimal::new(cents, 2);
                let factor = Decimal::new(factor_bp, 4);
                let money = Money::new(amount, Currency::new(code.clone()));

                let scaled = money.clone() * factor;

                prop_assert_eq!(scaled.amount(), amount * factor);
                prop_assert_eq!(scaled.currency().code(), code.as_str());
                prop_assert_eq!(money.amount(), amount);
            }
        }
    }
}
