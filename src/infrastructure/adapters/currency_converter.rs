//! Currency converter implementations

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::warn;

use crate::domain::{Currency, CurrencyConverter, DomainError, DomainResult, Money};

/// Relabels the amount with the target currency; no rate is applied.
#[derive(Debug, Clone, Copy, Default)]
pub struct FakeCurrencyConverter;

#[async_trait]
impl CurrencyConverter for FakeCurrencyConverter {
    async fn exchange(&self, money: Money, target: &Currency) -> DomainResult<Money> {
        Ok(money.with_currency(target.clone()))
    }
}

/// Converts through a fixed table of rates against a base currency.
///
/// `rates[c]` is how many units of `c` one unit of the base buys; the base
/// itself is always priced at 1.
#[derive(Debug, Clone)]
pub struct FixedRateCurrencyConverter {
    base: Currency,
    rates: HashMap<Currency, Decimal>,
}

impl FixedRateCurrencyConverter {
    pub fn new(base: Currency, rates: impl IntoIterator<Item = (Currency, Decimal)>) -> Self {
        let mut rates: HashMap<Currency, Decimal> = rates
            .into_iter()
            .filter(|(currency, rate)| {
                if rate.is_sign_positive() && !rate.is_zero() {
                    true
                } else {
                    warn!("Ignoring non-positive rate {} for {}", rate, currency);
                    false
                }
            })
            .collect();
        rates.insert(base.clone(), Decimal::ONE);
        Self { base, rates }
    }

    pub fn base(&self) -> &Currency {
        &self.base
    }

    fn rate(&self, currency: &Currency) -> Option<Decimal> {
        self.rates.get(currency).copied()
    }
}

#[async_trait]
impl CurrencyConverter for FixedRateCurrencyConverter {
    async fn exchange(&self, money: Money, target: &Currency) -> DomainResult<Money> {
        if money.currency() == target {
            return Ok(money);
        }

        let unavailable = || DomainError::ConversionUnavailable {
            from: money.currency().to_string(),
            to: target.to_string(),
        };
        let from_rate = self.rate(money.currency()).ok_or_else(unavailable)?;
        let to_rate = self.rate(target).ok_or_else(unavailable)?;

        // Extreme rates can overflow the decimal range
        let amount = money
            .amount()
            .checked_div(from_rate)
            .and_then(|base_amount| base_amount.checked_mul(to_rate))
            .ok_or_else(|| {
                warn!("Exchange of {} into {} overflowed", money, target);
                unavailable()
            })?
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        Ok(Money::new(amount, target.clone()))
    }
}
