//! Currency converter interface

use async_trait::async_trait;

use super::model::{Currency, Money};
use crate::domain::DomainResult;

/// Exchanges money into another currency.
///
/// Implementations must return a value whose currency equals `target`.
/// A converter that cannot price the pair fails with
/// `DomainError::ConversionUnavailable`.
#[async_trait]
pub trait CurrencyConverter: Send + Sync {
    async fn exchange(&self, money: Money, target: &Currency) -> DomainResult<Money>;
}
