//! Money aggregate
//!
//! Currency and money value objects plus the converter port.

pub mod converter;
pub mod model;

pub use converter::CurrencyConverter;
pub use model::{Currency, Money, MAX_CURRENCY_CODE_LEN};
