//! Adapters for outside services the domain talks to

pub mod currency_converter;

pub use currency_converter::{FakeCurrencyConverter, FixedRateCurrencyConverter};
