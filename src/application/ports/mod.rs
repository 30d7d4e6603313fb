//! Application ports

pub mod inbound;

pub use inbound::FeaturedProductsProvider;
