//! Infrastructure layer - external concerns

pub mod adapters;
pub mod database;
pub mod storage;

pub use adapters::{FakeCurrencyConverter, FixedRateCurrencyConverter};
pub use database::{init_database, DatabaseConfig, SeaOrmProductRepository};
pub use storage::InMemoryProductRepository;
