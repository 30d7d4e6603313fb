//! # Storefront
//!
//! Featured products priced for the current customer: converted into their
//! currency and discounted when they are a preferred customer.
//!
//! ## Architecture
//!
//! - **domain**: money, products, the customer pricing context and the
//!   repository/converter traits
//! - **application**: the product service behind an inbound port
//! - **infrastructure**: SeaORM and in-memory catalogs, currency converters
//! - **interfaces**: axum routes, HTML page and JSON API
//! - **composition**: builds the object graph by hand or through a container
//! - **server**: process lifecycle shared by the CLI

pub mod application;
pub mod composition;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod support;

pub use config::{default_config_path, AppConfig, WiringMode};

pub use composition::{compose, AppServices, Container};

pub use infrastructure::{init_database, DatabaseConfig};

pub use interfaces::http::create_router;

pub use support::errors::{AppError, DomainError, DomainResult};
