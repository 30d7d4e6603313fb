//! Composition root
//!
//! Two ways to assemble the same object graph:
//!
//! - [`pure`]: construct the leaves and inject them by hand
//! - [`container`]: register factories per role and let the container
//!   resolve the graph
//!
//! Both hand the HTTP layer an [`AppServices`].

pub mod container;
pub mod pure;

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tracing::info;

pub use container::{Container, ContainerError, Resolver, Role};

use crate::application::FeaturedProductsProvider;
use crate::config::{ConfigError, ConverterConfig, ConverterKind, WiringMode};
use crate::domain::CurrencyConverter;
use crate::infrastructure::{
    FakeCurrencyConverter, FixedRateCurrencyConverter, SeaOrmProductRepository,
};
use crate::support::errors::AppError;

/// The services the delivery layer depends on
#[derive(Clone)]
pub struct AppServices {
    pub products: Arc<dyn FeaturedProductsProvider>,
}

/// Build the converter selected in configuration.
pub fn converter_from_config(
    config: &ConverterConfig,
) -> Result<Arc<dyn CurrencyConverter>, ConfigError> {
    match config.kind {
        ConverterKind::Fake => Ok(Arc::new(FakeCurrencyConverter)),
        ConverterKind::FixedRate => {
            let base = config.base_currency()?;
            let rates = config.parsed_rates()?;
            info!(
                "Fixed-rate converter: base {} with {} rates",
                base,
                rates.len()
            );
            Ok(Arc::new(FixedRateCurrencyConverter::new(base, rates)))
        }
    }
}

/// Wire the database-backed services the server runs with.
pub fn compose(
    mode: WiringMode,
    db: DatabaseConnection,
    converter_config: &ConverterConfig,
) -> Result<AppServices, AppError> {
    info!("Wiring services ({})", mode);
    match mode {
        WiringMode::Pure => {
            let repo = Arc::new(SeaOrmProductRepository::new(db));
            let converter = converter_from_config(converter_config)?;
            Ok(pure::build(repo, converter))
        }
        WiringMode::Container => {
            let converter_config = converter_config.clone();
            let services = Container::new()
                .bind_products_repository(move |_| {
                    Ok(Arc::new(SeaOrmProductRepository::new(db.clone())))
                })
                .bind_converter(move |_| {
                    converter_from_config(&converter_config)
                        .map_err(|e| ContainerError::factory(Role::Converter, e))
                })
                .resolve()?;
            Ok(services)
        }
    }
}
