//! Dependency container
//!
//! A registry mapping each [`Role`] in the object graph to a factory
//! closure. [`Container::resolve`] runs the factories leaves-first, builds
//! every role at most once and hands back the finished [`AppServices`].
//!
//! ```ignore
//! let services = Container::new()
//!     .bind_products_repository(move |_| Ok(Arc::new(SeaOrmProductRepository::new(db.clone()))))
//!     .bind_converter(|_| Ok(Arc::new(FakeCurrencyConverter)))
//!     .resolve()?;
//! ```

use std::cell::{Cell, OnceCell};
use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use super::AppServices;
use crate::application::{FeaturedProductsProvider, ProductService};
use crate::domain::{CurrencyConverter, ProductRepository};

/// A slot in the object graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    ProductsRepository,
    Converter,
    ProductService,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProductsRepository => write!(f, "products_repository"),
            Self::Converter => write!(f, "converter"),
            Self::ProductService => write!(f, "product_service"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("No binding registered for {0}")]
    MissingBinding(Role),

    #[error("Dependency cycle through {0}")]
    Cycle(Role),

    #[error("Factory for {role} failed: {source}")]
    Factory {
        role: Role,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ContainerError {
    pub fn factory(role: Role, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Factory {
            role,
            source: Box::new(source),
        }
    }
}

type Factory<T> = Box<dyn Fn(&Resolver<'_>) -> Result<Arc<T>, ContainerError> + Send + Sync>;

/// Registry of factories, one per role
pub struct Container {
    products_repository: Option<Factory<dyn ProductRepository>>,
    converter: Option<Factory<dyn CurrencyConverter>>,
    product_service: Factory<dyn FeaturedProductsProvider>,
}

impl Container {
    /// Empty registry. The product service defaults to [`ProductService`]
    /// built from whatever repository and converter are bound.
    pub fn new() -> Self {
        Self {
            products_repository: None,
            converter: None,
            product_service: Box::new(default_product_service),
        }
    }

    pub fn bind_products_repository<F>(mut self, factory: F) -> Self
    where
        F: Fn(&Resolver<'_>) -> Result<Arc<dyn ProductRepository>, ContainerError>
            + Send
            + Sync
            + 'static,
    {
        self.products_repository = Some(Box::new(factory));
        self
    }

    pub fn bind_converter<F>(mut self, factory: F) -> Self
    where
        F: Fn(&Resolver<'_>) -> Result<Arc<dyn CurrencyConverter>, ContainerError>
            + Send
            + Sync
            + 'static,
    {
        self.converter = Some(Box::new(factory));
        self
    }

    pub fn bind_product_service<F>(mut self, factory: F) -> Self
    where
        F: Fn(&Resolver<'_>) -> Result<Arc<dyn FeaturedProductsProvider>, ContainerError>
            + Send
            + Sync
            + 'static,
    {
        self.product_service = Box::new(factory);
        self
    }

    /// Build the whole graph.
    pub fn resolve(&self) -> Result<AppServices, ContainerError> {
        let resolver = Resolver {
            container: self,
            products_repository: OnceCell::new(),
            converter: OnceCell::new(),
            building_products_repository: Cell::new(false),
            building_converter: Cell::new(false),
        };
        let products = resolver.product_service()?;
        debug!("Container resolved product_service");
        Ok(AppServices { products })
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

fn default_product_service(
    resolver: &Resolver<'_>,
) -> Result<Arc<dyn FeaturedProductsProvider>, ContainerError> {
    Ok(Arc::new(ProductService::new(
        resolver.products_repository()?,
        resolver.converter()?,
    )))
}

/// Handed to factories so they can ask for their own dependencies.
///
/// Lives for one [`Container::resolve`] call; each role is built once per
/// resolver and shared by every factory that asks for it.
pub struct Resolver<'c> {
    container: &'c Container,
    products_repository: OnceCell<Arc<dyn ProductRepository>>,
    converter: OnceCell<Arc<dyn CurrencyConverter>>,
    building_products_repository: Cell<bool>,
    building_converter: Cell<bool>,
}

/// Run `factory` with `building` raised; a role re-entered while its own
/// factory is still running is a cycle.
fn build_guarded<T: ?Sized>(
    role: Role,
    building: &Cell<bool>,
    factory: impl FnOnce() -> Result<Arc<T>, ContainerError>,
) -> Result<Arc<T>, ContainerError> {
    if building.replace(true) {
        return Err(ContainerError::Cycle(role));
    }
    let built = factory();
    building.set(false);
    built
}

impl Resolver<'_> {
    pub fn products_repository(&self) -> Result<Arc<dyn ProductRepository>, ContainerError> {
        if let Some(repo) = self.products_repository.get() {
            return Ok(repo.clone());
        }
        let factory = self
            .container
            .products_repository
            .as_ref()
            .ok_or(ContainerError::MissingBinding(Role::ProductsRepository))?;
        let repo = build_guarded(
            Role::ProductsRepository,
            &self.building_products_repository,
            || factory(self),
        )?;
        debug!("Container built {}", Role::ProductsRepository);
        Ok(self.products_repository.get_or_init(|| repo).clone())
    }

    pub fn converter(&self) -> Result<Arc<dyn CurrencyConverter>, ContainerError> {
        if let Some(converter) = self.converter.get() {
            return Ok(converter.clone());
        }
        let factory = self
            .container
            .converter
            .as_ref()
            .ok_or(ContainerError::MissingBinding(Role::Converter))?;
        let converter = build_guarded(Role::Converter, &self.building_converter, || {
            factory(self)
        })?;
        debug!("Container built {}", Role::Converter);
        Ok(self.converter.get_or_init(|| converter).clone())
    }

    fn product_service(&self) -> Result<Arc<dyn FeaturedProductsProvider>, ContainerError> {
        (self.container.product_service)(self)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use rust_decimal::Decimal;

    use super::*;
    use crate::domain::{AnonymousUser, Currency, DomainError, Money, Product};
    use crate::infrastructure::{FakeCurrencyConverter, InMemoryProductRepository};

    fn repo() -> Arc<dyn ProductRepository> {
        Arc::new(InMemoryProductRepository::with_products(vec![Product::new(
            "Widget",
            Money::new(Decimal::new(1000, 2), Currency::usd()),
            true,
        )]))
    }

    #[tokio::test]
    async fn test_resolves_default_product_service() {
        let services = Container::new()
            .bind_products_repository(|_| Ok(repo()))
            .bind_converter(|_| Ok(Arc::new(FakeCurrencyConverter)))
            .resolve()
            .unwrap();

        let products = services
            .products
            .get_featured_products(&AnonymousUser)
            .await
            .unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Widget");
    }

    #[test]
    fn test_missing_binding_is_reported() {
        let err = Container::new()
            .bind_converter(|_| Ok(Arc::new(FakeCurrencyConverter)))
            .resolve()
            .err()
            .unwrap();

        assert!(matches!(
            err,
            ContainerError::MissingBinding(Role::ProductsRepository)
        ));
    }

    #[test]
    fn test_factory_error_carries_role() {
        let err = Container::new()
            .bind_products_repository(|_| Ok(repo()))
            .bind_converter(|_| {
                Err(ContainerError::factory(
                    Role::Converter,
                    DomainError::Validation("no rates".to_string()),
                ))
            })
            .resolve()
            .err()
            .unwrap();

        assert_eq!(err.to_string(), "Factory for converter failed: Validation: no rates");
    }

    #[test]
    fn test_each_role_is_built_once() {
        let built = Arc::new(AtomicUsize::new(0));
        let counter = built.clone();

        Container::new()
            .bind_products_repository(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(repo())
            })
            .bind_converter(|_| Ok(Arc::new(FakeCurrencyConverter)))
            .bind_product_service(|r| {
                // Ask twice: the second call must hit the cache.
                let repo = r.products_repository()?;
                let _again = r.products_repository()?;
                Ok(Arc::new(ProductService::new(repo, r.converter()?)))
            })
            .resolve()
            .unwrap();

        assert_eq!(built.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dependency_cycle_is_reported() {
        let err = Container::new()
            .bind_products_repository(|r| {
                r.converter()?;
                Ok(repo())
            })
            .bind_converter(|r| {
                r.products_repository()?;
                Ok(Arc::new(FakeCurrencyConverter))
            })
            .resolve()
            .err()
            .unwrap();

        assert!(matches!(err, ContainerError::Cycle(Role::ProductsRepository)));
        assert_eq!(err.to_string(), "Dependency cycle through products_repository");
    }

    #[test]
    fn test_self_dependency_is_reported() {
        let err = Container::new()
            .bind_products_repository(|_| Ok(repo()))
            .bind_converter(|r| r.converter())
            .resolve()
            .err()
            .unwrap();

        assert!(matches!(err, ContainerError::Cycle(Role::Converter)));
    }
}
