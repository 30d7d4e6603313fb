//! Product repository interfaces

use async_trait::async_trait;

use super::model::{NewProduct, Product};
use crate::domain::DomainResult;

/// Read side used by the storefront.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// All products flagged as featured, in storage order.
    async fn get_featured_products(&self) -> DomainResult<Vec<Product>>;
}

/// Write side used when stocking the catalog.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn add_product(&self, product: NewProduct) -> DomainResult<i32>;
    async fn count(&self) -> DomainResult<u64>;
}
