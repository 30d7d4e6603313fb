//! Inbound ports: what the delivery layer may ask the application for

use async_trait::async_trait;

use crate::domain::{DiscountedProduct, DomainResult, UserContext};

/// Featured products priced for a particular customer.
///
/// The HTTP layer depends only on this trait, never on a concrete service.
#[async_trait]
pub trait FeaturedProductsProvider: Send + Sync {
    async fn get_featured_products(
        &self,
        user: &dyn UserContext,
    ) -> DomainResult<Vec<DiscountedProduct>>;
}
