//! Product service: featured products priced for a customer

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::application::ports::FeaturedProductsProvider;
use crate::domain::{
    CurrencyConverter, DiscountedProduct, DomainResult, ProductRepository, UserContext,
};

/// Combines the catalog with currency conversion and discount rules
pub struct ProductService {
    products_repository: Arc<dyn ProductRepository>,
    converter: Arc<dyn CurrencyConverter>,
}

impl ProductService {
    pub fn new(
        products_repository: Arc<dyn ProductRepository>,
        converter: Arc<dyn CurrencyConverter>,
    ) -> Self {
        Self {
            products_repository,
            converter,
        }
    }
}

#[async_trait]
impl FeaturedProductsProvider for ProductService {
    async fn get_featured_products(
        &self,
        user: &dyn UserContext,
    ) -> DomainResult<Vec<DiscountedProduct>> {
        let currency = user.currency();
        let products = self.products_repository.get_featured_products().await?;

        let mut priced = Vec::with_capacity(products.len());
        for product in products {
            let unit_price = self
                .converter
                .exchange(product.unit_price.clone(), &currency)
                .await?;
            priced.push(product.with_unit_price(unit_price).apply_discount_for(user));
        }

        debug!(
            "Priced {} featured products in {} (preferred: {})",
            priced.len(),
            currency,
            user.is_preferred()
        );
        Ok(priced)
    }
}
