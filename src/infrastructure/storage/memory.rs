//! In-memory product storage for development and testing

use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::{DomainResult, NewProduct, Product, ProductCatalog, ProductRepository};

/// In-memory catalog. Reads come back in insertion order.
pub struct InMemoryProductRepository {
    products: DashMap<i32, Product>,
    id_counter: AtomicI32,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self {
            products: DashMap::new(),
            id_counter: AtomicI32::new(1),
        }
    }

    /// Build a repository already holding `products`.
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let repo = Self::new();
        for product in products {
            repo.insert(product);
        }
        repo
    }

    pub fn insert(&self, product: Product) -> i32 {
        let id = self.id_counter.fetch_add(1, Ordering::SeqCst);
        self.products.insert(id, product);
        id
    }
}

impl Default for InMemoryProductRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn get_featured_products(&self) -> DomainResult<Vec<Product>> {
        let mut featured: Vec<(i32, Product)> = self
            .products
            .iter()
            .filter(|entry| entry.value().is_featured)
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        featured.sort_by_key(|(id, _)| *id);
        Ok(featured.into_iter().map(|(_, product)| product).collect())
    }
}

#[async_trait]
impl ProductCatalog for InMemoryProductRepository {
    async fn add_product(&self, product: NewProduct) -> DomainResult<i32> {
        Ok(self.insert(Product::new(
            product.name,
            product.unit_price,
            product.is_featured,
        )))
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(self.products.len() as u64)
    }
}
