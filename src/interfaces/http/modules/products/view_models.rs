//! Display shapes for the featured products page

use crate::domain::{DiscountedProduct, Money};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductViewModel {
    pub name: String,
    pub unit_price: Money,
}

impl ProductViewModel {
    pub fn summary_text(&self) -> String {
        format!("{} {}", self.name, self.unit_price)
    }
}

impl From<DiscountedProduct> for ProductViewModel {
    fn from(product: DiscountedProduct) -> Self {
        Self {
            name: product.name,
            unit_price: product.unit_price,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeaturedProductsViewModel {
    pub products: Vec<ProductViewModel>,
}

impl From<Vec<DiscountedProduct>> for FeaturedProductsViewModel {
    fn from(products: Vec<DiscountedProduct>) -> Self {
        Self {
            products: products.into_iter().map(ProductViewModel::from).collect(),
        }
    }
}
