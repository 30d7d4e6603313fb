//! JSON shapes for the featured products API

use serde::Serialize;
use utoipa::ToSchema;

use super::view_models::{FeaturedProductsViewModel, ProductViewModel};

/// Product priced for the requesting customer
#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    pub name: String,
    /// Amount with two fractional digits, e.g. "9.50"
    pub unit_price: String,
    /// ISO 4217 code
    pub currency: String,
    /// "<name> <amount><currency>"
    pub summary_text: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FeaturedProductsResponse {
    pub products: Vec<ProductResponse>,
}

impl From<&ProductViewModel> for ProductResponse {
    fn from(vm: &ProductViewModel) -> Self {
        Self {
            name: vm.name.clone(),
            unit_price: format!("{:.2}", vm.unit_price.rounded_amount()),
            currency: vm.unit_price.currency().code().to_string(),
            summary_text: vm.summary_text(),
        }
    }
}

impl From<&FeaturedProductsViewModel> for FeaturedProductsResponse {
    fn from(vm: &FeaturedProductsViewModel) -> Self {
        Self {
            products: vm.products.iter().map(ProductResponse::from).collect(),
        }
    }
}
