//! Hand wiring: leaves are built by the caller and passed upward

use std::sync::Arc;

use super::AppServices;
use crate::application::ProductService;
use crate::domain::{CurrencyConverter, ProductRepository};

pub fn build(
    products_repository: Arc<dyn ProductRepository>,
    converter: Arc<dyn CurrencyConverter>,
) -> AppServices {
    let product_service = ProductService::new(products_repository, converter);
    AppServices {
        products: Arc::new(product_service),
    }
}
