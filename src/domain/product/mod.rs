//! Product aggregate
//!
//! Contains the Product entity, per-customer pricing and repository ports.

pub mod model;
pub mod repository;

pub use model::{DiscountedProduct, NewProduct, Product, PREFERRED_DISCOUNT_FACTOR};
pub use repository::{ProductCatalog, ProductRepository};
