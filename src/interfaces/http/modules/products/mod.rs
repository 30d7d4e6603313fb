pub mod dto;
pub mod handlers;
pub mod template;
pub mod view_models;

pub use dto::{FeaturedProductsResponse, ProductResponse};
pub use handlers::{index, list_featured_products, ProductsState};
pub use view_models::{FeaturedProductsViewModel, ProductViewModel};
