pub mod ports;
pub mod services;

pub use ports::FeaturedProductsProvider;
pub use services::ProductService;
