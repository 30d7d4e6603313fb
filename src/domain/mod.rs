pub mod money;
pub mod product;
pub mod user;

// Re-export commonly used types
pub use money::{Currency, CurrencyConverter, Money};
pub use product::{
    DiscountedProduct, NewProduct, Product, ProductCatalog, ProductRepository,
    PREFERRED_DISCOUNT_FACTOR,
};
pub use user::{AnonymousUser, Customer, UserContext};

pub use crate::support::errors::{DomainError, DomainResult};
