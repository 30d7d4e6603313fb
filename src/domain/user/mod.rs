//! User aggregate

pub mod model;

pub use model::{AnonymousUser, Customer, UserContext};
