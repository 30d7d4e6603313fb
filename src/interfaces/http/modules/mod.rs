pub mod health;
pub mod products;
pub mod request_id;
