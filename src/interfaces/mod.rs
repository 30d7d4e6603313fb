//! Delivery interfaces

pub mod http;
