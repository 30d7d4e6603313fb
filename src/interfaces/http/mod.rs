//! HTTP delivery
//!
//! - `middleware`: customer context from forwarded identity headers
//! - `modules`: products page and JSON, health, request id
//! - `router`: route table and OpenAPI document

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::{create_router, ApiDoc, HttpState};
