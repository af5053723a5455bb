//! REST admin surface for the duplicate content resolver

pub mod rest;

pub use rest::{create_router, create_router_with_config, ApiState};
