//! # Catalog Service
//!
//! Business logic for products and categories. Reads go through the cache
//! first (cache-aside); writes persist and then invalidate.

pub mod cache;
pub mod category_service;
pub mod dto;
pub mod r#impl;
pub mod product_service;

pub use cache::*;
pub use category_service::*;
pub use dto::*;
pub use product_service::*;
pub use r#impl::*;
