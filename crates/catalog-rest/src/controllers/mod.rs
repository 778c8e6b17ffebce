//! Route handlers.

pub mod category_controller;
pub mod health_controller;
pub mod product_controller;
