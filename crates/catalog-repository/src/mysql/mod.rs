//! MySQL repository implementations.

mod category_repository;
mod product_repository;

pub use category_repository::*;
pub use product_repository::MySqlProductRepository;
