//! Domain entities for the catalog.

pub mod category;
pub mod product;

pub use category::*;
pub use product::*;
