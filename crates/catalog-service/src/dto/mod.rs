//! Data Transfer Objects (DTOs).
//!
//! Request bodies carry `validator` constraints; JSON names are camelCase.

mod category_dto;
mod product_dto;

pub use category_dto::*;
pub use product_dto::*;
