//! # Catalog Repository
//!
//! Data access for products and categories.
//!
//! ```text
//! Service
//!   ↓  Arc<dyn ProductRepository> / Arc<dyn CategoryRepository>
//! MySqlProductRepository / MySqlCategoryRepository   (sqlx::QueryBuilder)
//!   ↓  Arc<dyn DatabasePoolInterface>
//! MySQL
//! ```

pub mod mysql;
pub mod pool;
pub mod traits;

pub use mysql::*;
pub use pool::*;
pub use traits::*;
