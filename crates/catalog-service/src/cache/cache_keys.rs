//! Cache key generators.
//!
//! Keys are `"<entity>:<id>"`; the matching patterns cover every entry of one
//! entity type.

use catalog_core::{CategoryId, ProductId};

/// Pattern matching every cached product.
pub const PRODUCT_PATTERN: &str = "product:*";

/// Pattern matching every cached category.
pub const CATEGORY_PATTERN: &str = "category:*";

/// Cache key for a product detail.
#[must_use]
pub fn product(id: ProductId) -> String {
    format!("product:{id}")
}

/// Cache key for a category detail.
#[must_use]
pub fn category(id: CategoryId) -> String {
    format!("category:{id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys() {
        assert_eq!(product(ProductId::new(7)), "product:7");
        assert_eq!(category(CategoryId::new(3)), "category:3");
    }

    #[test]
    fn test_patterns_cover_keys() {
        let prefix = PRODUCT_PATTERN.trim_end_matches('*');
        assert!(product(ProductId::new(1)).starts_with(prefix));
        let prefix = CATEGORY_PATTERN.trim_end_matches('*');
        assert!(category(CategoryId::new(1)).starts_with(prefix));
    }
}
