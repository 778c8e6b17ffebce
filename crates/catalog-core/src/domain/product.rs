//! Product entity.

use crate::{CategoryId, ProductId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Database-assigned identifier.
    pub id: ProductId,

    /// Product name.
    pub name: String,

    /// Free-form description.
    pub description: String,

    /// Unit price, always positive.
    pub price: f64,

    /// Units in stock, never negative.
    pub stock: i32,

    /// Owning category. Informational only; no referential check is made.
    pub category_id: CategoryId,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Attributes of a product that has not been persisted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: i32,
    pub category_id: CategoryId,
}

/// A partial product update. Only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i32>,
    pub category_id: Option<CategoryId>,
}

impl ProductChanges {
    /// Returns true when no field would be written.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.stock.is_none()
            && self.category_id.is_none()
    }

    /// Applies the present fields to `product`, bumping `updated_at`.
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name.clone_from(name);
        }
        if let Some(description) = &self.description {
            product.description.clone_from(description);
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        if let Some(category_id) = self.category_id {
            product.category_id = category_id;
        }
        product.updated_at = Utc::now();
    }
}

impl Product {
    /// Materializes a new product with the given identifier.
    #[must_use]
    pub fn from_new(id: ProductId, new: NewProduct) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: new.name,
            description: new.description,
            price: new.price,
            stock: new.stock,
            category_id: new.category_id,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> Product {
        Product::from_new(
            ProductId::new(1),
            NewProduct {
                name: "Widget".to_string(),
                description: "A widget".to_string(),
                price: 9.99,
                stock: 5,
                category_id: CategoryId::new(1),
            },
        )
    }

    #[test]
    fn test_empty_changes() {
        assert!(ProductChanges::default().is_empty());
        let changes = ProductChanges {
            stock: Some(0),
            ..Default::default()
        };
        assert!(!changes.is_empty());
    }

    #[test]
    fn test_apply_only_present_fields() {
        let mut product = widget();
        let changes = ProductChanges {
            price: Some(12.99),
            ..Default::default()
        };
        changes.apply_to(&mut product);

        assert!((product.price - 12.99).abs() < f64::EPSILON);
        assert_eq!(product.name, "Widget");
        assert_eq!(product.stock, 5);
    }
}
