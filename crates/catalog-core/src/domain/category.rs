//! Category entity.

use crate::CategoryId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted category.
///
/// Categories form a tree through `parent_id`. No cycle detection is done.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub parent_id: Option<CategoryId>,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Attributes of a category that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
    pub parent_id: Option<CategoryId>,
    pub description: String,
}

/// A full category update. Every column is replaced, including a `None` parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryChanges {
    pub name: String,
    pub parent_id: Option<CategoryId>,
    pub description: String,
}

impl CategoryChanges {
    /// Writes the new values into `category`.
    pub fn apply_to(&self, category: &mut Category) {
        category.name.clone_from(&self.name);
        category.parent_id = self.parent_id;
        category.description.clone_from(&self.description);
        category.updated_at = Utc::now();
    }
}

impl Category {
    /// Materializes a new category with the given identifier.
    #[must_use]
    pub fn from_new(id: CategoryId, new: NewCategory) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: new.name,
            parent_id: new.parent_id,
            description: new.description,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns true for top-level categories.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_clears_parent() {
        let mut category = Category::from_new(
            CategoryId::new(2),
            NewCategory {
                name: "Tools".to_string(),
                parent_id: Some(CategoryId::new(1)),
                description: "Hand tools".to_string(),
            },
        );
        assert!(!category.is_root());

        CategoryChanges {
            name: "Power tools".to_string(),
            parent_id: None,
            description: "Electric".to_string(),
        }
        .apply_to(&mut category);

        assert!(category.is_root());
        assert_eq!(category.name, "Power tools");
    }
}
