//! Category DTOs.

use super::product_dto::missing;
use catalog_core::{CatalogResult, Category, CategoryChanges, CategoryId, FieldNames, NewCategory};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request to create a category.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryRequest {
    #[validate(required, length(min = 1, code = "required"))]
    #[schema(example = "Tools")]
    pub name: Option<String>,

    #[serde(rename = "parentId")]
    #[validate(range(min = 1, code = "min"))]
    pub parent_id: Option<i64>,

    #[validate(required, length(min = 1, code = "required"))]
    pub description: Option<String>,
}

/// Request to replace a category. An absent `parentId` clears the parent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateCategoryRequest {
    #[validate(required, length(min = 1, code = "required"))]
    pub name: Option<String>,

    #[serde(rename = "parentId")]
    #[validate(range(min = 1, code = "min"))]
    pub parent_id: Option<i64>,

    #[validate(required, length(min = 1, code = "required"))]
    pub description: Option<String>,
}

const CATEGORY_RENAMES: &[(&str, &str)] = &[("parent_id", "parentId")];

impl FieldNames for CreateCategoryRequest {
    const RENAMED: &'static [(&'static str, &'static str)] = CATEGORY_RENAMES;
}

impl FieldNames for UpdateCategoryRequest {
    const RENAMED: &'static [(&'static str, &'static str)] = CATEGORY_RENAMES;
}

impl CreateCategoryRequest {
    /// Converts a validated request into the persistence model.
    ///
    /// # Errors
    ///
    /// Returns a validation error if a required field is absent.
    pub fn into_new_category(self) -> CatalogResult<NewCategory> {
        Ok(NewCategory {
            name: self.name.ok_or_else(|| missing("name"))?,
            parent_id: self.parent_id.map(CategoryId::new),
            description: self.description.ok_or_else(|| missing("description"))?,
        })
    }
}

impl UpdateCategoryRequest {
    /// Converts a validated request into a full replacement.
    ///
    /// # Errors
    ///
    /// Returns a validation error if a required field is absent.
    pub fn into_changes(self) -> CatalogResult<CategoryChanges> {
        Ok(CategoryChanges {
            name: self.name.ok_or_else(|| missing("name"))?,
            parent_id: self.parent_id.map(CategoryId::new),
            description: self.description.ok_or_else(|| missing("description"))?,
        })
    }
}

/// Returned after a category is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreateCategoryResponse {
    #[serde(rename = "categoryId")]
    pub category_id: i64,
}

impl From<CategoryId> for CreateCategoryResponse {
    fn from(id: CategoryId) -> Self {
        Self {
            category_id: id.into_inner(),
        }
    }
}

/// Category detail view. This is also the cached representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategoryDetailResponse {
    pub id: i64,
    pub name: String,
    #[serde(rename = "parentId")]
    pub parent_id: Option<i64>,
    pub description: String,
}

impl From<Category> for CategoryDetailResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id.into_inner(),
            name: category.name,
            parent_id: category.parent_id.map(CategoryId::into_inner),
            description: category.description,
        }
    }
}
