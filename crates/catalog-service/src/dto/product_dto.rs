//! Product DTOs.

use catalog_core::{
    CatalogError, CatalogResult, CategoryId, FieldNames, NewProduct, Product, ProductChanges, ProductId,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request to create a product. Every field is required.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    #[validate(required, length(min = 1, code = "required"))]
    #[schema(example = "Widget")]
    pub name: Option<String>,

    #[validate(required, length(min = 1, code = "required"))]
    pub description: Option<String>,

    #[validate(required, range(min = 0.01, code = "min"))]
    #[schema(example = 9.99)]
    pub price: Option<f64>,

    #[validate(required, range(min = 0, code = "min"))]
    pub stock: Option<i32>,

    #[serde(rename = "categoryId")]
    #[validate(required, range(min = 1, code = "min"))]
    pub category_id: Option<i64>,
}

impl FieldNames for CreateProductRequest {
    const RENAMED: &'static [(&'static str, &'static str)] = &[("category_id", "categoryId")];
}

impl CreateProductRequest {
    /// Converts a validated request into the persistence model.
    ///
    /// # Errors
    ///
    /// Returns a validation error if a required field is absent, which only
    /// happens when the request skipped validation.
    pub fn into_new_product(self) -> CatalogResult<NewProduct> {
        Ok(NewProduct {
            name: self.name.ok_or_else(|| missing("name"))?,
            description: self.description.ok_or_else(|| missing("description"))?,
            price: self.price.ok_or_else(|| missing("price"))?,
            stock: self.stock.ok_or_else(|| missing("stock"))?,
            category_id: CategoryId::new(self.category_id.ok_or_else(|| missing("categoryId"))?),
        })
    }
}

pub(crate) fn missing(field: &str) -> CatalogError {
    CatalogError::validation(format!("The field {field} is required"))
}

/// Partial product update. Only present fields are written.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, code = "required"))]
    pub name: Option<String>,

    #[validate(length(min = 1, code = "required"))]
    pub description: Option<String>,

    #[validate(range(min = 1.0, code = "min"))]
    pub price: Option<f64>,

    #[validate(range(min = 0, code = "min"))]
    pub stock: Option<i32>,

    #[serde(rename = "categoryId")]
    #[validate(range(min = 1, code = "min"))]
    pub category_id: Option<i64>,
}

impl FieldNames for UpdateProductRequest {
    const RENAMED: &'static [(&'static str, &'static str)] = &[("category_id", "categoryId")];
}

impl From<UpdateProductRequest> for ProductChanges {
    fn from(request: UpdateProductRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
            price: request.price,
            stock: request.stock,
            category_id: request.category_id.map(CategoryId::new),
        }
    }
}

/// Returned after a product is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreateProductResponse {
    #[serde(rename = "productId")]
    pub product_id: i64,
}

impl From<ProductId> for CreateProductResponse {
    fn from(id: ProductId) -> Self {
        Self {
            product_id: id.into_inner(),
        }
    }
}

/// Product detail view. This is also the cached representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductDetailResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(rename = "categoryId")]
    pub category_id: i64,
    pub stock: i32,
}

impl From<Product> for ProductDetailResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id.into_inner(),
            name: product.name,
            description: product.description,
            price: product.price,
            category_id: product.category_id.into_inner(),
            stock: product.stock,
        }
    }
}
