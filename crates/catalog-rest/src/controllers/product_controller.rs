//! Product controller.

use crate::{
    extractors::ValidatedJson,
    responses::{ApiResponse, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Router,
};
use catalog_core::{CatalogError, ProductId};
use catalog_service::{CreateProductRequest, CreateProductResponse, ProductDetailResponse, UpdateProductRequest};
use tracing::debug;

const NOT_FOUND: &str = "Product not found";

/// Creates the product router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create-product", post(create_product))
        .route("/product/:id", get(get_product).delete(delete_product))
        .route("/update-product/:id", put(update_product))
}

fn parse_product_id(raw: &str) -> Result<ProductId, AppError> {
    ProductId::parse(raw).ok_or(AppError::BadRequest("Invalid product ID"))
}

/// Create a product.
#[utoipa::path(
    post,
    path = "/api/v1/create-product",
    tag = "products",
    request_body = CreateProductRequest,
    responses(
        (status = 200, description = "Product created", body = CreateProductResponse),
        (status = 400, description = "Invalid request body or validation error"),
        (status = 401, description = "Missing or invalid credentials"),
        (status = 500, description = "Internal server error")
    ),
    security(("basic_auth" = []))
)]
pub async fn create_product(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateProductRequest>,
) -> ApiResult<CreateProductResponse> {
    let id = state.product_service.create_product(request).await?;
    Ok(ApiResponse::ok("Product created successfully", CreateProductResponse::from(id)))
}

/// Get a product by ID.
#[utoipa::path(
    get,
    path = "/api/v1/product/{id}",
    tag = "products",
    params(("id" = i64, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product detail, or `data: null` with \"Product not found\"", body = ProductDetailResponse),
        (status = 400, description = "Invalid product ID"),
        (status = 401, description = "Missing or invalid credentials"),
        (status = 500, description = "Internal server error")
    ),
    security(("basic_auth" = []))
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ProductDetailResponse> {
    let id = parse_product_id(&id)?;

    match state.product_service.get_product_detail(id).await? {
        Some(detail) => Ok(ApiResponse::ok("", detail)),
        None => Ok(ApiResponse::message(NOT_FOUND)),
    }
}

/// Update the fields present in the body.
#[utoipa::path(
    put,
    path = "/api/v1/update-product/{id}",
    tag = "products",
    params(("id" = i64, Path, description = "Product ID")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated, or `success: false` with \"Product not found\""),
        (status = 400, description = "Invalid product ID, body or field values"),
        (status = 401, description = "Missing or invalid credentials"),
        (status = 500, description = "Internal server error")
    ),
    security(("basic_auth" = []))
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateProductRequest>,
) -> ApiResult<()> {
    let id = parse_product_id(&id)?;
    debug!("Update product request: {}", id);

    match state.product_service.update_product(id, request).await {
        Ok(()) => Ok(ApiResponse::message("Product updated successfully")),
        Err(CatalogError::NotFound { .. }) => Ok(ApiResponse::failure(StatusCode::OK, NOT_FOUND)),
        Err(e) => Err(e.into()),
    }
}

/// Delete a product.
#[utoipa::path(
    delete,
    path = "/api/v1/product/{id}",
    tag = "products",
    params(("id" = i64, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product deleted, or `success: false` with \"Product not found\""),
        (status = 400, description = "Invalid product ID"),
        (status = 401, description = "Missing or invalid credentials"),
        (status = 500, description = "Internal server error")
    ),
    security(("basic_auth" = []))
)]
pub async fn delete_product(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    let id = parse_product_id(&id)?;
    debug!("Delete product request: {}", id);

    match state.product_service.delete_product(id).await {
        Ok(()) => Ok(ApiResponse::message("Product deleted successfully")),
        Err(CatalogError::NotFound { .. }) => Ok(ApiResponse::failure(StatusCode::OK, NOT_FOUND)),
        Err(e) => Err(e.into()),
    }
}
