//! Category controller.

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
use catalog_core::{CatalogError, CategoryId};
use catalog_service::{CreateCategoryRequest, CreateCategoryResponse, CategoryDetailResponse, UpdateCategoryRequest};
use tracing::debug;

const NOT_FOUND: &str = "Category not found";

/// Creates the category router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create-category", post(create_category))
        .route("/category/:id", get(get_category).delete(delete_category))
        .route("/update-category/:id", put(update_category))
}

fn parse_category_id(raw: &str) -> Result<CategoryId, AppError> {
    CategoryId::parse(raw).ok_or(AppError::BadRequest("Invalid category ID"))
}

/// Create a category. `parentId` is optional.
#[utoipa::path(
    post,
    path = "/api/v1/create-category",
    tag = "categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 200, description = "Category created", body = CreateCategoryResponse),
        (status = 400, description = "Invalid request body or validation error"),
        (status = 401, description = "Missing or invalid credentials"),
        (status = 500, description = "Internal server error")
    ),
    security(("basic_auth" = []))
)]
pub async fn create_category(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateCategoryRequest>,
) -> ApiResult<CreateCategoryResponse> {
    let id = state.category_service.create_category(request).await?;
    Ok(ApiResponse::ok("Category created successfully", CreateCategoryResponse::from(id)))
}

#[utoipa::path(
    get,
    path = "/api/v1/category/{id}",
    tag = "categories",
    params(("id" = i64, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category detail, or `data: null` with \"Category not found\"", body = CategoryDetailResponse),
        (status = 400, description = "Invalid category ID"),
        (status = 401, description = "Missing or invalid credentials"),
        (status = 500, description = "Internal server error")
    ),
    security(("basic_auth" = []))
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<CategoryDetailResponse> {
    let id = parse_category_id(&id)?;

    match state.category_service.get_category_detail(id).await? {
        Some(detail) => Ok(ApiResponse::ok("", detail)),
        None => Ok(ApiResponse::message(NOT_FOUND)),
    }
}

/// Replace a category. An absent `parentId` clears the parent.
#[utoipa::path(
    put,
    path = "/api/v1/update-category/{id}",
    tag = "categories",
    params(("id" = i64, Path, description = "Category ID")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated, or `success: false` with \"Category not found\""),
        (status = 400, description = "Invalid category ID, body or field values"),
        (status = 401, description = "Missing or invalid credentials"),
        (status = 500, description = "Internal server error")
    ),
    security(("basic_auth" = []))
)]
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateCategoryRequest>,
) -> ApiResult<()> {
    let id = parse_category_id(&id)?;
    debug!("Update category request: {}", id);

    match state.category_service.update_category(id, request).await {
        Ok(()) => Ok(ApiResponse::message("Category updated successfully")),
        Err(CatalogError::NotFound { .. }) => Ok(ApiResponse::failure(StatusCode::OK, NOT_FOUND)),
        Err(e) => Err(e.into()),
    }
}

/// Delete a category.
#[utoipa::path(
    delete,
    path = "/api/v1/category/{id}",
    tag = "categories",
    params(("id" = i64, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category deleted, or `success: false` with \"Category not found\""),
        (status = 400, description = "Invalid category ID"),
        (status = 401, description = "Missing or invalid credentials"),
        (status = 500, description = "Internal server error")
    ),
    security(("basic_auth" = []))
)]
pub async fn delete_category(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    let id = parse_category_id(&id)?;

    match state.category_service.delete_category(id).await {
        Ok(()) => Ok(ApiResponse::message("Category deleted successfully")),
        Err(CatalogError::NotFound { .. }) => Ok(ApiResponse::failure(StatusCode::OK, NOT_FOUND)),
        Err(e) => Err(e.into()),
    }
}
