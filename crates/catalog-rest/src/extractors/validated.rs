//! Validated JSON extractor.
//!
//! Deserializes the body and runs the shared [`RequestValidator`]. A body that
//! is not valid JSON for the target type is rejected with "Invalid request
//! body"; constraint violations come back as a list of field errors.

use crate::responses::AppError;
use axum::{
    async_trait,
    extract::{FromRef, FromRequest, Request},
    Json,
};
use catalog_core::{FieldNames, RequestValidator};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;
use validator::Validate;

/// JSON extractor that validates the deserialized value.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T> std::ops::Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + FieldNames,
    S: Send + Sync,
    Arc<RequestValidator>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            debug!("Rejected request body: {}", rejection);
            AppError::BadRequest("Invalid request body")
        })?;

        let validator = Arc::<RequestValidator>::from_ref(state);
        validator.validate(&value).map_err(AppError::Validation)?;

        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, response::IntoResponse, routing::post, Router};
    use catalog_service::CreateProductRequest;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route(
                "/",
                post(|ValidatedJson(request): ValidatedJson<CreateProductRequest>| async move {
                    request.name.unwrap_or_default()
                }),
            )
            .with_state(Arc::new(RequestValidator::new()))
    }

    async fn send(body: &str) -> (StatusCode, serde_json::Value) {
        let response = app()
            .oneshot(
                axum::http::Request::post("/")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
            .into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null))
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let (status, body) = send("{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid request body");
    }

    #[tokio::test]
    async fn test_wrong_type_is_invalid_body() {
        let (status, body) = send(r#"{"price":"cheap"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid request body");
    }

    #[tokio::test]
    async fn test_validation_failure_lists_every_field() {
        let (status, body) = send(r#"{"name":"Widget"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Validation error");
        assert_eq!(body["data"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_violations_name_json_fields() {
        let (_, body) = send(r#"{"name":"Widget","description":"d","price":9.99,"stock":5,"categoryId":0}"#).await;
        assert_eq!(body["data"][0]["field"], "categoryId");
    }

    #[tokio::test]
    async fn test_valid_body_reaches_handler() {
        let (status, _) = send(r#"{"name":"Widget","description":"d","price":9.99,"stock":5,"categoryId":1}"#).await;
        assert_eq!(status, StatusCode::OK);
    }
}
