//! REST handlers for the item API.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use tracing::error;

use crate::error::{ListError, Result};
use crate::service::ListService;
use crate::types::Item;

/// Error response wrapper.
///
/// Renders `{"error": "..."}` with the status from [`ListError::status_code`].
/// 5xx details are logged and replaced by a generic message.
#[derive(Debug)]
pub struct ApiError(pub ListError);

impl From<ListError> for ApiError {
    fn from(e: ListError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let message = if self.0.is_internal() {
            error!(error = %self.0, "request failed");
            "internal server error".to_string()
        } else {
            self.0.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Bodies are read raw so malformed JSON surfaces as a validation error.
fn parse_body(body: &Bytes) -> Result<Value> {
    serde_json::from_slice(body)
        .map_err(|e| ListError::Validation(format!("invalid JSON body: {}", e)))
}

/// `GET /api/items`
pub async fn list_items(State(service): State<ListService>) -> Json<Vec<Item>> {
    Json(service.list())
}

/// `POST /api/items`
pub async fn create_item(
    State(service): State<ListService>,
    body: Bytes,
) -> std::result::Result<Json<Item>, ApiError> {
    let body = parse_body(&body)?;
    Ok(Json(service.create(&body)?))
}

/// `PATCH /api/items/{id}`
pub async fn update_item(
    State(service): State<ListService>,
    Path(id): Path<String>,
    body: Bytes,
) -> std::result::Result<Json<Item>, ApiError> {
    let body = parse_body(&body)?;
    Ok(Json(service.update(&id, &body)?))
}

/// `DELETE /api/items/{id}`
pub async fn delete_item(
    State(service): State<ListService>,
    Path(id): Path<String>,
) -> std::result::Result<StatusCode, ApiError> {
    service.delete(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /api/items`
pub async fn delete_all_items(State(service): State<ListService>) -> StatusCode {
    service.delete_all();
    StatusCode::NO_CONTENT
}

/// `GET /health`
pub async fn health(State(service): State<ListService>) -> Json<Value> {
    let stats = service.stats();
    Json(json!({
        "status": "ok",
        "items": stats.items,
        "next_id": stats.next_id,
        "subscribers": service.subscriptions().open_count(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ItemId;

    #[test]
    fn test_parse_body_rejects_garbage() {
        let result = parse_body(&Bytes::from_static(b"{not json"));
        assert!(matches!(result, Err(ListError::Validation(_))));

        let result = parse_body(&Bytes::new());
        assert!(matches!(result, Err(ListError::Validation(_))));
    }

    #[test]
    fn test_error_status() {
        let response = ApiError(ListError::NotFound(ItemId(4))).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = ApiError(ListError::InvalidId("x".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError(ListError::Internal("secret".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
