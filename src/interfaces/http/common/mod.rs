//! Shared HTTP types: response envelope, error mapping, extractors

pub mod validated_json;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Audit, DomainError, UpdateOutcome};

pub use validated_json::{ValidatedJson, ValidatedJsonRejection};

/// Standard API envelope
///
/// Success: `{"success": true, "data": {...}}`.
/// Failure: `{"success": false, "data": null, "error": "message"}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::success(data)))
}

/// A domain error on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        Self(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            DomainError::Validation(_) | DomainError::MissingFields(_) => StatusCode::BAD_REQUEST,
            DomainError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
            DomainError::NotFound { .. } | DomainError::PartialNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            DomainError::Conflict(_) => StatusCode::CONFLICT,
            DomainError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            DomainError::ScopeNotFound { .. }
            | DomainError::Storage(_)
            | DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            error!(error = %self.0, "request failed");
            match status {
                StatusCode::SERVICE_UNAVAILABLE => "Service temporarily unavailable".to_string(),
                _ => "Internal server error".to_string(),
            }
        } else {
            self.0.to_string()
        };
        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

/// Audit columns every record carries.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuditDto {
    pub status: bool,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub modified_by: Option<String>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl From<Audit> for AuditDto {
    fn from(a: Audit) -> Self {
        Self {
            status: a.status,
            created_by: a.created_by,
            created_at: a.created_at,
            modified_by: a.modified_by,
            modified_at: a.modified_at,
        }
    }
}

/// `?active_only=true` restricts a listing to `status = true` rows.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    #[serde(default)]
    pub active_only: bool,
}

/// Soft-delete toggle. `status` must be a JSON boolean.
#[derive(Debug, Deserialize, ToSchema, validator::Validate)]
pub struct StatusRequest {
    pub status: bool,
}

/// Result of an update: the stored row and whether anything changed.
#[derive(Debug, Serialize, ToSchema)]
pub struct Updated<T> {
    pub modified: bool,
    pub record: T,
}

impl<T> Updated<T> {
    pub fn from_outcome<R>(outcome: UpdateOutcome<R>) -> Self
    where
        T: From<R>,
    {
        let modified = !outcome.is_noop();
        Self {
            modified,
            record: T::from(outcome.into_inner()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_statuses_follow_taxonomy() {
        let cases = [
            (DomainError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (DomainError::MissingFields(vec!["email_id"]), StatusCode::BAD_REQUEST),
            (DomainError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (DomainError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (DomainError::not_found("client", "client_id", 9), StatusCode::NOT_FOUND),
            (DomainError::Conflict("x".into()), StatusCode::CONFLICT),
            (
                DomainError::ScopeNotFound { level: "client", id: "9".into() },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (DomainError::StoreUnavailable("down".into()), StatusCode::SERVICE_UNAVAILABLE),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError(err).status(), status);
        }
    }

    #[tokio::test]
    async fn server_errors_hide_details() {
        let resp = ApiError(DomainError::Storage("disk I/O error at /var/db".into())).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Internal server error");
    }
}
