//! JSON body extractor with field validation
//!
//! Malformed or mistyped JSON is a 400; a well-formed body that fails its
//! `validator` rules is a 422 listing the offending fields.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::Validate;

use super::ApiResponse;

pub struct ValidatedJson<T>(pub T);

pub enum ValidatedJsonRejection {
    Json(JsonRejection),
    Invalid(validator::ValidationErrors),
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Json(rejection) => {
                let body = ApiResponse::<()>::error(format!("Invalid JSON: {}", rejection.body_text()));
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            Self::Invalid(errors) => {
                let mut fields: Vec<String> = errors
                    .field_errors()
                    .iter()
                    .flat_map(|(field, errs)| {
                        errs.iter().map(move |e| match &e.message {
                            Some(m) => format!("{field}: {m}"),
                            None => format!("{field}: {}", e.code),
                        })
                    })
                    .collect();
                fields.sort();

                let message = if fields.is_empty() {
                    "Validation failed".to_string()
                } else {
                    fields.join("; ")
                };
                let body = ApiResponse::<()>::error(message);
                (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
            }
        }
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::Json)?;
        value.validate().map_err(ValidatedJsonRejection::Invalid)?;
        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::post;
    use axum::Router;
    use serde::Deserialize;
    use tower::ServiceExt;

    use crate::interfaces::http::common::StatusRequest;

    #[derive(Debug, Deserialize, Validate)]
    struct Contact {
        #[validate(length(min = 1, message = "must not be empty"))]
        name: String,
        #[validate(email(message = "invalid email"))]
        email_id: String,
    }

    async fn contact(ValidatedJson(_body): ValidatedJson<Contact>) -> &'static str {
        "ok"
    }

    async fn status(ValidatedJson(body): ValidatedJson<StatusRequest>) -> String {
        body.status.to_string()
    }

    fn app() -> Router {
        Router::new()
            .route("/contact", post(contact))
            .route("/status", post(status))
    }

    async fn post_json(uri: &str, body: &str) -> (StatusCode, String) {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn valid_body_passes() {
        let (status, _) = post_json("/contact", r#"{"name":"Acme","email_id":"ops@acme.test"}"#).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn garbage_is_bad_request() {
        let (status, body) = post_json("/contact", "not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("\"success\":false"));
    }

    #[tokio::test]
    async fn status_must_be_a_real_bool() {
        for loose in [r#"{"status":"true"}"#, r#"{"status":1}"#, r#"{}"#] {
            let (status, _) = post_json("/status", loose).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "accepted {loose}");
        }
        let (status, body) = post_json("/status", r#"{"status":false}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "false");
    }

    #[tokio::test]
    async fn rule_failures_are_unprocessable() {
        let (status, body) = post_json("/contact", r#"{"name":"","email_id":"nope"}"#).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.contains("email_id: invalid email"));
        assert!(body.contains("name: must not be empty"));
    }
}
