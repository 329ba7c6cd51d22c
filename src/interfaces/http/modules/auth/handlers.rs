//! Namespace login

use std::sync::Arc;

use axum::{extract::State, Extension};

use super::dto::{LoginRequest, LoginResponse};
use crate::application::IdentityService;
use crate::domain::AdminRole;
use crate::interfaces::http::common::{ok, ApiResponse, ApiResult, ValidatedJson};

#[derive(Clone)]
pub struct AuthHandlerState {
    pub identity: Arc<IdentityService>,
}

/// Role name the identity check must see for a namespace; the super-admin
/// login is matched on role id alone.
fn expected_role_name(namespace: AdminRole) -> Option<&'static str> {
    match namespace {
        AdminRole::SuperAdmin => None,
        other => Some(other.name()),
    }
}

#[utoipa::path(
    post,
    path = "/{namespace}/login",
    tag = "Authentication",
    params(("namespace" = String, Path, description = "superadmin, reselleradmin, clientadmin or associationadmin")),
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Caller's tenant row is missing")
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    Extension(namespace): Extension<AdminRole>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let session = state
        .identity
        .login(&request.email_id, &request.password, expected_role_name(namespace))
        .await?;
    ok(LoginResponse::from(session))
}
