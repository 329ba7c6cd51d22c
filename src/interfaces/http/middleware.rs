//! Bearer-token authentication for the admin namespaces

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::debug;

use crate::application::IdentityService;
use crate::domain::{AdminRole, Caller, DomainError};
use crate::infrastructure::crypto::verify_token;
use crate::interfaces::http::common::{ApiError, ApiResponse};

#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    WrongNamespace,
}

/// Per-namespace middleware state: the identity service that signed the
/// tokens and the one role allowed through.
#[derive(Clone)]
pub struct AuthState {
    pub identity: Arc<IdentityService>,
    pub namespace: AdminRole,
}

fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Verifies the bearer token, re-checks the user behind it and stores the
/// [`Caller`] in the request extensions.
pub async fn auth_middleware(
    State(auth): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(auth_header) = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    else {
        return auth_error_response(AuthError::MissingToken);
    };
    let Some(token) = extract_token(auth_header) else {
        return auth_error_response(AuthError::InvalidToken);
    };

    let claims = match verify_token(token, auth.identity.jwt_config()) {
        Ok(claims) => claims,
        Err(e) => {
            debug!(error = %e, "token rejected");
            return auth_error_response(AuthError::InvalidToken);
        }
    };
    let Some(role) = claims.admin_role() else {
        return auth_error_response(AuthError::InvalidToken);
    };
    if role != auth.namespace {
        return auth_error_response(AuthError::WrongNamespace);
    }
    let caller = match auth.identity.resume(&claims, role).await {
        Ok(caller) => caller,
        Err(
            e @ (DomainError::StoreUnavailable(_) | DomainError::Storage(_) | DomainError::Internal(_)),
        ) => return ApiError(e).into_response(),
        Err(e) => {
            debug!(error = %e, user_id = claims.sub, "token no longer valid");
            return auth_error_response(AuthError::InvalidToken);
        }
    };

    tracing::Span::current().record("user_id", caller.user_id);
    request.extensions_mut().insert(caller);
    next.run(request).await
}

fn auth_error_response(error: AuthError) -> Response {
    let (status, message) = match error {
        AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "Missing authentication token"),
        AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid authentication token"),
        AuthError::WrongNamespace => (StatusCode::FORBIDDEN, "Insufficient permissions"),
    };
    (status, Json(ApiResponse::<()>::error(message))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use axum::{middleware, Extension, Router};
    use tower::ServiceExt;

    use crate::application::admin::testkit::{Kit, TEST_COST};
    use crate::domain::{Ownership, ScopeFilter, User};
    use crate::infrastructure::crypto::{create_token, JwtConfig, TokenClaims};

    fn jwt() -> JwtConfig {
        JwtConfig::new("middleware-test-secret", 1)
    }

    async fn whoami(Extension(caller): Extension<Caller>) -> String {
        format!("{}:{:?}", caller.username, caller.scope.tenant_id())
    }

    fn app(kit: &Kit, namespace: AdminRole) -> Router {
        let state = AuthState {
            identity: Arc::new(IdentityService::new(kit.store.clone(), jwt(), TEST_COST).unwrap()),
            namespace,
        };
        Router::new()
            .route("/me", get(whoami))
            .layer(middleware::from_fn_with_state(state, auth_middleware))
    }

    fn token_for(caller: &Caller, ids: Ownership, secret: &JwtConfig) -> String {
        let claims = TokenClaims::new(caller.user_id, &caller.username, caller.role, ids, &jwt());
        create_token(&claims, secret).unwrap()
    }

    fn bearer(caller: &Caller) -> String {
        format!("Bearer {}", token_for(caller, caller.ownership, &jwt()))
    }

    async fn call(app: Router, auth: Option<String>) -> (StatusCode, String) {
        let mut req = Request::builder().uri("/me");
        if let Some(auth) = auth {
            req = req.header(header::AUTHORIZATION, auth);
        }
        let resp = app.oneshot(req.body(Body::empty()).unwrap()).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn valid_token_yields_caller() {
        let kit = Kit::new().await;
        let (status, body) = call(app(&kit, AdminRole::ClientAdmin), Some(bearer(&kit.client_admin()))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, format!("acme-admin:Some({})", kit.client.client_id));
    }

    #[tokio::test]
    async fn missing_or_forged_token_is_unauthorized() {
        let kit = Kit::new().await;
        let (status, _) = call(app(&kit, AdminRole::ClientAdmin), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let caller = kit.client_admin();
        let forged = token_for(&caller, caller.ownership, &JwtConfig::new("another-secret", 1));
        let (status, _) = call(app(&kit, AdminRole::ClientAdmin), Some(format!("Bearer {forged}"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn other_namespace_is_forbidden() {
        let kit = Kit::new().await;
        let (status, _) = call(app(&kit, AdminRole::ResellerAdmin), Some(bearer(&kit.client_admin()))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn token_without_scope_ids_is_rejected() {
        let kit = Kit::new().await;
        let caller = kit.client_admin();
        let bare = format!("Bearer {}", token_for(&caller, Ownership::default(), &jwt()));
        let (status, _) = call(app(&kit, AdminRole::ClientAdmin), Some(bare)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn deactivated_user_loses_access() {
        let kit = Kit::new().await;
        let caller = kit.client_admin();
        let router = app(&kit, AdminRole::ClientAdmin);
        let (status, _) = call(router.clone(), Some(bearer(&caller))).await;
        assert_eq!(status, StatusCode::OK);

        kit.gateway
            .set_active::<User>(&caller.user_id, false, &ScopeFilter::Global, "root")
            .await
            .unwrap();
        let (status, _) = call(router, Some(bearer(&caller))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
