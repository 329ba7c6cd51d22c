//! API router with Swagger UI
//!
//! Four admin namespaces (`/superadmin`, `/reselleradmin`, `/clientadmin`,
//! `/associationadmin`), each with a public `POST /login` and a set of
//! bearer-protected routes whose token role must match the namespace.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::FromRef,
    middleware,
    routing::{get, post, put},
    Extension, Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use super::common::{ApiResponse, AuditDto, StatusRequest};
use super::middleware::{auth_middleware, AuthState};
use super::modules::request_id::request_id_middleware;
use super::modules::{auth, chargers, finance, health, metrics, profile, roles, tenants, users};
use crate::application::{AdminServices, IdentityService};
use crate::domain::{AdminRole, RepositoryProvider};

/// Everything the handlers need. Each handler extracts its own slice via
/// `FromRef`.
#[derive(Clone)]
pub struct AppState {
    pub services: AdminServices,
    pub identity: Arc<IdentityService>,
    pub repos: Arc<dyn RepositoryProvider>,
    pub started_at: Instant,
}

impl FromRef<AppState> for AdminServices {
    fn from_ref(s: &AppState) -> Self {
        s.services.clone()
    }
}

impl FromRef<AppState> for auth::AuthHandlerState {
    fn from_ref(s: &AppState) -> Self {
        auth::AuthHandlerState {
            identity: Arc::clone(&s.identity),
        }
    }
}

impl FromRef<AppState> for health::HealthState {
    fn from_ref(s: &AppState) -> Self {
        health::HealthState {
            repos: Arc::clone(&s.repos),
            started_at: s.started_at,
        }
    }
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token from the namespace's /login"))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        roles::list_roles,
        roles::create_role,
        roles::set_role_status,
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::set_user_status,
        users::assignable_roles,
        users::wallet,
        profile::get_profile,
        profile::update_profile,
        profile::update_own_tenant,
        tenants::list_resellers,
        tenants::create_reseller,
        tenants::update_reseller,
        tenants::set_reseller_status,
        tenants::list_clients,
        tenants::create_client,
        tenants::update_client,
        tenants::set_client_status,
        tenants::client_associations,
        tenants::list_associations,
        tenants::create_association,
        tenants::update_association,
        tenants::set_association_status,
        chargers::list_chargers,
        chargers::list_unallocated,
        chargers::list_allocated,
        chargers::get_charger,
        chargers::client_sessions,
        chargers::create_charger,
        chargers::update_charger,
        chargers::update_device,
        chargers::set_charger_status,
        chargers::assign_chargers,
        finance::list_finance,
        finance::create_finance,
        finance::update_finance,
        finance::set_finance_status,
    ),
    components(
        schemas(
            ApiResponse<String>,
            AuditDto,
            StatusRequest,
            auth::LoginRequest,
            auth::LoginResponse,
            auth::LoginUser,
            roles::RoleDto,
            roles::CreateRoleRequest,
            users::UserDto,
            users::CreateUserRequest,
            users::UpdateUserRequest,
            users::WalletDto,
            profile::ProfileDto,
            profile::TenantDto,
            profile::UpdateProfileRequest,
            tenants::ResellerDto,
            tenants::ClientDto,
            tenants::AssociationDto,
            tenants::CreateTenantRequest,
            tenants::UpdateTenantRequest,
            chargers::ChargerDto,
            chargers::AllocatedChargerDto,
            chargers::CreateChargerRequest,
            chargers::UpdateChargerRequest,
            chargers::UpdateDeviceRequest,
            chargers::AssignChargersRequest,
            chargers::AssignmentDto,
            chargers::SessionDto,
            chargers::ChargerSessionsDto,
            finance::FinanceDto,
            finance::CreateFinanceRequest,
            finance::UpdateFinanceRequest,
            health::HealthResponse,
            health::ComponentHealth,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness check"),
        (name = "Authentication", description = "Per-namespace login issuing a scoped JWT"),
        (name = "Roles", description = "Role reference data"),
        (name = "Users", description = "Admin and end-user accounts inside the caller's scope"),
        (name = "Profile", description = "The caller's own account and tenant node"),
        (name = "Resellers", description = "Top-level tenants"),
        (name = "Clients", description = "Tenants under a reseller"),
        (name = "Associations", description = "Sites under a client"),
        (name = "Chargers", description = "Charger inventory and assignment down the hierarchy"),
        (name = "Finance", description = "Tariff rows of associations"),
    ),
    info(
        title = "CMS Admin API",
        version = "0.1.0",
        description = "Multi-tenant charging-station administration"
    )
)]
pub struct ApiDoc;

// ── Namespace routers ───────────────────────────────────────────

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/{id}", get(users::get_user).put(users::update_user))
        .route("/users/{id}/status", put(users::set_user_status))
        .route("/roles/assignable", get(users::assignable_roles))
        .route(
            "/profile",
            get(profile::get_profile).put(profile::update_profile),
        )
}

/// Listing and hand-down routes shared by every level that assigns chargers.
fn allocation_routes() -> Router<AppState> {
    Router::new()
        .route("/chargers", get(chargers::list_chargers))
        .route("/chargers/unallocated", get(chargers::list_unallocated))
        .route("/chargers/allocated", get(chargers::list_allocated))
        .route("/chargers/assign", post(chargers::assign_chargers))
        .route("/chargers/{id}", get(chargers::get_charger))
        .route("/chargers/{id}/status", put(chargers::set_charger_status))
}

fn superadmin_routes() -> Router<AppState> {
    Router::new()
        .route("/roles", get(roles::list_roles).post(roles::create_role))
        .route("/roles/{id}/status", put(roles::set_role_status))
        .route(
            "/resellers",
            get(tenants::list_resellers).post(tenants::create_reseller),
        )
        .route("/resellers/{id}", put(tenants::update_reseller))
        .route("/resellers/{id}/status", put(tenants::set_reseller_status))
        .route("/chargers", get(chargers::list_chargers).post(chargers::create_charger))
        .route("/chargers/unallocated", get(chargers::list_unallocated))
        .route("/chargers/allocated", get(chargers::list_allocated))
        .route("/chargers/assign", post(chargers::assign_chargers))
        .route(
            "/chargers/{id}",
            get(chargers::get_charger).put(chargers::update_charger),
        )
        .route("/chargers/{id}/status", put(chargers::set_charger_status))
        .merge(user_routes())
}

fn reselleradmin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/clients",
            get(tenants::list_clients).post(tenants::create_client),
        )
        .route("/clients/{id}", put(tenants::update_client))
        .route("/clients/{id}/status", put(tenants::set_client_status))
        .route("/clients/{id}/associations", get(tenants::client_associations))
        .route("/clients/{id}/sessions", get(chargers::client_sessions))
        .route("/wallet", get(users::wallet))
        .route("/profile/tenant", put(profile::update_own_tenant))
        .merge(allocation_routes())
        .merge(user_routes())
}

fn clientadmin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/associations",
            get(tenants::list_associations).post(tenants::create_association),
        )
        .route("/associations/{id}", put(tenants::update_association))
        .route(
            "/associations/{id}/status",
            put(tenants::set_association_status),
        )
        .route(
            "/finance",
            get(finance::list_finance).post(finance::create_finance),
        )
        .route("/finance/{id}", put(finance::update_finance))
        .route("/finance/{id}/status", put(finance::set_finance_status))
        .route("/profile/tenant", put(profile::update_own_tenant))
        .merge(allocation_routes())
        .merge(user_routes())
}

fn associationadmin_routes() -> Router<AppState> {
    Router::new()
        .route("/chargers", get(chargers::list_chargers))
        .route("/chargers/{id}", get(chargers::get_charger))
        .route("/chargers/{id}/device", put(chargers::update_device))
        .route("/chargers/{id}/status", put(chargers::set_charger_status))
        .route("/finance", get(finance::list_finance))
        .route("/wallet", get(users::wallet))
        .route("/profile/tenant", put(profile::update_own_tenant))
        .merge(user_routes())
}

/// Public login plus `protected` behind the namespace's token check.
fn namespace(
    role: AdminRole,
    protected: Router<AppState>,
    identity: &Arc<IdentityService>,
) -> Router<AppState> {
    let auth_state = AuthState {
        identity: Arc::clone(identity),
        namespace: role,
    };
    Router::new()
        .route("/login", post(auth::login))
        .merge(protected.route_layer(middleware::from_fn_with_state(auth_state, auth_middleware)))
        .layer(Extension(role))
}

/// Create the API router with all routes
pub fn create_api_router(
    state: AppState,
    prometheus: Option<PrometheusHandle>,
    request_timeout: Duration,
) -> Router {
    let identity = Arc::clone(&state.identity);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    let mut router = Router::new()
        .route("/health", get(health::health_check))
        .nest(
            "/superadmin",
            namespace(AdminRole::SuperAdmin, superadmin_routes(), &identity),
        )
        .nest(
            "/reselleradmin",
            namespace(AdminRole::ResellerAdmin, reselleradmin_routes(), &identity),
        )
        .nest(
            "/clientadmin",
            namespace(AdminRole::ClientAdmin, clientadmin_routes(), &identity),
        )
        .nest(
            "/associationadmin",
            namespace(AdminRole::AssociationAdmin, associationadmin_routes(), &identity),
        )
        .with_state(state)
        .merge(swagger_routes);

    if let Some(handle) = prometheus {
        let metrics_routes = Router::new()
            .route("/metrics", get(metrics::prometheus_metrics))
            .with_state(metrics::MetricsState { handle });
        router = router.merge(metrics_routes);
    }

    router
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::application::admin::testkit::{Kit, TEST_COST};
    use crate::domain::{ScopeFilter, User};
    use crate::infrastructure::crypto::JwtConfig;

    async fn app() -> (Router, Kit) {
        let kit = Kit::new().await;
        let jwt_config = JwtConfig::new("router-test-secret", 1);
        let state = AppState {
            services: AdminServices::new(kit.gateway.clone(), TEST_COST),
            identity: Arc::new(IdentityService::new(kit.store.clone(), jwt_config, TEST_COST).unwrap()),
            repos: kit.store.clone(),
            started_at: Instant::now(),
        };
        (create_api_router(state, None, Duration::from_secs(5)), kit)
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(v) => {
                req = req.header(header::CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let resp = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn login(app: &Router, ns: &str, email: &str) -> String {
        let (status, body) = send(
            app,
            "POST",
            &format!("/{ns}/login"),
            None,
            Some(json!({"email_id": email, "password": "admin-secret"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["data"]["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let (app, _kit) = app().await;
        let (status, body) = send(
            &app,
            "POST",
            "/clientadmin/login",
            None,
            Some(json!({"email_id": "admin@acme.test", "password": "nope"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn login_reports_tenant_chain() {
        let (app, kit) = app().await;
        let (status, body) = send(
            &app,
            "POST",
            "/associationadmin/login",
            None,
            Some(json!({"email_id": "ADMIN@depot.test", "password": "admin-secret"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let data = &body["data"];
        assert_eq!(data["association_id"], kit.association.association_id);
        assert_eq!(data["association_name"], "Depot");
        assert_eq!(data["client_id"], kit.client.client_id);
        assert_eq!(data["reseller_id"], kit.reseller.reseller_id);
        assert_eq!(data["user"]["role"], "associationadmin");
    }

    #[tokio::test]
    async fn login_in_other_namespace_is_rejected() {
        let (app, _kit) = app().await;
        let (status, _) = send(
            &app,
            "POST",
            "/reselleradmin/login",
            None,
            Some(json!({"email_id": "admin@acme.test", "password": "admin-secret"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn token_is_bound_to_its_namespace() {
        let (app, _kit) = app().await;
        let token = login(&app, "clientadmin", "admin@acme.test").await;

        let (status, _) = send(&app, "GET", "/clientadmin/associations", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, "GET", "/reselleradmin/clients", Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = send(&app, "GET", "/clientadmin/associations", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn deactivated_admin_token_is_rejected() {
        let (app, kit) = app().await;
        let token = login(&app, "clientadmin", "admin@acme.test").await;
        let (status, _) = send(&app, "GET", "/clientadmin/associations", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);

        kit.gateway
            .set_active::<User>(&kit.client_admin().user_id, false, &ScopeFilter::Global, "root")
            .await
            .unwrap();

        let (status, body) = send(&app, "GET", "/clientadmin/associations", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
        let (status, _) = send(
            &app,
            "POST",
            "/clientadmin/associations",
            Some(&token),
            Some(json!({"association_name": "Late", "association_email_id": "late@acme.test"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let (status, _) = send(
            &app,
            "POST",
            "/clientadmin/login",
            None,
            Some(json!({"email_id": "admin@acme.test", "password": "admin-secret"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn listings_stay_inside_scope() {
        let (app, kit) = app().await;
        let token = login(&app, "reselleradmin", "admin@volt.test").await;
        let (status, body) = send(&app, "GET", "/reselleradmin/clients", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<i64> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["client_id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![kit.client.client_id as i64]);
    }

    #[tokio::test]
    async fn status_toggle_requires_strict_bool() {
        let (app, kit) = app().await;
        let token = login(&app, "clientadmin", "admin@acme.test").await;
        let uri = format!(
            "/clientadmin/associations/{}/status",
            kit.other_association.association_id
        );

        let (status, _) = send(&app, "PUT", &uri, Some(&token), Some(json!({"status": "false"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(&app, "PUT", &uri, Some(&token), Some(json!({"status": false}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["record"]["status"], false);
        assert_eq!(body["data"]["modified"], true);

        let (_, body) = send(
            &app,
            "GET",
            "/clientadmin/associations?active_only=true",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn create_conflict_maps_to_409() {
        let (app, _kit) = app().await;
        let token = login(&app, "superadmin", "root@cms.test").await;
        let payload = json!({
            "reseller_name": "Ohm",
            "reseller_phone_no": "+1 555 0199",
            "reseller_email_id": "ops@ohm.test",
            "reseller_address": "9 Grid Rd"
        });
        let (status, body) = send(&app, "POST", "/superadmin/resellers", Some(&token), Some(payload.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["reseller_id"], 3);
        assert_eq!(body["data"]["created_by"], "root");

        let (status, _) = send(&app, "POST", "/superadmin/resellers", Some(&token), Some(payload)).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn out_of_scope_record_is_not_found() {
        let (app, kit) = app().await;
        let token = login(&app, "reselleradmin", "admin@volt.test").await;
        let uri = format!("/reselleradmin/clients/{}", kit.other_client.client_id);
        let (status, _) = send(&app, "PUT", &uri, Some(&token), Some(json!({"client_name": "Mine"}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn health_is_public() {
        let (app, _kit) = app().await;
        let (status, body) = send(&app, "GET", "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["database"]["status"], "ok");
    }
}
