//! Charger inventory, assignment down the hierarchy, and device settings

use axum::{
    extract::{Path, Query, State},
    Extension,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::admin::{AllocatedCharger, ChargerSessions};
use crate::application::{AdminServices, AssignmentResult};
use crate::domain::{
    Caller, Charger, ChargerPatch, ChargerView, DevicePatch, DeviceSession, NewCharger,
};
use crate::interfaces::http::common::{
    ok, ApiResponse, ApiResult, AuditDto, StatusRequest, Updated, ValidatedJson,
};

// ── DTOs ────────────────────────────────────────────────────────

/// Charger API representation. The wifi password is write-only.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChargerDto {
    pub charger_id: String,
    pub model: String,
    pub vendor: String,
    pub charger_type: String,
    pub gun_connector: Option<i32>,
    pub max_current: Option<f64>,
    pub max_power: Option<f64>,
    pub socket_count: Option<i32>,
    pub lat: Option<f64>,
    pub long: Option<f64>,
    pub charger_accessibility: Option<i32>,
    pub wifi_username: Option<String>,
    pub assigned_reseller_id: Option<i32>,
    pub assigned_client_id: Option<i32>,
    pub assigned_association_id: Option<i32>,
    pub reseller_commission: Option<f64>,
    pub client_commission: Option<f64>,
    pub assigned_reseller_date: Option<DateTime<Utc>>,
    pub assigned_client_date: Option<DateTime<Utc>>,
    pub assigned_association_date: Option<DateTime<Utc>>,
    pub finance_id: Option<i32>,
    #[serde(flatten)]
    pub audit: AuditDto,
}

impl From<Charger> for ChargerDto {
    fn from(c: Charger) -> Self {
        Self {
            charger_id: c.charger_id,
            model: c.model,
            vendor: c.vendor,
            charger_type: c.charger_type,
            gun_connector: c.gun_connector,
            max_current: c.max_current,
            max_power: c.max_power,
            socket_count: c.socket_count,
            lat: c.lat,
            long: c.long,
            charger_accessibility: c.charger_accessibility,
            wifi_username: c.wifi_username,
            assigned_reseller_id: c.assigned_reseller_id,
            assigned_client_id: c.assigned_client_id,
            assigned_association_id: c.assigned_association_id,
            reseller_commission: c.reseller_commission,
            client_commission: c.client_commission,
            assigned_reseller_date: c.assigned_reseller_date,
            assigned_client_date: c.assigned_client_date,
            assigned_association_date: c.assigned_association_date,
            finance_id: c.finance_id,
            audit: c.audit.into(),
        }
    }
}

/// A charger handed down one level, with the name of the node holding it.
#[derive(Debug, Serialize, ToSchema)]
pub struct AllocatedChargerDto {
    #[serde(flatten)]
    pub charger: ChargerDto,
    pub assignee_level: String,
    pub assignee_id: i32,
    pub assignee_name: Option<String>,
}

impl From<AllocatedCharger> for AllocatedChargerDto {
    fn from(a: AllocatedCharger) -> Self {
        Self {
            charger: a.charger.into(),
            assignee_level: a.assignee_level.as_str().to_string(),
            assignee_id: a.assignee_id,
            assignee_name: a.assignee_name,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ChargerListParams {
    /// all, allocated or unallocated
    #[serde(default)]
    #[param(value_type = Option<String>)]
    pub view: ChargerView,
    #[serde(default)]
    pub active_only: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateChargerRequest {
    #[validate(length(min = 1, max = 64, message = "charger_id must be 1-64 characters"))]
    pub charger_id: String,
    #[validate(length(min = 1, message = "model is required"))]
    pub model: String,
    #[validate(length(min = 1, message = "vendor is required"))]
    pub vendor: String,
    #[validate(length(min = 1, message = "charger_type is required"))]
    pub charger_type: String,
    #[validate(range(min = 0))]
    pub gun_connector: Option<i32>,
    #[validate(range(min = 0.0))]
    pub max_current: Option<f64>,
    #[validate(range(min = 0.0))]
    pub max_power: Option<f64>,
    #[validate(range(min = 0))]
    pub socket_count: Option<i32>,
}

impl From<CreateChargerRequest> for NewCharger {
    fn from(r: CreateChargerRequest) -> Self {
        Self {
            charger_id: r.charger_id,
            model: r.model,
            vendor: r.vendor,
            charger_type: r.charger_type,
            gun_connector: r.gun_connector,
            max_current: r.max_current,
            max_power: r.max_power,
            socket_count: r.socket_count,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateChargerRequest {
    #[validate(length(min = 1))]
    pub model: Option<String>,
    #[validate(length(min = 1))]
    pub vendor: Option<String>,
    #[validate(length(min = 1))]
    pub charger_type: Option<String>,
    #[validate(range(min = 0))]
    pub gun_connector: Option<i32>,
    #[validate(range(min = 0.0))]
    pub max_current: Option<f64>,
    #[validate(range(min = 0.0))]
    pub max_power: Option<f64>,
    #[validate(range(min = 0))]
    pub socket_count: Option<i32>,
}

impl From<UpdateChargerRequest> for ChargerPatch {
    fn from(r: UpdateChargerRequest) -> Self {
        Self {
            model: r.model,
            vendor: r.vendor,
            charger_type: r.charger_type,
            gun_connector: r.gun_connector,
            max_current: r.max_current,
            max_power: r.max_power,
            socket_count: r.socket_count,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateDeviceRequest {
    pub charger_accessibility: Option<i32>,
    pub wifi_username: Option<String>,
    pub wifi_password: Option<String>,
    pub lat: Option<f64>,
    pub long: Option<f64>,
    pub finance_id: Option<i32>,
}

impl From<UpdateDeviceRequest> for DevicePatch {
    fn from(r: UpdateDeviceRequest) -> Self {
        Self {
            charger_accessibility: r.charger_accessibility,
            wifi_username: r.wifi_username,
            wifi_password: r.wifi_password,
            lat: r.lat,
            long: r.long,
            finance_id: r.finance_id,
        }
    }
}

/// Hands chargers to a node one level below the caller. The target and
/// commission may be named after the level (`client_id`,
/// `reseller_commission`, ...).
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AssignChargersRequest {
    #[validate(length(min = 1, message = "charger_ids must not be empty"))]
    pub charger_ids: Vec<String>,
    #[serde(alias = "reseller_id", alias = "client_id", alias = "association_id")]
    pub target_id: i32,
    #[serde(alias = "reseller_commission", alias = "client_commission")]
    pub commission: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AssignmentDto {
    pub level: String,
    pub target_id: i32,
    pub assigned: Vec<String>,
    pub refreshed: Vec<String>,
}

impl From<AssignmentResult> for AssignmentDto {
    fn from(r: AssignmentResult) -> Self {
        Self {
            level: r.level.as_str().to_string(),
            target_id: r.target_id,
            assigned: r.assigned,
            refreshed: r.refreshed,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionDto {
    pub session_id: i32,
    pub charger_id: String,
    pub user: String,
    pub start_time: DateTime<Utc>,
    pub stop_time: Option<DateTime<Utc>>,
    pub unit_consumed: f64,
    pub price: f64,
}

impl From<DeviceSession> for SessionDto {
    fn from(s: DeviceSession) -> Self {
        Self {
            session_id: s.session_id,
            charger_id: s.charger_id,
            user: s.user,
            start_time: s.start_time,
            stop_time: s.stop_time,
            unit_consumed: s.unit_consumed,
            price: s.price,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChargerSessionsDto {
    pub charger_id: String,
    pub sessions: Vec<SessionDto>,
}

impl From<ChargerSessions> for ChargerSessionsDto {
    fn from(c: ChargerSessions) -> Self {
        Self {
            charger_id: c.charger_id,
            sessions: c.sessions.into_iter().map(SessionDto::from).collect(),
        }
    }
}

// ── Listings ────────────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/{namespace}/chargers",
    tag = "Chargers",
    security(("bearer_auth" = [])),
    params(("namespace" = String, Path, description = "Admin namespace"), ChargerListParams),
    responses((status = 200, description = "Chargers visible to the caller", body = ApiResponse<Vec<ChargerDto>>))
)]
pub async fn list_chargers(
    State(services): State<AdminServices>,
    Extension(caller): Extension<Caller>,
    Query(params): Query<ChargerListParams>,
) -> ApiResult<Vec<ChargerDto>> {
    let rows = services
        .chargers
        .list(&caller, params.view, params.active_only)
        .await?;
    ok(rows.into_iter().map(ChargerDto::from).collect())
}

#[utoipa::path(
    get,
    path = "/{namespace}/chargers/unallocated",
    tag = "Chargers",
    security(("bearer_auth" = [])),
    params(("namespace" = String, Path, description = "superadmin, reselleradmin or clientadmin")),
    responses((status = 200, description = "Chargers held at the caller's level", body = ApiResponse<Vec<ChargerDto>>))
)]
pub async fn list_unallocated(
    State(services): State<AdminServices>,
    Extension(caller): Extension<Caller>,
) -> ApiResult<Vec<ChargerDto>> {
    let rows = services
        .chargers
        .list(&caller, ChargerView::Unallocated, false)
        .await?;
    ok(rows.into_iter().map(ChargerDto::from).collect())
}

#[utoipa::path(
    get,
    path = "/{namespace}/chargers/allocated",
    tag = "Chargers",
    security(("bearer_auth" = [])),
    params(("namespace" = String, Path, description = "superadmin, reselleradmin or clientadmin")),
    responses(
        (status = 200, description = "Chargers handed down one level", body = ApiResponse<Vec<AllocatedChargerDto>>),
        (status = 403, description = "Association admins do not hand chargers down")
    )
)]
pub async fn list_allocated(
    State(services): State<AdminServices>,
    Extension(caller): Extension<Caller>,
) -> ApiResult<Vec<AllocatedChargerDto>> {
    let rows = services.chargers.allocated(&caller).await?;
    ok(rows.into_iter().map(AllocatedChargerDto::from).collect())
}

#[utoipa::path(
    get,
    path = "/{namespace}/chargers/{id}",
    tag = "Chargers",
    security(("bearer_auth" = [])),
    params(
        ("namespace" = String, Path, description = "Admin namespace"),
        ("id" = String, Path, description = "Charger ID")
    ),
    responses(
        (status = 200, description = "Charger details", body = ApiResponse<ChargerDto>),
        (status = 404, description = "Not found or out of scope")
    )
)]
pub async fn get_charger(
    State(services): State<AdminServices>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> ApiResult<ChargerDto> {
    ok(services.chargers.get(&caller, &id).await?.into())
}

#[utoipa::path(
    get,
    path = "/reselleradmin/clients/{id}/sessions",
    tag = "Chargers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Chargers of one client with their sessions, latest stop first", body = ApiResponse<Vec<ChargerSessionsDto>>),
        (status = 404, description = "Client not found or out of scope")
    )
)]
pub async fn client_sessions(
    State(services): State<AdminServices>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<ChargerSessionsDto>> {
    let rows = services.chargers.sessions_for_client(&caller, id).await?;
    ok(rows.into_iter().map(ChargerSessionsDto::from).collect())
}

// ── Writes ──────────────────────────────────────────────────────

#[utoipa::path(
    post,
    path = "/superadmin/chargers",
    tag = "Chargers",
    security(("bearer_auth" = [])),
    request_body = CreateChargerRequest,
    responses(
        (status = 200, description = "Charger registered", body = ApiResponse<ChargerDto>),
        (status = 409, description = "Charger ID taken")
    )
)]
pub async fn create_charger(
    State(services): State<AdminServices>,
    Extension(caller): Extension<Caller>,
    ValidatedJson(request): ValidatedJson<CreateChargerRequest>,
) -> ApiResult<ChargerDto> {
    ok(services.chargers.create(&caller, request.into()).await?.into())
}

#[utoipa::path(
    put,
    path = "/superadmin/chargers/{id}",
    tag = "Chargers",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Charger ID")),
    request_body = UpdateChargerRequest,
    responses((status = 200, description = "Charger updated", body = ApiResponse<Updated<ChargerDto>>))
)]
pub async fn update_charger(
    State(services): State<AdminServices>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateChargerRequest>,
) -> ApiResult<Updated<ChargerDto>> {
    let outcome = services.chargers.update(&caller, &id, request.into()).await?;
    ok(Updated::from_outcome(outcome))
}

#[utoipa::path(
    put,
    path = "/associationadmin/chargers/{id}/device",
    tag = "Chargers",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Charger ID")),
    request_body = UpdateDeviceRequest,
    responses(
        (status = 200, description = "Device settings updated", body = ApiResponse<Updated<ChargerDto>>),
        (status = 400, description = "Foreign finance_id or coordinates out of range")
    )
)]
pub async fn update_device(
    State(services): State<AdminServices>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateDeviceRequest>,
) -> ApiResult<Updated<ChargerDto>> {
    let outcome = services
        .chargers
        .update_device(&caller, &id, request.into())
        .await?;
    ok(Updated::from_outcome(outcome))
}

#[utoipa::path(
    put,
    path = "/{namespace}/chargers/{id}/status",
    tag = "Chargers",
    security(("bearer_auth" = [])),
    params(
        ("namespace" = String, Path, description = "Admin namespace"),
        ("id" = String, Path, description = "Charger ID")
    ),
    request_body = StatusRequest,
    responses((status = 200, description = "Status set", body = ApiResponse<Updated<ChargerDto>>))
)]
pub async fn set_charger_status(
    State(services): State<AdminServices>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<StatusRequest>,
) -> ApiResult<Updated<ChargerDto>> {
    let outcome = services
        .chargers
        .set_active(&caller, &id, request.status)
        .await?;
    ok(Updated::from_outcome(outcome))
}

#[utoipa::path(
    post,
    path = "/{namespace}/chargers/assign",
    tag = "Chargers",
    security(("bearer_auth" = [])),
    params(("namespace" = String, Path, description = "superadmin, reselleradmin or clientadmin")),
    request_body = AssignChargersRequest,
    responses(
        (status = 200, description = "Chargers assigned", body = ApiResponse<AssignmentDto>),
        (status = 400, description = "Missing commission or inactive target"),
        (status = 404, description = "Unknown or out-of-scope chargers or target")
    )
)]
pub async fn assign_chargers(
    State(services): State<AdminServices>,
    Extension(caller): Extension<Caller>,
    ValidatedJson(request): ValidatedJson<AssignChargersRequest>,
) -> ApiResult<AssignmentDto> {
    let result = services
        .chargers
        .assign(&caller, &request.charger_ids, request.target_id, request.commission)
        .await?;
    ok(result.into())
}
