//! Tenant nodes: resellers (super-admin), clients (reseller-admin) and
//! associations (client-admin)

use axum::{
    extract::{Path, Query, State},
    Extension,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::AdminServices;
use crate::domain::{Association, Caller, Client, ContactPatch, NewTenant, Reseller};
use crate::interfaces::http::common::{
    ok, ApiResponse, ApiResult, AuditDto, ListParams, StatusRequest, Updated, ValidatedJson,
};

// ── DTOs ────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ResellerDto {
    pub reseller_id: i32,
    pub reseller_name: String,
    pub reseller_phone_no: String,
    pub reseller_email_id: String,
    pub reseller_address: String,
    #[serde(flatten)]
    pub audit: AuditDto,
}

impl From<Reseller> for ResellerDto {
    fn from(r: Reseller) -> Self {
        Self {
            reseller_id: r.reseller_id,
            reseller_name: r.reseller_name,
            reseller_phone_no: r.reseller_phone_no,
            reseller_email_id: r.reseller_email_id,
            reseller_address: r.reseller_address,
            audit: r.audit.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClientDto {
    pub client_id: i32,
    pub reseller_id: i32,
    pub client_name: String,
    pub client_phone_no: String,
    pub client_email_id: String,
    pub client_address: String,
    #[serde(flatten)]
    pub audit: AuditDto,
}

impl From<Client> for ClientDto {
    fn from(c: Client) -> Self {
        Self {
            client_id: c.client_id,
            reseller_id: c.reseller_id,
            client_name: c.client_name,
            client_phone_no: c.client_phone_no,
            client_email_id: c.client_email_id,
            client_address: c.client_address,
            audit: c.audit.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AssociationDto {
    pub association_id: i32,
    pub client_id: i32,
    pub reseller_id: i32,
    pub association_name: String,
    pub association_phone_no: String,
    pub association_email_id: String,
    pub association_address: String,
    #[serde(flatten)]
    pub audit: AuditDto,
}

impl From<Association> for AssociationDto {
    fn from(a: Association) -> Self {
        Self {
            association_id: a.association_id,
            client_id: a.client_id,
            reseller_id: a.reseller_id,
            association_name: a.association_name,
            association_phone_no: a.association_phone_no,
            association_email_id: a.association_email_id,
            association_address: a.association_address,
            audit: a.audit.into(),
        }
    }
}

/// Contact details of a new node. Accepts the level-prefixed field names
/// (`client_name`, `client_email_id`, ...) as well as the bare ones.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTenantRequest {
    #[serde(alias = "reseller_name", alias = "client_name", alias = "association_name")]
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
    #[serde(
        alias = "reseller_phone_no",
        alias = "client_phone_no",
        alias = "association_phone_no"
    )]
    #[validate(length(min = 1, max = 20, message = "phone_no is required"))]
    pub phone_no: String,
    #[serde(
        alias = "reseller_email_id",
        alias = "client_email_id",
        alias = "association_email_id"
    )]
    #[validate(email(message = "invalid email format"))]
    pub email_id: String,
    #[serde(
        alias = "reseller_address",
        alias = "client_address",
        alias = "association_address"
    )]
    #[validate(length(min = 1, message = "address is required"))]
    pub address: String,
}

impl From<CreateTenantRequest> for NewTenant {
    fn from(r: CreateTenantRequest) -> Self {
        Self {
            name: r.name,
            phone_no: r.phone_no,
            email_id: r.email_id,
            address: r.address,
        }
    }
}

/// Editable contact fields. The email is fixed at creation.
#[derive(Debug, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateTenantRequest {
    #[serde(alias = "reseller_name", alias = "client_name", alias = "association_name")]
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: Option<String>,
    #[serde(
        alias = "reseller_phone_no",
        alias = "client_phone_no",
        alias = "association_phone_no"
    )]
    #[validate(length(min = 1, max = 20, message = "phone_no must not be empty"))]
    pub phone_no: Option<String>,
    #[serde(
        alias = "reseller_address",
        alias = "client_address",
        alias = "association_address"
    )]
    #[validate(length(min = 1, message = "address must not be empty"))]
    pub address: Option<String>,
}

impl From<UpdateTenantRequest> for ContactPatch {
    fn from(r: UpdateTenantRequest) -> Self {
        Self {
            name: r.name,
            phone_no: r.phone_no,
            address: r.address,
        }
    }
}

// ── Resellers ───────────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/superadmin/resellers",
    tag = "Resellers",
    security(("bearer_auth" = [])),
    params(ListParams),
    responses((status = 200, description = "All resellers", body = ApiResponse<Vec<ResellerDto>>))
)]
pub async fn list_resellers(
    State(services): State<AdminServices>,
    Extension(caller): Extension<Caller>,
    Query(params): Query<ListParams>,
) -> ApiResult<Vec<ResellerDto>> {
    let rows = services.tenants.list::<Reseller>(&caller, params.active_only).await?;
    ok(rows.into_iter().map(ResellerDto::from).collect())
}

#[utoipa::path(
    post,
    path = "/superadmin/resellers",
    tag = "Resellers",
    security(("bearer_auth" = [])),
    request_body = CreateTenantRequest,
    responses(
        (status = 200, description = "Reseller created", body = ApiResponse<ResellerDto>),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_reseller(
    State(services): State<AdminServices>,
    Extension(caller): Extension<Caller>,
    ValidatedJson(request): ValidatedJson<CreateTenantRequest>,
) -> ApiResult<ResellerDto> {
    let row = services
        .tenants
        .create::<Reseller>(&caller, request.into(), None)
        .await?;
    ok(row.into())
}

#[utoipa::path(
    put,
    path = "/superadmin/resellers/{id}",
    tag = "Resellers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Reseller ID")),
    request_body = UpdateTenantRequest,
    responses((status = 200, description = "Reseller updated", body = ApiResponse<Updated<ResellerDto>>))
)]
pub async fn update_reseller(
    State(services): State<AdminServices>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UpdateTenantRequest>,
) -> ApiResult<Updated<ResellerDto>> {
    let outcome = services
        .tenants
        .update::<Reseller>(&caller, id, request.into())
        .await?;
    ok(Updated::from_outcome(outcome))
}

#[utoipa::path(
    put,
    path = "/superadmin/resellers/{id}/status",
    tag = "Resellers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Reseller ID")),
    request_body = StatusRequest,
    responses((status = 200, description = "Status set", body = ApiResponse<Updated<ResellerDto>>))
)]
pub async fn set_reseller_status(
    State(services): State<AdminServices>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<StatusRequest>,
) -> ApiResult<Updated<ResellerDto>> {
    let outcome = services
        .tenants
        .set_active::<Reseller>(&caller, id, request.status)
        .await?;
    ok(Updated::from_outcome(outcome))
}

// ── Clients ─────────────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/reselleradmin/clients",
    tag = "Clients",
    security(("bearer_auth" = [])),
    params(ListParams),
    responses((status = 200, description = "Clients of the caller's reseller", body = ApiResponse<Vec<ClientDto>>))
)]
pub async fn list_clients(
    State(services): State<AdminServices>,
    Extension(caller): Extension<Caller>,
    Query(params): Query<ListParams>,
) -> ApiResult<Vec<ClientDto>> {
    let rows = services.tenants.list::<Client>(&caller, params.active_only).await?;
    ok(rows.into_iter().map(ClientDto::from).collect())
}

#[utoipa::path(
    post,
    path = "/reselleradmin/clients",
    tag = "Clients",
    security(("bearer_auth" = [])),
    request_body = CreateTenantRequest,
    responses(
        (status = 200, description = "Client created", body = ApiResponse<ClientDto>),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_client(
    State(services): State<AdminServices>,
    Extension(caller): Extension<Caller>,
    ValidatedJson(request): ValidatedJson<CreateTenantRequest>,
) -> ApiResult<ClientDto> {
    let row = services
        .tenants
        .create::<Client>(&caller, request.into(), None)
        .await?;
    ok(row.into())
}

#[utoipa::path(
    put,
    path = "/reselleradmin/clients/{id}",
    tag = "Clients",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Client ID")),
    request_body = UpdateTenantRequest,
    responses((status = 200, description = "Client updated", body = ApiResponse<Updated<ClientDto>>))
)]
pub async fn update_client(
    State(services): State<AdminServices>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UpdateTenantRequest>,
) -> ApiResult<Updated<ClientDto>> {
    let outcome = services
        .tenants
        .update::<Client>(&caller, id, request.into())
        .await?;
    ok(Updated::from_outcome(outcome))
}

#[utoipa::path(
    put,
    path = "/reselleradmin/clients/{id}/status",
    tag = "Clients",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Client ID")),
    request_body = StatusRequest,
    responses((status = 200, description = "Status set", body = ApiResponse<Updated<ClientDto>>))
)]
pub async fn set_client_status(
    State(services): State<AdminServices>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<StatusRequest>,
) -> ApiResult<Updated<ClientDto>> {
    let outcome = services
        .tenants
        .set_active::<Client>(&caller, id, request.status)
        .await?;
    ok(Updated::from_outcome(outcome))
}

#[utoipa::path(
    get,
    path = "/reselleradmin/clients/{id}/associations",
    tag = "Clients",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Client ID"), ListParams),
    responses(
        (status = 200, description = "Associations of one client", body = ApiResponse<Vec<AssociationDto>>),
        (status = 404, description = "Client not found or out of scope")
    )
)]
pub async fn client_associations(
    State(services): State<AdminServices>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<i32>,
    Query(params): Query<ListParams>,
) -> ApiResult<Vec<AssociationDto>> {
    let rows = services
        .tenants
        .associations_of_client(&caller, id, params.active_only)
        .await?;
    ok(rows.into_iter().map(AssociationDto::from).collect())
}

// ── Associations ────────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/clientadmin/associations",
    tag = "Associations",
    security(("bearer_auth" = [])),
    params(ListParams),
    responses((status = 200, description = "Associations of the caller's client", body = ApiResponse<Vec<AssociationDto>>))
)]
pub async fn list_associations(
    State(services): State<AdminServices>,
    Extension(caller): Extension<Caller>,
    Query(params): Query<ListParams>,
) -> ApiResult<Vec<AssociationDto>> {
    let rows = services
        .tenants
        .list::<Association>(&caller, params.active_only)
        .await?;
    ok(rows.into_iter().map(AssociationDto::from).collect())
}

#[utoipa::path(
    post,
    path = "/clientadmin/associations",
    tag = "Associations",
    security(("bearer_auth" = [])),
    request_body = CreateTenantRequest,
    responses(
        (status = 200, description = "Association created", body = ApiResponse<AssociationDto>),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_association(
    State(services): State<AdminServices>,
    Extension(caller): Extension<Caller>,
    ValidatedJson(request): ValidatedJson<CreateTenantRequest>,
) -> ApiResult<AssociationDto> {
    let row = services
        .tenants
        .create::<Association>(&caller, request.into(), None)
        .await?;
    ok(row.into())
}

#[utoipa::path(
    put,
    path = "/clientadmin/associations/{id}",
    tag = "Associations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Association ID")),
    request_body = UpdateTenantRequest,
    responses((status = 200, description = "Association updated", body = ApiResponse<Updated<AssociationDto>>))
)]
pub async fn update_association(
    State(services): State<AdminServices>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UpdateTenantRequest>,
) -> ApiResult<Updated<AssociationDto>> {
    let outcome = services
        .tenants
        .update::<Association>(&caller, id, request.into())
        .await?;
    ok(Updated::from_outcome(outcome))
}

#[utoipa::path(
    put,
    path = "/clientadmin/associations/{id}/status",
    tag = "Associations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Association ID")),
    request_body = StatusRequest,
    responses((status = 200, description = "Status set", body = ApiResponse<Updated<AssociationDto>>))
)]
pub async fn set_association_status(
    State(services): State<AdminServices>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<StatusRequest>,
) -> ApiResult<Updated<AssociationDto>> {
    let outcome = services
        .tenants
        .set_active::<Association>(&caller, id, request.status)
        .await?;
    ok(Updated::from_outcome(outcome))
}
