//! Role reference data (super-admin)

use axum::{
    extract::{Path, Query, State},
    Extension,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::AdminServices;
use crate::domain::{Caller, NewRole, Role};
use crate::interfaces::http::common::{
    ok, ApiResponse, ApiResult, AuditDto, ListParams, StatusRequest, Updated, ValidatedJson,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoleDto {
    pub role_id: i32,
    pub role_name: String,
    #[serde(flatten)]
    pub audit: AuditDto,
}

impl From<Role> for RoleDto {
    fn from(r: Role) -> Self {
        Self {
            role_id: r.role_id,
            role_name: r.role_name,
            audit: r.audit.into(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRoleRequest {
    #[validate(length(min = 1, max = 50, message = "role_name must be 1-50 characters"))]
    pub role_name: String,
}

#[utoipa::path(
    get,
    path = "/superadmin/roles",
    tag = "Roles",
    security(("bearer_auth" = [])),
    params(ListParams),
    responses((status = 200, description = "All roles", body = ApiResponse<Vec<RoleDto>>))
)]
pub async fn list_roles(
    State(services): State<AdminServices>,
    Query(params): Query<ListParams>,
) -> ApiResult<Vec<RoleDto>> {
    let roles = services.roles.list(params.active_only).await?;
    ok(roles.into_iter().map(RoleDto::from).collect())
}

#[utoipa::path(
    post,
    path = "/superadmin/roles",
    tag = "Roles",
    security(("bearer_auth" = [])),
    request_body = CreateRoleRequest,
    responses(
        (status = 200, description = "Role created", body = ApiResponse<RoleDto>),
        (status = 409, description = "Role name taken")
    )
)]
pub async fn create_role(
    State(services): State<AdminServices>,
    Extension(caller): Extension<Caller>,
    ValidatedJson(request): ValidatedJson<CreateRoleRequest>,
) -> ApiResult<RoleDto> {
    let draft = NewRole {
        role_name: request.role_name,
    };
    ok(services.roles.create(&caller, draft).await?.into())
}

#[utoipa::path(
    put,
    path = "/superadmin/roles/{id}/status",
    tag = "Roles",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Role ID")),
    request_body = StatusRequest,
    responses(
        (status = 200, description = "Status set", body = ApiResponse<Updated<RoleDto>>),
        (status = 400, description = "Status is not a boolean, or the superadmin role")
    )
)]
pub async fn set_role_status(
    State(services): State<AdminServices>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<StatusRequest>,
) -> ApiResult<Updated<RoleDto>> {
    let outcome = services.roles.set_active(&caller, id, request.status).await?;
    ok(Updated::from_outcome(outcome))
}
