//! User management handlers
//!
//! Mounted under every namespace; which users and roles are reachable is
//! decided by the caller's scope and role.

use axum::{
    extract::{Path, Query, State},
    Extension,
};

use super::dto::{CreateUserRequest, UpdateUserRequest, UserDto, WalletDto};
use crate::application::AdminServices;
use crate::domain::Caller;
use crate::interfaces::http::common::{
    ok, ApiResponse, ApiResult, ListParams, StatusRequest, Updated, ValidatedJson,
};
use crate::interfaces::http::modules::roles::RoleDto;

#[utoipa::path(
    get,
    path = "/{namespace}/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("namespace" = String, Path, description = "Admin namespace"), ListParams),
    responses(
        (status = 200, description = "Users in scope", body = ApiResponse<Vec<UserDto>>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_users(
    State(services): State<AdminServices>,
    Extension(caller): Extension<Caller>,
    Query(params): Query<ListParams>,
) -> ApiResult<Vec<UserDto>> {
    let users = services.users.list(&caller, params.active_only).await?;
    ok(users.into_iter().map(UserDto::from).collect())
}

#[utoipa::path(
    get,
    path = "/{namespace}/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("namespace" = String, Path, description = "Admin namespace"),
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User details", body = ApiResponse<UserDto>),
        (status = 404, description = "Not found or out of scope")
    )
)]
pub async fn get_user(
    State(services): State<AdminServices>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<i32>,
) -> ApiResult<UserDto> {
    ok(services.users.get(&caller, id).await?.into())
}

#[utoipa::path(
    post,
    path = "/{namespace}/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("namespace" = String, Path, description = "Admin namespace")),
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "User created", body = ApiResponse<UserDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Role not assignable by caller"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_user(
    State(services): State<AdminServices>,
    Extension(caller): Extension<Caller>,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> ApiResult<UserDto> {
    ok(services.users.create(&caller, request.into()).await?.into())
}

#[utoipa::path(
    put,
    path = "/{namespace}/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("namespace" = String, Path, description = "Admin namespace"),
        ("id" = i32, Path, description = "User ID")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<Updated<UserDto>>),
        (status = 404, description = "Not found or out of scope")
    )
)]
pub async fn update_user(
    State(services): State<AdminServices>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<Updated<UserDto>> {
    let outcome = services.users.update(&caller, id, request.into()).await?;
    ok(Updated::from_outcome(outcome))
}

#[utoipa::path(
    put,
    path = "/{namespace}/users/{id}/status",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("namespace" = String, Path, description = "Admin namespace"),
        ("id" = i32, Path, description = "User ID")
    ),
    request_body = StatusRequest,
    responses(
        (status = 200, description = "Status set", body = ApiResponse<Updated<UserDto>>),
        (status = 400, description = "Status is not a boolean, or own account")
    )
)]
pub async fn set_user_status(
    State(services): State<AdminServices>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<StatusRequest>,
) -> ApiResult<Updated<UserDto>> {
    let outcome = services.users.set_active(&caller, id, request.status).await?;
    ok(Updated::from_outcome(outcome))
}

#[utoipa::path(
    get,
    path = "/{namespace}/roles/assignable",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("namespace" = String, Path, description = "Admin namespace")),
    responses((status = 200, description = "Active roles the caller may hand out", body = ApiResponse<Vec<RoleDto>>))
)]
pub async fn assignable_roles(
    State(services): State<AdminServices>,
    Extension(caller): Extension<Caller>,
) -> ApiResult<Vec<RoleDto>> {
    let roles = services.users.assignable_roles(&caller).await?;
    ok(roles.into_iter().map(RoleDto::from).collect())
}

#[utoipa::path(
    get,
    path = "/{namespace}/wallet",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("namespace" = String, Path, description = "reselleradmin or associationadmin")),
    responses((status = 200, description = "Caller's wallet balance", body = ApiResponse<WalletDto>))
)]
pub async fn wallet(
    State(services): State<AdminServices>,
    Extension(caller): Extension<Caller>,
) -> ApiResult<WalletDto> {
    let wallet_balance = services.users.wallet(&caller).await?;
    ok(WalletDto { wallet_balance })
}
