//! The caller's own account and tenant node

use axum::{extract::State, Extension};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::admin::{OwnProfilePatch, Profile, TenantProfile};
use crate::application::AdminServices;
use crate::domain::Caller;
use crate::interfaces::http::common::{ok, ApiResponse, ApiResult, Updated, ValidatedJson};
use crate::interfaces::http::modules::tenants::{
    AssociationDto, ClientDto, ResellerDto, UpdateTenantRequest,
};
use crate::interfaces::http::modules::users::UserDto;

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileDto {
    pub user: UserDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reseller: Option<ResellerDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<ClientDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub association: Option<AssociationDto>,
}

impl From<Profile> for ProfileDto {
    fn from(p: Profile) -> Self {
        let mut dto = Self {
            user: p.user.into(),
            reseller: None,
            client: None,
            association: None,
        };
        match p.tenant {
            Some(TenantProfile::Reseller(r)) => dto.reseller = Some(r.into()),
            Some(TenantProfile::Client(c)) => dto.client = Some(c.into()),
            Some(TenantProfile::Association(a)) => dto.association = Some(a.into()),
            None => {}
        }
        dto
    }
}

/// The caller's own tenant row after an update.
#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "level", rename_all = "lowercase")]
pub enum TenantDto {
    Reseller(ResellerDto),
    Client(ClientDto),
    Association(AssociationDto),
}

impl From<TenantProfile> for TenantDto {
    fn from(t: TenantProfile) -> Self {
        match t {
            TenantProfile::Reseller(r) => Self::Reseller(r.into()),
            TenantProfile::Client(c) => Self::Client(c.into()),
            TenantProfile::Association(a) => Self::Association(a.into()),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 50, message = "username must be 1-50 characters"))]
    pub username: Option<String>,
    pub phone_no: Option<String>,
    #[validate(length(min = 6, max = 128, message = "password must be 6-128 characters"))]
    pub password: Option<String>,
}

impl From<UpdateProfileRequest> for OwnProfilePatch {
    fn from(r: UpdateProfileRequest) -> Self {
        Self {
            username: r.username,
            phone_no: r.phone_no,
            password: r.password,
        }
    }
}

#[utoipa::path(
    get,
    path = "/{namespace}/profile",
    tag = "Profile",
    security(("bearer_auth" = [])),
    params(("namespace" = String, Path, description = "Admin namespace")),
    responses(
        (status = 200, description = "Own user row joined to its tenant node", body = ApiResponse<ProfileDto>),
        (status = 500, description = "Own tenant row is missing")
    )
)]
pub async fn get_profile(
    State(services): State<AdminServices>,
    Extension(caller): Extension<Caller>,
) -> ApiResult<ProfileDto> {
    ok(services.profile.fetch(&caller).await?.into())
}

#[utoipa::path(
    put,
    path = "/{namespace}/profile",
    tag = "Profile",
    security(("bearer_auth" = [])),
    params(("namespace" = String, Path, description = "Admin namespace")),
    request_body = UpdateProfileRequest,
    responses((status = 200, description = "Own account updated", body = ApiResponse<Updated<UserDto>>))
)]
pub async fn update_profile(
    State(services): State<AdminServices>,
    Extension(caller): Extension<Caller>,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<Updated<UserDto>> {
    let outcome = services.profile.update(&caller, request.into()).await?;
    ok(Updated::from_outcome(outcome))
}

#[utoipa::path(
    put,
    path = "/{namespace}/profile/tenant",
    tag = "Profile",
    security(("bearer_auth" = [])),
    params(("namespace" = String, Path, description = "reselleradmin, clientadmin or associationadmin")),
    request_body = UpdateTenantRequest,
    responses(
        (status = 200, description = "Own tenant row updated", body = ApiResponse<TenantDto>),
        (status = 403, description = "The super-admin has no tenant row")
    )
)]
pub async fn update_own_tenant(
    State(services): State<AdminServices>,
    Extension(caller): Extension<Caller>,
    ValidatedJson(request): ValidatedJson<UpdateTenantRequest>,
) -> ApiResult<TenantDto> {
    let tenant = services.profile.update_tenant(&caller, request.into()).await?;
    ok(tenant.into())
}
