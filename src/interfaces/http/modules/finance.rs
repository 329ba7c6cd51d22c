//! Finance details (tariff rows) of associations

use axum::{
    extract::{Path, Query, State},
    Extension,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::AdminServices;
use crate::domain::{Caller, FinanceDetail, FinancePatch, FinanceRates, NewFinance};
use crate::interfaces::http::common::{
    ok, ApiResponse, ApiResult, AuditDto, ListParams, StatusRequest, Updated, ValidatedJson,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FinanceDto {
    pub finance_id: i32,
    pub reseller_id: i32,
    pub client_id: i32,
    pub association_id: i32,
    pub eb_charge: f64,
    pub app_charge: f64,
    pub parking_charge: f64,
    pub rent_charge: f64,
    pub open_a_eb_charge: f64,
    pub open_other_charge: f64,
    pub gst: f64,
    #[serde(flatten)]
    pub audit: AuditDto,
}

impl From<FinanceDetail> for FinanceDto {
    fn from(f: FinanceDetail) -> Self {
        let r = f.rates;
        Self {
            finance_id: f.finance_id,
            reseller_id: f.reseller_id,
            client_id: f.client_id,
            association_id: f.association_id,
            eb_charge: r.eb_charge,
            app_charge: r.app_charge,
            parking_charge: r.parking_charge,
            rent_charge: r.rent_charge,
            open_a_eb_charge: r.open_a_eb_charge,
            open_other_charge: r.open_other_charge,
            gst: r.gst,
            audit: f.audit.into(),
        }
    }
}

/// New tariff row. `reseller_id` and `client_id` come from the association.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateFinanceRequest {
    #[validate(range(min = 1, message = "association_id is required"))]
    pub association_id: i32,
    #[validate(range(min = 0.0))]
    pub eb_charge: f64,
    #[validate(range(min = 0.0))]
    pub app_charge: f64,
    #[validate(range(min = 0.0))]
    pub parking_charge: f64,
    #[validate(range(min = 0.0))]
    pub rent_charge: f64,
    #[validate(range(min = 0.0))]
    pub open_a_eb_charge: f64,
    #[validate(range(min = 0.0))]
    pub open_other_charge: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub gst: f64,
}

impl From<CreateFinanceRequest> for NewFinance {
    fn from(r: CreateFinanceRequest) -> Self {
        Self {
            association_id: r.association_id,
            rates: FinanceRates {
                eb_charge: r.eb_charge,
                app_charge: r.app_charge,
                parking_charge: r.parking_charge,
                rent_charge: r.rent_charge,
                open_a_eb_charge: r.open_a_eb_charge,
                open_other_charge: r.open_other_charge,
                gst: r.gst,
            },
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateFinanceRequest {
    #[validate(range(min = 0.0))]
    pub eb_charge: Option<f64>,
    #[validate(range(min = 0.0))]
    pub app_charge: Option<f64>,
    #[validate(range(min = 0.0))]
    pub parking_charge: Option<f64>,
    #[validate(range(min = 0.0))]
    pub rent_charge: Option<f64>,
    #[validate(range(min = 0.0))]
    pub open_a_eb_charge: Option<f64>,
    #[validate(range(min = 0.0))]
    pub open_other_charge: Option<f64>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub gst: Option<f64>,
}

impl From<UpdateFinanceRequest> for FinancePatch {
    fn from(r: UpdateFinanceRequest) -> Self {
        Self {
            eb_charge: r.eb_charge,
            app_charge: r.app_charge,
            parking_charge: r.parking_charge,
            rent_charge: r.rent_charge,
            open_a_eb_charge: r.open_a_eb_charge,
            open_other_charge: r.open_other_charge,
            gst: r.gst,
        }
    }
}

#[utoipa::path(
    get,
    path = "/{namespace}/finance",
    tag = "Finance",
    security(("bearer_auth" = [])),
    params(("namespace" = String, Path, description = "clientadmin or associationadmin"), ListParams),
    responses((status = 200, description = "Finance rows in scope", body = ApiResponse<Vec<FinanceDto>>))
)]
pub async fn list_finance(
    State(services): State<AdminServices>,
    Extension(caller): Extension<Caller>,
    Query(params): Query<ListParams>,
) -> ApiResult<Vec<FinanceDto>> {
    let rows = services.finance.list(&caller, params.active_only).await?;
    ok(rows.into_iter().map(FinanceDto::from).collect())
}

#[utoipa::path(
    post,
    path = "/clientadmin/finance",
    tag = "Finance",
    security(("bearer_auth" = [])),
    request_body = CreateFinanceRequest,
    responses(
        (status = 200, description = "Finance row created", body = ApiResponse<FinanceDto>),
        (status = 404, description = "Association not found or out of scope")
    )
)]
pub async fn create_finance(
    State(services): State<AdminServices>,
    Extension(caller): Extension<Caller>,
    ValidatedJson(request): ValidatedJson<CreateFinanceRequest>,
) -> ApiResult<FinanceDto> {
    ok(services.finance.create(&caller, request.into()).await?.into())
}

#[utoipa::path(
    put,
    path = "/clientadmin/finance/{id}",
    tag = "Finance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Finance ID")),
    request_body = UpdateFinanceRequest,
    responses((status = 200, description = "Rates updated", body = ApiResponse<Updated<FinanceDto>>))
)]
pub async fn update_finance(
    State(services): State<AdminServices>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UpdateFinanceRequest>,
) -> ApiResult<Updated<FinanceDto>> {
    let outcome = services.finance.update(&caller, id, request.into()).await?;
    ok(Updated::from_outcome(outcome))
}

#[utoipa::path(
    put,
    path = "/clientadmin/finance/{id}/status",
    tag = "Finance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Finance ID")),
    request_body = StatusRequest,
    responses((status = 200, description = "Status set", body = ApiResponse<Updated<FinanceDto>>))
)]
pub async fn set_finance_status(
    State(services): State<AdminServices>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<StatusRequest>,
) -> ApiResult<Updated<FinanceDto>> {
    let outcome = services
        .finance
        .set_active(&caller, id, request.status)
        .await?;
    ok(Updated::from_outcome(outcome))
}
