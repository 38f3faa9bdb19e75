//! Dashboard HTTP handler.
//!
//! ```text
//! GET /dashboard?customerId=7&currentDate=02/17/2024
//! ```

use actix_web::{get, web};
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;

use crate::domain::{BillingPeriod, CustomerId, DashboardReport, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{billing_date_error, required_id};

/// Query parameters accepted by the dashboard endpoint.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DashboardParams {
    /// Customer whose locations are reported.
    pub customer_id: Option<String>,
    /// Any day of the billing month, `MM/DD/YYYY`.
    pub current_date: Option<String>,
}

fn billing_period(raw: Option<&str>) -> Result<BillingPeriod, Error> {
    let raw = raw.filter(|value| !value.trim().is_empty()).ok_or_else(|| {
        Error::invalid_request("currentDate cannot be empty")
            .with_details(json!({ "field": "currentDate", "code": "missing_field" }))
    })?;
    BillingPeriod::containing(raw).map_err(billing_date_error)
}

/// Energy cost and consumption report for one billing month.
#[utoipa::path(
    get,
    path = "/dashboard",
    params(DashboardParams),
    responses(
        (status = 200, description = "Dashboard report", body = DashboardReport),
        (status = 400, description = "Invalid customer id or date", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["dashboard"],
    operation_id = "getDashboard"
)]
#[get("/dashboard")]
pub async fn get_dashboard(
    state: web::Data<HttpState>,
    params: web::Query<DashboardParams>,
) -> ApiResult<web::Json<DashboardReport>> {
    let params = params.into_inner();
    let customer: CustomerId = required_id(params.customer_id.as_deref())?;
    let period = billing_period(params.current_date.as_deref())?;
    let report = state.dashboard.dashboard(customer, period).await?;
    Ok(web::Json(report))
}
