//! Account HTTP handlers.
//!
//! ```text
//! POST /login     Verify credentials and return the customer record
//! POST /register  Create a customer and its billing location
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Address, Customer, CustomerProfile, CustomerRegistration, Error, LocationDetails,
    LoginCredentials,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::account_field_error;

/// Login request body.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Registration request body. Missing fields read as empty or zero.
#[derive(Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub email: String,
    pub password: String,
    pub unit_number: i32,
    pub street: i32,
    pub city: String,
    pub state: String,
    pub zipcode: i32,
    pub country: String,
    pub square_footage: f32,
    pub bedrooms_count: i32,
}

impl RegisterRequest {
    fn into_registration(self) -> Result<CustomerRegistration, Error> {
        let profile = CustomerProfile {
            first_name: self.first_name,
            last_name: self.last_name,
            phone_number: self.phone_number,
        };
        let billing_location = LocationDetails {
            address: Address {
                unit_number: self.unit_number,
                street: self.street,
                city: self.city,
                state: self.state,
                zipcode: self.zipcode,
                country: self.country,
            },
            square_footage: self.square_footage,
            bedrooms_count: self.bedrooms_count,
        };
        CustomerRegistration::try_new(profile, &self.email, &self.password, billing_location)
            .map_err(account_field_error)
    }
}

/// Customer record wrapper returned by login and registration.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetailsResponse {
    pub customer_details: Customer,
}

/// Authenticate with email and password.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials verified", body = CustomerDetailsResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid password", body = Error),
        (status = 404, description = "Unknown email", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "login"
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<CustomerDetailsResponse>> {
    let LoginRequest { email, password } = payload.into_inner();
    let credentials =
        LoginCredentials::try_from_parts(&email, &password).map_err(account_field_error)?;
    let customer = state.accounts.login(credentials).await?;
    Ok(web::Json(CustomerDetailsResponse {
        customer_details: customer,
    }))
}

/// Register a new customer.
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Customer created", body = CustomerDetailsResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "register"
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<web::Json<CustomerDetailsResponse>> {
    let registration = payload.into_inner().into_registration()?;
    let customer = state.accounts.register(registration).await?;
    Ok(web::Json(CustomerDetailsResponse {
        customer_details: customer,
    }))
}
