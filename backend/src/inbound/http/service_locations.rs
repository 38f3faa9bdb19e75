//! Service location HTTP handlers.
//!
//! ```text
//! GET    /dashboard/getServiceLocations?customerId=
//! POST   /dashboard/addServiceLocation
//! PUT    /dashboard/updateServiceLocation
//! DELETE /dashboard/deleteServiceLocation?customerId=&serviceLocationId=
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    Address, CustomerId, Error, LocationDetails, ServiceLocation, ServiceLocationDraft,
    ServiceLocationId, ServiceLocationUpdate,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{body_id, required_id};

/// Format of `dateTakenOver` in request bodies.
const DATE_TAKEN_OVER_FORMAT: &str = "%Y-%m-%d";

/// Service location body shared by add and update. `id` is only read on
/// update.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ServiceLocationRequest {
    pub id: i32,
    pub customer_id: i32,
    /// `YYYY-MM-DD`.
    #[schema(example = "2024-01-15")]
    pub date_taken_over: String,
    pub occupants_count: i32,
    pub unit_number: i32,
    pub street: i32,
    pub city: String,
    pub state: String,
    pub zipcode: i32,
    pub country: String,
    pub square_footage: f32,
    pub bedrooms_count: i32,
}

impl ServiceLocationRequest {
    fn into_draft(self) -> Result<ServiceLocationDraft, Error> {
        let customer_id: CustomerId = body_id(self.customer_id)?;
        let date_taken_over =
            NaiveDate::parse_from_str(self.date_taken_over.trim(), DATE_TAKEN_OVER_FORMAT)
                .map_err(|_| {
                    Error::invalid_request("dateTakenOver must use the YYYY-MM-DD format")
                        .with_details(json!({
                            "field": "dateTakenOver",
                            "value": self.date_taken_over,
                            "code": "invalid_date",
                        }))
                })?;
        Ok(ServiceLocationDraft {
            customer_id,
            date_taken_over,
            occupants_count: self.occupants_count,
            details: LocationDetails {
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
            },
        })
    }

    fn into_update(self) -> Result<ServiceLocationUpdate, Error> {
        let id: ServiceLocationId = body_id(self.id)?;
        Ok(ServiceLocationUpdate {
            id,
            draft: self.into_draft()?,
        })
    }
}

/// Query parameters naming a customer.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CustomerParams {
    pub customer_id: Option<String>,
}

/// Query parameters naming one of a customer's service locations.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ServiceLocationParams {
    pub customer_id: Option<String>,
    pub service_location_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceLocationsResponse {
    pub service_locations: Vec<ServiceLocation>,
}

/// List the customer's service locations.
#[utoipa::path(
    get,
    path = "/dashboard/getServiceLocations",
    params(CustomerParams),
    responses(
        (status = 200, description = "Service locations", body = ServiceLocationsResponse),
        (status = 400, description = "Invalid customer id", body = Error)
    ),
    tags = ["service-locations"],
    operation_id = "getServiceLocations"
)]
#[get("/dashboard/getServiceLocations")]
pub async fn get_service_locations(
    state: web::Data<HttpState>,
    params: web::Query<CustomerParams>,
) -> ApiResult<web::Json<ServiceLocationsResponse>> {
    let customer: CustomerId = required_id(params.customer_id.as_deref())?;
    let service_locations = state.service_locations_query.list(customer).await?;
    Ok(web::Json(ServiceLocationsResponse { service_locations }))
}

/// Register a new service location.
#[utoipa::path(
    post,
    path = "/dashboard/addServiceLocation",
    request_body = ServiceLocationRequest,
    responses(
        (status = 200, description = "Service location added", body = String),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Already registered at this address", body = Error),
        (status = 423, description = "Another add is in progress", body = Error)
    ),
    tags = ["service-locations"],
    operation_id = "addServiceLocation"
)]
#[post("/dashboard/addServiceLocation")]
pub async fn add_service_location(
    state: web::Data<HttpState>,
    payload: web::Json<ServiceLocationRequest>,
) -> ApiResult<HttpResponse> {
    let draft = payload.into_inner().into_draft()?;
    state.service_locations.add(draft).await?;
    Ok(HttpResponse::Ok().body("Service location added successfully"))
}

/// Change the address or occupancy of a service location.
#[utoipa::path(
    put,
    path = "/dashboard/updateServiceLocation",
    request_body = ServiceLocationRequest,
    responses(
        (status = 200, description = "Service location updated", body = String),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Not owned by the customer", body = Error),
        (status = 409, description = "Address used by another service location", body = Error),
        (status = 423, description = "Another update is in progress", body = Error)
    ),
    tags = ["service-locations"],
    operation_id = "updateServiceLocation"
)]
#[put("/dashboard/updateServiceLocation")]
pub async fn update_service_location(
    state: web::Data<HttpState>,
    payload: web::Json<ServiceLocationRequest>,
) -> ApiResult<HttpResponse> {
    let update = payload.into_inner().into_update()?;
    state.service_locations.update(update).await?;
    Ok(HttpResponse::Ok().body("Service location updated successfully"))
}

/// Soft-delete a service location.
#[utoipa::path(
    delete,
    path = "/dashboard/deleteServiceLocation",
    params(ServiceLocationParams),
    responses(
        (status = 200, description = "Service location deleted", body = String),
        (status = 400, description = "Invalid ids", body = Error),
        (status = 404, description = "Not owned by the customer", body = Error)
    ),
    tags = ["service-locations"],
    operation_id = "deleteServiceLocation"
)]
#[delete("/dashboard/deleteServiceLocation")]
pub async fn delete_service_location(
    state: web::Data<HttpState>,
    params: web::Query<ServiceLocationParams>,
) -> ApiResult<HttpResponse> {
    let customer: CustomerId = required_id(params.customer_id.as_deref())?;
    let id: ServiceLocationId = required_id(params.service_location_id.as_deref())?;
    state.service_locations.delete(customer, id).await?;
    Ok(HttpResponse::Ok().body("Service location deleted successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LocationId;
    use crate::inbound::http::error::{json_config, query_config};
    use crate::inbound::http::test_utils::MockPorts;
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;
    use actix_web::{App, test as actix_test};
    use rstest::{fixture, rstest};
    use serde_json::Value;

    #[fixture]
    fn body() -> Value {
        json!({
            "id": 3,
            "customerId": 7,
            "dateTakenOver": "2024-01-15",
            "occupantsCount": 2,
            "unitNumber": 5,
            "street": 100,
            "city": "Springfield",
            "state": "IL",
            "zipcode": 62704,
            "country": "US",
            "squareFootage": 1200.0,
            "bedroomsCount": 3
        })
    }

    async fn call(ports: MockPorts, request: TestRequest) -> (StatusCode, String) {
        let app = actix_test::init_service(
            App::new()
                .app_data(ports.into_state())
                .app_data(json_config())
                .app_data(query_config())
                .service(get_service_locations)
                .service(add_service_location)
                .service(update_service_location)
                .service(delete_service_location),
        )
        .await;
        let response = actix_test::call_service(&app, request.to_request()).await;
        let status = response.status();
        let bytes = actix_test::read_body(response).await;
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    #[rstest]
    #[actix_web::test]
    async fn lists_locations_under_service_locations_key() {
        let mut ports = MockPorts::default();
        ports
            .service_locations_query
            .expect_list()
            .withf(|customer| customer.get() == 7)
            .return_once(|customer| {
                Ok(vec![ServiceLocation {
                    id: ServiceLocationId::new(3).expect("id"),
                    customer_id: customer,
                    location_id: LocationId::new(9).expect("id"),
                    date_taken_over: NaiveDate::from_ymd_opt(2024, 1, 15).expect("date"),
                    occupants_count: 2,
                    details: LocationDetails {
                        address: Address {
                            unit_number: 5,
                            street: 100,
                            city: "Springfield".into(),
                            state: "IL".into(),
                            zipcode: 62704,
                            country: "US".into(),
                        },
                        square_footage: 1200.0,
                        bedrooms_count: 3,
                    },
                    active: true,
                }])
            });

        let (status, body) = call(
            ports,
            TestRequest::get().uri("/dashboard/getServiceLocations?customerId=7"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let value: Value = serde_json::from_str(&body).expect("json");
        assert_eq!(value["serviceLocations"][0]["id"], 3);
        assert_eq!(value["serviceLocations"][0]["dateTakenOver"], "2024-01-15");
        assert_eq!(value["serviceLocations"][0]["city"], "Springfield");
    }

    #[rstest]
    #[actix_web::test]
    async fn add_builds_a_draft_and_answers_in_plain_text(body: Value) {
        let mut ports = MockPorts::default();
        ports
            .service_locations
            .expect_add()
            .withf(|draft| {
                draft.customer_id.get() == 7
                    && draft.occupants_count == 2
                    && draft.details.address.street == 100
                    && draft.date_taken_over == NaiveDate::from_ymd_opt(2024, 1, 15).expect("date")
            })
            .times(1)
            .return_once(|_| Ok(ServiceLocationId::new(3).expect("id")));

        let (status, text) = call(
            ports,
            TestRequest::post()
                .uri("/dashboard/addServiceLocation")
                .set_json(body),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(text, "Service location added successfully");
    }

    #[rstest]
    #[actix_web::test]
    async fn add_without_customer_is_rejected(mut body: Value) {
        body["customerId"] = json!(0);

        let (status, text) = call(
            MockPorts::default(),
            TestRequest::post()
                .uri("/dashboard/addServiceLocation")
                .set_json(body),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(text.contains("Customer Id cannot be 0"));
    }

    #[rstest]
    #[actix_web::test]
    async fn add_while_locked_reports_423(body: Value) {
        let mut ports = MockPorts::default();
        ports.service_locations.expect_add().return_once(|_| {
            Err(Error::locked(
                "Request is already being processed. Please try again later",
            ))
        });

        let (status, _) = call(
            ports,
            TestRequest::post()
                .uri("/dashboard/addServiceLocation")
                .set_json(body),
        )
        .await;

        assert_eq!(status, StatusCode::LOCKED);
    }

    #[rstest]
    #[actix_web::test]
    async fn update_requires_a_service_location_id(mut body: Value) {
        body.as_object_mut().expect("object").remove("id");

        let (status, text) = call(
            MockPorts::default(),
            TestRequest::put()
                .uri("/dashboard/updateServiceLocation")
                .set_json(body),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(text.contains("Service Location Id cannot be 0"));
    }

    #[rstest]
    #[actix_web::test]
    async fn update_passes_the_id_through(body: Value) {
        let mut ports = MockPorts::default();
        ports
            .service_locations
            .expect_update()
            .withf(|update| update.id.get() == 3 && update.draft.customer_id.get() == 7)
            .times(1)
            .return_once(|_| Ok(()));

        let (status, text) = call(
            ports,
            TestRequest::put()
                .uri("/dashboard/updateServiceLocation")
                .set_json(body),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(text, "Service location updated successfully");
    }

    #[rstest]
    #[actix_web::test]
    async fn bad_date_is_rejected(mut body: Value) {
        body["dateTakenOver"] = json!("01/15/2024");

        let (status, text) = call(
            MockPorts::default(),
            TestRequest::post()
                .uri("/dashboard/addServiceLocation")
                .set_json(body),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(text.contains("dateTakenOver"));
    }

    #[rstest]
    #[case(
        "/dashboard/deleteServiceLocation?serviceLocationId=3",
        "Customer Id cannot be empty"
    )]
    #[case(
        "/dashboard/deleteServiceLocation?customerId=7",
        "Service Location Id cannot be empty"
    )]
    #[case(
        "/dashboard/deleteServiceLocation?customerId=7&serviceLocationId=0",
        "Service Location Id cannot be 0"
    )]
    #[actix_web::test]
    async fn delete_validates_query_ids(#[case] uri: &str, #[case] message: &str) {
        let (status, text) = call(MockPorts::default(), TestRequest::delete().uri(uri)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let value: Value = serde_json::from_str(&text).expect("json");
        assert_eq!(value["message"], message);
    }

    #[rstest]
    #[actix_web::test]
    async fn delete_of_unowned_location_is_not_found() {
        let mut ports = MockPorts::default();
        ports
            .service_locations
            .expect_delete()
            .withf(|customer, id| customer.get() == 7 && id.get() == 99)
            .return_once(|_, _| Err(Error::not_found("Service Location does not exist")));

        let (status, _) = call(
            ports,
            TestRequest::delete()
                .uri("/dashboard/deleteServiceLocation?customerId=7&serviceLocationId=99"),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
