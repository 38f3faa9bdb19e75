//! Enrolled device HTTP handlers.
//!
//! ```text
//! GET    /dashboard/getEnrolledDevices?customerId=
//! POST   /dashboard/addEnrolledDevice
//! PUT    /dashboard/updateEnrolledDevice
//! DELETE /dashboard/deleteEnrolledDevice?customerId=&enrolledDeviceId=
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    CustomerId, DeviceId, EnrolledDeviceDraft, EnrolledDeviceId, EnrolledDeviceOverview,
    EnrolledDeviceUpdate, Error, ServiceLocationId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::service_locations::CustomerParams;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{body_id, required_id};

/// Enrolled device body shared by add and update. `id` is only read on
/// update.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct EnrolledDeviceRequest {
    pub id: i32,
    pub customer_id: i32,
    pub service_location_id: i32,
    pub device_id: i32,
    pub alias_name: String,
    pub room_number: i32,
}

impl EnrolledDeviceRequest {
    fn into_draft(self) -> Result<EnrolledDeviceDraft, Error> {
        Ok(EnrolledDeviceDraft {
            customer_id: body_id::<CustomerId>(self.customer_id)?,
            service_location_id: body_id::<ServiceLocationId>(self.service_location_id)?,
            device_id: body_id::<DeviceId>(self.device_id)?,
            alias_name: self.alias_name,
            room_number: self.room_number,
        })
    }

    fn into_update(self) -> Result<EnrolledDeviceUpdate, Error> {
        let id: EnrolledDeviceId = body_id(self.id)?;
        Ok(EnrolledDeviceUpdate {
            id,
            draft: self.into_draft()?,
        })
    }
}

/// Query parameters naming one of a customer's enrolled devices.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct EnrolledDeviceParams {
    pub customer_id: Option<String>,
    pub enrolled_device_id: Option<String>,
}

/// Enrolled devices, the device catalog and the customer's locations.
#[utoipa::path(
    get,
    path = "/dashboard/getEnrolledDevices",
    params(CustomerParams),
    responses(
        (status = 200, description = "Enrolled device overview", body = EnrolledDeviceOverview),
        (status = 400, description = "Invalid customer id", body = Error)
    ),
    tags = ["enrolled-devices"],
    operation_id = "getEnrolledDevices"
)]
#[get("/dashboard/getEnrolledDevices")]
pub async fn get_enrolled_devices(
    state: web::Data<HttpState>,
    params: web::Query<CustomerParams>,
) -> ApiResult<web::Json<EnrolledDeviceOverview>> {
    let customer: CustomerId = required_id(params.customer_id.as_deref())?;
    let overview = state.enrolled_devices_query.overview(customer).await?;
    Ok(web::Json(overview))
}

/// Enroll a catalog device at a service location.
#[utoipa::path(
    post,
    path = "/dashboard/addEnrolledDevice",
    request_body = EnrolledDeviceRequest,
    responses(
        (status = 200, description = "Device enrolled", body = String),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Service location not owned", body = Error),
        (status = 423, description = "Another add is in progress", body = Error)
    ),
    tags = ["enrolled-devices"],
    operation_id = "addEnrolledDevice"
)]
#[post("/dashboard/addEnrolledDevice")]
pub async fn add_enrolled_device(
    state: web::Data<HttpState>,
    payload: web::Json<EnrolledDeviceRequest>,
) -> ApiResult<HttpResponse> {
    let draft = payload.into_inner().into_draft()?;
    state.enrolled_devices.add(draft).await?;
    Ok(HttpResponse::Ok().body("Device enrolled successfully"))
}

/// Move or rename an enrolled device.
#[utoipa::path(
    put,
    path = "/dashboard/updateEnrolledDevice",
    request_body = EnrolledDeviceRequest,
    responses(
        (status = 200, description = "Enrolled device updated", body = String),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Device or target location not owned", body = Error),
        (status = 423, description = "Another update is in progress", body = Error)
    ),
    tags = ["enrolled-devices"],
    operation_id = "updateEnrolledDevice"
)]
#[put("/dashboard/updateEnrolledDevice")]
pub async fn update_enrolled_device(
    state: web::Data<HttpState>,
    payload: web::Json<EnrolledDeviceRequest>,
) -> ApiResult<HttpResponse> {
    let update = payload.into_inner().into_update()?;
    state.enrolled_devices.update(update).await?;
    Ok(HttpResponse::Ok().body("Enrolled device updated successfully"))
}

/// Soft-delete an enrolled device.
#[utoipa::path(
    delete,
    path = "/dashboard/deleteEnrolledDevice",
    params(EnrolledDeviceParams),
    responses(
        (status = 200, description = "Enrolled device deleted", body = String),
        (status = 400, description = "Invalid ids", body = Error),
        (status = 404, description = "Not owned by the customer", body = Error)
    ),
    tags = ["enrolled-devices"],
    operation_id = "deleteEnrolledDevice"
)]
#[delete("/dashboard/deleteEnrolledDevice")]
pub async fn delete_enrolled_device(
    state: web::Data<HttpState>,
    params: web::Query<EnrolledDeviceParams>,
) -> ApiResult<HttpResponse> {
    let customer: CustomerId = required_id(params.customer_id.as_deref())?;
    let id: EnrolledDeviceId = required_id(params.enrolled_device_id.as_deref())?;
    state.enrolled_devices.delete(customer, id).await?;
    Ok(HttpResponse::Ok().body("Enrolled device deleted successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Device;
    use crate::inbound::http::error::{json_config, query_config};
    use crate::inbound::http::test_utils::MockPorts;
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;
    use actix_web::{App, test as actix_test};
    use rstest::{fixture, rstest};
    use serde_json::{Value, json};

    #[fixture]
    fn body() -> Value {
        json!({
            "id": 12,
            "customerId": 7,
            "serviceLocationId": 3,
            "deviceId": 2,
            "aliasName": "Hall thermostat",
            "roomNumber": 1
        })
    }

    async fn call(ports: MockPorts, request: TestRequest) -> (StatusCode, String) {
        let app = actix_test::init_service(
            App::new()
                .app_data(ports.into_state())
                .app_data(json_config())
                .app_data(query_config())
                .service(get_enrolled_devices)
                .service(add_enrolled_device)
                .service(update_enrolled_device)
                .service(delete_enrolled_device),
        )
        .await;
        let response = actix_test::call_service(&app, request.to_request()).await;
        let status = response.status();
        let bytes = actix_test::read_body(response).await;
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    #[rstest]
    #[actix_web::test]
    async fn overview_is_returned_as_json() {
        let mut ports = MockPorts::default();
        ports
            .enrolled_devices_query
            .expect_overview()
            .withf(|customer| customer.get() == 7)
            .return_once(|_| {
                Ok(EnrolledDeviceOverview::assemble(
                    Vec::new(),
                    vec![Device {
                        id: DeviceId::new(2).expect("id"),
                        device_type: "Thermostat".into(),
                        model_number: "T-100".into(),
                    }],
                    Vec::new(),
                ))
            });

        let (status, body) = call(
            ports,
            TestRequest::get().uri("/dashboard/getEnrolledDevices?customerId=7"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let value: Value = serde_json::from_str(&body).expect("json");
        assert_eq!(value["devices"][0]["modelNumber"], "T-100");
        assert_eq!(value["devices"][0]["deviceName"], "T-100 (Thermostat)");
        assert_eq!(value["enrolledDevices"], json!([]));
    }

    #[rstest]
    #[actix_web::test]
    async fn add_maps_every_id(body: Value) {
        let mut ports = MockPorts::default();
        ports
            .enrolled_devices
            .expect_add()
            .withf(|draft| {
                draft.customer_id.get() == 7
                    && draft.service_location_id.get() == 3
                    && draft.device_id.get() == 2
                    && draft.alias_name == "Hall thermostat"
            })
            .times(1)
            .return_once(|_| Ok(EnrolledDeviceId::new(12).expect("id")));

        let (status, text) = call(
            ports,
            TestRequest::post()
                .uri("/dashboard/addEnrolledDevice")
                .set_json(body),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(text, "Device enrolled successfully");
    }

    #[rstest]
    #[case("customerId", "Customer Id cannot be 0")]
    #[case("serviceLocationId", "Service Location Id cannot be 0")]
    #[case("deviceId", "Device Id cannot be 0")]
    #[actix_web::test]
    async fn add_rejects_missing_ids(
        mut body: Value,
        #[case] field: &str,
        #[case] message: &str,
    ) {
        body.as_object_mut().expect("object").remove(field);

        let (status, text) = call(
            MockPorts::default(),
            TestRequest::post()
                .uri("/dashboard/addEnrolledDevice")
                .set_json(body),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let value: Value = serde_json::from_str(&text).expect("json");
        assert_eq!(value["message"], message);
        assert_eq!(value["details"]["field"], field);
    }

    #[rstest]
    #[actix_web::test]
    async fn update_requires_enrolled_device_id(mut body: Value) {
        body["id"] = json!(0);

        let (status, text) = call(
            MockPorts::default(),
            TestRequest::put()
                .uri("/dashboard/updateEnrolledDevice")
                .set_json(body),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(text.contains("Enrolled Device Id cannot be 0"));
    }

    #[rstest]
    #[actix_web::test]
    async fn update_of_unowned_device_is_not_found(body: Value) {
        let mut ports = MockPorts::default();
        ports
            .enrolled_devices
            .expect_update()
            .withf(|update| update.id.get() == 12)
            .return_once(|_| Err(Error::not_found("Enrolled Device does not exist")));

        let (status, text) = call(
            ports,
            TestRequest::put()
                .uri("/dashboard/updateEnrolledDevice")
                .set_json(body),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(text.contains("Enrolled Device does not exist"));
    }

    #[rstest]
    #[actix_web::test]
    async fn delete_answers_in_plain_text() {
        let mut ports = MockPorts::default();
        ports
            .enrolled_devices
            .expect_delete()
            .withf(|customer, id| customer.get() == 7 && id.get() == 12)
            .times(1)
            .return_once(|_, _| Ok(()));

        let (status, text) = call(
            ports,
            TestRequest::delete()
                .uri("/dashboard/deleteEnrolledDevice?customerId=7&enrolledDeviceId=12"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(text, "Enrolled device deleted successfully");
    }

    #[rstest]
    #[actix_web::test]
    async fn delete_without_device_id_is_rejected() {
        let (status, text) = call(
            MockPorts::default(),
            TestRequest::delete().uri("/dashboard/deleteEnrolledDevice?customerId=7"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(text.contains("Enrolled Device Id cannot be empty"));
    }
}
