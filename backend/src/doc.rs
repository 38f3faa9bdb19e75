//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint of the inbound layer together with
//! the request and response bodies they exchange. Swagger UI serves it under
//! `/docs` in debug builds.

use utoipa::OpenApi;

use crate::domain::{
    Address, CatalogDevice, Customer, DashboardReport, Device, DeviceConsumption, EnrolledDevice,
    EnrolledDeviceOverview, EnrolledDeviceView, Error, ErrorCode, HourlyPrice, LocationDetails,
    ServiceLocation, ServiceLocationCost,
};
use crate::inbound::http::accounts::{CustomerDetailsResponse, LoginRequest, RegisterRequest};
use crate::inbound::http::enrolled_devices::EnrolledDeviceRequest;
use crate::inbound::http::service_locations::{ServiceLocationRequest, ServiceLocationsResponse};

/// OpenAPI document for the dashboard REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "SHEMS dashboard API",
        description = "Customer accounts, service locations, enrolled devices and monthly energy reports."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::register,
        crate::inbound::http::dashboard::get_dashboard,
        crate::inbound::http::service_locations::get_service_locations,
        crate::inbound::http::service_locations::add_service_location,
        crate::inbound::http::service_locations::update_service_location,
        crate::inbound::http::service_locations::delete_service_location,
        crate::inbound::http::enrolled_devices::get_enrolled_devices,
        crate::inbound::http::enrolled_devices::add_enrolled_device,
        crate::inbound::http::enrolled_devices::update_enrolled_device,
        crate::inbound::http::enrolled_devices::delete_enrolled_device,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        LoginRequest,
        RegisterRequest,
        Customer,
        CustomerDetailsResponse,
        Address,
        LocationDetails,
        ServiceLocation,
        ServiceLocationRequest,
        ServiceLocationsResponse,
        Device,
        CatalogDevice,
        EnrolledDevice,
        EnrolledDeviceView,
        EnrolledDeviceOverview,
        EnrolledDeviceRequest,
        DashboardReport,
        ServiceLocationCost,
        HourlyPrice,
        DeviceConsumption,
    )),
    tags(
        (name = "accounts", description = "Registration and login"),
        (name = "dashboard", description = "Monthly energy report"),
        (name = "service-locations", description = "Addresses a customer holds"),
        (name = "enrolled-devices", description = "Devices activated at service locations"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/login")]
    #[case("/register")]
    #[case("/dashboard")]
    #[case("/dashboard/getServiceLocations")]
    #[case("/dashboard/addServiceLocation")]
    #[case("/dashboard/updateServiceLocation")]
    #[case("/dashboard/deleteServiceLocation")]
    #[case("/dashboard/getEnrolledDevices")]
    #[case("/dashboard/addEnrolledDevice")]
    #[case("/dashboard/updateEnrolledDevice")]
    #[case("/dashboard/deleteEnrolledDevice")]
    #[case("/health/ready")]
    #[case("/health/live")]
    fn documents_every_route(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    #[case("Error")]
    #[case("DashboardReport")]
    #[case("ServiceLocationRequest")]
    #[case("EnrolledDeviceOverview")]
    fn registers_body_schemas(#[case] name: &str) {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.schemas.contains_key(name), "missing {name}");
    }

    #[rstest]
    fn serialises_to_json() {
        let json = ApiDoc::openapi().to_json().expect("openapi json");
        assert!(json.contains("getEnrolledDevices"));
    }
}
