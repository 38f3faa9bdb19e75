//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;
pub use state_builders::{Adapters, build_http_state};

use actix_cors::Cors;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header;
use actix_web::{App, HttpServer, web};

use shems::Trace;
#[cfg(debug_assertions)]
use shems::doc::ApiDoc;
use shems::inbound::http::accounts::{login, register};
use shems::inbound::http::dashboard::get_dashboard;
use shems::inbound::http::enrolled_devices::{
    add_enrolled_device, delete_enrolled_device, get_enrolled_devices, update_enrolled_device,
};
use shems::inbound::http::error::{json_config, query_config};
use shems::inbound::http::health::{HealthState, live, ready};
use shems::inbound::http::service_locations::{
    add_service_location, delete_service_location, get_service_locations,
    update_service_location,
};
use shems::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    cors_allowed_origin: String,
}

fn cors_policy(origin: &str) -> Cors {
    Cors::default()
        .allowed_origin(origin)
        .allowed_methods(["GET", "POST", "PUT", "DELETE"])
        .allowed_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .supports_credentials()
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        cors_allowed_origin,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(json_config())
        .app_data(query_config())
        .wrap(cors_policy(&cors_allowed_origin))
        .wrap(Trace)
        .service(login)
        .service(register)
        .service(get_dashboard)
        .service(get_service_locations)
        .service(add_service_location)
        .service(update_service_location)
        .service(delete_service_location)
        .service(get_enrolled_devices)
        .service(add_enrolled_device)
        .service(update_enrolled_device)
        .service(delete_enrolled_device)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server serving `http_state`.
///
/// Readiness flips to healthy once the listener is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    http_state: HttpState,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let ServerConfig {
        bind_addr,
        cors_allowed_origin,
    } = config;
    let deps = AppDependencies {
        health_state: health_state.clone(),
        http_state: web::Data::new(http_state),
        cors_allowed_origin,
    };

    let server = HttpServer::new(move || build_app(deps.clone()))
        .bind(bind_addr)?
        .run();

    health_state.mark_ready();
    Ok(server)
}
