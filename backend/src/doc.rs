//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every HTTP endpoint and request/response schema
//! into one generated specification. Debug builds serve the JSON at
//! `/api-docs/openapi.json`; release builds omit the route.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::registrations::{
    NewRegistrationRequest, RegistrationView, RegistrationsResponse, UpdateRegistrationRequest,
};
use crate::inbound::http::users::{LoginForm, MeResponse, RegisterRequest, TokenResponse};
use crate::inbound::http::vehicles::{
    CarsResponse, NewVehicleRequest, UpdateVehicleRequest, VehicleView,
};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Access token issued by POST /auth/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Vehicle registry API",
        description = "HTTP interface for vehicles, registrations, and account management."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::me,
        crate::inbound::http::vehicles::add_car,
        crate::inbound::http::vehicles::get_cars,
        crate::inbound::http::vehicles::search_cars,
        crate::inbound::http::vehicles::update_car,
        crate::inbound::http::vehicles::delete_car,
        crate::inbound::http::registrations::add_registration,
        crate::inbound::http::registrations::get_registrations,
        crate::inbound::http::registrations::search_registrations,
        crate::inbound::http::registrations::update_registration,
        crate::inbound::http::registrations::delete_registration,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        RegisterRequest,
        LoginForm,
        TokenResponse,
        MeResponse,
        NewVehicleRequest,
        UpdateVehicleRequest,
        VehicleView,
        CarsResponse,
        NewRegistrationRequest,
        UpdateRegistrationRequest,
        RegistrationView,
        RegistrationsResponse,
    )),
    tags(
        (name = "auth", description = "Account registration and token issue"),
        (name = "cars", description = "Vehicle collection"),
        (name = "registrations", description = "Registration collection"),
        (name = "health", description = "Probes for orchestration")
    )
)]
pub struct ApiDoc;
