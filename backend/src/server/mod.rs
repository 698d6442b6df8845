//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

use crate::auth::TokenCodec;
use crate::domain::{Registration, UserAccount, Vehicle};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::registrations::{
    add_registration, delete_registration, get_registrations, search_registrations,
    update_registration,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::{login, me, register};
use crate::inbound::http::vehicles::{add_car, delete_car, get_cars, search_cars, update_car};
use crate::middleware::RequestId;
use crate::outbound::persistence::{
    DocumentStore, InMemoryStore, SledAccountRepository, SledRegistrationRepository,
    SledVehicleRepository,
};

/// Assemble the repository bundle from configuration.
///
/// A configured data directory opens the sled store; without one the
/// server runs on the in-memory adapters.
///
/// # Errors
/// Returns [`std::io::Error`] when the sled database cannot be opened.
pub fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let tokens = TokenCodec::new(&config.token_secret, config.token_ttl);
    let state = match &config.data_dir {
        Some(path) => {
            info!(path = %path.display(), "opening document store");
            let store = DocumentStore::open(path).map_err(std::io::Error::other)?;
            HttpState {
                vehicles: Arc::new(
                    SledVehicleRepository::new(&store).map_err(std::io::Error::other)?,
                ),
                registrations: Arc::new(
                    SledRegistrationRepository::new(&store).map_err(std::io::Error::other)?,
                ),
                accounts: Arc::new(
                    SledAccountRepository::new(&store).map_err(std::io::Error::other)?,
                ),
                tokens,
                open_reads: config.open_reads,
            }
        }
        None => {
            info!("no data directory configured; records are in-memory");
            HttpState {
                vehicles: Arc::new(InMemoryStore::<Vehicle>::new()),
                registrations: Arc::new(InMemoryStore::<Registration>::new()),
                accounts: Arc::new(InMemoryStore::<UserAccount>::new()),
                tokens,
                open_reads: config.open_reads,
            }
        }
    };
    Ok(web::Data::new(state))
}

/// Build the application with every route mounted.
pub fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let auth = web::scope("/auth")
        .service(register)
        .service(login)
        .service(me);
    let cars = web::scope("/carsdb")
        .service(add_car)
        .service(get_cars)
        .service(search_cars)
        .service(update_car)
        .service(delete_car);
    let registrations = web::scope("/regdb")
        .service(add_registration)
        .service(get_registrations)
        .service(search_registrations)
        .service(update_registration)
        .service(delete_registration);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(RequestId)
        .service(auth)
        .service(cars)
        .service(registrations)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.route("/api-docs/openapi.json", web::get().to(openapi_json));

    app
}

#[cfg(debug_assertions)]
async fn openapi_json() -> web::Json<utoipa::openapi::OpenApi> {
    use utoipa::OpenApi;
    web::Json(crate::doc::ApiDoc::openapi())
}

/// Construct an Actix HTTP server from the provided configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when the store cannot be opened or
/// the socket cannot be bound.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = build_http_state(&config)?;
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone())
    })
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
