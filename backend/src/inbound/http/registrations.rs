//! Registration API handlers.
//!
//! ```text
//! POST   /regdb/add_registration
//! GET    /regdb/get_registrations
//! GET    /regdb/search_registrations?query=petrov
//! PUT    /regdb/update_registration/{license_plate}
//! DELETE /regdb/delete_registration/{license_plate}
//! ```
//!
//! Registrations and vehicles share the plate key domain but are
//! independent collections; adding a registration does not require a
//! matching car.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::domain::{
    Error, LicensePlate, OwnerAddress, OwnerName, Registration, RegistrationChanges,
    RegistrationValidationError, SearchQuery, StoreError, YearOfManufacture,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::{Identity, ReadAccess};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::vehicles::SearchParams;

/// Request body for `POST /regdb/add_registration`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct NewRegistrationRequest {
    /// Canonical plate, e.g. `A123BC77`.
    pub license_plate: String,
    /// Registered owner, 1–50 characters, Latin or Cyrillic.
    pub owner_name: String,
    /// Owner address, 1–100 characters.
    pub owner_address: String,
    /// Year between 1900 and the current calendar year.
    pub year_of_manufacture: i32,
}

/// Request body for `PUT /regdb/update_registration/{license_plate}`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct UpdateRegistrationRequest {
    /// Replacement owner name, when present.
    pub owner_name: Option<String>,
    /// Replacement owner address, when present.
    pub owner_address: Option<String>,
    /// Replacement year of manufacture, when present.
    pub year_of_manufacture: Option<i32>,
    /// Always rejected; present only to catch key-change attempts.
    pub license_plate: Option<String>,
}

/// Stored registration as returned to clients.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RegistrationView {
    /// Surrogate identifier.
    pub id: Uuid,
    /// Business key.
    pub license_plate: String,
    /// Registered owner.
    pub owner_name: String,
    /// Owner address.
    pub owner_address: String,
    /// Year of manufacture.
    pub year_of_manufacture: i32,
}

impl From<Registration> for RegistrationView {
    fn from(registration: Registration) -> Self {
        Self {
            id: registration.id(),
            license_plate: registration.license_plate().as_ref().to_owned(),
            owner_name: registration.owner_name().as_ref().to_owned(),
            owner_address: registration.owner_address().as_ref().to_owned(),
            year_of_manufacture: registration.year_of_manufacture().get(),
        }
    }
}

/// Registration collection response.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RegistrationsResponse {
    /// Matching registrations, order unspecified.
    pub registrations: Vec<RegistrationView>,
}

fn map_registration_validation(err: RegistrationValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({ "field": err.field() }))
}

fn parse_plate(raw: &str) -> Result<LicensePlate, Error> {
    LicensePlate::new(raw).map_err(|err| {
        Error::invalid_request(err.to_string()).with_details(json!({ "field": "license_plate" }))
    })
}

fn collect_registrations(records: Vec<Registration>) -> RegistrationsResponse {
    RegistrationsResponse {
        registrations: records.into_iter().map(RegistrationView::from).collect(),
    }
}

/// Add a registration to the collection.
#[utoipa::path(
    post,
    path = "/regdb/add_registration",
    request_body = NewRegistrationRequest,
    responses(
        (status = 200, description = "Registration added"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 409, description = "Plate already registered", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["registrations"],
    operation_id = "addRegistration"
)]
#[post("/add_registration")]
pub async fn add_registration(
    state: web::Data<HttpState>,
    _identity: Identity,
    payload: web::Json<NewRegistrationRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let plate = parse_plate(&payload.license_plate)?;
    let owner_name = OwnerName::new(payload.owner_name).map_err(map_registration_validation)?;
    let owner_address =
        OwnerAddress::new(payload.owner_address).map_err(map_registration_validation)?;
    let year = YearOfManufacture::new(payload.year_of_manufacture)
        .map_err(map_registration_validation)?;

    let registration = Registration::new(plate, owner_name, owner_address, year);
    state
        .registrations
        .insert(&registration)
        .await
        .map_err(|err| match err {
            StoreError::Duplicate { .. } => {
                Error::conflict("a registration with this license plate already exists")
            }
            other => other.into(),
        })?;

    info!(plate = %registration.license_plate(), "registration added");
    Ok(HttpResponse::Ok().json(json!({ "message": "Registration added" })))
}

/// List every registration.
#[utoipa::path(
    get,
    path = "/regdb/get_registrations",
    responses(
        (status = 200, description = "Registrations", body = RegistrationsResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["registrations"],
    operation_id = "getRegistrations"
)]
#[get("/get_registrations")]
pub async fn get_registrations(
    state: web::Data<HttpState>,
    _access: ReadAccess,
) -> ApiResult<web::Json<RegistrationsResponse>> {
    let records = state.registrations.list().await?;
    Ok(web::Json(collect_registrations(records)))
}

/// Search registrations by plate, owner name, or address substring.
#[utoipa::path(
    get,
    path = "/regdb/search_registrations",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching registrations", body = RegistrationsResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["registrations"],
    operation_id = "searchRegistrations"
)]
#[get("/search_registrations")]
pub async fn search_registrations(
    state: web::Data<HttpState>,
    _access: ReadAccess,
    params: web::Query<SearchParams>,
) -> ApiResult<web::Json<RegistrationsResponse>> {
    let query = SearchQuery::new(params.query.as_deref().unwrap_or_default());
    let records = state.registrations.search(&query).await?;
    Ok(web::Json(collect_registrations(records)))
}

/// Merge a partial update into the registration with the given plate.
#[utoipa::path(
    put,
    path = "/regdb/update_registration/{license_plate}",
    request_body = UpdateRegistrationRequest,
    params(("license_plate" = String, Path, description = "Business key of the registration")),
    responses(
        (status = 200, description = "Update outcome"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Plate change attempted", body = Error),
        (status = 404, description = "No registration with that plate", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["registrations"],
    operation_id = "updateRegistration"
)]
#[put("/update_registration/{license_plate}")]
pub async fn update_registration(
    state: web::Data<HttpState>,
    _identity: Identity,
    path: web::Path<String>,
    payload: web::Json<UpdateRegistrationRequest>,
) -> ApiResult<HttpResponse> {
    let plate = parse_plate(&path.into_inner())?;
    let payload = payload.into_inner();
    if payload.license_plate.is_some() {
        return Err(Error::forbidden("license plate cannot be changed")
            .with_details(json!({ "field": "license_plate" })));
    }

    let changes = RegistrationChanges {
        owner_name: payload
            .owner_name
            .map(OwnerName::new)
            .transpose()
            .map_err(map_registration_validation)?,
        owner_address: payload
            .owner_address
            .map(OwnerAddress::new)
            .transpose()
            .map_err(map_registration_validation)?,
        year_of_manufacture: payload
            .year_of_manufacture
            .map(YearOfManufacture::new)
            .transpose()
            .map_err(map_registration_validation)?,
    };

    let modified = state.registrations.update(&plate, &changes).await?;
    info!(plate = %plate, modified, "registration updated");
    Ok(HttpResponse::Ok().json(json!({ "modified": modified })))
}

/// Remove the registration with the given plate.
#[utoipa::path(
    delete,
    path = "/regdb/delete_registration/{license_plate}",
    params(("license_plate" = String, Path, description = "Business key of the registration")),
    responses(
        (status = 200, description = "Registration deleted"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "No registration with that plate", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["registrations"],
    operation_id = "deleteRegistration"
)]
#[delete("/delete_registration/{license_plate}")]
pub async fn delete_registration(
    state: web::Data<HttpState>,
    _identity: Identity,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let plate = parse_plate(&path.into_inner())?;
    state.registrations.delete(&plate).await?;
    info!(plate = %plate, "registration deleted");
    Ok(HttpResponse::Ok().json(json!({ "message": "Registration deleted" })))
}
