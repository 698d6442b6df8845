//! Vehicle API handlers.
//!
//! ```text
//! POST   /carsdb/add_car {"make":"Toyota","model":"Corolla","license_plate":"A123BC77"}
//! GET    /carsdb/get_cars
//! GET    /carsdb/search_cars?query=corol
//! PUT    /carsdb/update_car/{license_plate}
//! DELETE /carsdb/delete_car/{license_plate}
//! ```
//!
//! The license plate is the business key: it is immutable once stored,
//! and an update payload that tries to change it is rejected outright.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::domain::{
    Error, LicensePlate, Make, Model, SearchQuery, StoreError, Vehicle, VehicleChanges,
    VehicleValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::{Identity, ReadAccess};
use crate::inbound::http::state::HttpState;

/// Request body for `POST /carsdb/add_car`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct NewVehicleRequest {
    /// Manufacturer name, 1–50 characters.
    pub make: String,
    /// Model name, 1–50 characters.
    pub model: String,
    /// Canonical plate, e.g. `A123BC77`.
    pub license_plate: String,
}

/// Request body for `PUT /carsdb/update_car/{license_plate}`.
///
/// Absent fields keep their stored values. The plate may not appear at
/// all; the key is fixed at insertion.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct UpdateVehicleRequest {
    /// Replacement make, when present.
    pub make: Option<String>,
    /// Replacement model, when present.
    pub model: Option<String>,
    /// Always rejected; present only to catch key-change attempts.
    pub license_plate: Option<String>,
}

/// Query string for `GET /carsdb/search_cars`.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct SearchParams {
    /// Case-insensitive substring to look for.
    pub query: Option<String>,
}

/// Stored vehicle as returned to clients.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct VehicleView {
    /// Surrogate identifier.
    pub id: Uuid,
    /// Manufacturer name.
    pub make: String,
    /// Model name.
    pub model: String,
    /// Business key.
    pub license_plate: String,
}

impl From<Vehicle> for VehicleView {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id(),
            make: vehicle.make().as_ref().to_owned(),
            model: vehicle.model().as_ref().to_owned(),
            license_plate: vehicle.license_plate().as_ref().to_owned(),
        }
    }
}

/// Vehicle collection response.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CarsResponse {
    /// Matching vehicles, order unspecified.
    pub cars: Vec<VehicleView>,
}

fn map_vehicle_validation(err: VehicleValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({ "field": err.field() }))
}

fn parse_plate(raw: &str) -> Result<LicensePlate, Error> {
    LicensePlate::new(raw).map_err(map_vehicle_validation)
}

fn collect_cars(vehicles: Vec<Vehicle>) -> CarsResponse {
    CarsResponse {
        cars: vehicles.into_iter().map(VehicleView::from).collect(),
    }
}

/// Add a vehicle to the collection.
#[utoipa::path(
    post,
    path = "/carsdb/add_car",
    request_body = NewVehicleRequest,
    responses(
        (status = 200, description = "Car added"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 409, description = "Plate already tracked", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["cars"],
    operation_id = "addCar"
)]
#[post("/add_car")]
pub async fn add_car(
    state: web::Data<HttpState>,
    _identity: Identity,
    payload: web::Json<NewVehicleRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let make = Make::new(payload.make).map_err(map_vehicle_validation)?;
    let model = Model::new(payload.model).map_err(map_vehicle_validation)?;
    let plate = parse_plate(&payload.license_plate)?;

    let vehicle = Vehicle::new(make, model, plate);
    state
        .vehicles
        .insert(&vehicle)
        .await
        .map_err(|err| match err {
            StoreError::Duplicate { .. } => {
                Error::conflict("a car with this license plate already exists")
            }
            other => other.into(),
        })?;

    info!(plate = %vehicle.license_plate(), "car added");
    Ok(HttpResponse::Ok().json(json!({ "message": "Car added" })))
}

/// List every tracked vehicle.
#[utoipa::path(
    get,
    path = "/carsdb/get_cars",
    responses(
        (status = 200, description = "Cars", body = CarsResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["cars"],
    operation_id = "getCars"
)]
#[get("/get_cars")]
pub async fn get_cars(
    state: web::Data<HttpState>,
    _access: ReadAccess,
) -> ApiResult<web::Json<CarsResponse>> {
    let vehicles = state.vehicles.list().await?;
    Ok(web::Json(collect_cars(vehicles)))
}

/// Search vehicles by make, model, or plate substring.
#[utoipa::path(
    get,
    path = "/carsdb/search_cars",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching cars", body = CarsResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["cars"],
    operation_id = "searchCars"
)]
#[get("/search_cars")]
pub async fn search_cars(
    state: web::Data<HttpState>,
    _access: ReadAccess,
    params: web::Query<SearchParams>,
) -> ApiResult<web::Json<CarsResponse>> {
    let query = SearchQuery::new(params.query.as_deref().unwrap_or_default());
    let vehicles = state.vehicles.search(&query).await?;
    Ok(web::Json(collect_cars(vehicles)))
}

/// Merge a partial update into the vehicle with the given plate.
#[utoipa::path(
    put,
    path = "/carsdb/update_car/{license_plate}",
    request_body = UpdateVehicleRequest,
    params(("license_plate" = String, Path, description = "Business key of the car")),
    responses(
        (status = 200, description = "Update outcome"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Plate change attempted", body = Error),
        (status = 404, description = "No car with that plate", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["cars"],
    operation_id = "updateCar"
)]
#[put("/update_car/{license_plate}")]
pub async fn update_car(
    state: web::Data<HttpState>,
    _identity: Identity,
    path: web::Path<String>,
    payload: web::Json<UpdateVehicleRequest>,
) -> ApiResult<HttpResponse> {
    let plate = parse_plate(&path.into_inner())?;
    let payload = payload.into_inner();
    if payload.license_plate.is_some() {
        return Err(Error::forbidden("license plate cannot be changed")
            .with_details(json!({ "field": "license_plate" })));
    }

    let changes = VehicleChanges {
        make: payload
            .make
            .map(Make::new)
            .transpose()
            .map_err(map_vehicle_validation)?,
        model: payload
            .model
            .map(Model::new)
            .transpose()
            .map_err(map_vehicle_validation)?,
    };

    let modified = state.vehicles.update(&plate, &changes).await?;
    info!(plate = %plate, modified, "car updated");
    Ok(HttpResponse::Ok().json(json!({ "modified": modified })))
}

/// Remove the vehicle with the given plate.
#[utoipa::path(
    delete,
    path = "/carsdb/delete_car/{license_plate}",
    params(("license_plate" = String, Path, description = "Business key of the car")),
    responses(
        (status = 200, description = "Car deleted"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "No car with that plate", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["cars"],
    operation_id = "deleteCar"
)]
#[delete("/delete_car/{license_plate}")]
pub async fn delete_car(
    state: web::Data<HttpState>,
    _identity: Identity,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let plate = parse_plate(&path.into_inner())?;
    state.vehicles.delete(&plate).await?;
    info!(plate = %plate, "car deleted");
    Ok(HttpResponse::Ok().json(json!({ "message": "Car deleted" })))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test, web};
    use rstest::rstest;
    use serde_json::Value;

    use super::*;
    use crate::inbound::http::test_utils::test_state;

    fn test_app(
        state: web::Data<HttpState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new().app_data(state).service(
            web::scope("/carsdb")
                .service(add_car)
                .service(get_cars)
                .service(search_cars)
                .service(update_car)
                .service(delete_car),
        )
    }

    fn bearer(state: &web::Data<HttpState>) -> (&'static str, String) {
        let token = state
            .tokens
            .issue("ada@example.com")
            .expect("token issued");
        ("authorization", format!("Bearer {token}"))
    }

    fn corolla() -> NewVehicleRequest {
        NewVehicleRequest {
            make: "Toyota".into(),
            model: "Corolla".into(),
            license_plate: "A123BC77".into(),
        }
    }

    async fn seed_corolla(state: &web::Data<HttpState>) {
        let vehicle = Vehicle::new(
            Make::new("Toyota").expect("valid make"),
            Model::new("Corolla").expect("valid model"),
            LicensePlate::new("A123BC77").expect("valid plate"),
        );
        state
            .vehicles
            .insert(&vehicle)
            .await
            .expect("seed vehicle");
    }

    #[actix_web::test]
    async fn add_car_requires_a_token() {
        let app = actix_test::init_service(test_app(test_state())).await;
        let request = actix_test::TestRequest::post()
            .uri("/carsdb/add_car")
            .set_json(corolla())
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn add_then_list_round_trips() {
        let state = test_state();
        let auth = bearer(&state);
        let app = actix_test::init_service(test_app(state)).await;

        let request = actix_test::TestRequest::post()
            .uri("/carsdb/add_car")
            .insert_header(auth.clone())
            .set_json(corolla())
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let request = actix_test::TestRequest::get()
            .uri("/carsdb/get_cars")
            .insert_header(auth)
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: CarsResponse =
            serde_json::from_slice(&actix_test::read_body(response).await).expect("cars payload");
        assert_eq!(body.cars.len(), 1);
        assert_eq!(body.cars[0].license_plate, "A123BC77");
    }

    #[actix_web::test]
    async fn duplicate_plate_conflicts() {
        let state = test_state();
        seed_corolla(&state).await;
        let auth = bearer(&state);
        let app = actix_test::init_service(test_app(state)).await;

        let request = actix_test::TestRequest::post()
            .uri("/carsdb/add_car")
            .insert_header(auth)
            .set_json(corolla())
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[rstest]
    #[case("corol", 1)]
    #[case("TOYOTA", 1)]
    #[case("A123", 1)]
    #[case("civic", 0)]
    #[case("", 0)]
    #[actix_web::test]
    async fn search_matches_substrings_case_insensitively(
        #[case] query: &str,
        #[case] expected: usize,
    ) {
        let state = test_state();
        seed_corolla(&state).await;
        let auth = bearer(&state);
        let app = actix_test::init_service(test_app(state)).await;

        let request = actix_test::TestRequest::get()
            .uri(&format!("/carsdb/search_cars?query={query}"))
            .insert_header(auth)
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: CarsResponse =
            serde_json::from_slice(&actix_test::read_body(response).await).expect("cars payload");
        assert_eq!(body.cars.len(), expected);
    }

    #[actix_web::test]
    async fn update_merges_fields_and_reports_modification() {
        let state = test_state();
        seed_corolla(&state).await;
        let auth = bearer(&state);
        let app = actix_test::init_service(test_app(state)).await;

        let request = actix_test::TestRequest::put()
            .uri("/carsdb/update_car/A123BC77")
            .insert_header(auth)
            .set_json(UpdateVehicleRequest {
                make: None,
                model: Some("Camry".into()),
                license_plate: None,
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value =
            serde_json::from_slice(&actix_test::read_body(response).await).expect("json payload");
        assert_eq!(body["modified"], true);
    }

    #[actix_web::test]
    async fn update_rejects_plate_changes() {
        let state = test_state();
        seed_corolla(&state).await;
        let auth = bearer(&state);
        let app = actix_test::init_service(test_app(state)).await;

        let request = actix_test::TestRequest::put()
            .uri("/carsdb/update_car/A123BC77")
            .insert_header(auth)
            .set_json(UpdateVehicleRequest {
                make: None,
                model: None,
                license_plate: Some("B456DE99".into()),
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn missing_plate_is_not_found() {
        let state = test_state();
        let auth = bearer(&state);
        let app = actix_test::init_service(test_app(state)).await;

        let request = actix_test::TestRequest::delete()
            .uri("/carsdb/delete_car/B456DE99")
            .insert_header(auth)
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn malformed_path_plate_is_a_bad_request() {
        let state = test_state();
        let auth = bearer(&state);
        let app = actix_test::init_service(test_app(state)).await;

        let request = actix_test::TestRequest::delete()
            .uri("/carsdb/delete_car/not-a-plate")
            .insert_header(auth)
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
