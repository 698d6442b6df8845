//! Account API handlers.
//!
//! ```text
//! POST /auth/register {"first_name":"Ada","last_name":"Lovelace",...}
//! POST /auth/login    username=ada%40example.com&password=secret123
//! GET  /auth/me       Authorization: Bearer <token>
//! ```
//!
//! Login is form-encoded with the email carried in the `username`
//! field, matching the OAuth2 password flow shape clients already
//! speak.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::auth::{hash_password, verify_password};
use crate::domain::{
    AccountValidationError, EmailAddress, Error, Password, PersonName, StoreError, UserAccount,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::Identity;
use crate::inbound::http::state::HttpState;

const LOGIN_FAILED_MESSAGE: &str = "Incorrect email or password";

/// Registration request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    /// Account holder's first name, 2–50 characters.
    pub first_name: String,
    /// Account holder's last name, 2–50 characters.
    pub last_name: String,
    /// Login email, unique across accounts.
    pub email: String,
    /// Plaintext password, at least 6 characters.
    pub password: String,
    /// Must equal `password`; never persisted.
    pub confirm_password: String,
}

/// Login form for `POST /auth/login`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct LoginForm {
    /// The account email, carried in the conventional form field name.
    pub username: String,
    /// Plaintext password.
    pub password: String,
}

/// Issued access token response.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TokenResponse {
    /// Signed bearer token.
    pub access_token: String,
    /// Always `bearer`.
    pub token_type: String,
}

/// Caller identity echoed by `GET /auth/me`.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MeResponse {
    /// First name on the account.
    pub first_name: String,
    /// Last name on the account.
    pub last_name: String,
    /// Email the token was issued for.
    pub email: String,
}

fn map_account_validation(err: AccountValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({ "field": err.field() }))
}

fn blocking_task_failed() -> Error {
    Error::internal("password hashing task failed")
}

/// Create a new user account.
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    if payload.password != payload.confirm_password {
        return Err(Error::invalid_request("password confirmation does not match")
            .with_details(json!({ "field": "confirm_password" })));
    }

    let first_name =
        PersonName::new(payload.first_name, "first_name").map_err(map_account_validation)?;
    let last_name =
        PersonName::new(payload.last_name, "last_name").map_err(map_account_validation)?;
    let email = EmailAddress::new(payload.email).map_err(map_account_validation)?;
    let password = Password::new(payload.password).map_err(map_account_validation)?;

    // Argon2 is deliberately slow; keep it off the async executor.
    let password_hash = web::block(move || hash_password(&password))
        .await
        .map_err(|_| blocking_task_failed())??;

    let account = UserAccount::new(first_name, last_name, email, password_hash);
    state
        .accounts
        .insert(&account)
        .await
        .map_err(|err| match err {
            StoreError::Duplicate { .. } => {
                Error::conflict("an account with this email already exists")
            }
            other => other.into(),
        })?;

    info!(email = %account.email(), "account registered");
    Ok(HttpResponse::Ok().json(json!({ "message": "Account created" })))
}

/// Exchange credentials for an access token.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Incorrect email or password", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    form: web::Form<LoginForm>,
) -> ApiResult<web::Json<TokenResponse>> {
    let form = form.into_inner();
    // Syntactically invalid input cannot match any account; keep the
    // response indistinguishable from a wrong password.
    let email =
        EmailAddress::new(form.username).map_err(|_| Error::unauthorized(LOGIN_FAILED_MESSAGE))?;
    let password =
        Password::new(form.password).map_err(|_| Error::unauthorized(LOGIN_FAILED_MESSAGE))?;

    let account = state
        .accounts
        .find_by_email(&email)
        .await?
        .ok_or_else(|| Error::unauthorized(LOGIN_FAILED_MESSAGE))?;

    let stored = account.password_hash().clone();
    let verified = web::block(move || verify_password(&password, &stored))
        .await
        .map_err(|_| blocking_task_failed())?;
    if !verified {
        return Err(Error::unauthorized(LOGIN_FAILED_MESSAGE));
    }

    let access_token = state.tokens.issue(account.email().as_ref())?;
    info!(email = %account.email(), "login succeeded");
    Ok(web::Json(TokenResponse {
        access_token,
        token_type: "bearer".to_owned(),
    }))
}

/// Echo the authenticated caller's account details.
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Caller identity", body = MeResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "me"
)]
#[get("/me")]
pub async fn me(
    state: web::Data<HttpState>,
    identity: Identity,
) -> ApiResult<web::Json<MeResponse>> {
    let email = EmailAddress::new(identity.subject())
        .map_err(|_| Error::unauthorized("token subject is not a known account"))?;
    let account = state
        .accounts
        .find_by_email(&email)
        .await?
        .ok_or_else(|| Error::unauthorized("token subject is not a known account"))?;

    Ok(web::Json(MeResponse {
        first_name: account.first_name().as_ref().to_owned(),
        last_name: account.last_name().as_ref().to_owned(),
        email: account.email().as_ref().to_owned(),
    }))
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
            web::scope("/auth")
                .service(register)
                .service(login)
                .service(me),
        )
    }

    fn valid_registration() -> RegisterRequest {
        RegisterRequest {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            password: "secret123".into(),
            confirm_password: "secret123".into(),
        }
    }

    fn register_request() -> actix_test::TestRequest {
        actix_test::TestRequest::post()
            .uri("/auth/register")
            .set_json(valid_registration())
    }

    #[actix_web::test]
    async fn register_then_login_issues_a_token() {
        let app = actix_test::init_service(test_app(test_state())).await;
        let response = actix_test::call_service(&app, register_request().to_request()).await;
        assert_eq!(response.status(), StatusCode::OK);

        let request = actix_test::TestRequest::post()
            .uri("/auth/login")
            .set_form(LoginForm {
                username: "ada@example.com".into(),
                password: "secret123".into(),
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: TokenResponse =
            serde_json::from_slice(&actix_test::read_body(response).await).expect("token payload");
        assert_eq!(body.token_type, "bearer");
        assert!(!body.access_token.is_empty());
    }

    #[actix_web::test]
    async fn duplicate_email_conflicts() {
        let app = actix_test::init_service(test_app(test_state())).await;
        let response = actix_test::call_service(&app, register_request().to_request()).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = actix_test::call_service(&app, register_request().to_request()).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[rstest]
    #[case("first_name", json!(""))]
    #[case("email", json!("not-an-email"))]
    #[case("password", json!("short"))]
    #[actix_web::test]
    async fn register_rejects_invalid_fields(#[case] field: &str, #[case] value: Value) {
        let mut payload = serde_json::to_value(valid_registration()).expect("serialise request");
        payload[field] = value.clone();
        if field == "password" {
            payload["confirm_password"] = value;
        }

        let app = actix_test::init_service(test_app(test_state())).await;
        let request = actix_test::TestRequest::post()
            .uri("/auth/register")
            .set_json(payload)
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value =
            serde_json::from_slice(&actix_test::read_body(response).await).expect("error payload");
        assert_eq!(body["details"]["field"], field);
    }

    #[actix_web::test]
    async fn mismatched_confirmation_is_rejected() {
        let app = actix_test::init_service(test_app(test_state())).await;
        let mut payload = valid_registration();
        payload.confirm_password = "different1".into();

        let request = actix_test::TestRequest::post()
            .uri("/auth/register")
            .set_json(payload)
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[rstest]
    #[case("ada@example.com", "wrong-secret")]
    #[case("nobody@example.com", "secret123")]
    #[case("not-an-email", "secret123")]
    #[actix_web::test]
    async fn login_failures_share_one_message(#[case] username: &str, #[case] password: &str) {
        let app = actix_test::init_service(test_app(test_state())).await;
        let response = actix_test::call_service(&app, register_request().to_request()).await;
        assert_eq!(response.status(), StatusCode::OK);

        let request = actix_test::TestRequest::post()
            .uri("/auth/login")
            .set_form(LoginForm {
                username: username.into(),
                password: password.into(),
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: Value =
            serde_json::from_slice(&actix_test::read_body(response).await).expect("error payload");
        assert_eq!(body["message"], LOGIN_FAILED_MESSAGE);
    }

    #[actix_web::test]
    async fn me_echoes_the_registered_account() {
        let state = test_state();
        let app = actix_test::init_service(test_app(state.clone())).await;
        let response = actix_test::call_service(&app, register_request().to_request()).await;
        assert_eq!(response.status(), StatusCode::OK);
        let token = state.tokens.issue("ada@example.com").expect("token issued");

        let request = actix_test::TestRequest::get()
            .uri("/auth/me")
            .insert_header(("authorization", format!("Bearer {token}")))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: MeResponse =
            serde_json::from_slice(&actix_test::read_body(response).await).expect("me payload");
        assert_eq!(body.email, "ada@example.com");
        assert_eq!(body.first_name, "Ada");
    }
}
