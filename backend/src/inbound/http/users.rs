//! Account endpoints: registration and login.
//!
//! ```text
//! POST /user/register {"username":"ada","unhashedPass":"secret"}
//! POST /user/login    {"username":"ada","unhashedPass":"secret"}
//! ```

use actix_web::{post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::user::UserValidationError;
use crate::domain::{Error, Username};

use super::state::HttpState;
use super::ApiResult;

/// Credentials body shared by registration and login.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsRequest {
    pub username: String,
    /// Cleartext password; hashed server side before storage.
    pub unhashed_pass: String,
}

/// Successful login payload.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
}

fn parse_username(raw: &str) -> ApiResult<Username> {
    Username::new(raw).map_err(map_username_error)
}

fn map_username_error(err: UserValidationError) -> Error {
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": "username" }))
}

/// Create an account and seed its welcome document.
#[utoipa::path(
    post,
    path = "/user/register",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Account created"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Username already taken", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "registerUser",
    security([])
)]
#[post("/user/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let username = parse_username(&payload.username)?;
    state
        .accounts
        .register(username, &payload.unhashed_pass)
        .await?;
    Ok(HttpResponse::Created().json(json!({ "status": "success" })))
}

/// Verify credentials and issue a bearer token.
#[utoipa::path(
    post,
    path = "/user/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "loginUser",
    security([])
)]
#[post("/user/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let payload = payload.into_inner();
    let username = parse_username(&payload.username)?;
    let outcome = state
        .accounts
        .login(username, &payload.unhashed_pass)
        .await?;
    Ok(web::Json(LoginResponse {
        token: outcome.token,
        username: outcome.username.into(),
    }))
}
