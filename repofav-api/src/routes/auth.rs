/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /auth/signup` - Create an account
/// - `POST /auth/login` - Check credentials and set the `sid` cookie
/// - `POST /auth/logout` - Revoke the session and clear the cookie
/// - `GET /auth/me` - Current user (requires session)

use crate::{
    app::AppState,
    error::ApiResult,
    middleware::session::{clear_session_cookie, session_cookie, session_token, AuthContext},
    routes::ValidatedJson,
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use axum_extra::extract::CookieJar;
use repofav_shared::models::user::UserSummary;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Signup request
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// `{ "user": { "id", "email" } }`
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub user: UserSummary,
}

/// Register a new user
///
/// ```text
/// POST /auth/signup
/// { "email": "user@example.com", "password": "correct horse" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Invalid payload
/// - `409 Conflict`: Email already in use
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SignupRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let user = state.auth.signup(&req.email, &req.password).await?;
    Ok((StatusCode::CREATED, Json(UserResponse { user })))
}

/// Log in and receive a session cookie
///
/// # Errors
///
/// - `400 Bad Request`: Invalid payload
/// - `401 Unauthorized`: Invalid email or password
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<(CookieJar, Json<UserResponse>)> {
    let outcome = state.auth.login(&req.email, &req.password).await?;

    let cookie = session_cookie(outcome.session_token, state.config.api.production);
    Ok((jar.add(cookie), Json(UserResponse { user: outcome.user })))
}

/// Log out; succeeds with or without a session
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> ApiResult<(StatusCode, CookieJar)> {
    let token = session_token(&jar);
    state.auth.logout(token.as_deref()).await?;

    let jar = jar.add(clear_session_cookie(state.config.api.production));
    Ok((StatusCode::NO_CONTENT, jar))
}

/// Current user
pub async fn me(Extension(auth): Extension<AuthContext>) -> Json<UserResponse> {
    Json(UserResponse { user: auth.user })
}
