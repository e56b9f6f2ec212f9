/// Cookie session authentication
///
/// Protected routes sit behind [`require_session`], which resolves the `sid`
/// cookie through the session service and stores the caller in the request
/// extensions. Handlers read it back with `Extension<AuthContext>`.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::{
    cookie::{Cookie, SameSite},
    CookieJar,
};
use repofav_shared::models::user::UserSummary;

use crate::{app::AppState, error::ApiError};

/// Session cookie name
pub const SESSION_COOKIE: &str = "sid";

/// The authenticated caller
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user: UserSummary,
}

/// Rejects requests without a live session with 401
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = session_token(&jar)
        .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?;

    let user = state.sessions.resolve(&token).await?;
    request.extensions_mut().insert(AuthContext { user });

    Ok(next.run(request).await)
}

/// Raw session token from the request cookies
pub fn session_token(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_owned())
        .filter(|token| !token.is_empty())
}

/// Session cookie carrying `token`
///
/// No `Max-Age`: the browser drops it at the end of the session and the
/// server enforces the real expiry.
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build()
}

/// Removal cookie with the same attributes as [`session_cookie`]
pub fn clear_session_cookie(secure: bool) -> Cookie<'static> {
    let mut cookie = session_cookie(String::new(), secure);
    cookie.make_removal();
    cookie
}
