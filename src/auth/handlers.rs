// HTTP handlers for session endpoints

use axum::{extract::State, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use validator::Validate;

use crate::auth::{
    middleware::TOKEN_COOKIE,
    models::{Identity, IdentityPayload, SessionResponse},
};
use crate::error::ApiError;
use crate::AppState;

/// Issue a session token
/// POST /jwt
pub async fn issue_token_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<IdentityPayload>,
) -> Result<(CookieJar, Json<SessionResponse>), ApiError> {
    payload.validate()?;

    let identity = Identity::from(payload);
    let token = state.tokens.issue(&identity)?;

    let cookie = Cookie::build((TOKEN_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(state.cookie_secure)
        .same_site(if state.cookie_secure {
            SameSite::None
        } else {
            SameSite::Lax
        });

    tracing::info!("Issued session token for {}", identity.email);
    Ok((jar.add(cookie), Json(SessionResponse { success: true })))
}

/// Clear the session cookie
/// POST /logout
///
/// The removal cookie is sent even when the request carried no token.
pub async fn logout_handler(jar: CookieJar) -> (CookieJar, Json<SessionResponse>) {
    tracing::debug!("Clearing session cookie");

    let mut removal = Cookie::build((TOKEN_COOKIE, ""))
        .path("/")
        .http_only(true)
        .build();
    removal.make_removal();

    (jar.add(removal), Json(SessionResponse { success: true }))
}
