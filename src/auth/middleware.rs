// Authentication middleware for protected routes

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, warn};

use crate::auth::{error::AuthError, models::Identity};
use crate::AppState;

/// Name of the cookie carrying the session token
pub const TOKEN_COOKIE: &str = "token";

/// Middleware that admits only requests carrying a valid session cookie.
///
/// On success the decoded [`Identity`] is stored in the request extensions,
/// where [`AuthenticatedUser`] picks it up.
pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let endpoint = request.uri().path().to_string();

    let token = jar.get(TOKEN_COOKIE).ok_or_else(|| {
        warn!("Missing token cookie in request to protected endpoint: {}", endpoint);
        AuthError::MissingToken
    })?;

    let identity = state.tokens.verify(token.value()).map_err(|e| {
        warn!("Rejected token for endpoint: {}", endpoint);
        e
    })?;

    debug!("Authenticated {} for endpoint: {}", identity.email, endpoint);
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

/// Authenticated user extractor for routes behind [`require_auth`]
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub email: String,
}

impl AuthenticatedUser {
    /// Ownership check: the caller may only ask for their own data.
    ///
    /// Returns the email to scope the query by; an absent request scopes to
    /// the caller.
    pub fn authorize_email<'a>(&'a self, requested: Option<&'a str>) -> Result<&'a str, AuthError> {
        match requested {
            None => Ok(&self.email),
            Some(email) if email == self.email => Ok(email),
            Some(email) => Err(AuthError::IdentityMismatch {
                authenticated: self.email.clone(),
                requested: email.to_string(),
            }),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Only present when require_auth ran first
        parts
            .extensions
            .get::<Identity>()
            .map(|identity| AuthenticatedUser {
                email: identity.email.clone(),
            })
            .ok_or(AuthError::MissingToken)
    }
}
