//! Session authentication
//!
//! Every protected route expects a session token issued by the external
//! auth provider:
//!
//! ```text
//! Authorization: Bearer <session-token>
//! ```
//!
//! Unknown or expired tokens are treated like a missing header (401).

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use tabula_core::store::IdentityStore;
use tabula_core::{User, UserId};

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated caller, available to handlers behind `require_session`
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl AuthUser {
    pub fn id(&self) -> &UserId {
        &self.0.id
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(ApiError::Unauthorized)
    }
}

/// Bearer token from the `Authorization` header, if well formed
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Authentication middleware: resolves the session and stores the caller as
/// an `AuthUser` request extension
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers())
        .ok_or(ApiError::Unauthorized)?
        .to_string();

    let user = state
        .identity
        .resolve_session(&token)
        .await?
        .ok_or_else(|| {
            tracing::debug!(path = %request.uri().path(), "Rejected unknown or expired session");
            ApiError::Unauthorized
        })?;

    request.extensions_mut().insert(AuthUser(user));
    Ok(next.run(request).await)
}
