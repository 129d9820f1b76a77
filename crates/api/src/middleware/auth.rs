//! Caller identity for privileged routes.
//!
//! Token verification happens upstream. The gateway forwards the verified
//! identity as the `X-User-Id` and `X-User-Role` headers, which this
//! extractor turns into an [`AuthContext`].

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
    response::Response,
};

use potledger_shared::types::UserId;
use potledger_shared::{AppError, AuthContext, Role};

use crate::error::error_response;

/// Header carrying the acting user's ID.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the acting user's role.
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Extractor for the authenticated caller.
///
/// ```ignore
/// async fn handler(auth: AuthUser) -> impl IntoResponse {
///     let context = auth.context();
///     // ...
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub AuthContext);

impl AuthUser {
    /// Returns the caller's context.
    #[must_use]
    pub const fn context(&self) -> &AuthContext {
        &self.0
    }

    /// Returns the caller's user ID.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.0.user_id
    }
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Parses the identity headers.
fn parse_identity(headers: &HeaderMap) -> Result<AuthContext, AppError> {
    let (Some(raw_id), Some(raw_role)) = (header(headers, USER_ID_HEADER), header(headers, USER_ROLE_HEADER)) else {
        return Err(AppError::Unauthorized(
            "X-User-Id and X-User-Role headers are required".to_string(),
        ));
    };

    let user_id: UserId = raw_id
        .parse()
        .map_err(|_| AppError::Unauthorized(format!("Invalid user ID: {raw_id}")))?;
    let role: Role = raw_role.parse().map_err(AppError::Unauthorized)?;

    Ok(AuthContext::new(user_id, role))
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parse_identity(&parts.headers)
            .map(AuthUser)
            .map_err(|e| error_response(&e))
    }
}
