//! Authentication extractors.
//!
//! The storefront sits behind an authentication gateway that verifies the
//! caller's token and forwards the resolved identity as headers:
//!
//! - `x-user-id` - numeric user ID
//! - `x-user-name` - display name
//! - `x-user-admin` - `true` for catalog administrators
//!
//! Requests without a valid `x-user-id` are treated as anonymous.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
};

use emporium_core::UserId;

use crate::error::AppError;
use crate::models::CurrentUser;

/// Header carrying the authenticated user's ID.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the authenticated user's display name.
pub const USER_NAME_HEADER: &str = "x-user-name";
/// Header carrying the authenticated user's admin flag.
pub const USER_ADMIN_HEADER: &str = "x-user-admin";

/// Extractor that requires an authenticated user.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAuth(user): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Extractor that requires an authenticated administrator.
pub struct RequireAdmin(pub CurrentUser);

/// Read the forwarded identity from request headers.
///
/// Returns `None` if the user ID header is missing or not a number.
#[must_use]
pub fn current_user(headers: &HeaderMap) -> Option<CurrentUser> {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

    let id: UserId = header(USER_ID_HEADER)?.parse().ok()?;
    let name = header(USER_NAME_HEADER)
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map_or_else(|| format!("User {id}"), str::to_owned);
    let is_admin = header(USER_ADMIN_HEADER).is_some_and(|v| v.trim().eq_ignore_ascii_case("true"));

    Some(CurrentUser { id, name, is_admin })
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = current_user(&parts.headers)
            .ok_or_else(|| AppError::Unauthorized("Not authorized, no valid identity".to_string()))?;

        tracing::Span::current().record("user_id", user.id.as_i32());

        Ok(Self(user))
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequireAuth(user) = RequireAuth::from_request_parts(parts, state).await?;

        if !user.is_admin {
            tracing::warn!(user_id = %user.id, "Non-admin attempted catalog management");
            return Err(AppError::Forbidden("Not authorized as an admin".to_string()));
        }

        Ok(Self(user))
    }
}
