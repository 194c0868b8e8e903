//! JWT authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::errors::AppError;

/// Authenticated user extracted from JWT token
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: i32,
    /// Identifier of the presented token, revoked on logout
    pub jti: String,
    pub is_admin: bool,
}

/// JWT authentication middleware.
///
/// Extracts and validates the bearer token from the Authorization header,
/// then injects the CurrentUser into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AppError::AuthorizationRequired)?;

    let claims = state.auth_service.verify_token(token).await?;

    request.extensions_mut().insert(CurrentUser {
        id: claims.sub,
        jti: claims.jti,
        is_admin: claims.is_admin,
    });

    Ok(next.run(request).await)
}

/// Allow access to a user's own resource, or to any resource for admins.
pub fn require_self_or_admin(user: &CurrentUser, owner_id: i32) -> Result<(), AppError> {
    if user.id == owner_id || user.is_admin {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}
