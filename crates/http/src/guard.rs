//! Shared-secret middleware.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use hadith_authz::SecretGuard;

use crate::error::AppError;

/// Paths served without presenting the secret.
pub const EXEMPT_PATHS: &[&str] = &["/healthz"];

/// Reject requests whose secret header does not match the configured secret.
pub async fn require_secret(
    State(guard): State<Arc<SecretGuard>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if EXEMPT_PATHS.contains(&request.uri().path()) {
        return Ok(next.run(request).await);
    }

    let presented = request
        .headers()
        .get(guard.header())
        .map(|value| value.as_bytes());

    if let Err(err) = guard.check(presented) {
        tracing::warn!(path = %request.uri().path(), reason = %err, "rejected request");
        return Err(AppError::unauthorized());
    }

    Ok(next.run(request).await)
}
