use super::jwt::{AuthError, JwtAuth};
use crate::errors::AppError;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};

/// Token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Reject requests without a valid admin bearer token.
///
/// Inserts the decoded [`AdminClaims`](super::AdminClaims) into the request
/// extensions on success.
///
/// ```ignore
/// let protected = Router::new()
///     .route("/items", post(create_item))
///     .layer(axum::middleware::from_fn_with_state(auth.clone(), require_admin));
/// ```
pub async fn require_admin(
    State(auth): State<JwtAuth>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers()).ok_or_else(|| {
        tracing::debug!("No bearer token in Authorization header");
        AuthError::MissingToken
    })?;

    let claims = auth.verify(token).inspect_err(|e| {
        tracing::debug!(error = ?e, "JWT verification failed");
    })?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}
