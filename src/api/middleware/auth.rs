//! Bearer token authentication middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde_json::json;

use crate::{error::AppError, state::AppState};

/// Authenticates management API requests using Bearer tokens.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <token>
/// ```
///
/// # Authentication Flow
///
/// 1. Extract token from `Authorization` header
/// 2. Compare it with the configured `API_TOKEN`
/// 3. Continue to next middleware/handler
///
/// # Errors
///
/// Returns `401 Unauthorized` if:
/// - Authorization header is missing
/// - Token format is invalid
/// - Token does not match, or no token is configured
///
/// Adds `WWW-Authenticate: Bearer` header to 401 responses per RFC 6750.
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !st.auth_service.is_enabled() {
        return Err(AppError::unauthorized(
            "Unauthorized",
            json!({"reason": "Management API is disabled; set API_TOKEN to enable it"}),
        ));
    }

    let (mut parts, body) = req.into_parts();

    let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Authorization header is missing or invalid"}),
            )
        })?;

    st.auth_service.authenticate(&token).await?;

    Ok(next.run(Request::from_parts(parts, body)).await)
}
