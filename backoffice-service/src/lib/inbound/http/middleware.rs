use auth::TokenError;
use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde_json::json;

use crate::inbound::http::router::AppState;

/// Extension type to store the verified identity in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Option<i64>,
    pub email: String,
    pub role: Option<String>,
}

/// Middleware that verifies bearer tokens and adds the caller's identity to
/// request extensions.
///
/// An invalid or expired token yields a 401 with a deliberately generic
/// message; a verification infrastructure failure yields a 500.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    // Extract token from Authorization header
    let token = extract_token_from_header(&req)?;

    let claims = state.authority.verify(token).map_err(|e| match e {
        TokenError::InvalidToken => {
            tracing::warn!("Token verification failed: {}", e);
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "Invalid or expired token"
                })),
            )
                .into_response()
        }
        other => {
            tracing::error!("Token verification infrastructure failure: {}", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            )
                .into_response()
        }
    })?;

    // The subject is the user-facing identity; a token without one is
    // useless for authorization.
    let email = claims.sub.clone().ok_or_else(|| {
        tracing::warn!("Missing 'sub' claim in token");
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Invalid or expired token"
            })),
        )
            .into_response()
    })?;

    req.extensions_mut().insert(AuthenticatedUser {
        user_id: claims.user_id,
        email,
        role: claims.role.clone(),
    });

    Ok(next.run(req).await)
}

/// Role guard layered inside [`authenticate`]; anything but an "admin" role
/// is turned away with a 403.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, Response> {
    let is_admin = req
        .extensions()
        .get::<AuthenticatedUser>()
        .map_or(false, |user| user.role.as_deref() == Some("admin"));

    if !is_admin {
        return Err((
            StatusCode::FORBIDDEN,
            Json(json!({
                "error": "Administrator role required"
            })),
        )
            .into_response());
    }

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, Response> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "Missing Authorization header"
                })),
            )
                .into_response()
        })?;

    let auth_str = auth_header.to_str().map_err(|_| {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Invalid Authorization header"
            })),
        )
            .into_response()
    })?;

    auth_str.strip_prefix("Bearer ").ok_or_else(|| {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Invalid Authorization header format. Expected: Bearer <token>"
            })),
        )
            .into_response()
    })
}
