use axum::extract::State;
use axum::http::header;
use axum::http::HeaderMap;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::TokenResponseData;
use crate::inbound::http::router::AppState;

/// Exchange a still-valid bearer token for a fresh one carrying only the
/// identity claims. The old token stays usable until its own expiry.
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<ApiSuccess<TokenResponseData>, ApiError> {
    let token = bearer_token(&headers)
        .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".to_string()))?;

    let access_token = state.authority.refresh(token)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        TokenResponseData {
            access_token,
            token_type: "bearer".to_string(),
            expires_in: state.token_expire_seconds,
        },
    ))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
