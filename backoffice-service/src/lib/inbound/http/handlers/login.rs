use std::str::FromStr;

use auth::Claims;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use email_address::EmailAddress;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::TokenResponseData;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequestBody>,
) -> Result<ApiSuccess<TokenResponseData>, ApiError> {
    // Parse and validate email; an unparseable identifier gets the same
    // answer as a wrong password.
    let email = EmailAddress::from_str(&body.email)
        .map_err(|_| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let user = state
        .users
        .find_by_email(email.as_str())
        .await
        .ok_or_else(|| {
            tracing::warn!(email = %email, "Login attempt for unknown account");
            ApiError::Unauthorized("Invalid email or password".to_string())
        })?;

    if !state.authority.verify_password(&body.password, &user.password_hash) {
        tracing::warn!(email = %email, "Login attempt with wrong password");
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let claims = Claims::new()
        .with_subject(&user.email)
        .with_user_id(user.id)
        .with_role(&user.role);

    let access_token = state.authority.issue(claims, None)?;

    tracing::info!(email = %user.email, "Login succeeded");

    Ok(ApiSuccess::new(
        StatusCode::OK,
        TokenResponseData {
            access_token,
            token_type: "bearer".to_string(),
            expires_in: state.token_expire_seconds,
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    email: String,
    password: String,
}
