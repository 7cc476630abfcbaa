use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;

/// Current caller's profile, read from the verified claims.
pub async fn me(Extension(user): Extension<AuthenticatedUser>) -> ApiSuccess<ProfileData> {
    ApiSuccess::new(
        StatusCode::OK,
        ProfileData {
            id: user.user_id,
            email: user.email,
            role: user.role,
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileData {
    pub id: Option<i64>,
    pub email: String,
    pub role: Option<String>,
}
