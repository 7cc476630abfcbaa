use axum::http::StatusCode;
use serde::Serialize;

use super::ApiSuccess;

/// Administrator statistics. Pass-through numbers until the reporting
/// backend lands; the interesting part is the role guard in front of it.
pub async fn stats() -> ApiSuccess<StatsData> {
    ApiSuccess::new(
        StatusCode::OK,
        StatsData {
            users: 0,
            bookings: 0,
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsData {
    pub users: u64,
    pub bookings: u64,
}
